//! Marketplace listings and the fixed option sets of the browse screen.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::api::{extract_list, null_as_default};
use crate::error::{ReplayError, Result};

pub const CATEGORY_OPTIONS: &[&str] = &["가구", "소품", "의상"];

pub const TAG_OPTIONS: &[&str] = &[
    "빈티지",
    "고풍스러운",
    "현대",
    "전통",
    "공포",
    "판타지",
    "시대극",
    "코미디",
];

/// Distance bands; selecting one does not narrow the result set.
pub const LOCATION_OPTIONS: &[&str] = &["100m 이내", "1km 이내", "1-5km", "5-10km", "10km 이상"];

/// A prop, set piece or costume offered for trade
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Listing {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub category: String,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub school: String,
    #[serde(deserialize_with = "null_as_default")]
    pub tags: Vec<String>,
    /// Display price, already formatted (e.g. `331,331원`)
    #[serde(deserialize_with = "null_as_default")]
    pub price: String,
}

impl Listing {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Load listings from a JSON file in any of the accepted list shapes.
pub fn load_listings(path: &Path) -> Result<Vec<Listing>> {
    let content = fs::read_to_string(path).map_err(|e| {
        ReplayError::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to read listings at {}: {}", path.display(), e),
        ))
    })?;
    let parsed: serde_json::Value = serde_json::from_str(&content)?;
    extract_list(&parsed)
}
