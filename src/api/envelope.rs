//! Response shapes returned by the Replay API.
//!
//! Auth endpoints wrap their payload in an [`ApiEnvelope`]. Listing endpoints
//! are not standardized: the list may come bare or nested under `data`,
//! `data.items` or `items`. [`extract_list`] tries each known shape in order
//! and yields an empty list for anything else.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::error::{ReplayError, Result};

/// `{success, data, error?}` wrapper used by the auth endpoints
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiEnvelope<T> {
    pub success: bool,
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<EnvelopeError>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EnvelopeError {
    #[serde(default)]
    pub code: String,
    #[serde(default)]
    pub message: String,
}

impl<T> ApiEnvelope<T> {
    /// Unwrap the payload, turning `success: false` into a validation error.
    ///
    /// `fallback` is used when the server did not provide a message.
    pub fn into_result(self, fallback: &str) -> Result<T> {
        if !self.success {
            let message = self
                .error
                .map(|e| e.message)
                .filter(|m| !m.is_empty())
                .unwrap_or_else(|| fallback.to_string());
            return Err(ReplayError::Envelope(message));
        }
        self.data
            .ok_or_else(|| ReplayError::Envelope(fallback.to_string()))
    }
}

type ShapeMatcher = fn(&Value) -> Option<&Vec<Value>>;

fn bare_array(v: &Value) -> Option<&Vec<Value>> {
    v.as_array()
}

fn data_array(v: &Value) -> Option<&Vec<Value>> {
    v.get("data").and_then(Value::as_array)
}

fn data_items(v: &Value) -> Option<&Vec<Value>> {
    v.get("data")
        .and_then(|d| d.get("items"))
        .and_then(Value::as_array)
}

fn top_level_items(v: &Value) -> Option<&Vec<Value>> {
    v.get("items").and_then(Value::as_array)
}

/// Known list shapes, tried in order.
const LIST_SHAPES: &[(&str, ShapeMatcher)] = &[
    ("array", bare_array),
    ("data", data_array),
    ("data.items", data_items),
    ("items", top_level_items),
];

/// Pull the raw list out of a listing response.
pub fn extract_items(value: &Value) -> Vec<Value> {
    for (shape, matcher) in LIST_SHAPES {
        if let Some(items) = matcher(value) {
            tracing::trace!(shape, len = items.len(), "matched list shape");
            return items.clone();
        }
    }
    tracing::debug!("unrecognized list shape, treating as empty");
    Vec::new()
}

/// Decode a listing response into typed items.
///
/// Unknown envelope shapes produce an empty list; an item that cannot be
/// decoded as `T` is an error.
pub fn extract_list<T: DeserializeOwned>(value: &Value) -> Result<Vec<T>> {
    extract_items(value)
        .into_iter()
        .map(|item| serde_json::from_value(item).map_err(ReplayError::from))
        .collect()
}
