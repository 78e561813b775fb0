//! Filtering logic for the browse screen
//!
//! A listing is shown when it passes the applied [`Filter`] and fuzzy-matches
//! the search query.

use std::collections::BTreeSet;

use fuzzy_matcher::FuzzyMatcher;
use fuzzy_matcher::skim::SkimMatcherV2;
use serde::Serialize;

use super::catalog::Listing;

/// Committed search filter
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Filter {
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
    /// Selected distance band; does not take part in [`Filter::matches`]
    pub location: Option<String>,
}

impl Filter {
    pub fn is_filter_active(&self) -> bool {
        self.category.is_some() || !self.tags.is_empty()
    }

    pub fn is_location_active(&self) -> bool {
        self.location.is_some()
    }

    /// Category must be equal when set; every selected tag must be present.
    pub fn matches(&self, listing: &Listing) -> bool {
        let category_ok = self
            .category
            .as_deref()
            .is_none_or(|category| listing.category == category);
        let tags_ok = self.tags.iter().all(|tag| listing.has_tag(tag));
        category_ok && tags_ok
    }
}

/// Scratch copy of the sheet-editable part of a [`Filter`]
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct FilterDraft {
    pub category: Option<String>,
    pub tags: BTreeSet<String>,
}

impl FilterDraft {
    pub fn from_filter(filter: &Filter) -> Self {
        Self {
            category: filter.category.clone(),
            tags: filter.tags.clone(),
        }
    }

    /// Add the tag if absent, remove it if present.
    pub fn toggle_tag(&mut self, tag: &str) {
        if !self.tags.remove(tag) {
            self.tags.insert(tag.to_string());
        }
    }

    /// Select a category; selecting the current one clears it.
    pub fn set_category(&mut self, label: &str) {
        if self.category.as_deref() == Some(label) {
            self.category = None;
        } else {
            self.category = Some(label.to_string());
        }
    }

    /// Write category and tags into `filter`, leaving location alone.
    pub fn apply_to(self, filter: &mut Filter) {
        filter.category = self.category;
        filter.tags = self.tags;
    }
}

/// A listing with its fuzzy match score and matched title indices
#[derive(Debug, Clone, Serialize)]
pub struct FilteredListing {
    pub listing: Listing,
    pub score: i64,
    pub title_indices: Vec<usize>,
}

/// Apply `filter` and then the fuzzy `query` to `listings`, keeping their order.
pub fn filter_listings(listings: &[Listing], filter: &Filter, query: &str) -> Vec<FilteredListing> {
    let query = query.trim();
    let candidates = listings.iter().filter(|l| filter.matches(l));

    if query.is_empty() {
        return candidates
            .map(|l| FilteredListing {
                listing: l.clone(),
                score: 0,
                title_indices: vec![],
            })
            .collect();
    }

    let matcher = SkimMatcherV2::default().smart_case();

    candidates
        .filter_map(|listing| {
            let search_text = format!(
                "{} {} {} {}",
                listing.title,
                listing.school,
                listing.category,
                listing.tags.join(" "),
            );

            matcher
                .fuzzy_indices(&search_text, query)
                .map(|(score, indices)| {
                    let title_len = listing.title.chars().count();
                    FilteredListing {
                        listing: listing.clone(),
                        score,
                        title_indices: indices.into_iter().filter(|&i| i < title_len).collect(),
                    }
                })
        })
        .collect()
}
