//! `replay browse`: search listings from a local file.
//!
//! Command-line flags are replayed as browse actions, so the printed result
//! is exactly what the screen would show after the same interactions.

use std::collections::BTreeSet;
use std::path::PathBuf;

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::browse::{
    BrowseAction, BrowseState, BrowseViewModel, FilteredListing, compute_browse_view_model,
    load_listings, reduce_browse_state,
};
use crate::error::Result;

pub struct BrowseOptions {
    pub items: PathBuf,
    pub query: Option<String>,
    pub category: Option<String>,
    pub tags: Vec<String>,
    pub location: Option<String>,
}

/// Translate flags into the actions a user would perform on the screen.
fn actions_for(options: &BrowseOptions) -> Vec<BrowseAction> {
    let mut actions = Vec::new();

    if let Some(query) = &options.query {
        actions.push(BrowseAction::UpdateQuery(query.clone()));
    }

    // Toggling twice would deselect, so repeat flags collapse to one tap.
    let tags: BTreeSet<&String> = options.tags.iter().collect();
    if options.category.is_some() || !tags.is_empty() {
        actions.push(BrowseAction::OpenFilterSheet);
        if let Some(category) = &options.category {
            actions.push(BrowseAction::SetDraftCategory(category.clone()));
        }
        actions.extend(tags.into_iter().map(|t| BrowseAction::ToggleDraftTag(t.clone())));
        actions.push(BrowseAction::ApplyFilter);
    }

    if let Some(location) = &options.location {
        actions.push(BrowseAction::ToggleLocationMenu);
        actions.push(BrowseAction::SelectLocation(location.clone()));
    }

    actions
}

pub fn cmd_browse(options: BrowseOptions, output_json: bool) -> Result<()> {
    let listings = load_listings(&options.items)?;
    tracing::debug!("loaded {} listings from {}", listings.len(), options.items.display());

    let state = actions_for(&options)
        .into_iter()
        .fold(BrowseState::new(listings), reduce_browse_state);
    let vm = compute_browse_view_model(&state);

    CommandOutput::new(json!({
        "results": vm.results,
        "query": vm.query,
        "filter": vm.applied,
        "is_filter_active": vm.is_filter_active,
        "is_location_active": vm.is_location_active,
    }))
    .with_text(format_view_model(&vm))
    .print(output_json)
}

fn highlight_title(result: &FilteredListing) -> String {
    if result.title_indices.is_empty() {
        return result.listing.title.clone();
    }
    result
        .listing
        .title
        .chars()
        .enumerate()
        .map(|(i, c)| {
            if result.title_indices.contains(&i) {
                c.yellow().bold().to_string()
            } else {
                c.to_string()
            }
        })
        .collect()
}

fn format_view_model(vm: &BrowseViewModel) -> String {
    let mut out = String::new();

    if vm.is_filter_active {
        let mut chips: Vec<&str> = vm.applied.category.iter().map(String::as_str).collect();
        chips.extend(vm.applied.tags.iter().map(String::as_str));
        out.push_str(&format!("{} {}\n", "필터:".cyan(), chips.join(" · ")));
    }
    if let Some(location) = &vm.applied.location {
        out.push_str(&format!("{} {}\n", "위치:".cyan(), location));
    }

    if vm.results.is_empty() {
        out.push_str(&"No listings found".dimmed().to_string());
        return out;
    }

    for result in &vm.results {
        let listing = &result.listing;
        out.push_str(&format!(
            "{} [{}] {}",
            format!("#{}", listing.id).cyan(),
            listing.category,
            highlight_title(result),
        ));
        if !listing.school.is_empty() {
            out.push_str(&format!(" - {}", listing.school));
        }
        if !listing.price.is_empty() {
            out.push_str(&format!("  {}", listing.price.green()));
        }
        if !listing.tags.is_empty() {
            out.push_str(&format!("  {}", listing.tags.join(", ").dimmed()));
        }
        out.push('\n');
    }

    out.trim_end().to_string()
}
