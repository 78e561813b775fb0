//! Browse screen state, actions and view model.
//!
//! The filter sheet edits a private draft. Nothing reaches the applied
//! filter until the draft is committed, and dismissing the sheet throws the
//! draft away.

use serde::Serialize;

use super::catalog::{CATEGORY_OPTIONS, LOCATION_OPTIONS, Listing, TAG_OPTIONS};
use super::filter::{Filter, FilterDraft, FilteredListing, filter_listings};

/// At most one overlay is open at a time.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum Overlay {
    #[default]
    Closed,
    FilterEditing(FilterDraft),
    LocationEditing,
}

#[derive(Debug, Clone, Default)]
pub struct BrowseState {
    pub listings: Vec<Listing>,
    pub query: String,
    pub applied: Filter,
    pub overlay: Overlay,
}

impl BrowseState {
    pub fn new(listings: Vec<Listing>) -> Self {
        Self {
            listings,
            ..Default::default()
        }
    }

    pub fn draft(&self) -> Option<&FilterDraft> {
        match &self.overlay {
            Overlay::FilterEditing(draft) => Some(draft),
            _ => None,
        }
    }

    /// Open the filter sheet with a draft seeded from the applied filter.
    pub fn open_filter_sheet(&mut self) {
        self.overlay = Overlay::FilterEditing(FilterDraft::from_filter(&self.applied));
    }

    /// No-op unless the sheet is open.
    pub fn toggle_draft_tag(&mut self, tag: &str) {
        if let Overlay::FilterEditing(draft) = &mut self.overlay {
            draft.toggle_tag(tag);
        }
    }

    /// No-op unless the sheet is open.
    pub fn set_draft_category(&mut self, label: &str) {
        if let Overlay::FilterEditing(draft) = &mut self.overlay {
            draft.set_category(label);
        }
    }

    /// Copy the draft into the applied filter and close the sheet.
    pub fn commit(&mut self) {
        if let Overlay::FilterEditing(draft) = std::mem::take(&mut self.overlay) {
            draft.apply_to(&mut self.applied);
        }
    }

    /// Close whatever overlay is open, discarding any draft.
    pub fn cancel(&mut self) {
        self.overlay = Overlay::Closed;
    }

    pub fn toggle_location_menu(&mut self) {
        self.overlay = match self.overlay {
            Overlay::LocationEditing => Overlay::Closed,
            _ => Overlay::LocationEditing,
        };
    }

    /// Apply a location immediately and close the menu.
    ///
    /// Ignored when the location menu is not open.
    pub fn select_location(&mut self, option: &str) {
        if self.overlay == Overlay::LocationEditing {
            self.applied.location = Some(option.to_string());
            self.overlay = Overlay::Closed;
        }
    }
}

/// Actions that can modify the browse state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BrowseAction {
    UpdateQuery(String),
    OpenFilterSheet,
    ToggleDraftTag(String),
    SetDraftCategory(String),
    ApplyFilter,
    CancelOverlay,
    ToggleLocationMenu,
    SelectLocation(String),
    SetListings(Vec<Listing>),
}

/// Pure reducer for the browse state
pub fn reduce_browse_state(mut state: BrowseState, action: BrowseAction) -> BrowseState {
    match action {
        BrowseAction::UpdateQuery(query) => state.query = query,
        BrowseAction::OpenFilterSheet => state.open_filter_sheet(),
        BrowseAction::ToggleDraftTag(tag) => state.toggle_draft_tag(&tag),
        BrowseAction::SetDraftCategory(label) => state.set_draft_category(&label),
        BrowseAction::ApplyFilter => state.commit(),
        BrowseAction::CancelOverlay => state.cancel(),
        BrowseAction::ToggleLocationMenu => state.toggle_location_menu(),
        BrowseAction::SelectLocation(option) => state.select_location(&option),
        BrowseAction::SetListings(listings) => state.listings = listings,
    }
    state
}

/// An option chip and whether it is currently selected
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OptionChip {
    pub label: &'static str,
    pub selected: bool,
}

#[derive(Debug, Clone, Serialize)]
pub struct BrowseViewModel {
    pub results: Vec<FilteredListing>,
    pub query: String,
    pub applied: Filter,
    pub is_filter_active: bool,
    pub is_location_active: bool,
    pub show_filter_sheet: bool,
    pub show_location_menu: bool,
    /// Category chips reflecting the draft; empty while the sheet is closed
    pub category_chips: Vec<OptionChip>,
    /// Tag chips reflecting the draft; empty while the sheet is closed
    pub tag_chips: Vec<OptionChip>,
    /// Location choices; empty while the menu is closed
    pub location_chips: Vec<OptionChip>,
}

pub fn compute_browse_view_model(state: &BrowseState) -> BrowseViewModel {
    let (category_chips, tag_chips) = match state.draft() {
        Some(draft) => (
            CATEGORY_OPTIONS
                .iter()
                .map(|&label| OptionChip {
                    label,
                    selected: draft.category.as_deref() == Some(label),
                })
                .collect(),
            TAG_OPTIONS
                .iter()
                .map(|&label| OptionChip {
                    label,
                    selected: draft.tags.contains(label),
                })
                .collect(),
        ),
        None => (vec![], vec![]),
    };

    let show_location_menu = state.overlay == Overlay::LocationEditing;
    let location_chips = if show_location_menu {
        LOCATION_OPTIONS
            .iter()
            .map(|&label| OptionChip {
                label,
                selected: state.applied.location.as_deref() == Some(label),
            })
            .collect()
    } else {
        vec![]
    };

    BrowseViewModel {
        results: filter_listings(&state.listings, &state.applied, &state.query),
        query: state.query.clone(),
        applied: state.applied.clone(),
        is_filter_active: state.applied.is_filter_active(),
        is_location_active: state.applied.is_location_active(),
        show_filter_sheet: state.draft().is_some(),
        show_location_menu,
        category_chips,
        tag_chips,
        location_chips,
    }
}
