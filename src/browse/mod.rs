//! Marketplace browse screen: search, the filter sheet and the location menu.

mod catalog;
mod filter;
mod model;

pub use catalog::{CATEGORY_OPTIONS, LOCATION_OPTIONS, Listing, TAG_OPTIONS, load_listings};
pub use filter::{Filter, FilterDraft, FilteredListing, filter_listings};
pub use model::{
    BrowseAction, BrowseState, BrowseViewModel, OptionChip, Overlay, compute_browse_view_model,
    reduce_browse_state,
};
