pub mod api;
pub mod browse;
pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod profile;
pub mod session;

#[cfg(test)]
mod test_support;

pub use api::{Backend, Club, HttpBackend, Profile, Role, School};
pub use browse::{
    BrowseAction, BrowseState, BrowseViewModel, Filter, Listing, compute_browse_view_model,
    reduce_browse_state,
};
pub use config::Config;
pub use error::{ReplayError, Result};
pub use profile::{LogoutAction, LogoutOutcome, ProfileOrchestrator, ProfileView};
pub use session::{AuthContext, StoredSession};
