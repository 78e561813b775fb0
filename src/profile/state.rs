//! State types for the profile screen

use serde::Serialize;

use crate::api::{Club, Profile, School};

use super::view::{ProfileView, derive_view};

/// Progress of one asynchronous source
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(tag = "state", content = "value", rename_all = "lowercase")]
pub enum Resolution<T> {
    #[default]
    Idle,
    Loading,
    Ready(T),
    Failed(String),
}

impl<T> Resolution<T> {
    /// Idle counts as loading: nothing definite is known yet.
    pub fn is_pending(&self) -> bool {
        matches!(self, Resolution::Idle | Resolution::Loading)
    }

    pub fn ready(&self) -> Option<&T> {
        match self {
            Resolution::Ready(value) => Some(value),
            _ => None,
        }
    }

    pub fn error(&self) -> Option<&str> {
        match self {
            Resolution::Failed(message) => Some(message),
            _ => None,
        }
    }
}

impl<T> Resolution<Vec<T>> {
    /// The resolved list, or an empty slice while unresolved
    pub fn items(&self) -> &[T] {
        self.ready().map(Vec::as_slice).unwrap_or(&[])
    }
}

/// Inputs the club list was last resolved for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ClubsKey {
    pub logged_in: bool,
    pub school_id: Option<u64>,
}

/// Raw state of the three sources behind the profile screen
#[derive(Debug, Clone, Default, Serialize)]
pub struct ProfileScreenState {
    /// `Ready(None)` when logged out
    pub profile: Resolution<Option<Profile>>,
    pub schools: Resolution<Vec<School>>,
    pub clubs: Resolution<Vec<Club>>,
    pub clubs_key: Option<ClubsKey>,
    /// Login state the school list was last resolved for
    pub schools_key: Option<bool>,
    /// Trigger of the most recent profile resolution
    pub trigger: u64,
}

impl ProfileScreenState {
    pub fn view(&self) -> ProfileView {
        derive_view(&self.profile, self.schools.items(), self.clubs.items())
    }
}
