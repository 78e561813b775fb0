//! Display values derived from the profile screen's sources.

use serde::Serialize;

use crate::api::{Club, Profile, Role, School};

use super::state::Resolution;

pub const LOADING_NAME: &str = "불러오는 중...";
pub const NO_AFFILIATION: &str = "학교/동아리 정보 없음";
pub const PROFILE_FETCH_FAILED: &str = "프로필 조회 실패";

/// Read-only view model of the profile header
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProfileView {
    pub display_name: String,
    pub role_label: String,
    pub school_name: String,
    pub club_name: String,
    /// Non-empty school and club names joined with a space
    pub meta_line: String,
    pub loading: bool,
    pub error: Option<String>,
}

impl ProfileView {
    /// Text for the affiliation row, falling back when nothing resolved.
    pub fn affiliation_line(&self) -> &str {
        if !self.meta_line.is_empty() {
            &self.meta_line
        } else if self.loading {
            ""
        } else {
            NO_AFFILIATION
        }
    }
}

pub fn role_label(role: &Role) -> &str {
    match role {
        Role::User => "이용자",
        Role::Admin => "관리자",
        Role::Other(s) => s,
    }
}

/// Reference ids of 0 mean "none", same as a missing id.
fn reference(id: Option<u64>) -> Option<u64> {
    id.filter(|id| *id != 0)
}

fn school_name(profile: Option<&Profile>, schools: &[School]) -> String {
    profile
        .and_then(|p| reference(p.school_id))
        .and_then(|id| schools.iter().find(|s| s.id == id))
        .map(|s| s.name.clone())
        .unwrap_or_default()
}

fn club_name(profile: Option<&Profile>, clubs: &[Club]) -> String {
    profile
        .and_then(|p| reference(p.club_id))
        .and_then(|id| clubs.iter().find(|c| c.id == id))
        .map(|c| c.name.clone())
        .unwrap_or_default()
}

/// School id the club list should be keyed by, if any.
pub fn club_dependency(profile: &Resolution<Option<Profile>>) -> Option<u64> {
    profile
        .ready()
        .and_then(Option::as_ref)
        .and_then(|p| reference(p.school_id))
}

pub fn derive_view(
    profile: &Resolution<Option<Profile>>,
    schools: &[School],
    clubs: &[Club],
) -> ProfileView {
    let loading = profile.is_pending();
    let current = profile.ready().and_then(Option::as_ref);

    let school_name = school_name(current, schools);
    let club_name = club_name(current, clubs);
    let meta_line = [school_name.as_str(), club_name.as_str()]
        .into_iter()
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(" ");

    let (display_name, role_label) = if loading {
        (LOADING_NAME.to_string(), String::new())
    } else {
        current
            .map(|p| (p.name.clone(), role_label(&p.role).to_string()))
            .unwrap_or_default()
    };

    ProfileView {
        display_name,
        role_label,
        school_name,
        club_name,
        meta_line,
        loading,
        error: profile.error().map(str::to_string),
    }
}
