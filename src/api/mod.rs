//! Client for the Replay HTTP API.
//!
//! The [`Backend`] trait is the seam between state resolution and the network:
//! [`HttpBackend`] talks to a live server, tests substitute scripted fakes.

pub mod client;
pub mod envelope;
pub mod error;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::Result;
use crate::session::AuthHeaders;

pub use client::HttpBackend;
pub use envelope::{ApiEnvelope, extract_items, extract_list};
pub use error::{ApiError, Endpoint};

/// Deserialize `null` the same as a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> std::result::Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    let value: Option<T> = Option::deserialize(deserializer)?;
    Ok(value.unwrap_or_default())
}

/// Account role. Values other than `USER`/`ADMIN` are kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum Role {
    User,
    Admin,
    Other(String),
}

impl Role {
    pub fn as_str(&self) -> &str {
        match self {
            Role::User => "USER",
            Role::Admin => "ADMIN",
            Role::Other(s) => s,
        }
    }
}

impl Default for Role {
    fn default() -> Self {
        Role::Other(String::new())
    }
}

impl From<String> for Role {
    fn from(s: String) -> Self {
        match s.as_str() {
            "USER" => Role::User,
            "ADMIN" => Role::Admin,
            _ => Role::Other(s),
        }
    }
}

impl From<Role> for String {
    fn from(role: Role) -> Self {
        match role {
            Role::Other(s) => s,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Role {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Ok(Role::from(s.to_uppercase()))
    }
}

/// The logged-in user's profile (`GET /api/v1/mypage/profile`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    pub id: u64,
    #[serde(default, deserialize_with = "null_as_default")]
    pub email: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub role: Role,
    /// Foreign reference; not guaranteed to exist in the school list
    #[serde(default)]
    pub school_id: Option<u64>,
    /// Foreign reference; not guaranteed to exist in the club list
    #[serde(default)]
    pub club_id: Option<u64>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct School {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub region: String,
    #[serde(deserialize_with = "null_as_default")]
    pub code: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Club {
    pub id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub school_id: u64,
    #[serde(deserialize_with = "null_as_default")]
    pub name: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub genre: String,
}

/// Body of `POST /api/v1/auth/signup`
#[derive(Debug, Clone, Serialize)]
pub struct SignupRequest {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub admin_code: Option<String>,
    pub school_id: u64,
    pub club_id: u64,
}

/// Body of `POST /api/v1/auth/login`
#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// Operations the client needs from the Replay API.
#[async_trait]
pub trait Backend: Send + Sync {
    /// Fetch the profile of the user identified by `auth`
    async fn fetch_profile(&self, auth: &AuthHeaders) -> Result<Profile>;

    /// Invalidate the server-side session
    async fn logout(&self, auth: &AuthHeaders) -> Result<()>;

    /// List all schools
    async fn fetch_schools(&self) -> Result<Vec<School>>;

    /// List the clubs of one school
    async fn fetch_clubs(&self, school_id: u64) -> Result<Vec<Club>>;

    /// Register an account, returning its access token
    async fn signup(&self, request: &SignupRequest) -> Result<String>;

    /// Exchange credentials for an access token
    async fn login(&self, request: &LoginRequest) -> Result<String>;
}
