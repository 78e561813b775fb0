//! Shared error handling for API endpoints.
//!
//! Every failing call is tagged with the endpoint it came from; the tag and
//! status code prefix the message shown to the user.

use std::fmt;

use crate::error::ReplayError;

/// Endpoints of the Replay API consumed by this client.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Endpoint {
    Profile,
    Logout,
    Schools,
    Clubs,
    Signup,
    Login,
}

impl Endpoint {
    /// Tag used as the prefix of status error messages (e.g. `PROFILE_401:...`)
    pub fn tag(self) -> &'static str {
        match self {
            Endpoint::Profile => "PROFILE",
            Endpoint::Logout => "LOGOUT",
            Endpoint::Schools => "SCHOOLS",
            Endpoint::Clubs => "CLUBS",
            Endpoint::Signup => "SIGNUP",
            Endpoint::Login => "LOGIN",
        }
    }
}

/// Non-2xx response from an endpoint.
#[derive(Debug)]
pub struct ApiError {
    /// HTTP status code
    pub status: reqwest::StatusCode,
    /// Response body text (may be empty)
    pub body: String,
    pub endpoint: Endpoint,
}

impl ApiError {
    pub fn new(endpoint: Endpoint, status: reqwest::StatusCode, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            endpoint,
        }
    }

    /// Render the message the way each endpoint family reports it.
    ///
    /// Auth endpoints surface the body verbatim (falling back to `HTTP <code>`),
    /// everything else is prefixed with the endpoint tag and status code.
    pub fn message(&self) -> String {
        match self.endpoint {
            Endpoint::Signup | Endpoint::Login => {
                if self.body.is_empty() {
                    format!("HTTP {}", self.status.as_u16())
                } else {
                    self.body.clone()
                }
            }
            _ => format!(
                "{}_{}:{}",
                self.endpoint.tag(),
                self.status.as_u16(),
                self.body
            ),
        }
    }
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message())
    }
}

impl From<ApiError> for ReplayError {
    fn from(error: ApiError) -> Self {
        ReplayError::Api {
            status: Some(error.status.as_u16()),
            message: error.message(),
        }
    }
}
