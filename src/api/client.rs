//! HTTP implementation of [`Backend`] on top of reqwest.
//!
//! # Security Note - Logging
//!
//! Credential headers are marked sensitive before they are attached to a
//! request, so reqwest's `Debug` output shows them as `Sensitive`. Values that
//! pass through this module's own logging are wrapped in [`RedactedHeader`].

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{self, HeaderName, HeaderValue};
use reqwest::{Client, Method, RequestBuilder};
use serde::Serialize;
use serde_json::Value;
use url::Url;

use crate::config::Config;
use crate::error::{ReplayError, Result};
use crate::session::AuthHeaders;

use super::envelope::{ApiEnvelope, extract_list};
use super::error::{ApiError, Endpoint};
use super::{Backend, Club, LoginRequest, Profile, School, SignupRequest};

const PROFILE_PATH: &str = "/api/v1/mypage/profile";
const LOGOUT_PATH: &str = "/api/v1/auth/logout";
const SCHOOLS_PATH: &str = "/api/v1/schools";
const SIGNUP_PATH: &str = "/api/v1/auth/signup";
const LOGIN_PATH: &str = "/api/v1/auth/login";

/// Wrapper for sensitive header values that redacts the value when formatted.
struct RedactedHeader {
    value: String,
}

impl RedactedHeader {
    fn new(value: &str) -> Self {
        Self {
            value: value.to_string(),
        }
    }

    fn as_header_value(&self) -> Result<HeaderValue> {
        let mut value = HeaderValue::from_str(&self.value)
            .map_err(|_| ReplayError::Auth(format!("invalid credential header {self}")))?;
        value.set_sensitive(true);
        Ok(value)
    }
}

impl fmt::Display for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[REDACTED]")
    }
}

impl fmt::Debug for RedactedHeader {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RedactedHeader")
            .field("value", &"[REDACTED]")
            .finish()
    }
}

/// Replay API client
pub struct HttpBackend {
    client: Client,
    base_url: Url,
}

impl HttpBackend {
    /// Create a client from configuration (base URL and timeouts).
    pub fn from_config(config: &Config) -> Result<Self> {
        Self::with_timeouts(
            &config.base_url(),
            Duration::from_secs(config.api.timeout),
            Duration::from_secs(config.api.connect_timeout),
        )
    }

    fn with_timeouts(base_url: &str, timeout: Duration, connect_timeout: Duration) -> Result<Self> {
        let base_url = Url::parse(base_url)?;
        let client = Client::builder()
            .timeout(timeout)
            .connect_timeout(connect_timeout)
            .build()?;
        Ok(Self { client, base_url })
    }

    fn request(&self, method: Method, path: &str) -> Result<RequestBuilder> {
        let url = self.base_url.join(path)?;
        Ok(self
            .client
            .request(method, url)
            .header(header::ACCEPT, HeaderValue::from_static("application/json")))
    }

    fn with_auth(builder: RequestBuilder, auth: &AuthHeaders) -> Result<RequestBuilder> {
        let mut builder = builder;
        for (name, value) in auth {
            let name = HeaderName::from_bytes(name.as_bytes())
                .map_err(|_| ReplayError::Auth(format!("invalid header name '{name}'")))?;
            builder = builder.header(name, RedactedHeader::new(value).as_header_value()?);
        }
        Ok(builder)
    }

    /// Send a request and return the body text of a 2xx response.
    ///
    /// Failing to read the body is treated as an empty body, so the status
    /// still decides the outcome.
    async fn send(&self, endpoint: Endpoint, builder: RequestBuilder) -> Result<String> {
        tracing::debug!(endpoint = endpoint.tag(), "sending request");
        let response = builder.send().await?;
        let status = response.status();
        let text = response.text().await.unwrap_or_default();

        if !status.is_success() {
            tracing::debug!(
                endpoint = endpoint.tag(),
                status = status.as_u16(),
                "request failed"
            );
            return Err(ApiError::new(endpoint, status, text).into());
        }
        Ok(text)
    }

    async fn get_list<T: serde::de::DeserializeOwned>(
        &self,
        endpoint: Endpoint,
        path: &str,
    ) -> Result<Vec<T>> {
        let text = self.send(endpoint, self.request(Method::GET, path)?).await?;
        let parsed: Value = serde_json::from_str(&text)?;
        extract_list(&parsed)
    }

    async fn post_envelope<B: Serialize + Sync>(
        &self,
        endpoint: Endpoint,
        path: &str,
        body: &B,
        fallback: &str,
    ) -> Result<String> {
        let builder = self.request(Method::POST, path)?.json(body);
        let text = self.send(endpoint, builder).await?;
        if text.is_empty() {
            return Err(ReplayError::Envelope(fallback.to_string()));
        }
        let envelope: ApiEnvelope<String> = serde_json::from_str(&text)?;
        envelope.into_result(fallback)
    }
}

fn clubs_path(school_id: u64) -> String {
    format!("{SCHOOLS_PATH}/{school_id}/clubs")
}

#[async_trait]
impl Backend for HttpBackend {
    async fn fetch_profile(&self, auth: &AuthHeaders) -> Result<Profile> {
        let builder = Self::with_auth(self.request(Method::GET, PROFILE_PATH)?, auth)?;
        let text = self.send(Endpoint::Profile, builder).await?;
        Ok(serde_json::from_str(&text)?)
    }

    async fn logout(&self, auth: &AuthHeaders) -> Result<()> {
        let builder = Self::with_auth(self.request(Method::POST, LOGOUT_PATH)?, auth)?;
        self.send(Endpoint::Logout, builder).await?;
        Ok(())
    }

    async fn fetch_schools(&self) -> Result<Vec<School>> {
        self.get_list(Endpoint::Schools, SCHOOLS_PATH).await
    }

    async fn fetch_clubs(&self, school_id: u64) -> Result<Vec<Club>> {
        self.get_list(Endpoint::Clubs, &clubs_path(school_id)).await
    }

    async fn signup(&self, request: &SignupRequest) -> Result<String> {
        self.post_envelope(Endpoint::Signup, SIGNUP_PATH, request, "signup failed")
            .await
    }

    async fn login(&self, request: &LoginRequest) -> Result<String> {
        self.post_envelope(Endpoint::Login, LOGIN_PATH, request, "login failed")
            .await
    }
}
