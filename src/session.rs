//! Session capability consumed by state resolution.
//!
//! The core never stores credentials itself. It asks an [`AuthContext`]
//! whether the user is logged in and for the headers to attach to
//! authenticated calls. [`StoredSession`] is the implementation backed by the
//! config file.

use std::collections::BTreeMap;
use std::path::PathBuf;

use parking_lot::RwLock;
use secrecy::{ExposeSecret, SecretString};

use crate::config::Config;
use crate::error::Result;

/// Header name → value pairs attached to authenticated requests
pub type AuthHeaders = BTreeMap<String, String>;

/// Authentication capability injected into the orchestrator and actions.
pub trait AuthContext: Send + Sync {
    fn is_logged_in(&self) -> bool;

    /// Headers carrying the current credential; empty when logged out
    fn auth_header(&self) -> AuthHeaders;

    /// Drop the local credential
    fn logout(&self);

    /// Ask the user to log in
    fn open_login(&self);
}

/// `Authorization: Bearer <token>`
pub fn bearer_header(token: &str) -> AuthHeaders {
    let mut headers = AuthHeaders::new();
    headers.insert("Authorization".to_string(), format!("Bearer {token}"));
    headers
}

/// Token-backed session, optionally persisted to a config file.
pub struct StoredSession {
    token: RwLock<Option<SecretString>>,
    /// Config file to keep in sync; `None` keeps the session in memory only
    path: Option<PathBuf>,
}

impl StoredSession {
    /// Load the session from the config file (or `REPLAY_TOKEN`).
    pub fn load() -> Result<Self> {
        let path = Config::config_path()?;
        let config = Config::load_from(&path)?;
        Ok(Self {
            token: RwLock::new(config.token().map(SecretString::from)),
            path: Some(path),
        })
    }

    pub fn in_memory(token: Option<String>) -> Self {
        Self {
            token: RwLock::new(token.map(SecretString::from)),
            path: None,
        }
    }

    /// Store a freshly issued token.
    pub fn login(&self, token: String) -> Result<()> {
        if let Some(path) = &self.path {
            let mut config = Config::load_from(path)?;
            config.set_token(token.clone());
            config.save_to(path)?;
        }
        *self.token.write() = Some(SecretString::from(token));
        Ok(())
    }

    fn forget(&self) -> Result<()> {
        *self.token.write() = None;
        if let Some(path) = &self.path {
            let mut config = Config::load_from(path)?;
            config.clear_token();
            config.save_to(path)?;
        }
        Ok(())
    }
}

impl AuthContext for StoredSession {
    fn is_logged_in(&self) -> bool {
        self.token.read().is_some()
    }

    fn auth_header(&self) -> AuthHeaders {
        match self.token.read().as_ref() {
            Some(token) => bearer_header(token.expose_secret()),
            None => AuthHeaders::new(),
        }
    }

    fn logout(&self) {
        if let Err(e) = self.forget() {
            tracing::warn!("Failed to clear stored token: {e}");
        }
    }

    #[allow(clippy::print_stderr)]
    fn open_login(&self) {
        eprintln!("로그인이 필요합니다. Run `replay login --email <email>` first.");
    }
}
