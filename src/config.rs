//! Top-level application configuration.
//!
//! Configuration is stored in `<config dir>/replay/config.yaml` (or the path
//! named by `REPLAY_CONFIG`) and includes:
//! - API base URL and request timeouts
//! - The access token issued by `login`/`signup`
//!
//! `REPLAY_API_URL` and `REPLAY_TOKEN` take precedence over the file.

use std::env;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};

use crate::error::{ReplayError, Result};

pub const CONFIG_PATH_ENV: &str = "REPLAY_CONFIG";
pub const API_URL_ENV: &str = "REPLAY_API_URL";
pub const TOKEN_ENV: &str = "REPLAY_TOKEN";

/// Main configuration structure
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub api: ApiConfig,

    /// Authentication token
    #[serde(default)]
    pub auth: AuthConfig,
}

/// API connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiConfig {
    /// Server origin; endpoint paths are absolute (`/api/v1/...`)
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Total request timeout in seconds (default: 30)
    #[serde(default = "default_timeout")]
    pub timeout: u64,

    /// Connect timeout in seconds (default: 10)
    #[serde(default = "default_connect_timeout")]
    pub connect_timeout: u64,
}

fn default_base_url() -> String {
    "http://localhost:8000".to_string()
}

fn default_timeout() -> u64 {
    30
}

fn default_connect_timeout() -> u64 {
    10
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            timeout: default_timeout(),
            connect_timeout: default_connect_timeout(),
        }
    }
}

/// Authentication configuration
#[derive(Clone, Default, Serialize, Deserialize)]
pub struct AuthConfig {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub token: Option<String>,
}

impl fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AuthConfig")
            .field("token", &self.token.as_ref().map(|_| "[REDACTED]"))
            .finish()
    }
}

impl Config {
    /// Get the path to the config file
    pub fn config_path() -> Result<PathBuf> {
        if let Ok(path) = env::var(CONFIG_PATH_ENV)
            && !path.is_empty()
        {
            return Ok(PathBuf::from(path));
        }

        ProjectDirs::from("", "", "replay")
            .map(|dirs| dirs.config_dir().join("config.yaml"))
            .ok_or_else(|| {
                ReplayError::Config(format!(
                    "could not determine a config directory; set {CONFIG_PATH_ENV}"
                ))
            })
    }

    /// Load configuration from file, or return default if not found
    pub fn load() -> Result<Self> {
        Self::load_from(&Self::config_path()?)
    }

    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Config::default());
        }

        let content = fs::read_to_string(path).map_err(|e| {
            ReplayError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read config at {}: {}", path.display(), e),
            ))
        })?;
        let config: Config = serde_yaml_ng::from_str(&content)?;
        Ok(config)
    }

    /// Save configuration to `path`, readable by the owner only
    pub fn save_to(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                ReplayError::Io(std::io::Error::new(
                    e.kind(),
                    format!(
                        "Failed to create directory for config at {}: {}",
                        parent.display(),
                        e
                    ),
                ))
            })?;
        }

        let content = serde_yaml_ng::to_string(self)?;
        fs::write(path, content).map_err(|e| {
            ReplayError::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to write config at {}: {}", path.display(), e),
            ))
        })?;

        // Owner read/write only; the file holds an access token
        #[cfg(unix)]
        {
            use std::os::unix::fs::PermissionsExt;
            let permissions = std::fs::Permissions::from_mode(0o600);
            std::fs::set_permissions(path, permissions)?;
        }

        Ok(())
    }

    /// Get the API base URL from environment variable or config
    pub fn base_url(&self) -> String {
        if let Ok(url) = env::var(API_URL_ENV)
            && !url.is_empty()
        {
            return url;
        }
        self.api.base_url.clone()
    }

    /// Get the access token from environment variable or config
    pub fn token(&self) -> Option<String> {
        if let Ok(token) = env::var(TOKEN_ENV)
            && !token.is_empty()
        {
            return Some(token);
        }
        self.auth.token.clone()
    }

    pub fn set_token(&mut self, token: String) {
        self.auth.token = Some(token);
    }

    pub fn clear_token(&mut self) {
        self.auth.token = None;
    }

    /// Set a value by dotted key (`api.base_url`, `api.timeout`,
    /// `api.connect_timeout`, `auth.token`).
    pub fn set_value(&mut self, key: &str, value: &str) -> Result<()> {
        match key {
            "api.base_url" => {
                url::Url::parse(value)?;
                self.api.base_url = value.to_string();
            }
            "api.timeout" => self.api.timeout = parse_seconds(key, value)?,
            "api.connect_timeout" => self.api.connect_timeout = parse_seconds(key, value)?,
            "auth.token" => self.set_token(value.to_string()),
            _ => {
                return Err(ReplayError::Config(format!(
                    "unknown config key '{key}'. Valid keys: api.base_url, api.timeout, api.connect_timeout, auth.token"
                )));
            }
        }
        Ok(())
    }
}

fn parse_seconds(key: &str, value: &str) -> Result<u64> {
    value.parse::<u64>().map_err(|_| {
        ReplayError::Config(format!(
            "invalid value '{value}' for {key}: expected a number of seconds"
        ))
    })
}
