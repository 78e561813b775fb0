mod auth;
mod browse;
mod config;
mod lists;
mod profile;

pub use auth::{SignupOptions, TerminalHost, cmd_login, cmd_logout, cmd_signup};
pub use browse::{BrowseOptions, cmd_browse};
pub use config::{cmd_config_set, cmd_config_show};
pub use lists::{cmd_clubs, cmd_schools};
pub use profile::cmd_profile;

use serde_json::Value;

use crate::error::Result;

/// Output of a command in both machine and human form
pub struct CommandOutput {
    json: Value,
    text: Option<String>,
}

impl CommandOutput {
    pub fn new(json: Value) -> Self {
        Self { json, text: None }
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    /// Print JSON when requested, otherwise the text form (falling back to JSON).
    pub fn print(self, output_json: bool) -> Result<()> {
        match self.text {
            Some(text) if !output_json => {
                println!("{text}");
                Ok(())
            }
            _ => print_json(&self.json),
        }
    }
}

pub fn print_json(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

/// Mask a sensitive value by showing only the first 2 and last 2 characters
pub fn mask_sensitive_value(value: &str) -> String {
    let char_count = value.chars().count();
    if char_count > 4 {
        let first: String = value.chars().take(2).collect();
        let last: String = value.chars().skip(char_count - 2).collect();
        format!("{first}...{last}")
    } else {
        "****".to_string()
    }
}
