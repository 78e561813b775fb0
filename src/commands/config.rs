//! Configuration commands.
//!
//! - `config show`: Display current configuration
//! - `config set`: Set a configuration value

use owo_colors::OwoColorize;
use serde_json::json;

use super::{CommandOutput, mask_sensitive_value};
use crate::config::Config;
use crate::error::Result;

/// Show current configuration
pub fn cmd_config_show(output_json: bool) -> Result<()> {
    let path = Config::config_path()?;
    let config = Config::load_from(&path)?;
    let token = config.token();

    let json_output = json!({
        "api": {
            "base_url": config.base_url(),
            "timeout": config.api.timeout,
            "connect_timeout": config.api.connect_timeout,
        },
        "auth": {
            "token_configured": token.is_some(),
        },
        "config_file": path.to_string_lossy(),
    });

    let token_status = match &token {
        Some(t) => mask_sensitive_value(t).green().to_string(),
        None => "not configured".dimmed().to_string(),
    };

    let mut text_output = String::new();
    text_output.push_str(&format!("{}\n\n", "Configuration:".cyan().bold()));
    text_output.push_str(&format!("{}:\n", "api".cyan()));
    text_output.push_str(&format!("  base_url: {}\n", config.base_url()));
    text_output.push_str(&format!("  timeout: {}s\n", config.api.timeout));
    text_output.push_str(&format!(
        "  connect_timeout: {}s\n\n",
        config.api.connect_timeout
    ));
    text_output.push_str(&format!("{}:\n", "auth".cyan()));
    text_output.push_str(&format!("  token: {token_status}\n\n"));
    text_output.push_str(
        &format!("Config file: {}", path.display())
            .dimmed()
            .to_string(),
    );

    CommandOutput::new(json_output)
        .with_text(text_output)
        .print(output_json)
}

/// Set a configuration value
pub fn cmd_config_set(key: &str, value: &str, output_json: bool) -> Result<()> {
    let path = Config::config_path()?;
    let mut config = Config::load_from(&path)?;
    config.set_value(key, value)?;
    config.save_to(&path)?;

    let shown = if key == "auth.token" {
        mask_sensitive_value(value)
    } else {
        value.to_string()
    };

    CommandOutput::new(json!({
        "key": key,
        "value": shown,
        "config_file": path.to_string_lossy(),
    }))
    .with_text(format!("Set {} = {}", key.cyan(), shown))
    .print(output_json)
}
