//! `replay profile`: resolve and print the profile header.

use std::sync::Arc;

use owo_colors::OwoColorize;
use serde_json::json;

use super::CommandOutput;
use crate::api::HttpBackend;
use crate::config::Config;
use crate::error::Result;
use crate::profile::{ProfileOrchestrator, ProfileView};
use crate::session::{AuthContext, StoredSession};

pub async fn cmd_profile(output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let session = Arc::new(StoredSession::load()?);
    let backend = Arc::new(HttpBackend::from_config(&config)?);

    let logged_in = session.is_logged_in();
    let orchestrator = ProfileOrchestrator::new(backend, session.clone());
    orchestrator.refresh(1).await;
    let state = orchestrator.snapshot();
    orchestrator.teardown();

    let view = state.view();

    if !logged_in && !output_json {
        session.open_login();
    }

    CommandOutput::new(json!({
        "logged_in": logged_in,
        "view": view,
        "profile": state.profile,
        "schools": state.schools.items().len(),
        "clubs": state.clubs.items().len(),
    }))
    .with_text(format_view(&view, logged_in))
    .print(output_json)
}

fn format_view(view: &ProfileView, logged_in: bool) -> String {
    let mut out = String::new();

    if let Some(error) = &view.error {
        out.push_str(&format!("{}\n", error.red()));
    }

    if logged_in {
        out.push_str(&view.display_name.bold().to_string());
        if !view.role_label.is_empty() {
            out.push_str(&format!("  {}", view.role_label.dimmed()));
        }
        out.push('\n');
    }

    let affiliation = view.affiliation_line();
    if !affiliation.is_empty() {
        out.push_str(&affiliation.cyan().to_string());
    }

    out.trim_end().to_string()
}
