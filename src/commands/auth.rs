//! Session commands: `login`, `signup` and `logout`.

use std::sync::Arc;

use owo_colors::OwoColorize;
use parking_lot::Mutex;
use serde_json::json;

use super::CommandOutput;
use crate::api::{Backend, HttpBackend, LoginRequest, Role, SignupRequest};
use crate::config::Config;
use crate::error::{ReplayError, Result};
use crate::profile::{Host, LogoutAction, LogoutOutcome};
use crate::session::{AuthContext, StoredSession};

/// Host for one-shot terminal commands.
///
/// Alerts are collected so the command can report them once, through its
/// normal error path.
#[derive(Default)]
pub struct TerminalHost {
    alerts: Mutex<Vec<String>>,
}

impl TerminalHost {
    pub fn take_alerts(&self) -> Vec<String> {
        std::mem::take(&mut *self.alerts.lock())
    }
}

impl Host for TerminalHost {
    fn alert(&self, message: &str) {
        tracing::debug!("alert: {message}");
        self.alerts.lock().push(message.to_string());
    }

    fn reload(&self) {
        // Each invocation reloads the session from disk; nothing to restart.
        tracing::debug!("session reset, next command starts fresh");
    }
}

pub async fn cmd_login(email: &str, password: &str, output_json: bool) -> Result<()> {
    let config = Config::load()?;
    let backend = HttpBackend::from_config(&config)?;

    let token = backend
        .login(&LoginRequest {
            email: email.to_string(),
            password: password.to_string(),
        })
        .await?;

    StoredSession::load()?.login(token)?;
    tracing::info!("logged in as {email}");

    CommandOutput::new(json!({
        "logged_in": true,
        "email": email,
    }))
    .with_text(format!("{} Logged in as {}", "✓".green(), email.cyan()))
    .print(output_json)
}

/// Arguments for `replay signup`
pub struct SignupOptions {
    pub email: String,
    pub password: String,
    pub name: String,
    pub role: Role,
    pub admin_code: Option<String>,
    pub school_id: u64,
    pub club_id: u64,
}

pub async fn cmd_signup(options: SignupOptions, output_json: bool) -> Result<()> {
    if options.role == Role::Admin && options.admin_code.as_deref().is_none_or(str::is_empty) {
        return Err(ReplayError::Other(
            "--admin-code is required when signing up as ADMIN".to_string(),
        ));
    }

    let config = Config::load()?;
    let backend = HttpBackend::from_config(&config)?;

    let request = SignupRequest {
        email: options.email,
        password: options.password,
        name: options.name,
        role: options.role,
        admin_code: options.admin_code,
        school_id: options.school_id,
        club_id: options.club_id,
    };
    let token = backend.signup(&request).await?;

    StoredSession::load()?.login(token)?;

    CommandOutput::new(json!({
        "signed_up": true,
        "email": request.email,
        "name": request.name,
        "role": request.role.as_str(),
    }))
    .with_text(format!(
        "{} Signed up as {} ({})",
        "✓".green(),
        request.name.cyan(),
        request.email
    ))
    .print(output_json)
}

pub async fn cmd_logout(output_json: bool) -> Result<()> {
    let session = Arc::new(StoredSession::load()?);
    if !session.is_logged_in() {
        return Err(ReplayError::NotLoggedIn);
    }

    let config = Config::load()?;
    let backend = Arc::new(HttpBackend::from_config(&config)?);
    run_logout(backend, session).await?;

    CommandOutput::new(json!({ "logged_out": true }))
        .with_text(format!("{} Logged out", "✓".green()))
        .print(output_json)
}

/// Drive the logout action for a single terminal invocation.
///
/// No callback is passed, so a successful logout ends in the host's reload.
async fn run_logout<B: Backend, A: AuthContext>(backend: Arc<B>, auth: Arc<A>) -> Result<()> {
    let host = Arc::new(TerminalHost::default());
    let action = LogoutAction::new(backend, auth, host.clone());

    match action.logout(None).await {
        LogoutOutcome::Reloaded => Ok(()),
        LogoutOutcome::Failed(message) => {
            let alert = host.take_alerts().pop().unwrap_or(message);
            Err(ReplayError::Other(alert))
        }
        other => Err(ReplayError::Other(format!(
            "unexpected logout outcome: {other:?}"
        ))),
    }
}
