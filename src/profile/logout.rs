//! Logout action for the profile screen.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::Backend;
use crate::session::AuthContext;

/// Capabilities of the surface the client runs in.
pub trait Host: Send + Sync {
    /// Show a notification the user has to acknowledge
    fn alert(&self, message: &str);

    /// Restart the client from scratch
    fn reload(&self);
}

/// How a logout attempt ended
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogoutOutcome {
    /// Another logout was still pending; nothing was done
    AlreadyInFlight,
    /// Session cleared and the caller's callback ran
    LoggedOut,
    /// Session cleared and no callback was given, so the host reloaded
    Reloaded,
    /// Remote call failed; the session is untouched
    Failed(String),
}

/// Releases the in-flight flag when dropped, whichever way the attempt ends.
struct InFlightGuard<'a>(&'a AtomicBool);

impl<'a> InFlightGuard<'a> {
    fn acquire(flag: &'a AtomicBool) -> Option<Self> {
        flag.compare_exchange(false, true, Ordering::AcqRel, Ordering::Acquire)
            .ok()
            .map(|_| Self(flag))
    }
}

impl Drop for InFlightGuard<'_> {
    fn drop(&mut self) {
        self.0.store(false, Ordering::Release);
    }
}

pub type LoggedOutCallback<'a> = Box<dyn FnOnce() + Send + 'a>;

pub struct LogoutAction<B, A, H> {
    backend: Arc<B>,
    auth: Arc<A>,
    host: Arc<H>,
    in_flight: AtomicBool,
}

impl<B: Backend, A: AuthContext, H: Host> LogoutAction<B, A, H> {
    pub fn new(backend: Arc<B>, auth: Arc<A>, host: Arc<H>) -> Self {
        Self {
            backend,
            auth,
            host,
            in_flight: AtomicBool::new(false),
        }
    }

    pub fn is_in_flight(&self) -> bool {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Log out remotely, then locally.
    ///
    /// The local session is cleared only after the server accepted the
    /// logout. On failure the user is alerted and may try again.
    pub async fn logout(&self, on_logged_out: Option<LoggedOutCallback<'_>>) -> LogoutOutcome {
        let Some(_guard) = InFlightGuard::acquire(&self.in_flight) else {
            tracing::debug!("logout already in flight, ignoring");
            return LogoutOutcome::AlreadyInFlight;
        };

        let headers = self.auth.auth_header();
        match self.backend.logout(&headers).await {
            Ok(()) => {
                self.auth.logout();
                match on_logged_out {
                    Some(callback) => {
                        callback();
                        LogoutOutcome::LoggedOut
                    }
                    None => {
                        self.host.reload();
                        LogoutOutcome::Reloaded
                    }
                }
            }
            Err(e) => {
                tracing::warn!("Logout failed: {e}");
                let message = format!("로그아웃 실패: {e}");
                self.host.alert(&message);
                LogoutOutcome::Failed(message)
            }
        }
    }
}
