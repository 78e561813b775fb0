//! Scripted fakes for the injected capabilities.
//!
//! Each fake call pops the next scripted response. A response may be gated
//! on a oneshot channel so a test can decide exactly when it completes.

use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use tokio::sync::oneshot;

use crate::api::{Backend, Club, LoginRequest, Profile, School, SignupRequest};
use crate::error::{ReplayError, Result};
use crate::profile::Host;
use crate::session::{AuthContext, AuthHeaders, bearer_header};

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    Profile,
    Logout,
    Schools,
    Clubs(u64),
    Signup,
    Login,
}

struct Scripted<T> {
    gate: Option<oneshot::Receiver<()>>,
    result: Result<T>,
}

struct Script<T>(Mutex<VecDeque<Scripted<T>>>);

impl<T> Default for Script<T> {
    fn default() -> Self {
        Self(Mutex::new(VecDeque::new()))
    }
}

impl<T> Script<T> {
    fn push(&self, result: Result<T>) {
        self.0.lock().push_back(Scripted { gate: None, result });
    }

    fn push_gated(&self, result: Result<T>) -> oneshot::Sender<()> {
        let (tx, rx) = oneshot::channel();
        self.0.lock().push_back(Scripted {
            gate: Some(rx),
            result,
        });
        tx
    }

    async fn next(&self, what: &str) -> Result<T> {
        let scripted = self.0.lock().pop_front();
        match scripted {
            Some(Scripted { gate, result }) => {
                if let Some(gate) = gate {
                    let _ = gate.await;
                }
                result
            }
            None => Err(ReplayError::Other(format!("unscripted {what} call"))),
        }
    }
}

#[derive(Default)]
pub struct FakeBackend {
    profiles: Script<Profile>,
    logouts: Script<()>,
    schools: Script<Vec<School>>,
    clubs: Script<Vec<Club>>,
    tokens: Script<String>,
    calls: Mutex<Vec<Call>>,
}

impl FakeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push_profile(&self, result: Result<Profile>) {
        self.profiles.push(result);
    }

    pub fn push_profile_gated(&self, result: Result<Profile>) -> oneshot::Sender<()> {
        self.profiles.push_gated(result)
    }

    pub fn push_logout(&self, result: Result<()>) {
        self.logouts.push(result);
    }

    pub fn push_logout_gated(&self, result: Result<()>) -> oneshot::Sender<()> {
        self.logouts.push_gated(result)
    }

    pub fn push_schools(&self, result: Result<Vec<School>>) {
        self.schools.push(result);
    }

    pub fn push_schools_gated(&self, result: Result<Vec<School>>) -> oneshot::Sender<()> {
        self.schools.push_gated(result)
    }

    pub fn push_clubs(&self, result: Result<Vec<Club>>) {
        self.clubs.push(result);
    }

    pub fn push_clubs_gated(&self, result: Result<Vec<Club>>) -> oneshot::Sender<()> {
        self.clubs.push_gated(result)
    }

    pub fn push_token(&self, result: Result<String>) {
        self.tokens.push(result);
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().clone()
    }

    fn record(&self, call: Call) {
        self.calls.lock().push(call);
    }
}

#[async_trait]
impl Backend for FakeBackend {
    async fn fetch_profile(&self, _auth: &AuthHeaders) -> Result<Profile> {
        self.record(Call::Profile);
        self.profiles.next("profile").await
    }

    async fn logout(&self, _auth: &AuthHeaders) -> Result<()> {
        self.record(Call::Logout);
        self.logouts.next("logout").await
    }

    async fn fetch_schools(&self) -> Result<Vec<School>> {
        self.record(Call::Schools);
        self.schools.next("schools").await
    }

    async fn fetch_clubs(&self, school_id: u64) -> Result<Vec<Club>> {
        self.record(Call::Clubs(school_id));
        self.clubs.next("clubs").await
    }

    async fn signup(&self, _request: &SignupRequest) -> Result<String> {
        self.record(Call::Signup);
        self.tokens.next("signup").await
    }

    async fn login(&self, _request: &LoginRequest) -> Result<String> {
        self.record(Call::Login);
        self.tokens.next("login").await
    }
}

pub struct FakeAuth {
    logged_in: AtomicBool,
    pub logouts: AtomicUsize,
    pub login_prompts: AtomicUsize,
}

impl FakeAuth {
    pub fn new(logged_in: bool) -> Self {
        Self {
            logged_in: AtomicBool::new(logged_in),
            logouts: AtomicUsize::new(0),
            login_prompts: AtomicUsize::new(0),
        }
    }

    pub fn set_logged_in(&self, logged_in: bool) {
        self.logged_in.store(logged_in, Ordering::SeqCst);
    }
}

impl AuthContext for FakeAuth {
    fn is_logged_in(&self) -> bool {
        self.logged_in.load(Ordering::SeqCst)
    }

    fn auth_header(&self) -> AuthHeaders {
        if self.is_logged_in() {
            bearer_header("fake-token")
        } else {
            AuthHeaders::new()
        }
    }

    fn logout(&self) {
        self.logouts.fetch_add(1, Ordering::SeqCst);
        self.logged_in.store(false, Ordering::SeqCst);
    }

    fn open_login(&self) {
        self.login_prompts.fetch_add(1, Ordering::SeqCst);
    }
}

#[derive(Default)]
pub struct FakeHost {
    pub alerts: Mutex<Vec<String>>,
    pub reloads: AtomicUsize,
}

impl Host for FakeHost {
    fn alert(&self, message: &str) {
        self.alerts.lock().push(message.to_string());
    }

    fn reload(&self) {
        self.reloads.fetch_add(1, Ordering::SeqCst);
    }
}

pub fn api_error(status: u16, message: &str) -> ReplayError {
    ReplayError::Api {
        status: Some(status),
        message: message.to_string(),
    }
}
