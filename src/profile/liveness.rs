//! Liveness flags for discarding stale asynchronous results.
//!
//! Each resolution source owns a [`Scope`]. Starting an invocation with
//! [`Scope::begin`] kills the previous invocation's [`Liveness`] and hands out
//! a fresh one. The invocation checks it after every suspension point and
//! drops its result if the flag is dead.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};

use parking_lot::Mutex;

/// Flag captured by one invocation before it issues a request.
#[derive(Debug, Clone)]
pub struct Liveness {
    alive: Arc<AtomicBool>,
    epoch: u64,
}

impl Liveness {
    fn new(epoch: u64) -> Self {
        Self {
            alive: Arc::new(AtomicBool::new(true)),
            epoch,
        }
    }

    pub fn is_alive(&self) -> bool {
        self.alive.load(Ordering::Acquire)
    }

    /// Sequence number of the invocation within its scope
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    fn kill(&self) {
        self.alive.store(false, Ordering::Release);
    }
}

/// Owner of the current invocation's liveness flag.
#[derive(Debug, Default)]
pub struct Scope {
    current: Mutex<Option<Liveness>>,
    epochs: AtomicU64,
}

impl Scope {
    pub fn new() -> Self {
        Self::default()
    }

    /// Supersede the running invocation (if any) and register a new one.
    pub fn begin(&self) -> Liveness {
        let epoch = self.epochs.fetch_add(1, Ordering::AcqRel) + 1;
        let next = Liveness::new(epoch);
        if let Some(previous) = self.current.lock().replace(next.clone()) {
            previous.kill();
        }
        next
    }

    /// Kill the running invocation without starting another.
    pub fn teardown(&self) {
        if let Some(previous) = self.current.lock().take() {
            previous.kill();
        }
    }
}
