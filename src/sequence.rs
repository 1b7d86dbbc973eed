//! Request sequencing
//!
//! Tags simulated requests with monotonic numbers so a container applies only
//! the result of the most recently issued request. Issuing and applying both
//! run under one lock, so no ticket can be issued between the "is this still
//! current" check and the state update that follows it.

use std::sync::{Mutex, MutexGuard};

/// Identifier of one issued request
pub type Ticket = u64;

/// Monotonic request counter with check-and-apply under a single lock
#[derive(Debug, Default)]
pub struct RequestSequence {
    latest: Mutex<Ticket>,
}

impl RequestSequence {
    pub fn new() -> Self {
        Self::default()
    }

    /// Issue a new ticket and run `f` before any later ticket can be issued
    pub fn issue_with<R>(&self, f: impl FnOnce() -> R) -> (Ticket, R) {
        let mut latest = self.lock();
        *latest += 1;
        let ticket = *latest;
        (ticket, f())
    }

    /// Run `f` only if `ticket` is still the latest issued
    pub fn apply_if_current<R>(&self, ticket: Ticket, f: impl FnOnce() -> R) -> Option<R> {
        let latest = self.lock();
        if *latest != ticket {
            return None;
        }
        let result = f();
        drop(latest);
        Some(result)
    }

    fn lock(&self) -> MutexGuard<'_, Ticket> {
        self.latest.lock().unwrap_or_else(|e| e.into_inner())
    }
}
