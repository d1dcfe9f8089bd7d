//! Last-value-wins debounce timer.
//!
//! The host event loop owns time: it passes `now` into `push` and `poll`.

use std::time::{Duration, Instant};

#[derive(Debug, Clone)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

/// Holds back a changing value until it has been stable for `delay`.
#[derive(Debug, Clone)]
pub struct Debouncer<T> {
    delay: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Debouncer<T> {
    pub fn new(delay: Duration) -> Self {
        Self {
            delay,
            pending: None,
        }
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }

    /// Replaces any pending value and restarts the timer at `now`.
    pub fn push(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending {
            value,
            deadline: now + self.delay,
        });
    }

    /// Releases the pending value once its deadline has passed.
    pub fn poll(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(pending) if pending.deadline <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Deadline of the pending value, if any.
    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|pending| pending.deadline)
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    /// Drops the pending value without releasing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }
}
