//! Quiet-period debouncing of raw input.
//!
//! Every [`Debouncer::push`] restarts the countdown; only the last value
//! pushed before a full quiet period elapses is ever committed.

use std::time::Duration;

use tokio::time::{self, Instant};

pub const DEFAULT_DEBOUNCE_MS: u64 = 500;
pub const DEFAULT_DEBOUNCE: Duration = Duration::from_millis(DEFAULT_DEBOUNCE_MS);

#[derive(Debug)]
struct Pending<T> {
    value: T,
    deadline: Instant,
}

#[derive(Debug)]
pub struct Debouncer<T> {
    quiet: Duration,
    pending: Option<Pending<T>>,
}

impl<T> Default for Debouncer<T> {
    fn default() -> Self {
        Self::new(DEFAULT_DEBOUNCE)
    }
}

impl<T> Debouncer<T> {
    pub fn new(quiet: Duration) -> Self {
        Self { quiet, pending: None }
    }

    pub fn quiet(&self) -> Duration {
        self.quiet
    }

    /// Replace the pending value and restart the countdown.
    pub fn push(&mut self, value: T) {
        self.push_at(value, Instant::now());
    }

    pub fn push_at(&mut self, value: T, now: Instant) {
        self.pending = Some(Pending { value, deadline: now + self.quiet });
    }

    pub fn deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|p| p.deadline)
    }

    pub fn is_idle(&self) -> bool {
        self.pending.is_none()
    }

    /// Take the pending value if its quiet period has elapsed by `now`.
    pub fn take_due(&mut self, now: Instant) -> Option<T> {
        match &self.pending {
            Some(p) if p.deadline <= now => self.pending.take().map(|p| p.value),
            _ => None,
        }
    }

    /// Wait for the next commit.
    ///
    /// Never resolves while idle. Cancel-safe: dropping the future before it
    /// resolves leaves the pending value in place.
    pub async fn committed(&mut self) -> T {
        loop {
            let Some(deadline) = self.deadline() else {
                return std::future::pending().await;
            };
            time::sleep_until(deadline).await;
            if let Some(value) = self.take_due(Instant::now()) {
                return value;
            }
        }
    }
}
