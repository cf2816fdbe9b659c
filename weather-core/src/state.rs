//! UI state container and its transitions.
//!
//! Phases: Idle -> Loading -> Success | Failure, back to Idle when the query
//! is cleared, or straight to Loading on any new committed query.

use chrono::{DateTime, Utc};
use tracing::debug;

use crate::{
    WeatherResult,
    presentation::TimeBucket,
    provider::{FetchError, NO_RESULTS_MESSAGE},
};

/// Identifies one outbound lookup. Only the most recently issued ticket may
/// change what is displayed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    seq: u64,
    query: String,
}

impl FetchTicket {
    pub fn seq(&self) -> u64 {
        self.seq
    }

    pub fn query(&self) -> &str {
        &self.query
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    Idle,
    Loading,
    Success,
    Failure,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UiState {
    loading: bool,
    error: String,
    result: Option<WeatherResult>,
    background: TimeBucket,
    committed: String,
    latest: u64,
}

impl UiState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn loading(&self) -> bool {
        self.loading
    }

    /// Empty when there is no error.
    pub fn error(&self) -> &str {
        &self.error
    }

    pub fn result(&self) -> Option<&WeatherResult> {
        self.result.as_ref()
    }

    pub fn background(&self) -> TimeBucket {
        self.background
    }

    /// The query last applied by [`UiState::commit`]; empty initially.
    pub fn committed_query(&self) -> &str {
        &self.committed
    }

    /// Loading wins over whatever result or error is still held.
    pub fn phase(&self) -> Phase {
        if self.loading {
            Phase::Loading
        } else if self.result.is_some() {
            Phase::Success
        } else if !self.error.is_empty() {
            Phase::Failure
        } else {
            Phase::Idle
        }
    }

    /// Apply a committed query.
    ///
    /// A query equal to the current one changes nothing and returns `None`.
    /// An empty query clears everything and returns `None`; lookups still in
    /// flight will be discarded when they settle. Otherwise the state enters
    /// loading and the returned ticket must accompany the outcome.
    pub fn commit(&mut self, query: &str) -> Option<FetchTicket> {
        if query == self.committed {
            debug!(query, "query unchanged");
            return None;
        }

        self.latest += 1;
        self.committed = query.to_string();

        if query.is_empty() {
            debug!("query cleared");
            self.result = None;
            self.error.clear();
            self.loading = false;
            return None;
        }

        debug!(query, seq = self.latest, "query committed");
        self.loading = true;
        Some(FetchTicket { seq: self.latest, query: query.to_string() })
    }

    /// Apply the outcome of a lookup. Returns `false` and leaves the state
    /// untouched when the ticket has been superseded.
    pub fn settle(
        &mut self,
        ticket: &FetchTicket,
        outcome: Result<WeatherResult, FetchError>,
        now: DateTime<Utc>,
    ) -> bool {
        if ticket.seq != self.latest {
            debug!(
                query = ticket.query(),
                seq = ticket.seq,
                latest = self.latest,
                "discarding stale response"
            );
            return false;
        }

        self.loading = false;
        match outcome {
            Ok(result) => {
                self.background = TimeBucket::for_result(&result, now);
                self.result = Some(result);
                self.error.clear();
            }
            Err(err) => {
                debug!(query = ticket.query(), error = %err, "lookup failed");
                self.result = None;
                self.error = NO_RESULTS_MESSAGE.to_string();
            }
        }
        true
    }
}
