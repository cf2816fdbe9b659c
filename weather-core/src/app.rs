//! The input-to-display pipeline: raw query -> debounce -> fetch -> state.
//!
//! All state lives in [`App`] and is only touched from [`App::run`]'s loop.
//! Lookups run as spawned tasks and report back over a channel.

use std::{sync::Arc, time::Duration};

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use tracing::debug;

use crate::{
    WeatherResult,
    debounce::Debouncer,
    provider::{FetchError, WeatherProvider},
    state::{FetchTicket, UiState},
};

type Settled = (FetchTicket, Result<WeatherResult, FetchError>);

pub struct App {
    provider: Arc<dyn WeatherProvider>,
    debouncer: Debouncer<String>,
    state: UiState,
    frames: mpsc::UnboundedSender<UiState>,
    settled_tx: mpsc::UnboundedSender<Settled>,
    settled_rx: mpsc::UnboundedReceiver<Settled>,
    in_flight: usize,
    clock: fn() -> DateTime<Utc>,
}

impl App {
    /// Build the pipeline. Every state change is sent to `frames`.
    pub fn new(
        provider: Arc<dyn WeatherProvider>,
        debounce: Duration,
        frames: mpsc::UnboundedSender<UiState>,
    ) -> Self {
        let (settled_tx, settled_rx) = mpsc::unbounded_channel();
        Self {
            provider,
            debouncer: Debouncer::new(debounce),
            state: UiState::new(),
            frames,
            settled_tx,
            settled_rx,
            in_flight: 0,
            clock: Utc::now,
        }
    }

    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    /// Drive the pipeline until `input` closes and all pending work has
    /// settled. Each message on `input` is the full raw query text.
    pub async fn run(mut self, mut input: mpsc::Receiver<String>) -> UiState {
        let mut input_open = true;

        while input_open || !self.debouncer.is_idle() || self.in_flight > 0 {
            tokio::select! {
                raw = input.recv(), if input_open => match raw {
                    Some(raw) => self.debouncer.push(raw),
                    None => input_open = false,
                },
                query = self.debouncer.committed() => self.commit(query),
                Some((ticket, outcome)) = self.settled_rx.recv() => self.settle(ticket, outcome),
            }
        }

        self.state
    }

    fn commit(&mut self, query: String) {
        if query == self.state.committed_query() {
            debug!(query, "committed query unchanged");
            return;
        }
        match self.state.commit(&query) {
            Some(ticket) => self.spawn_fetch(ticket),
            None => debug!("empty query, no lookup"),
        }
        self.publish();
    }

    fn spawn_fetch(&mut self, ticket: FetchTicket) {
        let provider = Arc::clone(&self.provider);
        let tx = self.settled_tx.clone();
        self.in_flight += 1;

        tokio::spawn(async move {
            let outcome = provider.get_weather(ticket.query()).await;
            // Receiver only goes away when the app itself is dropped.
            let _ = tx.send((ticket, outcome));
        });
    }

    fn settle(&mut self, ticket: FetchTicket, outcome: Result<WeatherResult, FetchError>) {
        self.in_flight = self.in_flight.saturating_sub(1);
        if self.state.settle(&ticket, outcome, (self.clock)()) {
            self.publish();
        }
    }

    fn publish(&self) {
        let _ = self.frames.send(self.state.clone());
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        debounce::DEFAULT_DEBOUNCE,
        presentation::TimeBucket,
        state::Phase,
        view::View,
    };
    use async_trait::async_trait;
    use chrono::TimeZone;
    use reqwest::StatusCode;
    use std::sync::Mutex;
    use tokio::time::{self, Instant};

    /// Answers London and Paris, fails everything else. `slow` takes 2s.
    #[derive(Debug, Default)]
    struct FakeProvider {
        requests: Mutex<Vec<String>>,
    }

    impl FakeProvider {
        fn requests(&self) -> Vec<String> {
            self.requests.lock().unwrap().clone()
        }
    }

    fn body(name: &str) -> WeatherResult {
        serde_json::from_str(&format!(
            r#"{{"location":{{"name":"{name}","tz_id":"Europe/London","localtime":"2024-06-01 14:00"}},
                "current":{{"temp_c":18,"condition":{{"text":"Cloudy"}}}}}}"#
        ))
        .unwrap()
    }

    #[async_trait]
    impl WeatherProvider for FakeProvider {
        async fn get_weather(&self, query: &str) -> Result<WeatherResult, FetchError> {
            self.requests.lock().unwrap().push(query.to_string());
            let latency = if query == "Paris" { 2000 } else { 100 };
            time::sleep(Duration::from_millis(latency)).await;

            match query {
                "London" | "Paris" => Ok(body(query)),
                _ => Err(FetchError::Status {
                    status: StatusCode::BAD_REQUEST,
                    message: "No matching location found.".into(),
                }),
            }
        }
    }

    fn fixed_now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 6, 1, 13, 0, 0).unwrap()
    }

    struct Harness {
        provider: Arc<FakeProvider>,
        input: mpsc::Sender<String>,
        frames: mpsc::UnboundedReceiver<UiState>,
        app: tokio::task::JoinHandle<UiState>,
    }

    fn harness() -> Harness {
        let provider = Arc::new(FakeProvider::default());
        let (frames_tx, frames) = mpsc::unbounded_channel();
        let (input, input_rx) = mpsc::channel(16);
        let app = App::new(provider.clone(), DEFAULT_DEBOUNCE, frames_tx).with_clock(fixed_now);
        let app = tokio::spawn(app.run(input_rx));
        Harness { provider, input, frames, app }
    }

    impl Harness {
        async fn type_text(&self, raw: &str) {
            self.input.send(raw.to_string()).await.unwrap();
        }

        async fn finish(self) -> (UiState, Vec<UiState>, Vec<String>) {
            drop(self.input);
            let state = self.app.await.unwrap();
            let mut frames = self.frames;
            let mut seen = Vec::new();
            while let Ok(frame) = frames.try_recv() {
                seen.push(frame);
            }
            (state, seen, self.provider.requests())
        }
    }

    #[tokio::test(start_paused = true)]
    async fn fast_typing_issues_one_request() {
        let h = harness();

        h.type_text("Lon").await;
        time::sleep(Duration::from_millis(200)).await;
        h.type_text("London").await;

        let (state, frames, requests) = h.finish().await;

        assert_eq!(requests, vec!["London".to_string()]);
        assert_eq!(state.result().unwrap().name(), "London");
        assert_eq!(state.background(), TimeBucket::Afternoon);

        let View::Success(card) = View::of(&state, fixed_now()) else {
            panic!("expected a result card");
        };
        assert_eq!(card.location, "London");
        assert_eq!(card.temperature, "18");

        let phases: Vec<Phase> = frames.iter().map(UiState::phase).collect();
        assert_eq!(phases, vec![Phase::Loading, Phase::Success]);
    }

    #[tokio::test(start_paused = true)]
    async fn nothing_happens_before_quiet_period() {
        let h = harness();
        let start = Instant::now();

        h.type_text("London").await;
        time::sleep(Duration::from_millis(499)).await;
        assert!(h.provider.requests().is_empty());

        time::sleep(Duration::from_millis(2)).await;
        assert_eq!(h.provider.requests(), vec!["London".to_string()]);
        assert!(start.elapsed() >= DEFAULT_DEBOUNCE);

        h.finish().await;
    }

    #[tokio::test(start_paused = true)]
    async fn retyping_same_city_does_not_refetch() {
        let h = harness();

        h.type_text("London").await;
        time::sleep(Duration::from_secs(1)).await;
        h.type_text("Londo").await;
        time::sleep(Duration::from_millis(100)).await;
        h.type_text("London").await;

        let (state, frames, requests) = h.finish().await;

        assert_eq!(requests, vec!["London".to_string()]);
        assert_eq!(state.result().unwrap().name(), "London");
        let phases: Vec<Phase> = frames.iter().map(UiState::phase).collect();
        assert_eq!(phases, vec![Phase::Loading, Phase::Success]);
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_while_idle_publishes_nothing() {
        let h = harness();

        h.type_text("Lon").await;
        time::sleep(Duration::from_millis(100)).await;
        h.type_text("").await;

        let (state, frames, requests) = h.finish().await;

        assert!(requests.is_empty());
        assert!(frames.is_empty());
        assert_eq!(state.phase(), Phase::Idle);
    }

    #[tokio::test(start_paused = true)]
    async fn unknown_city_shows_fixed_message() {
        let h = harness();

        h.type_text("zzzznotacity").await;

        let (state, frames, requests) = h.finish().await;

        assert_eq!(requests, vec!["zzzznotacity".to_string()]);
        assert_eq!(View::of(&state, fixed_now()), View::Failure("No results found...".into()));
        assert!(state.result().is_none());
        assert_eq!(frames.last().map(UiState::phase), Some(Phase::Failure));
    }

    #[tokio::test(start_paused = true)]
    async fn clearing_query_skips_network() {
        let h = harness();

        h.type_text("London").await;
        time::sleep(Duration::from_secs(1)).await;
        h.type_text("").await;

        let (state, frames, requests) = h.finish().await;

        assert_eq!(requests, vec!["London".to_string()]);
        assert_eq!(state.phase(), Phase::Idle);
        assert_eq!(state.error(), "");
        let phases: Vec<Phase> = frames.iter().map(UiState::phase).collect();
        assert_eq!(phases, vec![Phase::Loading, Phase::Success, Phase::Idle]);
    }

    #[tokio::test(start_paused = true)]
    async fn loading_ends_once_per_query() {
        let h = harness();

        h.type_text("London").await;
        time::sleep(Duration::from_secs(1)).await;
        h.type_text("zzzznotacity").await;

        let (_, frames, _) = h.finish().await;

        let loading: Vec<bool> = frames.iter().map(UiState::loading).collect();
        assert_eq!(loading, vec![true, false, true, false]);
        for frame in frames.iter().filter(|f| !f.loading()) {
            assert_eq!(frame.result().is_some(), frame.error().is_empty());
        }
    }

    #[tokio::test(start_paused = true)]
    async fn slow_stale_response_is_not_displayed() {
        let h = harness();

        h.type_text("Paris").await;
        time::sleep(Duration::from_millis(600)).await;
        h.type_text("London").await;

        let (state, frames, requests) = h.finish().await;

        assert_eq!(requests, vec!["Paris".to_string(), "London".to_string()]);
        assert_eq!(state.result().unwrap().name(), "London");
        assert!(frames.iter().all(|f| f.result().is_none_or(|r| r.name() != "Paris")));
    }
}
