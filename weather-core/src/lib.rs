//! Core library for the `weather-lookup` CLI.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The WeatherAPI.com provider behind a provider trait
//! - The input pipeline: debounce, lookup, UI state transitions
//! - Presentation values and the rendered view
//!
//! It is used by `weather-lookup-cli`, but any front end that can feed raw
//! query text into [`App`] and draw [`View`]s can reuse it.

pub mod app;
pub mod config;
pub mod debounce;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod state;
pub mod view;

pub use app::App;
pub use config::Config;
pub use debounce::{DEFAULT_DEBOUNCE, DEFAULT_DEBOUNCE_MS, Debouncer};
pub use model::WeatherResult;
pub use presentation::{Presentation, TimeBucket, WeatherIcon};
pub use provider::{FetchError, NO_RESULTS_MESSAGE, WeatherProvider, provider_from_config};
pub use state::{FetchTicket, Phase, UiState};
pub use view::{Card, View};
