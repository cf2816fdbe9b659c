use std::fmt;

use chrono::{DateTime, Utc};

use crate::{
    presentation::{Presentation, TimeBucket, WeatherIcon},
    state::{Phase, UiState},
};

pub const LOADING_TEXT: &str = "Loading...";

/// Result card for a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Card {
    pub location: String,
    pub icon: WeatherIcon,
    pub temperature: String,
    pub clock: String,
    pub meridiem: String,
    pub date: String,
    pub background: TimeBucket,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    Idle,
    Loading,
    Success(Card),
    Failure(String),
}

impl View {
    pub fn of(state: &UiState, now: DateTime<Utc>) -> Self {
        match (state.phase(), state.result()) {
            (Phase::Loading, _) => View::Loading,
            (Phase::Success, Some(result)) => {
                let p = Presentation::derive(result, now);
                View::Success(Card {
                    location: result.name().to_string(),
                    icon: p.icon,
                    temperature: result.temp_c().to_string(),
                    clock: p.clock,
                    meridiem: p.meridiem,
                    date: p.date,
                    background: state.background(),
                })
            }
            (Phase::Failure, _) => View::Failure(state.error().to_string()),
            _ => View::Idle,
        }
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            View::Idle => Ok(()),
            View::Loading => f.write_str(LOADING_TEXT),
            View::Failure(message) => f.write_str(message),
            View::Success(card) => {
                writeln!(f, "{}", card.location)?;
                writeln!(f, "{} {} °c", card.icon.glyph(), card.temperature)?;
                writeln!(f, "{} {}", card.clock, card.meridiem)?;
                writeln!(f, "{}", card.date)?;
                write!(f, "[background: {}]", card.background.asset_path())
            }
        }
    }
}
