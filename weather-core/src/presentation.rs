//! Display-only values derived from a [`WeatherResult`].
//!
//! Everything here is a pure function of the result and an explicit `now`.

use chrono::{DateTime, NaiveDateTime, Timelike, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::WeatherResult;

/// Time-of-day bucket driving the background image.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeBucket {
    Dawn,
    Morning,
    Afternoon,
    Night,
    #[default]
    Default,
}

impl TimeBucket {
    /// Hours 0, 6, 12 and 18 sit on strict bounds and fall through to
    /// [`TimeBucket::Default`].
    pub fn from_hour(hour: u32) -> Self {
        if (1..6).contains(&hour) {
            TimeBucket::Dawn
        } else if (7..12).contains(&hour) {
            TimeBucket::Morning
        } else if (13..18).contains(&hour) {
            TimeBucket::Afternoon
        } else if (19..24).contains(&hour) {
            TimeBucket::Night
        } else {
            TimeBucket::Default
        }
    }

    /// Bucket for the current hour at the result's location.
    pub fn for_result(result: &WeatherResult, now: DateTime<Utc>) -> Self {
        let tz = location_tz(result.tz_id());
        Self::from_hour(now.with_timezone(&tz).hour())
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            TimeBucket::Dawn => "dawn",
            TimeBucket::Morning => "morning",
            TimeBucket::Afternoon => "afternoon",
            TimeBucket::Night => "night",
            TimeBucket::Default => "default",
        }
    }

    pub fn asset_path(&self) -> &'static str {
        match self {
            TimeBucket::Dawn => "/dawn.jpg",
            TimeBucket::Morning => "/morning.jpg",
            TimeBucket::Afternoon => "/afternoon.jpg",
            TimeBucket::Night => "/night.jpg",
            TimeBucket::Default => "/bg.jpg",
        }
    }
}

impl std::fmt::Display for TimeBucket {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum WeatherIcon {
    Sun,
    Cloud,
    CloudSun,
    Snowflake,
    CloudRain,
    Bolt,
    Smog,
    CloudShowersHeavy,
}

impl WeatherIcon {
    /// Case-insensitive exact match on the condition text. Anything
    /// unlisted gets the plain cloud.
    pub fn from_condition(text: &str) -> Self {
        match text.to_lowercase().as_str() {
            "sunny" => WeatherIcon::Sun,
            "cloudy" => WeatherIcon::Cloud,
            "partly cloudy" => WeatherIcon::CloudSun,
            "snow" => WeatherIcon::Snowflake,
            "rain" | "light rain" | "showers" => WeatherIcon::CloudRain,
            "thunderstorm" | "storm" | "thunder" => WeatherIcon::Bolt,
            "fog" | "mist" | "haze" => WeatherIcon::Smog,
            "heavy rain" | "downpour" => WeatherIcon::CloudShowersHeavy,
            _ => WeatherIcon::Cloud,
        }
    }

    pub fn glyph(&self) -> &'static str {
        match self {
            WeatherIcon::Sun => "☀",
            WeatherIcon::Cloud => "☁",
            WeatherIcon::CloudSun => "⛅",
            WeatherIcon::Snowflake => "❄",
            WeatherIcon::CloudRain => "🌧",
            WeatherIcon::Bolt => "⚡",
            WeatherIcon::Smog => "🌫",
            WeatherIcon::CloudShowersHeavy => "⛈",
        }
    }
}

/// Resolve an IANA zone id, falling back to UTC for ids we don't know.
pub fn location_tz(tz_id: &str) -> Tz {
    tz_id.parse().unwrap_or_else(|_| {
        warn!(tz_id, "unknown time zone, falling back to UTC");
        Tz::UTC
    })
}

/// 12-hour clock (`hh:mm`) and its AM/PM marker at `tz`.
pub fn clock(tz: Tz, now: DateTime<Utc>) -> (String, String) {
    let local = now.with_timezone(&tz);
    (local.format("%I:%M").to_string(), local.format("%p").to_string())
}

/// Short calendar date (`Sat, 01 Jun`) read straight from the location's
/// own wall-clock timestamp. Empty if the timestamp can't be parsed.
pub fn short_date(localtime: &str) -> String {
    NaiveDateTime::parse_from_str(localtime.trim(), "%Y-%m-%d %H:%M")
        .map(|dt| dt.format("%a, %d %b").to_string())
        .unwrap_or_default()
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Presentation {
    pub clock: String,
    pub meridiem: String,
    pub date: String,
    pub background: TimeBucket,
    pub icon: WeatherIcon,
}

impl Presentation {
    pub fn derive(result: &WeatherResult, now: DateTime<Utc>) -> Self {
        let tz = location_tz(result.tz_id());
        let (clock, meridiem) = clock(tz, now);

        Self {
            clock,
            meridiem,
            date: short_date(result.localtime()),
            background: TimeBucket::from_hour(now.with_timezone(&tz).hour()),
            icon: WeatherIcon::from_condition(result.condition()),
        }
    }
}
