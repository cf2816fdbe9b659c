use serde::{Deserialize, Serialize};

/// Current conditions for one location, as returned by `current.json`.
///
/// The app only ever reads this; a new lookup replaces it wholesale.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WeatherResult {
    pub location: Location,
    pub current: Current,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Location {
    pub name: String,
    #[serde(default)]
    pub region: String,
    #[serde(default)]
    pub country: String,
    /// Wall-clock time at the location, e.g. `2024-06-01 14:00`.
    pub localtime: String,
    /// IANA zone id, e.g. `Europe/London`.
    pub tz_id: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Current {
    pub temp_c: f64,
    pub condition: Condition,
    #[serde(default)]
    pub wind_kph: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Condition {
    pub text: String,
}

impl WeatherResult {
    pub fn name(&self) -> &str {
        &self.location.name
    }

    pub fn region(&self) -> &str {
        &self.location.region
    }

    pub fn country(&self) -> &str {
        &self.location.country
    }

    pub fn localtime(&self) -> &str {
        &self.location.localtime
    }

    pub fn tz_id(&self) -> &str {
        &self.location.tz_id
    }

    pub fn temp_c(&self) -> f64 {
        self.current.temp_c
    }

    pub fn condition(&self) -> &str {
        &self.current.condition.text
    }

    pub fn wind_kph(&self) -> Option<f64> {
        self.current.wind_kph
    }
}
