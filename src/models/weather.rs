//! Weather snapshot model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current conditions plus the multi-day outlook for one location.
///
/// Produced fresh on every successful fetch; a new snapshot fully replaces
/// the previous one, never merges with it.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeatherSnapshot {
    /// Temperature in Celsius
    pub temperature: i32,
    /// Relative humidity percentage (0-100)
    pub humidity_percent: u8,
    /// Human-readable wind description, e.g. "3.1 km/h"
    pub wind_description: String,
    /// Condition slug from the API, e.g. "clear_day", "rain"
    pub condition: String,
    /// Whether the API reports night time at the location
    pub is_night: bool,
    /// Human-readable location label, e.g. "São Paulo, SP"
    pub location_label: String,
    /// Plain city name without the state suffix
    pub city_name: String,
    /// Multi-day outlook, earliest day first, order as returned by the API
    pub forecast: Vec<ForecastDay>,
    /// When this snapshot was fetched
    pub fetched_at: DateTime<Utc>,
}

impl WeatherSnapshot {
    /// Today's forecast entry (the first day, when present)
    #[must_use]
    pub fn today(&self) -> Option<&ForecastDay> {
        self.forecast.first()
    }
}

/// One entry in the multi-day outlook.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ForecastDay {
    /// Day/month label, e.g. "29/08"
    pub date: String,
    /// Abbreviated weekday name, e.g. "Sex"
    pub weekday: String,
    /// Condition slug for the day
    pub condition: String,
    /// Maximum temperature in Celsius
    pub max: i32,
    /// Minimum temperature in Celsius
    pub min: i32,
    /// Rain probability percentage (0-100)
    pub rain_probability: u8,
}
