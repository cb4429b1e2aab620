//! Weather endpoint client.
//!
//! Thin wrapper over `GET {base}/weather`, queried either by coordinates
//! (`lat`, `lon`, `user_ip`) or by a combined `"city,UF"` name. The raw
//! payload shape lives in the private `hgbrasil` module and is converted
//! into the internal [`WeatherSnapshot`].

use crate::config::WeatherConfig;
use crate::models::WeatherSnapshot;
use crate::{Result, TempoError};
use std::time::Duration;
use tracing::debug;

/// Client for the current-conditions and forecast endpoint.
#[derive(Debug, Clone)]
pub struct WeatherClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl WeatherClient {
    /// Build a client from the weather configuration section.
    pub fn new(config: &WeatherConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(u64::from(config.timeout_seconds)))
            .build()
            .map_err(|e| TempoError::network(e.to_string()))?;

        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
        })
    }

    /// Fetch current conditions and forecast for a coordinate pair.
    pub async fn fetch_by_coordinates(
        &self,
        latitude: f64,
        longitude: f64,
    ) -> Result<WeatherSnapshot> {
        debug!(latitude, longitude, "fetching weather by coordinates");
        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[("key", self.api_key.as_str())])
            .query(&[("lat", latitude), ("lon", longitude)])
            .query(&[("user_ip", "remote")])
            .send()
            .await
            .map_err(|e| TempoError::network(e.to_string()))?;

        Self::decode(response).await
    }

    /// Fetch current conditions and forecast by a `"city,UF"` query string.
    pub async fn fetch_by_city(&self, query: &str) -> Result<WeatherSnapshot> {
        debug!(query, "fetching weather by city name");
        let response = self
            .client
            .get(format!("{}/weather", self.base_url))
            .query(&[("key", self.api_key.as_str()), ("city_name", query)])
            .send()
            .await
            .map_err(|e| TempoError::network(e.to_string()))?;

        Self::decode(response).await
    }

    async fn decode(response: reqwest::Response) -> Result<WeatherSnapshot> {
        let response = response
            .error_for_status()
            .map_err(|e| TempoError::network(e.to_string()))?;

        let envelope: hgbrasil::Envelope = response
            .json()
            .await
            .map_err(|e| TempoError::malformed(e.to_string()))?;

        Ok(envelope.results.into())
    }
}

/// Weather endpoint response structures and conversion utilities
mod hgbrasil {
    use crate::models::{ForecastDay, WeatherSnapshot};
    use chrono::Utc;
    use serde::Deserialize;

    /// Envelope wrapping the `results` object
    #[derive(Debug, Deserialize)]
    pub struct Envelope {
        pub results: Results,
    }

    /// Current conditions plus forecast as returned by the endpoint
    #[derive(Debug, Deserialize)]
    pub struct Results {
        pub temp: i32,
        #[serde(default)]
        pub humidity: u8,
        #[serde(default)]
        pub wind_speedy: String,
        #[serde(default)]
        pub condition_slug: String,
        /// "dia" or "noite"
        #[serde(default)]
        pub currently: String,
        /// Human-readable label, e.g. "São Paulo, SP"
        #[serde(default)]
        pub city: String,
        #[serde(default)]
        pub city_name: String,
        #[serde(default)]
        pub forecast: Vec<Day>,
    }

    /// One forecast day as returned by the endpoint
    #[derive(Debug, Deserialize)]
    pub struct Day {
        pub date: String,
        pub weekday: String,
        #[serde(default)]
        pub condition: String,
        pub max: i32,
        pub min: i32,
        #[serde(default)]
        pub rain_probability: u8,
    }

    impl From<Results> for WeatherSnapshot {
        fn from(results: Results) -> Self {
            WeatherSnapshot {
                temperature: results.temp,
                humidity_percent: results.humidity,
                wind_description: results.wind_speedy,
                condition: results.condition_slug,
                is_night: results.currently == "noite",
                location_label: results.city,
                city_name: results.city_name,
                forecast: results
                    .forecast
                    .into_iter()
                    .map(|day| ForecastDay {
                        date: day.date,
                        weekday: day.weekday,
                        condition: day.condition,
                        max: day.max,
                        min: day.min,
                        rain_probability: day.rain_probability,
                    })
                    .collect(),
                fetched_at: Utc::now(),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;

        const SAMPLE: &str = r#"{
            "results": {
                "temp": 24,
                "humidity": 68,
                "wind_speedy": "3.1 km/h",
                "condition_slug": "clear_night",
                "currently": "noite",
                "city": "São Paulo, SP",
                "city_name": "São Paulo",
                "forecast": [
                    {"date": "29/08", "weekday": "Sex", "condition": "clear_day",
                     "max": 27, "min": 16, "rain_probability": 10},
                    {"date": "30/08", "weekday": "Sáb", "condition": "rain",
                     "max": 22, "min": 15, "rain_probability": 80}
                ]
            }
        }"#;

        #[test]
        fn test_payload_converts_to_snapshot() {
            let envelope: Envelope = serde_json::from_str(SAMPLE).unwrap();
            let snapshot: WeatherSnapshot = envelope.results.into();

            assert_eq!(snapshot.temperature, 24);
            assert_eq!(snapshot.humidity_percent, 68);
            assert_eq!(snapshot.wind_description, "3.1 km/h");
            assert!(snapshot.is_night);
            assert_eq!(snapshot.location_label, "São Paulo, SP");
            assert_eq!(snapshot.forecast.len(), 2);
            assert_eq!(snapshot.forecast[1].rain_probability, 80);
        }

        #[test]
        fn test_daytime_payload_is_not_night() {
            let envelope: Envelope = serde_json::from_str(
                r#"{"results": {"temp": 30, "currently": "dia", "forecast": []}}"#,
            )
            .unwrap();
            let snapshot: WeatherSnapshot = envelope.results.into();
            assert!(!snapshot.is_night);
            assert!(snapshot.forecast.is_empty());
        }

        #[test]
        fn test_missing_results_is_rejected() {
            let parsed: std::result::Result<Envelope, _> = serde_json::from_str("{}");
            assert!(parsed.is_err());
        }
    }
}
