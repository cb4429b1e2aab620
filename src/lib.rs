//! `Tempo` - Terminal weather screen for Brazilian locations
//!
//! This library provides the location-resolution and weather-refresh flow:
//! resolving the user's position (device geolocation or a manual state/city
//! pick), fetching conditions and forecast from the weather endpoint, and
//! keeping the persisted last-known location in sync with the display.

pub mod config;
pub mod error;
pub mod geolocation;
pub mod models;
pub mod regions;
pub mod resolver;
pub mod store;
pub mod ui;
pub mod weather;

// Re-export core types for public API
pub use config::TempoConfig;
pub use error::{ErrorKind, ErrorNotice, TempoError};
pub use geolocation::{ConfiguredPosition, GeolocationProvider, PermissionStatus, Position};
pub use models::{CityOption, ForecastDay, LocationSelection, WeatherSnapshot};
pub use regions::RegionDirectoryClient;
pub use resolver::{LocationFlow, ViewState};
pub use store::LocationStore;
pub use weather::WeatherClient;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Core result type used throughout the library
pub type Result<T> = std::result::Result<T, TempoError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_version_is_set() {
        assert!(!VERSION.is_empty());
    }
}
