//! Data models for the `Tempo` application
//!
//! This module contains the core domain models organized by concern:
//! - Location: selected state/city pair, picker options, the state table
//! - Weather: current conditions snapshot and forecast days

pub mod location;
pub mod weather;

// Re-export all public types for convenient access
pub use location::{CityOption, LocationSelection, STATES, state_name};
pub use weather::{ForecastDay, WeatherSnapshot};
