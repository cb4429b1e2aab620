//! Device geolocation capability.
//!
//! Terminal hosts have no GPS, so the production provider sources a fixed
//! position from configuration; permission is granted only when coordinates
//! are configured. The flow depends on the trait, which lets tests substitute
//! granting, denying, or failing providers.

use crate::config::GeolocationConfig;
use crate::{Result, TempoError};
use async_trait::async_trait;

/// Outcome of a foreground location permission request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PermissionStatus {
    Granted,
    Denied,
}

/// A coordinate pair from the device capability.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Position {
    /// Latitude in decimal degrees
    pub latitude: f64,
    /// Longitude in decimal degrees
    pub longitude: f64,
}

/// External capability returning permission status and a coordinate pair.
#[async_trait]
pub trait GeolocationProvider: Send + Sync {
    /// Request foreground location permission.
    async fn request_permission(&self) -> Result<PermissionStatus>;

    /// Obtain the current position. Only meaningful after permission
    /// was granted.
    async fn current_position(&self) -> Result<Position>;
}

/// Provider backed by a fixed position from configuration.
pub struct ConfiguredPosition {
    position: Option<Position>,
}

impl ConfiguredPosition {
    /// Build the provider from the `[geolocation]` configuration section.
    #[must_use]
    pub fn from_config(config: &GeolocationConfig) -> Self {
        let position = match (config.latitude, config.longitude) {
            (Some(latitude), Some(longitude)) => Some(Position {
                latitude,
                longitude,
            }),
            _ => None,
        };
        Self { position }
    }
}

#[async_trait]
impl GeolocationProvider for ConfiguredPosition {
    async fn request_permission(&self) -> Result<PermissionStatus> {
        Ok(if self.position.is_some() {
            PermissionStatus::Granted
        } else {
            PermissionStatus::Denied
        })
    }

    async fn current_position(&self) -> Result<Position> {
        self.position
            .ok_or_else(|| TempoError::geolocation("no position configured"))
    }
}
