//! Geolocation port
//!
//! Abstracts over whatever source can tell where the user is.

use std::time::Duration;

use async_trait::async_trait;
use domain::GeoLocation;
#[cfg(test)]
use mockall::automock;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Options for a single position request
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PositionOptions {
    /// Prefer an accurate fix over a fast one
    pub high_accuracy: bool,
    /// How long the source may take before giving up
    pub timeout: Duration,
    /// Age of a cached position the source may return; zero forces a fresh fix
    pub maximum_age: Duration,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self {
            high_accuracy: true,
            timeout: Duration::from_secs(5),
            maximum_age: Duration::ZERO,
        }
    }
}

/// Why a position could not be obtained
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeolocationError {
    #[error("Please allow location access to see weather for your area")]
    PermissionDenied,

    #[error("Location information is unavailable: {0}")]
    PositionUnavailable(String),

    #[error("Location request timed out")]
    Timeout,

    #[error("Geolocation is not supported on this system")]
    Unsupported,
}

impl GeolocationError {
    /// Whether asking again might succeed
    #[must_use]
    pub const fn is_transient(&self) -> bool {
        matches!(self, Self::PositionUnavailable(_) | Self::Timeout)
    }
}

/// Port for position sources
#[cfg_attr(test, automock)]
#[async_trait]
pub trait GeolocationPort: Send + Sync {
    /// Get the current position once
    async fn current_position(
        &self,
        options: PositionOptions,
    ) -> Result<GeoLocation, GeolocationError>;
}
