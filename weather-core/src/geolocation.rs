//! Device position acquisition.

use std::{fmt::Debug, time::Duration};

use async_trait::async_trait;
use tracing::debug;

use crate::{error::GeolocationError, model::Coordinates};

/// One-shot position request options.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PositionOptions {
    pub timeout: Duration,
    pub high_accuracy: bool,
}

impl Default for PositionOptions {
    fn default() -> Self {
        Self { timeout: Duration::from_secs(10), high_accuracy: true }
    }
}

/// Source of the device position.
#[async_trait]
pub trait Locator: Send + Sync + Debug {
    async fn current_position(
        &self,
        options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError>;
}

/// Asks `locator` for a position, giving up after `options.timeout`.
pub async fn acquire_position(
    locator: &dyn Locator,
    options: &PositionOptions,
) -> Result<Coordinates, GeolocationError> {
    let coords = tokio::time::timeout(options.timeout, locator.current_position(options))
        .await
        .map_err(|_| GeolocationError::Timeout)??;

    if !coords.is_valid() {
        debug!(lat = coords.lat, lon = coords.lon, "locator returned out-of-range coordinates");
        return Err(GeolocationError::PositionUnavailable);
    }

    Ok(coords)
}

/// Locator for hosts without positioning hardware: coordinates are supplied up front.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocator {
    coords: Option<Coordinates>,
}

impl FixedLocator {
    pub fn new(coords: Option<Coordinates>) -> Self {
        Self { coords }
    }
}

#[async_trait]
impl Locator for FixedLocator {
    async fn current_position(
        &self,
        _options: &PositionOptions,
    ) -> Result<Coordinates, GeolocationError> {
        self.coords.ok_or(GeolocationError::Unsupported)
    }
}
