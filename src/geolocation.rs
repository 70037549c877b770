//! One-shot position lookup

use std::time::Duration;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::error::{GeolocationFailure, RecFinderError, Result};

/// WGS84 coordinate pair
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Position {
    pub latitude: f64,
    pub longitude: f64,
}

impl Position {
    #[must_use]
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
        }
    }

    /// `[longitude, latitude]`, the GeoJSON / map order
    #[must_use]
    pub fn lng_lat(&self) -> [f64; 2] {
        [self.longitude, self.latitude]
    }
}

/// Something that can answer "where am I" once
#[async_trait]
pub trait PositionProvider: Send + Sync {
    async fn current_position(&self) -> std::result::Result<Position, GeolocationFailure>;
}

/// Position supplied up front, e.g. from command line coordinates
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedPosition(pub Option<Position>);

#[async_trait]
impl PositionProvider for FixedPosition {
    async fn current_position(&self) -> std::result::Result<Position, GeolocationFailure> {
        self.0.ok_or(GeolocationFailure::Unavailable)
    }
}

/// Status line shown while locating
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LocateStatus {
    Locating,
    Located,
    Failed,
}

impl LocateStatus {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            LocateStatus::Locating => "Locating…",
            LocateStatus::Located => "Your location is shown if permission is granted.",
            LocateStatus::Failed => "Unable to retrieve your location.",
        }
    }
}

/// Bounded one-shot position request; never retried
pub async fn locate<P: PositionProvider + ?Sized>(provider: &P, timeout: Duration) -> Result<Position> {
    info!("{}", LocateStatus::Locating.message());
    let outcome = tokio::time::timeout(timeout, provider.current_position())
        .await
        .unwrap_or(Err(GeolocationFailure::Timeout));

    match outcome {
        Ok(position) => {
            info!(
                "Located at ({:.4}, {:.4})",
                position.latitude, position.longitude
            );
            Ok(position)
        }
        Err(reason) => {
            warn!("Geolocation failed: {}", reason);
            Err(RecFinderError::geolocation(reason))
        }
    }
}
