use async_trait::async_trait;
use tokio::sync::RwLock;
use tracing::debug;

use crate::types::lat_lng::LatLng;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LocationError {
    /// The device has no way to report a position.
    Unsupported,
    Denied,
    Unavailable,
}

impl std::fmt::Display for LocationError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            LocationError::Unsupported => write!(f, "Geolocation is not supported"),
            LocationError::Denied => write!(f, "Geolocation permission denied"),
            LocationError::Unavailable => write!(f, "Position unavailable"),
        }
    }
}

impl std::error::Error for LocationError {}

#[async_trait]
pub trait LocationProvider: Send + Sync {
    async fn current_position(&self) -> Result<LatLng, LocationError>;
}

/// Position pushed by the device over `PUT /device-location`. A device that
/// declines to share its position reports a denial instead.
pub struct ReportedLocation {
    last: RwLock<Result<LatLng, LocationError>>,
}

impl Default for ReportedLocation {
    fn default() -> Self {
        ReportedLocation {
            last: RwLock::new(Err(LocationError::Unavailable)),
        }
    }
}

impl ReportedLocation {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn report(&self, position: LatLng) {
        debug!("Device reported position {}", position);
        *self.last.write().await = Ok(position);
    }

    pub async fn report_denied(&self) {
        debug!("Device denied geolocation");
        *self.last.write().await = Err(LocationError::Denied);
    }
}

#[async_trait]
impl LocationProvider for ReportedLocation {
    async fn current_position(&self) -> Result<LatLng, LocationError> {
        *self.last.read().await
    }
}

pub struct FixedLocation(pub LatLng);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_position(&self) -> Result<LatLng, LocationError> {
        Ok(self.0)
    }
}

pub struct NoGeolocation;

#[async_trait]
impl LocationProvider for NoGeolocation {
    async fn current_position(&self) -> Result<LatLng, LocationError> {
        Err(LocationError::Unsupported)
    }
}
