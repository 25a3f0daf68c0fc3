use serde::{Deserialize, Serialize};

use super::lat_lng::LatLng;

/// A vehicle record as served by the directory. The directory names the
/// longitude `lon`, unlike the map which uses `lng`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vehicle {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    /// Kilometres from the search center. Only present on nearby results.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub distance: Option<f64>,
    #[serde(
        default,
        rename = "lastUpdate",
        skip_serializing_if = "Option::is_none"
    )]
    pub last_update: Option<i64>,
}

impl Vehicle {
    pub fn position(&self) -> LatLng {
        LatLng::new(self.lat, self.lon)
    }
}
