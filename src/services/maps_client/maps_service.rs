use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::debug;
use urlencoding::encode;

use super::types::{
    google_directions_response::GoogleDirectionsResponse,
    google_geocode_response::GoogleGeocodeResponse, maps_service_error::MapsServiceError,
};
use crate::types::lat_lng::LatLng;

#[derive(Clone)]
pub struct MapsServiceConfig {
    pub api_key: String,
    pub host: String,
}

#[derive(Clone)]
pub struct MapsService {
    config: MapsServiceConfig,
    client: reqwest::Client,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TravelMode {
    Driving,
}

impl TravelMode {
    fn as_query(&self) -> &'static str {
        match self {
            TravelMode::Driving => "driving",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Route {
    pub summary: String,
    pub distance_meters: u64,
    pub duration_seconds: u64,
    /// Encoded overview polyline, drawn as-is by the front end.
    pub polyline: String,
}

/// Resolves free-text addresses to coordinates.
#[async_trait]
pub trait Geocoder: Send + Sync {
    async fn geocode(&self, address: &str) -> Result<Option<LatLng>, MapsServiceError>;
}

#[async_trait]
pub trait DirectionsProvider: Send + Sync {
    async fn route(
        &self,
        origin: LatLng,
        destination: LatLng,
        mode: TravelMode,
    ) -> Result<Route, MapsServiceError>;
}

impl MapsService {
    pub fn new(config: MapsServiceConfig) -> Self {
        Self {
            config,
            client: reqwest::Client::new(),
        }
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        url: &str,
    ) -> Result<T, MapsServiceError> {
        let resp = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| MapsServiceError::Internal(format!("Failed to send request: {}", e)))?
            .error_for_status()
            .map_err(|e| MapsServiceError::Internal(format!("Request failed: {}", e)))?;

        resp.json::<T>()
            .await
            .map_err(|e| MapsServiceError::Internal(format!("Failed to get response body: {}", e)))
    }
}

#[async_trait]
impl Geocoder for MapsService {
    async fn geocode(&self, address: &str) -> Result<Option<LatLng>, MapsServiceError> {
        let url = format!(
            "{}/maps/api/geocode/json?address={}&key={}",
            self.config.host,
            encode(address),
            self.config.api_key
        );

        let body = self.get_json::<GoogleGeocodeResponse>(&url).await?;

        match body.status.as_str() {
            "OK" => Ok(body.results.into_iter().next().map(|r| {
                debug!("Geocoded \"{}\" to {}", address, r.formatted_address);
                LatLng::new(r.geometry.location.lat, r.geometry.location.lng)
            })),
            "ZERO_RESULTS" => Ok(None),
            other => Err(MapsServiceError::Status(other.to_string())),
        }
    }
}

#[async_trait]
impl DirectionsProvider for MapsService {
    async fn route(
        &self,
        origin: LatLng,
        destination: LatLng,
        mode: TravelMode,
    ) -> Result<Route, MapsServiceError> {
        let url = format!(
            "{}/maps/api/directions/json?origin={}&destination={}&mode={}&key={}",
            self.config.host,
            encode(&origin.to_string()),
            encode(&destination.to_string()),
            mode.as_query(),
            self.config.api_key
        );

        let body = self.get_json::<GoogleDirectionsResponse>(&url).await?;

        if body.status != "OK" {
            return Err(MapsServiceError::Status(body.status));
        }

        let route = body
            .routes
            .into_iter()
            .next()
            .ok_or_else(|| MapsServiceError::Status("ZERO_RESULTS".to_string()))?;

        Ok(Route {
            summary: route.summary,
            distance_meters: route.legs.iter().map(|l| l.distance.value).sum(),
            duration_seconds: route.legs.iter().map(|l| l.duration.value).sum(),
            polyline: route.overview_polyline.points,
        })
    }
}
