use std::{env, sync::Arc, time::Duration};

use axum::{middleware, routing::get, Router};
use tower_http::cors::CorsLayer;

use crate::{
    middlewares::auth::auth_middleware,
    routes::apply_routes,
    services::{
        location::location_provider::{
            FixedLocation, LocationProvider, NoGeolocation, ReportedLocation,
        },
        map_surface::map_scene::MapScene,
        maps_client::maps_service::{MapsService, MapsServiceConfig},
        vehicle_directory::directory_client::DirectoryClient,
    },
    tracker::{refresh::DEFAULT_REFRESH_INTERVAL, Tracker, TrackerServices},
    types::{app_state::AppState, lat_lng::LatLng},
};

const DEFAULT_DIRECTORY_URL: &str = "http://localhost:8080/api/threewheel";
const DEFAULT_MAPS_HOST: &str = "https://maps.googleapis.com";
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:3000";

/// Where the tracker gets the user's position from.
#[derive(Debug, Clone, PartialEq)]
pub enum LocationSource {
    /// Pushed by the device through `PUT /device-location`.
    Device,
    Fixed(LatLng),
    Disabled,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub directory_url: String,
    pub maps_host: String,
    pub maps_key: String,
    pub auth_key: Option<String>,
    pub bind_addr: String,
    pub refresh_interval: Duration,
    pub location: LocationSource,
}

#[derive(Debug)]
pub enum ConfigError {
    Missing(&'static str),
    Invalid(&'static str, String),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            ConfigError::Missing(key) => write!(f, "{} must be set", key),
            ConfigError::Invalid(key, value) => write!(f, "{} has invalid value {:?}", key, value),
        }
    }
}

impl std::error::Error for ConfigError {}

fn parse_var<T: std::str::FromStr>(key: &'static str) -> Result<Option<T>, ConfigError> {
    match env::var(key) {
        Ok(value) => value
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| ConfigError::Invalid(key, value)),
        Err(_) => Ok(None),
    }
}

impl AppConfig {
    pub fn from_env() -> Result<Self, ConfigError> {
        let maps_key =
            env::var("GOOGLE_MAPS_API_KEY").map_err(|_| ConfigError::Missing("GOOGLE_MAPS_API_KEY"))?;

        let refresh_interval = parse_var::<u64>("REFRESH_INTERVAL_SECS")?
            .map(Duration::from_secs)
            .unwrap_or(DEFAULT_REFRESH_INTERVAL);
        if refresh_interval.is_zero() {
            return Err(ConfigError::Invalid("REFRESH_INTERVAL_SECS", "0".to_string()));
        }

        let location = match (
            parse_var::<f64>("DEVICE_LAT")?,
            parse_var::<f64>("DEVICE_LON")?,
        ) {
            (Some(lat), Some(lon)) => LocationSource::Fixed(LatLng::new(lat, lon)),
            (None, None) if env::var("GEOLOCATION_DISABLED").is_ok() => LocationSource::Disabled,
            (None, None) => LocationSource::Device,
            (Some(_), None) => return Err(ConfigError::Missing("DEVICE_LON")),
            (None, Some(_)) => return Err(ConfigError::Missing("DEVICE_LAT")),
        };

        Ok(AppConfig {
            directory_url: env::var("TRACKER_API_BASE")
                .unwrap_or_else(|_| DEFAULT_DIRECTORY_URL.to_string()),
            maps_host: env::var("GOOGLE_MAPS_HOST").unwrap_or_else(|_| DEFAULT_MAPS_HOST.to_string()),
            maps_key,
            auth_key: env::var("AUTH_KEY").ok().filter(|k| !k.is_empty()),
            bind_addr: env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string()),
            refresh_interval,
            location,
        })
    }
}

pub fn gen_state(config: &AppConfig) -> AppState {
    let maps_service = Arc::new(MapsService::new(MapsServiceConfig {
        api_key: config.maps_key.clone(),
        host: config.maps_host.clone(),
    }));
    let directory = DirectoryClient::new(config.directory_url.clone());
    let map_scene = Arc::new(MapScene::new());

    let device_location = match config.location {
        LocationSource::Device => Some(Arc::new(ReportedLocation::new())),
        _ => None,
    };
    let location: Arc<dyn LocationProvider> = match (&config.location, &device_location) {
        (_, Some(reported)) => reported.clone() as Arc<dyn LocationProvider>,
        (LocationSource::Fixed(position), _) => Arc::new(FixedLocation(*position)),
        _ => Arc::new(NoGeolocation),
    };

    let tracker = Arc::new(Tracker::new(TrackerServices {
        directory: Arc::new(directory.clone()),
        geocoder: maps_service.clone(),
        directions: maps_service,
        location,
        map: map_scene.clone(),
    }));

    AppState {
        tracker,
        map_scene,
        device_location,
        directory,
        auth_key: config.auth_key.clone(),
    }
}

pub fn gen_app(state: AppState) -> Router {
    let cors_middleware = CorsLayer::permissive();

    apply_routes(Router::new())
        .route("/", get(root))
        .route_layer(middleware::from_fn_with_state(
            state.clone(),
            auth_middleware,
        ))
        .layer(cors_middleware)
        .with_state(state)
}

async fn root() -> &'static str {
    "Three-wheeler tracker is running"
}

#[cfg(test)]
pub struct MockApp {
    pub app: Router,
    pub state: AppState,
    pub directory_server: mockito::ServerGuard,
    pub google_server: mockito::ServerGuard,
}

#[cfg(test)]
pub async fn gen_mock_app_with(location: LocationSource, auth_key: Option<String>) -> MockApp {
    let directory_server = mockito::Server::new_async().await;
    let google_server = mockito::Server::new_async().await;

    let state = gen_state(&AppConfig {
        directory_url: directory_server.url(),
        maps_host: google_server.url(),
        maps_key: "key".to_string(),
        auth_key,
        bind_addr: DEFAULT_BIND_ADDR.to_string(),
        refresh_interval: DEFAULT_REFRESH_INTERVAL,
        location,
    });

    MockApp {
        app: gen_app(state.clone()),
        state,
        directory_server,
        google_server,
    }
}

#[cfg(test)]
pub async fn gen_mock_app() -> MockApp {
    gen_mock_app_with(LocationSource::Device, None).await
}
