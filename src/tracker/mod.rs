pub mod refresh;
pub mod state;
pub mod view;

use std::{sync::Arc, time::Duration};

use tokio::sync::Mutex;
use tracing::{debug, error, info, warn};

use crate::{
    services::{
        location::location_provider::{LocationError, LocationProvider},
        map_surface::map_scene::{MapSurface, MarkerAnimation},
        maps_client::maps_service::{DirectionsProvider, Geocoder, TravelMode},
        vehicle_directory::directory_client::VehicleDirectory,
    },
    types::{lat_lng::LatLng, vehicle::Vehicle},
};
use state::{TrackerState, MAX_RADIUS_KM, MIN_RADIUS_KM};
use view::TrackerView;

/// Casablanca.
pub const DEFAULT_CENTER: LatLng = LatLng {
    lat: 33.5731,
    lng: -7.5898,
};
pub const DEFAULT_ZOOM: u8 = 13;
pub const BOUNCE_DURATION: Duration = Duration::from_secs(2);

pub const LOCATION_UNAVAILABLE_MESSAGE: &str =
    "Unable to get your location. Please enable location services.";
pub const GEOLOCATION_UNSUPPORTED_MESSAGE: &str = "Geolocation is not supported by your browser.";
pub const LOCATION_NOT_FOUND_MESSAGE: &str = "Location not found. Please try another search.";

#[derive(Debug, PartialEq)]
pub enum TrackerError {
    UnknownVehicle(String),
    InvalidRadius(u32),
}

impl std::fmt::Display for TrackerError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            TrackerError::UnknownVehicle(id) => write!(f, "No nearby vehicle with id {}", id),
            TrackerError::InvalidRadius(km) => write!(
                f,
                "Radius {} km is outside {}..={} km",
                km, MIN_RADIUS_KM, MAX_RADIUS_KM
            ),
        }
    }
}

impl std::error::Error for TrackerError {}

pub struct TrackerServices {
    pub directory: Arc<dyn VehicleDirectory>,
    pub geocoder: Arc<dyn Geocoder>,
    pub directions: Arc<dyn DirectionsProvider>,
    pub location: Arc<dyn LocationProvider>,
    pub map: Arc<dyn MapSurface>,
}

/// Coordinates the user position, the nearby list, the selection and what is
/// drawn on the map.
///
/// Nothing is awaited on the network while the state lock is held. Map calls
/// are made under the lock so the drawn markers always agree with the state.
pub struct Tracker {
    directory: Arc<dyn VehicleDirectory>,
    geocoder: Arc<dyn Geocoder>,
    directions: Arc<dyn DirectionsProvider>,
    location: Arc<dyn LocationProvider>,
    map: Arc<dyn MapSurface>,
    state: Mutex<TrackerState>,
}

impl Tracker {
    pub fn new(services: TrackerServices) -> Self {
        Tracker {
            directory: services.directory,
            geocoder: services.geocoder,
            directions: services.directions,
            location: services.location,
            map: services.map,
            state: Mutex::new(TrackerState::default()),
        }
    }

    pub async fn state(&self) -> TrackerState {
        self.state.lock().await.clone()
    }

    pub async fn view(&self) -> TrackerView {
        TrackerView::from(&*self.state.lock().await)
    }

    pub async fn init_map(&self) {
        info!("Initializing map at {}", DEFAULT_CENTER);
        self.map.init(DEFAULT_CENTER, DEFAULT_ZOOM).await;
        self.locate_user().await;
    }

    pub async fn locate_user(&self) {
        self.begin_loading().await;

        match self.location.current_position().await {
            Ok(position) => {
                info!("User located at {}", position);
                self.move_user_to(position).await;
                self.fetch_nearby(position).await;
            }
            Err(LocationError::Unsupported) => {
                warn!("Geolocation unsupported");
                self.state.lock().await.error = Some(GEOLOCATION_UNSUPPORTED_MESSAGE.to_string());
            }
            Err(e) => {
                warn!("Failed to get user location: {}", e);
                self.state.lock().await.error = Some(LOCATION_UNAVAILABLE_MESSAGE.to_string());
            }
        }

        self.state.lock().await.loading = false;
    }

    pub async fn search_location(&self, query: &str) {
        let query = query.trim();
        if query.is_empty() {
            return;
        }

        self.begin_loading().await;

        match self.geocoder.geocode(query).await {
            Ok(Some(position)) => {
                info!("Search \"{}\" resolved to {}", query, position);
                self.move_user_to(position).await;
                self.fetch_nearby(position).await;
            }
            Ok(None) => {
                debug!("Search \"{}\" had no results", query);
                self.state.lock().await.error = Some(LOCATION_NOT_FOUND_MESSAGE.to_string());
            }
            Err(e) => {
                warn!("Failed to geocode \"{}\": {}", query, e);
                self.state.lock().await.error = Some(LOCATION_NOT_FOUND_MESSAGE.to_string());
            }
        }

        self.state.lock().await.loading = false;
    }

    pub async fn user_location(&self) -> Option<LatLng> {
        self.state.lock().await.user_location
    }

    pub async fn set_search_query(&self, query: &str) {
        self.state.lock().await.search_query = query.to_string();
    }

    /// Only affects later fetches.
    pub async fn set_radius(&self, radius_km: u32) -> Result<(), TrackerError> {
        if !(MIN_RADIUS_KM..=MAX_RADIUS_KM).contains(&radius_km) {
            return Err(TrackerError::InvalidRadius(radius_km));
        }

        self.state.lock().await.radius_km = radius_km;
        Ok(())
    }

    pub async fn refresh_nearby(&self) {
        let user_location = self.state.lock().await.user_location;

        if let Some(position) = user_location {
            self.fetch_nearby(position).await;
        }
    }

    pub async fn fetch_nearby(&self, center: LatLng) {
        let (request, radius_km) = {
            let mut state = self.state.lock().await;
            state.nearby_requested += 1;
            (state.nearby_requested, state.radius_km)
        };

        let result = self.directory.nearby(center.lng, center.lat, radius_km).await;

        let mut state = self.state.lock().await;
        if request < state.nearby_applied {
            debug!("Dropping nearby response #{} superseded by #{}", request, state.nearby_applied);
            return;
        }
        state.nearby_applied = request;

        match result {
            Ok(vehicles) => {
                debug!("Found {} vehicles near {}", vehicles.len(), center);
                self.update_vehicle_markers(&mut state, &vehicles).await;
                state.nearby = vehicles;
            }
            Err(e) => {
                error!("Failed to fetch nearby vehicles: {}", e);
                state.error = Some(format!("Failed to fetch nearby vehicles: {}", e));
            }
        }
    }

    /// Live read of one vehicle. Failures are logged and yield `None`.
    pub async fn fetch_vehicle_by_id(&self, id: &str) -> Option<Vehicle> {
        match self.directory.vehicle(id).await {
            Ok(Some(vehicle)) => Some(vehicle),
            Ok(None) => {
                warn!("Vehicle {} is no longer in the directory", id);
                None
            }
            Err(e) => {
                error!("Failed to fetch vehicle {}: {}", id, e);
                None
            }
        }
    }

    pub async fn select_vehicle(&self, vehicle: Vehicle) {
        let origin = {
            let mut state = self.state.lock().await;
            info!("Selecting vehicle {}", vehicle.id);
            state.selected = Some(vehicle.clone());

            for id in state.markers.iter() {
                if *id == vehicle.id {
                    self.map.set_vehicle_marker_visible(id, true).await;
                    self.map
                        .set_vehicle_marker_animation(
                            id,
                            Some(MarkerAnimation::Bounce {
                                duration: BOUNCE_DURATION,
                            }),
                        )
                        .await;
                } else {
                    self.map.set_vehicle_marker_visible(id, false).await;
                }
            }

            state.user_location
        };

        if let Some(origin) = origin {
            self.draw_route(origin, &vehicle).await;
        }
    }

    /// Marker click.
    pub async fn select_vehicle_by_id(&self, id: &str) -> Result<(), TrackerError> {
        let vehicle = self
            .state
            .lock()
            .await
            .nearby
            .iter()
            .find(|v| v.id == id)
            .cloned()
            .ok_or_else(|| TrackerError::UnknownVehicle(id.to_string()))?;

        self.select_vehicle(vehicle).await;
        Ok(())
    }

    /// List click: a second click on the selected vehicle clears the selection.
    pub async fn toggle_vehicle(&self, id: &str) -> Result<(), TrackerError> {
        if self.state.lock().await.is_selected(id) {
            self.deselect_vehicle().await;
            return Ok(());
        }

        self.select_vehicle_by_id(id).await
    }

    pub async fn deselect_vehicle(&self) {
        let mut state = self.state.lock().await;
        if let Some(vehicle) = state.selected.take() {
            info!("Deselecting vehicle {}", vehicle.id);
        }

        for id in state.markers.iter() {
            self.map.set_vehicle_marker_visible(id, true).await;
            self.map.set_vehicle_marker_animation(id, None).await;
        }

        self.map.clear_route().await;
    }

    /// One poll. With no selection the nearby list is re-fetched through the
    /// directory cache; with a selection only that vehicle is read live.
    pub async fn refresh_tick(&self) {
        let (user_location, selected_id) = {
            let state = self.state.lock().await;
            (state.user_location, state.selected_id().map(str::to_string))
        };

        let Some(origin) = user_location else {
            return;
        };

        let Some(id) = selected_id else {
            self.fetch_nearby(origin).await;
            return;
        };

        let Some(mut updated) = self.fetch_vehicle_by_id(&id).await else {
            return;
        };

        if updated.distance.is_none() {
            updated.distance = Some(origin.distance_km(&updated.position()));
        }

        {
            let mut state = self.state.lock().await;
            if !state.is_selected(&id) {
                debug!("Selection changed while refreshing {}, dropping update", id);
                return;
            }

            if state.markers.contains(&id) {
                self.map.move_vehicle_marker(&id, updated.position()).await;
            } else {
                self.place_vehicle_marker(&mut state, &updated).await;
            }
            state.selected = Some(updated.clone());
        }

        self.draw_route(origin, &updated).await;
    }

    async fn begin_loading(&self) {
        let mut state = self.state.lock().await;
        state.loading = true;
        state.error = None;
    }

    async fn move_user_to(&self, position: LatLng) {
        let mut state = self.state.lock().await;
        state.user_location = Some(position);
        self.map.set_center(position).await;
        self.update_user_marker(&mut state, position).await;
    }

    async fn update_user_marker(&self, state: &mut TrackerState, position: LatLng) {
        if state.user_marker_placed {
            self.map.move_user_marker(position).await;
        } else {
            self.map.add_user_marker(position).await;
            state.user_marker_placed = true;
        }
    }

    async fn update_vehicle_markers(
        &self,
        state: &mut TrackerState,
        vehicles: &[Vehicle],
    ) {
        let stale: Vec<String> = state.markers.drain().collect();
        for id in stale {
            self.map.remove_vehicle_marker(&id).await;
        }

        let selected_id = state.selected_id().map(str::to_string);

        for vehicle in vehicles {
            self.map
                .add_vehicle_marker(&vehicle.id, vehicle.position())
                .await;

            if selected_id.as_deref().map_or(false, |s| s != vehicle.id) {
                self.map.set_vehicle_marker_visible(&vehicle.id, false).await;
            }

            state.markers.insert(vehicle.id.clone());
        }

        // The selected vehicle keeps its marker even when it drops out of the list.
        if let Some(selected) = state.selected.clone() {
            if !state.markers.contains(&selected.id) {
                debug!("Keeping marker for selected vehicle {} outside the nearby list", selected.id);
                self.place_vehicle_marker(state, &selected).await;
            }
        }
    }

    async fn place_vehicle_marker(&self, state: &mut TrackerState, vehicle: &Vehicle) {
        self.map
            .add_vehicle_marker(&vehicle.id, vehicle.position())
            .await;
        state.markers.insert(vehicle.id.clone());
    }

    async fn draw_route(&self, origin: LatLng, vehicle: &Vehicle) {
        let route = match self
            .directions
            .route(origin, vehicle.position(), TravelMode::Driving)
            .await
        {
            Ok(route) => route,
            Err(e) => {
                warn!("Failed to route to vehicle {}: {}", vehicle.id, e);
                return;
            }
        };

        let state = self.state.lock().await;
        if state.is_selected(&vehicle.id) {
            self.map.show_route(route).await;
        }
    }
}
