use std::sync::Arc;

use crate::{
    services::{
        location::location_provider::ReportedLocation, map_surface::map_scene::MapScene,
        vehicle_directory::directory_client::DirectoryClient,
    },
    tracker::Tracker,
};

#[derive(Clone)]
pub struct AppState {
    pub tracker: Arc<Tracker>,
    pub map_scene: Arc<MapScene>,
    /// Set when the tracker takes its position from device reports.
    pub device_location: Option<Arc<ReportedLocation>>,
    pub directory: DirectoryClient,
    pub auth_key: Option<String>,
}
