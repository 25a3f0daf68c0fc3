use std::collections::HashSet;

use crate::types::{lat_lng::LatLng, vehicle::Vehicle};

pub const DEFAULT_RADIUS_KM: u32 = 15;
pub const MIN_RADIUS_KM: u32 = 1;
pub const MAX_RADIUS_KM: u32 = 50;

#[derive(Debug, Clone)]
pub struct TrackerState {
    pub user_location: Option<LatLng>,
    pub nearby: Vec<Vehicle>,
    pub selected: Option<Vehicle>,
    pub search_query: String,
    pub loading: bool,
    pub error: Option<String>,
    pub radius_km: u32,

    /// Ids of the vehicle markers currently placed on the map.
    pub(super) markers: HashSet<String>,
    pub(super) user_marker_placed: bool,

    pub(super) nearby_requested: u64,
    pub(super) nearby_applied: u64,
}

impl Default for TrackerState {
    fn default() -> Self {
        TrackerState {
            user_location: None,
            nearby: Vec::new(),
            selected: None,
            search_query: String::new(),
            loading: false,
            error: None,
            radius_km: DEFAULT_RADIUS_KM,
            markers: HashSet::new(),
            user_marker_placed: false,
            nearby_requested: 0,
            nearby_applied: 0,
        }
    }
}

impl TrackerState {
    pub fn selected_id(&self) -> Option<&str> {
        self.selected.as_ref().map(|v| v.id.as_str())
    }

    pub fn is_selected(&self, id: &str) -> bool {
        self.selected_id() == Some(id)
    }
}
