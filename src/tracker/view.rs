use serde::{Deserialize, Serialize};

use super::state::TrackerState;
use crate::types::lat_lng::LatLng;

pub const EMPTY_LIST_HINT: &str = "No vehicles found nearby";
pub const EMPTY_LIST_SUGGESTION: &str = "Try increasing the search radius";

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackerViewSelected {
    pub id: String,
    pub distance_label: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct TrackerViewVehicle {
    pub id: String,
    pub lat: f64,
    pub lon: f64,
    pub distance_label: Option<String>,
    pub position_label: String,
    pub selected: bool,
    pub live: bool,
}

/// What the front end renders next to the map.
#[derive(Debug, Serialize, Deserialize)]
pub struct TrackerView {
    pub vehicle_count: usize,
    pub loading: bool,
    pub error: Option<String>,
    pub radius_km: u32,
    pub search_query: String,
    pub user_location: Option<LatLng>,
    pub selected: Option<TrackerViewSelected>,
    pub vehicles: Vec<TrackerViewVehicle>,
    pub empty_hint: Option<String>,
    pub empty_suggestion: Option<String>,
}

impl From<&TrackerState> for TrackerView {
    fn from(state: &TrackerState) -> Self {
        let empty = state.nearby.is_empty() && !state.loading;

        TrackerView {
            vehicle_count: state.nearby.len(),
            loading: state.loading,
            error: state.error.clone(),
            radius_km: state.radius_km,
            search_query: state.search_query.clone(),
            user_location: state.user_location,
            selected: state.selected.as_ref().map(|v| TrackerViewSelected {
                id: v.id.clone(),
                distance_label: v.distance.map(|d| format!("{:.2} km", d)),
            }),
            vehicles: state
                .nearby
                .iter()
                .map(|v| TrackerViewVehicle {
                    id: v.id.clone(),
                    lat: v.lat,
                    lon: v.lon,
                    distance_label: v.distance.map(|d| format!("{:.2} km away", d)),
                    position_label: format!("Lat: {:.6}, Lon: {:.6}", v.lat, v.lon),
                    selected: state.is_selected(&v.id),
                    live: true,
                })
                .collect(),
            empty_hint: empty.then(|| EMPTY_LIST_HINT.to_string()),
            empty_suggestion: empty.then(|| EMPTY_LIST_SUGGESTION.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::vehicle::Vehicle;

    fn vehicle(id: &str, distance: Option<f64>) -> Vehicle {
        Vehicle {
            id: id.to_string(),
            lat: 33.5731234567,
            lon: -7.58981,
            distance,
            last_update: None,
        }
    }

    #[test]
    fn labels_are_formatted() {
        let mut state = TrackerState::default();
        state.nearby = vec![vehicle("vehicle1", Some(1.23456)), vehicle("vehicle2", None)];
        state.selected = Some(vehicle("vehicle1", Some(1.23456)));

        let view = TrackerView::from(&state);

        assert_eq!(view.vehicle_count, 2);
        assert_eq!(view.empty_hint, None);
        assert_eq!(view.empty_suggestion, None);

        let selected = view.selected.unwrap();
        assert_eq!(selected.id, "vehicle1");
        assert_eq!(selected.distance_label.as_deref(), Some("1.23 km"));

        assert_eq!(view.vehicles[0].distance_label.as_deref(), Some("1.23 km away"));
        assert_eq!(
            view.vehicles[0].position_label,
            "Lat: 33.573123, Lon: -7.589810"
        );
        assert!(view.vehicles[0].selected);
        assert!(!view.vehicles[1].selected);
        assert_eq!(view.vehicles[1].distance_label, None);
    }

    #[test]
    fn empty_hint_hidden_while_loading() {
        let mut state = TrackerState::default();
        let view = TrackerView::from(&state);
        assert_eq!(view.empty_hint.as_deref(), Some(EMPTY_LIST_HINT));
        assert_eq!(view.empty_suggestion.as_deref(), Some(EMPTY_LIST_SUGGESTION));

        state.loading = true;
        let view = TrackerView::from(&state);
        assert_eq!(view.empty_hint, None);
        assert_eq!(view.empty_suggestion, None);
    }
}
