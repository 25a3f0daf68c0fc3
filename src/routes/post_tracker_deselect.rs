use axum::{extract::State, Json};

use crate::{tracker::view::TrackerView, types::app_state::AppState};

pub async fn post_tracker_deselect(State(state): State<AppState>) -> Json<TrackerView> {
    state.tracker.deselect_vehicle().await;
    Json(state.tracker.view().await)
}
