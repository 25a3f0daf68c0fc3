use axum::{extract::State, Json};

use crate::{tracker::view::TrackerView, types::app_state::AppState};

pub async fn get_tracker(State(state): State<AppState>) -> Json<TrackerView> {
    Json(state.tracker.view().await)
}
