use axum::{extract::State, Json};

use crate::{tracker::view::TrackerView, types::app_state::AppState};

pub async fn post_tracker_locate(State(state): State<AppState>) -> Json<TrackerView> {
    state.tracker.locate_user().await;
    Json(state.tracker.view().await)
}
