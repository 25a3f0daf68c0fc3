use axum::{extract::State, Json};

use crate::{tracker::view::TrackerView, types::app_state::AppState};

/// Re-fetches the nearby list with the current radius.
pub async fn post_tracker_refresh(State(state): State<AppState>) -> Json<TrackerView> {
    state.tracker.refresh_nearby().await;
    Json(state.tracker.view().await)
}
