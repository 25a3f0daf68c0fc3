use axum::{extract::State, Json};
use serde::Deserialize;
use validator::Validate;

use crate::{
    tracker::view::TrackerView,
    types::app_state::AppState,
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};

#[derive(Validate, Deserialize)]
pub struct PostTrackerSearchPayload {
    #[validate(length(max = 200, message = "Must be at most 200 characters"))]
    pub query: String,
}

/// Blank queries are stored but do not trigger a search.
pub async fn post_tracker_search(
    State(state): State<AppState>,
    ValidatedQuery(payload): ValidatedQuery<PostTrackerSearchPayload>,
) -> Result<Json<TrackerView>, AppError> {
    state.tracker.set_search_query(&payload.query).await;
    state.tracker.search_location(&payload.query).await;

    Ok(Json(state.tracker.view().await))
}
