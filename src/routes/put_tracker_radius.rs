use axum::{extract::State, http::StatusCode, Json};
use serde::Deserialize;
use validator::Validate;

use crate::{
    tracker::view::TrackerView,
    types::app_state::AppState,
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};

#[derive(Validate, Deserialize)]
pub struct PutTrackerRadiusPayload {
    #[validate(range(min = 1, max = 50, message = "Must be between 1 and 50 km"))]
    pub km: u32,
}

pub async fn put_tracker_radius(
    State(state): State<AppState>,
    ValidatedQuery(payload): ValidatedQuery<PutTrackerRadiusPayload>,
) -> Result<Json<TrackerView>, AppError> {
    state
        .tracker
        .set_radius(payload.km)
        .await
        .map_err(|e| AppError::new(StatusCode::BAD_REQUEST, e.to_string().as_str()))?;

    Ok(Json(state.tracker.view().await))
}
