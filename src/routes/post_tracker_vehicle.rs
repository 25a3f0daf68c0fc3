use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;

use crate::{
    tracker::{view::TrackerView, TrackerError},
    types::app_state::AppState,
    utils::app_error::AppError,
};

fn to_app_error(e: TrackerError) -> AppError {
    debug!("Vehicle action rejected: {}", e);
    match e {
        TrackerError::UnknownVehicle(_) => AppError::new(StatusCode::NOT_FOUND, &e.to_string()),
        TrackerError::InvalidRadius(_) => AppError::new(StatusCode::BAD_REQUEST, &e.to_string()),
    }
}

/// Marker click.
pub async fn post_select_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackerView>, AppError> {
    state
        .tracker
        .select_vehicle_by_id(&id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(state.tracker.view().await))
}

/// List click.
pub async fn post_toggle_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<TrackerView>, AppError> {
    state
        .tracker
        .toggle_vehicle(&id)
        .await
        .map_err(to_app_error)?;

    Ok(Json(state.tracker.view().await))
}
