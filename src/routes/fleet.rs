use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use validator::Validate;

use crate::{
    services::vehicle_directory::types::directory_error::DirectoryError,
    types::app_state::AppState,
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};

#[derive(Serialize, Deserialize)]
pub struct GetFleetResponseData {
    pub vehicle_ids: Vec<String>,
}

#[derive(Serialize, Deserialize)]
pub struct GetFleetResponse {
    pub data: GetFleetResponseData,
}

#[derive(Validate, Deserialize)]
pub struct PostFleetPositionPayload {
    #[validate(length(min = 1, message = "Must be at least 1 character"))]
    pub id: String,
    #[validate(range(min = -90.0, max = 90.0, message = "Must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Must be between -180 and 180"))]
    pub lon: f64,
}

fn directory_failure(action: &str, e: DirectoryError) -> AppError {
    error!("Failed to {}: {}", action, e);
    AppError::new(StatusCode::BAD_GATEWAY, "Vehicle directory request failed")
}

pub async fn get_fleet(State(state): State<AppState>) -> Result<Json<GetFleetResponse>, AppError> {
    let vehicle_ids = state
        .directory
        .all_vehicle_ids()
        .await
        .map_err(|e| directory_failure("list vehicles", e))?;

    Ok(Json(GetFleetResponse {
        data: GetFleetResponseData { vehicle_ids },
    }))
}

pub async fn post_fleet_position(
    State(state): State<AppState>,
    ValidatedQuery(payload): ValidatedQuery<PostFleetPositionPayload>,
) -> Result<StatusCode, AppError> {
    state
        .directory
        .report_position(&payload.id, payload.lon, payload.lat)
        .await
        .map_err(|e| directory_failure("report position", e))?;

    info!("Reported position of {}", payload.id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn delete_fleet_vehicle(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<StatusCode, AppError> {
    state
        .directory
        .remove_vehicle(&id)
        .await
        .map_err(|e| directory_failure("remove vehicle", e))?;

    info!("Removed vehicle {}", id);
    Ok(StatusCode::NO_CONTENT)
}

pub async fn post_fleet_cache_clear(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    state
        .directory
        .clear_cache()
        .await
        .map_err(|e| directory_failure("clear the nearby cache", e))?;

    Ok(StatusCode::NO_CONTENT)
}
