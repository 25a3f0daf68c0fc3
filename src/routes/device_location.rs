use std::sync::Arc;

use axum::{extract::State, http::StatusCode};
use serde::Deserialize;
use tracing::info;
use validator::Validate;

use crate::{
    services::location::location_provider::ReportedLocation,
    types::{app_state::AppState, lat_lng::LatLng},
    utils::{app_error::AppError, validated_query::ValidatedQuery},
};

#[derive(Validate, Deserialize)]
pub struct PutDeviceLocationPayload {
    #[validate(range(min = -90.0, max = 90.0, message = "Must be between -90 and 90"))]
    pub lat: f64,
    #[validate(range(min = -180.0, max = 180.0, message = "Must be between -180 and 180"))]
    pub lon: f64,
}

fn reported_location(state: &AppState) -> Result<&Arc<ReportedLocation>, AppError> {
    state.device_location.as_ref().ok_or_else(|| {
        AppError::new(
            StatusCode::CONFLICT,
            "Tracker does not take its position from the device",
        )
    })
}

/// Stores the device position. The first report locates the user, since the
/// locate at startup ran before any device had reported. Later reports are
/// picked up on the next locate.
pub async fn put_device_location(
    State(state): State<AppState>,
    ValidatedQuery(payload): ValidatedQuery<PutDeviceLocationPayload>,
) -> Result<StatusCode, AppError> {
    reported_location(&state)?
        .report(LatLng::new(payload.lat, payload.lon))
        .await;

    if state.tracker.user_location().await.is_none() {
        info!("First device position received, locating user");
        state.tracker.locate_user().await;
    }

    Ok(StatusCode::NO_CONTENT)
}

/// The device declined to share its position.
pub async fn delete_device_location(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    reported_location(&state)?.report_denied().await;

    Ok(StatusCode::NO_CONTENT)
}
