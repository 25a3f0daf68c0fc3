use axum::{extract::State, Json};

use crate::{services::map_surface::map_scene::MapSceneSnapshot, types::app_state::AppState};

pub async fn get_map(State(state): State<AppState>) -> Json<MapSceneSnapshot> {
    Json(state.map_scene.snapshot().await)
}
