use axum::{
    routing::{delete, get, post, put},
    Router,
};

use crate::types::app_state::AppState;

mod device_location;
mod fleet;
mod get_map;
mod get_tracker;
mod post_tracker_deselect;
mod post_tracker_locate;
mod post_tracker_refresh;
mod post_tracker_search;
mod post_tracker_vehicle;
mod put_tracker_radius;

pub fn apply_routes(app: Router<AppState>) -> Router<AppState> {
    app.route("/tracker", get(get_tracker::get_tracker))
        .route(
            "/tracker/locate",
            post(post_tracker_locate::post_tracker_locate),
        )
        .route(
            "/tracker/search",
            post(post_tracker_search::post_tracker_search),
        )
        .route(
            "/tracker/radius",
            put(put_tracker_radius::put_tracker_radius),
        )
        .route(
            "/tracker/refresh",
            post(post_tracker_refresh::post_tracker_refresh),
        )
        .route(
            "/tracker/vehicles/:id/select",
            post(post_tracker_vehicle::post_select_vehicle),
        )
        .route(
            "/tracker/vehicles/:id/toggle",
            post(post_tracker_vehicle::post_toggle_vehicle),
        )
        .route(
            "/tracker/deselect",
            post(post_tracker_deselect::post_tracker_deselect),
        )
        .route(
            "/device-location",
            put(device_location::put_device_location)
                .delete(device_location::delete_device_location),
        )
        .route("/map", get(get_map::get_map))
        .route("/fleet", get(fleet::get_fleet))
        .route("/fleet/positions", post(fleet::post_fleet_position))
        .route("/fleet/cache/clear", post(fleet::post_fleet_cache_clear))
        .route("/fleet/:id", delete(fleet::delete_fleet_vehicle))
}
