use std::{collections::BTreeMap, time::Duration};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;

use crate::{services::maps_client::maps_service::Route, types::lat_lng::LatLng};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MarkerAnimation {
    Bounce { duration: Duration },
}

/// Drawing operations the tracker issues against a map.
#[async_trait]
pub trait MapSurface: Send + Sync {
    async fn init(&self, center: LatLng, zoom: u8);
    async fn set_center(&self, center: LatLng);
    async fn add_user_marker(&self, position: LatLng);
    async fn move_user_marker(&self, position: LatLng);
    async fn add_vehicle_marker(&self, id: &str, position: LatLng);
    async fn remove_vehicle_marker(&self, id: &str);
    async fn move_vehicle_marker(&self, id: &str, position: LatLng);
    async fn set_vehicle_marker_visible(&self, id: &str, visible: bool);
    async fn set_vehicle_marker_animation(&self, id: &str, animation: Option<MarkerAnimation>);
    async fn show_route(&self, route: Route);
    async fn clear_route(&self);
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserMarker {
    pub position: LatLng,
    pub title: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VehicleMarker {
    pub id: String,
    pub position: LatLng,
    pub title: String,
    pub visible: bool,
    pub bounce_until: Option<DateTime<Utc>>,
    pub bouncing: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapSceneSnapshot {
    pub center: Option<LatLng>,
    pub zoom: Option<u8>,
    pub user_marker: Option<UserMarker>,
    pub vehicle_markers: Vec<VehicleMarker>,
    pub route: Option<Route>,
}

#[derive(Default)]
struct SceneState {
    center: Option<LatLng>,
    zoom: Option<u8>,
    user_marker: Option<UserMarker>,
    vehicle_markers: BTreeMap<String, VehicleMarker>,
    route: Option<Route>,
}

/// In-memory map that a front end polls and draws.
#[derive(Default)]
pub struct MapScene {
    state: Mutex<SceneState>,
}

impl MapScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn snapshot(&self) -> MapSceneSnapshot {
        let state = self.state.lock().await;
        let now = Utc::now();

        MapSceneSnapshot {
            center: state.center,
            zoom: state.zoom,
            user_marker: state.user_marker.clone(),
            vehicle_markers: state
                .vehicle_markers
                .values()
                .map(|m| VehicleMarker {
                    bouncing: m.bounce_until.map_or(false, |until| now < until),
                    ..m.clone()
                })
                .collect(),
            route: state.route.clone(),
        }
    }
}

#[async_trait]
impl MapSurface for MapScene {
    async fn init(&self, center: LatLng, zoom: u8) {
        let mut state = self.state.lock().await;
        state.center = Some(center);
        state.zoom = Some(zoom);
    }

    async fn set_center(&self, center: LatLng) {
        self.state.lock().await.center = Some(center);
    }

    async fn add_user_marker(&self, position: LatLng) {
        self.state.lock().await.user_marker = Some(UserMarker {
            position,
            title: "Your Location".to_string(),
        });
    }

    async fn move_user_marker(&self, position: LatLng) {
        if let Some(marker) = self.state.lock().await.user_marker.as_mut() {
            marker.position = position;
        }
    }

    async fn add_vehicle_marker(&self, id: &str, position: LatLng) {
        self.state.lock().await.vehicle_markers.insert(
            id.to_string(),
            VehicleMarker {
                id: id.to_string(),
                position,
                title: id.to_string(),
                visible: true,
                bounce_until: None,
                bouncing: false,
            },
        );
    }

    async fn remove_vehicle_marker(&self, id: &str) {
        self.state.lock().await.vehicle_markers.remove(id);
    }

    async fn move_vehicle_marker(&self, id: &str, position: LatLng) {
        if let Some(marker) = self.state.lock().await.vehicle_markers.get_mut(id) {
            marker.position = position;
        }
    }

    async fn set_vehicle_marker_visible(&self, id: &str, visible: bool) {
        if let Some(marker) = self.state.lock().await.vehicle_markers.get_mut(id) {
            marker.visible = visible;
        }
    }

    async fn set_vehicle_marker_animation(&self, id: &str, animation: Option<MarkerAnimation>) {
        if let Some(marker) = self.state.lock().await.vehicle_markers.get_mut(id) {
            marker.bounce_until = match animation {
                Some(MarkerAnimation::Bounce { duration }) => chrono::Duration::from_std(duration)
                    .ok()
                    .map(|d| Utc::now() + d),
                None => None,
            };
        }
    }

    async fn show_route(&self, route: Route) {
        self.state.lock().await.route = Some(route);
    }

    async fn clear_route(&self) {
        self.state.lock().await.route = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn user_marker_moves_only_once_added() {
        let scene = MapScene::new();

        scene.move_user_marker(LatLng::new(1.0, 1.0)).await;
        assert_eq!(scene.snapshot().await.user_marker, None);

        scene.add_user_marker(LatLng::new(1.0, 1.0)).await;
        scene.move_user_marker(LatLng::new(2.0, 2.0)).await;

        let marker = scene.snapshot().await.user_marker.unwrap();
        assert_eq!(marker.position, LatLng::new(2.0, 2.0));
        assert_eq!(marker.title, "Your Location");
    }

    #[tokio::test]
    async fn bounce_expires() {
        let scene = MapScene::new();
        scene.add_vehicle_marker("a", LatLng::new(0.0, 0.0)).await;
        scene.add_vehicle_marker("b", LatLng::new(0.0, 0.0)).await;

        scene
            .set_vehicle_marker_animation(
                "a",
                Some(MarkerAnimation::Bounce {
                    duration: Duration::from_secs(60),
                }),
            )
            .await;
        scene
            .set_vehicle_marker_animation(
                "b",
                Some(MarkerAnimation::Bounce {
                    duration: Duration::ZERO,
                }),
            )
            .await;

        let snapshot = scene.snapshot().await;
        assert!(snapshot.vehicle_markers[0].bouncing);
        assert!(!snapshot.vehicle_markers[1].bouncing);

        scene.set_vehicle_marker_animation("a", None).await;
        assert!(!scene.snapshot().await.vehicle_markers[0].bouncing);
    }

    #[tokio::test]
    async fn markers_listed_by_id() {
        let scene = MapScene::new();
        scene.init(LatLng::new(33.5731, -7.5898), 13).await;
        scene.add_vehicle_marker("vehicle2", LatLng::new(0.0, 0.0)).await;
        scene.add_vehicle_marker("vehicle1", LatLng::new(0.0, 0.0)).await;
        scene.set_vehicle_marker_visible("vehicle2", false).await;
        scene.remove_vehicle_marker("missing").await;

        let snapshot = scene.snapshot().await;
        assert_eq!(snapshot.zoom, Some(13));
        let ids: Vec<_> = snapshot.vehicle_markers.iter().map(|m| m.id.as_str()).collect();
        assert_eq!(ids, vec!["vehicle1", "vehicle2"]);
        assert!(snapshot.vehicle_markers[0].visible);
        assert!(!snapshot.vehicle_markers[1].visible);
    }
}
