use async_trait::async_trait;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use tracing::debug;
use urlencoding::encode;

use super::types::directory_error::DirectoryError;
use crate::types::vehicle::Vehicle;

/// The two reads the tracker polls with.
#[async_trait]
pub trait VehicleDirectory: Send + Sync {
    /// Nearby vehicles sorted by distance. The directory may answer from cache.
    async fn nearby(
        &self,
        lon: f64,
        lat: f64,
        radius_km: u32,
    ) -> Result<Vec<Vehicle>, DirectoryError>;

    /// A single vehicle read live, skipping the nearby cache.
    async fn vehicle(&self, id: &str) -> Result<Option<Vehicle>, DirectoryError>;
}

#[derive(Clone)]
pub struct DirectoryClient {
    base_url: String,
    client: reqwest::Client,
}

impl DirectoryClient {
    pub fn new(base_url: String) -> Self {
        DirectoryClient {
            base_url: base_url.trim_end_matches('/').to_string(),
            client: reqwest::Client::new(),
        }
    }

    async fn send(&self, request: reqwest::RequestBuilder) -> Result<reqwest::Response, DirectoryError> {
        let resp = request
            .send()
            .await
            .map_err(|e| DirectoryError::Internal(format!("Failed to send request: {}", e)))?;

        if !resp.status().is_success() {
            return Err(DirectoryError::Status(resp.status().as_u16()));
        }

        Ok(resp)
    }

    async fn read_json<T: DeserializeOwned>(resp: reqwest::Response) -> Result<T, DirectoryError> {
        resp.json::<T>()
            .await
            .map_err(|e| DirectoryError::Internal(format!("Failed to get response body: {}", e)))
    }

    pub async fn report_position(&self, id: &str, lon: f64, lat: f64) -> Result<(), DirectoryError> {
        let lon = lon.to_string();
        let lat = lat.to_string();

        self.send(
            self.client
                .post(format!("{}/update", self.base_url))
                .query(&[("id", id), ("lon", lon.as_str()), ("lat", lat.as_str())]),
        )
        .await?;

        Ok(())
    }

    pub async fn remove_vehicle(&self, id: &str) -> Result<(), DirectoryError> {
        self.send(
            self.client
                .delete(format!("{}/{}", self.base_url, encode(id))),
        )
        .await?;

        Ok(())
    }

    pub async fn all_vehicle_ids(&self) -> Result<Vec<String>, DirectoryError> {
        let resp = self
            .send(self.client.get(format!("{}/all", self.base_url)))
            .await?;

        Self::read_json(resp).await
    }

    pub async fn clear_cache(&self) -> Result<(), DirectoryError> {
        self.send(self.client.post(format!("{}/cache/clear", self.base_url)))
            .await?;

        Ok(())
    }
}

#[async_trait]
impl VehicleDirectory for DirectoryClient {
    async fn nearby(
        &self,
        lon: f64,
        lat: f64,
        radius_km: u32,
    ) -> Result<Vec<Vehicle>, DirectoryError> {
        debug!("Fetching vehicles within {} km of {},{}", radius_km, lat, lon);

        let lon = lon.to_string();
        let lat = lat.to_string();
        let radius = radius_km.to_string();

        let resp = self
            .send(self.client.get(format!("{}/nearby", self.base_url)).query(&[
                ("lon", lon.as_str()),
                ("lat", lat.as_str()),
                ("radiusKm", radius.as_str()),
            ]))
            .await?;

        Self::read_json(resp).await
    }

    async fn vehicle(&self, id: &str) -> Result<Option<Vehicle>, DirectoryError> {
        match self
            .send(self.client.get(format!("{}/{}", self.base_url, encode(id))))
            .await
        {
            Ok(resp) => Ok(Some(Self::read_json(resp).await?)),
            Err(DirectoryError::Status(code)) if code == StatusCode::NOT_FOUND.as_u16() => Ok(None),
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use mockito::Matcher;

    use super::*;

    #[tokio::test]
    async fn nearby_sends_radius_and_parses_vehicles() {
        let mut server = mockito::Server::new_async().await;

        let mock = server
            .mock("GET", "/api/threewheel/nearby")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("lon".into(), "-7.5898".into()),
                Matcher::UrlEncoded("lat".into(), "33.5731".into()),
                Matcher::UrlEncoded("radiusKm".into(), "15".into()),
            ]))
            .with_header("content-type", "application/json")
            .with_body(
                r#"[
                    {"id": "vehicle1", "lat": 33.57, "lon": -7.58, "distance": 0.42, "lastUpdate": 1700000000000},
                    {"id": "vehicle2", "lat": 33.60, "lon": -7.61, "distance": 3.1}
                ]"#,
            )
            .create_async()
            .await;

        let client = DirectoryClient::new(format!("{}/api/threewheel/", server.url()));
        let vehicles = client.nearby(-7.5898, 33.5731, 15).await.unwrap();

        mock.assert_async().await;
        assert_eq!(vehicles.len(), 2);
        assert_eq!(vehicles[0].id, "vehicle1");
        assert_eq!(vehicles[0].last_update, Some(1700000000000));
        assert_eq!(vehicles[1].distance, Some(3.1));
        assert_eq!(vehicles[1].last_update, None);
    }

    #[tokio::test]
    async fn nearby_server_error_is_status() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/nearby")
            .match_query(Matcher::Any)
            .with_status(503)
            .create_async()
            .await;

        let err = DirectoryClient::new(server.url())
            .nearby(0.0, 0.0, 1)
            .await
            .unwrap_err();

        assert!(matches!(err, DirectoryError::Status(503)));
        assert_eq!(err.to_string(), "Directory responded with status 503");
    }

    #[tokio::test]
    async fn vehicle_not_found_is_none() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/ghost")
            .with_status(404)
            .create_async()
            .await;

        let vehicle = DirectoryClient::new(server.url()).vehicle("ghost").await.unwrap();
        assert_eq!(vehicle, None);
    }

    #[tokio::test]
    async fn vehicle_without_distance() {
        let mut server = mockito::Server::new_async().await;

        server
            .mock("GET", "/vehicle3")
            .with_body(r#"{"id": "vehicle3", "lat": 33.5, "lon": -7.6, "lastUpdate": 5}"#)
            .create_async()
            .await;

        let vehicle = DirectoryClient::new(server.url())
            .vehicle("vehicle3")
            .await
            .unwrap()
            .unwrap();

        assert_eq!(vehicle.distance, None);
        assert_eq!(vehicle.position().lng, -7.6);
    }

    #[tokio::test]
    async fn fleet_management_calls() {
        let mut server = mockito::Server::new_async().await;

        let update = server
            .mock("POST", "/update")
            .match_query(Matcher::AllOf(vec![
                Matcher::UrlEncoded("id".into(), "vehicle9".into()),
                Matcher::UrlEncoded("lon".into(), "-7.5".into()),
                Matcher::UrlEncoded("lat".into(), "33.5".into()),
            ]))
            .with_body("Position updated for vehicle9")
            .create_async()
            .await;
        let remove = server
            .mock("DELETE", "/vehicle9")
            .with_body("Vehicle removed: vehicle9")
            .create_async()
            .await;
        let all = server
            .mock("GET", "/all")
            .with_body(r#"["vehicle1", "vehicle2"]"#)
            .create_async()
            .await;
        let clear = server
            .mock("POST", "/cache/clear")
            .with_body("Cache cleared")
            .create_async()
            .await;

        let client = DirectoryClient::new(server.url());
        client.report_position("vehicle9", -7.5, 33.5).await.unwrap();
        client.remove_vehicle("vehicle9").await.unwrap();
        let ids = client.all_vehicle_ids().await.unwrap();
        client.clear_cache().await.unwrap();

        update.assert_async().await;
        remove.assert_async().await;
        all.assert_async().await;
        clear.assert_async().await;
        assert_eq!(ids, vec!["vehicle1".to_string(), "vehicle2".to_string()]);
    }
}
