use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponseValue {
    pub text: String,
    pub value: u64,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponseLeg {
    pub distance: GoogleDirectionsResponseValue,
    pub duration: GoogleDirectionsResponseValue,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponsePolyline {
    pub points: String,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponseRoute {
    #[serde(default)]
    pub summary: String,
    pub legs: Vec<GoogleDirectionsResponseLeg>,
    pub overview_polyline: GoogleDirectionsResponsePolyline,
}

#[derive(Serialize, Deserialize)]
pub struct GoogleDirectionsResponse {
    #[serde(default)]
    pub routes: Vec<GoogleDirectionsResponseRoute>,
    pub status: String,
}
