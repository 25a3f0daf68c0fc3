#[derive(Debug)]
pub enum MapsServiceError {
    Internal(String),
    Status(String),
}

impl std::fmt::Display for MapsServiceError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            MapsServiceError::Internal(e) => write!(f, "Internal error: {}", e),
            MapsServiceError::Status(s) => write!(f, "Maps API returned status {}", s),
        }
    }
}

impl std::error::Error for MapsServiceError {}
