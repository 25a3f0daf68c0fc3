#[derive(Debug)]
pub enum DirectoryError {
    Internal(String),
    Status(u16),
}

impl std::fmt::Display for DirectoryError {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            DirectoryError::Internal(e) => write!(f, "Internal error: {}", e),
            DirectoryError::Status(code) => write!(f, "Directory responded with status {}", code),
        }
    }
}

impl std::error::Error for DirectoryError {}
