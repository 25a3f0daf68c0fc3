pub mod directory_client;
pub mod types;
