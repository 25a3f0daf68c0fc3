pub mod location;
pub mod map_surface;
pub mod maps_client;
pub mod vehicle_directory;
