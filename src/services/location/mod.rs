pub mod location_provider;
