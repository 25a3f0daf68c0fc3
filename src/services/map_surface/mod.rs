pub mod map_scene;
