pub mod camera;
pub mod config;
pub mod gesture;
pub mod hand;
pub mod net;
pub mod render;
