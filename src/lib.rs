pub mod args;
pub mod camera;
pub mod canvas;
pub mod config;
pub mod detector;
pub mod font;
pub mod geometry;
pub mod gesture;
pub mod output;
pub mod overlay;
pub mod scheduler;
pub mod trail;
pub mod ttf;
pub mod types;
