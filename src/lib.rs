pub mod app;
pub mod commands;
pub mod config;
pub mod engine;
pub mod logging;
pub mod media;
pub mod palette;
pub mod params;
pub mod platform;
pub mod playback;
pub mod raster;
pub mod render;
pub mod spectrum;
pub mod stage;
pub mod terminal;
pub mod visual;
