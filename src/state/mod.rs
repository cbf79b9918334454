pub mod app_state;
pub mod colors;
pub mod config;
pub mod legend;
