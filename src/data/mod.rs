pub mod cell;
pub mod loader;
