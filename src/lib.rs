pub mod clone;
pub mod config;
pub mod destination;
pub mod error;
pub mod github;
pub mod log;
pub mod repo;

// Event loop / render split
pub mod actors;
pub mod app;
pub mod render;
pub mod tea;
pub mod ui;

pub use error::{CloneError, Error, Result};
