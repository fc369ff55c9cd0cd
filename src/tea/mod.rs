//! The Elm Architecture (TEA) implementation for clone-org.
//!
//! This module provides a clean separation of concerns:
//! - `Model`: Pure application state, including the progress state machine
//! - `Message`: Inputs to the update function
//! - `Command`: Outputs (side effects) from the update function
//! - `update`: Pure function that transforms state

pub mod command;
pub mod message;
pub mod model;
pub mod update;

pub use command::Command;
pub use message::Message;
pub use model::{FatalReason, Model, ProgressState};
pub use update::update;
