//! Commands for the TEA (The Elm Architecture) pattern.
//!
//! Commands are outputs from the update function - they represent side effects
//! to be executed by the runtime.

use crate::repo::Repository;

/// Output commands from the update function.
#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    /// List the organization and prepare the destination.
    ListRepos,

    /// Hand the repositories to the clone orchestrator.
    StartCloning { repos: Vec<Repository> },

    /// Stop scheduling clones that have not started.
    CancelClones,

    // App lifecycle
    Quit,
}
