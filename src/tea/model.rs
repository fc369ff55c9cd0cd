//! Model for the TEA (The Elm Architecture) pattern.
//!
//! The Model is pure application state - no channels, no handles, no runtime
//! infrastructure. `ProgressState` is the progress state machine; only
//! `update` changes it.

use std::fmt;
use std::path::PathBuf;

use crate::render::{next_version, RenderState};
use crate::repo::Failure;

/// Why a run ended early.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FatalReason {
    LookupFailed(String),
    DirectoryPrepFailed(String),
    Cancelled,
}

impl fmt::Display for FatalReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FatalReason::LookupFailed(reason) => {
                write!(f, "Error gathering the repositories: {}", reason)
            }
            FatalReason::DirectoryPrepFailed(reason) => {
                write!(f, "Error preparing the destination: {}", reason)
            }
            FatalReason::Cancelled => write!(f, "Cancelled"),
        }
    }
}

/// Where a run is.
///
/// `Loading → Listing → Cloning → Done`, with `Fatal` reachable from every
/// non-terminal state. `Done` and `Fatal` are terminal.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ProgressState {
    #[default]
    Loading,
    Listing,
    Cloning {
        completed: usize,
        total: usize,
        /// In arrival order.
        failures: Vec<Failure>,
    },
    Done {
        total: usize,
        failures: Vec<Failure>,
    },
    Fatal(FatalReason),
}

impl ProgressState {
    pub fn is_terminal(&self) -> bool {
        matches!(self, ProgressState::Done { .. } | ProgressState::Fatal(_))
    }

    /// Waiting on the lookup or destination preparation.
    pub fn is_gathering(&self) -> bool {
        matches!(self, ProgressState::Loading | ProgressState::Listing)
    }

    /// Process exit status for a finished run.
    pub fn exit_code(&self) -> i32 {
        match self {
            ProgressState::Done { failures, .. } if failures.is_empty() => 0,
            _ => 1,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            ProgressState::Loading => "Loading",
            ProgressState::Listing => "Listing",
            ProgressState::Cloning { .. } => "Cloning",
            ProgressState::Done { .. } => "Done",
            ProgressState::Fatal(FatalReason::Cancelled) => "Cancelled",
            ProgressState::Fatal(_) => "Error",
        }
    }

    /// `(completed, total)` while cloning or once done.
    pub fn progress(&self) -> Option<(usize, usize)> {
        match self {
            ProgressState::Cloning {
                completed, total, ..
            } => Some((*completed, *total)),
            ProgressState::Done { total, .. } => Some((*total, *total)),
            _ => None,
        }
    }

    pub fn failures(&self) -> &[Failure] {
        match self {
            ProgressState::Cloning { failures, .. } | ProgressState::Done { failures, .. } => {
                failures
            }
            _ => &[],
        }
    }
}

/// Pure application state - the single source of truth.
pub struct Model {
    pub state: ProgressState,

    // Run parameters (immutable after init)
    pub org: String,
    pub destination: PathBuf,
    /// Whether a TUI renders this run. Plain runs quit as soon as the run is
    /// over; interactive runs wait for a key.
    pub interactive: bool,

    /// Listing pages that failed and were skipped.
    pub skipped_pages: usize,
    pub spinner_frame: usize,

    // Dirty flag - set when state changes and render is needed
    pub dirty: bool,
}

impl Model {
    pub fn new(org: impl Into<String>, destination: impl Into<PathBuf>, interactive: bool) -> Self {
        Self {
            state: ProgressState::default(),
            org: org.into(),
            destination: destination.into(),
            interactive,
            skipped_pages: 0,
            spinner_frame: 0,
            dirty: true,
        }
    }

    /// Create an immutable snapshot for the renderer.
    ///
    /// Each snapshot gets a monotonically increasing version number so the
    /// renderer can skip redundant frames.
    pub fn snapshot(&self) -> RenderState {
        RenderState {
            version: next_version(),
            org: self.org.clone(),
            destination: self.destination.display().to_string(),
            state: self.state.clone(),
            skipped_pages: self.skipped_pages,
            spinner_frame: self.spinner_frame,
            interactive: self.interactive,
        }
    }
}
