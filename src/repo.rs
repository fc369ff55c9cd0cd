//! Value types shared by the lookup, the orchestrator and the state machine.

use std::path::{Path, PathBuf};

use crate::error::CloneError;

/// A repository of an organization. Identity is the name.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Repository {
    pub name: String,
    pub url: String,
}

impl Repository {
    pub fn new(name: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            url: url.into(),
        }
    }

    /// Where this repository is cloned to inside `destination`.
    pub fn target_dir(&self, destination: &Path) -> PathBuf {
        destination.join(&self.name)
    }
}

/// Result of listing an organization.
///
/// `skipped_pages` counts listing pages that failed and were skipped; the
/// repositories from the other pages are still usable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RepoListing {
    pub repos: Vec<Repository>,
    pub skipped_pages: usize,
}

impl RepoListing {
    pub fn complete(repos: Vec<Repository>) -> Self {
        Self {
            repos,
            skipped_pages: 0,
        }
    }

    pub fn is_partial(&self) -> bool {
        self.skipped_pages > 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CloneOutcome {
    Success,
    Failure(CloneError),
}

/// Produced exactly once for every repository handed to the orchestrator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloneResult {
    pub repository: Repository,
    pub outcome: CloneOutcome,
}

impl CloneResult {
    pub fn success(repository: Repository) -> Self {
        Self {
            repository,
            outcome: CloneOutcome::Success,
        }
    }

    pub fn failure(repository: Repository, error: CloneError) -> Self {
        Self {
            repository,
            outcome: CloneOutcome::Failure(error),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.outcome, CloneOutcome::Success)
    }

    /// The failure entry to show to the user, if this clone failed.
    pub fn failure_entry(&self) -> Option<Failure> {
        match &self.outcome {
            CloneOutcome::Success => None,
            CloneOutcome::Failure(err) => Some(Failure {
                name: self.repository.name.clone(),
                reason: err.to_string(),
            }),
        }
    }
}

/// A failed repository as listed in progress and summary views.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Failure {
    pub name: String,
    pub reason: String,
}
