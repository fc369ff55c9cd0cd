use std::path::PathBuf;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("TOML parse error: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("failed to list repositories of {org}: {message}")]
    LookupFailed { org: String, message: String },

    #[error("failed to create directory: {0} is a file")]
    NotADirectory(PathBuf),

    #[error("failed to create directory: {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("No home directory")]
    NoHomeDir,

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Task join error: {0}")]
    TaskJoin(String),
}

pub type Result<T> = std::result::Result<T, Error>;

/// Why a single repository could not be cloned.
///
/// Kept separate from [`Error`] so it can be cloned into messages and render
/// snapshots.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum CloneError {
    #[error("git clone failed: {name}: {output}")]
    Failed { name: String, output: String },

    #[error("git clone failed: {name}: could not run git: {message}")]
    Spawn { name: String, message: String },

    #[error("git clone skipped: {0}: duplicate repository name")]
    DuplicateName(String),

    #[error("git clone skipped: {0}: cancelled before start")]
    Cancelled(String),

    #[error("git clone aborted: {name}: {message}")]
    Aborted { name: String, message: String },
}

impl CloneError {
    pub fn repository(&self) -> &str {
        match self {
            CloneError::Failed { name, .. }
            | CloneError::Spawn { name, .. }
            | CloneError::Aborted { name, .. } => name,
            CloneError::DuplicateName(name) | CloneError::Cancelled(name) => name,
        }
    }
}
