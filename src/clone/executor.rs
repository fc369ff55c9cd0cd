//! Runs a single shallow `git clone`.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::process::Stdio;

use tokio::process::Command;

use crate::error::CloneError;
use crate::repo::{CloneResult, Repository};

/// Clones one repository into a destination directory.
///
/// Implementations never return an error: every failure becomes a
/// [`CloneResult`] with a failed outcome so one repository cannot abort the
/// batch.
pub trait CloneExecutor: Send + Sync + 'static {
    fn execute(
        &self,
        repo: &Repository,
        destination: &Path,
    ) -> impl Future<Output = CloneResult> + Send;
}

/// Clones with the `git` command line, depth 1.
#[derive(Debug, Clone)]
pub struct GitCloner {
    git: PathBuf,
}

impl GitCloner {
    /// Use the `git` found on `PATH`.
    pub fn new() -> Self {
        let git = match which::which("git") {
            Ok(path) => path,
            Err(e) => {
                // Spawning will fail per repository and be reported there.
                tracing::warn!("git not found on PATH: {}", e);
                PathBuf::from("git")
            }
        };
        Self { git }
    }

    pub fn with_binary(git: impl Into<PathBuf>) -> Self {
        Self { git: git.into() }
    }

    fn command(&self, repo: &Repository, destination: &Path) -> Command {
        let mut cmd = Command::new(&self.git);
        cmd.args(["clone", "--depth", "1"])
            .arg(&repo.url)
            .arg(repo.target_dir(destination))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            // Never block on a credential prompt nobody can answer.
            .env("GIT_TERMINAL_PROMPT", "0");
        cmd
    }
}

impl Default for GitCloner {
    fn default() -> Self {
        Self::new()
    }
}

impl CloneExecutor for GitCloner {
    async fn execute(&self, repo: &Repository, destination: &Path) -> CloneResult {
        tracing::debug!(
            "git clone --depth 1 {} {}",
            repo.url,
            repo.target_dir(destination).display()
        );
        let output = match self.command(repo, destination).output().await {
            Ok(output) => output,
            Err(e) => {
                tracing::warn!("could not run git for {}: {}", repo.name, e);
                return CloneResult::failure(
                    repo.clone(),
                    CloneError::Spawn {
                        name: repo.name.clone(),
                        message: e.to_string(),
                    },
                );
            }
        };

        if output.status.success() {
            tracing::debug!("cloned {}", repo.name);
            return CloneResult::success(repo.clone());
        }

        let combined = combined_output(&output.stdout, &output.stderr);
        tracing::warn!(
            "git clone of {} exited with {}: {}",
            repo.name,
            output.status,
            combined
        );
        CloneResult::failure(
            repo.clone(),
            CloneError::Failed {
                name: repo.name.clone(),
                output: combined,
            },
        )
    }
}

fn combined_output(stdout: &[u8], stderr: &[u8]) -> String {
    let mut combined = String::from_utf8_lossy(stdout).into_owned();
    combined.push_str(&String::from_utf8_lossy(stderr));
    combined.trim().to_string()
}
