//! Fans clone work out across the limiter and collects every result.

use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

use crate::error::CloneError;
use crate::repo::{CloneResult, Failure, Repository};

use super::executor::CloneExecutor;
use super::limiter::ConcurrencyLimiter;

/// Aggregate of a finished run, in submission order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CloneReport {
    pub results: Vec<CloneResult>,
}

impl CloneReport {
    pub fn total(&self) -> usize {
        self.results.len()
    }

    pub fn succeeded(&self) -> usize {
        self.results.iter().filter(|r| r.is_success()).count()
    }

    pub fn failures(&self) -> Vec<Failure> {
        self.results
            .iter()
            .filter_map(CloneResult::failure_entry)
            .collect()
    }
}

/// Schedules one clone per repository, at most `limiter.capacity()` at once.
///
/// Each result is sent on the event channel as soon as it is known, so
/// events arrive in completion order. Cancelling the token stops clones that
/// have not started yet; running clones finish normally.
pub struct CloneOrchestrator<E> {
    executor: Arc<E>,
    limiter: ConcurrencyLimiter,
    cancel: CancellationToken,
}

impl<E: CloneExecutor> CloneOrchestrator<E> {
    pub fn new(executor: Arc<E>, limiter: ConcurrencyLimiter, cancel: CancellationToken) -> Self {
        Self {
            executor,
            limiter,
            cancel,
        }
    }

    /// Clone every repository and return once each has produced exactly one
    /// result. A closed event channel is not an error: results are still
    /// collected into the report.
    pub async fn run<T>(
        &self,
        repos: Vec<Repository>,
        destination: &Path,
        events: mpsc::UnboundedSender<T>,
    ) -> CloneReport
    where
        T: From<CloneResult> + Send + 'static,
    {
        if repos.is_empty() {
            return CloneReport::default();
        }

        tracing::info!(
            "cloning {} repositories into {} (concurrency {})",
            repos.len(),
            destination.display(),
            self.limiter.capacity()
        );

        let mut seen = HashSet::with_capacity(repos.len());
        let mut pending: Vec<Pending> = Vec::with_capacity(repos.len());

        for repo in repos {
            if !seen.insert(repo.name.clone()) {
                tracing::warn!("duplicate repository name {}, not cloning twice", repo.name);
                let error = CloneError::DuplicateName(repo.name.clone());
                let result = CloneResult::failure(repo, error);
                let _ = events.send(T::from(result.clone()));
                pending.push(Pending::Ready(result));
                continue;
            }
            let handle = self.spawn_one(repo.clone(), destination.to_path_buf(), events.clone());
            pending.push(Pending::Running(repo, handle));
        }

        let mut results = Vec::with_capacity(pending.len());
        for entry in pending {
            let result = match entry {
                Pending::Ready(result) => result,
                Pending::Running(repo, handle) => match handle.await {
                    Ok(result) => result,
                    Err(e) => {
                        tracing::error!("clone task for {} aborted: {}", repo.name, e);
                        let error = CloneError::Aborted {
                            name: repo.name.clone(),
                            message: e.to_string(),
                        };
                        let result = CloneResult::failure(repo, error);
                        let _ = events.send(T::from(result.clone()));
                        result
                    }
                },
            };
            results.push(result);
        }

        let report = CloneReport { results };
        tracing::info!(
            "clone run finished: {} of {} succeeded",
            report.succeeded(),
            report.total()
        );
        report
    }

    fn spawn_one<T>(
        &self,
        repo: Repository,
        destination: PathBuf,
        events: mpsc::UnboundedSender<T>,
    ) -> JoinHandle<CloneResult>
    where
        T: From<CloneResult> + Send + 'static,
    {
        let executor = self.executor.clone();
        let limiter = self.limiter.clone();
        let cancel = self.cancel.clone();

        tokio::spawn(async move {
            let permit = tokio::select! {
                biased;
                _ = cancel.cancelled() => None,
                permit = limiter.acquire() => permit,
            };

            let result = match permit {
                Some(_permit) if !cancel.is_cancelled() => {
                    executor.execute(&repo, &destination).await
                }
                _ => CloneResult::failure(repo.clone(), CloneError::Cancelled(repo.name.clone())),
            };

            let _ = events.send(T::from(result.clone()));
            result
        })
    }
}

enum Pending {
    Ready(CloneResult),
    Running(Repository, JoinHandle<CloneResult>),
}
