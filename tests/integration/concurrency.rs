//! The permit pool bound, observed through an instrumented executor.

use std::collections::HashSet;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;

use clone_org::clone::{CloneExecutor, CloneOrchestrator, ConcurrencyLimiter};
use clone_org::error::CloneError;
use clone_org::repo::{CloneResult, Repository};

/// Tracks how many clones run at once and which repositories it saw.
#[derive(Default)]
struct Instrumented {
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
    seen: Mutex<Vec<String>>,
}

impl CloneExecutor for Instrumented {
    async fn execute(&self, repo: &Repository, _destination: &Path) -> CloneResult {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);
        self.seen.lock().unwrap().push(repo.name.clone());

        tokio::time::sleep(Duration::from_millis(10)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        if repo.name.ends_with('7') {
            CloneResult::failure(
                repo.clone(),
                CloneError::Failed {
                    name: repo.name.clone(),
                    output: "fatal: simulated".to_string(),
                },
            )
        } else {
            CloneResult::success(repo.clone())
        }
    }
}

fn repos(n: usize) -> Vec<Repository> {
    (0..n)
        .map(|i| Repository::new(format!("repo{}", i), format!("file:///origin/repo{}", i)))
        .collect()
}

async fn run_with_capacity(n: usize, capacity: usize) -> (Arc<Instrumented>, Vec<CloneResult>, ConcurrencyLimiter) {
    let executor = Arc::new(Instrumented::default());
    let limiter = ConcurrencyLimiter::new(capacity);
    let orchestrator =
        CloneOrchestrator::new(executor.clone(), limiter.clone(), CancellationToken::new());
    let (tx, mut rx) = mpsc::unbounded_channel::<CloneResult>();

    let report = orchestrator.run(repos(n), Path::new("/unused"), tx).await;
    assert_eq!(report.total(), n);

    let mut events = Vec::new();
    while let Ok(result) = rx.try_recv() {
        events.push(result);
    }
    (executor, events, limiter)
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_never_exceeds_capacity() {
    let (executor, events, limiter) = run_with_capacity(40, 4).await;

    let max = executor.max_in_flight.load(Ordering::SeqCst);
    assert!(max <= 4, "{} clones ran at once with capacity 4", max);
    assert!(max >= 1);
    assert_eq!(events.len(), 40);
    assert_eq!(limiter.available(), 4);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_capacity_one_serializes() {
    let (executor, events, _) = run_with_capacity(8, 1).await;

    assert_eq!(executor.max_in_flight.load(Ordering::SeqCst), 1);
    assert_eq!(events.len(), 8);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
async fn test_every_repository_reported_exactly_once() {
    let (executor, events, limiter) = run_with_capacity(25, 6).await;

    let names: HashSet<_> = events.iter().map(|r| r.repository.name.clone()).collect();
    assert_eq!(names.len(), 25);
    assert_eq!(executor.seen.lock().unwrap().len(), 25);

    let failed: Vec<_> = events.iter().filter(|r| !r.is_success()).collect();
    // repo7 and repo17
    assert_eq!(failed.len(), 2);
    assert_eq!(limiter.in_use(), 0);
}
