//! Full runs: fake GitHub listing, real git clones from local origins.

use clone_org::app::{App, RunParams};
use clone_org::clone::{ConcurrencyLimiter, GitCloner};
use clone_org::config::Protocol;
use clone_org::github::GithubDirectory;
use clone_org::render::StateSender;
use clone_org::tea::{FatalReason, ProgressState};
use clone_org::ui;

use crate::fixtures::{repos_json_with_urls, FakeGithub, Origins, PageSpec};

fn params(destination: std::path::PathBuf) -> RunParams {
    RunParams {
        org: "acme".to_string(),
        token: "secret".to_string(),
        destination,
        interactive: false,
    }
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clones_listed_repositories_and_reports_failures() {
    let origins = Origins::new(&["api", "web", "docs"]);
    let server = FakeGithub::start(vec![
        PageSpec::ok(
            repos_json_with_urls(&[("api", origins.url("api")), ("web", origins.url("web"))]),
            Some(2),
        ),
        PageSpec::ok(
            repos_json_with_urls(&[
                ("docs", origins.url("docs")),
                ("gone", origins.url("gone")),
            ]),
            None,
        ),
    ]);
    let work = tempfile::tempdir().unwrap();
    let destination = work.path().join("nested").join("acme");

    let app = App::new(
        params(destination.clone()),
        GithubDirectory::new(&server.config(2, Protocol::Https)).unwrap(),
        GitCloner::new(),
        ConcurrencyLimiter::new(2),
    )
    .detached();
    let (tx, rx) = StateSender::every_state();

    let final_state = app.run(tx).await;

    match &final_state.state {
        ProgressState::Done { total, failures } => {
            assert_eq!(*total, 4);
            assert_eq!(failures.len(), 1);
            assert_eq!(failures[0].name, "gone");
        }
        other => panic!("expected Done, got {:?}", other),
    }
    assert_eq!(final_state.state.exit_code(), 1);
    for name in ["api", "web", "docs"] {
        assert!(destination.join(name).join("README.md").is_file(), "{} missing", name);
    }
    assert!(!destination.join("gone").exists());

    let progress: Vec<_> = rx.try_iter().filter_map(|s| s.state.progress()).collect();
    assert_eq!(progress.first(), Some(&(0, 4)));
    assert!(progress.windows(2).all(|w| w[0].0 <= w[1].0));

    let summary = ui::summary(&final_state);
    assert!(summary.starts_with("Cloned 3 of 4 repositories"));
    assert!(summary.contains("gone:"));
}

#[tokio::test(flavor = "multi_thread", worker_threads = 2)]
async fn test_clean_run_exits_zero() {
    let origins = Origins::new(&["api"]);
    let server = FakeGithub::start(vec![PageSpec::ok(
        repos_json_with_urls(&[("api", origins.url("api"))]),
        None,
    )]);
    let work = tempfile::tempdir().unwrap();

    let app = App::new(
        params(work.path().join("acme")),
        GithubDirectory::new(&server.config(30, Protocol::Ssh)).unwrap(),
        GitCloner::new(),
        ConcurrencyLimiter::default(),
    )
    .detached();
    let (tx, _rx) = StateSender::every_state();

    let final_state = app.run(tx).await;

    assert_eq!(
        final_state.state,
        ProgressState::Done {
            total: 1,
            failures: vec![]
        }
    );
    assert_eq!(final_state.state.exit_code(), 0);
    assert!(ui::summary(&final_state).starts_with("Cloned 1 repositories"));
}

#[tokio::test]
async fn test_partial_listing_is_flagged_not_fatal() {
    let server = FakeGithub::start(vec![
        PageSpec::error(500, Some(2)),
        PageSpec::ok("[]".to_string(), None),
    ]);
    let work = tempfile::tempdir().unwrap();

    let app = App::new(
        params(work.path().join("acme")),
        GithubDirectory::new(&server.config(30, Protocol::Ssh)).unwrap(),
        GitCloner::new(),
        ConcurrencyLimiter::default(),
    )
    .detached();
    let (tx, _rx) = StateSender::every_state();

    let final_state = app.run(tx).await;

    assert!(matches!(final_state.state, ProgressState::Done { total: 0, .. }));
    assert_eq!(final_state.skipped_pages, 1);
    assert!(ui::summary(&final_state).contains("1 page(s)"));
}

#[tokio::test]
async fn test_rejected_token_is_fatal() {
    let server = FakeGithub::start(vec![PageSpec::error(401, None)]);
    let work = tempfile::tempdir().unwrap();

    let app = App::new(
        params(work.path().join("acme")),
        GithubDirectory::new(&server.config(30, Protocol::Ssh)).unwrap(),
        GitCloner::new(),
        ConcurrencyLimiter::default(),
    )
    .detached();
    let (tx, _rx) = StateSender::every_state();

    let final_state = app.run(tx).await;

    assert!(matches!(
        final_state.state,
        ProgressState::Fatal(FatalReason::LookupFailed(_))
    ));
    assert_eq!(final_state.state.exit_code(), 1);
    assert!(!work.path().join("acme").exists());
    assert!(ui::summary(&final_state).starts_with("Error gathering the repositories"));
}
