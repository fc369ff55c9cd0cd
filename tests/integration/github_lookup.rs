//! Repository lookup against the fake GitHub server.

use clone_org::config::Protocol;
use clone_org::github::{GithubDirectory, RepositoryDirectory};
use clone_org::Error;

use crate::fixtures::{repos_json, FakeGithub, PageSpec};

fn names(listing: &clone_org::repo::RepoListing) -> Vec<String> {
    listing.repos.iter().map(|r| r.name.clone()).collect()
}

#[tokio::test]
async fn test_follows_next_links_across_pages() {
    let server = FakeGithub::start(vec![
        PageSpec::ok(repos_json(&["api", "web"]), Some(2)),
        PageSpec::ok(repos_json(&["docs"]), None),
    ]);
    let directory = GithubDirectory::new(&server.config(2, Protocol::Ssh)).unwrap();

    let listing = directory.list("secret", "acme").await.unwrap();

    assert_eq!(names(&listing), vec!["api", "web", "docs"]);
    assert_eq!(listing.skipped_pages, 0);
    assert!(!listing.is_partial());
    assert_eq!(listing.repos[0].url, "git@github.com:acme/api.git");

    let requests = server.requests();
    assert_eq!(requests.len(), 2);
    assert!(requests[0].starts_with("GET /orgs/acme/repos?"));
    assert!(requests[0].contains("per_page=2"));
    assert!(requests[1].contains("page=2"));
    let head = requests[0].to_ascii_lowercase();
    assert!(head.contains("authorization: bearer secret"));
    assert!(head.contains("accept: application/vnd.github+json"));
    assert!(head.contains("user-agent: clone-org/"));
}

#[tokio::test]
async fn test_https_protocol_uses_clone_url() {
    let server = FakeGithub::start(vec![PageSpec::ok(repos_json(&["api"]), None)]);
    let directory = GithubDirectory::new(&server.config(30, Protocol::Https)).unwrap();

    let listing = directory.list("secret", "acme").await.unwrap();

    assert_eq!(listing.repos[0].url, "https://github.com/acme/api.git");
}

#[tokio::test]
async fn test_failed_page_is_skipped() {
    let server = FakeGithub::start(vec![
        PageSpec::ok(repos_json(&["api", "web"]), Some(2)),
        PageSpec::error(500, Some(3)),
        PageSpec::ok(repos_json(&["docs"]), None),
    ]);
    let directory = GithubDirectory::new(&server.config(2, Protocol::Ssh)).unwrap();

    let listing = directory.list("secret", "acme").await.unwrap();

    assert_eq!(names(&listing), vec!["api", "web", "docs"]);
    assert_eq!(listing.skipped_pages, 1);
    assert!(listing.is_partial());
}

#[tokio::test]
async fn test_failed_last_page_keeps_earlier_repos() {
    let server = FakeGithub::start(vec![
        PageSpec::ok(repos_json(&["api"]), Some(2)),
        PageSpec::error(502, None),
    ]);
    let directory = GithubDirectory::new(&server.config(1, Protocol::Ssh)).unwrap();

    let listing = directory.list("secret", "acme").await.unwrap();

    assert_eq!(names(&listing), vec!["api"]);
    assert_eq!(listing.skipped_pages, 1);
}

#[tokio::test]
async fn test_malformed_page_is_skipped() {
    let server = FakeGithub::start(vec![
        PageSpec::ok("{not json".to_string(), Some(2)),
        PageSpec::ok(repos_json(&["web"]), None),
    ]);
    let directory = GithubDirectory::new(&server.config(1, Protocol::Ssh)).unwrap();

    let listing = directory.list("secret", "acme").await.unwrap();

    assert_eq!(names(&listing), vec!["web"]);
    assert_eq!(listing.skipped_pages, 1);
}

#[tokio::test]
async fn test_no_successful_page_is_lookup_failure() {
    let server = FakeGithub::start(vec![PageSpec::error(401, None)]);
    let directory = GithubDirectory::new(&server.config(30, Protocol::Ssh)).unwrap();

    match directory.list("bad-token", "acme").await.unwrap_err() {
        Error::LookupFailed { org, message } => {
            assert_eq!(org, "acme");
            assert!(message.contains("401"), "message: {}", message);
        }
        other => panic!("expected LookupFailed, got {:?}", other),
    }
}

#[tokio::test]
async fn test_unreachable_server_is_lookup_failure() {
    // Bind and drop to get a port nobody listens on.
    let port = std::net::TcpListener::bind("127.0.0.1:0")
        .unwrap()
        .local_addr()
        .unwrap()
        .port();
    let config = clone_org::config::Config {
        api_url: Some(format!("http://127.0.0.1:{}", port)),
        ..Default::default()
    };
    let directory = GithubDirectory::new(&config).unwrap();

    assert!(matches!(
        directory.list("secret", "acme").await.unwrap_err(),
        Error::LookupFailed { .. }
    ));
}

#[tokio::test]
async fn test_empty_org_is_empty_listing() {
    let server = FakeGithub::start(vec![PageSpec::ok("[]".to_string(), None)]);
    let directory = GithubDirectory::new(&server.config(30, Protocol::Ssh)).unwrap();

    let listing = directory.list("secret", "acme").await.unwrap();

    assert!(listing.repos.is_empty());
    assert_eq!(listing.skipped_pages, 0);
}
