//! Organization repository listing over the GitHub REST API.
//!
//! Pages are followed through the `Link` header. A page that fails is logged
//! and skipped; the listing keeps whatever the other pages returned and
//! counts the skipped pages. Only a lookup where no page succeeded is an
//! error.

use std::future::Future;
use std::sync::LazyLock;
use std::time::Duration;

use regex::Regex;
use reqwest::header::{ACCEPT, LINK};
use serde::Deserialize;

use crate::config::{Config, Protocol};
use crate::repo::{RepoListing, Repository};
use crate::{Error, Result};

const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Matches the page number of the `rel="next"` entry of a `Link` header.
static NEXT_LINK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"<[^>]*[?&]page=(\d+)[^>]*>\s*;\s*rel="next""#).unwrap()
});

/// Source of the repositories belonging to an organization.
pub trait RepositoryDirectory: Send + Sync + 'static {
    fn list(&self, token: &str, org: &str) -> impl Future<Output = Result<RepoListing>> + Send;
}

#[derive(Debug, Deserialize)]
struct ApiRepo {
    name: String,
    ssh_url: String,
    clone_url: String,
}

impl ApiRepo {
    fn into_repository(self, protocol: Protocol) -> Repository {
        let url = match protocol {
            Protocol::Ssh => self.ssh_url,
            Protocol::Https => self.clone_url,
        };
        Repository::new(self.name, url)
    }
}

struct Page {
    repos: Vec<ApiRepo>,
    next: Option<u32>,
}

struct PageError {
    message: String,
    next: Option<u32>,
}

pub struct GithubDirectory {
    client: reqwest::Client,
    api_url: String,
    page_size: u32,
    protocol: Protocol,
}

impl GithubDirectory {
    pub fn new(config: &Config) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .user_agent(concat!("clone-org/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self {
            client,
            api_url: config.effective_api_url().to_string(),
            page_size: config.effective_page_size(),
            protocol: config.protocol,
        })
    }

    async fn fetch_page(
        &self,
        token: &str,
        org: &str,
        page: u32,
    ) -> std::result::Result<Page, PageError> {
        let url = format!("{}/orgs/{}/repos", self.api_url, org);
        let response = self
            .client
            .get(&url)
            .query(&[("per_page", self.page_size), ("page", page)])
            .bearer_auth(token)
            .header(ACCEPT, "application/vnd.github+json")
            .send()
            .await
            .map_err(|e| PageError {
                message: e.to_string(),
                next: None,
            })?;

        let next = response
            .headers()
            .get(LINK)
            .and_then(|v| v.to_str().ok())
            .and_then(next_page);

        let status = response.status();
        if !status.is_success() {
            return Err(PageError {
                message: format!("HTTP {}", status),
                next,
            });
        }

        let body = response.text().await.map_err(|e| PageError {
            message: e.to_string(),
            next,
        })?;
        let repos = serde_json::from_str::<Vec<ApiRepo>>(&body).map_err(|e| PageError {
            message: Error::from(e).to_string(),
            next,
        })?;
        Ok(Page { repos, next })
    }
}

impl RepositoryDirectory for GithubDirectory {
    async fn list(&self, token: &str, org: &str) -> Result<RepoListing> {
        let mut listing = RepoListing::default();
        let mut fetched_any = false;
        let mut last_error = None;
        let mut page = 1;

        loop {
            tracing::info!("Fetching repositories for {}, page {}...", org, page);
            let next = match self.fetch_page(token, org, page).await {
                Ok(fetched) => {
                    fetched_any = true;
                    tracing::info!(
                        "Fetched {} repositories on page {}",
                        fetched.repos.len(),
                        page
                    );
                    listing.repos.extend(
                        fetched
                            .repos
                            .into_iter()
                            .map(|r| r.into_repository(self.protocol)),
                    );
                    fetched.next
                }
                Err(e) => {
                    tracing::warn!(
                        "Error fetching repositories for {} on page {}: {}. Skipping this page.",
                        org,
                        page,
                        e.message
                    );
                    listing.skipped_pages += 1;
                    last_error = Some(e.message);
                    e.next
                }
            };

            match next {
                Some(n) if n > page => page = n,
                _ => break,
            }
        }

        if !fetched_any {
            return Err(Error::LookupFailed {
                org: org.to_string(),
                message: last_error.unwrap_or_else(|| "no page could be fetched".to_string()),
            });
        }

        if listing.repos.is_empty() {
            tracing::warn!(
                "No repositories fetched for {}. Check token permissions or organization name.",
                org
            );
        }
        if listing.is_partial() {
            tracing::warn!(
                "{} page(s) of {} could not be fetched; the listing is incomplete",
                listing.skipped_pages,
                org
            );
        }
        Ok(listing)
    }
}

/// Page number of the `rel="next"` link, if any.
fn next_page(link: &str) -> Option<u32> {
    NEXT_LINK_RE
        .captures(link)
        .and_then(|c| c.get(1))
        .and_then(|m| m.as_str().parse().ok())
}
