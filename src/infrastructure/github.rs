//! GitHub-backed implementation of the [`TemplateHost`] port.
//!
//! One `reqwest::Client` with connection pooling, per-call timeouts from
//! configuration, and injectable base URLs so tests can point the host at a
//! local mock server.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::domain::models::Config;
use crate::domain::ports::{BridgeError, TemplateHost};

#[derive(Debug, Deserialize)]
struct RepoInfo {
    name: String,
}

#[derive(Debug, Deserialize)]
struct BranchInfo {
    name: String,
}

/// GitHub REST and raw-content client for the template organization.
pub struct GithubHost {
    http: Client,
    org: String,
    api_base_url: String,
    raw_base_url: String,
    default_branch: String,
    repos_per_page: u32,
    max_branches: usize,
    catalog_timeout: Duration,
    branches_timeout: Duration,
    readme_timeout: Duration,
}

impl GithubHost {
    /// Build a host from configuration.
    pub fn new(config: &Config) -> Result<Self, BridgeError> {
        let http = Client::builder()
            .user_agent(concat!("taskbeacon-mcp/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            http,
            org: config.github.org.clone(),
            api_base_url: config.github.api_base_url.clone(),
            raw_base_url: config.github.raw_base_url.clone(),
            default_branch: config.github.default_branch.clone(),
            repos_per_page: config.limits.repos_per_page,
            max_branches: config.limits.max_branches,
            catalog_timeout: Duration::from_secs(config.timeouts.catalog_secs),
            branches_timeout: Duration::from_secs(config.timeouts.branches_secs),
            readme_timeout: Duration::from_secs(config.timeouts.readme_secs),
        })
    }
}

#[async_trait]
impl TemplateHost for GithubHost {
    async fn list_repo_names(&self) -> Result<Vec<String>, BridgeError> {
        // Single page; repositories beyond it are an accepted scale limit.
        let url = format!(
            "{}/orgs/{}/repos?per_page={}",
            self.api_base_url, self.org, self.repos_per_page
        );
        let response = self
            .http
            .get(&url)
            .timeout(self.catalog_timeout)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(BridgeError::RemoteService {
                status: response.status().as_u16(),
                url,
            });
        }

        let repos: Vec<RepoInfo> = response.json().await?;
        Ok(repos.into_iter().map(|r| r.name).collect())
    }

    async fn list_branches(&self, repo: &str) -> Vec<String> {
        // Only max_branches entries are kept, so only that many are asked
        // for; the take below guards against servers ignoring per_page.
        let url = format!(
            "{}/repos/{}/{}/branches?per_page={}",
            self.api_base_url, self.org, repo, self.max_branches
        );

        let response = match self
            .http
            .get(&url)
            .timeout(self.branches_timeout)
            .send()
            .await
        {
            Ok(r) if r.status().is_success() => r,
            Ok(r) => {
                debug!(repo, status = %r.status(), "branch listing degraded to empty");
                return Vec::new();
            }
            Err(e) => {
                debug!(repo, error = %e, "branch listing degraded to empty");
                return Vec::new();
            }
        };

        match response.json::<Vec<BranchInfo>>().await {
            Ok(branches) => branches
                .into_iter()
                .take(self.max_branches)
                .map(|b| b.name)
                .collect(),
            Err(e) => {
                debug!(repo, error = %e, "branch payload unreadable, degraded to empty");
                Vec::new()
            }
        }
    }

    async fn fetch_readme(&self, repo: &str) -> Option<String> {
        let url = format!(
            "{}/{}/{}/{}/README.md",
            self.raw_base_url, self.org, repo, self.default_branch
        );

        let response = match self.http.get(&url).timeout(self.readme_timeout).send().await {
            Ok(r) => r,
            Err(e) => {
                debug!(repo, error = %e, "README fetch degraded to empty");
                return None;
            }
        };

        if !response.status().is_success() {
            debug!(repo, status = %response.status(), "README fetch degraded to empty");
            return None;
        }

        response.text().await.ok()
    }
}
