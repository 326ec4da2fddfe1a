//! Configuration model for the template bridge.
//!
//! Pagination and truncation caps are deliberate configuration constants
//! rather than magic numbers buried in the fetch code, so they can be tuned
//! without touching logic.

use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Main configuration structure for taskbeacon-mcp.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct Config {
    /// Hosting organization and endpoint configuration.
    #[serde(default)]
    pub github: GithubConfig,

    /// Local clone cache configuration.
    #[serde(default)]
    pub cache: CacheConfig,

    /// Pagination and truncation caps.
    #[serde(default)]
    pub limits: LimitsConfig,

    /// Per-operation remote timeouts.
    #[serde(default)]
    pub timeouts: TimeoutsConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub organization and endpoint configuration.
///
/// Base URLs are injectable so tests can point the host at a mock server.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct GithubConfig {
    /// Organization holding the template repositories.
    #[serde(default = "default_org")]
    pub org: String,

    /// REST API base URL.
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Raw file content base URL.
    #[serde(default = "default_raw_base_url")]
    pub raw_base_url: String,

    /// Clone remote base URL (`<base>/<repo>.git`).
    #[serde(default = "default_clone_base_url")]
    pub clone_base_url: String,

    /// Branch used for raw README lookups.
    #[serde(default = "default_branch")]
    pub default_branch: String,

    /// Organizational/meta repositories never treated as task templates.
    /// Matched case-sensitively against the exact API-returned name, before
    /// any other filtering.
    #[serde(default = "default_excluded_repos")]
    pub excluded_repos: HashSet<String>,
}

fn default_org() -> String {
    "TaskBeacon".to_string()
}

fn default_api_base_url() -> String {
    "https://api.github.com".to_string()
}

fn default_raw_base_url() -> String {
    "https://raw.githubusercontent.com".to_string()
}

fn default_clone_base_url() -> String {
    "https://github.com/TaskBeacon".to_string()
}

fn default_branch() -> String {
    "main".to_string()
}

fn default_excluded_repos() -> HashSet<String> {
    [
        "task-registry",
        ".github",
        "psyflow",
        "psyflow-mcp",
        "community",
        "taskbeacon.github.io",
    ]
    .into_iter()
    .map(str::to_string)
    .collect()
}

impl Default for GithubConfig {
    fn default() -> Self {
        Self {
            org: default_org(),
            api_base_url: default_api_base_url(),
            raw_base_url: default_raw_base_url(),
            clone_base_url: default_clone_base_url(),
            default_branch: default_branch(),
            excluded_repos: default_excluded_repos(),
        }
    }
}

/// Local clone cache configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct CacheConfig {
    /// Cache root directory; one subdirectory per materialized repository.
    #[serde(default = "default_cache_root")]
    pub root: String,
}

fn default_cache_root() -> String {
    "./task_cache".to_string()
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            root: default_cache_root(),
        }
    }
}

/// Pagination and truncation caps.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LimitsConfig {
    /// Page size for the single catalog request. Repositories beyond this
    /// page are not retrieved; an accepted scale limit.
    #[serde(default = "default_repos_per_page")]
    pub repos_per_page: u32,

    /// Maximum branch names returned per repository.
    #[serde(default = "default_max_branches")]
    pub max_branches: usize,

    /// README snippet bound in characters.
    #[serde(default = "default_readme_snippet_chars")]
    pub readme_snippet_chars: usize,
}

const fn default_repos_per_page() -> u32 {
    100
}

const fn default_max_branches() -> usize {
    10
}

const fn default_readme_snippet_chars() -> usize {
    2000
}

impl Default for LimitsConfig {
    fn default() -> Self {
        Self {
            repos_per_page: default_repos_per_page(),
            max_branches: default_max_branches(),
            readme_snippet_chars: default_readme_snippet_chars(),
        }
    }
}

/// Per-operation remote timeouts, in seconds.
///
/// Catalog and clone failures are fatal to their invocation; README and
/// branch fetches degrade to empty values on expiry.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct TimeoutsConfig {
    /// Catalog listing timeout.
    #[serde(default = "default_catalog_secs")]
    pub catalog_secs: u64,

    /// Branch listing timeout.
    #[serde(default = "default_branches_secs")]
    pub branches_secs: u64,

    /// README fetch timeout.
    #[serde(default = "default_readme_secs")]
    pub readme_secs: u64,

    /// Shallow clone timeout.
    #[serde(default = "default_clone_secs")]
    pub clone_secs: u64,
}

const fn default_catalog_secs() -> u64 {
    30
}

const fn default_branches_secs() -> u64 {
    15
}

const fn default_readme_secs() -> u64 {
    10
}

const fn default_clone_secs() -> u64 {
    600
}

impl Default for TimeoutsConfig {
    fn default() -> Self {
        Self {
            catalog_secs: default_catalog_secs(),
            branches_secs: default_branches_secs(),
            readme_secs: default_readme_secs(),
            clone_secs: default_clone_secs(),
        }
    }
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub struct LoggingConfig {
    /// Default log level when `RUST_LOG` is unset.
    #[serde(default = "default_log_level")]
    pub level: String,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}
