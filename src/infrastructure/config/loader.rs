//! Configuration loader with hierarchical merging.

use anyhow::{Context, Result};
use figment::providers::{Env, Format, Serialized, Yaml};
use figment::Figment;
use thiserror::Error;

use crate::domain::models::Config;

/// Configuration error types.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Organization name cannot be empty")]
    EmptyOrg,

    #[error("Cache root cannot be empty")]
    EmptyCacheRoot,

    #[error("Invalid repos_per_page: {0}. Must be between 1 and 100")]
    InvalidReposPerPage(u32),

    #[error("Invalid max_branches: {0}. Must be at least 1")]
    InvalidMaxBranches(usize),

    #[error("Invalid readme_snippet_chars: {0}. Must be at least 1")]
    InvalidSnippetChars(usize),

    #[error("Invalid timeout: {0} must be at least 1 second")]
    InvalidTimeout(&'static str),

    #[error("Invalid log level: {0}. Must be one of: trace, debug, info, warn, error")]
    InvalidLogLevel(String),
}

/// Configuration loader with hierarchical merging.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load configuration with hierarchical merging.
    ///
    /// Precedence (lowest to highest):
    /// 1. Programmatic defaults (Serialized)
    /// 2. `taskbeacon.yaml` in the working directory (optional)
    /// 3. Environment variables (`TASKBEACON_*` prefix, highest priority)
    pub fn load() -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file("taskbeacon.yaml"))
            .merge(Env::prefixed("TASKBEACON_").split("__"))
            .extract()
            .context("Failed to extract configuration from figment")?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Load configuration from a specific file.
    pub fn load_from_file(path: impl AsRef<std::path::Path>) -> Result<Config> {
        let config: Config = Figment::new()
            .merge(Serialized::defaults(Config::default()))
            .merge(Yaml::file(path.as_ref()))
            .extract()
            .context(format!(
                "Failed to load config from {}",
                path.as_ref().display()
            ))?;

        Self::validate(&config)?;
        Ok(config)
    }

    /// Validate configuration after loading.
    pub fn validate(config: &Config) -> Result<(), ConfigError> {
        if config.github.org.is_empty() {
            return Err(ConfigError::EmptyOrg);
        }

        if config.cache.root.is_empty() {
            return Err(ConfigError::EmptyCacheRoot);
        }

        if config.limits.repos_per_page == 0 || config.limits.repos_per_page > 100 {
            return Err(ConfigError::InvalidReposPerPage(
                config.limits.repos_per_page,
            ));
        }

        if config.limits.max_branches == 0 {
            return Err(ConfigError::InvalidMaxBranches(config.limits.max_branches));
        }

        if config.limits.readme_snippet_chars == 0 {
            return Err(ConfigError::InvalidSnippetChars(
                config.limits.readme_snippet_chars,
            ));
        }

        let timeouts = [
            ("catalog_secs", config.timeouts.catalog_secs),
            ("branches_secs", config.timeouts.branches_secs),
            ("readme_secs", config.timeouts.readme_secs),
            ("clone_secs", config.timeouts.clone_secs),
        ];
        for (name, secs) in timeouts {
            if secs == 0 {
                return Err(ConfigError::InvalidTimeout(name));
            }
        }

        let valid_log_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_log_levels.contains(&config.logging.level.as_str()) {
            return Err(ConfigError::InvalidLogLevel(config.logging.level.clone()));
        }

        Ok(())
    }
}
