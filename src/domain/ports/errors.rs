//! Error taxonomy for the template bridge.

use std::path::PathBuf;

use thiserror::Error;

/// Errors surfaced by the template bridge.
///
/// Two-tier policy: everything here is fatal to the invocation that raised
/// it and propagates unchanged to the MCP boundary. Enrichment fetches
/// (README, branches) never produce these errors; they degrade to empty
/// values at the fetch site instead. There is no retry logic in the core.
#[derive(Debug, Error)]
pub enum BridgeError {
    /// The hosting API answered with a non-success status.
    #[error("hosting API returned {status} for {url}")]
    RemoteService {
        /// HTTP status code returned by the API.
        status: u16,
        /// Full URL of the failed request.
        url: String,
    },

    /// No catalog entry matched the requested name.
    #[error("template repository not found: {0}")]
    TemplateNotFound(String),

    /// The task directory carries no `config.yaml`.
    #[error("config.yaml not found under {0}")]
    ConfigNotFound(PathBuf),

    /// `git clone` exited non-zero or exceeded the clone timeout.
    #[error("clone of {repo} failed: {detail}")]
    CloneFailed {
        /// Repository that was being cloned.
        repo: String,
        /// Git's stderr, or a timeout description.
        detail: String,
    },

    /// Transport-level HTTP failure before any status was read.
    #[error("request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Filesystem failure while managing the local cache.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}
