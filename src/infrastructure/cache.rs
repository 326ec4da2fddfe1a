//! Local clone cache for template repositories.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::sync::Arc;
use std::time::Duration;

use tokio::process::Command;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument};

use crate::domain::models::Config;
use crate::domain::ports::BridgeError;

/// Idempotent materialization of template repositories.
///
/// A repository maps to `<root>/<name>`. The directory's existence alone is
/// the cache-hit signal: no freshness check, no content validation, no
/// eviction. Clones are shallow (depth 1) since template history is never
/// needed. A per-repository-name async lock serializes concurrent
/// materialize calls for the same name, so the existence check cannot race
/// the clone.
pub struct CloneCache {
    root: PathBuf,
    clone_base_url: String,
    clone_timeout: Duration,
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl CloneCache {
    /// Create a cache rooted at `root`, creating the directory if absent.
    pub fn new(root: impl Into<PathBuf>, config: &Config) -> Result<Self, BridgeError> {
        let root = root.into();
        std::fs::create_dir_all(&root)?;
        Ok(Self {
            root,
            clone_base_url: config.github.clone_base_url.clone(),
            clone_timeout: Duration::from_secs(config.timeouts.clone_secs),
            locks: Mutex::new(HashMap::new()),
        })
    }

    /// Cache root directory.
    pub fn root(&self) -> &Path {
        &self.root
    }

    async fn lock_for(&self, repo: &str) -> Arc<Mutex<()>> {
        let mut locks = self.locks.lock().await;
        locks.entry(repo.to_string()).or_default().clone()
    }

    /// Ensure `repo` exists on local disk and return its path.
    ///
    /// A pre-existing directory is returned as-is without touching the
    /// network. Otherwise performs a shallow clone from the configured
    /// remote, bounded by the clone timeout; expiry or a non-zero git exit
    /// is fatal to the invocation.
    #[instrument(skip(self))]
    pub async fn materialize(&self, repo: &str) -> Result<PathBuf, BridgeError> {
        let lock = self.lock_for(repo).await;
        let _guard = lock.lock().await;

        let dest = self.root.join(repo);
        if dest.exists() {
            debug!(repo, path = %dest.display(), "cache hit, skipping clone");
            return Ok(dest);
        }

        let remote = format!("{}/{}.git", self.clone_base_url, repo);
        info!(repo, remote = %remote, "cloning template");

        let clone = Command::new("git")
            .args(["clone", "--depth", "1", remote.as_str()])
            .arg(&dest)
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .output();

        let output = match tokio::time::timeout(self.clone_timeout, clone).await {
            Ok(result) => result?,
            Err(_) => {
                // The killed child may leave a half-written dest that would
                // read as a cache hit on the next call.
                self.discard_partial(&dest).await;
                return Err(BridgeError::CloneFailed {
                    repo: repo.to_string(),
                    detail: format!("timed out after {}s", self.clone_timeout.as_secs()),
                });
            }
        };

        if !output.status.success() {
            let detail = String::from_utf8_lossy(&output.stderr).trim().to_string();
            self.discard_partial(&dest).await;
            return Err(BridgeError::CloneFailed {
                repo: repo.to_string(),
                detail,
            });
        }

        Ok(dest)
    }

    /// Best-effort removal of a failed clone's leftovers.
    async fn discard_partial(&self, dest: &Path) {
        if let Err(e) = tokio::fs::remove_dir_all(dest).await {
            if e.kind() != std::io::ErrorKind::NotFound {
                debug!(path = %dest.display(), error = %e, "leftover clone directory not removed");
            }
        }
    }
}
