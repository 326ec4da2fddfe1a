//! Port for the repository-hosting service.

use async_trait::async_trait;

use super::errors::BridgeError;

/// Seam for the remote repository-hosting API (catalog, branches, README).
///
/// The catalog call is correctness-critical and fails hard. Branch and
/// README lookups are enrichment: they degrade to empty values on any
/// failure, which is why their signatures carry no `Result`.
#[async_trait]
pub trait TemplateHost: Send + Sync {
    /// List every repository name under the template organization, in the
    /// order the hosting API returns them. Unfiltered; the catalog service
    /// applies the exclusion set.
    async fn list_repo_names(&self) -> Result<Vec<String>, BridgeError>;

    /// Fetch branch names for a repository, truncated to the configured cap.
    /// Best-effort: empty on any failure. Callers must not assume the list
    /// is complete.
    async fn list_branches(&self, repo: &str) -> Vec<String>;

    /// Fetch the raw README content from the repository's default branch.
    /// Best-effort: `None` on any failure or non-success status.
    async fn fetch_readme(&self, repo: &str) -> Option<String>;
}
