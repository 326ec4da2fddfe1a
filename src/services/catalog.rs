//! Template catalog: exclusion filtering and enrichment fan-out.

use std::collections::HashSet;
use std::sync::Arc;

use futures::future::join_all;
use tracing::instrument;

use crate::domain::models::{Config, TemplateCandidate, TemplateListing};
use crate::domain::ports::{BridgeError, TemplateHost};

/// Read-side view of the template organization.
///
/// Applies the exclusion set before any other processing and shapes README
/// snippets for prompt use. Enrichment fetches fan out concurrently; each
/// result is paired to its repository, so upstream ordering is never relied
/// on positionally.
pub struct CatalogService<H> {
    host: Arc<H>,
    excluded_repos: HashSet<String>,
    snippet_chars: usize,
}

impl<H: TemplateHost> CatalogService<H> {
    /// Build a catalog over `host` using the configured exclusion set and
    /// snippet bound.
    pub fn new(host: Arc<H>, config: &Config) -> Self {
        Self {
            host,
            excluded_repos: config.github.excluded_repos.clone(),
            snippet_chars: config.limits.readme_snippet_chars,
        }
    }

    /// All task-template repository names in hosting-API order, with every
    /// exclusion-set member removed (case-sensitive exact match).
    pub async fn task_repos(&self) -> Result<Vec<String>, BridgeError> {
        let names = self.host.list_repo_names().await?;
        Ok(names
            .into_iter()
            .filter(|name| !self.excluded_repos.contains(name))
            .collect())
    }

    /// Candidates for one selection round: one entry per given repository,
    /// each with a best-effort README snippet. A failed fetch yields an
    /// empty snippet, never a dropped repository and never an error.
    pub async fn candidates(&self, repos: &[String]) -> Vec<TemplateCandidate> {
        let fetches = repos.iter().map(|repo| async move {
            TemplateCandidate {
                repo: repo.clone(),
                readme_snippet: self.snippet(repo).await,
            }
        });
        join_all(fetches).await
    }

    /// Enriched listing of the whole catalog: snippet plus best-effort
    /// branch names per repository, fetched concurrently.
    #[instrument(skip(self))]
    pub async fn listings(&self) -> Result<Vec<TemplateListing>, BridgeError> {
        let repos = self.task_repos().await?;
        let fetches = repos.iter().map(|repo| async move {
            let (readme_snippet, branches) =
                tokio::join!(self.snippet(repo), self.host.list_branches(repo));
            TemplateListing {
                repo: repo.clone(),
                readme_snippet,
                branches,
            }
        });
        Ok(join_all(fetches).await)
    }

    async fn snippet(&self, repo: &str) -> String {
        self.host
            .fetch_readme(repo)
            .await
            .map(|text| shape_snippet(&text, self.snippet_chars))
            .unwrap_or_default()
    }
}

/// Bound a README to `max_chars` characters and collapse newlines to spaces
/// so the snippet stays a single menu line.
fn shape_snippet(text: &str, max_chars: usize) -> String {
    text.chars()
        .take(max_chars)
        .map(|c| if c == '\n' { ' ' } else { c })
        .collect()
}
