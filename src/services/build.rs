//! Build orchestration: explicit-source transformation or LLM-mediated
//! template selection.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use tracing::{info, instrument};

use crate::domain::models::{BuildOutcome, PromptMessage};
use crate::domain::ports::{BridgeError, TemplateHost};
use crate::infrastructure::CloneCache;
use crate::prompts;
use crate::services::CatalogService;

/// Follow-up instruction attached to a selection round.
const SELECTION_NOTE: &str =
    "Reply with chosen repo, then call build_task again with source_task=<repo>.";

/// Top-level orchestrator behind the `build_task`, `download_task`, and
/// `translate_config` tools.
pub struct BuildService<H> {
    catalog: Arc<CatalogService<H>>,
    cache: Arc<CloneCache>,
}

impl<H: TemplateHost> BuildService<H> {
    /// Wire the orchestrator to its catalog and clone cache.
    pub fn new(catalog: Arc<CatalogService<H>>, cache: Arc<CloneCache>) -> Self {
        Self { catalog, cache }
    }

    /// Build a new task from a template.
    ///
    /// With `source_task`, resolves it against the catalog by
    /// case-insensitive substring containment; the first match in catalog
    /// order wins, a deliberate simplicity trade-off over disambiguation.
    /// The match is materialized and the transformation prompt rendered.
    /// No match fails with [`BridgeError::TemplateNotFound`] before any
    /// clone is attempted.
    ///
    /// Without `source_task`, gathers one candidate per catalog entry (a
    /// failed README fetch degrades that entry's snippet to empty rather
    /// than excluding it) and returns the selection negotiation plus a note
    /// instructing the caller to re-invoke with the chosen name. This path
    /// never touches the cache.
    #[instrument(skip(self))]
    pub async fn build(
        &self,
        target_task: &str,
        source_task: Option<&str>,
    ) -> Result<BuildOutcome, BridgeError> {
        let repos = self.catalog.task_repos().await?;

        // An empty source would substring-match every name; treat it as
        // absent so the caller gets a selection round instead.
        if let Some(source) = source_task.filter(|s| !s.is_empty()) {
            let needle = source.to_lowercase();
            let repo = repos
                .iter()
                .find(|r| r.to_lowercase().contains(&needle))
                .ok_or_else(|| BridgeError::TemplateNotFound(source.to_string()))?;

            let template_path = self.cache.materialize(repo).await?;
            info!(repo = %repo, path = %template_path.display(), "template resolved");
            return Ok(BuildOutcome::Transform {
                prompt: prompts::transform_prompt(source, target_task),
                template_path,
            });
        }

        let candidates = self.catalog.candidates(&repos).await;
        let prompt_messages =
            prompts::choose_template_prompt(&format!("A {target_task} task."), &candidates);
        Ok(BuildOutcome::Selection {
            prompt_messages,
            note: SELECTION_NOTE.to_string(),
        })
    }

    /// Clone a template repository and return its local path. The name must
    /// match an entry of the filtered catalog exactly.
    #[instrument(skip(self))]
    pub async fn download(&self, repo: &str) -> Result<PathBuf, BridgeError> {
        let repos = self.catalog.task_repos().await?;
        if !repos.iter().any(|r| r == repo) {
            return Err(BridgeError::TemplateNotFound(repo.to_string()));
        }
        self.cache.materialize(repo).await
    }

    /// Read `<task_path>/config.yaml` and wrap it in the translation
    /// prompt. The document is carried verbatim; it is never parsed here.
    #[instrument(skip(self))]
    pub async fn translate(
        &self,
        task_path: &Path,
        target_language: &str,
    ) -> Result<Vec<PromptMessage>, BridgeError> {
        let cfg_path = task_path.join("config.yaml");
        if !cfg_path.exists() {
            return Err(BridgeError::ConfigNotFound(cfg_path));
        }

        let yaml_text = tokio::fs::read_to_string(&cfg_path).await?;
        Ok(prompts::translate_config_prompt(
            &yaml_text,
            target_language,
        ))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::models::Config;
    use async_trait::async_trait;
    use tempfile::TempDir;

    struct MockHost {
        names: Vec<String>,
    }

    #[async_trait]
    impl TemplateHost for MockHost {
        async fn list_repo_names(&self) -> Result<Vec<String>, BridgeError> {
            Ok(self.names.clone())
        }

        async fn list_branches(&self, _repo: &str) -> Vec<String> {
            Vec::new()
        }

        async fn fetch_readme(&self, repo: &str) -> Option<String> {
            // One repo's README is unavailable to exercise degradation.
            (repo != "gonogo-task").then(|| format!("{repo} readme"))
        }
    }

    fn service(names: &[&str], dir: &TempDir) -> BuildService<MockHost> {
        let config = Config::default();
        let host = Arc::new(MockHost {
            names: names.iter().map(|s| (*s).to_string()).collect(),
        });
        let catalog = Arc::new(CatalogService::new(host, &config));
        let cache = Arc::new(CloneCache::new(dir.path().join("cache"), &config).unwrap());
        BuildService::new(catalog, cache)
    }

    fn cache_entries(dir: &TempDir) -> usize {
        std::fs::read_dir(dir.path().join("cache")).unwrap().count()
    }

    #[tokio::test]
    async fn unresolvable_source_fails_without_cloning() {
        let dir = TempDir::new().unwrap();
        let service = service(&["stroop-task", "gonogo-task"], &dir);

        let err = service.build("flanker", Some("nback")).await.unwrap_err();
        assert!(matches!(err, BridgeError::TemplateNotFound(ref s) if s == "nback"));
        assert_eq!(cache_entries(&dir), 0);
    }

    #[tokio::test]
    async fn source_resolution_is_case_insensitive_first_match() {
        let dir = TempDir::new().unwrap();
        let service = service(&["Stroop-Task", "stroop-task-v2"], &dir);

        // Pre-populate the cache so no real clone happens.
        std::fs::create_dir_all(dir.path().join("cache/Stroop-Task")).unwrap();

        let outcome = service.build("flanker", Some("STROOP")).await.unwrap();
        match outcome {
            BuildOutcome::Transform {
                prompt,
                template_path,
            } => {
                assert!(prompt.contains("STROOP"));
                assert!(prompt.contains("flanker"));
                assert!(template_path.ends_with("Stroop-Task"));
            }
            BuildOutcome::Selection { .. } => panic!("expected a transform outcome"),
        }
    }

    #[tokio::test]
    async fn empty_source_starts_a_selection_round() {
        let dir = TempDir::new().unwrap();
        let service = service(&["stroop-task", "gonogo-task"], &dir);

        // "" is contained in every name; it must not resolve to the first
        // catalog entry.
        let outcome = service.build("flanker", Some("")).await.unwrap();
        match outcome {
            BuildOutcome::Selection { prompt_messages, .. } => {
                assert!(prompt_messages[2].content.contains("stroop-task"));
                assert!(prompt_messages[2].content.contains("gonogo-task"));
            }
            BuildOutcome::Transform { .. } => panic!("expected a selection outcome"),
        }
        assert_eq!(cache_entries(&dir), 0);
    }

    #[tokio::test]
    async fn no_source_returns_selection_without_touching_cache() {
        let dir = TempDir::new().unwrap();
        let service = service(&["stroop-task", "gonogo-task"], &dir);

        let outcome = service.build("flanker", None).await.unwrap();
        match outcome {
            BuildOutcome::Selection {
                prompt_messages,
                note,
            } => {
                assert_eq!(prompt_messages.len(), 3);
                let menu = &prompt_messages[2].content;
                assert!(menu.contains("- **stroop-task**: stroop-task readme"));
                // Unavailable README keeps the repo with an empty snippet
                assert!(menu.contains("- **gonogo-task**: "));
                assert!(note.contains("build_task"));
            }
            BuildOutcome::Transform { .. } => panic!("expected a selection outcome"),
        }
        assert_eq!(cache_entries(&dir), 0);
    }

    #[tokio::test]
    async fn download_requires_exact_catalog_membership() {
        let dir = TempDir::new().unwrap();
        let service = service(&["stroop-task"], &dir);

        // Substring is not enough for download
        let err = service.download("stroop").await.unwrap_err();
        assert!(matches!(err, BridgeError::TemplateNotFound(_)));

        std::fs::create_dir_all(dir.path().join("cache/stroop-task")).unwrap();
        let path = service.download("stroop-task").await.unwrap();
        assert!(path.ends_with("stroop-task"));
    }

    #[tokio::test]
    async fn download_rejects_excluded_repos() {
        let dir = TempDir::new().unwrap();
        let service = service(&["stroop-task", "task-registry"], &dir);

        let err = service.download("task-registry").await.unwrap_err();
        assert!(matches!(err, BridgeError::TemplateNotFound(_)));
        assert_eq!(cache_entries(&dir), 0);
    }

    #[tokio::test]
    async fn translate_requires_config_yaml() {
        let dir = TempDir::new().unwrap();
        let service = service(&[], &dir);

        let task_dir = TempDir::new().unwrap();
        let err = service
            .translate(task_dir.path(), "Spanish")
            .await
            .unwrap_err();
        assert!(matches!(err, BridgeError::ConfigNotFound(_)));

        let yaml = "subinfo_mapping:\n  age: Age\n";
        std::fs::write(task_dir.path().join("config.yaml"), yaml).unwrap();
        let messages = service.translate(task_dir.path(), "Spanish").await.unwrap();
        assert_eq!(messages.len(), 2);
        assert_eq!(messages[1].content, yaml);
    }
}
