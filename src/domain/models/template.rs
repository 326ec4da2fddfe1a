//! Template repository descriptors, prompt messages, and build outcomes.

use std::path::PathBuf;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

/// One candidate template offered to the LLM during a selection round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateCandidate {
    /// Repository name within the template organization.
    pub repo: String,
    /// README excerpt, newline-collapsed and bounded. Empty when the README
    /// could not be fetched; the repository is still offered.
    pub readme_snippet: String,
}

/// Enriched catalog entry returned by the `list_tasks` tool.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct TemplateListing {
    /// Repository name within the template organization.
    pub repo: String,
    /// README excerpt, newline-collapsed and bounded.
    pub readme_snippet: String,
    /// Branch names, truncated upstream; best-effort and possibly empty.
    pub branches: Vec<String>,
}

/// A role-tagged message ready for the hosting runtime's LLM layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
pub struct PromptMessage {
    /// Message role; every prompt this server emits is `user`.
    pub role: String,
    /// Message body.
    pub content: String,
}

impl PromptMessage {
    /// Build a user-role message.
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// Result of a build call.
///
/// `Transform` means an explicit source resolved: the template is on disk
/// and the transformation prompt is ready. `Selection` means no source was
/// given: the caller must put the negotiation messages to its LLM and
/// re-invoke the build with the chosen repository name as `source_task`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BuildOutcome {
    /// Template materialized and transformation prompt rendered.
    Transform {
        /// Rendered multi-stage transformation prompt.
        prompt: String,
        /// Local path of the materialized template clone.
        template_path: PathBuf,
    },
    /// Selection round: awaiting the LLM's verdict.
    Selection {
        /// Negotiation messages for the caller's LLM.
        prompt_messages: Vec<PromptMessage>,
        /// Follow-up instruction for the caller.
        note: String,
    },
}
