//! MCP server for TaskBeacon template transformation
//!
//! This MCP server exposes the template bridge over the Model Context
//! Protocol. It uses stdio transport (stdin/stdout for JSON-RPC
//! communication); logging goes to stderr.
//!
//! # Usage
//!
//! ```bash
//! taskbeacon-mcp --cache-dir ./task_cache
//! ```
//!
//! # Tools Exposed
//!
//! - `build_task` - Resolve a source template (or start a selection round)
//!   and emit the transformation prompt
//! - `download_task` - Clone a template repository locally
//! - `translate_config` - Wrap a task's config.yaml in a translation prompt
//! - `list_tasks` - Enriched listing of every template repository
//!
//! # Prompts Exposed
//!
//! - `transform_prompt`, `translate_config_prompt`, `choose_template_prompt`

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use rmcp::{
    handler::server::wrapper::Parameters,
    model::{
        GetPromptRequestParam, GetPromptResult, Implementation, ListPromptsResult,
        PaginatedRequestParam, Prompt, PromptArgument, PromptMessage as McpPromptMessage,
        PromptMessageRole, ProtocolVersion, ServerCapabilities, ServerInfo,
    },
    service::RequestContext,
    tool, tool_handler, tool_router, ErrorData as McpError, Json, RoleServer, ServerHandler,
    ServiceExt,
};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};
use tracing::{error, info};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use taskbeacon_mcp::{
    prompts, BridgeError, BuildOutcome, BuildService, CatalogService, CloneCache, ConfigLoader,
    GithubHost, PromptMessage, TemplateCandidate, TemplateListing,
};

#[derive(Parser, Debug)]
#[command(name = "taskbeacon-mcp")]
#[command(about = "MCP server for TaskBeacon template transformation")]
struct Args {
    /// Path to a YAML config file (defaults and TASKBEACON_* env vars apply
    /// on top of it)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Override the template cache directory
    #[arg(long)]
    cache_dir: Option<PathBuf>,
}

/// Request parameters for building a task from a template
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct BuildTaskRequest {
    /// Name of the task to build (e.g. "flanker")
    target_task: String,
    /// Template to start from; when omitted the server returns a selection
    /// prompt instead of cloning
    #[serde(skip_serializing_if = "Option::is_none")]
    source_task: Option<String>,
}

/// Request parameters for downloading a template repository
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct DownloadTaskRequest {
    /// Exact repository name as returned by list_tasks
    repo: String,
}

/// Request parameters for translating a task configuration
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct TranslateConfigRequest {
    /// Local path of a task directory containing config.yaml
    task_path: String,
    /// Language to translate the selected fields into
    target_language: String,
}

/// Result of a build_task call: a ready transformation prompt, or a
/// selection round for the caller's LLM
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
#[serde(untagged)]
enum BuildTaskResult {
    /// Source resolved: template on disk, prompt rendered
    Transform {
        /// Rendered transformation prompt
        prompt: String,
        /// Local path of the materialized template
        template_path: String,
    },
    /// No source given: negotiation messages plus a follow-up instruction
    Selection {
        /// Selection negotiation messages
        prompt_messages: Vec<PromptMessage>,
        /// Follow-up instruction for the caller
        note: String,
    },
}

/// Download result
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct DownloadTaskResult {
    /// Local path of the materialized template
    template_path: String,
}

/// Translation prompt result
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
struct TranslateConfigResult {
    /// Instruction message followed by the verbatim YAML document
    prompt_messages: Vec<PromptMessage>,
}

/// Template bridge MCP server implementation
#[derive(Clone)]
struct TemplateServer {
    build: Arc<BuildService<GithubHost>>,
    catalog: Arc<CatalogService<GithubHost>>,
    tool_router: rmcp::handler::server::router::tool::ToolRouter<Self>,
}

impl TemplateServer {
    fn new(build: Arc<BuildService<GithubHost>>, catalog: Arc<CatalogService<GithubHost>>) -> Self {
        Self {
            build,
            catalog,
            tool_router: Self::tool_router(),
        }
    }
}

/// Map bridge errors onto MCP error codes: absent templates and missing
/// config files are caller mistakes, everything else is internal.
fn map_bridge_error(e: &BridgeError) -> McpError {
    match e {
        BridgeError::TemplateNotFound(_) | BridgeError::ConfigNotFound(_) => {
            McpError::invalid_params(e.to_string(), None)
        }
        _ => McpError::internal_error(e.to_string(), None),
    }
}

#[tool_router]
impl TemplateServer {
    /// Build a new task from a template
    #[tool(
        description = "Turn an existing template task into a new one. With source_task: clones the matching template and returns the transformation prompt plus its local path. Without source_task: returns prompt_messages asking the LLM to pick the closest template; reply with the chosen repo and call build_task again with source_task set to it."
    )]
    async fn build_task(
        &self,
        params: Parameters<BuildTaskRequest>,
    ) -> Result<Json<BuildTaskResult>, McpError> {
        let params = params.0;

        match self
            .build
            .build(&params.target_task, params.source_task.as_deref())
            .await
        {
            Ok(BuildOutcome::Transform {
                prompt,
                template_path,
            }) => {
                info!(path = %template_path.display(), "transformation prompt ready");
                Ok(Json(BuildTaskResult::Transform {
                    prompt,
                    template_path: template_path.display().to_string(),
                }))
            }
            Ok(BuildOutcome::Selection {
                prompt_messages,
                note,
            }) => {
                info!("selection round started, awaiting template verdict");
                Ok(Json(BuildTaskResult::Selection {
                    prompt_messages,
                    note,
                }))
            }
            Err(e) => {
                error!("Failed to build task: {}", e);
                Err(map_bridge_error(&e))
            }
        }
    }

    /// Clone a template repository locally
    #[tool(description = "Clone any template repo locally and return the path")]
    async fn download_task(
        &self,
        params: Parameters<DownloadTaskRequest>,
    ) -> Result<Json<DownloadTaskResult>, McpError> {
        let params = params.0;

        match self.build.download(&params.repo).await {
            Ok(path) => {
                info!(repo = %params.repo, path = %path.display(), "template downloaded");
                Ok(Json(DownloadTaskResult {
                    template_path: path.display().to_string(),
                }))
            }
            Err(e) => {
                error!("Failed to download template: {}", e);
                Err(map_bridge_error(&e))
            }
        }
    }

    /// Build a translation prompt for a task configuration
    #[tool(
        description = "Load <task_path>/config.yaml and return prompt_messages instructing translation of its user-facing fields into the target language"
    )]
    async fn translate_config(
        &self,
        params: Parameters<TranslateConfigRequest>,
    ) -> Result<Json<TranslateConfigResult>, McpError> {
        let params = params.0;

        match self
            .build
            .translate(params.task_path.as_ref(), &params.target_language)
            .await
        {
            Ok(prompt_messages) => Ok(Json(TranslateConfigResult { prompt_messages })),
            Err(e) => {
                error!("Failed to build translation prompt: {}", e);
                Err(map_bridge_error(&e))
            }
        }
    }

    /// List every task template repository
    #[tool(
        description = "Return metadata for every task template repo: name, README snippet, and up to 10 branch names"
    )]
    async fn list_tasks(&self) -> Result<Json<Vec<TemplateListing>>, McpError> {
        match self.catalog.listings().await {
            Ok(listings) => {
                info!("Found {} template repositories", listings.len());
                Ok(Json(listings))
            }
            Err(e) => {
                error!("Failed to list templates: {}", e);
                Err(map_bridge_error(&e))
            }
        }
    }
}

fn required_arg<'a>(
    args: &'a serde_json::Map<String, serde_json::Value>,
    name: &str,
) -> Result<&'a str, McpError> {
    args.get(name).and_then(|v| v.as_str()).ok_or_else(|| {
        McpError::invalid_params(format!("missing required argument: {name}"), None)
    })
}

/// Candidates arrive either as a JSON array or as a JSON-encoded string,
/// depending on how the client serializes prompt arguments.
fn candidates_arg(
    args: &serde_json::Map<String, serde_json::Value>,
) -> Result<Vec<TemplateCandidate>, McpError> {
    match args.get("candidates") {
        None | Some(serde_json::Value::Null) => Ok(Vec::new()),
        Some(value @ serde_json::Value::Array(_)) => serde_json::from_value(value.clone())
            .map_err(|e| McpError::invalid_params(format!("invalid candidates: {e}"), None)),
        Some(serde_json::Value::String(s)) => serde_json::from_str(s)
            .map_err(|e| McpError::invalid_params(format!("invalid candidates: {e}"), None)),
        Some(_) => Err(McpError::invalid_params(
            "candidates must be a list of {repo, readme_snippet} objects",
            None,
        )),
    }
}

fn to_mcp_messages(messages: Vec<PromptMessage>) -> Vec<McpPromptMessage> {
    messages
        .into_iter()
        .map(|m| McpPromptMessage::new_text(PromptMessageRole::User, m.content))
        .collect()
}

fn prompt_arg(name: &str, description: &str, required: bool) -> PromptArgument {
    PromptArgument {
        name: name.to_string(),
        title: None,
        description: Some(description.to_string()),
        required: Some(required),
    }
}

#[tool_handler(router = self.tool_router)]
impl ServerHandler for TemplateServer {
    fn get_info(&self) -> ServerInfo {
        ServerInfo {
            protocol_version: ProtocolVersion::default(),
            capabilities: ServerCapabilities::builder()
                .enable_tools()
                .enable_prompts()
                .build(),
            server_info: Implementation {
                name: "taskbeacon-mcp".to_string(),
                title: Some("TaskBeacon Template Transformation Server".to_string()),
                version: env!("CARGO_PKG_VERSION").to_string(),
                icons: None,
                website_url: None,
            },
            instructions: Some(
                "Template transformation bridge for TaskBeacon experiment tasks. Use build_task to turn an existing template into a new task (omit source_task to get a template-selection prompt first), download_task to fetch a template locally, translate_config to localize a task's config.yaml, and list_tasks to browse available templates.".to_string(),
            ),
        }
    }

    async fn list_prompts(
        &self,
        _request: Option<PaginatedRequestParam>,
        _context: RequestContext<RoleServer>,
    ) -> Result<ListPromptsResult, McpError> {
        Ok(ListPromptsResult {
            next_cursor: None,
            prompts: vec![
                Prompt::new(
                    "transform_prompt",
                    Some("Six-stage workflow turning a source template task into a target task"),
                    Some(vec![
                        prompt_arg("source_task", "Existing template task name", true),
                        prompt_arg("target_task", "Task to create", true),
                    ]),
                ),
                Prompt::new(
                    "translate_config_prompt",
                    Some("Translate the user-facing fields of a task config.yaml"),
                    Some(vec![
                        prompt_arg("yaml_text", "Raw config.yaml content", true),
                        prompt_arg("target_language", "Language to translate into", true),
                    ]),
                ),
                Prompt::new(
                    "choose_template_prompt",
                    Some("Pick the single template repo needing the fewest changes"),
                    Some(vec![
                        prompt_arg("desc", "Free-form description of the desired task", true),
                        prompt_arg(
                            "candidates",
                            "JSON list of {repo, readme_snippet} objects",
                            false,
                        ),
                    ]),
                ),
            ],
        })
    }

    async fn get_prompt(
        &self,
        GetPromptRequestParam { name, arguments }: GetPromptRequestParam,
        _context: RequestContext<RoleServer>,
    ) -> Result<GetPromptResult, McpError> {
        let args = arguments.unwrap_or_default();

        match name.as_str() {
            "transform_prompt" => {
                let source_task = required_arg(&args, "source_task")?;
                let target_task = required_arg(&args, "target_task")?;
                Ok(GetPromptResult {
                    description: Some("Task transformation workflow".to_string()),
                    messages: vec![McpPromptMessage::new_text(
                        PromptMessageRole::User,
                        prompts::transform_prompt(source_task, target_task),
                    )],
                })
            }
            "translate_config_prompt" => {
                let yaml_text = required_arg(&args, "yaml_text")?;
                let target_language = required_arg(&args, "target_language")?;
                Ok(GetPromptResult {
                    description: Some("Config translation instructions".to_string()),
                    messages: to_mcp_messages(prompts::translate_config_prompt(
                        yaml_text,
                        target_language,
                    )),
                })
            }
            "choose_template_prompt" => {
                let desc = required_arg(&args, "desc")?;
                let candidates = candidates_arg(&args)?;
                Ok(GetPromptResult {
                    description: Some("Template selection negotiation".to_string()),
                    messages: to_mcp_messages(prompts::choose_template_prompt(desc, &candidates)),
                })
            }
            _ => Err(McpError::invalid_params(
                format!("prompt not found: {name}"),
                None,
            )),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(cache_dir) = &args.cache_dir {
        config.cache.root = cache_dir.display().to_string();
    }

    // Initialize tracing to stderr (stdout is reserved for MCP JSON-RPC)
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false),
        )
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.logging.level)),
        )
        .init();

    info!("Starting TaskBeacon template MCP server");
    info!("Organization: {}", config.github.org);
    info!("Cache root: {}", config.cache.root);

    let host = Arc::new(GithubHost::new(&config).context("Failed to build GitHub client")?);
    let cache = Arc::new(
        CloneCache::new(config.cache.root.clone(), &config)
            .context("Failed to initialize clone cache")?,
    );
    let catalog = Arc::new(CatalogService::new(host, &config));
    let build = Arc::new(BuildService::new(catalog.clone(), cache));

    let server = TemplateServer::new(build, catalog);

    info!("MCP server ready, listening on stdio");

    let (stdin, stdout) = (tokio::io::stdin(), tokio::io::stdout());
    let _running = server
        .serve((stdin, stdout))
        .await
        .map_err(|_| anyhow::anyhow!("Server initialization failed"))?;

    // Keep running until interrupted
    tokio::signal::ctrl_c().await?;

    Ok(())
}
