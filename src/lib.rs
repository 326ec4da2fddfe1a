//! taskbeacon-mcp - Template Transformation Bridge
//!
//! An MCP stdio server that helps an LLM-driven agent turn an existing
//! experiment-task template into a new, related task with minimal edits. It
//! exposes build/download/translate tools plus reusable prompt templates
//! steering a fixed multi-stage transformation workflow, and a
//! template-discovery and -selection protocol over the TaskBeacon GitHub
//! organization.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): descriptors, configuration, ports, errors
//! - **Service Layer** (`services`): catalog filtering and build orchestration
//! - **Infrastructure Layer** (`infrastructure`): GitHub client, clone cache,
//!   configuration loading
//! - **Prompts** (`prompts`): pure prompt builders with no I/O
//!
//! The MCP protocol surface itself lives in the server binary
//! (`src/main.rs`); the library is protocol-agnostic.

pub mod domain;
pub mod infrastructure;
pub mod prompts;
pub mod services;

// Re-export commonly used types for convenience
pub use domain::models::{
    BuildOutcome, CacheConfig, Config, GithubConfig, LimitsConfig, PromptMessage,
    TemplateCandidate, TemplateListing, TimeoutsConfig,
};
pub use domain::ports::{BridgeError, TemplateHost};
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use infrastructure::{CloneCache, GithubHost};
pub use services::{BuildService, CatalogService};
