//! Domain models: configuration and template descriptors.

pub mod config;
pub mod template;

pub use config::{
    CacheConfig, Config, GithubConfig, LimitsConfig, LoggingConfig, TimeoutsConfig,
};
pub use template::{BuildOutcome, PromptMessage, TemplateCandidate, TemplateListing};
