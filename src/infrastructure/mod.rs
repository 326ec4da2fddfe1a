//! Infrastructure layer: external integrations and adapters.

pub mod cache;
pub mod config;
pub mod github;

pub use cache::CloneCache;
pub use github::GithubHost;
