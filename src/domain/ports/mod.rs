//! Ports: seams between the domain and external collaborators.

pub mod errors;
pub mod template_host;

pub use errors::BridgeError;
pub use template_host::TemplateHost;
