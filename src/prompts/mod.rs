//! Prompt builders: pure functions from inputs to role-tagged messages.
//!
//! Nothing here performs I/O or can fail; every builder is a deterministic
//! function of its inputs so the MCP prompt surface and the tool surface can
//! share them.

mod choose;
mod transform;
mod translate;

pub use choose::choose_template_prompt;
pub use transform::transform_prompt;
pub use translate::translate_config_prompt;
