//! The config-translation prompt.

use crate::domain::models::PromptMessage;

/// Build the two-message config-translation prompt.
///
/// The first message enumerates exactly which fields are in scope; the
/// second carries the raw YAML document verbatim, byte-for-byte unmodified.
pub fn translate_config_prompt(yaml_text: &str, target_language: &str) -> Vec<PromptMessage> {
    let intro = format!(
        "Translate selected fields of this PsyFlow config into {target_language}. \
         Translate ONLY:\n\
         \u{2022} subinfo_mapping values\n\
         \u{2022} stimuli entries of type 'text' or 'textbox' (the `text` field)\n\n\
         Return the COMPLETE YAML with translated values - no commentary."
    );

    vec![PromptMessage::user(intro), PromptMessage::user(yaml_text)]
}
