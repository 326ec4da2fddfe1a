//! The template-selection negotiation prompt.

use crate::domain::models::{PromptMessage, TemplateCandidate};

/// Rendered when the candidate set is empty, so the LLM sees an explicit
/// statement instead of a silently empty menu.
const NO_TEMPLATES_PLACEHOLDER: &str = "(no templates found)";

/// Build the selection negotiation: criteria in priority order, the desired
/// task description, and the candidate menu as `name: snippet` lines.
///
/// Ranking is delegated entirely to the LLM reading these messages; this
/// builder's only responsibility is deterministic, complete message
/// construction. The expected reply is a single repository name, or `NONE`
/// when no candidate is reasonably close.
pub fn choose_template_prompt(desc: &str, candidates: &[TemplateCandidate]) -> Vec<PromptMessage> {
    let criteria = "\
- Prefer tasks with the same **response mapping paradigm** (e.g. 2-choice left/right, go/no-go, continuous RT).
- Prefer tasks whose **trial/block flow** most closely matches the requested task's flow.
- If several are equally close, choose the repo that appears to need the **fewest code edits** (smaller conceptual jump).
";

    let intro = format!(
        "You are given a desired task description plus candidate PsyFlow template repositories.\n\n\
         Select the **one** template that will require the LEAST effort to transform into the desired task, using these tie-breakers:\n\
         {criteria}\n\
         Respond with **only** the repo name on a single line.\n\
         If NONE of the templates are reasonably close, respond with `NONE`."
    );

    let menu = if candidates.is_empty() {
        NO_TEMPLATES_PLACEHOLDER.to_string()
    } else {
        candidates
            .iter()
            .map(|c| format!("- **{}**: {}", c.repo, c.readme_snippet))
            .collect::<Vec<_>>()
            .join("\n")
    };

    vec![
        PromptMessage::user(intro),
        PromptMessage::user(format!("Desired task:\n{desc}")),
        PromptMessage::user(format!("Candidate templates:\n{menu}")),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn candidate(repo: &str, snippet: &str) -> TemplateCandidate {
        TemplateCandidate {
            repo: repo.to_string(),
            readme_snippet: snippet.to_string(),
        }
    }

    #[test]
    fn empty_candidate_set_renders_placeholder() {
        let messages = choose_template_prompt("A flanker task.", &[]);

        assert_eq!(messages.len(), 3);
        assert!(messages[2].content.contains(NO_TEMPLATES_PLACEHOLDER));
    }

    #[test]
    fn menu_lists_one_line_per_candidate() {
        let candidates = vec![
            candidate("stroop-task", "Classic color-word Stroop"),
            candidate("gonogo-task", ""),
        ];
        let messages = choose_template_prompt("A flanker task.", &candidates);

        let menu = &messages[2].content;
        assert!(menu.contains("- **stroop-task**: Classic color-word Stroop"));
        assert!(menu.contains("- **gonogo-task**: "));
    }

    #[test]
    fn criteria_appear_in_priority_order() {
        let messages = choose_template_prompt("A stop-signal task.", &[]);
        let intro = &messages[0].content;

        let paradigm = intro.find("response mapping paradigm").unwrap();
        let flow = intro.find("trial/block flow").unwrap();
        let edits = intro.find("fewest code edits").unwrap();
        assert!(paradigm < flow && flow < edits);
        assert!(intro.contains("`NONE`"));
    }

    #[test]
    fn description_is_restated_in_the_second_message() {
        let messages = choose_template_prompt("A posner cueing task.", &[]);
        assert_eq!(messages[1].content, "Desired task:\nA posner cueing task.");
    }
}
