//! The fixed six-stage transformation workflow prompt.

/// Render the transformation workflow, parameterized by the source and
/// target task names. Pure string substitution; the two names are not
/// validated here.
pub fn transform_prompt(source_task: &str, target_task: &str) -> String {
    format!(
        "\
Turn my existing {source_task} implementation in PsyFlow/TAPs into a {target_task} task with as few changes as possible.

Breakdown:

Stage 0: Plan
* Read literature and figure out what a typical {target_task} task looks like
* Define the flow: blocks -> trials -> events
* Identify stimulus types, response keys, timing parameters, and key output fields

Stage 1: config.yaml
* Adapt the existing config.yaml to run a {target_task} task
* Highlight any parameters that need careful review

Stage 2: Trial logic (src/run_trial.py)
* Adapt one existing trial template to run a single {target_task} trial
* (Optional) If needed, add helpers in src/utils.py; otherwise skip

Stage 3: Block/session logic (main.py)
* Implement block order, feedback screens, and pauses based on the template task
* Keep the public API consistent with the original task

Stage 4: README.md
* Match the structure and tone of existing tasks
* Cover: purpose, install steps, config details, run instructions, and expected outputs

Stage 5: Static validation
* Check that config.yaml keys line up with code references
* Ensure logged DataFrame columns match the template task
* Verify naming, docstrings, and imports follow PsyFlow conventions
* Confirm variables such as timing and triggers match between run_trial.py and config.yaml
* Spot any logic errors or unused variables

(No PsychoPy runtime or unit tests are required during this step)"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_both_task_names() {
        let prompt = transform_prompt("stroop", "flanker");
        assert!(prompt.contains("existing stroop implementation"));
        assert!(prompt.contains("into a flanker task"));
        // Target name recurs in the planning and config stages
        assert!(prompt.contains("a typical flanker task"));
        assert!(prompt.contains("run a flanker task"));
    }

    #[test]
    fn covers_all_six_stages() {
        let prompt = transform_prompt("a", "b");
        for stage in [
            "Stage 0: Plan",
            "Stage 1: config.yaml",
            "Stage 2: Trial logic",
            "Stage 3: Block/session logic",
            "Stage 4: README.md",
            "Stage 5: Static validation",
        ] {
            assert!(prompt.contains(stage), "missing {stage}");
        }
    }
}
