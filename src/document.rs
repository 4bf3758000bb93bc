//! Text rendering for the acceptance document and pull-request body.
//!
//! The acceptance document grows by appending titled sections separated by
//! a horizontal rule. Sections are never edited once written.

use crate::ports::Task;

/// Background placeholder used when a task has no description.
pub const BACKGROUND_PLACEHOLDER: &str = "to be filled";

/// Line placed between consecutive sections.
pub const SECTION_DELIMITER: &str = "---";

/// Section title for the generated spec.
pub const SPEC_SECTION: &str = "Spec";
/// Section title for the pull-request link.
pub const PR_SECTION: &str = "PR";
/// Section title for the CI checks summary.
pub const TEST_REPORT_SECTION: &str = "Test Report";

/// Renders the spec skeleton for a task.
///
/// Only the objective and background are filled in; every other section is
/// left as a placeholder for a human to complete.
#[must_use]
pub fn build_spec(task: &Task) -> String {
    let background =
        if task.description.is_empty() { BACKGROUND_PLACEHOLDER } else { &task.description };

    let mut spec = format!("# Overview\n- Objective: {}\n- Background: {background}\n", task.title);
    spec.push_str(
        "\n# Scope\n\
         - Must:\n\
         - Should:\n\
         - Optional:\n\
         \n# Constraints / Dependencies\n\
         - Constraints:\n\
         - Dependencies:\n\
         \n# Interface / Data\n\
         - Inputs:\n\
         - Outputs:\n\
         - Data structures:\n\
         \n# Acceptance Criteria\n\
         - [ ] \n\
         - [ ] \n\
         \n# Test Points\n\
         - [ ] \n\
         - [ ] \n\
         \n# Risks / Open Questions\n\
         - \n",
    );
    spec
}

/// Formats one section: a heading line, then the trimmed body.
#[must_use]
pub fn build_section(title: &str, body: &str) -> String {
    format!("## {title}\n{}\n", body.trim())
}

/// Appends a section to an existing document.
///
/// An empty document becomes the single section. Otherwise the document's
/// trailing whitespace is dropped and the section follows a `---` rule.
#[must_use]
pub fn append_section(existing: &str, title: &str, body: &str) -> String {
    if existing.is_empty() {
        return build_section(title, body);
    }
    format!("{}\n\n{SECTION_DELIMITER}\n\n{}", existing.trim_end(), build_section(title, body))
}

/// Body of the pull request opened for a task's mock.
#[must_use]
pub fn pr_body() -> String {
    "## Summary\n- Generated automatically\n\n\
     ## Changes\n- Add mock file\n\n\
     ## Test Results\n- Mock: passed\n\n\
     ## Risks / Notes\n- To be filled\n"
        .to_string()
}

/// Commit message naming the task.
#[must_use]
pub fn commit_message(task: &Task) -> String {
    format!("Add mock for {}", task.title)
}
