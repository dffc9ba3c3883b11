//! Prompt for a single review unit.
//!
//! Only changed and added lines are in scope; the model answers with a
//! numbered list or the literal [`NO_ISSUES`].

use super::ReviewUnit;

/// Exact answer requested when a unit has nothing to report.
pub const NO_ISSUES: &str = "No issues found";

/// Builds the review prompt: file, team style, instructions, answer format, diff.
pub fn build_review_prompt(unit: &ReviewUnit, team_styles: &str) -> String {
    let mut s = String::new();
    s.push_str("You are an experienced code reviewer.\n");
    s.push_str(
        "Review the merge request change below, find problematic places and suggest how to fix them.\n",
    );
    s.push_str("Analyze ONLY changed and added lines.\n");

    s.push_str("\n# File\n");
    s.push_str(&unit.file_path);
    if let (Some(i), Some(n)) = (unit.chunk_index, unit.chunk_total) {
        s.push_str(&format!(" (part {i} of {n})"));
    }
    s.push('\n');

    if !team_styles.trim().is_empty() {
        s.push_str("\n# Team code style (for context)\n");
        s.push_str(team_styles.trim_end());
        s.push('\n');
    }

    s.push_str("\n# Instructions\n");
    s.push_str("- Give recommendations ONLY for changed and added lines.\n");
    s.push_str("- Do not comment on documentation or on the change description.\n");
    s.push_str(&format!(
        "- If there are no issues, output only the line \"{NO_ISSUES}\".\n"
    ));
    s.push_str("- If there are issues, list them with the location, the problem and an example fix.\n");
    s.push_str(&format!(
        "- Never end with \"{NO_ISSUES}\" after issues were listed.\n"
    ));

    s.push_str("\n# Answer format\n");
    s.push_str("1. <location> problem description, possible solutions, example fix\n2. ...\n");

    s.push_str("\n# Diff\n```diff\n");
    s.push_str(&unit.diff_text);
    s.push_str("\n```\n");
    s
}
