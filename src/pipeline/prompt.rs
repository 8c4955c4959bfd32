use super::artifact::ArtifactKind;
use super::types::Task;

/// Build the generation prompt for one artifact kind.
///
/// Pure and fully deterministic for a given kind and task list. Task ids and
/// names are pinned verbatim — the prompt is the primary lever for keeping
/// the generator inside the controlled vocabulary of valid identifiers.
/// The raw-CSV-only instruction is a contract with the external service, not
/// something this function can enforce; downstream stages tolerate violations.
pub fn build_prompt(kind: ArtifactKind, tasks: &[Task]) -> String {
    let mut prompt = format!(
        "You are {}.\nFor these process tasks:\n{}\n\nCreate a CSV with columns:\n{}\n",
        kind.role_framing(),
        task_bullets(tasks),
        kind.columns().join(", "),
    );
    for constraint in kind.constraints() {
        prompt.push_str(constraint);
        prompt.push('\n');
    }
    prompt.push_str(
        "- Use the task ids and names exactly as given above.\n\
         Return only raw CSV text with a single header row. \
         No markdown fences, no commentary.",
    );
    prompt
}

/// Enumerate tasks as `- {name} (id: {id})` bullets.
/// An empty task list yields an explicit placeholder rather than nothing.
fn task_bullets(tasks: &[Task]) -> String {
    if tasks.is_empty() {
        return "- (none)".to_string();
    }
    tasks
        .iter()
        .map(|t| format!("- {} (id: {})", t.element_name, t.element_id))
        .collect::<Vec<_>>()
        .join("\n")
}
