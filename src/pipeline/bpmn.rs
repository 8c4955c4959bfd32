// Extract the canonical task list from an uploaded BPMN process definition.
// Namespace handling is deliberately tolerant: real-world documents bind the
// BPMN MODEL namespace to `bpmn:`, to a different prefix, or not at all.

use std::collections::HashSet;

use super::types::Task;
use super::PipelineError;

/// The BPMN 2.0 process model namespace.
pub const BPMN_MODEL_NS: &str = "http://www.omg.org/spec/BPMN/20100524/MODEL";

/// Parse BPMN XML and return the ordered, de-duplicated list of named tasks.
///
/// Task elements are matched anywhere in the document tree by local tag name,
/// in the BPMN MODEL namespace or in no namespace. The `name` attribute is
/// read plain first, then in its namespace-qualified form. Nameless task
/// nodes are skipped silently; duplicate `element_id`s keep the first
/// occurrence in document order.
pub fn extract_tasks(xml_text: &str) -> Result<Vec<Task>, PipelineError> {
    let doc = roxmltree::Document::parse(xml_text)
        .map_err(|e| PipelineError::InvalidXml(e.to_string()))?;

    let mut seen: HashSet<String> = HashSet::new();
    let mut tasks = Vec::new();

    for node in doc.descendants().filter(is_task_element) {
        let name = node
            .attribute("name")
            .or_else(|| node.attribute((BPMN_MODEL_NS, "name")))
            .unwrap_or("");
        if name.trim().is_empty() {
            continue;
        }

        let id = node.attribute("id").unwrap_or("").to_string();
        if !seen.insert(id.clone()) {
            continue;
        }
        tasks.push(Task::new(&id, name));
    }

    tracing::debug!(task_count = tasks.len(), "Extracted tasks from BPMN document");
    Ok(tasks)
}

fn is_task_element(node: &roxmltree::Node) -> bool {
    if !node.is_element() || node.tag_name().name() != "task" {
        return false;
    }
    match node.tag_name().namespace() {
        None => true,
        Some(ns) => ns == BPMN_MODEL_NS,
    }
}

/// Whether the document carries diagram interchange (layout) information.
///
/// The external renderer consumes the raw XML when layout is present and
/// needs an auto-layout pass when it is not.
pub fn has_diagram_info(xml_text: &str) -> bool {
    roxmltree::Document::parse(xml_text)
        .map(|doc| {
            doc.descendants()
                .any(|n| n.is_element() && n.tag_name().name() == "BPMNDiagram")
        })
        .unwrap_or(false)
}
