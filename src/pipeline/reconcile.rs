// Repair generated rows against the canonical task list. The generator
// frequently corrupts the identifier pair: transposed columns, names where
// ids belong, invented ids. Trusting it naively would let fabricated
// identifiers leak into exported artifacts.

use std::collections::HashMap;

use super::types::{Table, Task};

/// Identifier column names enforced against the canonical task list.
const ID_COLUMN: &str = "element_id";
const NAME_COLUMN: &str = "element_name";

/// Result of reconciliation: the cleaned table plus repair diagnostics.
#[derive(Debug, Clone)]
pub struct ReconcileResult {
    pub table: Table,
    /// Rows discarded for unrecoverable identifiers.
    pub dropped: usize,
    pub warnings: Vec<String>,
}

/// Force every row's identifier columns to agree with the canonical task
/// list, dropping rows that cannot be repaired.
///
/// Per row, in order: trim both identifier fields; swap them when the
/// generator transposed id and name; recover the id from the name column
/// when the name column holds a known id; overwrite the name with the
/// canonical name for the id; drop the row if the id is still unknown.
/// Surviving rows keep their relative order. Never fails — partial results
/// beat total failure, and drops are reported for diagnostics.
///
/// Tables without either identifier column pass through untouched.
///
/// Guarantee: every surviving row has a canonical `element_id` and the
/// exact canonical `element_name` for it.
pub fn reconcile(mut table: Table, tasks: &[Task]) -> ReconcileResult {
    let id_col = table.column_index(ID_COLUMN);
    let name_col = table.column_index(NAME_COLUMN);
    if id_col.is_none() && name_col.is_none() {
        return ReconcileResult {
            table,
            dropped: 0,
            warnings: Vec::new(),
        };
    }

    let id_to_name: HashMap<&str, &str> = tasks
        .iter()
        .map(|t| (t.element_id.as_str(), t.element_name.as_str()))
        .collect();
    // First occurrence wins for duplicate names, matching extraction order.
    let mut name_to_id: HashMap<&str, &str> = HashMap::new();
    for t in tasks {
        name_to_id
            .entry(t.element_name.as_str())
            .or_insert(t.element_id.as_str());
    }

    let mut dropped = 0usize;
    let mut warnings = Vec::new();
    let mut kept = Vec::with_capacity(table.len());

    for (i, mut row) in table.rows_mut().drain(..).enumerate() {
        let mut id = field(&row, id_col).trim().to_string();
        let mut name = field(&row, name_col).trim().to_string();

        // Swap detection: id holds a known name AND name holds a known id.
        if name_to_id.contains_key(id.as_str()) && id_to_name.contains_key(name.as_str()) {
            std::mem::swap(&mut id, &mut name);
            warnings.push(format!("Row {}: swapped element_id/element_name", i + 1));
        }

        // Id-from-name recovery: the name column holds a known id.
        if !id_to_name.contains_key(id.as_str()) && id_to_name.contains_key(name.as_str()) {
            warnings.push(format!(
                "Row {}: recovered element_id '{}' from element_name column",
                i + 1,
                name
            ));
            id = name.clone();
        }

        match id_to_name.get(id.as_str()) {
            Some(canonical) => {
                // Name-from-id lookup: the canonical name always wins.
                if name != *canonical {
                    name = (*canonical).to_string();
                }
                set_field(&mut row, id_col, id);
                set_field(&mut row, name_col, name);
                kept.push(row);
            }
            None => {
                // Invented or unrecoverable identifier — contaminates
                // downstream reporting, must not pass through.
                dropped += 1;
                warnings.push(format!("Row {}: dropped unknown element_id '{}'", i + 1, id));
            }
        }
    }

    *table.rows_mut() = kept;

    if dropped > 0 {
        tracing::warn!(dropped, "Reconciliation discarded unrecoverable rows");
    }

    ReconcileResult {
        table,
        dropped,
        warnings,
    }
}

fn field(row: &[String], col: Option<usize>) -> &str {
    col.and_then(|c| row.get(c)).map_or("", String::as_str)
}

fn set_field(row: &mut [String], col: Option<usize>, value: String) {
    if let Some(c) = col {
        if let Some(cell) = row.get_mut(c) {
            *cell = value;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn canonical_tasks() -> Vec<Task> {
        vec![
            Task::new("Task_A", "Capture Request"),
            Task::new("Task_B", "Validate Data"),
            Task::new("Task_C", "Approve Request"),
        ]
    }

    fn raci_table(rows: &[[&str; 4]]) -> Table {
        let mut table = Table::new(vec![
            "element_id".into(),
            "element_name".into(),
            "role".into(),
            "responsibility_type".into(),
        ]);
        for row in rows {
            table.push_row(row.iter().map(|s| s.to_string()).collect());
        }
        table
    }

    /// The guarantee every test relies on: surviving identifier pairs are canonical.
    fn assert_sound(result: &ReconcileResult, tasks: &[Task]) {
        for (i, _) in result.table.rows().iter().enumerate() {
            let id = result.table.value(i, "element_id").unwrap();
            let task = tasks.iter().find(|t| t.element_id == id);
            assert!(task.is_some(), "row {i} has unknown id {id}");
            assert_eq!(
                result.table.value(i, "element_name").unwrap(),
                task.unwrap().element_name
            );
        }
    }

    #[test]
    fn clean_rows_pass_through() {
        let table = raci_table(&[["Task_A", "Capture Request", "Clerk", "R"]]);
        let result = reconcile(table, &canonical_tasks());
        assert_eq!(result.dropped, 0);
        assert!(result.warnings.is_empty());
        assert_eq!(result.table.len(), 1);
        assert_sound(&result, &canonical_tasks());
    }

    #[test]
    fn swapped_columns_repaired() {
        let table = raci_table(&[["Validate Data", "Task_B", "Reviewer", "A"]]);
        let result = reconcile(table, &canonical_tasks());
        assert_eq!(result.table.value(0, "element_id"), Some("Task_B"));
        assert_eq!(result.table.value(0, "element_name"), Some("Validate Data"));
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn id_recovered_from_name_column() {
        // Generator put the id in the name column and garbage in the id column.
        let table = raci_table(&[["Approval step", "Task_C", "Manager", "A"]]);
        let result = reconcile(table, &canonical_tasks());
        assert_eq!(result.table.value(0, "element_id"), Some("Task_C"));
        assert_eq!(result.table.value(0, "element_name"), Some("Approve Request"));
    }

    #[test]
    fn detached_name_overwritten_with_canonical() {
        let table = raci_table(&[["Task_A", "Some Paraphrase", "Clerk", "R"]]);
        let result = reconcile(table, &canonical_tasks());
        assert_eq!(result.table.value(0, "element_name"), Some("Capture Request"));
    }

    #[test]
    fn known_name_for_different_id_overwritten() {
        let table = raci_table(&[["Task_A", "Validate Data", "Clerk", "R"]]);
        let result = reconcile(table, &canonical_tasks());
        assert_eq!(result.table.value(0, "element_id"), Some("Task_A"));
        assert_eq!(result.table.value(0, "element_name"), Some("Capture Request"));
    }

    #[test]
    fn invented_id_dropped() {
        let table = raci_table(&[
            ["Task_A", "Capture Request", "Clerk", "R"],
            ["Task_Z", "Ghost", "Nobody", "I"],
            ["Task_B", "Validate Data", "Reviewer", "A"],
        ]);
        let result = reconcile(table, &canonical_tasks());
        assert_eq!(result.table.len(), 2);
        assert_eq!(result.dropped, 1);
        assert!(result.warnings.iter().any(|w| w.contains("Task_Z")));
        // Relative order of survivors preserved.
        assert_eq!(result.table.value(0, "element_id"), Some("Task_A"));
        assert_eq!(result.table.value(1, "element_id"), Some("Task_B"));
    }

    #[test]
    fn whitespace_trimmed_before_matching() {
        let table = raci_table(&[["  Task_A ", " Capture Request  ", "Clerk", "R"]]);
        let result = reconcile(table, &canonical_tasks());
        assert_eq!(result.table.value(0, "element_id"), Some("Task_A"));
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn schema_without_identifier_columns_untouched() {
        let mut table = Table::new(vec!["metric".into(), "value".into()]);
        table.push_row(vec!["throughput".into(), "42".into()]);
        let result = reconcile(table.clone(), &canonical_tasks());
        assert_eq!(result.table, table);
        assert_eq!(result.dropped, 0);
    }

    #[test]
    fn empty_task_list_drops_every_row() {
        let table = raci_table(&[["Task_A", "Capture Request", "Clerk", "R"]]);
        let result = reconcile(table, &[]);
        assert!(result.table.is_empty());
        assert_eq!(result.dropped, 1);
    }

    #[test]
    fn soundness_over_corruption_matrix() {
        let tasks = canonical_tasks();
        // Every pairing of id-field and name-field candidates, valid or not.
        let candidates = [
            "Task_A",
            "Task_B",
            "Task_Z",
            "Capture Request",
            "Validate Data",
            "Ghost Step",
            "",
            "  Task_C ",
        ];
        let mut total_kept = 0;
        for id_field in candidates {
            for name_field in candidates {
                let table = raci_table(&[[id_field, name_field, "Role", "R"]]);
                let result = reconcile(table, &tasks);
                assert_eq!(result.table.len() + result.dropped, 1);
                total_kept += result.table.len();
                assert_sound(&result, &tasks);
            }
        }
        assert!(total_kept > 0, "matrix should keep at least the clean pairs");
    }
}
