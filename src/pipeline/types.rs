use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::artifact::ArtifactKind;
use super::PipelineError;

/// One named activity from the uploaded process definition.
///
/// The ordered, de-duplicated task list is the single source of truth for
/// valid identifiers; it is computed once per upload and never mutated.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub element_id: String,
    pub element_name: String,
}

impl Task {
    pub fn new(element_id: &str, element_name: &str) -> Self {
        Self {
            element_id: element_id.to_string(),
            element_name: element_name.to_string(),
        }
    }
}

/// A parsed tabular result: a header row naming columns, plus data rows.
///
/// Rows are stored positionally, aligned with `columns`; `value` gives
/// by-name access. Column names are kept verbatim from whatever header
/// the generator produced — schema conformance is advisory except for
/// the identifier columns, which the reconciler enforces.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Table {
    columns: Vec<String>,
    rows: Vec<Vec<String>>,
}

impl Table {
    pub fn new(columns: Vec<String>) -> Self {
        Self {
            columns,
            rows: Vec::new(),
        }
    }

    /// Push a row, padding or truncating it to the header width.
    pub fn push_row(&mut self, mut row: Vec<String>) {
        row.resize(self.columns.len(), String::new());
        self.rows.push(row);
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Vec<String>] {
        &self.rows
    }

    pub fn rows_mut(&mut self) -> &mut Vec<Vec<String>> {
        &mut self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Look up a cell by row index and column name.
    pub fn value(&self, row: usize, column: &str) -> Option<&str> {
        let col = self.column_index(column)?;
        self.rows.get(row)?.get(col).map(String::as_str)
    }

    /// Export as UTF-8 CSV: header row first, one line per data row.
    /// The output round-trips through `parse_table`.
    pub fn to_csv(&self) -> Result<String, PipelineError> {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&self.columns)
            .map_err(|e| PipelineError::TableParse(e.to_string()))?;
        for row in &self.rows {
            writer
                .write_record(row)
                .map_err(|e| PipelineError::TableParse(e.to_string()))?;
        }
        let bytes = writer
            .into_inner()
            .map_err(|e| PipelineError::TableParse(e.to_string()))?;
        String::from_utf8(bytes).map_err(|e| PipelineError::TableParse(e.to_string()))
    }
}

/// Result of one generation request, held as latest-result state per kind.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ArtifactResult {
    pub kind: ArtifactKind,
    pub table: Table,
    /// Rows discarded by reconciliation (invented/unrecoverable identifiers).
    pub dropped_rows: usize,
    /// Human-readable repair notes from reconciliation and header checks.
    pub warnings: Vec<String>,
    pub generated_at: DateTime<Utc>,
}

/// Text-generation service abstraction (allows mocking).
///
/// The sole network boundary of the pipeline: prompt in, free text out.
/// One attempt per call; failures surface to the caller unretried.
pub trait GenerationClient {
    fn generate(&self, model: &str, prompt: &str) -> Result<String, PipelineError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_value_by_name() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.push_row(vec!["1".into(), "2".into()]);
        assert_eq!(table.value(0, "b"), Some("2"));
        assert_eq!(table.value(0, "missing"), None);
        assert_eq!(table.value(1, "a"), None);
    }

    #[test]
    fn push_row_pads_and_truncates() {
        let mut table = Table::new(vec!["a".into(), "b".into()]);
        table.push_row(vec!["only".into()]);
        table.push_row(vec!["1".into(), "2".into(), "extra".into()]);
        assert_eq!(table.rows()[0], vec!["only".to_string(), String::new()]);
        assert_eq!(table.rows()[1], vec!["1".to_string(), "2".to_string()]);
    }

    #[test]
    fn csv_export_quotes_embedded_commas() {
        let mut table = Table::new(vec!["element_id".into(), "note".into()]);
        table.push_row(vec!["Task_A".into(), "check, then approve".into()]);
        let csv = table.to_csv().unwrap();
        assert!(csv.starts_with("element_id,note\n"));
        assert!(csv.contains("\"check, then approve\""));
    }
}
