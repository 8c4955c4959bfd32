use super::types::Table;
use super::PipelineError;

/// Parse normalized text into a table: first line is the header, subsequent
/// lines are comma-delimited rows honoring quoted fields.
///
/// Ragged rows (fewer/more fields than the header) are tolerated — padded or
/// truncated with a warning — since the generator is not fully reliable.
/// Structurally broken input (empty text, empty header, quoting violations)
/// fails with `TableParse`.
pub fn parse_table(text: &str) -> Result<Table, PipelineError> {
    if text.trim().is_empty() {
        return Err(PipelineError::TableParse("empty input".into()));
    }

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| PipelineError::TableParse(e.to_string()))?;
    let columns: Vec<String> = headers.iter().map(str::to_string).collect();
    if columns.iter().all(|c| c.is_empty()) {
        return Err(PipelineError::TableParse("empty header row".into()));
    }

    let mut table = Table::new(columns);
    for (i, record) in reader.records().enumerate() {
        let record = record.map_err(|e| PipelineError::TableParse(e.to_string()))?;
        if record.len() != table.columns().len() {
            tracing::warn!(
                row = i + 1,
                expected = table.columns().len(),
                got = record.len(),
                "Ragged row padded/truncated to header width"
            );
        }
        table.push_row(record.iter().map(str::to_string).collect());
    }

    Ok(table)
}
