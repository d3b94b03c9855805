//! Read/write aggregate JSON files.
//!
//! Rows JSON is the "portable" representation of one query result:
//! - dimension + metric
//! - the source file it was computed from
//! - the ordered rows (key, label, tick, mean, records)
//!
//! The schema is defined by `domain::RowsFile`.

use std::fs::File;
use std::path::Path;

use crate::domain::{AggregateRow, Dimension, Metric, RowRecord, RowsFile};
use crate::error::AppError;

/// Write a rows JSON file.
pub fn write_rows_json(
    path: &Path,
    source: &Path,
    dimension: Dimension,
    metric: Metric,
    rows: &[AggregateRow],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create rows JSON '{}': {e}", path.display())))?;

    let doc = RowsFile {
        tool: "bikes".to_string(),
        source: source.display().to_string(),
        dimension,
        metric,
        rows: rows.iter().map(RowRecord::from).collect(),
    };

    serde_json::to_writer_pretty(file, &doc)
        .map_err(|e| AppError::new(2, format!("Failed to write rows JSON: {e}")))?;

    tracing::info!(path = %path.display(), rows = rows.len(), "wrote JSON export");
    Ok(())
}

/// Read a rows JSON file.
pub fn read_rows_json(path: &Path) -> Result<RowsFile, AppError> {
    let file = File::open(path)
        .map_err(|e| AppError::new(2, format!("Failed to open rows JSON '{}': {e}", path.display())))?;
    let doc: RowsFile =
        serde_json::from_reader(file).map_err(|e| AppError::new(2, format!("Invalid rows JSON: {e}")))?;
    Ok(doc)
}
