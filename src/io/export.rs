//! Export ordered aggregates to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream scripts.

use std::fs::File;
use std::path::Path;

use crate::domain::{AggregateRow, Dimension, Metric};
use crate::error::AppError;

/// Write ordered rows to a CSV file.
pub fn write_rows_csv(
    path: &Path,
    dimension: Dimension,
    metric: Metric,
    rows: &[AggregateRow],
) -> Result<(), AppError> {
    let file = File::create(path)
        .map_err(|e| AppError::new(2, format!("Failed to create export CSV '{}': {e}", path.display())))?;
    let mut writer = csv::Writer::from_writer(file);

    writer
        .write_record(["dimension", "key", "label", "metric", "mean", "records"])
        .map_err(|e| AppError::new(2, format!("Failed to write export CSV header: {e}")))?;

    for row in rows {
        writer
            .write_record([
                dimension.name().to_string(),
                row.group_key.raw(),
                row.group_key.label(),
                metric.name().to_string(),
                format!("{:.4}", row.mean_count),
                row.records.to_string(),
            ])
            .map_err(|e| AppError::new(2, format!("Failed to write export CSV row: {e}")))?;
    }

    writer
        .flush()
        .map_err(|e| AppError::new(2, format!("Failed to flush export CSV: {e}")))?;

    tracing::info!(path = %path.display(), rows = rows.len(), "wrote CSV export");
    Ok(())
}
