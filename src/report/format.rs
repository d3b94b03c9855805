//! Formatted terminal output for aggregates.
//!
//! We keep formatting code in one place so:
//! - the pipeline code stays clean and testable
//! - output changes are localized (important for snapshot-style tests)

use std::path::Path;

use crate::app::pipeline::{AnalysisOutput, Panel};
use crate::domain::{AggregateRow, Metric};

/// Header block printed above any CLI output.
pub fn format_dataset_summary(path: &Path, n_records: usize, metric: Metric) -> String {
    let mut out = String::new();
    out.push_str("=== bikes - Bike Sharing Data Analysis ===\n");
    out.push_str(&format!("Data: {}\n", path.display()));
    out.push_str(&format!("Records: {n_records} | metric: {}\n", metric.name()));
    out
}

/// Section for one analysis (title + every panel table).
pub fn format_analysis(output: &AnalysisOutput) -> String {
    let mut out = String::new();
    out.push_str(&format!("\n## {}\n", output.analysis.title()));
    for panel in &output.panels {
        out.push('\n');
        out.push_str(&format_panel(panel, output.metric));
    }
    out
}

pub fn format_panel(panel: &Panel, metric: Metric) -> String {
    let mut out = String::new();
    out.push_str(&format!("### {}\n", panel.title));
    out.push_str(&format_rows(&panel.rows, metric));
    out
}

/// Fixed-width `(label, mean, n)` table.
pub fn format_rows(rows: &[AggregateRow], metric: Metric) -> String {
    let mut out = String::new();
    let mean_header = format!("mean_{}", metric.name());

    out.push_str(&format!("{:<20} {:>16} {:>8}\n", "group", mean_header, "n"));
    out.push_str(&format!("{:-<20} {:-<16} {:-<8}\n", "", "", ""));

    if rows.is_empty() {
        out.push_str("(no data)\n");
        return out;
    }

    for row in rows {
        out.push_str(&format!(
            "{:<20} {:>16.2} {:>8}\n",
            row.group_key.label(),
            row.mean_count,
            row.records
        ));
    }
    out
}
