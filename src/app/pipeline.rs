//! Shared "analysis" logic used by both CLI and TUI front-ends.
//!
//! Keeping this in one place avoids duplicating the core workflow:
//! records -> (per panel) aggregate -> canonical order -> titled panel
//!
//! The CLI and the TUI can then focus on presentation (printing vs widgets).

use crate::domain::{AggregateRow, Analysis, ChartKind, Dimension, Metric, Record};
use crate::pipeline::{PipelineError, aggregate_ordered};

/// One chart's worth of output.
#[derive(Debug, Clone)]
pub struct Panel {
    pub dimension: Dimension,
    pub kind: ChartKind,
    pub title: String,
    pub rows: Vec<AggregateRow>,
}

/// All computed outputs of a single analysis.
#[derive(Debug, Clone)]
pub struct AnalysisOutput {
    pub analysis: Analysis,
    pub metric: Metric,
    pub panels: Vec<Panel>,
}

/// Compute every panel of `analysis`. The first failing panel fails the run.
pub fn run_analysis(
    records: &[Record],
    analysis: Analysis,
    metric: Metric,
) -> Result<AnalysisOutput, PipelineError> {
    let mut panels = Vec::with_capacity(analysis.dimensions().len());
    for &dimension in analysis.dimensions() {
        panels.push(Panel {
            dimension,
            kind: dimension.chart_kind(),
            title: panel_title(dimension, metric),
            rows: aggregate_ordered(records, dimension, metric)?,
        });
    }

    tracing::info!(
        analysis = analysis.slug(),
        metric = metric.name(),
        panels = panels.len(),
        "analysis computed"
    );

    Ok(AnalysisOutput {
        analysis,
        metric,
        panels,
    })
}

/// Chart title, e.g. "Average Bike Rentals by Hour".
pub fn panel_title(dimension: Dimension, metric: Metric) -> String {
    let what = match metric {
        Metric::Count => "Bike Rentals",
        Metric::Casual => "Casual Rentals",
        Metric::Registered => "Registered Rentals",
    };
    let by = match dimension {
        Dimension::Hour => "Hour",
        Dimension::Weekday => "Day of the Week",
        Dimension::Month => "Month",
        Dimension::WeatherCategory => "Weather Situation",
        Dimension::TimeOfDay => "Time of Day",
    };
    format!("Average {what} by {by}")
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::domain::GroupKey;

    fn hourly() -> Vec<Record> {
        // Two days (Sat 2011-01-01, Sun 2011-01-02), a handful of hours each.
        let mut out = Vec::new();
        for day in [1, 2] {
            let date = NaiveDate::from_ymd_opt(2011, 1, day).unwrap();
            for (hour, weather, count) in [(3, 1, 2), (8, 2, 40), (13, 1, 60), (19, 3, 30)] {
                out.push(Record::new(date, Some(hour), weather, count * day));
            }
        }
        out
    }

    #[test]
    fn trends_has_three_panels() {
        let out = run_analysis(&hourly(), Analysis::Trends, Metric::Count).unwrap();
        let dims: Vec<Dimension> = out.panels.iter().map(|p| p.dimension).collect();
        assert_eq!(dims, [Dimension::Hour, Dimension::Weekday, Dimension::Month]);
        assert_eq!(out.panels[0].kind, ChartKind::Line);
        assert_eq!(out.panels[1].kind, ChartKind::Bar);

        // Sunday comes before Saturday even though Saturday was seen first.
        let weekday_keys: Vec<String> = out.panels[1].rows.iter().map(|r| r.group_key.label()).collect();
        assert_eq!(weekday_keys, ["Sunday", "Saturday"]);

        let hour8 = out.panels[0]
            .rows
            .iter()
            .find(|r| r.group_key == GroupKey::Hour(8))
            .unwrap();
        assert_eq!(hour8.mean_count, 60.0);
    }

    #[test]
    fn weather_and_time_of_day_are_single_panels() {
        let weather = run_analysis(&hourly(), Analysis::Weather, Metric::Count).unwrap();
        assert_eq!(weather.panels.len(), 1);
        assert_eq!(weather.panels[0].title, "Average Bike Rentals by Weather Situation");
        assert_eq!(weather.panels[0].rows.len(), 3);

        let tod = run_analysis(&hourly(), Analysis::TimeOfDay, Metric::Count).unwrap();
        let labels: Vec<String> = tod.panels[0].rows.iter().map(|r| r.group_key.label()).collect();
        assert_eq!(labels, ["Morning", "Afternoon", "Evening", "Night"]);
    }

    #[test]
    fn trends_fail_without_hours() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let daily = vec![Record::new(date, None, 1, 985)];
        assert!(run_analysis(&daily, Analysis::Trends, Metric::Count).is_err());
        assert!(run_analysis(&daily, Analysis::Weather, Metric::Count).is_ok());
    }
}
