//! Canonical display order per dimension.

use chrono::Weekday;

use crate::domain::{AggregateRow, Dimension, GroupKey, TimeOfDay, WeatherCategory};
use crate::pipeline::PipelineError;

const WEEK_FROM_SUNDAY: [Weekday; 7] = [
    Weekday::Sun,
    Weekday::Mon,
    Weekday::Tue,
    Weekday::Wed,
    Weekday::Thu,
    Weekday::Fri,
    Weekday::Sat,
];

/// The fixed display sequence of every value `dimension` can take.
pub fn canonical_order(dimension: Dimension) -> Vec<GroupKey> {
    match dimension {
        Dimension::Hour => (0..24).map(GroupKey::Hour).collect(),
        Dimension::Weekday => WEEK_FROM_SUNDAY.into_iter().map(GroupKey::Weekday).collect(),
        Dimension::Month => (1..=12).map(GroupKey::Month).collect(),
        Dimension::WeatherCategory => WeatherCategory::ALL.into_iter().map(GroupKey::Weather).collect(),
        Dimension::TimeOfDay => TimeOfDay::ALL.into_iter().map(GroupKey::TimeOfDay).collect(),
    }
}

/// Reorder `rows` to the canonical sequence of `dimension`.
///
/// Absent values are simply skipped. A key that is not in the table (another
/// dimension's key, or a month like 13) fails with `UnknownCategory`.
pub fn order_groups(
    rows: Vec<AggregateRow>,
    dimension: Dimension,
) -> Result<Vec<AggregateRow>, PipelineError> {
    let table = canonical_order(dimension);

    let mut ranked = rows
        .into_iter()
        .map(|row| {
            let unknown = PipelineError::UnknownCategory {
                dimension,
                key: row.group_key,
            };
            if row.group_key.dimension() != dimension {
                return Err(unknown);
            }
            table
                .iter()
                .position(|k| *k == row.group_key)
                .map(|rank| (rank, row))
                .ok_or(unknown)
        })
        .collect::<Result<Vec<_>, _>>()?;

    ranked.sort_by_key(|(rank, _)| *rank);
    Ok(ranked.into_iter().map(|(_, row)| row).collect())
}
