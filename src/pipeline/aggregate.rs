//! Grouped means over a record slice.

use std::collections::HashMap;

use crate::domain::{AggregateRow, Dimension, GroupKey, Metric, Record};
use crate::pipeline::features::{decompose_time, map_weather_category};
use crate::pipeline::{PipelineError, ValidationError};

/// Running sum for one group. Sums stay integral so even splits are exact.
#[derive(Debug)]
struct Accumulator {
    key: GroupKey,
    sum: u64,
    n: usize,
}

impl Accumulator {
    fn finish(self) -> AggregateRow {
        AggregateRow {
            group_key: self.key,
            mean_count: self.sum as f64 / self.n as f64,
            records: self.n,
        }
    }
}

/// Mean of `metric` per distinct value of `dimension`.
///
/// Rows come back in discovery order (first occurrence in `records`); use
/// [`crate::pipeline::order_groups`] for display order. Every record is fully
/// validated, and the first invalid one fails the whole call.
pub fn aggregate(
    records: &[Record],
    dimension: Dimension,
    metric: Metric,
) -> Result<Vec<AggregateRow>, PipelineError> {
    let mut slots: HashMap<GroupKey, usize> = HashMap::new();
    let mut groups: Vec<Accumulator> = Vec::new();

    for (index, record) in records.iter().enumerate() {
        let (key, value) = key_and_value(record, dimension, metric)
            .map_err(|source| PipelineError::Validation { index, source })?;

        let slot = *slots.entry(key).or_insert_with(|| {
            groups.push(Accumulator { key, sum: 0, n: 0 });
            groups.len() - 1
        });
        let group = &mut groups[slot];
        group.sum += value;
        group.n += 1;
    }

    tracing::debug!(
        dimension = %dimension,
        metric = metric.name(),
        records = records.len(),
        groups = groups.len(),
        "aggregated"
    );

    Ok(groups.into_iter().map(Accumulator::finish).collect())
}

/// The group key of `record` under `dimension`.
pub fn group_key(record: &Record, dimension: Dimension) -> Result<GroupKey, ValidationError> {
    let features = decompose_time(record)?;
    let weather = map_weather_category(record.weather_situation)?;

    let key = match dimension {
        Dimension::Hour => GroupKey::Hour(
            features
                .hour_of_day
                .ok_or(ValidationError::MissingHour(dimension))?,
        ),
        Dimension::TimeOfDay => GroupKey::TimeOfDay(
            features
                .time_of_day
                .ok_or(ValidationError::MissingHour(dimension))?,
        ),
        Dimension::Weekday => GroupKey::Weekday(features.weekday),
        Dimension::Month => GroupKey::Month(features.month),
        Dimension::WeatherCategory => GroupKey::Weather(weather),
    };
    Ok(key)
}

fn key_and_value(
    record: &Record,
    dimension: Dimension,
    metric: Metric,
) -> Result<(GroupKey, u64), ValidationError> {
    let key = group_key(record, dimension)?;
    let value = record
        .metric(metric)
        .ok_or(ValidationError::MissingMetric(metric))?;
    Ok((key, value))
}

#[cfg(test)]
mod tests {
    use chrono::{NaiveDate, Weekday};

    use super::*;
    use crate::domain::{TimeOfDay, WeatherCategory};

    fn at_hour(hour: i64, count: u32) -> Record {
        Record::new(NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(), Some(hour), 1, count)
    }

    #[test]
    fn empty_input_gives_empty_output() {
        for dim in Dimension::ALL {
            assert!(aggregate(&[], dim, Metric::Count).unwrap().is_empty());
        }
    }

    #[test]
    fn hourly_means_in_discovery_order() {
        let records = [at_hour(8, 10), at_hour(8, 20), at_hour(14, 5)];
        let rows = aggregate(&records, Dimension::Hour, Metric::Count).unwrap();
        assert_eq!(
            rows,
            vec![
                AggregateRow { group_key: GroupKey::Hour(8), mean_count: 15.0, records: 2 },
                AggregateRow { group_key: GroupKey::Hour(14), mean_count: 5.0, records: 1 },
            ]
        );
    }

    #[test]
    fn non_terminating_mean() {
        let records = [at_hour(3, 10), at_hour(3, 10), at_hour(3, 11)];
        let rows = aggregate(&records, Dimension::Hour, Metric::Count).unwrap();
        assert_eq!(rows.len(), 1);
        assert!((rows[0].mean_count - 31.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn groups_partition_the_input() {
        let records: Vec<Record> = (0..48).map(|i| at_hour(i % 24, (i as u32) * 3)).collect();
        let rows = aggregate(&records, Dimension::TimeOfDay, Metric::Count).unwrap();
        assert_eq!(rows.len(), 4);
        assert_eq!(rows.iter().map(|r| r.records).sum::<usize>(), records.len());

        let night = rows
            .iter()
            .find(|r| r.group_key == GroupKey::TimeOfDay(TimeOfDay::Night))
            .unwrap();
        assert_eq!(night.records, 14);
    }

    #[test]
    fn weather_groups_use_categories() {
        let date = NaiveDate::from_ymd_opt(2011, 6, 1).unwrap();
        let records = [
            Record::new(date, None, 2, 40),
            Record::new(date, None, 1, 100),
            Record::new(date, None, 2, 20),
        ];
        let rows = aggregate(&records, Dimension::WeatherCategory, Metric::Count).unwrap();
        assert_eq!(rows[0].group_key, GroupKey::Weather(WeatherCategory::MistCloudy));
        assert_eq!(rows[0].mean_count, 30.0);
        assert_eq!(rows[1].group_key, GroupKey::Weather(WeatherCategory::ClearPartlyCloudy));
    }

    #[test]
    fn daily_records_group_by_calendar() {
        // 2011-01-03 Monday, 2011-01-05 Wednesday.
        let records = [
            Record::new(NaiveDate::from_ymd_opt(2011, 1, 3).unwrap(), None, 1, 8),
            Record::new(NaiveDate::from_ymd_opt(2011, 1, 5).unwrap(), None, 1, 4),
            Record::new(NaiveDate::from_ymd_opt(2011, 1, 10).unwrap(), None, 1, 2),
        ];
        let rows = aggregate(&records, Dimension::Weekday, Metric::Count).unwrap();
        assert_eq!(rows[0].group_key, GroupKey::Weekday(Weekday::Mon));
        assert_eq!(rows[0].mean_count, 5.0);
        assert_eq!(rows[1].group_key, GroupKey::Weekday(Weekday::Wed));
    }

    #[test]
    fn one_bad_record_fails_the_batch() {
        let records = [at_hour(8, 10), at_hour(25, 20), at_hour(14, 5)];
        let err = aggregate(&records, Dimension::Month, Metric::Count).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation { index: 1, source: ValidationError::HourOutOfRange(25) }
        ));

        let mut bad_weather = at_hour(8, 1);
        bad_weather.weather_situation = 7;
        let err = aggregate(&[bad_weather], Dimension::Hour, Metric::Count).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation { index: 0, source: ValidationError::UnmappedWeather(7) }
        ));
    }

    #[test]
    fn hour_dimensions_need_an_hour() {
        let daily = Record::new(NaiveDate::from_ymd_opt(2011, 1, 1).unwrap(), None, 1, 3);
        let err = aggregate(&[daily], Dimension::TimeOfDay, Metric::Count).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation {
                source: ValidationError::MissingHour(Dimension::TimeOfDay),
                ..
            }
        ));
    }

    #[test]
    fn supplemental_metrics() {
        let mut a = at_hour(9, 10);
        a.casual = Some(4);
        let mut b = at_hour(9, 12);
        b.casual = Some(2);
        let rows = aggregate(&[a.clone(), b], Dimension::Hour, Metric::Casual).unwrap();
        assert_eq!(rows[0].mean_count, 3.0);

        let err = aggregate(&[a], Dimension::Hour, Metric::Registered).unwrap_err();
        assert!(matches!(
            err,
            PipelineError::Validation {
                source: ValidationError::MissingMetric(Metric::Registered),
                ..
            }
        ));
    }
}
