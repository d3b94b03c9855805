//! Shared domain types.
//!
//! These types are intentionally kept small and `Copy` where possible so the
//! pipeline can pass keys around by value:
//!
//! - raw input rows (`Record`)
//! - derived features (`FeatureSet`, `TimeOfDay`, `WeatherCategory`)
//! - grouping dimensions and keys (`Dimension`, `GroupKey`)
//! - pipeline output (`AggregateRow`)

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use chrono::{NaiveDate, Weekday};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};

use crate::pipeline::PipelineError;

/// One raw observation row.
///
/// `hour` and `weather_situation` are kept exactly as read; range checks are
/// the pipeline's job so that a bad value fails the query that uses it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    pub date: NaiveDate,
    /// Present only in the hourly dataset.
    pub hour: Option<i64>,
    pub weather_situation: i64,
    pub count: u32,
    pub casual: Option<u32>,
    pub registered: Option<u32>,
}

impl Record {
    pub fn new(date: NaiveDate, hour: Option<i64>, weather_situation: i64, count: u32) -> Self {
        Self {
            date,
            hour,
            weather_situation,
            count,
            casual: None,
            registered: None,
        }
    }

    /// Value of `metric` for this row, if the row carries it.
    pub fn metric(&self, metric: Metric) -> Option<u64> {
        match metric {
            Metric::Count => Some(u64::from(self.count)),
            Metric::Casual => self.casual.map(u64::from),
            Metric::Registered => self.registered.map(u64::from),
        }
    }
}

/// Which rental column is averaged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum Metric {
    /// Total rentals (`cnt`).
    Count,
    /// Rentals by casual users.
    Casual,
    /// Rentals by registered users.
    Registered,
}

impl Metric {
    pub fn name(self) -> &'static str {
        match self {
            Metric::Count => "count",
            Metric::Casual => "casual",
            Metric::Registered => "registered",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Metric::Count => "avg rentals",
            Metric::Casual => "avg casual rentals",
            Metric::Registered => "avg registered rentals",
        }
    }

    pub fn next(self) -> Self {
        match self {
            Metric::Count => Metric::Casual,
            Metric::Casual => Metric::Registered,
            Metric::Registered => Metric::Count,
        }
    }
}

/// Coarse time-of-day bucket derived from the hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TimeOfDay {
    Morning,
    Afternoon,
    Evening,
    Night,
}

impl TimeOfDay {
    pub const ALL: [TimeOfDay; 4] = [
        TimeOfDay::Morning,
        TimeOfDay::Afternoon,
        TimeOfDay::Evening,
        TimeOfDay::Night,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TimeOfDay::Morning => "Morning",
            TimeOfDay::Afternoon => "Afternoon",
            TimeOfDay::Evening => "Evening",
            TimeOfDay::Night => "Night",
        }
    }
}

/// Weather situation, mapped from the dataset's numeric code (1-4).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum WeatherCategory {
    ClearPartlyCloudy,
    MistCloudy,
    LightRainSnow,
    HeavyRainSnow,
}

impl WeatherCategory {
    pub const ALL: [WeatherCategory; 4] = [
        WeatherCategory::ClearPartlyCloudy,
        WeatherCategory::MistCloudy,
        WeatherCategory::LightRainSnow,
        WeatherCategory::HeavyRainSnow,
    ];

    pub fn label(self) -> &'static str {
        match self {
            WeatherCategory::ClearPartlyCloudy => "Clear/Partly Cloudy",
            WeatherCategory::MistCloudy => "Mist/Cloudy",
            WeatherCategory::LightRainSnow => "Light Rain/Snow",
            WeatherCategory::HeavyRainSnow => "Heavy Rain/Snow",
        }
    }

    /// Short axis label for narrow charts.
    pub fn short_label(self) -> &'static str {
        match self {
            WeatherCategory::ClearPartlyCloudy => "Clear",
            WeatherCategory::MistCloudy => "Mist",
            WeatherCategory::LightRainSnow => "Rain",
            WeatherCategory::HeavyRainSnow => "Storm",
        }
    }

    /// The dataset code this category was mapped from.
    pub fn code(self) -> u8 {
        match self {
            WeatherCategory::ClearPartlyCloudy => 1,
            WeatherCategory::MistCloudy => 2,
            WeatherCategory::LightRainSnow => 3,
            WeatherCategory::HeavyRainSnow => 4,
        }
    }
}

/// Calendar and time-of-day features of a single record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FeatureSet {
    /// 1-12.
    pub month: u32,
    pub weekday: Weekday,
    /// `None` for daily datasets.
    pub hour_of_day: Option<u8>,
    pub time_of_day: Option<TimeOfDay>,
}

/// The categorical key a query groups on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Dimension {
    Hour,
    Weekday,
    Month,
    WeatherCategory,
    TimeOfDay,
}

impl Dimension {
    pub const ALL: [Dimension; 5] = [
        Dimension::Hour,
        Dimension::Weekday,
        Dimension::Month,
        Dimension::WeatherCategory,
        Dimension::TimeOfDay,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Dimension::Hour => "hour",
            Dimension::Weekday => "weekday",
            Dimension::Month => "month",
            Dimension::WeatherCategory => "weather_category",
            Dimension::TimeOfDay => "time_of_day",
        }
    }

    pub fn axis_label(self) -> &'static str {
        match self {
            Dimension::Hour => "hour of day",
            Dimension::Weekday => "day of week",
            Dimension::Month => "month",
            Dimension::WeatherCategory => "weather situation",
            Dimension::TimeOfDay => "time of day",
        }
    }

    /// Trends over ordered numeric keys are lines; categories are bars.
    pub fn chart_kind(self) -> ChartKind {
        match self {
            Dimension::Hour | Dimension::Month => ChartKind::Line,
            Dimension::Weekday | Dimension::WeatherCategory | Dimension::TimeOfDay => ChartKind::Bar,
        }
    }
}

impl fmt::Display for Dimension {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Dimension {
    type Err = PipelineError;

    /// Case-insensitive; `-` and spaces are accepted in place of `_`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_ascii_lowercase().replace(['-', ' '], "_");
        Dimension::ALL
            .into_iter()
            .find(|d| d.name() == normalized)
            .ok_or_else(|| PipelineError::UnsupportedDimension(s.to_string()))
    }
}

/// A concrete value of a grouping dimension.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GroupKey {
    Hour(u8),
    Weekday(Weekday),
    Month(u32),
    Weather(WeatherCategory),
    TimeOfDay(TimeOfDay),
}

impl GroupKey {
    /// The dimension this key belongs to.
    pub fn dimension(&self) -> Dimension {
        match self {
            GroupKey::Hour(_) => Dimension::Hour,
            GroupKey::Weekday(_) => Dimension::Weekday,
            GroupKey::Month(_) => Dimension::Month,
            GroupKey::Weather(_) => Dimension::WeatherCategory,
            GroupKey::TimeOfDay(_) => Dimension::TimeOfDay,
        }
    }

    /// Machine-friendly key: numbers for hour/month/weekday (Sunday = 0),
    /// the dataset code for weather, the bucket name for time of day.
    pub fn raw(&self) -> String {
        match self {
            GroupKey::Hour(h) => h.to_string(),
            GroupKey::Weekday(d) => d.num_days_from_sunday().to_string(),
            GroupKey::Month(m) => m.to_string(),
            GroupKey::Weather(w) => w.code().to_string(),
            GroupKey::TimeOfDay(t) => t.label().to_string(),
        }
    }

    /// Human-readable label.
    pub fn label(&self) -> String {
        match self {
            GroupKey::Hour(h) => format!("{h:02}:00"),
            GroupKey::Weekday(d) => weekday_name(*d).to_string(),
            GroupKey::Month(m) => month_name(*m).to_string(),
            GroupKey::Weather(w) => w.label().to_string(),
            GroupKey::TimeOfDay(t) => t.label().to_string(),
        }
    }

    /// Compact label for chart ticks.
    pub fn tick_label(&self) -> String {
        match self {
            GroupKey::Hour(h) => h.to_string(),
            GroupKey::Weekday(d) => weekday_name(*d)[..3].to_string(),
            GroupKey::Month(m) => month_name(*m).chars().take(3).collect(),
            GroupKey::Weather(w) => w.short_label().to_string(),
            GroupKey::TimeOfDay(t) => t.label().to_string(),
        }
    }
}

impl fmt::Display for GroupKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.label())
    }
}

fn weekday_name(day: Weekday) -> &'static str {
    match day {
        Weekday::Sun => "Sunday",
        Weekday::Mon => "Monday",
        Weekday::Tue => "Tuesday",
        Weekday::Wed => "Wednesday",
        Weekday::Thu => "Thursday",
        Weekday::Fri => "Friday",
        Weekday::Sat => "Saturday",
    }
}

fn month_name(month: u32) -> &'static str {
    const NAMES: [&str; 12] = [
        "January",
        "February",
        "March",
        "April",
        "May",
        "June",
        "July",
        "August",
        "September",
        "October",
        "November",
        "December",
    ];
    month
        .checked_sub(1)
        .and_then(|i| NAMES.get(i as usize))
        .copied()
        .unwrap_or("?")
}

/// One group's mean metric value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AggregateRow {
    pub group_key: GroupKey,
    pub mean_count: f64,
    /// Number of records in the group.
    pub records: usize,
}

/// Serializable form of an `AggregateRow`, used by exports.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowRecord {
    pub key: String,
    pub label: String,
    pub tick: String,
    pub mean: f64,
    pub records: usize,
}

impl From<&AggregateRow> for RowRecord {
    fn from(row: &AggregateRow) -> Self {
        Self {
            key: row.group_key.raw(),
            label: row.group_key.label(),
            tick: row.group_key.tick_label(),
            mean: row.mean_count,
            records: row.records,
        }
    }
}

/// Portable JSON document for one ordered aggregate.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowsFile {
    pub tool: String,
    pub source: String,
    pub dimension: Dimension,
    pub metric: Metric,
    pub rows: Vec<RowRecord>,
}

/// How a panel is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChartKind {
    Line,
    Bar,
}

/// The dashboard's top-level analyses (the sidebar entries).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "kebab-case")]
pub enum Analysis {
    /// Hourly, weekly and monthly trends.
    Trends,
    /// Average rentals per weather situation.
    Weather,
    /// Average rentals per time-of-day bucket.
    TimeOfDay,
}

impl Analysis {
    pub const ALL: [Analysis; 3] = [Analysis::Trends, Analysis::Weather, Analysis::TimeOfDay];

    pub fn title(self) -> &'static str {
        match self {
            Analysis::Trends => "Trends Over Time",
            Analysis::Weather => "Weather Impact on Rentals",
            Analysis::TimeOfDay => "Bike Rentals by Time of Day",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            Analysis::Trends => "trends",
            Analysis::Weather => "weather",
            Analysis::TimeOfDay => "time-of-day",
        }
    }

    /// Dimensions charted by this analysis, in display order.
    pub fn dimensions(self) -> &'static [Dimension] {
        match self {
            Analysis::Trends => &[Dimension::Hour, Dimension::Weekday, Dimension::Month],
            Analysis::Weather => &[Dimension::WeatherCategory],
            Analysis::TimeOfDay => &[Dimension::TimeOfDay],
        }
    }
}

/// Resolved run configuration.
///
/// This is derived from CLI flags, the environment, and defaults.
#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub data_path: PathBuf,
    pub metric: Metric,
    pub plot: bool,
    pub plot_width: usize,
    pub plot_height: usize,
    pub export_csv: Option<PathBuf>,
    pub export_json: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn dimension_parses_known_names() {
        assert_eq!("hour".parse::<Dimension>().unwrap(), Dimension::Hour);
        assert_eq!("Weekday".parse::<Dimension>().unwrap(), Dimension::Weekday);
        assert_eq!(
            "weather-category".parse::<Dimension>().unwrap(),
            Dimension::WeatherCategory
        );
        assert_eq!("time of day".parse::<Dimension>().unwrap(), Dimension::TimeOfDay);
    }

    #[test]
    fn dimension_rejects_unknown_names() {
        let err = "season".parse::<Dimension>().unwrap_err();
        assert!(matches!(err, PipelineError::UnsupportedDimension(ref s) if s == "season"));
    }

    #[test]
    fn group_key_labels() {
        assert_eq!(GroupKey::Month(3).label(), "March");
        assert_eq!(GroupKey::Month(3).tick_label(), "Mar");
        assert_eq!(GroupKey::Weekday(Weekday::Sun).raw(), "0");
        assert_eq!(GroupKey::Weekday(Weekday::Sat).tick_label(), "Sat");
        assert_eq!(GroupKey::Hour(7).label(), "07:00");
        assert_eq!(GroupKey::Weather(WeatherCategory::MistCloudy).raw(), "2");
    }

    #[test]
    fn record_metric_lookup() {
        let date = NaiveDate::from_ymd_opt(2011, 1, 1).unwrap();
        let mut r = Record::new(date, Some(0), 1, 16);
        assert_eq!(r.metric(Metric::Count), Some(16));
        assert_eq!(r.metric(Metric::Casual), None);
        r.casual = Some(3);
        assert_eq!(r.metric(Metric::Casual), Some(3));
    }
}
