use std::path::PathBuf;

use thiserror::Error;

use crate::domain::{Dimension, GroupKey, Metric};

/// A malformed or out-of-range field in a single record.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("hour {0} is outside 0..=23")]
    HourOutOfRange(i64),

    #[error("weather situation code {0} has no category (expected 1-4)")]
    UnmappedWeather(i64),

    #[error("record has no hour, required to group by {0}")]
    MissingHour(Dimension),

    #[error("record has no `{}` value", .0.name())]
    MissingMetric(Metric),
}

/// The tabular collaborator could not produce a valid record sequence.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("failed to open '{0}'")]
    Open(PathBuf, #[source] std::io::Error),

    #[error("failed to read CSV headers")]
    Headers(#[source] csv::Error),

    #[error("required column `{0}` not found")]
    MissingColumn(&'static str),

    #[error("line {line}: malformed CSV row")]
    Row {
        line: usize,
        #[source]
        source: csv::Error,
    },

    #[error("line {line}: invalid `{column}` value '{value}': {reason}")]
    Field {
        line: usize,
        column: &'static str,
        value: String,
        reason: String,
    },
}

#[derive(Debug, Error)]
pub enum PipelineError {
    #[error("invalid record at index {index}")]
    Validation {
        index: usize,
        #[source]
        source: ValidationError,
    },

    #[error("'{key}' has no place in the {dimension} ordering")]
    UnknownCategory { dimension: Dimension, key: GroupKey },

    #[error("unsupported dimension '{0}' (expected one of: hour, weekday, month, weather_category, time_of_day)")]
    UnsupportedDimension(String),

    #[error(transparent)]
    Load(#[from] LoadError),
}
