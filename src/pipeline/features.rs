//! Per-record feature derivation.

use chrono::Datelike;

use crate::domain::{FeatureSet, Record, TimeOfDay, WeatherCategory};
use crate::pipeline::ValidationError;

/// Calendar and time-of-day features for one record.
///
/// `hour_of_day` and `time_of_day` are `None` when the record has no hour
/// (daily datasets). An hour outside 0..=23 is rejected.
pub fn decompose_time(record: &Record) -> Result<FeatureSet, ValidationError> {
    let hour_of_day = record.hour.map(validate_hour).transpose()?;
    Ok(FeatureSet {
        month: record.date.month(),
        weekday: record.date.weekday(),
        hour_of_day,
        time_of_day: hour_of_day.map(bucket),
    })
}

/// Bucket an hour into a time of day.
pub fn time_of_day(hour: i64) -> Result<TimeOfDay, ValidationError> {
    validate_hour(hour).map(bucket)
}

/// Map the dataset's weather situation code onto its category.
pub fn map_weather_category(code: i64) -> Result<WeatherCategory, ValidationError> {
    match code {
        1 => Ok(WeatherCategory::ClearPartlyCloudy),
        2 => Ok(WeatherCategory::MistCloudy),
        3 => Ok(WeatherCategory::LightRainSnow),
        4 => Ok(WeatherCategory::HeavyRainSnow),
        other => Err(ValidationError::UnmappedWeather(other)),
    }
}

fn validate_hour(hour: i64) -> Result<u8, ValidationError> {
    u8::try_from(hour)
        .ok()
        .filter(|h| *h <= 23)
        .ok_or(ValidationError::HourOutOfRange(hour))
}

// First match wins; hour is already range-checked.
fn bucket(hour: u8) -> TimeOfDay {
    match hour {
        5..=11 => TimeOfDay::Morning,
        12..=17 => TimeOfDay::Afternoon,
        18..=21 => TimeOfDay::Evening,
        _ => TimeOfDay::Night,
    }
}
