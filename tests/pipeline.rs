use std::fs;

use bike_trends::app::pipeline::run_analysis;
use bike_trends::domain::{Analysis, Dimension, GroupKey, Metric, TimeOfDay, WeatherCategory};
use bike_trends::io::ingest::load_records;
use bike_trends::pipeline::{PipelineError, aggregate_ordered};

// 2011-01-01 is a Saturday, 2011-01-02 a Sunday.
const HOURLY: &str = "\
instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,0,6,0,1,0.24,0.2879,0.81,0,3,13,16
2,2011-01-01,1,0,1,7,0,6,0,2,0.22,0.2727,0.8,0,1,1,2
3,2011-01-01,1,0,1,13,0,6,0,3,0.46,0.4545,0.88,0.2985,40,50,90
4,2011-01-02,1,0,1,8,0,0,0,1,0.46,0.4545,0.88,0.2985,5,35,40
5,2011-01-02,1,0,1,19,0,0,0,1,0.42,0.4242,0.94,0.2239,10,20,30
6,2011-02-01,1,0,2,23,0,2,1,4,0.2,0.197,0.59,0.2836,0,4,4
";

fn write_fixture(contents: &str) -> (tempfile::TempDir, std::path::PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("hour.csv");
    fs::write(&path, contents).unwrap();
    (dir, path)
}

#[test]
fn weather_means_in_category_order() {
    let (_dir, path) = write_fixture(HOURLY);
    let records = load_records(&path).unwrap();
    assert_eq!(records.len(), 6);

    let rows = aggregate_ordered(&records, Dimension::WeatherCategory, Metric::Count).unwrap();
    let got: Vec<(GroupKey, f64, usize)> = rows.iter().map(|r| (r.group_key, r.mean_count, r.records)).collect();
    assert_eq!(
        got,
        [
            (GroupKey::Weather(WeatherCategory::ClearPartlyCloudy), 86.0 / 3.0, 3),
            (GroupKey::Weather(WeatherCategory::MistCloudy), 2.0, 1),
            (GroupKey::Weather(WeatherCategory::LightRainSnow), 90.0, 1),
            (GroupKey::Weather(WeatherCategory::HeavyRainSnow), 4.0, 1),
        ]
    );
}

#[test]
fn time_of_day_and_registered_metric() {
    let (_dir, path) = write_fixture(HOURLY);
    let records = load_records(&path).unwrap();

    let rows = aggregate_ordered(&records, Dimension::TimeOfDay, Metric::Registered).unwrap();
    let got: Vec<(GroupKey, f64)> = rows.iter().map(|r| (r.group_key, r.mean_count)).collect();
    // Night holds hours 0 and 23; Morning holds 7 and 8.
    assert_eq!(
        got,
        [
            (GroupKey::TimeOfDay(TimeOfDay::Morning), 18.0),
            (GroupKey::TimeOfDay(TimeOfDay::Afternoon), 50.0),
            (GroupKey::TimeOfDay(TimeOfDay::Evening), 20.0),
            (GroupKey::TimeOfDay(TimeOfDay::Night), 8.5),
        ]
    );
}

#[test]
fn trends_analysis_over_fixture() {
    let (_dir, path) = write_fixture(HOURLY);
    let records = load_records(&path).unwrap();

    let out = run_analysis(&records, Analysis::Trends, Metric::Count).unwrap();
    assert_eq!(out.panels.len(), 3);

    let weekdays: Vec<String> = out.panels[1].rows.iter().map(|r| r.group_key.label()).collect();
    assert_eq!(weekdays, ["Sunday", "Tuesday", "Saturday"]);

    let months: Vec<(String, usize)> = out.panels[2]
        .rows
        .iter()
        .map(|r| (r.group_key.label(), r.records))
        .collect();
    assert_eq!(months, [("January".to_string(), 5), ("February".to_string(), 1)]);
}

#[test]
fn bad_weather_code_fails_the_whole_run() {
    let bad = HOURLY.replace("2011-02-01,1,0,2,23,0,2,1,4,", "2011-02-01,1,0,2,23,0,2,1,7,");
    let (_dir, path) = write_fixture(&bad);
    let records = load_records(&path).unwrap();

    // Grouping by month still validates the weather code of every record.
    let err = aggregate_ordered(&records, Dimension::Month, Metric::Count).unwrap_err();
    match err {
        PipelineError::Validation { index, .. } => assert_eq!(index, 5),
        other => panic!("unexpected error: {other}"),
    }
}
