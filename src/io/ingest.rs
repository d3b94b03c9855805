//! CSV ingest.
//!
//! This module turns a bike-sharing CSV into `Record`s. It only checks that
//! every field *parses*; whether an hour or weather code is in range is left to
//! the pipeline, which fails the query that needs it.
//!
//! Design goals:
//! - **Strict schema** for required columns (clear errors + exit code 2)
//! - **Fail fast** on the first unparseable row, naming line and column
//! - **Alias-tolerant headers** (`dteday`/`date`, `hr`/`hour`, `cnt`/`count`, ...)

use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

use chrono::NaiveDate;
use csv::StringRecord;

use crate::domain::Record;
use crate::pipeline::LoadError;

const DATE_COLUMNS: [&str; 2] = ["date", "dteday"];
const HOUR_COLUMNS: [&str; 2] = ["hour", "hr"];
const WEATHER_COLUMNS: [&str; 2] = ["weather_situation", "weathersit"];
const COUNT_COLUMNS: [&str; 2] = ["count", "cnt"];

/// Column positions resolved from the header row.
#[derive(Debug, Clone, Copy)]
struct Columns {
    date: usize,
    hour: Option<usize>,
    weather: usize,
    count: usize,
    casual: Option<usize>,
    registered: Option<usize>,
}

/// Load all records from a CSV file.
pub fn load_records(path: &Path) -> Result<Vec<Record>, LoadError> {
    let file = File::open(path).map_err(|e| LoadError::Open(path.to_path_buf(), e))?;
    let records = read_records(file)?;
    tracing::info!(path = %path.display(), records = records.len(), "loaded dataset");
    Ok(records)
}

/// Parse records from any CSV source.
pub fn read_records<R: Read>(source: R) -> Result<Vec<Record>, LoadError> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers().map_err(LoadError::Headers)?.clone();
    let columns = resolve_columns(&build_header_map(&headers))?;

    let mut out = Vec::new();
    for (idx, result) in reader.records().enumerate() {
        // +2: header is line 1 and CSV lines are 1-based.
        let line = idx + 2;
        let row = result.map_err(|source| LoadError::Row { line, source })?;
        out.push(parse_row(&row, &columns, line)?);
    }
    Ok(out)
}

/// Whether a header row names every column `read_records` requires.
pub fn header_is_loadable(header_line: &str) -> bool {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .trim(csv::Trim::All)
        .from_reader(header_line.as_bytes());
    match reader.records().next() {
        Some(Ok(headers)) => resolve_columns(&build_header_map(&headers)).is_ok(),
        _ => false,
    }
}

fn build_header_map(headers: &StringRecord) -> HashMap<String, usize> {
    headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (normalize_header_name(name), idx))
        .collect()
}

fn normalize_header_name(name: &str) -> String {
    // Spreadsheet exports sometimes prefix the first header with a UTF-8 BOM.
    let name = name.trim().trim_start_matches('\u{feff}');
    name.to_ascii_lowercase()
}

fn resolve_columns(header_map: &HashMap<String, usize>) -> Result<Columns, LoadError> {
    Ok(Columns {
        date: require_column(header_map, &DATE_COLUMNS)?,
        hour: find_column(header_map, &HOUR_COLUMNS),
        weather: require_column(header_map, &WEATHER_COLUMNS)?,
        count: require_column(header_map, &COUNT_COLUMNS)?,
        casual: find_column(header_map, &["casual"]),
        registered: find_column(header_map, &["registered"]),
    })
}

fn find_column(header_map: &HashMap<String, usize>, aliases: &[&str]) -> Option<usize> {
    aliases.iter().find_map(|a| header_map.get(*a).copied())
}

/// Errors name the first (canonical) alias.
fn require_column(
    header_map: &HashMap<String, usize>,
    aliases: &[&'static str],
) -> Result<usize, LoadError> {
    find_column(header_map, aliases).ok_or(LoadError::MissingColumn(aliases[0]))
}

fn parse_row(row: &StringRecord, columns: &Columns, line: usize) -> Result<Record, LoadError> {
    let field = |column: &'static str, reason: String, value: &str| LoadError::Field {
        line,
        column,
        value: value.to_string(),
        reason,
    };

    let raw_date = required(row, columns.date);
    let date = parse_date(raw_date).map_err(|reason| field("date", reason, raw_date))?;

    let hour = match columns.hour.map(|idx| required(row, idx)) {
        Some(raw) => Some(parse_int(raw).map_err(|reason| field("hour", reason, raw))?),
        None => None,
    };

    let raw_weather = required(row, columns.weather);
    let weather_situation =
        parse_int(raw_weather).map_err(|reason| field("weather_situation", reason, raw_weather))?;

    let raw_count = required(row, columns.count);
    let count = parse_count(raw_count).map_err(|reason| field("count", reason, raw_count))?;

    let casual = optional_count(row, columns.casual)
        .map_err(|(raw, reason)| field("casual", reason, raw))?;
    let registered = optional_count(row, columns.registered)
        .map_err(|(raw, reason)| field("registered", reason, raw))?;

    Ok(Record {
        date,
        hour,
        weather_situation,
        count,
        casual,
        registered,
    })
}

/// A value for a column that exists; short rows read as empty.
fn required(row: &StringRecord, idx: usize) -> &str {
    row.get(idx).unwrap_or("")
}

fn optional_count(row: &StringRecord, idx: Option<usize>) -> Result<Option<u32>, (&str, String)> {
    let Some(raw) = idx.and_then(|i| row.get(i)).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    parse_count(raw).map(Some).map_err(|reason| (raw, reason))
}

fn parse_int(s: &str) -> Result<i64, String> {
    if s.is_empty() {
        return Err("missing value".to_string());
    }
    s.parse::<i64>().map_err(|e| e.to_string())
}

fn parse_count(s: &str) -> Result<u32, String> {
    if s.is_empty() {
        return Err("missing value".to_string());
    }
    s.parse::<u32>()
        .map_err(|_| "expected a non-negative integer".to_string())
}

fn parse_date(s: &str) -> Result<NaiveDate, String> {
    const FMTS: [&str; 3] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y"];
    if s.is_empty() {
        return Err("missing value".to_string());
    }
    for fmt in FMTS {
        if let Ok(d) = NaiveDate::parse_from_str(s, fmt) {
            return Ok(d);
        }
    }
    Err("expected one of: YYYY-MM-DD, YYYY/MM/DD, DD/MM/YYYY".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    const HOURLY: &str = "\
instant,dteday,season,yr,mnth,hr,holiday,weekday,workingday,weathersit,temp,atemp,hum,windspeed,casual,registered,cnt
1,2011-01-01,1,0,1,0,0,6,0,1,0.24,0.2879,0.81,0,3,13,16
2,2011-01-01,1,0,1,1,0,6,0,1,0.22,0.2727,0.8,0,8,32,40
";

    #[test]
    fn reads_uci_hourly_layout() {
        let records = read_records(HOURLY.as_bytes()).unwrap();
        assert_eq!(records.len(), 2);
        let first = &records[0];
        assert_eq!(first.date, NaiveDate::from_ymd_opt(2011, 1, 1).unwrap());
        assert_eq!(first.hour, Some(0));
        assert_eq!(first.weather_situation, 1);
        assert_eq!(first.count, 16);
        assert_eq!(first.casual, Some(3));
        assert_eq!(first.registered, Some(13));
        assert_eq!(records[1].hour, Some(1));
    }

    #[test]
    fn reads_plain_daily_layout_with_bom() {
        let csv = "\u{feff}Date,Weather_Situation,Count\n2012/12/31,2,2729\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].hour, None);
        assert_eq!(records[0].weather_situation, 2);
        assert_eq!(records[0].casual, None);
    }

    #[test]
    fn range_checks_are_not_the_loaders_job() {
        let csv = "date,hour,weathersit,cnt\n2011-01-01,30,9,1\n";
        let records = read_records(csv.as_bytes()).unwrap();
        assert_eq!(records[0].hour, Some(30));
        assert_eq!(records[0].weather_situation, 9);
    }

    #[test]
    fn headers_only_is_empty() {
        let records = read_records("dteday,weathersit,cnt\n".as_bytes()).unwrap();
        assert!(records.is_empty());
    }

    #[test]
    fn missing_column_is_reported() {
        let err = read_records("dteday,hr,cnt\n2011-01-01,0,1\n".as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::MissingColumn("weather_situation")));
    }

    #[test]
    fn bad_count_names_line_and_column() {
        let csv = "dteday,weathersit,cnt\n2011-01-01,1,5\n2011-01-02,1,-3\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        match err {
            LoadError::Field { line, column, value, .. } => {
                assert_eq!(line, 3);
                assert_eq!(column, "count");
                assert_eq!(value, "-3");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn bad_date_is_reported() {
        let csv = "dteday,weathersit,cnt\nyesterday,1,5\n";
        let err = read_records(csv.as_bytes()).unwrap_err();
        assert!(matches!(err, LoadError::Field { column: "date", .. }));
    }

    #[test]
    fn loadable_headers() {
        assert!(header_is_loadable("instant,dteday,hr,weathersit,cnt\n"));
        assert!(header_is_loadable("Date, Weather_Situation, Count"));
        assert!(!header_is_loadable("dteday,cnt"));
        assert!(!header_is_loadable(""));
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_records(Path::new("definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open(..)));
    }
}
