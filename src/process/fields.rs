// src/process/fields.rs
//
// Typed conversions for the eight raw artifact columns. Each step returns a
// `RowError` describing why the line cannot become a canonical report.

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveTime, TimeZone, Utc};
use thiserror::Error;

use crate::process::report::CanonicalReport;
use crate::fetch::scrape::decode_coordinate;

const FIELD_COUNT: usize = 8;
/// SPC reporting convention: report times are kept at a fixed UTC-12.
const CONVECTIVE_OFFSET_SECS: i32 = 12 * 3600;

const LAT_RANGE: (f64, f64) = (24.0, 50.0);
const LON_RANGE: (f64, f64) = (-125.0, -66.0);

#[derive(Debug, Error, PartialEq)]
pub enum RowError {
    #[error("invalid row formatting or missing data")]
    Shape,
    #[error("invalid time data \"{0}\"")]
    Time(String),
    #[error("invalid size data \"{0}\"")]
    Size(String),
    #[error("invalid lat,lon coordinates \"{0},{1}\"")]
    Coordinates(String, String),
    #[error("coordinates out of range \"{lat},{lon}\"")]
    OutOfRange { lat: f64, lon: f64 },
}

/// The eight columns of one raw line, unconverted.
#[derive(Debug, PartialEq)]
pub struct RawFields {
    pub time: String,
    pub size: String,
    pub location: String,
    pub county: String,
    pub state: String,
    pub lat: String,
    pub lon: String,
    pub comments: String,
}

/// Split a raw line into its eight columns.
///
/// Columns follow CSV quoting, so a quoted location or county may carry
/// commas. The first seven may not contain `;` and only the location may be
/// empty. Anything past the seventh column is the comment, commas included.
pub fn split_fields(line: &str) -> Result<RawFields, RowError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(line.as_bytes());
    let record = match reader.records().next() {
        Some(Ok(record)) if record.len() >= FIELD_COUNT => record,
        _ => return Err(RowError::Shape),
    };

    let leading: Vec<String> = record
        .iter()
        .take(FIELD_COUNT - 1)
        .map(|value| value.trim().to_string())
        .collect();
    for (idx, value) in leading.iter().enumerate() {
        if value.contains(';') {
            return Err(RowError::Shape);
        }
        // Location (idx 2) is the one optional column.
        if idx != 2 && value.is_empty() {
            return Err(RowError::Shape);
        }
    }
    let comments = record
        .iter()
        .skip(FIELD_COUNT - 1)
        .collect::<Vec<_>>()
        .join(",")
        .trim()
        .to_string();

    let [time, size, location, county, state, lat, lon]: [String; FIELD_COUNT - 1] =
        leading.try_into().map_err(|_| RowError::Shape)?;
    Ok(RawFields {
        time,
        size,
        location,
        county,
        state,
        lat,
        lon,
        comments,
    })
}

/// `HHMM`, exactly four digits.
pub fn parse_time(code: &str) -> Result<NaiveTime, RowError> {
    let bad = || RowError::Time(code.to_string());
    if code.len() != 4 || !code.bytes().all(|b| b.is_ascii_digit()) {
        return Err(bad());
    }
    let hour: u32 = code[..2].parse().map_err(|_| bad())?;
    let minute: u32 = code[2..].parse().map_err(|_| bad())?;
    NaiveTime::from_hms_opt(hour, minute, 0).ok_or_else(bad)
}

pub fn convective_offset() -> FixedOffset {
    FixedOffset::west_opt(CONVECTIVE_OFFSET_SECS).expect("UTC-12 is a valid offset")
}

/// Pin a report time to its convective day.
pub fn convective_datetime(date: NaiveDate, time: NaiveTime) -> DateTime<FixedOffset> {
    convective_offset()
        .from_local_datetime(&date.and_time(time))
        .single()
        .expect("fixed offsets map local times uniquely")
}

/// Hail size in hundredths of an inch.
pub fn parse_size(code: &str) -> Result<u32, RowError> {
    code.parse::<u32>()
        .map_err(|_| RowError::Size(code.to_string()))
}

/// Decimal degrees, or the scraper's integer hundredths (`3550`, `9720`)
/// when the field is a bare 3-5 digit number. Encoded longitudes are west.
pub fn parse_coordinate(raw: &str, negate_encoded: bool) -> Option<f64> {
    decode_coordinate(raw, negate_encoded).or_else(|| raw.parse::<f64>().ok())
}

/// Strict continental US bounding box.
pub fn check_bounds(lat: f64, lon: f64) -> Result<(), RowError> {
    let lat_ok = LAT_RANGE.0 < lat && lat < LAT_RANGE.1;
    let lon_ok = LON_RANGE.0 < lon && lon < LON_RANGE.1;
    if lat_ok && lon_ok {
        Ok(())
    } else {
        Err(RowError::OutOfRange { lat, lon })
    }
}

/// Turn one non-header raw line from the artifact for `date` into a report.
pub fn parse_line(date: NaiveDate, line: &str) -> Result<CanonicalReport, RowError> {
    let fields = split_fields(line)?;

    let time = parse_time(&fields.time)?;
    let convective_date = convective_datetime(date, time);

    let size_hundredths = parse_size(&fields.size)?;

    let coords = parse_coordinate(&fields.lat, false).zip(parse_coordinate(&fields.lon, true));
    let Some((lat, lon)) = coords else {
        return Err(RowError::Coordinates(fields.lat, fields.lon));
    };
    check_bounds(lat, lon)?;

    Ok(CanonicalReport {
        utc_time: convective_date.with_timezone(&Utc),
        convective_date,
        size_hundredths,
        location: fields.location,
        county: fields.county,
        state: fields.state,
        lat,
        lon,
        comments: fields.comments,
    })
}
