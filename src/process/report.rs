use chrono::{DateTime, FixedOffset, TimeZone, Utc};
use serde::{Serialize, Serializer};
use std::fmt::Display;

/// Header of the canonical dataset, in column order.
pub const CANONICAL_HEADER: [&str; 9] = [
    "utc_time",
    "convective_date",
    "hail_diameter_inches",
    "location",
    "county",
    "state",
    "lat",
    "lon",
    "comments",
];

/// One validated hail report as written to the canonical dataset.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CanonicalReport {
    #[serde(serialize_with = "timestamp")]
    pub utc_time: DateTime<Utc>,
    /// Local report time on its convective day, at the fixed UTC-12 offset.
    #[serde(serialize_with = "timestamp")]
    pub convective_date: DateTime<FixedOffset>,
    #[serde(rename = "hail_diameter_inches", serialize_with = "inches")]
    pub size_hundredths: u32,
    pub location: String,
    pub county: String,
    pub state: String,
    pub lat: f64,
    pub lon: f64,
    pub comments: String,
}

impl CanonicalReport {
    pub fn hail_diameter_inches(&self) -> f64 {
        f64::from(self.size_hundredths) / 100.0
    }
}

fn timestamp<S, Tz>(dt: &DateTime<Tz>, s: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
    Tz: TimeZone,
    Tz::Offset: Display,
{
    s.collect_str(&dt.format("%Y-%m-%d %H:%M:%S%:z"))
}

/// Exact two-decimal rendering of a hundredths value, no float rounding.
fn inches<S: Serializer>(hundredths: &u32, s: S) -> Result<S::Ok, S::Error> {
    s.collect_str(&format!("{}.{:02}", hundredths / 100, hundredths % 100))
}
