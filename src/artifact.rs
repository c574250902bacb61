// src/artifact.rs
//
// Naming of the per-date raw files, shared by the fetcher (which writes them)
// and the normalizer (which recovers the date from the name).

use chrono::NaiveDate;
use once_cell::sync::Lazy;
use regex::Regex;
use std::path::Path;

/// Header of every raw artifact, whether downloaded or scraped.
pub const RAW_HEADER: [&str; 8] = [
    "Time", "Size", "Location", "County", "State", "Lat", "Lon", "Comments",
];

static ARTIFACT_NAME: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)^hail_reports_([0-9]{8})\.csv$").expect("artifact name regex"));

/// `hail_reports_YYYYMMDD.csv`
pub fn artifact_name(date: NaiveDate) -> String {
    format!("hail_reports_{}.csv", date.format("%Y%m%d"))
}

/// Upstream CSV for `date`, e.g. `200426_rpts_hail.csv`.
pub fn csv_source_name(date: NaiveDate) -> String {
    format!("{}_rpts_hail.csv", date.format("%y%m%d"))
}

/// Upstream HTML report page for `date`, e.g. `200426_rpts.html`.
pub fn html_source_name(date: NaiveDate) -> String {
    format!("{}_rpts.html", date.format("%y%m%d"))
}

/// Recovers the report date from an artifact path, `None` for anything else.
pub fn artifact_date(path: &Path) -> Option<NaiveDate> {
    let name = path.file_name()?.to_str()?;
    let caps = ARTIFACT_NAME.captures(name)?;
    NaiveDate::parse_from_str(&caps[1], "%Y%m%d").ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    #[test]
    fn names_embed_the_date() {
        let date = NaiveDate::from_ymd_opt(2020, 4, 26).unwrap();
        assert_eq!(artifact_name(date), "hail_reports_20200426.csv");
        assert_eq!(csv_source_name(date), "200426_rpts_hail.csv");
        assert_eq!(html_source_name(date), "200426_rpts.html");
    }

    #[test]
    fn artifact_date_reads_back_written_names() {
        let date = NaiveDate::from_ymd_opt(1999, 6, 1).unwrap();
        let path = PathBuf::from("/tmp/work/hail_reports").join(artifact_name(date));
        assert_eq!(artifact_date(&path), Some(date));
    }

    #[test]
    fn artifact_date_is_case_insensitive() {
        let path = PathBuf::from("HAIL_REPORTS_20110427.CSV");
        assert_eq!(
            artifact_date(&path),
            NaiveDate::from_ymd_opt(2011, 4, 27)
        );
    }

    #[test]
    fn artifact_date_rejects_foreign_and_impossible_names() {
        assert_eq!(artifact_date(Path::new("notes.csv")), None);
        assert_eq!(artifact_date(Path::new("hail_reports_2020042.csv")), None);
        assert_eq!(artifact_date(Path::new("hail_reports_20201340.csv")), None);
        assert_eq!(artifact_date(Path::new("hail_reports_20200426.csv.part")), None);
    }
}
