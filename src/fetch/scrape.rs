// src/fetch/scrape.rs

use scraper::{ElementRef, Html, Selector};
use serde::Serialize;
use thiserror::Error;
use tracing::trace;

use crate::process::utils::clean_text;

/// Cells per report row on the SPC daily page.
const REPORT_CELLS: usize = 8;
/// 1.00" in hundredths of an inch.
const MIN_SIZE: u32 = 100;
/// Common sub-inch codes kept anyway: 3/4" and 7/8".
const SIZE_EXCEPTIONS: [u32; 2] = [75, 88];

/// One hail report as listed on the HTML page, coordinates already decoded.
/// Serializes to the raw artifact columns.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RawReportRow {
    #[serde(rename = "Time")]
    pub time: String,
    #[serde(rename = "Size")]
    pub size: u32,
    #[serde(rename = "Location")]
    pub location: String,
    #[serde(rename = "County")]
    pub county: String,
    #[serde(rename = "State")]
    pub state: String,
    #[serde(rename = "Lat")]
    pub lat: f64,
    #[serde(rename = "Lon")]
    pub lon: f64,
    #[serde(rename = "Comments")]
    pub comments: String,
}

#[derive(Debug, Error, PartialEq)]
pub enum ScrapeError {
    #[error("{field} cell {value:?} is not a 3-5 digit coordinate")]
    Coordinate { field: &'static str, value: String },
}

/// Whether a report of `size` hundredths of an inch belongs in the dataset.
pub fn keep_size(size: u32) -> bool {
    size >= MIN_SIZE || SIZE_EXCEPTIONS.contains(&size)
}

/// Decode `3550` style coordinates: hundredths of a degree, west longitudes
/// stored unsigned.
pub fn decode_coordinate(raw: &str, negate: bool) -> Option<f64> {
    if !(3..=5).contains(&raw.len()) || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let value = raw.parse::<u32>().ok()? as f64 / 100.0;
    Some(if negate { -value } else { value })
}

/// Extract every hail report row from an SPC daily report page.
///
/// Rows without exactly eight cells, or whose size is not a number, are not
/// reports and are passed over. Reports below one inch are dropped except for
/// the 0.75" and 0.88" codes. A kept row with undecodable coordinates means
/// the page layout is not what we expect, and fails the whole scrape.
pub fn scrape(html: &str) -> Result<Vec<RawReportRow>, ScrapeError> {
    let document = Html::parse_document(html);
    let row_sel = Selector::parse("tr").expect("selector should parse");

    let mut reports = Vec::new();
    for row in document.select(&row_sel) {
        let cells: Vec<String> = row
            .children()
            .filter_map(ElementRef::wrap)
            .filter(|el| matches!(el.value().name(), "td" | "th"))
            .map(|el| clean_text(&el.text().collect::<String>()))
            .collect();
        if cells.len() != REPORT_CELLS {
            continue;
        }

        let size_cell = &cells[1];
        if size_cell.is_empty() || !size_cell.bytes().all(|b| b.is_ascii_digit()) {
            trace!(size = %size_cell, "skipping non-report row");
            continue;
        }
        let Ok(size) = size_cell.parse::<u32>() else {
            continue;
        };
        if !keep_size(size) {
            continue;
        }

        let lat = decode_coordinate(&cells[5], false).ok_or_else(|| ScrapeError::Coordinate {
            field: "Lat",
            value: cells[5].clone(),
        })?;
        let lon = decode_coordinate(&cells[6], true).ok_or_else(|| ScrapeError::Coordinate {
            field: "Lon",
            value: cells[6].clone(),
        })?;

        reports.push(RawReportRow {
            time: cells[0].clone(),
            size,
            location: cells[2].clone(),
            county: cells[3].clone(),
            state: cells[4].clone(),
            lat,
            lon,
            comments: cells[7].clone(),
        });
    }

    Ok(reports)
}
