//! Download and normalize NOAA Storm Prediction Center hail reports.
//!
//! [`fetch::fetch_all`] caches one raw CSV per day under the work directory,
//! falling back to scraping the daily HTML page when the CSV is missing.
//! [`process::normalize`] turns those files into a single validated dataset.

pub mod artifact;
pub mod config;
pub mod fetch;
pub mod process;

pub use config::Config;
pub use fetch::{fetch_all, FetchOutcome, FetchSummary};
pub use process::{normalize, CanonicalReport, NormalizeSummary};
