// src/config.rs

use anyhow::{bail, Context, Result};
use chrono::{DateTime, Duration as ChronoDuration, NaiveDate, Utc};
use std::{env, path::PathBuf, time::Duration};
use url::Url;

/// SPC directory holding the daily `*_rpts_hail.csv` and `*_rpts.html` files.
pub const DEFAULT_BASE_URL: &str = "https://www.spc.noaa.gov/climo/reports/";
pub const DEFAULT_WORKERS: usize = 8;
pub const DEFAULT_MAX_ATTEMPTS: u32 = 3;
pub const DEFAULT_RETRY_DELAY: Duration = Duration::from_millis(500);
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Sub-directory of the work dir holding one raw artifact per date.
pub const RAW_DIR_NAME: &str = "hail_reports";
/// Canonical dataset written by the normalizer, directly under the work dir.
pub const OUTPUT_FILE_NAME: &str = "hail_reports.csv";

/// First day the SPC publishes daily reports for.
pub fn first_report_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(1999, 6, 1).expect("1999-06-01 is a valid date")
}

/// Yesterday relative to `now`, the newest day with a complete report file.
pub fn default_end_date(now: DateTime<Utc>) -> NaiveDate {
    (now - ChronoDuration::days(1)).date_naive()
}

/// Everything the fetcher and normalizer need, resolved once up front.
#[derive(Debug, Clone)]
pub struct Config {
    pub work_dir: PathBuf,
    pub base_url: Url,
    pub start: NaiveDate,
    pub end: NaiveDate,
    /// Number of dates fetched concurrently.
    pub workers: usize,
    /// Total attempts per request, including the first one.
    pub max_attempts: u32,
    pub retry_delay: Duration,
    pub timeout: Duration,
}

impl Config {
    pub fn new(work_dir: impl Into<PathBuf>, start: NaiveDate, end: NaiveDate) -> Result<Self> {
        if start > end {
            bail!("start date {} is after end date {}", start, end);
        }
        Ok(Self {
            work_dir: work_dir.into(),
            base_url: parse_base_url(DEFAULT_BASE_URL)?,
            start,
            end,
            workers: DEFAULT_WORKERS,
            max_attempts: DEFAULT_MAX_ATTEMPTS,
            retry_delay: DEFAULT_RETRY_DELAY,
            timeout: DEFAULT_TIMEOUT,
        })
    }

    pub fn with_base_url(mut self, base_url: &str) -> Result<Self> {
        self.base_url = parse_base_url(base_url)?;
        Ok(self)
    }

    pub fn with_workers(mut self, workers: usize) -> Self {
        self.workers = workers.max(1);
        self
    }

    pub fn with_retry(mut self, max_attempts: u32, retry_delay: Duration) -> Self {
        self.max_attempts = max_attempts.max(1);
        self.retry_delay = retry_delay;
        self
    }

    /// Overrides from `LSR_BASE_URL` and `LSR_WORKERS` when they are set.
    pub fn apply_env(self) -> Result<Self> {
        let mut cfg = match env::var("LSR_BASE_URL") {
            Ok(url) => self.with_base_url(&url)?,
            Err(_) => self,
        };
        if let Ok(raw) = env::var("LSR_WORKERS") {
            let workers = raw
                .parse::<usize>()
                .with_context(|| format!("parsing LSR_WORKERS={:?}", raw))?;
            cfg = cfg.with_workers(workers);
        }
        Ok(cfg)
    }

    pub fn raw_dir(&self) -> PathBuf {
        self.work_dir.join(RAW_DIR_NAME)
    }

    pub fn output_path(&self) -> PathBuf {
        self.work_dir.join(OUTPUT_FILE_NAME)
    }

    /// Every date from `start` to `end`, both inclusive.
    pub fn dates(&self) -> Vec<NaiveDate> {
        self.start
            .iter_days()
            .take_while(|d| *d <= self.end)
            .collect()
    }
}

/// `Url::join` drops the last path segment unless the base ends in `/`.
fn parse_base_url(raw: &str) -> Result<Url> {
    let mut url = Url::parse(raw).with_context(|| format!("parsing base URL {}", raw))?;
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    Ok(url)
}
