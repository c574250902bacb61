// src/fetch/mod.rs

use anyhow::{Context, Result};
use chrono::NaiveDate;
use std::sync::Arc;
use tokio::{fs, sync::Semaphore, task::JoinSet, time::Instant};
use tracing::info;

use crate::config::Config;

pub mod client;
pub mod reports;
pub mod scrape;

pub use client::{TransportClient, TransportError};
pub use reports::{FetchOutcome, ReportFetcher};
pub use scrape::{scrape, RawReportRow, ScrapeError};

/// Tally of per-date outcomes for one download run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct FetchSummary {
    pub written: usize,
    pub skipped_existing: usize,
    pub skipped_empty: usize,
}

impl FetchSummary {
    fn record(&mut self, outcome: FetchOutcome) {
        match outcome {
            FetchOutcome::Written => self.written += 1,
            FetchOutcome::SkippedExisting => self.skipped_existing += 1,
            FetchOutcome::SkippedEmpty => self.skipped_empty += 1,
        }
    }

    pub fn total(&self) -> usize {
        self.written + self.skipped_existing + self.skipped_empty
    }
}

/// Fetch every date in the configured range into `config.raw_dir()`.
pub async fn fetch_all(config: &Config) -> Result<FetchSummary> {
    let raw_dir = config.raw_dir();
    fs::create_dir_all(&raw_dir)
        .await
        .with_context(|| format!("creating raw directory {}", raw_dir.display()))?;

    let client = TransportClient::new(config)?;
    let fetcher = Arc::new(ReportFetcher::new(client, raw_dir));
    fetch_dates(fetcher, config.dates(), config.workers).await
}

/// Run `fetcher` over `dates` with at most `workers` dates in flight.
///
/// Completion order is arbitrary. The first error aborts every outstanding
/// date and is returned.
pub async fn fetch_dates(
    fetcher: Arc<ReportFetcher>,
    dates: Vec<NaiveDate>,
    workers: usize,
) -> Result<FetchSummary> {
    let start = Instant::now();
    let total = dates.len();
    let sem = Arc::new(Semaphore::new(workers.max(1)));
    let mut tasks = JoinSet::new();

    info!(dates = total, workers, "fetching hail reports");
    for date in dates {
        let fetcher = Arc::clone(&fetcher);
        let sem = Arc::clone(&sem);
        tasks.spawn(async move {
            let _permit = sem.acquire_owned().await.context("worker pool closed")?;
            fetcher.fetch(date).await
        });
    }

    let mut summary = FetchSummary::default();
    while let Some(joined) = tasks.join_next().await {
        // returning early drops `tasks`, which aborts the rest
        let outcome = joined.context("fetch worker panicked")??;
        summary.record(outcome);
    }

    info!(
        written = summary.written,
        skipped_existing = summary.skipped_existing,
        skipped_empty = summary.skipped_empty,
        elapsed = ?start.elapsed(),
        "fetch finished"
    );
    Ok(summary)
}
