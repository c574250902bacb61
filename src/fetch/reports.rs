// src/fetch/reports.rs

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tokio::fs;
use tracing::{debug, info, instrument, warn};

use crate::artifact::{artifact_name, csv_source_name, html_source_name, RAW_HEADER};
use crate::fetch::client::TransportClient;
use crate::fetch::scrape::{scrape, RawReportRow};

/// What `ReportFetcher::fetch` did for one date.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FetchOutcome {
    /// An artifact now exists for the date, downloaded or scraped.
    Written,
    /// The artifact was already on disk; no request was made.
    SkippedExisting,
    /// Neither source had any reports. Nothing is written, so the date is
    /// tried again on the next run.
    SkippedEmpty,
}

/// Fetches one raw artifact per date into `raw_dir`.
pub struct ReportFetcher {
    client: TransportClient,
    raw_dir: PathBuf,
}

impl ReportFetcher {
    pub fn new(client: TransportClient, raw_dir: impl Into<PathBuf>) -> Self {
        Self {
            client,
            raw_dir: raw_dir.into(),
        }
    }

    pub fn artifact_path(&self, date: NaiveDate) -> PathBuf {
        self.raw_dir.join(artifact_name(date))
    }

    /// Make sure the artifact for `date` exists, preferring the published CSV
    /// and falling back to scraping the HTML report page.
    ///
    /// Transport failures never escape: they either trigger the fallback or
    /// count as "no data". Scrape and local I/O errors do.
    #[instrument(level = "info", skip(self))]
    pub async fn fetch(&self, date: NaiveDate) -> Result<FetchOutcome> {
        let dest = self.artifact_path(date);
        if fs::try_exists(&dest)
            .await
            .with_context(|| format!("checking for {}", dest.display()))?
        {
            debug!(path = %dest.display(), "artifact exists, skipping");
            return Ok(FetchOutcome::SkippedExisting);
        }

        // 1) published CSV
        match self.client.get_bytes(&csv_source_name(date)).await {
            Ok(body) => {
                write_artifact(&dest, &body).await?;
                info!(%date, "downloaded hail reports");
                return Ok(FetchOutcome::Written);
            }
            Err(e) => warn!(%date, error = %e, "CSV unavailable, falling back to report page"),
        }

        // 2) HTML report page
        let page = html_source_name(date);
        let html = match self.client.get_text(&page).await {
            Ok(html) => html,
            Err(e) => {
                warn!(%date, error = %e, "report page unavailable, treating as no reports");
                return Ok(FetchOutcome::SkippedEmpty);
            }
        };
        let rows = scrape(&html).with_context(|| format!("scraping {} for {}", page, date))?;
        info!(%date, count = rows.len(), url = %page, "scraped reports");

        if rows.is_empty() {
            return Ok(FetchOutcome::SkippedEmpty);
        }
        let body = encode_rows(&rows)?;
        write_artifact(&dest, &body).await?;
        Ok(FetchOutcome::Written)
    }
}

/// Serialize scraped rows as a raw artifact: header plus one line per report.
pub fn encode_rows(rows: &[RawReportRow]) -> Result<Vec<u8>> {
    let mut wtr = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(Vec::new());
    wtr.write_record(RAW_HEADER)
        .context("writing raw artifact header")?;
    for row in rows {
        wtr.serialize(row).context("writing scraped row")?;
    }
    wtr.into_inner()
        .map_err(|e| anyhow!("flushing scraped rows: {}", e.error()))
}

/// Write to a sibling `.part` file and rename it into place, so an aborted
/// run cannot leave a truncated artifact behind that later counts as cached.
async fn write_artifact(dest: &Path, body: &[u8]) -> Result<()> {
    let tmp = dest.with_extension("csv.part");
    fs::write(&tmp, body)
        .await
        .with_context(|| format!("writing {}", tmp.display()))?;
    fs::rename(&tmp, dest)
        .await
        .with_context(|| format!("moving {} into place", dest.display()))?;
    Ok(())
}
