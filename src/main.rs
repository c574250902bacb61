use anyhow::{bail, Result};
use chrono::{NaiveDate, Utc};
use clap::{Parser, ValueEnum};
use lsrscraper::{
    config::{default_end_date, Config},
    fetch_all, normalize,
};
use std::{env, path::PathBuf};
use tracing::info;
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Clone, Copy, Debug, ValueEnum)]
enum Operation {
    /// Fetch raw hail reports for every date in range
    Download,
    /// Rebuild the canonical dataset from the raw reports
    Preprocess,
}

#[derive(Parser)]
#[command(
    author,
    version,
    about = "Utilities for working with NOAA Storm Prediction Center local storm reports"
)]
struct Args {
    /// The operation to perform on data for the dates in range
    #[arg(value_enum)]
    operation: Operation,
    /// Working directory for data download and processing
    #[arg(default_value = "lsr_data")]
    work_dir: PathBuf,
    /// First date to operate on (beginning of data availability by default)
    #[arg(long, default_value = "1999-06-01")]
    start: NaiveDate,
    /// Last date to operate on. Defaults to yesterday (UTC).
    #[arg(long)]
    end: Option<NaiveDate>,
}

#[tokio::main]
async fn main() -> Result<()> {
    // ─── 1) init logging ─────────────────────────────────────────────
    let log_level = env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string());
    fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&log_level)),
        )
        .init();

    // ─── 2) resolve config ───────────────────────────────────────────
    let args = Args::parse();
    let end = args.end.unwrap_or_else(|| default_end_date(Utc::now()));
    let config = Config::new(&args.work_dir, args.start, end)?.apply_env()?;
    info!(
        operation = ?args.operation,
        work_dir = %config.work_dir.display(),
        start = %config.start,
        end = %config.end,
        "startup"
    );

    // ─── 3) run ──────────────────────────────────────────────────────
    match args.operation {
        Operation::Download => {
            let summary = fetch_all(&config).await?;
            info!(
                "{} dates written, {} already cached, {} without reports",
                summary.written, summary.skipped_existing, summary.skipped_empty
            );
        }
        Operation::Preprocess => {
            if !config.raw_dir().is_dir() {
                bail!("missing hail data: {} not found", config.raw_dir().display());
            }
            // normalization is synchronous file I/O
            tokio::task::spawn_blocking(move || normalize(&config)).await??;
        }
    }

    info!("all done");
    Ok(())
}
