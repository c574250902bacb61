// src/process/mod.rs
use anyhow::{Context, Result};
use chrono::NaiveDate;
use csv::Writer;
use glob::{glob, Pattern};
use std::{
    fs::{self, File},
    path::{Path, PathBuf},
    time::Instant,
};
use tracing::{debug, info, warn};

use crate::artifact::artifact_date;
use crate::config::Config;

pub mod fields;
pub mod report;
pub mod utils;

pub use fields::{parse_line, RowError};
pub use report::{CanonicalReport, CANONICAL_HEADER};

/// Row counts for one normalization run.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeSummary {
    /// Artifacts read.
    pub files: usize,
    /// Canonical rows written.
    pub written: u64,
    /// Data lines rejected by parsing or validation.
    pub skipped: u64,
}

/// Rebuilds the canonical dataset from every raw artifact in `raw_dir`.
pub struct Normalizer {
    raw_dir: PathBuf,
    output_path: PathBuf,
}

impl Normalizer {
    pub fn new(config: &Config) -> Self {
        Self::with_paths(config.raw_dir(), config.output_path())
    }

    pub fn with_paths(raw_dir: impl Into<PathBuf>, output_path: impl Into<PathBuf>) -> Self {
        Self {
            raw_dir: raw_dir.into(),
            output_path: output_path.into(),
        }
    }

    /// Truncate the output, then append every valid row of every artifact.
    ///
    /// Bad lines are logged and counted, never fatal. Errors reading an
    /// artifact or writing the output are.
    #[tracing::instrument(level = "info", skip(self), fields(raw_dir = %self.raw_dir.display()))]
    pub fn run(&self) -> Result<NormalizeSummary> {
        let start = Instant::now();
        let file = File::create(&self.output_path)
            .with_context(|| format!("creating {}", self.output_path.display()))?;
        let mut out = csv::WriterBuilder::new()
            .has_headers(false)
            .from_writer(file);
        out.write_record(CANONICAL_HEADER)
            .context("writing canonical header")?;

        let pattern = format!(
            "{}/*.csv",
            Pattern::escape(&self.raw_dir.to_string_lossy())
        );
        let mut summary = NormalizeSummary::default();
        for entry in glob(&pattern).with_context(|| format!("bad glob {}", pattern))? {
            let path = entry.context("listing raw artifacts")?;
            let Some(date) = artifact_date(&path) else {
                warn!(path = %path.display(), "not a hail report artifact, ignoring");
                continue;
            };
            self.process_artifact(&path, date, &mut out, &mut summary)?;
            summary.files += 1;
        }

        out.flush()
            .with_context(|| format!("flushing {}", self.output_path.display()))?;
        info!(
            files = summary.files,
            written = summary.written,
            skipped = summary.skipped,
            elapsed = ?start.elapsed(),
            "preprocessing finished: successfully parsed {} rows, {} rows were skipped due to errors",
            summary.written,
            summary.skipped
        );
        Ok(summary)
    }

    fn process_artifact(
        &self,
        path: &Path,
        date: NaiveDate,
        out: &mut Writer<File>,
        summary: &mut NormalizeSummary,
    ) -> Result<()> {
        let data = fs::read(path).with_context(|| format!("reading {}", path.display()))?;
        debug!(path = %path.display(), %date, bytes = data.len(), "normalizing artifact");

        // line 1 is the header
        for (num, raw) in data.split(|b| *b == b'\n').enumerate().skip(1) {
            let line_no = num + 1;
            let line = String::from_utf8_lossy(raw);
            let content = line.trim();
            if content.is_empty() {
                continue;
            }

            match parse_line(date, content) {
                Ok(report) => {
                    out.serialize(&report).with_context(|| {
                        format!("writing row from {}:{}", path.display(), line_no)
                    })?;
                    summary.written += 1;
                }
                Err(e) => {
                    warn!(file = %path.display(), line = line_no, "{}. Skipping", e);
                    summary.skipped += 1;
                }
            }
        }
        Ok(())
    }
}

/// Normalize every artifact under `config.raw_dir()` into `config.output_path()`.
pub fn normalize(config: &Config) -> Result<NormalizeSummary> {
    Normalizer::new(config).run()
}
