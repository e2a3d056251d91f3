//! Chunk Driver: per-day orchestration and multi-day backfills.

use chrono::{Datelike, Duration, NaiveDate};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::time::SystemTime;
use tracing::{debug, info, instrument, warn};

use sounding_store::SoundingSet;

use crate::config::ChunkConfig;
use crate::error::{ChunkError, Result};
use crate::split::split_day;
use crate::stitch::Stitcher;
use crate::translate::Translator;

/// What one day's run did.
#[derive(Debug, Clone, Default)]
pub struct DayReport {
    /// Daily input actually translated, if any.
    pub input: Option<PathBuf>,
    /// True when translate/split ran but found no daily input.
    pub missing_input: bool,
    /// Fragment files produced by the splitter.
    pub fragments: Vec<PathBuf>,
    /// Chunk files written by the stitcher.
    pub chunks: Vec<PathBuf>,
}

/// End-of-run accounting for a backfill.
#[derive(Debug, Default)]
pub struct BackfillSummary {
    pub days_ok: usize,
    pub days_missing_input: Vec<NaiveDate>,
    pub failures: Vec<(NaiveDate, String)>,
}

impl BackfillSummary {
    pub fn clean(&self) -> bool {
        self.days_missing_input.is_empty() && self.failures.is_empty()
    }

    /// One warning per problem day, one closing line.
    pub fn log(&self) {
        for date in &self.days_missing_input {
            warn!(%date, "no daily input was found");
        }
        for (date, reason) in &self.failures {
            warn!(%date, %reason, "day failed");
        }
        info!(
            ok = self.days_ok,
            missing = self.days_missing_input.len(),
            failed = self.failures.len(),
            "backfill finished"
        );
    }
}

/// Orchestrates translate, split, and stitch for one product.
///
/// Days must be processed in strictly increasing order, one day
/// completed before the next begins: each day's first window consumes
/// the leftover bucket-21 fragment of the day before, so two days of
/// the same output tree must never run concurrently. Separate products
/// never share fragment files and may run in parallel freely.
pub struct ChunkDriver {
    cfg: ChunkConfig,
    translator: Arc<dyn Translator>,
    stitcher: Stitcher,
}

impl ChunkDriver {
    pub fn new(cfg: ChunkConfig, translator: Arc<dyn Translator>) -> Self {
        Self {
            cfg,
            translator,
            stitcher: Stitcher::new(),
        }
    }

    pub fn config(&self) -> &ChunkConfig {
        &self.cfg
    }

    /// Process one calendar day: locate the newest daily input,
    /// translate and split it (skipped when chunk outputs for the day
    /// already exist and reprocessing is off), then stitch.
    ///
    /// Stitching runs even on the skip path: this day's first window
    /// may still be waiting on the previous day's leftover fragment.
    #[instrument(skip(self), fields(product = %self.cfg.product, date = %date))]
    pub async fn run_day(&mut self, date: NaiveDate) -> Result<DayReport> {
        let mut report = DayReport::default();

        let outputs_exist = !self
            .matching_files(&self.cfg.chunk_year_dir(date.year()), &self.cfg.chunk_prefix(date))
            .await?
            .is_empty();

        if outputs_exist && !self.cfg.reprocess {
            debug!("chunks already exist, skipping translate and split");
        } else {
            match self.newest_input(date).await? {
                Some(input) => {
                    info!(file = %input.display(), "processing daily input");
                    tokio::fs::create_dir_all(&self.cfg.chunk_dir).await?;

                    let translated = self.cfg.translated_path(date);
                    self.translator
                        .translate(&input, &translated)
                        .await
                        .map_err(|e| ChunkError::Translation {
                            path: input.clone(),
                            source: e,
                        })?;
                    stamp_input_file(&translated, &input).await?;

                    report.fragments = split_day(&self.cfg, &translated, date).await?;
                    report.input = Some(input);
                }
                None => {
                    warn!("no daily input file for date");
                    report.missing_input = true;
                }
            }
        }

        report.chunks = self.stitcher.stitch_day(&self.cfg, date).await?;
        Ok(report)
    }

    /// Run a backfill over an inclusive date range, strictly in order.
    /// A bad day is logged and skipped; nothing propagates out of the
    /// backfill.
    pub async fn run_range(&mut self, beg: NaiveDate, end: NaiveDate) -> BackfillSummary {
        let mut summary = BackfillSummary::default();
        let mut date = beg;
        while date <= end {
            match self.run_day(date).await {
                Ok(report) if report.missing_input => {
                    summary.days_missing_input.push(date);
                }
                Ok(_) => summary.days_ok += 1,
                Err(e) => {
                    warn!(%date, error = %e, "day failed, continuing backfill");
                    summary.failures.push((date, e.to_string()));
                }
            }
            date += Duration::days(1);
        }
        summary
    }

    /// Newest (by mtime) daily input matching the date prefix; multiple
    /// matches mean reprocessed vendor versions.
    async fn newest_input(&self, date: NaiveDate) -> Result<Option<PathBuf>> {
        let candidates = self
            .matching_files(&self.cfg.daily_year_dir(date), &self.cfg.input_prefix(date))
            .await?;
        let mut newest: Option<(SystemTime, PathBuf)> = None;
        for path in candidates {
            let modified = tokio::fs::metadata(&path).await?.modified()?;
            if newest.as_ref().map_or(true, |(t, _)| *t < modified) {
                newest = Some((modified, path));
            }
        }
        Ok(newest.map(|(_, path)| path))
    }

    /// Files in `dir` whose name starts with `prefix` and ends with the
    /// configured suffix. A missing directory is an empty match, not an
    /// error.
    async fn matching_files(&self, dir: &Path, prefix: &str) -> Result<Vec<PathBuf>> {
        let mut matches = Vec::new();
        let mut entries = match tokio::fs::read_dir(dir).await {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(matches),
            Err(e) => return Err(e.into()),
        };
        while let Some(entry) = entries.next_entry().await? {
            let name = entry.file_name();
            let name = name.to_string_lossy();
            if name.starts_with(prefix) && name.ends_with(self.cfg.suffix.as_str()) {
                matches.push(entry.path());
            }
        }
        Ok(matches)
    }
}

/// Record the vendor filename on the translated file so it flows into
/// chunk provenance.
async fn stamp_input_file(translated: &Path, input: &Path) -> Result<()> {
    let mut set = SoundingSet::from_slice(&tokio::fs::read(translated).await?)?;
    let basename = input
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    set.set_attr("input_files", basename);
    tokio::fs::write(translated, set.to_bytes()?).await?;
    Ok(())
}
