//! Window Stitcher: paste 3-hour fragments into 6-hour assimilation
//! chunks.

use chrono::{NaiveDate, Utc};
use std::path::{Path, PathBuf};
use tracing::{debug, info};
use walkdir::WalkDir;

use obs_common::Window;
use sounding_store::{SoundingSet, Values};

use crate::config::ChunkConfig;
use crate::error::Result;

const DEFAULT_CONTACT: &str = "retrieval-chunks pipeline <data@yourorg.example>";

/// Pastes fragments into finished chunks, carrying the running global
/// sounding index across calls.
///
/// The counter is persisted implicitly: it lives in the record
/// coordinate values already written into prior chunk files, and a
/// fresh stitcher recovers it by scanning the chunk tree once.
pub struct Stitcher {
    next_index: Option<i64>,
}

impl Stitcher {
    pub fn new() -> Self {
        Self { next_index: None }
    }

    /// Stitch the four windows overlapping `date`. The first window is
    /// centered on `date` 00z, so its left fragment is bucket 21 of the
    /// previous day, possibly left over from that day's run.
    ///
    /// Per window: no fragments means no chunk (not an error); a single
    /// fragment still makes a chunk; an existing destination without
    /// `reprocess` skips the window and leaves its fragments in place.
    /// Deletion is gated on an actual write, so data that never made it
    /// into a chunk survives for a later reprocess run.
    pub async fn stitch_day(&mut self, cfg: &ChunkConfig, date: NaiveDate) -> Result<Vec<PathBuf>> {
        let mut written = Vec::new();
        for window in Window::for_day(date) {
            let candidates = [
                cfg.fragment_path(&window.left_bucket()),
                cfg.fragment_path(&window.right_bucket()),
            ];
            let mut fragments = Vec::new();
            for path in candidates {
                if tokio::fs::try_exists(&path).await? {
                    fragments.push(path);
                }
            }
            if fragments.is_empty() {
                continue;
            }

            let dest = cfg.chunk_path(&window);
            if !cfg.reprocess && tokio::fs::try_exists(&dest).await? {
                debug!(
                    file = %dest.display(),
                    "chunk exists, leaving fragments for a reprocess run"
                );
                continue;
            }

            self.write_chunk(cfg, &fragments, &dest).await?;
            for path in &fragments {
                tokio::fs::remove_file(path).await?;
            }
            written.push(dest);
        }
        Ok(written)
    }

    /// Concatenate `fragments` (already in chronological order) into
    /// `dest`, assigning global sounding indices and merging
    /// provenance attributes.
    async fn write_chunk(
        &mut self,
        cfg: &ChunkConfig,
        fragments: &[PathBuf],
        dest: &Path,
    ) -> Result<()> {
        let mut inputs: Vec<String> = Vec::new();
        let mut contacts: Vec<String> = Vec::new();

        let mut parts = fragments.iter();
        let Some(first) = parts.next() else {
            return Ok(());
        };
        let mut merged = SoundingSet::from_slice(&tokio::fs::read(first).await?)?;
        accumulate_list(&mut inputs, merged.get_attr("input_files"));
        note(&mut contacts, merged.get_attr("contact"));
        for path in parts {
            let set = SoundingSet::from_slice(&tokio::fs::read(path).await?)?;
            accumulate_list(&mut inputs, set.get_attr("input_files"));
            note(&mut contacts, set.get_attr("contact"));
            merged.append_records(&set)?;
        }

        // A prior version of this chunk contributes provenance, not data.
        if tokio::fs::try_exists(dest).await? {
            let prior = SoundingSet::from_slice(&tokio::fs::read(dest).await?)?;
            accumulate_list(&mut inputs, prior.get_attr("input_files"));
            note(&mut contacts, prior.get_attr("contact"));
        }

        // Consecutive global indices become the record coordinate.
        let count = merged.num_records();
        let start = self.counter(cfg).await?;
        let record_dim = merged.record_dim.clone();
        merged.add_variable(
            record_dim.clone(),
            vec![record_dim],
            Values::I64((start..start + count as i64).collect()),
        )?;
        self.next_index = Some(start + count as i64);

        merged.set_attr("input_files", inputs.join(", "));
        merged.set_attr("history", format!("Created on {}", Utc::now().to_rfc3339()));
        let stamp = cfg
            .contact
            .clone()
            .unwrap_or_else(|| DEFAULT_CONTACT.to_string());
        let mut contact = stamp.clone();
        for prior in contacts.iter().filter(|c| **c != stamp) {
            contact.push_str(" / ");
            contact.push_str(prior);
        }
        merged.set_attr("contact", contact);

        if let Some(dir) = dest.parent() {
            tokio::fs::create_dir_all(dir).await?;
        }
        tokio::fs::write(dest, merged.to_bytes()?).await?;
        info!(file = %dest.display(), records = count, "wrote chunk");
        Ok(())
    }

    /// Next free global index, recovering it from disk on first use.
    /// The tree scan is synchronous walkdir I/O, so it runs on the
    /// blocking pool.
    async fn counter(&mut self, cfg: &ChunkConfig) -> Result<i64> {
        if let Some(next) = self.next_index {
            return Ok(next);
        }
        let scan_cfg = cfg.clone();
        let next = tokio::task::spawn_blocking(move || recover_counter(&scan_cfg))
            .await
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::Other, e))??;
        debug!(next, "recovered global sounding counter");
        self.next_index = Some(next);
        Ok(next)
    }
}

impl Default for Stitcher {
    fn default() -> Self {
        Self::new()
    }
}

/// Scan the product's chunk tree for the highest record index already
/// assigned; the counter resumes after it. Chunk files are the ones
/// ending in the bare suffix (fragments carry `.bit`, translated days
/// `.trans`).
fn recover_counter(cfg: &ChunkConfig) -> Result<i64> {
    let head = cfg.output_head();
    let mut next = 0i64;
    for entry in WalkDir::new(&cfg.chunk_dir)
        .into_iter()
        .filter_map(|e| e.ok())
    {
        if !entry.file_type().is_file() {
            continue;
        }
        let name = entry.file_name().to_string_lossy();
        if !name.starts_with(head.as_str()) || !name.ends_with(cfg.suffix.as_str()) {
            continue;
        }
        let set = SoundingSet::open(entry.path())?;
        if let Some(var) = set.variables.get(&set.record_dim) {
            if let Values::I64(indices) = &var.values {
                if let Some(max) = indices.iter().max() {
                    next = next.max(max + 1);
                }
            }
        }
    }
    Ok(next)
}

/// Merge a comma-joined attribute value into `list`, deduplicated,
/// preserving first-seen order.
fn accumulate_list(list: &mut Vec<String>, attr: Option<&str>) {
    let Some(attr) = attr else { return };
    for item in attr.split(',').map(str::trim) {
        if !item.is_empty() && !list.iter().any(|x| x == item) {
            list.push(item.to_string());
        }
    }
}

/// Record a whole attribute value once.
fn note(list: &mut Vec<String>, attr: Option<&str>) {
    if let Some(value) = attr {
        if !list.iter().any(|x| x == value) {
            list.push(value.to_string());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accumulate_list_dedups_and_keeps_order() {
        let mut list = vec!["a.nc".to_string()];
        accumulate_list(&mut list, Some("b.nc, a.nc"));
        accumulate_list(&mut list, None);
        assert_eq!(list, ["a.nc", "b.nc"]);
    }

    #[test]
    fn test_note_keeps_whole_value() {
        let mut list = Vec::new();
        note(&mut list, Some("Jane Roe <jane@example.org>"));
        note(&mut list, Some("Jane Roe <jane@example.org>"));
        assert_eq!(list.len(), 1);
    }
}
