//! Interval Splitter: partition one day of soundings into 3-hour
//! fragment files.

use chrono::NaiveDate;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

use obs_common::{hour_of_code, Bucket, BUCKETS_PER_DAY, BUCKET_HOURS};
use sounding_store::SoundingSet;

use crate::config::ChunkConfig;
use crate::error::{ChunkError, Result};

/// Split a whole-day file into per-bucket fragment files, returning the
/// paths written.
///
/// Records must arrive sorted by non-decreasing time code; the splitter
/// walks a single forward pointer over the eight buckets, so each
/// bucket is a contiguous record range and the whole pass is linear.
/// Bucket `k` takes derived hours `[3k, 3k+3)`; the last bucket absorbs
/// whatever remains, so malformed trailing codes are never dropped. An
/// empty bucket produces no file, and an empty day produces no files at
/// all.
///
/// The input file is deleted on success (deliberate space reclamation;
/// callers needing the original must copy it first).
pub async fn split_day(cfg: &ChunkConfig, input: &Path, date: NaiveDate) -> Result<Vec<PathBuf>> {
    info!(file = %input.display(), "splitting day into 3-hour fragments");

    let set = SoundingSet::from_slice(&tokio::fs::read(input).await?)?;
    if set.record_dim != cfg.record_dim {
        return Err(sounding_store::StoreError::SchemaMismatch(format!(
            "record dimension {} (expected {})",
            set.record_dim, cfg.record_dim
        ))
        .into());
    }
    let times = set.time_codes(&cfg.time_name)?;
    if let Some(at) = times.windows(2).position(|w| w[1] < w[0]) {
        return Err(ChunkError::UnsortedTime {
            path: input.to_path_buf(),
            index: at + 1,
        });
    }

    let hours: Vec<i64> = times
        .iter()
        .map(|&t| hour_of_code(t, cfg.time_divisor))
        .collect();
    let nrec = hours.len();

    let mut written = Vec::new();
    let mut next = 0usize;
    for (k, bucket) in Bucket::for_day(date).iter().enumerate() {
        let end = if k + 1 == BUCKETS_PER_DAY {
            // last bucket takes whatever's left
            nrec
        } else {
            let bound = (k as i64 + 1) * BUCKET_HOURS;
            let mut end = next;
            while end < nrec && hours[end] < bound {
                end += 1;
            }
            end
        };

        if next < end {
            let fragment = set.slice_records(next..end);
            let path = cfg.fragment_path(bucket);
            tokio::fs::write(&path, fragment.to_bytes()?).await?;
            debug!(file = %path.display(), records = end - next, "wrote fragment");
            written.push(path);
        }
        next = end;
    }

    tokio::fs::remove_file(input).await?;
    Ok(written)
}
