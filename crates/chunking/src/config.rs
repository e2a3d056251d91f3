//! Chunking configuration.
//!
//! Everything the core needs from its caller, as explicit typed fields
//! threaded through the splitter and stitcher. An unset filename head
//! is `None`, never a wildcard sentinel embedded in a template string,
//! and there is no process-wide directory state.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use obs_common::{compact_date, Bucket, ProductId, Window, YearDigits};

fn default_suffix() -> String {
    ".json".to_string()
}

fn default_time_name() -> String {
    "time".to_string()
}

fn default_record_dim() -> String {
    "nsound".to_string()
}

fn default_time_divisor() -> i64 {
    // legacy HHMMSS codes: dividing by 10_000 yields the hour
    10_000
}

/// Configuration for chunking one retrieval product.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkConfig {
    pub product: ProductId,

    /// Root of the daily intermediate tree; inputs live in `Y{yyyy}`
    /// subdirectories.
    pub daily_dir: PathBuf,

    /// Root of the chunk tree: fragment staging at the top level,
    /// finished chunks under `Y{yyyy}`.
    pub chunk_dir: PathBuf,

    /// Filename head of daily inputs; `None` derives it from the
    /// product (vendor archives often use their own, e.g. ACOS lite).
    #[serde(default)]
    pub input_head: Option<String>,

    /// Filename head of fragment and chunk outputs; `None` derives it
    /// from the product.
    #[serde(default)]
    pub output_head: Option<String>,

    /// Filename suffix of inputs and outputs.
    #[serde(default = "default_suffix")]
    pub suffix: String,

    /// Year digits in daily input filenames.
    #[serde(default)]
    pub year_digits: YearDigits,

    /// Name of the per-sounding time variable.
    #[serde(default = "default_time_name")]
    pub time_name: String,

    /// Name of the sounding/record dimension.
    #[serde(default = "default_record_dim")]
    pub record_dim: String,

    /// Divisor mapping a time code onto hour-of-day.
    #[serde(default = "default_time_divisor")]
    pub time_divisor: i64,

    /// Overwrite outputs that already exist.
    #[serde(default)]
    pub reprocess: bool,

    /// Attribution stamped into chunk `contact` attributes.
    #[serde(default)]
    pub contact: Option<String>,
}

impl ChunkConfig {
    /// Standard tree layout under a data root:
    /// `<head>/<source>/<variable>/<satellite>_<version>_daily` with a
    /// sibling `..._chunks` tree.
    pub fn for_product(product: ProductId, head: impl AsRef<Path>) -> Self {
        let base = head.as_ref().join(&product.source).join(&product.variable);
        let daily_dir = base.join(format!("{}_{}_daily", product.satellite, product.version));
        let chunk_dir = base.join(format!("{}_{}_chunks", product.satellite, product.version));
        Self {
            product,
            daily_dir,
            chunk_dir,
            input_head: None,
            output_head: None,
            suffix: default_suffix(),
            year_digits: YearDigits::default(),
            time_name: default_time_name(),
            record_dim: default_record_dim(),
            time_divisor: default_time_divisor(),
            reprocess: false,
            contact: None,
        }
    }

    pub fn input_head(&self) -> String {
        self.input_head
            .clone()
            .unwrap_or_else(|| self.product.file_head())
    }

    pub fn output_head(&self) -> String {
        self.output_head
            .clone()
            .unwrap_or_else(|| self.product.file_head())
    }

    /// Per-year directory of daily inputs.
    pub fn daily_year_dir(&self, date: NaiveDate) -> PathBuf {
        self.daily_dir.join(format!("Y{}", date.year()))
    }

    /// Per-year directory of finished chunks.
    pub fn chunk_year_dir(&self, year: i32) -> PathBuf {
        self.chunk_dir.join(format!("Y{year}"))
    }

    /// Prefix matched against daily input filenames for `date`.
    pub fn input_prefix(&self, date: NaiveDate) -> String {
        format!(
            "{}{}",
            self.input_head(),
            compact_date(date, self.year_digits)
        )
    }

    /// Prefix matched against finished chunk filenames for `date`.
    pub fn chunk_prefix(&self, date: NaiveDate) -> String {
        format!(
            "{}{}",
            self.output_head(),
            compact_date(date, YearDigits::Four)
        )
    }

    /// Normalized whole-day file, consumed destructively by the
    /// splitter.
    pub fn translated_path(&self, date: NaiveDate) -> PathBuf {
        self.chunk_dir.join(format!(
            "{}{}{}.trans",
            self.output_head(),
            compact_date(date, YearDigits::Four),
            self.suffix
        ))
    }

    /// 3-hour fragment staging file.
    pub fn fragment_path(&self, bucket: &Bucket) -> PathBuf {
        self.chunk_dir.join(format!(
            "{}{}{}.bit",
            self.output_head(),
            bucket.label(),
            self.suffix
        ))
    }

    /// Finished 6-hour chunk file, filed under the label's year.
    pub fn chunk_path(&self, window: &Window) -> PathBuf {
        self.chunk_year_dir(window.year()).join(format!(
            "{}{}{}",
            self.output_head(),
            window.label(),
            self.suffix
        ))
    }
}
