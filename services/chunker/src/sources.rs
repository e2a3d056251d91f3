//! Per-source overrides for the chunker service.
//!
//! Most products work with the derived defaults; legacy archives need
//! their own filename heads, time-variable names, or 2-digit years.

use anyhow::{Context, Result};
use serde::Deserialize;
use std::collections::HashMap;
use std::path::Path;

use chunking::ChunkConfig;
use obs_common::YearDigits;

/// Overrides keyed by source name, loaded from a YAML file:
///
/// ```yaml
/// acos:
///   input_head: oco2_LtCO2_
///   year_digits: two
///   time_name: sounding_time
///   record_dim: sounding_id
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(transparent)]
pub struct SourceOverrides {
    sources: HashMap<String, SourceConfig>,
}

/// Overrides for one source. Unset fields keep the derived defaults.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct SourceConfig {
    pub input_head: Option<String>,
    pub output_head: Option<String>,
    pub suffix: Option<String>,
    pub year_digits: Option<YearDigits>,
    pub time_name: Option<String>,
    pub record_dim: Option<String>,
    pub time_divisor: Option<i64>,
    /// Registry name of the translator to use; defaults to the source
    /// name when registered, otherwise `default`.
    pub translator: Option<String>,
}

impl SourceOverrides {
    pub fn load(path: &Path) -> Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("reading source overrides from {}", path.display()))?;
        Ok(serde_yaml::from_str(&text)?)
    }

    pub fn get(&self, source: &str) -> SourceConfig {
        self.sources.get(source).cloned().unwrap_or_default()
    }
}

/// Fold one source's overrides into a chunk configuration.
pub fn apply(cfg: &mut ChunkConfig, src: &SourceConfig) {
    if src.input_head.is_some() {
        cfg.input_head = src.input_head.clone();
    }
    if src.output_head.is_some() {
        cfg.output_head = src.output_head.clone();
    }
    if let Some(suffix) = &src.suffix {
        cfg.suffix = suffix.clone();
    }
    if let Some(digits) = src.year_digits {
        cfg.year_digits = digits;
    }
    if let Some(time_name) = &src.time_name {
        cfg.time_name = time_name.clone();
    }
    if let Some(record_dim) = &src.record_dim {
        cfg.record_dim = record_dim.clone();
    }
    if let Some(divisor) = src.time_divisor {
        cfg.time_divisor = divisor;
    }
}
