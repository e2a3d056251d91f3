//! Product identity for retrieval data streams.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// Identifies one retrieval data stream: source archive, trace-gas
/// variable, satellite, and product version.
///
/// Rendered as `source_variable_satellite_version`,
/// e.g. `tropomi_ch4_s5p_v2`.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ProductId {
    pub source: String,
    pub variable: String,
    pub satellite: String,
    pub version: String,
}

impl ProductId {
    pub fn new(
        source: impl Into<String>,
        variable: impl Into<String>,
        satellite: impl Into<String>,
        version: impl Into<String>,
    ) -> Self {
        Self {
            source: source.into(),
            variable: variable.into(),
            satellite: satellite.into(),
            version: version.into(),
        }
    }

    /// Filename head shared by daily, fragment, and chunk files,
    /// e.g. `tropomi_ch4_s5p_v2.`.
    pub fn file_head(&self) -> String {
        format!(
            "{}_{}_{}_{}.",
            self.source, self.variable, self.satellite, self.version
        )
    }
}

impl fmt::Display for ProductId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}_{}_{}_{}",
            self.source, self.variable, self.satellite, self.version
        )
    }
}

#[derive(Debug, Error)]
pub enum ProductParseError {
    #[error("product name needs four fields (source_variable_satellite_version): {0}")]
    MissingFields(String),

    #[error("empty field in product name: {0}")]
    EmptyField(String),
}

impl FromStr for ProductId {
    type Err = ProductParseError;

    /// Parse `source_variable_satellite_version`. The version keeps any
    /// further underscores (`tropess_co_airs_fs_v1` is valid).
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parts: Vec<&str> = s.splitn(4, '_').collect();
        if parts.len() != 4 {
            return Err(ProductParseError::MissingFields(s.to_string()));
        }
        if parts.iter().any(|p| p.is_empty()) {
            return Err(ProductParseError::EmptyField(s.to_string()));
        }
        Ok(ProductId::new(parts[0], parts[1], parts[2], parts[3]))
    }
}
