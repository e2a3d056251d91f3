//! Error types for the chunking crate.

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while chunking a day.
#[derive(Error, Debug)]
pub enum ChunkError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Store(#[from] sounding_store::StoreError),

    #[error("Translation failed for {path}: {source}")]
    Translation {
        path: PathBuf,
        #[source]
        source: anyhow::Error,
    },

    #[error("Time codes out of order in {path} at record {index}")]
    UnsortedTime { path: PathBuf, index: usize },
}

/// Result type for chunking operations.
pub type Result<T> = std::result::Result<T, ChunkError>;
