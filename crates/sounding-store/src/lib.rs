//! Common intermediate schema for satellite sounding files.
//!
//! Every translator in the pipeline emits this format, and the chunker
//! consumes and produces it: an ordered sequence of soundings along a
//! named record dimension, with arbitrary payload variables dimensioned
//! identically across all records in a file, plus string global
//! attributes carrying provenance (`input_files`, `history`,
//! `contact`).
//!
//! Files are JSON on disk. The schema mirrors the array-file layout the
//! downstream assimilation system expects: named dimensions, variables
//! with dimension lists, global attributes.

mod dataset;
pub mod error;

pub use dataset::{SoundingSet, Values, Variable};
pub use error::{Result, StoreError};
