//! Chunking engine for satellite retrieval soundings.
//!
//! Takes one day of irregularly timed soundings in the common
//! intermediate schema, splits it into eight fixed 3-hour fragments,
//! and pastes adjacent fragments into the 6-hour assimilation windows
//! the downstream assimilation system ingests. Windows are centered on
//! the synoptic hours, so each day's first window reaches back into the
//! previous day's last fragment; the driver therefore runs days in
//! strictly increasing order.
//!
//! Acquisition and per-source normalization live outside this crate:
//! the normalizer is injected through the [`Translator`] trait and
//! selected by name from a [`TranslatorRegistry`].

pub mod config;
pub mod driver;
pub mod error;
pub mod split;
pub mod stitch;
pub mod translate;

// Re-exports
pub use config::ChunkConfig;
pub use driver::{BackfillSummary, ChunkDriver, DayReport};
pub use error::{ChunkError, Result};
pub use split::split_day;
pub use stitch::Stitcher;
pub use translate::{CopyTranslator, Translator, TranslatorRegistry};
