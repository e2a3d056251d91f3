//! Shared vocabulary for the retrieval chunking pipeline.
//!
//! Provides the product identity type used to key every file the
//! pipeline touches, and the UTC day/bucket/window time math shared by
//! the splitter and stitcher.

pub mod product;
pub mod time;

pub use product::{ProductId, ProductParseError};
pub use time::{
    compact_date, hour_of_code, Bucket, Window, YearDigits, BUCKETS_PER_DAY, BUCKET_HOURS,
    WINDOWS_PER_DAY, WINDOW_HOURS,
};
