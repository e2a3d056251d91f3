//! UTC day partitioning for assimilation chunking.
//!
//! A UTC day splits into eight 3-hour buckets. Four 6-hour assimilation
//! windows overlap each day, centered on the synoptic hours 00, 06, 12,
//! and 18. A window spans `[center-3h, center+3h)`, so the 00 window of
//! a day reaches back into bucket 21 of the previous day.

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Serialize};

/// Width of a splitter bucket in hours.
pub const BUCKET_HOURS: i64 = 3;
/// Width of an assimilation window in hours.
pub const WINDOW_HOURS: i64 = 6;
pub const BUCKETS_PER_DAY: usize = 8;
pub const WINDOWS_PER_DAY: usize = 4;

/// Number of digits used for the year in archive filenames.
///
/// Some legacy archives (e.g. ACOS lite files) use 2-digit years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum YearDigits {
    Two,
    #[default]
    Four,
}

/// Compact date as used in archive filenames: `20220524` or `220524`.
pub fn compact_date(date: NaiveDate, digits: YearDigits) -> String {
    match digits {
        YearDigits::Four => date.format("%Y%m%d").to_string(),
        YearDigits::Two => date.format("%y%m%d").to_string(),
    }
}

/// Derive the hour-of-day from a scalar time code.
///
/// The legacy encoding packs HHMMSS into one integer, so dividing by
/// 10_000 yields the hour; any encoding where division by a fixed
/// constant maps monotonically onto hour-of-day works the same way.
pub fn hour_of_code(code: i64, divisor: i64) -> i64 {
    code.div_euclid(divisor)
}

/// One of the eight 3-hour buckets of a UTC day.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Bucket {
    /// Bucket start, aligned to a multiple of three hours UTC.
    pub start: NaiveDateTime,
}

impl Bucket {
    /// The bucket starting at hour `3 * index` of `date`.
    pub fn new(date: NaiveDate, index: usize) -> Self {
        debug_assert!(index < BUCKETS_PER_DAY);
        let hour = (index as i64 * BUCKET_HOURS) as u32;
        Self {
            start: date.and_hms_opt(hour, 0, 0).expect("valid bucket hour"),
        }
    }

    /// All eight buckets of a day, in time order.
    pub fn for_day(date: NaiveDate) -> [Bucket; BUCKETS_PER_DAY] {
        std::array::from_fn(|k| Bucket::new(date, k))
    }

    pub fn start_hour(&self) -> u32 {
        self.start.hour()
    }

    /// Filename label, e.g. `20220524_21z`.
    pub fn label(&self) -> String {
        self.start.format("%Y%m%d_%Hz").to_string()
    }
}

/// One of the four 6-hour assimilation windows overlapping a UTC day,
/// identified by its central synoptic hour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Window {
    /// Window center (00, 06, 12 or 18 UTC); the window spans
    /// `[center-3h, center+3h)`.
    pub center: NaiveDateTime,
}

impl Window {
    /// The four windows of `date`, in time order. The first is centered
    /// on `date` 00z and starts at 21z of the previous day.
    pub fn for_day(date: NaiveDate) -> [Window; WINDOWS_PER_DAY] {
        std::array::from_fn(|n| Window {
            center: date
                .and_hms_opt(n as u32 * WINDOW_HOURS as u32, 0, 0)
                .expect("valid window hour"),
        })
    }

    /// Fragment covering `[center-3h, center)`.
    pub fn left_bucket(&self) -> Bucket {
        Bucket {
            start: self.center - Duration::hours(BUCKET_HOURS),
        }
    }

    /// Fragment covering `[center, center+3h)`.
    pub fn right_bucket(&self) -> Bucket {
        Bucket { start: self.center }
    }

    /// Chunk filename label, e.g. `20220524_00z`.
    pub fn label(&self) -> String {
        self.center.format("%Y%m%d_%Hz").to_string()
    }

    /// Year the output chunk files under (the label's year).
    pub fn year(&self) -> i32 {
        self.center.year()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2022, 5, 24).unwrap()
    }

    #[test]
    fn test_bucket_labels() {
        let buckets = Bucket::for_day(day());
        assert_eq!(buckets[0].label(), "20220524_00z");
        assert_eq!(buckets[7].label(), "20220524_21z");
        assert_eq!(buckets[7].start_hour(), 21);
    }

    #[test]
    fn test_window_centers() {
        let windows = Window::for_day(day());
        let labels: Vec<String> = windows.iter().map(|w| w.label()).collect();
        assert_eq!(
            labels,
            ["20220524_00z", "20220524_06z", "20220524_12z", "20220524_18z"]
        );
    }

    #[test]
    fn test_first_window_reaches_previous_day() {
        let w = Window::for_day(day())[0];
        assert_eq!(w.left_bucket().label(), "20220523_21z");
        assert_eq!(w.right_bucket().label(), "20220524_00z");
    }

    #[test]
    fn test_window_buckets_are_adjacent() {
        for w in Window::for_day(day()) {
            let gap = w.right_bucket().start - w.left_bucket().start;
            assert_eq!(gap, Duration::hours(BUCKET_HOURS));
        }
    }

    #[test]
    fn test_compact_date_digits() {
        assert_eq!(compact_date(day(), YearDigits::Four), "20220524");
        assert_eq!(compact_date(day(), YearDigits::Two), "220524");
    }

    #[test]
    fn test_hour_of_code_hhmmss() {
        assert_eq!(hour_of_code(235959, 10_000), 23);
        assert_eq!(hour_of_code(20000, 10_000), 2);
        assert_eq!(hour_of_code(0, 10_000), 0);
    }
}
