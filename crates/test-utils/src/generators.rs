//! Test data generators for creating synthetic sounding data.
//!
//! These generators create predictable, verifiable data patterns that
//! can be used across the test suite.

use sounding_store::{SoundingSet, Values};

/// Creates a sounding set with the given time codes and a predictable
/// payload.
///
/// The payload mimics a column-CO2 retrieval: a per-sounding `xco2`
/// value of `400 + i` for sounding `i`, a per-sounding two-level
/// `avg_kernel` of `10 * i + level`, and a shared two-level `pressure`
/// axis. This makes it easy to verify that records were sliced and
/// concatenated together correctly by checking the values that ended
/// up in each output file.
///
/// # Example
///
/// ```
/// use test_utils::sounding_set;
///
/// let set = sounding_set(&[20000, 21500, 235959]);
/// assert_eq!(set.num_records(), 3);
/// assert_eq!(set.time_codes("time").unwrap(), &[20000, 21500, 235959]);
/// ```
pub fn sounding_set(time_codes: &[i64]) -> SoundingSet {
    sounding_set_named("nsound", "time", time_codes)
}

/// Like [`sounding_set`], with custom record-dimension and time-variable
/// names (some sources use e.g. `sounding_id`/`sounding_time`).
pub fn sounding_set_named(record_dim: &str, time_name: &str, time_codes: &[i64]) -> SoundingSet {
    let n = time_codes.len();
    let mut set = SoundingSet::new(record_dim);
    set.add_dim(record_dim, n);
    set.add_dim("nlev", 2);
    set.add_variable(
        time_name,
        vec![record_dim.to_string()],
        Values::I64(time_codes.to_vec()),
    )
    .expect("time variable");
    set.add_variable(
        "xco2",
        vec![record_dim.to_string()],
        Values::F64((0..n).map(|i| 400.0 + i as f64).collect()),
    )
    .expect("xco2 variable");
    set.add_variable(
        "avg_kernel",
        vec![record_dim.to_string(), "nlev".to_string()],
        Values::F64(
            (0..n)
                .flat_map(|i| [10.0 * i as f64, 10.0 * i as f64 + 1.0])
                .collect(),
        ),
    )
    .expect("avg_kernel variable");
    set.add_variable(
        "pressure",
        vec!["nlev".to_string()],
        Values::F64(vec![1000.0, 500.0]),
    )
    .expect("pressure variable");
    set
}

/// Extracts the `xco2` payload values of a set, for asserting which
/// soundings landed in a file.
pub fn xco2_values(set: &SoundingSet) -> Vec<f64> {
    match &set.variable("xco2").expect("xco2 variable").values {
        Values::F64(v) => v.clone(),
        other => panic!("xco2 should be F64, got {other:?}"),
    }
}
