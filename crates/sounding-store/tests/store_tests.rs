//! Tests for the sounding file schema: slicing, concatenation, and
//! schema enforcement.

use sounding_store::{SoundingSet, StoreError, Values};

/// Three soundings with a two-level vertical axis.
fn sample_set() -> SoundingSet {
    let mut set = SoundingSet::new("nsound");
    set.add_dim("nsound", 3);
    set.add_dim("nlev", 2);
    set.add_variable(
        "time",
        vec!["nsound".to_string()],
        Values::I64(vec![20000, 21500, 235959]),
    )
    .unwrap();
    set.add_variable(
        "xco2",
        vec!["nsound".to_string()],
        Values::F64(vec![410.1, 411.2, 412.3]),
    )
    .unwrap();
    set.add_variable(
        "avg_kernel",
        vec!["nsound".to_string(), "nlev".to_string()],
        Values::F64(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]),
    )
    .unwrap();
    set.add_variable(
        "pressure",
        vec!["nlev".to_string()],
        Values::F64(vec![1000.0, 500.0]),
    )
    .unwrap();
    set.set_attr("input_files", "vendor_a.nc");
    set
}

#[test]
fn test_roundtrip_bytes() {
    let set = sample_set();
    let bytes = set.to_bytes().unwrap();
    let back = SoundingSet::from_slice(&bytes).unwrap();
    assert_eq!(set, back);
}

#[test]
fn test_save_and_open() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("day.json");
    let set = sample_set();
    set.save(&path).unwrap();
    assert_eq!(SoundingSet::open(&path).unwrap(), set);
}

#[test]
fn test_slice_records_slices_all_record_vars() {
    let set = sample_set();
    let cut = set.slice_records(1..3);

    assert_eq!(cut.num_records(), 2);
    assert_eq!(cut.time_codes("time").unwrap(), &[21500, 235959]);
    // 2-D record variable sliced by whole rows
    assert_eq!(
        cut.variable("avg_kernel").unwrap().values,
        Values::F64(vec![3.0, 4.0, 5.0, 6.0])
    );
    // non-record variable and attrs carried unchanged
    assert_eq!(
        cut.variable("pressure").unwrap().values,
        Values::F64(vec![1000.0, 500.0])
    );
    assert_eq!(cut.get_attr("input_files"), Some("vendor_a.nc"));
}

#[test]
fn test_slice_records_empty_range() {
    let cut = sample_set().slice_records(0..0);
    assert_eq!(cut.num_records(), 0);
    assert!(cut.variable("time").unwrap().values.is_empty());
}

#[test]
fn test_append_records_concatenates() {
    let mut left = sample_set().slice_records(0..2);
    let right = sample_set().slice_records(2..3);
    left.append_records(&right).unwrap();

    assert_eq!(left.num_records(), 3);
    assert_eq!(left.time_codes("time").unwrap(), &[20000, 21500, 235959]);
    assert_eq!(
        left.variable("avg_kernel").unwrap().values,
        Values::F64(vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0])
    );
}

#[test]
fn test_append_records_rejects_different_variables() {
    let mut left = sample_set();
    let mut right = sample_set();
    right.variables.remove("xco2");
    assert!(matches!(
        left.append_records(&right),
        Err(StoreError::SchemaMismatch(_))
    ));
}

#[test]
fn test_append_records_rejects_level_mismatch() {
    let mut left = sample_set();
    let mut right = SoundingSet::new("nsound");
    right.add_dim("nsound", 3);
    right.add_dim("nlev", 3);
    // same variable names, different vertical axis
    for (name, var) in &left.variables {
        if name == "avg_kernel" || name == "pressure" {
            continue;
        }
        right
            .add_variable(name.clone(), var.dims.clone(), var.values.clone())
            .unwrap();
    }
    right
        .add_variable(
            "avg_kernel",
            vec!["nsound".to_string(), "nlev".to_string()],
            Values::F64(vec![0.0; 9]),
        )
        .unwrap();
    right
        .add_variable(
            "pressure",
            vec!["nlev".to_string()],
            Values::F64(vec![1000.0, 700.0, 500.0]),
        )
        .unwrap();
    assert!(matches!(
        left.append_records(&right),
        Err(StoreError::SchemaMismatch(_))
    ));
}

#[test]
fn test_time_codes_requires_integer_record_var() {
    let set = sample_set();
    assert!(matches!(
        set.time_codes("missing"),
        Err(StoreError::MissingVariable(_))
    ));
    assert!(matches!(
        set.time_codes("xco2"),
        Err(StoreError::WrongType(_))
    ));
    assert!(matches!(
        set.time_codes("pressure"),
        Err(StoreError::NotRecordVar { .. })
    ));
}

#[test]
fn test_add_variable_checks_shape() {
    let mut set = SoundingSet::new("nsound");
    set.add_dim("nsound", 2);
    let err = set.add_variable("time", vec!["nsound".to_string()], Values::I64(vec![1]));
    assert!(matches!(err, Err(StoreError::ShapeMismatch { .. })));

    let err = set.add_variable("p", vec!["nlev".to_string()], Values::F64(vec![1.0]));
    assert!(matches!(err, Err(StoreError::MissingDim(_))));
}

#[test]
fn test_from_slice_validates_shapes() {
    let mut set = sample_set();
    // corrupt the declared record count behind the API's back
    set.dims.insert("nsound".to_string(), 5);
    let bytes = serde_json::to_vec(&set).unwrap();
    assert!(matches!(
        SoundingSet::from_slice(&bytes),
        Err(StoreError::ShapeMismatch { .. })
    ));
}
