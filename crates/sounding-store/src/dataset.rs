//! In-memory representation of one sounding file.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::ops::Range;
use std::path::Path;

use crate::error::{Result, StoreError};

/// Typed variable payload, stored flat in row-major order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "dtype", content = "data", rename_all = "lowercase")]
pub enum Values {
    I64(Vec<i64>),
    F64(Vec<f64>),
}

impl Values {
    pub fn len(&self) -> usize {
        match self {
            Values::I64(v) => v.len(),
            Values::F64(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn slice(&self, range: Range<usize>) -> Values {
        match self {
            Values::I64(v) => Values::I64(v[range].to_vec()),
            Values::F64(v) => Values::F64(v[range].to_vec()),
        }
    }

    /// Append `other`, returning false on a type mismatch.
    fn extend_from(&mut self, other: &Values) -> bool {
        match (self, other) {
            (Values::I64(a), Values::I64(b)) => {
                a.extend_from_slice(b);
                true
            }
            (Values::F64(a), Values::F64(b)) => {
                a.extend_from_slice(b);
                true
            }
            _ => false,
        }
    }
}

/// One named variable. A variable is per-sounding iff its first
/// dimension is the file's record dimension.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Variable {
    pub dims: Vec<String>,
    pub values: Values,
}

/// One sounding file: named dimensions, variables, global attributes.
///
/// Soundings within a file are ordered along `record_dim`; all
/// per-sounding variables are sliced and concatenated identically.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoundingSet {
    pub record_dim: String,
    pub dims: BTreeMap<String, usize>,
    pub variables: BTreeMap<String, Variable>,
    pub attrs: BTreeMap<String, String>,
}

impl SoundingSet {
    /// Empty file with the given record dimension (size 0).
    pub fn new(record_dim: impl Into<String>) -> Self {
        let record_dim = record_dim.into();
        let mut dims = BTreeMap::new();
        dims.insert(record_dim.clone(), 0);
        Self {
            record_dim,
            dims,
            variables: BTreeMap::new(),
            attrs: BTreeMap::new(),
        }
    }

    /// Number of soundings in the file.
    pub fn num_records(&self) -> usize {
        self.dims.get(&self.record_dim).copied().unwrap_or(0)
    }

    /// Define (or resize) a dimension.
    pub fn add_dim(&mut self, name: impl Into<String>, size: usize) {
        self.dims.insert(name.into(), size);
    }

    /// Add a variable, replacing any existing one of the same name.
    /// Every dimension must already be defined and the value count must
    /// match the declared shape.
    pub fn add_variable(
        &mut self,
        name: impl Into<String>,
        dims: Vec<String>,
        values: Values,
    ) -> Result<()> {
        let name = name.into();
        let mut shape = Vec::with_capacity(dims.len());
        for d in &dims {
            let size = self
                .dims
                .get(d)
                .ok_or_else(|| StoreError::MissingDim(d.clone()))?;
            shape.push(*size);
        }
        let expect: usize = shape.iter().product();
        if values.len() != expect {
            return Err(StoreError::ShapeMismatch {
                name,
                len: values.len(),
                shape,
            });
        }
        self.variables.insert(name, Variable { dims, values });
        Ok(())
    }

    pub fn variable(&self, name: &str) -> Result<&Variable> {
        self.variables
            .get(name)
            .ok_or_else(|| StoreError::MissingVariable(name.to_string()))
    }

    /// Integer time codes of the named per-sounding variable.
    pub fn time_codes(&self, name: &str) -> Result<&[i64]> {
        let var = self.variable(name)?;
        if var.dims.first() != Some(&self.record_dim) {
            return Err(StoreError::NotRecordVar {
                name: name.to_string(),
                record_dim: self.record_dim.clone(),
            });
        }
        match &var.values {
            Values::I64(v) => Ok(v),
            Values::F64(_) => Err(StoreError::WrongType(name.to_string())),
        }
    }

    pub fn get_attr(&self, name: &str) -> Option<&str> {
        self.attrs.get(name).map(String::as_str)
    }

    pub fn set_attr(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.attrs.insert(name.into(), value.into());
    }

    /// Flat values per sounding for a record variable (product of its
    /// trailing dimension sizes).
    fn record_span(&self, var: &Variable) -> usize {
        var.dims[1..]
            .iter()
            .map(|d| self.dims.get(d).copied().unwrap_or(0))
            .product()
    }

    /// Copy of the sub-range `range` of soundings. Per-sounding
    /// variables are sliced identically; everything else (non-record
    /// variables, attributes) is carried over unchanged.
    pub fn slice_records(&self, range: Range<usize>) -> SoundingSet {
        debug_assert!(range.end <= self.num_records());
        let mut out = self.clone();
        out.dims.insert(self.record_dim.clone(), range.len());
        for var in out.variables.values_mut() {
            if var.dims.first() == Some(&self.record_dim) {
                let span = self.record_span(var);
                var.values = var.values.slice(range.start * span..range.end * span);
            }
        }
        out
    }

    /// Concatenate `other`'s soundings after this file's, in place.
    ///
    /// The two files must share a schema: same record dimension, same
    /// variables with the same dimension lists, and equal non-record
    /// dimensions. Non-record variables must hold identical values.
    pub fn append_records(&mut self, other: &SoundingSet) -> Result<()> {
        if self.record_dim != other.record_dim {
            return Err(StoreError::SchemaMismatch(format!(
                "record dimension {} vs {}",
                self.record_dim, other.record_dim
            )));
        }
        if self.variables.keys().ne(other.variables.keys()) {
            return Err(StoreError::SchemaMismatch(
                "variable sets differ".to_string(),
            ));
        }
        for (name, size) in &self.dims {
            if name == &self.record_dim {
                continue;
            }
            if other.dims.get(name) != Some(size) {
                return Err(StoreError::SchemaMismatch(format!(
                    "dimension {name} differs"
                )));
            }
        }

        let added = other.num_records();
        for (name, var) in &mut self.variables {
            let theirs = &other.variables[name];
            if var.dims != theirs.dims {
                return Err(StoreError::SchemaMismatch(format!(
                    "variable {name} dimensions differ"
                )));
            }
            if var.dims.first() == Some(&self.record_dim) {
                if !var.values.extend_from(&theirs.values) {
                    return Err(StoreError::SchemaMismatch(format!(
                        "variable {name} types differ"
                    )));
                }
            } else if var.values != theirs.values {
                return Err(StoreError::SchemaMismatch(format!(
                    "non-record variable {name} differs"
                )));
            }
        }
        let total = self.num_records() + added;
        self.dims.insert(self.record_dim.clone(), total);
        Ok(())
    }

    /// Decode from JSON bytes, verifying declared shapes.
    pub fn from_slice(data: &[u8]) -> Result<Self> {
        let set: SoundingSet = serde_json::from_slice(data)?;
        set.validate()?;
        Ok(set)
    }

    /// Encode to JSON bytes.
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    /// Read a file from disk.
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        Self::from_slice(&std::fs::read(path)?)
    }

    /// Write the file to disk.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        std::fs::write(path, self.to_bytes()?)?;
        Ok(())
    }

    fn validate(&self) -> Result<()> {
        if !self.dims.contains_key(&self.record_dim) {
            return Err(StoreError::MissingDim(self.record_dim.clone()));
        }
        for (name, var) in &self.variables {
            let mut shape = Vec::with_capacity(var.dims.len());
            for d in &var.dims {
                let size = self
                    .dims
                    .get(d)
                    .ok_or_else(|| StoreError::MissingDim(d.clone()))?;
                shape.push(*size);
            }
            let expect: usize = shape.iter().product();
            if var.values.len() != expect {
                return Err(StoreError::ShapeMismatch {
                    name: name.clone(),
                    len: var.values.len(),
                    shape,
                });
            }
        }
        Ok(())
    }
}
