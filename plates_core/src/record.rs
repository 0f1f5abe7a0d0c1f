// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Typed records and numeric coercion.
//!
//! Providers hand over rows of raw text. A [`FieldMap`] renames the source columns and coerces
//! the numeric ones, so everything downstream reads either a `f64` (possibly `NaN`) or a string.

use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use crate::key::DatumKey;

/// A single field value.
#[derive(Clone, Debug, PartialEq)]
pub enum Value {
    /// A number. Malformed numeric input is stored as `NaN`.
    Number(f64),
    /// Free text.
    Text(Arc<str>),
}

impl Value {
    /// Returns the value as a number, coercing text with [`coerce_number`].
    pub fn as_f64(&self) -> f64 {
        match self {
            Self::Number(v) => *v,
            Self::Text(s) => coerce_number(s),
        }
    }

    /// Returns the text of a [`Value::Text`].
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            Self::Number(_) => None,
        }
    }

    /// Returns a join key for this value.
    pub fn to_key(&self) -> DatumKey {
        match self {
            Self::Number(v) => DatumKey::number(*v),
            Self::Text(s) => DatumKey::Text(s.clone()),
        }
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Self::Text(value.into())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Self::Text(value.into())
    }
}

impl From<Arc<str>> for Value {
    fn from(value: Arc<str>) -> Self {
        Self::Text(value)
    }
}

/// Coerces raw text into a number.
///
/// Surrounding whitespace and a trailing `%` are stripped. Anything that does not then parse as
/// a number, including empty text, becomes `NaN`.
pub fn coerce_number(raw: &str) -> f64 {
    let trimmed = raw.trim();
    let trimmed = trimmed.strip_suffix('%').map_or(trimmed, str::trim_end);
    if trimmed.is_empty() {
        return f64::NAN;
    }
    trimmed.parse::<f64>().unwrap_or(f64::NAN)
}

/// One row of a dataset: an ordered mapping of field names to values.
///
/// Records are built once and then only read. Field lookups are linear, which is fine for the
/// handful of columns a plate dataset carries.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Record {
    fields: Vec<(Arc<str>, Value)>,
    aggregate: bool,
}

impl Record {
    /// Creates an empty record.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns this record with `name` set to `value`, replacing any previous value.
    #[must_use]
    pub fn with(mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) -> Self {
        self.set(name, value);
        self
    }

    /// Sets `name` to `value`, replacing any previous value.
    pub fn set(&mut self, name: impl Into<Arc<str>>, value: impl Into<Value>) {
        let name = name.into();
        let value = value.into();
        match self.fields.iter_mut().find(|(n, _)| *n == name) {
            Some((_, v)) => *v = value,
            None => self.fields.push((name, value)),
        }
    }

    /// Returns the value of `name`, if present.
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields
            .iter()
            .find(|(n, _)| &**n == name)
            .map(|(_, v)| v)
    }

    /// Returns `name` as a number; missing fields read as `NaN`.
    pub fn number(&self, name: &str) -> f64 {
        self.get(name).map_or(f64::NAN, Value::as_f64)
    }

    /// Returns `name` as text, if it is a text field.
    pub fn text(&self, name: &str) -> Option<&str> {
        self.get(name).and_then(Value::as_str)
    }

    /// Returns a join key built from `name`.
    pub fn key(&self, name: &str) -> Option<DatumKey> {
        self.get(name).map(Value::to_key)
    }

    /// Iterates over `(name, value)` pairs in insertion order.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.fields.iter().map(|(n, v)| (&**n, v))
    }

    /// Returns the number of fields.
    pub fn len(&self) -> usize {
        self.fields.len()
    }

    /// Returns `true` if the record has no fields.
    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Marks this record as a synthetic aggregation bucket.
    #[must_use]
    pub fn into_aggregate(mut self) -> Self {
        self.aggregate = true;
        self
    }

    /// Returns `true` for synthetic aggregation buckets.
    pub fn is_aggregate(&self) -> bool {
        self.aggregate
    }
}

/// How a source column is coerced.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldKind {
    /// Coerce with [`coerce_number`].
    Number,
    /// Keep the raw text.
    Text,
}

/// One entry of a [`FieldMap`].
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FieldMapping {
    /// Column name in the source data.
    pub source: Arc<str>,
    /// Field name on the produced record.
    pub target: Arc<str>,
    /// Coercion applied to the column.
    pub kind: FieldKind,
}

/// A per-dataset table mapping raw columns onto typed record fields.
///
/// For example `{Year, "Land Value (Dollars)"} -> {year: number, value: number}`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldMap {
    mappings: Vec<FieldMapping>,
}

impl FieldMap {
    /// Creates an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a numeric column.
    #[must_use]
    pub fn number(mut self, source: impl Into<Arc<str>>, target: impl Into<Arc<str>>) -> Self {
        self.mappings.push(FieldMapping {
            source: source.into(),
            target: target.into(),
            kind: FieldKind::Number,
        });
        self
    }

    /// Adds a text column.
    #[must_use]
    pub fn text(mut self, source: impl Into<Arc<str>>, target: impl Into<Arc<str>>) -> Self {
        self.mappings.push(FieldMapping {
            source: source.into(),
            target: target.into(),
            kind: FieldKind::Text,
        });
        self
    }

    /// Returns the configured mappings.
    pub fn mappings(&self) -> &[FieldMapping] {
        &self.mappings
    }

    /// Builds a record from one raw row, given the header of the source table.
    ///
    /// A column missing from `header` (or a row shorter than the header) reads as empty text,
    /// which numeric fields coerce to `NaN`.
    pub fn record(&self, header: &[&str], row: &[&str]) -> Record {
        let mut record = Record::new();
        for m in &self.mappings {
            let raw = header
                .iter()
                .position(|h| h.trim() == &*m.source)
                .and_then(|col| row.get(col))
                .copied()
                .unwrap_or("");
            let value = match m.kind {
                FieldKind::Number => Value::Number(coerce_number(raw)),
                FieldKind::Text => Value::Text(raw.trim().into()),
            };
            record.set(m.target.clone(), value);
        }
        record
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn coercion_strips_percent_and_whitespace() {
        assert_eq!(coerce_number(" 12.5% "), 12.5);
        assert_eq!(coerce_number("1880"), 1880.0);
        assert!(coerce_number("n/a").is_nan());
        assert!(coerce_number("").is_nan());
        assert!(coerce_number("%").is_nan());
    }

    #[test]
    fn field_map_renames_and_coerces() {
        let map = FieldMap::new()
            .number("Year", "year")
            .number("Land Value (Dollars)", "value")
            .text("Note", "note");
        let header = ["Year", "Land Value (Dollars)"];
        let r = map.record(&header, &["1875", "21186"]);
        assert_eq!(r.number("year"), 1875.0);
        assert_eq!(r.number("value"), 21186.0);
        assert_eq!(r.text("note"), Some(""));
        assert_eq!(r.key("year"), Some(DatumKey::number(1875.0)));
    }

    #[test]
    fn set_replaces_existing_field() {
        let r = Record::new().with("a", 1.0).with("a", 2.0);
        assert_eq!(r.len(), 1);
        assert_eq!(r.number("a"), 2.0);
        assert!(r.number("missing").is_nan());
    }
}
