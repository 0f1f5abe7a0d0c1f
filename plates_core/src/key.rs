// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Identity types: datum keys, node ids, and layer ids.

use alloc::string::String;
use alloc::sync::Arc;
use core::fmt;

/// The identity of a datum for join purposes.
///
/// Positional joins use [`DatumKey::Index`]; keyed joins derive a key from a designated field
/// (a year, a county name) so a datum keeps its node when rows are inserted or reordered.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum DatumKey {
    /// Position in the dataset.
    Index(usize),
    /// A numeric key, stored as normalized `f64` bits.
    Number(u64),
    /// A textual key.
    Text(Arc<str>),
}

impl DatumKey {
    /// Builds a numeric key.
    ///
    /// `-0.0` and `0.0` map to the same key, as do all `NaN` payloads.
    pub fn number(value: f64) -> Self {
        let normalized = if value == 0.0 {
            0.0
        } else if value.is_nan() {
            f64::NAN
        } else {
            value
        };
        Self::Number(normalized.to_bits())
    }

    /// Builds a textual key.
    pub fn text(value: impl Into<Arc<str>>) -> Self {
        Self::Text(value.into())
    }

    /// Returns the numeric value for [`DatumKey::Number`] keys.
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Self::Number(bits) => Some(f64::from_bits(*bits)),
            _ => None,
        }
    }

    /// Returns the text for [`DatumKey::Text`] keys.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Self::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for DatumKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index(i) => write!(f, "#{i}"),
            Self::Number(bits) => write!(f, "{}", f64::from_bits(*bits)),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl From<usize> for DatumKey {
    fn from(value: usize) -> Self {
        Self::Index(value)
    }
}

impl From<f64> for DatumKey {
    fn from(value: f64) -> Self {
        Self::number(value)
    }
}

impl From<&str> for DatumKey {
    fn from(value: &str) -> Self {
        Self::text(value)
    }
}

impl From<String> for DatumKey {
    fn from(value: String) -> Self {
        Self::text(value)
    }
}

/// Stable identity of a [`crate::ShapeNode`].
///
/// Allocated once when a node enters and kept for as long as its datum key persists.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(pub u64);

impl NodeId {
    /// Creates an id from a raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Returns the raw value.
    pub const fn raw(self) -> u64 {
        self.0
    }
}

/// Identifies a layer (a group of sibling nodes) within a [`crate::Scene`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct LayerId(pub u32);

impl LayerId {
    /// Creates a layer id.
    pub const fn new(raw: u32) -> Self {
        Self(raw)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::ToString;

    use super::*;

    #[test]
    fn signed_zero_and_nan_normalize() {
        assert_eq!(DatumKey::number(0.0), DatumKey::number(-0.0));
        assert_eq!(DatumKey::number(f64::NAN), DatumKey::number(-f64::NAN));
        assert_ne!(DatumKey::number(1880.0), DatumKey::number(1890.0));
    }

    #[test]
    fn numeric_keys_display_like_numbers() {
        assert_eq!(DatumKey::number(1880.0).to_string(), "1880");
        assert_eq!(DatumKey::text("Dougherty").to_string(), "Dougherty");
    }
}
