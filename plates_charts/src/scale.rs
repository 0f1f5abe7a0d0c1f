// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales: pure mappings from data space into plate space.
//!
//! - [`ScaleLinear`] maps a continuous domain onto a continuous range.
//! - [`ScaleBand`] splits a range into padded, equal-width bands, one per category.
//! - [`ScaleQuantile`] splits sorted samples into equal-count buckets and maps each bucket to an
//!   output (a fill color, typically).
//! - [`ScaleOrdinal`] cycles categories through a list of outputs.

use alloc::vec::Vec;

use hashbrown::HashMap;
use plates_core::DatumKey;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
    clamp: bool,
}

impl ScaleLinear {
    /// Creates a scale mapping `domain` onto `range`. Values outside the domain extrapolate.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self {
            domain,
            range,
            clamp: false,
        }
    }

    /// Enables or disables clamping outputs to the range.
    #[must_use]
    pub fn with_clamp(mut self, clamp: bool) -> Self {
        self.clamp = clamp;
        self
    }

    /// Maps a domain value into range space.
    ///
    /// A zero-width domain maps everything to the start of the range.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 {
            return r0;
        }
        let mut t = (x - d0) / denom;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        r0 + t * (r1 - r0)
    }

    /// Maps a range value back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        let mut t = (y - r0) / denom;
        if self.clamp {
            t = t.clamp(0.0, 1.0);
        }
        d0 + t * (d1 - d0)
    }

    /// Returns the domain.
    pub fn domain(&self) -> (f64, f64) {
        self.domain
    }

    /// Returns the range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }
}

/// A discrete band scale: one equal-width band per category.
///
/// Padding follows d3: `padding_inner` is the fraction of a step left empty between bands,
/// `padding_outer` is the space before the first and after the last band in steps, and `align`
/// distributes any leftover space (`0` start, `0.5` centered, `1` end).
#[derive(Clone, Debug)]
pub struct ScaleBand {
    domain: Vec<DatumKey>,
    index: HashMap<DatumKey, usize>,
    range: (f64, f64),
    padding_inner: f64,
    padding_outer: f64,
    align: f64,
    round: bool,
    start: f64,
    step: f64,
    band_width: f64,
}

impl ScaleBand {
    /// Creates a band scale over `categories`. Duplicate categories keep their first position.
    pub fn new(categories: impl IntoIterator<Item = DatumKey>, range: (f64, f64)) -> Self {
        let mut domain = Vec::new();
        let mut index = HashMap::new();
        for key in categories {
            if !index.contains_key(&key) {
                index.insert(key.clone(), domain.len());
                domain.push(key);
            }
        }
        let mut scale = Self {
            domain,
            index,
            range,
            padding_inner: 0.0,
            padding_outer: 0.0,
            align: 0.5,
            round: false,
            start: 0.0,
            step: 0.0,
            band_width: 0.0,
        };
        scale.rescale();
        scale
    }

    /// Sets the inner padding, clamped to `0..=1`.
    #[must_use]
    pub fn with_padding_inner(mut self, padding: f64) -> Self {
        self.padding_inner = padding.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    /// Sets the outer padding (at least `0`).
    #[must_use]
    pub fn with_padding_outer(mut self, padding: f64) -> Self {
        self.padding_outer = padding.max(0.0);
        self.rescale();
        self
    }

    /// Sets the alignment, clamped to `0..=1`.
    #[must_use]
    pub fn with_align(mut self, align: f64) -> Self {
        self.align = align.clamp(0.0, 1.0);
        self.rescale();
        self
    }

    /// Rounds the step, band start, and band width to whole units.
    #[must_use]
    pub fn with_round(mut self, round: bool) -> Self {
        self.round = round;
        self.rescale();
        self
    }

    fn rescale(&mut self) {
        let n = self.domain.len() as f64;
        let (r0, r1) = self.range;
        let (lo, hi) = if r1 < r0 { (r1, r0) } else { (r0, r1) };
        let mut step = (hi - lo) / (n - self.padding_inner + 2.0 * self.padding_outer).max(1.0);
        if self.round {
            step = step.floor();
        }
        let mut start = lo + (hi - lo - step * (n - self.padding_inner)) * self.align;
        let mut band_width = step * (1.0 - self.padding_inner);
        if self.round {
            start = start.round();
            band_width = band_width.round();
        }
        self.start = start;
        self.step = step;
        self.band_width = band_width;
    }

    /// Returns the start of the band at `index`.
    ///
    /// When the range is reversed, index `0` is the band nearest the range start.
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let slot = if r1 < r0 {
            self.domain.len().saturating_sub(index + 1)
        } else {
            index
        };
        self.start + self.step * slot as f64
    }

    /// Returns the start of the band for `key`, if it is in the domain.
    pub fn position(&self, key: &DatumKey) -> Option<f64> {
        self.index.get(key).map(|&i| self.x(i))
    }

    /// Returns the width of every band.
    pub fn band_width(&self) -> f64 {
        self.band_width
    }

    /// Returns the distance between the starts of adjacent bands.
    pub fn step(&self) -> f64 {
        self.step
    }

    /// Returns the de-duplicated categories in band order.
    pub fn domain(&self) -> &[DatumKey] {
        &self.domain
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.domain.len()
    }
}

/// A quantile scale: equal-count buckets over sorted samples, each mapped to one output.
///
/// Thresholds use linear interpolation between order statistics (the R-7 method). A value equal
/// to a threshold falls in the lower bucket.
#[derive(Clone, Debug, PartialEq)]
pub struct ScaleQuantile<T> {
    thresholds: Vec<f64>,
    outputs: Vec<T>,
}

impl<T> ScaleQuantile<T> {
    /// Creates a quantile scale. Non-finite samples are ignored.
    pub fn new(samples: impl IntoIterator<Item = f64>, outputs: Vec<T>) -> Self {
        let mut sorted: Vec<f64> = samples.into_iter().filter(|v| v.is_finite()).collect();
        sorted.sort_by(f64::total_cmp);
        let buckets = outputs.len();
        let thresholds = if sorted.is_empty() || buckets < 2 {
            Vec::new()
        } else {
            (1..buckets)
                .map(|i| quantile_sorted(&sorted, i as f64 / buckets as f64))
                .collect()
        };
        Self {
            thresholds,
            outputs,
        }
    }

    /// Returns the bucket boundaries, in ascending order.
    pub fn thresholds(&self) -> &[f64] {
        &self.thresholds
    }

    /// Returns the output for `v`.
    ///
    /// `None` for `NaN` input or when there are no outputs. With no samples every value maps to
    /// the first output.
    pub fn map(&self, v: f64) -> Option<&T> {
        if v.is_nan() {
            return None;
        }
        let bucket = self.thresholds.partition_point(|&t| t < v);
        self.outputs.get(bucket)
    }
}

fn quantile_sorted(sorted: &[f64], p: f64) -> f64 {
    let h = (sorted.len() - 1) as f64 * p;
    let lo = h.floor();
    #[allow(
        clippy::cast_possible_truncation,
        reason = "h is in 0..len, so the floor fits"
    )]
    let i = lo as usize;
    match sorted.get(i + 1) {
        Some(&next) => sorted[i] + (next - sorted[i]) * (h - lo),
        None => sorted[i],
    }
}

/// An ordinal scale: categories map to outputs by domain position, wrapping around.
#[derive(Clone, Debug)]
pub struct ScaleOrdinal<T> {
    index: HashMap<DatumKey, usize>,
    outputs: Vec<T>,
}

impl<T> ScaleOrdinal<T> {
    /// Creates an ordinal scale. Duplicate categories keep their first position.
    pub fn new(domain: impl IntoIterator<Item = DatumKey>, outputs: Vec<T>) -> Self {
        let mut index = HashMap::new();
        for key in domain {
            let next = index.len();
            index.entry(key).or_insert(next);
        }
        Self { index, outputs }
    }

    /// Returns the output for `key`, or `None` if it is not in the domain.
    pub fn map(&self, key: &DatumKey) -> Option<&T> {
        if self.outputs.is_empty() {
            return None;
        }
        let i = *self.index.get(key)?;
        self.outputs.get(i % self.outputs.len())
    }
}

/// Returns the `(min, max)` of `accessor` over `data`.
///
/// Non-finite values are ignored. `None` means there is nothing to draw.
pub fn extent<T>(data: &[T], accessor: impl Fn(&T) -> f64) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in data.iter().map(accessor).filter(|v| v.is_finite()) {
        min = min.min(v);
        max = max.max(v);
    }
    (min <= max).then_some((min, max))
}
