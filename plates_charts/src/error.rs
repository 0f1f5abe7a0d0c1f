// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// A geometry generator was called with inputs outside its preconditions.
///
/// These indicate a misconfigured scale or plate upstream; generators never clamp.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum GeometryError {
    /// Radii must be finite with `outer >= inner >= 0`.
    #[error("invalid radii: outer {outer}, inner {inner}")]
    InvalidRadii {
        /// The outer radius given.
        outer: f64,
        /// The inner radius given.
        inner: f64,
    },
    /// A length, thickness, or gap was negative or non-finite.
    #[error("invalid {what}: {value}")]
    InvalidLength {
        /// Which parameter was rejected.
        what: &'static str,
        /// The value given.
        value: f64,
    },
    /// A bounding box union needs at least one rectangle.
    #[error("bounding box union of no rectangles")]
    EmptyBounds,
}

/// A plate failed to render.
#[derive(Clone, Copy, Debug, PartialEq, thiserror::Error)]
pub enum PlateError {
    /// A geometry generator rejected its inputs.
    #[error(transparent)]
    Geometry(#[from] GeometryError),
}
