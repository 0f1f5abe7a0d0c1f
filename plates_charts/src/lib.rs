// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales, geometry, layout, and plate renderers on top of `plates_core`.
//!
//! This crate turns records into shapes:
//! - **Scales** map data values into scene coordinates or onto palettes.
//! - **Geometry generators** build arcs, rings, snake bars, and connector ribbons as kurbo paths.
//! - **Layout** stacks variable-size items, folds small records into a bucket, and splits a
//!   viewport into title and plot areas.
//! - **Plates** are configuration-driven charts ([`PlateSpec`]) that join their records into a
//!   [`plates_core::Scene`], one pass at a time. [`PlateRunner`] drives a plate through its
//!   lifecycle.
//!
//! Every pass is a pure function of the records, the viewport, and the hover selection. Nothing
//! is cached between passes except node identity, which lives in the scene.

#![no_std]

extern crate alloc;

mod error;
#[cfg(not(feature = "std"))]
mod float;
mod geometry;
pub mod layers;
mod layout;
mod plate;
mod plates;
mod runner;
mod scale;
mod title;

pub use error::{GeometryError, PlateError};
pub use geometry::{
    AnchorCache, WrappedBar, annular_arc, bounding_box_union, connector_path, polar_to_cartesian,
    ring,
};
pub use layout::{
    Aggregation, Margins, PlateFrame, TitlePlacement, layout_vertical,
    layout_vertical_with_aggregation,
};
pub use plate::{
    Pass, Plate, PlateKind, PlateSpec, RenderContext, RenderOutcome, RenderSummary,
};
pub use plates::{
    ChoroplethSpec, Feature, GaugeSpec, LineSpec, PieGroup, RingsSpec, SplitPieSpec,
    StackedRowsSpec, ValueBarsSpec, WrappedBarsSpec,
};
pub use runner::PlateRunner;
pub use scale::{ScaleBand, ScaleLinear, ScaleOrdinal, ScaleQuantile, extent};
pub use title::TitleSpec;
