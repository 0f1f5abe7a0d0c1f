// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data-to-shape binding core for plates.
//!
//! A plate is one self-contained chart bound to one dataset. This crate holds the parts every
//! plate shares and that have nothing to do with any particular chart type:
//! - **Records**: typed rows ([`Record`], [`Value`]) produced by a [`DatasetProvider`] through a
//!   per-dataset [`FieldMap`].
//! - **Joins**: [`reconcile`] matches a new dataset against existing nodes by position or by a
//!   [`DatumKey`], reporting entering, updating, and exiting elements.
//! - **Shape trees**: a [`Scene`] is a list of layers of [`ShapeNode`]s. Each node keeps a stable
//!   [`NodeId`] for as long as its key persists, and carries the [`Shape`]s derived from its datum.
//! - **Lifecycle**: [`PlateHost`] tracks the viewport and a single-shot dataset request, and
//!   ignores responses that arrive for a superseded request or after unmount.
//!
//! Scales, geometry, and layout live in `plates_charts`; serialization to SVG lives with the
//! host application.

#![no_std]

extern crate alloc;

mod error;
mod host;
mod interaction;
mod join;
mod key;
mod provider;
mod record;
mod scene;
mod shape;

pub use error::FetchError;
pub use host::{DataState, Delivery, PlateHost, RequestToken, SkipReason, Viewport};
pub use interaction::{Emphasis, PointerEvent, Selection};
pub use join::{Join, JoinBy, Keyed, reconcile};
pub use key::{DatumKey, LayerId, NodeId};
pub use provider::DatasetProvider;
pub use record::{FieldKind, FieldMap, FieldMapping, Record, Value, coerce_number};
pub use scene::{Layer, Scene, ShapeDiff, ShapeNode, Shapes};
pub use shape::{Geometry, Shape, ShapeKind, Stroke, TextAnchor, TextBaseline, TextShape};
