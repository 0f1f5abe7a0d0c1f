// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layer conventions for plate-generated nodes.
//!
//! A [`plates_core::Scene`] paints its layers in the order they were first joined. Plates join
//! layers in ascending id order, so the ids below double as paint order: connectors sit under
//! the marks they link, and labels sit above everything they annotate.

use plates_core::LayerId;

/// The title block.
pub const TITLE: LayerId = LayerId::new(0);
/// Legend swatches and labels.
pub const LEGEND: LayerId = LayerId::new(10);
/// Ribbons linking marks across rows.
pub const CONNECTORS: LayerId = LayerId::new(20);
/// Primary data marks (bars, rings, arcs, features).
pub const MARKS: LayerId = LayerId::new(30);
/// Point markers drawn over line marks.
pub const POINTS: LayerId = LayerId::new(40);
/// Data labels.
pub const LABELS: LayerId = LayerId::new(50);

/// Marks of the `index`-th group of a grouped plate (one pie per group, say).
///
/// Group layers sit between [`MARKS`] and [`POINTS`], so at most nine groups keep that order.
pub const fn group(index: u32) -> LayerId {
    LayerId::new(MARKS.0 + 1 + index)
}
