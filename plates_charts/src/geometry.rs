// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Geometry generators.
//!
//! Angles given in degrees are measured clockwise from 12 o'clock, which is how plate
//! configurations describe gauges and pies. Internally they become kurbo radians (clockwise from
//! 3 o'clock in a y-down space).
//!
//! Generators validate their inputs and return [`GeometryError`] instead of clamping: a negative
//! radius or length means a scale upstream is misconfigured.

use core::f64::consts::{FRAC_PI_2, PI, TAU};

use hashbrown::HashMap;
use kurbo::{Arc, BezPath, Point, Rect, Vec2};
use plates_core::DatumKey;

use crate::error::GeometryError;
#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Tolerance used when approximating arcs with cubic Béziers.
const ARC_TOLERANCE: f64 = 0.1;

fn radians(angle_degrees: f64) -> f64 {
    (angle_degrees - 90.0) * PI / 180.0
}

/// Returns the point at `radius` from `center`, `angle_degrees` clockwise from 12 o'clock.
pub fn polar_to_cartesian(center: Point, radius: f64, angle_degrees: f64) -> Point {
    let a = radians(angle_degrees);
    Point::new(center.x + radius * a.cos(), center.y + radius * a.sin())
}

/// Appends a circular arc starting at `start` radians; the current point must be the arc start.
fn append_arc(path: &mut BezPath, center: Point, radius: f64, start: f64, sweep: f64) {
    if radius == 0.0 {
        path.line_to(center);
        return;
    }
    let arc = Arc {
        center,
        radii: Vec2::new(radius, radius),
        start_angle: start,
        sweep_angle: sweep,
        x_rotation: 0.0,
    };
    path.extend(arc.append_iter(ARC_TOLERANCE));
}

fn check_radii(outer: f64, inner: f64) -> Result<(), GeometryError> {
    if outer.is_finite() && inner.is_finite() && inner >= 0.0 && outer >= inner {
        Ok(())
    } else {
        Err(GeometryError::InvalidRadii { outer, inner })
    }
}

fn check_length(what: &'static str, value: f64) -> Result<(), GeometryError> {
    if value.is_finite() && value >= 0.0 {
        Ok(())
    } else {
        Err(GeometryError::InvalidLength { what, value })
    }
}

/// Returns the closed outline of a ring sector.
///
/// The outline runs along the outer arc from `start_degrees` to `end_degrees`, across to the
/// inner arc, back along it, and closes. `inner == 0` gives a pie slice. `inner == outer` gives
/// a zero-area outline.
pub fn annular_arc(
    center: Point,
    outer: f64,
    inner: f64,
    start_degrees: f64,
    end_degrees: f64,
) -> Result<BezPath, GeometryError> {
    check_radii(outer, inner)?;
    if !start_degrees.is_finite() || !end_degrees.is_finite() {
        return Err(GeometryError::InvalidLength {
            what: "angle",
            value: end_degrees - start_degrees,
        });
    }

    let start = radians(start_degrees);
    let sweep = (end_degrees - start_degrees) * PI / 180.0;
    let mut path = BezPath::new();
    path.move_to(polar_to_cartesian(center, outer, start_degrees));
    append_arc(&mut path, center, outer, start, sweep);
    path.line_to(polar_to_cartesian(center, inner, end_degrees));
    append_arc(&mut path, center, inner, start + sweep, -sweep);
    path.close_path();
    Ok(path)
}

/// Returns a full annulus (or a disc when `inner == 0`).
///
/// The inner circle winds opposite to the outer one, so the hole stays empty under both fill
/// rules.
pub fn ring(center: Point, inner: f64, outer: f64) -> Result<BezPath, GeometryError> {
    check_radii(outer, inner)?;
    let mut path = BezPath::new();
    path.move_to(center + Vec2::new(0.0, -outer));
    append_arc(&mut path, center, outer, -FRAC_PI_2, TAU);
    path.close_path();
    if inner > 0.0 {
        path.move_to(center + Vec2::new(0.0, -inner));
        append_arc(&mut path, center, inner, -FRAC_PI_2, -TAU);
        path.close_path();
    }
    Ok(path)
}

/// A bar that folds into back-and-forth rows once it outgrows `max_row`.
///
/// Row `k` spans `origin.y + k·(thickness + gap)` downwards for `thickness`. Even rows run left
/// to right from `origin.x`; odd rows run back. Consecutive rows are joined by half-circle turns
/// on alternating sides. A turn's inside edge has radius `gap / 2` and its outside edge
/// `(gap + 2·thickness) / 2`, both centered halfway between the rows.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WrappedBar {
    /// Top-left corner of the first row.
    pub origin: Point,
    /// Ribbon thickness.
    pub thickness: f64,
    /// Length of a full row.
    pub max_row: f64,
    /// Vertical gap between rows.
    pub gap: f64,
}

impl WrappedBar {
    /// Creates a wrapped bar description.
    pub fn new(origin: impl Into<Point>, thickness: f64, max_row: f64, gap: f64) -> Self {
        Self {
            origin: origin.into(),
            thickness,
            max_row,
            gap,
        }
    }

    fn validate(&self, total: f64) -> Result<(), GeometryError> {
        check_length("thickness", self.thickness)?;
        check_length("gap", self.gap)?;
        check_length("length", total)?;
        if self.max_row > 0.0 && self.max_row.is_finite() {
            Ok(())
        } else {
            Err(GeometryError::InvalidLength {
                what: "row length",
                value: self.max_row,
            })
        }
    }

    /// Returns the number of rows a bar of `total` length needs (at least one).
    pub fn rows(&self, total: f64) -> usize {
        if total.is_nan() || self.max_row.is_nan() || total <= self.max_row || self.max_row <= 0.0
        {
            return 1;
        }
        let rows = (total / self.max_row).ceil().min(f64::from(u32::MAX));
        #[allow(
            clippy::cast_possible_truncation,
            reason = "positive and capped at u32::MAX"
        )]
        {
            rows as usize
        }
    }

    /// Returns the length of the last row: the remainder, or a full row if there is none.
    pub fn last_row_length(&self, total: f64) -> f64 {
        let rows = self.rows(total);
        if rows == 1 {
            return total;
        }
        total - (rows - 1) as f64 * self.max_row
    }

    fn row_y(&self, k: usize) -> f64 {
        self.origin.y + k as f64 * (self.thickness + self.gap)
    }

    /// Returns the closed outline for a bar of `total` length.
    ///
    /// One row is a plain rectangle. Otherwise the outline walks the leading edge forward through
    /// every turn, crosses the end cap, and walks the trailing edge back to the origin.
    pub fn path(&self, total: f64) -> Result<BezPath, GeometryError> {
        self.validate(total)?;
        let Self {
            origin,
            thickness: t,
            max_row: m,
            gap: g,
        } = *self;
        let rows = self.rows(total);
        let last = self.last_row_length(total);
        let inside = g / 2.0;
        let outside = (g + 2.0 * t) / 2.0;
        let len = |k: usize| if k + 1 == rows { last } else { m };
        let row_start = |k: usize| if k % 2 == 0 { origin.x } else { origin.x + m };
        let row_end = |k: usize| {
            if k % 2 == 0 {
                origin.x + len(k)
            } else {
                origin.x + m - len(k)
            }
        };
        // The leading edge is the top of even rows and the bottom of odd rows.
        let lead_y = |k: usize| if k % 2 == 0 { self.row_y(k) } else { self.row_y(k) + t };
        let trail_y = |k: usize| if k % 2 == 0 { self.row_y(k) + t } else { self.row_y(k) };
        let turn_center = |k: usize| {
            let x = if k % 2 == 0 { origin.x + m } else { origin.x };
            Point::new(x, self.row_y(k) + t + inside)
        };

        let mut path = BezPath::new();
        path.move_to(origin);
        for k in 0..rows {
            path.line_to((row_end(k), lead_y(k)));
            if k + 1 < rows {
                // Right turns put the leading edge outside, left turns inside.
                let (radius, sweep) = if k % 2 == 0 {
                    (outside, PI)
                } else {
                    (inside, -PI)
                };
                append_arc(&mut path, turn_center(k), radius, -FRAC_PI_2, sweep);
            }
        }
        path.line_to((row_end(rows - 1), trail_y(rows - 1)));
        for k in (0..rows).rev() {
            path.line_to((row_start(k), trail_y(k)));
            if k > 0 {
                let (radius, sweep) = if (k - 1) % 2 == 0 {
                    (inside, -PI)
                } else {
                    (outside, PI)
                };
                append_arc(&mut path, turn_center(k - 1), radius, FRAC_PI_2, sweep);
            }
        }
        path.close_path();
        Ok(path)
    }

    /// Returns the bounding box of the ribbon for a bar of `total` length.
    pub fn bounds(&self, total: f64) -> Result<Rect, GeometryError> {
        self.validate(total)?;
        let rows = self.rows(total);
        let outside = self.gap / 2.0 + self.thickness;
        let x0 = if rows > 2 {
            self.origin.x - outside
        } else {
            self.origin.x
        };
        let x1 = if rows == 1 {
            self.origin.x + total
        } else {
            self.origin.x + self.max_row + outside
        };
        let y1 = self.row_y(rows - 1) + self.thickness;
        Ok(Rect::new(x0, self.origin.y, x1, y1))
    }
}

/// Returns the smallest rectangle containing every rectangle in `rects`.
pub fn bounding_box_union(rects: impl IntoIterator<Item = Rect>) -> Result<Rect, GeometryError> {
    rects
        .into_iter()
        .reduce(|a, b| a.union(b))
        .ok_or(GeometryError::EmptyBounds)
}

/// Returns a closed ribbon from the bottom edge of `from` to the top edge of `to`.
///
/// Both sides are cubic S-curves with vertical tangents at the ends.
pub fn connector_path(from: Rect, to: Rect) -> BezPath {
    let mid = (from.y1 + to.y0) / 2.0;
    let mut path = BezPath::new();
    path.move_to((from.x0, from.y1));
    path.curve_to((from.x0, mid), (to.x0, mid), (to.x0, to.y0));
    path.line_to((to.x1, to.y0));
    path.curve_to((to.x1, mid), (from.x1, mid), (from.x1, from.y1));
    path.close_path();
    path
}

/// A memo of per-key anchor rectangles, filled lazily during a render pass.
///
/// Plates that link elements (connectors between rows, say) look up where the linked element was
/// placed. The cache is owned by the caller and passed in explicitly.
#[derive(Clone, Debug, Default)]
pub struct AnchorCache {
    anchors: HashMap<DatumKey, Rect>,
}

impl AnchorCache {
    /// Creates an empty cache.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the anchor for `key`, computing and storing it on first use.
    pub fn get_or_insert_with(&mut self, key: &DatumKey, compute: impl FnOnce() -> Rect) -> Rect {
        if let Some(rect) = self.anchors.get(key) {
            return *rect;
        }
        let rect = compute();
        self.anchors.insert(key.clone(), rect);
        rect
    }

    /// Returns the anchor for `key`, if computed.
    pub fn get(&self, key: &DatumKey) -> Option<Rect> {
        self.anchors.get(key).copied()
    }

    /// Forgets every anchor.
    pub fn clear(&mut self) {
        self.anchors.clear();
    }

    /// Returns the number of cached anchors.
    pub fn len(&self) -> usize {
        self.anchors.len()
    }

    /// Returns `true` if nothing is cached.
    pub fn is_empty(&self) -> bool {
        self.anchors.is_empty()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use std::vec::Vec;

    use kurbo::{PathEl, Shape as _};

    use super::*;

    fn assert_point_close(a: Point, b: Point) {
        assert!((a - b).hypot() < 1e-9, "{a:?} != {b:?}");
    }

    fn curve_count(path: &BezPath) -> usize {
        path.elements()
            .iter()
            .filter(|el| matches!(el, PathEl::CurveTo(..) | PathEl::QuadTo(..)))
            .count()
    }

    fn end_points(path: &BezPath) -> Vec<Point> {
        path.elements().iter().filter_map(|el| el.end_point()).collect()
    }

    #[test]
    fn polar_angles_run_clockwise_from_twelve() {
        let c = Point::new(10.0, 10.0);
        assert_point_close(polar_to_cartesian(c, 5.0, 0.0), Point::new(10.0, 5.0));
        assert_point_close(polar_to_cartesian(c, 5.0, 90.0), Point::new(15.0, 10.0));
        assert_point_close(polar_to_cartesian(c, 5.0, 180.0), Point::new(10.0, 15.0));
        assert_point_close(polar_to_cartesian(c, 5.0, 270.0), Point::new(5.0, 10.0));
    }

    #[test]
    fn annular_arc_outlines_a_ring_sector() {
        let c = Point::new(0.0, 0.0);
        let path = annular_arc(c, 20.0, 10.0, 0.0, 90.0).unwrap();
        let points = end_points(&path);
        assert_point_close(points[0], Point::new(0.0, -20.0));
        assert!(points.iter().any(|p| (*p - Point::new(20.0, 0.0)).hypot() < 1e-9));
        assert!(points.iter().any(|p| (*p - Point::new(10.0, 0.0)).hypot() < 1e-9));
        let quarter = PI * (20.0 * 20.0 - 10.0 * 10.0) / 4.0;
        assert!((path.area().abs() - quarter).abs() < 1.0);
    }

    #[test]
    fn annular_arc_with_equal_radii_has_zero_area() {
        let c = Point::new(50.0, 50.0);
        let path = annular_arc(c, 30.0, 30.0, 0.0, 90.0).unwrap();
        let points = end_points(&path);
        let outer_start = points[0];
        assert_point_close(outer_start, polar_to_cartesian(c, 30.0, 0.0));
        // The last drawn point before closing is the inner start.
        let inner_start = *points.last().unwrap();
        assert_point_close(inner_start, outer_start);
        assert!(path.area().abs() < 1e-6);
    }

    #[test]
    fn annular_arc_with_zero_inner_is_a_pie_slice() {
        let c = Point::new(0.0, 0.0);
        let path = annular_arc(c, 10.0, 0.0, 0.0, 270.0).unwrap();
        assert!(end_points(&path).contains(&c));
        let three_quarters = PI * 100.0 * 0.75;
        assert!((path.area().abs() - three_quarters).abs() < 0.5);
    }

    #[test]
    fn annular_arc_rejects_inverted_radii() {
        let c = Point::ZERO;
        assert_eq!(
            annular_arc(c, 5.0, 10.0, 0.0, 90.0),
            Err(GeometryError::InvalidRadii {
                outer: 5.0,
                inner: 10.0
            })
        );
        assert!(annular_arc(c, 5.0, -1.0, 0.0, 90.0).is_err());
        assert!(annular_arc(c, f64::NAN, 0.0, 0.0, 90.0).is_err());
    }

    #[test]
    fn ring_has_a_hole() {
        let path = ring(Point::new(0.0, 0.0), 5.0, 10.0).unwrap();
        let expected = PI * (100.0 - 25.0);
        assert!((path.area().abs() - expected).abs() < 0.5);
        assert!(ring(Point::ZERO, 10.0, 5.0).is_err());
    }

    #[test]
    fn short_wrapped_bar_is_one_rectangle() {
        let bar = WrappedBar::new((100.0, 100.0), 20.0, 200.0, 50.0);
        for total in [0.0, 150.0, 200.0] {
            assert_eq!(bar.rows(total), 1);
            let path = bar.path(total).unwrap();
            assert_eq!(curve_count(&path), 0);
            assert_eq!(
                path.bounding_box(),
                Rect::new(100.0, 100.0, 100.0 + total, 120.0)
            );
        }
    }

    #[test]
    fn wrapped_bar_row_arithmetic() {
        let bar = WrappedBar::new((0.0, 0.0), 20.0, 200.0, 50.0);
        assert_eq!(bar.rows(400.0), 2);
        assert_eq!(bar.last_row_length(400.0), 200.0);
        assert_eq!(bar.rows(401.0), 3);
        assert_eq!(bar.last_row_length(401.0), 1.0);
        assert_eq!(bar.rows(650.0), 4);
        assert_eq!(bar.last_row_length(650.0), 50.0);
    }

    #[test]
    fn wrapped_bar_folds_with_alternating_turns() {
        let bar = WrappedBar::new((0.0, 0.0), 20.0, 200.0, 50.0);
        let path = bar.path(500.0).unwrap();
        assert!(curve_count(&path) > 0);

        // Three rows at pitch 70; the last runs 100 to the right from x = 0.
        let points = end_points(&path);
        assert_point_close(points[0], Point::new(0.0, 0.0));
        assert!(points.contains(&Point::new(100.0, 140.0)));
        assert!(points.contains(&Point::new(100.0, 160.0)));

        let bounds = bar.bounds(500.0).unwrap();
        assert_eq!(bounds, Rect::new(-45.0, 0.0, 245.0, 160.0));
        let drawn = path.bounding_box();
        assert!((drawn.x0 - bounds.x0).abs() < 0.5);
        assert!((drawn.x1 - bounds.x1).abs() < 0.5);
        assert!((drawn.y1 - bounds.y1).abs() < 1e-9);

        // Area: three straight rows plus two half-annulus turns.
        let turn = PI * (45.0 * 45.0 - 25.0 * 25.0) / 2.0;
        let expected = 20.0 * 500.0 + 2.0 * turn;
        assert!((path.area().abs() - expected).abs() < 4.0);
    }

    #[test]
    fn wrapped_bar_rejects_bad_inputs() {
        let bar = WrappedBar::new((0.0, 0.0), 20.0, 200.0, 50.0);
        assert!(matches!(
            bar.path(-1.0),
            Err(GeometryError::InvalidLength { what: "length", .. })
        ));
        assert!(WrappedBar::new((0.0, 0.0), 20.0, 0.0, 5.0).path(10.0).is_err());
        assert!(WrappedBar::new((0.0, 0.0), -2.0, 10.0, 5.0).path(10.0).is_err());
    }

    #[test]
    fn bounding_box_union_covers_every_rect() {
        let r = bounding_box_union([
            Rect::new(0.0, 0.0, 10.0, 10.0),
            Rect::new(-5.0, 2.0, 3.0, 30.0),
        ])
        .unwrap();
        assert_eq!(r, Rect::new(-5.0, 0.0, 10.0, 30.0));
        assert_eq!(
            bounding_box_union(core::iter::empty()),
            Err(GeometryError::EmptyBounds)
        );
    }

    #[test]
    fn connector_joins_bottom_edge_to_top_edge() {
        let from = Rect::new(0.0, 0.0, 40.0, 10.0);
        let to = Rect::new(60.0, 50.0, 80.0, 60.0);
        let path = connector_path(from, to);
        let points = end_points(&path);
        assert_eq!(points[0], Point::new(0.0, 10.0));
        assert!(points.contains(&Point::new(60.0, 50.0)));
        assert!(points.contains(&Point::new(80.0, 50.0)));
        assert!(points.contains(&Point::new(40.0, 10.0)));
    }

    #[test]
    fn anchor_cache_computes_once() {
        let mut cache = AnchorCache::new();
        let key = DatumKey::from("rent");
        let mut calls = 0;
        for _ in 0..3 {
            cache.get_or_insert_with(&key, || {
                calls += 1;
                Rect::new(0.0, 0.0, 1.0, 1.0)
            });
        }
        assert_eq!(calls, 1);
        assert_eq!(cache.len(), 1);
        assert_eq!(cache.get(&key), Some(Rect::new(0.0, 0.0, 1.0, 1.0)));
        cache.clear();
        assert!(cache.is_empty());
    }
}
