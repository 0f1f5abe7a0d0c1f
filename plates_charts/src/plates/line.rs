// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{BezPath, Circle, Point};
use peniko::Brush;
use peniko::color::palette::css;
use plates_core::{DatumKey, JoinBy, Record, Shape};
use smallvec::smallvec;

use crate::error::PlateError;
use crate::layers;
use crate::plate::{Pass, Plate};
use crate::scale::{ScaleLinear, extent};

/// A polyline of `y` over `x` with a marker per record.
///
/// Both scales span the data extent. The y range is flipped so larger values sit higher.
#[derive(Clone, Debug, PartialEq)]
pub struct LineSpec {
    /// Horizontal field (usually a year); also the marker join key.
    pub x: Arc<str>,
    /// Vertical field.
    pub y: Arc<str>,
    /// Line paint.
    pub stroke: Brush,
    /// Line width.
    pub stroke_width: f64,
    /// Marker radius; `0` draws no markers.
    pub point_radius: f64,
}

impl LineSpec {
    /// Creates a 2-unit black line with 3-unit markers.
    pub fn new(x: impl Into<Arc<str>>, y: impl Into<Arc<str>>) -> Self {
        Self {
            x: x.into(),
            y: y.into(),
            stroke: css::BLACK.into(),
            stroke_width: 2.0,
            point_radius: 3.0,
        }
    }

    /// Sets the marker radius.
    #[must_use]
    pub fn with_point_radius(mut self, point_radius: f64) -> Self {
        self.point_radius = point_radius;
        self
    }
}

impl Plate for LineSpec {
    fn numeric_fields(&self) -> Vec<&str> {
        vec![&*self.x, &*self.y]
    }

    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError> {
        let mut records = pass.records().to_vec();
        records.sort_by(|a, b| a.number(&self.x).total_cmp(&b.number(&self.x)));
        let (Some(xs), Some(ys)) = (
            extent(&records, |r| r.number(&self.x)),
            extent(&records, |r| r.number(&self.y)),
        ) else {
            return Ok(());
        };

        let plot = pass.plot();
        let x_scale = ScaleLinear::new(xs, (plot.x0, plot.x1));
        let y_scale = ScaleLinear::new(ys, (plot.y1, plot.y0));
        let points: Vec<Point> = records
            .iter()
            .map(|r| Point::new(x_scale.map(r.number(&self.x)), y_scale.map(r.number(&self.y))))
            .collect();

        let mut path = BezPath::new();
        for (i, &p) in points.iter().enumerate() {
            if i == 0 {
                path.move_to(p);
            } else {
                path.line_to(p);
            }
        }
        pass.join(
            layers::MARKS,
            core::slice::from_ref(&path),
            JoinBy::Index,
            |path, _| {
                smallvec![
                    Shape::path("mark", path.clone())
                        .with_stroke(self.stroke.clone(), self.stroke_width)
                ]
            },
        );

        if self.point_radius > 0.0 {
            let key = |r: &Record| DatumKey::number(r.number(&self.x));
            let emphasis: Vec<_> = (0..records.len()).map(|i| pass.emphasis(i)).collect();
            pass.join(layers::POINTS, &records, JoinBy::Key(&key), |_, i| {
                smallvec![
                    Shape::circle("point", Circle::new(points[i], self.point_radius))
                        .with_fill(self.stroke.clone())
                        .with_opacity(emphasis[i].opacity(1.0))
                ]
            });
        }
        Ok(())
    }
}
