// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use hashbrown::HashMap;
use kurbo::{BezPath, Point, Rect};
use peniko::Brush;
use peniko::color::palette::css;
use plates_core::{DatumKey, JoinBy, Shape};
use smallvec::smallvec;

use super::palette;
use crate::error::PlateError;
use crate::geometry::bounding_box_union;
use crate::layers;
use crate::plate::{Pass, Plate};
use crate::scale::ScaleQuantile;

/// A named polygon in data coordinates, y pointing up.
#[derive(Clone, Debug, PartialEq)]
pub struct Feature {
    /// Name matched against the record key field.
    pub name: Arc<str>,
    /// Closed rings; each ring is a list of vertices.
    pub rings: Vec<Vec<Point>>,
}

impl Feature {
    /// Creates a feature.
    pub fn new(name: impl Into<Arc<str>>, rings: Vec<Vec<Point>>) -> Self {
        Self {
            name: name.into(),
            rings,
        }
    }

    fn bounds(&self) -> Option<Rect> {
        let mut points = self.rings.iter().flatten();
        let first = *points.next()?;
        Some(points.fold(Rect::from_points(first, first), |r, &p| r.union_pt(p)))
    }
}

/// Polygon features filled by a quantile scale of the joined records.
///
/// Features are fit into the plot with a Y-reflected identity projection: one uniform scale
/// factor, centered, north up. A feature whose name matches no record is filled with `missing`.
#[derive(Clone, Debug, PartialEq)]
pub struct ChoroplethSpec {
    /// The shapes, in drawing order.
    pub features: Vec<Feature>,
    /// Record field holding the feature name.
    pub key: Arc<str>,
    /// Value field.
    pub value: Arc<str>,
    /// Quantile buckets, lowest first.
    pub palette: Vec<Brush>,
    /// Fill of features with no record.
    pub missing: Brush,
    /// Outline paint.
    pub stroke: Brush,
}

impl ChoroplethSpec {
    /// Creates a four-bucket choropleth over `features`.
    pub fn new(
        features: Vec<Feature>,
        key: impl Into<Arc<str>>,
        value: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            features,
            key: key.into(),
            value: value.into(),
            palette: palette(&["#ffc0cb", "#d2b48c", "#dc143c", "#654321"]),
            missing: css::LIGHT_GRAY.into(),
            stroke: css::BLACK.into(),
        }
    }

    /// Sets the bucket colors.
    #[must_use]
    pub fn with_palette(mut self, palette: Vec<Brush>) -> Self {
        self.palette = palette;
        self
    }
}

/// Maps data coordinates into `plot`, reflecting y and preserving aspect ratio.
fn fit(bounds: Rect, plot: Rect) -> impl Fn(Point) -> Point {
    let (dx, dy) = (bounds.width(), bounds.height());
    let k = match (dx > 0.0, dy > 0.0) {
        (true, true) => (plot.width() / dx).min(plot.height() / dy),
        (true, false) => plot.width() / dx,
        (false, true) => plot.height() / dy,
        (false, false) => 1.0,
    };
    let tx = plot.x0 + (plot.width() - k * dx) / 2.0;
    let ty = plot.y0 + (plot.height() - k * dy) / 2.0;
    move |p: Point| Point::new(tx + k * (p.x - bounds.x0), ty + k * (bounds.y1 - p.y))
}

impl Plate for ChoroplethSpec {
    fn numeric_fields(&self) -> Vec<&str> {
        vec![&*self.value]
    }

    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError> {
        let records = pass.records();
        let Ok(bounds) = bounding_box_union(self.features.iter().filter_map(Feature::bounds))
        else {
            log::warn!("choropleth has no feature geometry");
            return Ok(());
        };
        let project = fit(bounds, pass.plot());

        let values: HashMap<DatumKey, f64> = records
            .iter()
            .filter_map(|r| Some((r.key(&self.key)?, r.number(&self.value))))
            .collect();
        let buckets = ScaleQuantile::new(values.values().copied(), self.palette.clone());

        let outlines: Vec<BezPath> = self
            .features
            .iter()
            .map(|f| {
                let mut path = BezPath::new();
                for ring in &f.rings {
                    let mut points = ring.iter().map(|&p| project(p));
                    if let Some(first) = points.next() {
                        path.move_to(first);
                        points.for_each(|p| path.line_to(p));
                        path.close_path();
                    }
                }
                path
            })
            .collect();

        let key = |f: &Feature| DatumKey::text(f.name.clone());
        let emphasis: Vec<_> = (0..self.features.len()).map(|i| pass.emphasis(i)).collect();
        pass.join(
            layers::MARKS,
            self.features.as_slice(),
            JoinBy::Key(&key),
            |f, i| {
                let fill = values
                    .get(&key(f))
                    .and_then(|&v| buckets.map(v))
                    .unwrap_or(&self.missing);
                smallvec![
                    Shape::path("mark", outlines[i].clone())
                        .with_fill(fill.clone())
                        .with_stroke(self.stroke.clone(), 1.0)
                        .with_opacity(emphasis[i].opacity(1.0))
                ]
            },
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Shape as _;
    use plates_core::{Geometry, Record, Scene, Selection, Viewport};
    use plates_text::HeuristicTextMeasurer;

    use super::*;
    use crate::plate::{PlateKind, PlateSpec, RenderContext};
    use crate::title::TitleSpec;

    fn square(name: &str, x: f64, y: f64) -> Feature {
        Feature::new(
            name,
            vec![vec![
                Point::new(x, y),
                Point::new(x + 1.0, y),
                Point::new(x + 1.0, y + 1.0),
                Point::new(x, y + 1.0),
            ]],
        )
    }

    #[test]
    fn features_fit_the_plot_north_up_and_fill_by_quantile() {
        // Two counties stacked north-south in data space: "north" has the larger y.
        let features = vec![square("south", 0.0, 0.0), square("north", 0.0, 1.0)];
        let spec = ChoroplethSpec::new(features, "county", "acres");
        let plate = PlateSpec::new("data03", TitleSpec::new(""), PlateKind::Choropleth(spec));
        let data = vec![
            Record::new().with("county", "south").with("acres", 10.0),
            Record::new().with("county", "north").with("acres", 1000.0),
        ];
        let mut scene = Scene::new();
        let ctx = RenderContext {
            data: &data,
            viewport: Viewport::new(240.0, 240.0),
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();

        let nodes = scene.layer(layers::MARKS).unwrap().nodes();
        let bbox = |i: usize| match &nodes[i].shapes()[0].geometry {
            Geometry::Path(p) => p.bounding_box(),
            _ => panic!("expected path"),
        };
        // Data is 1 × 2, the plot 200 × 200: scale 100, centered horizontally.
        assert_eq!(bbox(1), Rect::new(70.0, 20.0, 170.0, 120.0));
        assert_eq!(bbox(0), Rect::new(70.0, 120.0, 170.0, 220.0));

        let palette = palette(&["#ffc0cb", "#d2b48c", "#dc143c", "#654321"]);
        assert_eq!(nodes[0].shapes()[0].fill.as_ref(), Some(&palette[0]));
        assert_eq!(nodes[1].shapes()[0].fill.as_ref(), Some(&palette[3]));
    }

    #[test]
    fn unmatched_features_use_the_missing_fill() {
        let spec = ChoroplethSpec::new(vec![square("elsewhere", 0.0, 0.0)], "county", "acres");
        let plate = PlateSpec::new("data03", TitleSpec::new(""), PlateKind::Choropleth(spec));
        let data = vec![Record::new().with("county", "dougherty").with("acres", 5.0)];
        let mut scene = Scene::new();
        let ctx = RenderContext {
            data: &data,
            viewport: Viewport::new(240.0, 240.0),
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();
        let node = &scene.layer(layers::MARKS).unwrap().nodes()[0];
        assert_eq!(node.shapes()[0].fill, Some(Brush::from(css::LIGHT_GRAY)));
    }
}
