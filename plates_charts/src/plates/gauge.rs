// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use peniko::Brush;
use peniko::color::palette::css;
use plates_core::{DatumKey, JoinBy, Record, Shape, TextAnchor, TextBaseline, TextShape};
use smallvec::smallvec;

use super::field_text;
use crate::error::PlateError;
use crate::geometry::annular_arc;
use crate::layers;
use crate::plate::{Pass, Plate};
use crate::scale::{ScaleLinear, extent};

/// Nested arcs, one track per record, starting at 12 o'clock.
///
/// Record `i` occupies the track between `R - i·t` and `R - (i + 1)·t`, where `R` is half the
/// plot's short side and `t` the track thickness (shrunk if the tracks would not fit). The sweep
/// is `value / max · max_angle` degrees.
#[derive(Clone, Debug, PartialEq)]
pub struct GaugeSpec {
    /// Label field (a year, say); also the join key.
    pub label: Arc<str>,
    /// Value field.
    pub value: Arc<str>,
    /// Track thickness.
    pub thickness: f64,
    /// Sweep of the largest value, in degrees.
    pub max_angle: f64,
    /// Arc fill.
    pub fill: Brush,
    /// Arc outline paint.
    pub stroke: Brush,
    /// Arc outline width.
    pub stroke_width: f64,
    /// Label font size.
    pub font_size: f64,
}

impl GaugeSpec {
    /// Creates red 28-unit tracks sweeping up to 270°.
    pub fn new(label: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            thickness: 28.0,
            max_angle: 270.0,
            fill: css::RED.into(),
            stroke: css::BLACK.into(),
            stroke_width: 2.0,
            font_size: 12.0,
        }
    }

    /// Sets the track thickness.
    #[must_use]
    pub fn with_thickness(mut self, thickness: f64) -> Self {
        self.thickness = thickness;
        self
    }

    /// Sets the sweep of the largest value.
    #[must_use]
    pub fn with_max_angle(mut self, max_angle: f64) -> Self {
        self.max_angle = max_angle;
        self
    }
}

impl Plate for GaugeSpec {
    fn numeric_fields(&self) -> Vec<&str> {
        vec![&*self.value]
    }

    fn magnitude_fields(&self) -> Vec<&str> {
        vec![&*self.value]
    }

    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError> {
        let records = pass.records();
        let Some((_, max)) = extent(records, |r| r.number(&self.value)) else {
            return Ok(());
        };

        let plot = pass.plot();
        let center = plot.center();
        let outer_radius = plot.width().min(plot.height()) / 2.0;
        let thickness = self.thickness.min(outer_radius / records.len() as f64);
        let angle = ScaleLinear::new((0.0, max), (0.0, self.max_angle));

        let mut tracks = Vec::with_capacity(records.len());
        for (i, r) in records.iter().enumerate() {
            let outer = outer_radius - i as f64 * thickness;
            let inner = (outer - thickness).max(0.0);
            let path = annular_arc(center, outer, inner, 0.0, angle.map(r.number(&self.value)))?;
            tracks.push((path, (outer + inner) / 2.0));
        }

        let key = |r: &Record| r.key(&self.label).unwrap_or(DatumKey::Index(0));
        let emphasis: Vec<_> = (0..records.len()).map(|i| pass.emphasis(i)).collect();
        pass.join(layers::MARKS, records, JoinBy::Key(&key), |_, i| {
            smallvec![
                Shape::path("mark", tracks[i].0.clone())
                    .with_fill(self.fill.clone())
                    .with_stroke(self.stroke.clone(), self.stroke_width)
                    .with_opacity(emphasis[i].opacity(1.0))
            ]
        });
        pass.join(layers::LABELS, records, JoinBy::Key(&key), |r, i| {
            let text = TextShape::new(
                (center.x - self.stroke_width * 3.0, center.y - tracks[i].1),
                field_text(r, &self.label),
            )
            .with_font_size(self.font_size)
            .with_anchor(TextAnchor::End)
            .with_baseline(TextBaseline::Middle);
            smallvec![Shape::text("label", text)]
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Shape as _;
    use plates_core::{Geometry, Scene, Selection, Viewport};
    use plates_text::HeuristicTextMeasurer;

    use super::*;
    use crate::plate::{PlateKind, PlateSpec, RenderContext};
    use crate::title::TitleSpec;

    fn render(data: &[Record], spec: GaugeSpec) -> Scene {
        let plate = PlateSpec::new("data07", TitleSpec::new(""), PlateKind::Gauge(spec));
        let mut scene = Scene::new();
        let ctx = RenderContext {
            data,
            viewport: Viewport::new(240.0, 240.0),
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();
        scene
    }

    #[test]
    fn largest_value_sweeps_the_maximum_angle() {
        let data = vec![
            Record::new().with("year", 1874.0).with("value", 338_769.0),
            Record::new().with("year", 1899.0).with("value", 1_062_223.0),
        ];
        let scene = render(&data, GaugeSpec::new("year", "value").with_max_angle(180.0));
        let marks = scene.layer(layers::MARKS).unwrap().nodes();
        // Second track: outer radius 100 - 28 = 72, half-turn sweep reaching 6 o'clock.
        let Geometry::Path(arc) = &marks[1].shapes()[0].geometry else {
            panic!("expected path");
        };
        let bounds = arc.bounding_box();
        assert!((bounds.y1 - (120.0 + 72.0)).abs() < 0.5);
        assert!((bounds.x0 - 120.0).abs() < 1e-6);
    }

    #[test]
    fn tracks_shrink_to_fit_many_records() {
        let data: Vec<Record> = (0..10)
            .map(|i| Record::new().with("year", 1870.0 + f64::from(i)).with("value", 1.0))
            .collect();
        // Ten 28-unit tracks do not fit in radius 100; the last one still has a valid inner
        // radius.
        let scene = render(&data, GaugeSpec::new("year", "value"));
        assert_eq!(scene.layer(layers::MARKS).unwrap().nodes().len(), 10);
    }
}
