// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Rect, Vec2};
use peniko::Brush;
use peniko::color::palette::css;
use plates_core::{DatumKey, JoinBy, Record, Shape};
use smallvec::smallvec;

use super::{format_number, label};
use crate::error::PlateError;
use crate::layers;
use crate::plate::{Pass, Plate};
use crate::scale::{ScaleLinear, extent};

/// Centered bars, one per year, whose width grows with the value.
///
/// Bars are sorted by year and spread evenly down the plot. The narrowest value gets
/// `min_width`, the widest `max_width`. Each bar carries its value (with `prefix`) in the middle
/// and its year along the bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct ValueBarsSpec {
    /// Year field; also the join key.
    pub year: Arc<str>,
    /// Value field.
    pub value: Arc<str>,
    /// Bar height, capped by the space available per bar.
    pub item_height: f64,
    /// Width of the smallest value.
    pub min_width: f64,
    /// Width of the largest value.
    pub max_width: f64,
    /// Bar fill.
    pub fill: Brush,
    /// Prepended to value labels.
    pub prefix: Arc<str>,
    /// Label font size.
    pub font_size: f64,
}

impl ValueBarsSpec {
    /// Creates yellow 100-unit bars labelled in dollars.
    pub fn new(year: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        Self {
            year: year.into(),
            value: value.into(),
            item_height: 100.0,
            min_width: 100.0,
            max_width: 200.0,
            fill: css::YELLOW.into(),
            prefix: "$".into(),
            font_size: 14.0,
        }
    }

    /// Sets the bar height.
    #[must_use]
    pub fn with_item_height(mut self, item_height: f64) -> Self {
        self.item_height = item_height;
        self
    }

    /// Sets the width range.
    #[must_use]
    pub fn with_widths(mut self, min_width: f64, max_width: f64) -> Self {
        self.min_width = min_width;
        self.max_width = max_width;
        self
    }

    /// Sets the bar fill.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }
}

impl Plate for ValueBarsSpec {
    fn numeric_fields(&self) -> Vec<&str> {
        vec![&*self.year, &*self.value]
    }

    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError> {
        let mut records = pass.records().to_vec();
        records.sort_by(|a, b| a.number(&self.year).total_cmp(&b.number(&self.year)));
        let Some(values) = extent(&records, |r| r.number(&self.value)) else {
            return Ok(());
        };

        let plot = pass.plot();
        let width = ScaleLinear::new(values, (self.min_width, self.max_width));
        let rows = ScaleLinear::new((0.0, records.len() as f64), (plot.y0, plot.y1));
        let height = self.item_height.min(rows.map(1.0) - rows.map(0.0));

        let key = |r: &Record| DatumKey::number(r.number(&self.year));
        let emphasis: Vec<_> = (0..records.len()).map(|i| pass.emphasis(i)).collect();
        pass.join(layers::MARKS, &records, JoinBy::Key(&key), |r, i| {
            let w = width.map(r.number(&self.value));
            let value = alloc::format!("{}{}", self.prefix, format_number(r.number(&self.value)));
            smallvec![
                Shape::rect("mark", Rect::new(-w / 2.0, 0.0, w / 2.0, height))
                    .with_fill(self.fill.clone())
                    .with_opacity(emphasis[i].opacity(1.0)),
                Shape::text("value", label((0.0, height / 2.0), value, self.font_size)),
                Shape::text(
                    "year",
                    label(
                        (0.0, height),
                        format_number(r.number(&self.year)),
                        self.font_size
                    )
                ),
            ]
        });

        let cx = plot.center().x;
        let offsets: Vec<Vec2> = (0..records.len())
            .map(|i| Vec2::new(cx, rows.map(i as f64)))
            .collect();
        pass.set_offsets(layers::MARKS, &offsets);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use plates_core::{Geometry, Scene, Selection, Viewport};
    use plates_text::HeuristicTextMeasurer;

    use super::*;
    use crate::plate::{PlateKind, PlateSpec, RenderContext};
    use crate::title::TitleSpec;

    fn land_values() -> Vec<Record> {
        [(1880.0, 5_764_293.0), (1875.0, 5_393_885.0), (1890.0, 12_322_003.0)]
            .iter()
            .map(|&(year, value)| Record::new().with("year", year).with("value", value))
            .collect()
    }

    #[test]
    fn bars_sorted_by_year_with_widths_from_value_extent() {
        let plate = PlateSpec::new(
            "data01",
            TitleSpec::new(""),
            PlateKind::ValueBars(ValueBarsSpec::new("year", "value")),
        );
        let mut scene = Scene::new();
        let data = land_values();
        let ctx = RenderContext {
            data: &data,
            viewport: Viewport::new(600.0, 640.0),
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();

        let marks = scene.layer(layers::MARKS).unwrap();
        let years: Vec<_> = marks.nodes().iter().map(|n| n.key().as_number()).collect();
        assert_eq!(years, [Some(1875.0), Some(1880.0), Some(1890.0)]);

        let widths: Vec<f64> = marks
            .nodes()
            .iter()
            .map(|n| match &n.shapes()[0].geometry {
                Geometry::Rect(r) => r.width(),
                _ => panic!("expected rect"),
            })
            .collect();
        assert!((widths[0] - 100.0).abs() < 1e-9);
        assert!((widths[2] - 200.0).abs() < 1e-9);

        // Plot is 20..620 tall: three slots of 200, bars capped at 100.
        let offset = marks.nodes()[1].offset();
        assert!((offset - Vec2::new(300.0, 220.0)).hypot() < 1e-9);
        let Geometry::Text(value) = &marks.nodes()[2].shapes()[1].geometry else {
            panic!("expected text");
        };
        assert_eq!(value.text, "$12322003");
    }
}
