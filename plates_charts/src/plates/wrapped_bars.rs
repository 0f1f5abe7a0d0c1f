// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::Vec2;
use peniko::Brush;
use peniko::color::palette::css;
use plates_core::{DatumKey, JoinBy, Record, Shape, TextAnchor, TextBaseline, TextShape};
use plates_text::FontWeight;
use smallvec::smallvec;

use super::field_text;
use crate::error::PlateError;
use crate::geometry::WrappedBar;
use crate::layers;
use crate::layout::{Aggregation, layout_vertical_with_aggregation};
use crate::plate::{Pass, Plate};
use crate::scale::{ScaleLinear, extent};

/// One snake bar per category, stacked down the plot with the label to its left.
///
/// Bar length is `value / max · max_rows` rows, so the largest category folds into `max_rows`
/// rows. With an [`Aggregation`], categories below its threshold are folded into one bucket bar
/// placed in its own slot after the others.
#[derive(Clone, Debug, PartialEq)]
pub struct WrappedBarsSpec {
    /// Category label field; also the join key.
    pub label: Arc<str>,
    /// Value field.
    pub value: Arc<str>,
    /// Optional small-category bucket. Its measure should be `value`.
    pub aggregation: Option<Aggregation>,
    /// Ribbon thickness.
    pub thickness: f64,
    /// Gap between rows of one bar.
    pub gap: f64,
    /// Space between bars.
    pub spacing: f64,
    /// Width reserved for labels.
    pub label_width: f64,
    /// Rows taken by the largest value.
    pub max_rows: f64,
    /// Ribbon fill.
    pub fill: Brush,
    /// Ribbon outline.
    pub stroke: Brush,
    /// Label font size.
    pub font_size: f64,
}

impl WrappedBarsSpec {
    /// Creates 20-unit ribbons folding into at most four rows.
    pub fn new(label: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
            aggregation: None,
            thickness: 20.0,
            gap: 10.0,
            spacing: 16.0,
            label_width: 165.0,
            max_rows: 4.0,
            fill: css::CRIMSON.into(),
            stroke: css::BLACK.into(),
            font_size: 14.0,
        }
    }

    /// Folds small categories into a bucket.
    #[must_use]
    pub fn with_aggregation(mut self, aggregation: Aggregation) -> Self {
        self.aggregation = Some(aggregation);
        self
    }

    /// Sets ribbon thickness and row gap.
    #[must_use]
    pub fn with_ribbon(mut self, thickness: f64, gap: f64) -> Self {
        self.thickness = thickness;
        self.gap = gap;
        self
    }

    /// Sets how many rows the largest value takes.
    #[must_use]
    pub fn with_max_rows(mut self, max_rows: f64) -> Self {
        self.max_rows = max_rows;
        self
    }
}

impl Plate for WrappedBarsSpec {
    fn numeric_fields(&self) -> Vec<&str> {
        vec![&*self.value]
    }

    fn magnitude_fields(&self) -> Vec<&str> {
        vec![&*self.value]
    }

    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError> {
        let items: Vec<Record> = match &self.aggregation {
            Some(rule) => rule
                .apply(pass.records())
                .into_iter()
                .filter(|r| !rule.is_member(r))
                .collect(),
            None => pass.records().to_vec(),
        };
        let Some((_, max)) = extent(&items, |r| r.number(&self.value)) else {
            return Ok(());
        };

        let plot = pass.plot();
        let turn = self.gap / 2.0 + self.thickness;
        let start = self.label_width + turn;
        let max_row = (plot.width() - start - turn).max(1.0);
        let length = ScaleLinear::new((0.0, max), (0.0, max_row * self.max_rows));
        let bar = WrappedBar::new((start, 0.0), self.thickness, max_row, self.gap);

        let mut ribbons = Vec::with_capacity(items.len());
        let mut sizes = Vec::with_capacity(items.len());
        for r in &items {
            let total = length.map(r.number(&self.value));
            ribbons.push(bar.path(total)?);
            sizes.push(bar.bounds(total)?.height());
        }

        let key = |r: &Record| r.key(&self.label).unwrap_or(DatumKey::Index(0));
        let emphasis: Vec<_> = (0..items.len()).map(|i| pass.emphasis(i)).collect();
        pass.join(layers::MARKS, &items, JoinBy::Key(&key), |r, i| {
            let text = TextShape::new(
                (self.label_width - 5.0, self.thickness / 2.0),
                field_text(r, &self.label),
            )
            .with_font_size(self.font_size)
            .with_font_weight(FontWeight::BOLD.0)
            .with_anchor(TextAnchor::End)
            .with_baseline(TextBaseline::Middle);
            smallvec![
                Shape::path("mark", ribbons[i].clone())
                    .with_fill(self.fill.clone())
                    .with_stroke(self.stroke.clone(), 1.0)
                    .with_opacity(emphasis[i].opacity(1.0)),
                Shape::text("label", text).with_opacity(0.9),
            ]
        });

        let offsets: Vec<Vec2> =
            layout_vertical_with_aggregation(&sizes, self.spacing, |i| items[i].is_aggregate())
                .into_iter()
                .map(|y| Vec2::new(plot.x0, plot.y0 + y))
                .collect();
        pass.set_offsets(layers::MARKS, &offsets);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use plates_core::{Scene, Selection, Viewport};
    use plates_text::HeuristicTextMeasurer;

    use super::*;
    use crate::plate::{PlateKind, PlateSpec, RenderContext};
    use crate::title::TitleSpec;

    fn occupations() -> Vec<Record> {
        [
            ("farmers", 400.0),
            ("laborers", 200.0),
            ("barbers", 3.0),
            ("tailors", 2.0),
            ("cooks", 100.0),
        ]
        .iter()
        .map(|&(name, count)| Record::new().with("occupation", name).with("count", count))
        .collect()
    }

    #[test]
    fn small_categories_fold_into_a_trailing_bucket() {
        let spec = WrappedBarsSpec::new("occupation", "count")
            .with_aggregation(Aggregation::new("count", 10.0, "occupation", "others"));
        let plate = PlateSpec::new("data08", TitleSpec::new(""), PlateKind::WrappedBars(spec));
        let data = occupations();
        let mut scene = Scene::new();
        let ctx = RenderContext {
            data: &data,
            viewport: Viewport::new(640.0, 800.0),
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();

        let nodes = scene.layer(layers::MARKS).unwrap().nodes();
        let keys: Vec<&str> = nodes.iter().filter_map(|n| n.key().as_text()).collect();
        assert_eq!(keys, ["farmers", "laborers", "cooks", "others"]);

        // The largest bar folds into four rows of 20 with 10-unit gaps: 110 tall.
        let farmers = nodes[0].bounds().unwrap();
        assert!((farmers.height() - 110.0).abs() < 1e-6);
        // Offsets follow the flow, with one extra spacing before the bucket.
        let y: Vec<f64> = nodes.iter().map(|n| n.offset().y).collect();
        assert_eq!(y[0], 20.0);
        assert!(y[1] > y[0] + 110.0);
        let cooks_end = y[2] + nodes[2].bounds().unwrap().height();
        assert!(y[3] >= cooks_end + 2.0 * 16.0 - 1e-6);
    }

    #[test]
    fn negative_count_is_skipped() {
        let mut data = occupations();
        data.push(Record::new().with("occupation", "unknown").with("count", -5.0));
        let plate = PlateSpec::new(
            "data08",
            TitleSpec::new(""),
            PlateKind::WrappedBars(WrappedBarsSpec::new("occupation", "count")),
        );
        let mut scene = Scene::new();
        let ctx = RenderContext {
            data: &data,
            viewport: Viewport::new(640.0, 800.0),
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        let outcome = plate.render(&ctx, &mut scene).unwrap();
        assert_eq!(outcome.summary().map(|s| s.skipped), Some(1));
        assert_eq!(scene.layer(layers::MARKS).unwrap().nodes().len(), 5);
    }
}
