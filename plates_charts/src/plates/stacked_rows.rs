// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::format;
use alloc::sync::Arc;
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::{Brush, Color};
use plates_core::{DatumKey, JoinBy, Record, Shape, Shapes, TextAnchor, TextBaseline, TextShape};
use plates_text::FontWeight;

use super::{fade, field_text, palette, pick};
use crate::error::PlateError;
use crate::geometry::connector_path;
use crate::layers;
use crate::plate::{Pass, Plate};
use crate::scale::ScaleLinear;

/// One row of stacked percentage segments per record, with a legend row above and ribbons
/// linking each category between consecutive rows.
///
/// Segments follow `categories` left to right; the plot width past `labels_size` is 100%. The
/// left column carries the row label and an optional note (an average, say).
#[derive(Clone, Debug, PartialEq)]
pub struct StackedRowsSpec {
    /// Row label field; also the join key.
    pub row_label: Arc<str>,
    /// Field printed right-aligned in the label column.
    pub note: Option<Arc<str>>,
    /// Prepended to notes.
    pub note_prefix: Arc<str>,
    /// Percentage fields, in stacking order.
    pub categories: Vec<Arc<str>>,
    /// Category colors.
    pub palette: Vec<Brush>,
    /// Segment and legend swatch height.
    pub bar_size: f64,
    /// Width of the label column.
    pub labels_size: f64,
    /// Height reserved above the rows for the legend.
    pub legend_height: f64,
    /// Whether to draw ribbons between rows.
    pub connectors: bool,
    /// Segment outline.
    pub stroke: Brush,
}

impl StackedRowsSpec {
    /// Creates stacked rows over `categories` in the period palette.
    pub fn new<I, S>(row_label: impl Into<Arc<str>>, categories: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<Arc<str>>,
    {
        Self {
            row_label: row_label.into(),
            note: None,
            note_prefix: "$".into(),
            categories: categories.into_iter().map(Into::into).collect(),
            palette: palette(&[
                "#dc143c", "#4682b4", "#ffd700", "#654321", "#d2b48c", "#7e6583", "#00aa00",
                "#ffc0cb", "#654321", "#000000",
            ]),
            bar_size: 24.0,
            labels_size: 165.0,
            legend_height: 56.0,
            connectors: true,
            stroke: Color::from_rgb8(0x65, 0x43, 0x21).with_alpha(0.2).into(),
        }
    }

    /// Prints `field` in the label column.
    #[must_use]
    pub fn with_note(mut self, field: impl Into<Arc<str>>) -> Self {
        self.note = Some(field.into());
        self
    }

    /// Turns connector ribbons on or off.
    #[must_use]
    pub fn with_connectors(mut self, connectors: bool) -> Self {
        self.connectors = connectors;
        self
    }

    fn segment_fill(&self, j: usize) -> Option<Brush> {
        pick(&self.palette, j).map(|b| fade(b, 0.4))
    }
}

impl Plate for StackedRowsSpec {
    fn numeric_fields(&self) -> Vec<&str> {
        self.categories.iter().map(|c| &**c).collect()
    }

    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError> {
        let records = pass.records();
        let plot = pass.plot();
        let bars_x = plot.x0 + self.labels_size;
        let x = ScaleLinear::new((0.0, 100.0), (0.0, (plot.width() - self.labels_size).max(0.0)));
        let rows = ScaleLinear::new(
            (0.0, records.len() as f64),
            (plot.y0 + self.legend_height, plot.y1),
        );

        let segments: Vec<Vec<Rect>> = records
            .iter()
            .enumerate()
            .map(|(i, r)| {
                let y = rows.map(i as f64);
                let mut acc = 0.0;
                self.categories
                    .iter()
                    .map(|c| {
                        let v = r.number(c);
                        let rect = Rect::new(
                            bars_x + x.map(acc),
                            y,
                            bars_x + x.map(acc + v),
                            y + self.bar_size,
                        );
                        acc += v;
                        rect
                    })
                    .collect()
            })
            .collect();

        // Legend: equal swatches with upper-cased names above.
        let step = 100.0 / self.categories.len().max(1) as f64;
        let legend_key = |c: &Arc<str>| DatumKey::text(c.clone());
        pass.join(
            layers::LEGEND,
            self.categories.as_slice(),
            JoinBy::Key(&legend_key),
            |c, j| {
                let x0 = bars_x + x.map(j as f64 * step);
                let x1 = bars_x + x.map((j + 1) as f64 * step);
                let mut swatch = Shape::rect(
                    "legend-swatch",
                    Rect::new(x0, plot.y0 + 16.0, x1, plot.y0 + 16.0 + self.bar_size),
                )
                .with_stroke(self.stroke.clone(), 2.0);
                if let Some(fill) = self.segment_fill(j) {
                    swatch = swatch.with_fill(fill);
                }
                let name = TextShape::new(((x0 + x1) / 2.0, plot.y0 + 8.0), c.to_uppercase())
                    .with_font_size(14.0)
                    .with_anchor(TextAnchor::Middle)
                    .with_baseline(TextBaseline::Middle);
                let mut shapes = Shapes::new();
                shapes.push(swatch);
                shapes.push(Shape::text("legend-label", name).with_opacity(0.9));
                shapes
            },
        );

        let key = |r: &Record| r.key(&self.row_label).unwrap_or(DatumKey::Index(0));

        if self.connectors && records.len() > 1 {
            let ribbons: Vec<Vec<_>> = segments
                .windows(2)
                .map(|pair| {
                    pair[0]
                        .iter()
                        .zip(&pair[1])
                        .map(|(&from, &to)| connector_path(from, to))
                        .collect()
                })
                .collect();
            pass.join(
                layers::CONNECTORS,
                &records[1..],
                JoinBy::Key(&key),
                |_, i| {
                    ribbons[i]
                        .iter()
                        .enumerate()
                        .map(|(j, path)| {
                            let mut ribbon = Shape::path("connector", path.clone());
                            if let Some(fill) = pick(&self.palette, j) {
                                ribbon = ribbon.with_fill(fade(fill, 0.2));
                            }
                            ribbon
                        })
                        .collect()
                },
            );
        } else {
            pass.clear(layers::CONNECTORS);
        }

        let emphasis: Vec<_> = (0..records.len()).map(|i| pass.emphasis(i)).collect();
        pass.join(layers::MARKS, records, JoinBy::Key(&key), |r, i| {
            let opacity = emphasis[i].opacity(1.0);
            let mid = rows.map(i as f64) + self.bar_size / 2.0;
            let mut shapes: Shapes = segments[i]
                .iter()
                .enumerate()
                .map(|(j, rect)| {
                    let mut segment = Shape::rect("segment", *rect)
                        .with_stroke(self.stroke.clone(), 2.0)
                        .with_opacity(opacity);
                    if let Some(fill) = self.segment_fill(j) {
                        segment = segment.with_fill(fill);
                    }
                    segment
                })
                .collect();
            let label = TextShape::new((plot.x0 + 35.0, mid), field_text(r, &self.row_label))
                .with_font_size(12.0)
                .with_baseline(TextBaseline::Middle);
            shapes.push(Shape::text("row-label", label).with_opacity(0.9));
            if let Some(note) = &self.note {
                let text = format!("{}{}", self.note_prefix, field_text(r, note));
                let note = TextShape::new((bars_x - 15.0, mid), text)
                    .with_font_size(12.0)
                    .with_font_weight(FontWeight::BOLD.0)
                    .with_anchor(TextAnchor::End)
                    .with_baseline(TextBaseline::Middle);
                shapes.push(Shape::text("row-note", note).with_opacity(0.9));
            }
            shapes
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::vec;

    use plates_core::{Geometry, Scene, Selection, Viewport};
    use plates_text::HeuristicTextMeasurer;

    use super::*;
    use crate::plate::{PlateKind, PlateSpec, RenderContext};
    use crate::title::TitleSpec;

    fn budgets() -> Vec<Record> {
        vec![
            Record::new()
                .with("income_class", "$100-200")
                .with("actual_average", 139.1)
                .with("rent", 19.0)
                .with("food", 43.0)
                .with("other", 38.0),
            Record::new()
                .with("income_class", "$200-300")
                .with("actual_average", 249.45)
                .with("rent", 22.0)
                .with("food", 47.0)
                .with("other", 31.0),
            Record::new()
                .with("income_class", "$300-400")
                .with("actual_average", 335.66)
                .with("rent", 23.0)
                .with("food", 43.0)
                .with("other", 34.0),
        ]
    }

    fn render(data: &[Record], scene: &mut Scene) {
        let spec = StackedRowsSpec::new("income_class", ["rent", "food", "other"])
            .with_note("actual_average");
        let plate = PlateSpec::new("data10", TitleSpec::new(""), PlateKind::StackedRows(spec));
        let ctx = RenderContext {
            data,
            viewport: Viewport::new(505.0, 400.0),
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, scene).unwrap();
    }

    #[test]
    fn segments_stack_to_full_width() {
        let mut scene = Scene::new();
        render(&budgets(), &mut scene);
        let rows = scene.layer(layers::MARKS).unwrap().nodes();
        assert_eq!(rows.len(), 3);
        // Bars span 20 + 165 = 185 to 485.
        let Geometry::Rect(last) = &rows[0].shapes()[2].geometry else {
            panic!("expected rect");
        };
        assert!((last.x1 - 485.0).abs() < 1e-9);
        let Geometry::Rect(food) = &rows[0].shapes()[1].geometry else {
            panic!("expected rect");
        };
        assert!((food.x0 - (185.0 + 19.0 * 3.0)).abs() < 1e-9);

        let Geometry::Text(note) = &rows[1].shapes()[4].geometry else {
            panic!("expected text");
        };
        assert_eq!(note.text, "$249.45");

        let legend = scene.layer(layers::LEGEND).unwrap().nodes();
        let Geometry::Text(name) = &legend[1].shapes()[1].geometry else {
            panic!("expected text");
        };
        assert_eq!(name.text, "FOOD");
    }

    #[test]
    fn connectors_link_consecutive_rows() {
        let mut scene = Scene::new();
        render(&budgets(), &mut scene);
        let connectors = scene.layer(layers::CONNECTORS).unwrap().nodes();
        assert_eq!(connectors.len(), 2);
        assert_eq!(connectors[0].shapes().len(), 3);
        assert_eq!(connectors[0].key(), &DatumKey::text("$200-300"));

        // Dropping to a single row removes the ribbons.
        render(&budgets()[..1], &mut scene);
        assert!(scene.layer(layers::CONNECTORS).is_none());
    }
}
