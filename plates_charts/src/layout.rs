// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Layout: vertical flow of variable-size items, aggregation of small records, and the plate
//! frame.
//!
//! Everything here is recomputed from scratch on every pass; nothing is cached between passes.

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::Rect;
use plates_core::{Record, Viewport};
use plates_text::TextMeasurer;

use crate::title::TitleSpec;

/// Stacks items top to bottom: `o[0] = 0`, `o[i] = o[i-1] + sizes[i-1] + spacing`.
pub fn layout_vertical(sizes: &[f64], spacing: f64) -> Vec<f64> {
    let mut cursor = 0.0;
    sizes
        .iter()
        .map(|size| {
            let offset = cursor;
            cursor += size + spacing;
            offset
        })
        .collect()
}

/// Stacks items like [`layout_vertical`], collapsing aggregate items into one shared slot.
///
/// Non-aggregate items flow normally. At the first aggregate item one extra `spacing` is
/// inserted and the run start is remembered; aggregate items do not advance the flow. Every
/// aggregate item is then placed at `(run_start + end_of_flow) / 2`.
///
/// With no aggregate items this equals [`layout_vertical`]. If every item is aggregate, they all
/// sit at `0`.
pub fn layout_vertical_with_aggregation(
    sizes: &[f64],
    spacing: f64,
    is_aggregate: impl Fn(usize) -> bool,
) -> Vec<f64> {
    let mut offsets = vec![0.0; sizes.len()];
    let mut cursor = 0.0;
    let mut run_start = None;
    let mut flowed = 0_usize;
    for (i, size) in sizes.iter().enumerate() {
        if is_aggregate(i) {
            if run_start.is_none() {
                cursor += spacing;
                run_start = Some(cursor);
            }
            continue;
        }
        offsets[i] = cursor;
        cursor += size + spacing;
        flowed += 1;
    }

    if let Some(start) = run_start {
        let slot = if flowed == 0 {
            0.0
        } else {
            (start + cursor) / 2.0
        };
        for (i, offset) in offsets.iter_mut().enumerate() {
            if is_aggregate(i) {
                *offset = slot;
            }
        }
    }
    offsets
}

/// Folds records whose measure is below a threshold into one synthetic bucket record.
#[derive(Clone, Debug, PartialEq)]
pub struct Aggregation {
    /// Numeric field compared against the threshold and summed into the bucket.
    pub measure: Arc<str>,
    /// Records with `measure < threshold` are bucket members.
    pub threshold: f64,
    /// Field that carries the bucket's label (and usually the join key).
    pub label_field: Arc<str>,
    /// The bucket's label.
    pub label: Arc<str>,
}

impl Aggregation {
    /// Creates an aggregation rule.
    pub fn new(
        measure: impl Into<Arc<str>>,
        threshold: f64,
        label_field: impl Into<Arc<str>>,
        label: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            measure: measure.into(),
            threshold,
            label_field: label_field.into(),
            label: label.into(),
        }
    }

    /// Returns `true` if `record` folds into the bucket.
    ///
    /// Buckets themselves and records with a non-finite measure are never members.
    pub fn is_member(&self, record: &Record) -> bool {
        let v = record.number(&self.measure);
        !record.is_aggregate() && v.is_finite() && v < self.threshold
    }

    /// Returns `records` followed by one bucket summing every member.
    ///
    /// No bucket is added when nothing is below the threshold, or when `records` already holds a
    /// bucket, so applying this twice is the same as applying it once.
    pub fn apply(&self, records: &[Record]) -> Vec<Record> {
        let mut out = records.to_vec();
        if records.iter().any(Record::is_aggregate) {
            return out;
        }
        let members = records.iter().filter(|r| self.is_member(r));
        let (count, total) = members.fold((0_usize, 0.0), |(n, sum), r| {
            (n + 1, sum + r.number(&self.measure))
        });
        if count > 0 {
            out.push(
                Record::new()
                    .with(self.label_field.clone(), self.label.clone())
                    .with(self.measure.clone(), total)
                    .into_aggregate(),
            );
        }
        out
    }
}

/// Where the title block sits relative to the plot.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum TitlePlacement {
    /// Title column on the left; the plot takes the rest of the width.
    #[default]
    Left,
    /// Title band on top; the plot takes the rest of the height.
    Top,
}

/// Per-side spacing around the plate content.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margins {
    /// Creates margins from the four sides.
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }

    /// Creates equal margins on every side.
    pub const fn uniform(v: f64) -> Self {
        Self::new(v, v, v, v)
    }
}

/// Output of [`PlateFrame::arrange`].
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct PlateFrame {
    /// The whole viewport.
    pub view: Rect,
    /// The measured title block.
    pub title: Rect,
    /// The area left for data.
    pub plot: Rect,
}

impl PlateFrame {
    /// Measures the title and splits the viewport into title and plot areas.
    ///
    /// The title block starts at the top-left margin corner. With [`TitlePlacement::Left`] the plot
    /// begins one left margin past the block's right edge; with [`TitlePlacement::Top`] it begins
    /// one top margin below the block. The plot never has negative size.
    pub fn arrange(
        viewport: Viewport,
        margins: Margins,
        title: &TitleSpec,
        measurer: &dyn TextMeasurer,
    ) -> Self {
        let view = Rect::new(0.0, 0.0, viewport.width.max(0.0), viewport.height.max(0.0));
        let inner = Rect::new(
            margins.left,
            margins.top,
            view.x1 - margins.right,
            view.y1 - margins.bottom,
        );
        let block = title.measure(measurer);
        let title_rect = Rect::new(
            inner.x0,
            inner.y0,
            inner.x0 + block.width,
            inner.y0 + block.height,
        );
        let (x0, y0) = match title.placement {
            TitlePlacement::Left if block.width > 0.0 => (title_rect.x1 + margins.left, inner.y0),
            TitlePlacement::Top if block.height > 0.0 => (inner.x0, title_rect.y1 + margins.top),
            _ => (inner.x0, inner.y0),
        };
        let plot = Rect::new(x0, y0, inner.x1.max(x0), inner.y1.max(y0));
        Self {
            view,
            title: title_rect,
            plot,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use plates_text::HeuristicTextMeasurer;

    use super::*;

    #[test]
    fn vertical_flow_adds_size_and_spacing() {
        assert_eq!(
            layout_vertical(&[10.0, 20.0, 5.0], 5.0),
            vec![0.0, 15.0, 40.0]
        );
        assert!(layout_vertical(&[], 5.0).is_empty());
    }

    #[test]
    fn aggregation_free_layout_matches_vertical_flow() {
        let sizes = [12.0, 7.5, 30.0, 1.0];
        assert_eq!(
            layout_vertical_with_aggregation(&sizes, 4.0, |_| false),
            layout_vertical(&sizes, 4.0)
        );
    }

    #[test]
    fn trailing_aggregates_share_one_slot_after_an_extra_gap() {
        let sizes = [10.0; 6];
        let offsets = layout_vertical_with_aggregation(&sizes, 5.0, |i| i >= 3);
        assert_eq!(offsets, vec![0.0, 15.0, 30.0, 50.0, 50.0, 50.0]);
    }

    #[test]
    fn items_after_an_aggregate_run_keep_flowing() {
        let sizes = [10.0; 4];
        let offsets = layout_vertical_with_aggregation(&sizes, 5.0, |i| i == 1);
        // Extra gap before the run: item 2 starts at 15 + 5.
        assert_eq!(offsets[2], 20.0);
        assert_eq!(offsets[3], 35.0);
        // Run starts at 20, flow ends at 50.
        assert_eq!(offsets[1], 35.0);
    }

    #[test]
    fn all_aggregate_items_sit_at_zero() {
        let offsets = layout_vertical_with_aggregation(&[3.0, 4.0], 5.0, |_| true);
        assert_eq!(offsets, vec![0.0, 0.0]);
    }

    fn occupations() -> Vec<Record> {
        [("farmers", 500.0), ("barbers", 2.0), ("tailors", 3.0), ("cooks", 120.0)]
            .iter()
            .map(|&(name, count)| Record::new().with("occupation", name).with("count", count))
            .collect()
    }

    #[test]
    fn aggregation_appends_one_bucket_and_is_idempotent() {
        let rule = Aggregation::new("count", 10.0, "occupation", "others");
        let once = rule.apply(&occupations());
        assert_eq!(once.len(), 5);
        let bucket = &once[4];
        assert!(bucket.is_aggregate());
        assert_eq!(bucket.text("occupation"), Some("others"));
        assert_eq!(bucket.number("count"), 5.0);
        assert!(rule.is_member(&once[1]));
        assert!(!rule.is_member(bucket));

        let twice = rule.apply(&once);
        assert_eq!(twice, once);
    }

    #[test]
    fn aggregation_without_members_adds_nothing() {
        let rule = Aggregation::new("count", 1.0, "occupation", "others");
        assert_eq!(rule.apply(&occupations()), occupations());
    }

    #[test]
    fn left_title_pushes_plot_right() {
        let title = TitleSpec::new("AB\nABCD").with_font_size(10.0);
        let frame = PlateFrame::arrange(
            Viewport::new(400.0, 300.0),
            Margins::uniform(20.0),
            &title,
            &HeuristicTextMeasurer,
        );
        // Widest line: 4 glyphs × 6 = 24; two lines at 12.
        assert_eq!(frame.title, Rect::new(20.0, 20.0, 44.0, 44.0));
        assert_eq!(frame.plot, Rect::new(64.0, 20.0, 380.0, 280.0));
    }

    #[test]
    fn top_title_pushes_plot_down_and_plot_never_inverts() {
        let title = TitleSpec::new("WIP")
            .with_font_size(10.0)
            .with_placement(TitlePlacement::Top);
        let frame = PlateFrame::arrange(
            Viewport::new(400.0, 300.0),
            Margins::new(10.0, 20.0, 20.0, 20.0),
            &title,
            &HeuristicTextMeasurer,
        );
        assert_eq!(frame.plot, Rect::new(20.0, 32.0, 380.0, 280.0));

        let tiny = PlateFrame::arrange(
            Viewport::new(30.0, 30.0),
            Margins::uniform(20.0),
            &title,
            &HeuristicTextMeasurer,
        );
        assert!(tiny.plot.width() >= 0.0 && tiny.plot.height() >= 0.0);
    }
}
