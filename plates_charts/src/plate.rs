// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plate configuration and the render pass.
//!
//! A [`PlateSpec`] describes one plate as data: the dataset it binds, its title, margins, and a
//! [`PlateKind`] naming the chart and its field accessors. [`PlateSpec::render`] runs one pass:
//! it filters out records with non-numeric fields or negative magnitudes, arranges the frame, joins the title, and hands
//! the rest to the kind's [`Plate`] implementation.

use alloc::sync::Arc;
use alloc::vec::Vec;
use core::fmt;

use kurbo::{Rect, Vec2};
use plates_core::{
    Emphasis, JoinBy, LayerId, Record, Scene, Selection, ShapeDiff, Shapes, SkipReason, Viewport,
};
use plates_text::TextMeasurer;

use crate::error::PlateError;
use crate::layers;
use crate::layout::{Margins, PlateFrame};
use crate::plates::{
    ChoroplethSpec, GaugeSpec, LineSpec, RingsSpec, SplitPieSpec, StackedRowsSpec, ValueBarsSpec,
    WrappedBarsSpec,
};
use crate::title::TitleSpec;

/// A chart type: which numeric fields it reads and how it turns records into nodes.
pub trait Plate {
    /// Fields every record must carry as finite numbers. Other records are skipped.
    fn numeric_fields(&self) -> Vec<&str>;

    /// Numeric fields drawn as a length, radius, or sweep. Records where one is negative are
    /// skipped.
    fn magnitude_fields(&self) -> Vec<&str> {
        Vec::new()
    }

    /// Joins the pass's records into the scene.
    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError>;
}

/// The chart a plate draws.
#[derive(Clone, Debug)]
pub enum PlateKind {
    /// Centered bars whose width follows the value, one per year.
    ValueBars(ValueBarsSpec),
    /// A value-over-time polyline with point markers.
    Line(LineSpec),
    /// Concentric discs, one per year.
    Rings(RingsSpec),
    /// Nested arcs sweeping up to a maximum angle.
    Gauge(GaugeSpec),
    /// Pies split into angular groups.
    SplitPie(SplitPieSpec),
    /// Snake bars stacked vertically, small categories folded into a bucket.
    WrappedBars(WrappedBarsSpec),
    /// Stacked percentage rows linked by ribbons.
    StackedRows(StackedRowsSpec),
    /// Filled polygon features.
    Choropleth(ChoroplethSpec),
}

impl PlateKind {
    fn plate(&self) -> &dyn Plate {
        match self {
            Self::ValueBars(p) => p,
            Self::Line(p) => p,
            Self::Rings(p) => p,
            Self::Gauge(p) => p,
            Self::SplitPie(p) => p,
            Self::WrappedBars(p) => p,
            Self::StackedRows(p) => p,
            Self::Choropleth(p) => p,
        }
    }
}

/// One plate: a dataset bound to a chart.
#[derive(Clone, Debug)]
pub struct PlateSpec {
    /// Name of the dataset to request from the provider.
    pub dataset: Arc<str>,
    /// The title block.
    pub title: TitleSpec,
    /// Space around the content.
    pub margins: Margins,
    /// The chart.
    pub kind: PlateKind,
}

impl PlateSpec {
    /// Creates a plate with 20-unit margins.
    pub fn new(dataset: impl Into<Arc<str>>, title: TitleSpec, kind: PlateKind) -> Self {
        Self {
            dataset: dataset.into(),
            title,
            margins: Margins::uniform(20.0),
            kind,
        }
    }

    /// Sets the margins.
    #[must_use]
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Runs one render pass into `scene`.
    ///
    /// Re-running with the same context leaves the scene unchanged and reports only unchanged
    /// updates.
    pub fn render(
        &self,
        ctx: &RenderContext<'_>,
        scene: &mut Scene,
    ) -> Result<RenderOutcome, PlateError> {
        if ctx.data.is_empty() {
            return Ok(RenderOutcome::Skipped(SkipReason::EmptyData));
        }
        if !ctx.viewport.is_ready() {
            return Ok(RenderOutcome::Skipped(SkipReason::ViewportNotReady));
        }

        let plate = self.kind.plate();
        let (records, skipped) =
            usable_records(ctx.data, &plate.numeric_fields(), &plate.magnitude_fields());
        if records.is_empty() {
            log::warn!("plate `{}`: no usable records", self.dataset);
            return Ok(RenderOutcome::Skipped(SkipReason::EmptyData));
        }

        let frame = PlateFrame::arrange(ctx.viewport, self.margins, &self.title, ctx.measurer);
        let diffs = scene.join_layer(
            layers::TITLE,
            core::slice::from_ref(&self.title),
            JoinBy::Index,
            |title, _| title.shapes(frame.title, ctx.measurer),
        );

        let mut pass = Pass {
            records: &records,
            plot: frame.plot,
            measurer: ctx.measurer,
            selected: ctx.selected,
            scene,
            diffs,
        };
        plate.render(&mut pass)?;

        let summary = RenderSummary {
            frame,
            drawn: records.len(),
            skipped,
            diffs: pass.diffs,
        };
        log::debug!(
            "plate `{}`: {} records drawn, {} skipped, {} changes",
            self.dataset,
            summary.drawn,
            summary.skipped,
            summary.changes()
        );
        Ok(RenderOutcome::Rendered(summary))
    }
}

fn usable_records(
    data: &[Record],
    numeric: &[&str],
    magnitudes: &[&str],
) -> (Vec<Record>, usize) {
    let mut records = Vec::with_capacity(data.len());
    let mut skipped = 0;
    for (i, record) in data.iter().enumerate() {
        if let Some(field) = numeric.iter().find(|f| !record.number(f).is_finite()) {
            log::warn!("skipping record {i}: field `{field}` is not a number");
            skipped += 1;
        } else if let Some(field) = magnitudes.iter().find(|f| record.number(f) < 0.0) {
            log::warn!("skipping record {i}: field `{field}` is negative");
            skipped += 1;
        } else {
            records.push(record.clone());
        }
    }
    (records, skipped)
}

/// Inputs of one render pass.
#[derive(Clone, Copy)]
pub struct RenderContext<'a> {
    /// The dataset.
    pub data: &'a [Record],
    /// The current viewport.
    pub viewport: Viewport,
    /// Text measurement backend.
    pub measurer: &'a dyn TextMeasurer,
    /// Current hover selection.
    pub selected: Selection,
}

impl fmt::Debug for RenderContext<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderContext")
            .field("records", &self.data.len())
            .field("viewport", &self.viewport)
            .field("selected", &self.selected)
            .finish_non_exhaustive()
    }
}

/// What a completed pass did.
#[derive(Clone, Debug, PartialEq)]
pub struct RenderSummary {
    /// Title and plot areas.
    pub frame: PlateFrame,
    /// Records that were drawn.
    pub drawn: usize,
    /// Records skipped for non-numeric fields or negative magnitudes.
    pub skipped: usize,
    /// Every node entered, updated, or removed, in join order.
    pub diffs: Vec<ShapeDiff>,
}

impl RenderSummary {
    /// Returns how many diffs actually changed the scene.
    pub fn changes(&self) -> usize {
        self.diffs.iter().filter(|d| d.is_change()).count()
    }
}

/// Result of a render request.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// Nothing was drawn; the scene was not touched.
    Skipped(SkipReason),
    /// The pass ran.
    Rendered(RenderSummary),
}

impl RenderOutcome {
    /// Returns the summary of a pass that ran.
    pub fn summary(&self) -> Option<&RenderSummary> {
        match self {
            Self::Rendered(summary) => Some(summary),
            Self::Skipped(_) => None,
        }
    }
}

/// The state a [`Plate`] renders through.
pub struct Pass<'a> {
    records: &'a [Record],
    plot: Rect,
    measurer: &'a dyn TextMeasurer,
    selected: Selection,
    scene: &'a mut Scene,
    diffs: Vec<ShapeDiff>,
}

impl<'a> Pass<'a> {
    /// Records that survived coercion, in dataset order.
    pub fn records(&self) -> &'a [Record] {
        self.records
    }

    /// The area available for data.
    pub fn plot(&self) -> Rect {
        self.plot
    }

    /// The text measurement backend.
    pub fn measurer(&self) -> &'a dyn TextMeasurer {
        self.measurer
    }

    /// Returns how the item drawn at `index` should be emphasized.
    pub fn emphasis(&self, index: usize) -> Emphasis {
        self.selected.emphasis(index)
    }

    /// Joins `data` into `layer`, recording the diffs.
    ///
    /// Empty `data` leaves the layer untouched; call [`Pass::clear`] to remove its nodes.
    pub fn join<T>(
        &mut self,
        layer: LayerId,
        data: &[T],
        by: JoinBy<'_, T>,
        build: impl FnMut(&T, usize) -> Shapes,
    ) {
        let diffs = self.scene.join_layer(layer, data, by, build);
        self.diffs.extend(diffs);
    }

    /// Removes `layer` and its nodes, recording their exits.
    pub fn clear(&mut self, layer: LayerId) {
        let diffs = self.scene.remove_layer(layer);
        self.diffs.extend(diffs);
    }

    /// Positions the nodes of `layer`.
    pub fn set_offsets(&mut self, layer: LayerId, offsets: &[Vec2]) {
        self.scene.set_offsets(layer, offsets);
    }
}

impl fmt::Debug for Pass<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pass")
            .field("records", &self.records.len())
            .field("plot", &self.plot)
            .field("selected", &self.selected)
            .field("diffs", &self.diffs.len())
            .finish_non_exhaustive()
    }
}
