// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::Brush;
use plates_core::{DatumKey, JoinBy, Record, Shape};
use plates_text::FontWeight;
use smallvec::smallvec;

use super::{format_number, label, palette, pick};
use crate::error::PlateError;
use crate::geometry::ring;
use crate::layers;
use crate::plate::{Pass, Plate};
use crate::scale::{ScaleLinear, extent};

/// Concentric discs centered in the plot, one per year.
///
/// The radius scale maps `[0, max value]` onto `[0, min(plot width, plot height) / 2]`. Discs are
/// drawn largest first so every one stays visible, and each carries its year just below its
/// bottom edge.
#[derive(Clone, Debug, PartialEq)]
pub struct RingsSpec {
    /// Year field; also the join key.
    pub year: Arc<str>,
    /// Value field.
    pub value: Arc<str>,
    /// Disc fills in drawing order.
    pub palette: Vec<Brush>,
    /// Year label font size.
    pub font_size: f64,
    /// Year label opacity.
    pub label_opacity: f64,
}

impl RingsSpec {
    /// Creates rings in the period palette.
    pub fn new(year: impl Into<Arc<str>>, value: impl Into<Arc<str>>) -> Self {
        Self {
            year: year.into(),
            value: value.into(),
            palette: palette(&[
                "#7e6583", "#4682b4", "#00aa00", "#dc143c", "#ffc0cb", "#ffd700", "#d2b48c",
                "#654321", "#000000",
            ]),
            font_size: 14.0,
            label_opacity: 0.7,
        }
    }

    /// Sets the fills.
    #[must_use]
    pub fn with_palette(mut self, palette: Vec<Brush>) -> Self {
        self.palette = palette;
        self
    }
}

impl Plate for RingsSpec {
    fn numeric_fields(&self) -> Vec<&str> {
        vec![&*self.year, &*self.value]
    }

    fn magnitude_fields(&self) -> Vec<&str> {
        vec![&*self.value]
    }

    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError> {
        let mut records = pass.records().to_vec();
        records.sort_by(|a, b| b.number(&self.value).total_cmp(&a.number(&self.value)));
        let Some((_, max)) = extent(&records, |r| r.number(&self.value)) else {
            return Ok(());
        };

        let plot = pass.plot();
        let center = plot.center();
        let radius = ScaleLinear::new((0.0, max), (0.0, plot.width().min(plot.height()) / 2.0));
        let radii: Vec<f64> = records
            .iter()
            .map(|r| radius.map(r.number(&self.value)))
            .collect();
        let discs = radii
            .iter()
            .map(|&r| ring(center, 0.0, r))
            .collect::<Result<Vec<_>, _>>()?;

        let key = |r: &Record| DatumKey::number(r.number(&self.year));
        let emphasis: Vec<_> = (0..records.len()).map(|i| pass.emphasis(i)).collect();
        pass.join(layers::MARKS, &records, JoinBy::Key(&key), |_, i| {
            let mut disc =
                Shape::path("mark", discs[i].clone()).with_opacity(emphasis[i].opacity(1.0));
            if let Some(fill) = pick(&self.palette, i) {
                disc = disc.with_fill(fill.clone());
            }
            smallvec![disc]
        });
        pass.join(layers::LABELS, &records, JoinBy::Key(&key), |r, i| {
            let pos = Point::new(center.x, center.y + radii[i]);
            let text = label(pos, format_number(r.number(&self.year)), self.font_size)
                .with_font_weight(FontWeight::BOLD.0);
            smallvec![Shape::text("label-year", text).with_opacity(self.label_opacity)]
        });
        Ok(())
    }
}
