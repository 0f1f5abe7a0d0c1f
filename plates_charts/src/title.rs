// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plate titles.
//!
//! A title is a block of lines stacked at 1.2em. It takes part in layout (it reserves space in
//! [`crate::PlateFrame`]) and is rendered as one text shape per line.

use alloc::string::{String, ToString};
use alloc::vec::Vec;

use kurbo::Rect;
use peniko::Brush;
use peniko::color::palette::css;
use plates_core::{Shape, Shapes, TextBaseline, TextShape};
use plates_text::{BlockMetrics, TextMeasurer, TextStyle};

use crate::layout::TitlePlacement;

/// A plate-level title block.
#[derive(Clone, Debug, PartialEq)]
pub struct TitleSpec {
    /// Title text; `\n` separates lines.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// Whether lines are upper-cased before measuring and drawing.
    pub uppercase: bool,
    /// Where the block sits relative to the plot.
    pub placement: TitlePlacement,
    /// Fill paint.
    pub fill: Brush,
    /// Opacity of the whole block.
    pub opacity: f64,
}

impl TitleSpec {
    /// Creates a 32px left-placed title.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            font_size: 32.0,
            uppercase: false,
            placement: TitlePlacement::Left,
            fill: css::BLACK.into(),
            opacity: 0.7,
        }
    }

    /// Sets the font size.
    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Upper-cases the title lines.
    #[must_use]
    pub fn with_uppercase(mut self, uppercase: bool) -> Self {
        self.uppercase = uppercase;
        self
    }

    /// Sets the placement.
    #[must_use]
    pub fn with_placement(mut self, placement: TitlePlacement) -> Self {
        self.placement = placement;
        self
    }

    /// Sets the fill paint.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = fill.into();
        self
    }

    /// Returns the lines as drawn. Trailing whitespace is dropped; an empty title has no lines.
    pub fn lines(&self) -> Vec<String> {
        if self.text.trim().is_empty() {
            return Vec::new();
        }
        self.text
            .split('\n')
            .map(|line| {
                let line = line.trim_end();
                if self.uppercase {
                    line.to_uppercase()
                } else {
                    line.to_string()
                }
            })
            .collect()
    }

    /// Measures the block.
    pub fn measure(&self, measurer: &dyn TextMeasurer) -> BlockMetrics {
        let lines = self.lines();
        let lines: Vec<&str> = lines.iter().map(String::as_str).collect();
        measurer.measure_block(&lines, TextStyle::new(self.font_size))
    }

    /// Returns one text shape per line, the first baseline one line below `rect.y0`.
    pub fn shapes(&self, rect: Rect, measurer: &dyn TextMeasurer) -> Shapes {
        let line_height = self.measure(measurer).line_height;
        self.lines()
            .into_iter()
            .enumerate()
            .map(|(i, line)| {
                let y = rect.y0 + line_height * (i + 1) as f64;
                Shape::text(
                    "title",
                    TextShape::new((rect.x0, y), line)
                        .with_font_size(self.font_size)
                        .with_baseline(TextBaseline::Alphabetic),
                )
                .with_fill(self.fill.clone())
                .with_opacity(self.opacity)
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use plates_core::Geometry;
    use plates_text::HeuristicTextMeasurer;

    use super::*;

    #[test]
    fn lines_split_trim_and_uppercase() {
        let title = TitleSpec::new("Acres of \nland \nowned").with_uppercase(true);
        assert_eq!(title.lines(), ["ACRES OF", "LAND", "OWNED"]);
        assert!(TitleSpec::new("  ").lines().is_empty());
    }

    #[test]
    fn one_text_shape_per_line_at_line_pitch() {
        let title = TitleSpec::new("a\nb").with_font_size(10.0);
        let shapes = title.shapes(Rect::new(20.0, 20.0, 100.0, 100.0), &HeuristicTextMeasurer);
        assert_eq!(shapes.len(), 2);
        let Geometry::Text(second) = &shapes[1].geometry else {
            panic!("expected text");
        };
        assert_eq!(second.text, "b");
        assert!((second.pos.y - 44.0).abs() < 1e-9);
        assert_eq!(second.pos.x, 20.0);
    }
}
