// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement for plate layout.
//!
//! Plate frames reserve room for a title block before the plot area is known, and a few plates
//! size label columns from their widest label. Both need text extents, but shaping belongs to the
//! host, so plate code only sees the [`TextMeasurer`] trait.
//!
//! [`HeuristicTextMeasurer`] is good enough for tests and for output viewed in a browser that
//! re-lays the text itself.

#![no_std]

extern crate alloc;

use alloc::sync::Arc;

/// Measures single lines of text.
pub trait TextMeasurer {
    /// Measures `text` as one line.
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics;

    /// Measures a block of lines stacked at [`LINE_HEIGHT_EM`] spacing.
    ///
    /// The block width is the widest line; its height is `lines × line_height`. An empty block
    /// measures zero.
    fn measure_block(&self, lines: &[&str], style: TextStyle) -> BlockMetrics {
        let line_height = LINE_HEIGHT_EM * style.font_size;
        let width = lines
            .iter()
            .map(|line| self.measure(line, style.clone()).advance_width)
            .fold(0.0, f64::max);
        BlockMetrics {
            width,
            height: line_height * lines.len() as f64,
            line_height,
        }
    }
}

/// Line pitch of a text block, in ems.
pub const LINE_HEIGHT_EM: f64 = 1.2;

/// Text style inputs that affect measurement.
#[derive(Clone, Debug, PartialEq)]
pub struct TextStyle {
    /// Font size in scene units.
    pub font_size: f64,
    /// The preferred font family.
    pub font_family: FontFamily,
    /// Font weight (`400` normal, `700` bold).
    pub font_weight: FontWeight,
}

impl TextStyle {
    /// Creates a normal-weight sans-serif style.
    #[must_use]
    pub fn new(font_size: f64) -> Self {
        Self {
            font_size,
            font_family: FontFamily::SansSerif,
            font_weight: FontWeight::NORMAL,
        }
    }

    /// Sets the weight.
    #[must_use]
    pub fn with_weight(mut self, weight: FontWeight) -> Self {
        self.font_weight = weight;
        self
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self::new(12.0)
    }
}

/// Font family selection.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum FontFamily {
    /// CSS `serif`.
    Serif,
    /// CSS `sans-serif`.
    SansSerif,
    /// CSS `monospace`.
    Monospace,
    /// A named family such as `"Inter"`.
    Named(Arc<str>),
}

impl FontFamily {
    /// Returns the CSS family string.
    #[must_use]
    pub fn as_css_family(&self) -> &str {
        match self {
            Self::Serif => "serif",
            Self::SansSerif => "sans-serif",
            Self::Monospace => "monospace",
            Self::Named(name) => name,
        }
    }
}

/// CSS-style font weights.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FontWeight(pub u16);

impl FontWeight {
    /// Normal weight (`400`).
    pub const NORMAL: Self = Self(400);
    /// Bold weight (`700`).
    pub const BOLD: Self = Self(700);
}

/// Metrics of one measured line.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct TextMetrics {
    /// Advance width.
    pub advance_width: f64,
    /// Baseline to top of typical glyphs.
    pub ascent: f64,
    /// Baseline to bottom of typical glyphs.
    pub descent: f64,
}

impl TextMetrics {
    /// Returns `ascent + descent`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.ascent + self.descent
    }
}

/// Extent of a multi-line block.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct BlockMetrics {
    /// Width of the widest line.
    pub width: f64,
    /// Total height of all lines.
    pub height: f64,
    /// Pitch between consecutive baselines.
    pub line_height: f64,
}

/// A heuristic measurer: ~0.6em per glyph, baseline at 0.8em. Bold text is 10% wider.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    fn measure(&self, text: &str, style: TextStyle) -> TextMetrics {
        let glyph = if style.font_weight >= FontWeight::BOLD {
            0.66
        } else {
            0.6
        };
        TextMetrics {
            advance_width: glyph * style.font_size * text.chars().count() as f64,
            ascent: 0.8 * style.font_size,
            descent: 0.2 * style.font_size,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn heuristic_counts_chars_not_bytes() {
        let m = HeuristicTextMeasurer.measure("ÅÅ", TextStyle::new(10.0));
        assert!((m.advance_width - 12.0).abs() < 1e-9);
        assert!((m.height() - 10.0).abs() < 1e-9);
    }

    #[test]
    fn block_takes_widest_line_and_stacks_lines() {
        let block =
            HeuristicTextMeasurer.measure_block(&["LAND", "VALUES BY"], TextStyle::new(10.0));
        assert!((block.width - 54.0).abs() < 1e-9);
        assert!((block.height - 24.0).abs() < 1e-9);
        assert_eq!(
            HeuristicTextMeasurer.measure_block(&[], TextStyle::new(10.0)),
            BlockMetrics {
                width: 0.0,
                height: 0.0,
                line_height: 12.0
            }
        );
    }
}
