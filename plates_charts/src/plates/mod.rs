// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The plate kinds.

mod choropleth;
mod gauge;
mod line;
mod rings;
mod split_pie;
mod stacked_rows;
mod value_bars;
mod wrapped_bars;

use alloc::string::String;
use alloc::vec::Vec;

use kurbo::Point;
use peniko::{Brush, Color};
use plates_core::{Record, TextAnchor, TextBaseline, TextShape, Value};

pub use choropleth::{ChoroplethSpec, Feature};
pub use gauge::GaugeSpec;
pub use line::LineSpec;
pub use rings::RingsSpec;
pub use split_pie::{PieGroup, SplitPieSpec};
pub use stacked_rows::StackedRowsSpec;
pub use value_bars::ValueBarsSpec;
pub use wrapped_bars::WrappedBarsSpec;

/// Parses `#rrggbb` palette entries. Malformed entries fall back to black.
pub(crate) fn palette(hex: &[&str]) -> Vec<Brush> {
    hex.iter()
        .map(|h| {
            let rgb = h.strip_prefix('#').and_then(|h| u32::from_str_radix(h, 16).ok());
            let rgb = rgb.unwrap_or(0);
            let [_, r, g, b] = rgb.to_be_bytes();
            Brush::Solid(Color::from_rgb8(r, g, b))
        })
        .collect()
}

/// Returns the `i`-th palette entry, wrapping around.
pub(crate) fn pick(palette: &[Brush], i: usize) -> Option<&Brush> {
    (!palette.is_empty()).then(|| &palette[i % palette.len()])
}

/// Scales the alpha of a solid brush; other brushes are returned as-is.
pub(crate) fn fade(brush: &Brush, alpha: f32) -> Brush {
    match brush {
        Brush::Solid(color) => Brush::Solid(color.multiply_alpha(alpha)),
        other => other.clone(),
    }
}

/// A centered label.
pub(crate) fn label(pos: impl Into<Point>, text: impl Into<String>, font_size: f64) -> TextShape {
    TextShape::new(pos, text)
        .with_font_size(font_size)
        .with_anchor(TextAnchor::Middle)
        .with_baseline(TextBaseline::Hanging)
}

/// Formats a number the way the plates label values: integers without a fraction.
pub(crate) fn format_number(v: f64) -> String {
    alloc::format!("{v}")
}

/// Returns a field as label text; numbers print via [`format_number`], missing fields are empty.
pub(crate) fn field_text(record: &Record, field: &str) -> String {
    match record.get(field) {
        Some(Value::Number(v)) => format_number(*v),
        Some(Value::Text(s)) => String::from(&**s),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn palette_parses_hex_and_pick_wraps() {
        let colors = palette(&["#dc143c", "#4682b4"]);
        assert_eq!(colors[0], Brush::Solid(Color::from_rgb8(0xdc, 0x14, 0x3c)));
        assert_eq!(palette(&["oops"])[0], Brush::Solid(Color::from_rgb8(0, 0, 0)));
        assert_eq!(pick(&colors, 3), Some(&colors[1]));
        assert_eq!(pick(&[], 0), None);
        assert_eq!(
            fade(&colors[0], 0.5),
            Brush::Solid(Color::from_rgb8(0xdc, 0x14, 0x3c).with_alpha(0.5))
        );
    }

    #[test]
    fn whole_numbers_print_without_fraction() {
        assert_eq!(format_number(21186.0), "21186");
        assert_eq!(format_number(12.5), "12.5");
    }
}
