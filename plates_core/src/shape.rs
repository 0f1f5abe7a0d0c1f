// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Shapes: the leaf elements a node carries.
//!
//! A shape is one SVG-like element (rect, circle, path, or text) plus its paint. Geometry is in
//! node-local coordinates; the node's offset is applied on output.

use alloc::string::String;

use kurbo::{BezPath, Circle, Point, Rect, Shape as _};
use peniko::Brush;

/// The kind of element a [`Shape`] represents.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShapeKind {
    /// An axis-aligned rectangle.
    Rect,
    /// A circle.
    Circle,
    /// An arbitrary path.
    Path,
    /// A single line of text.
    Text,
}

/// Horizontal text anchoring.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    #[default]
    Start,
    /// Text is centered on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum TextBaseline {
    /// Alphabetic baseline.
    #[default]
    Alphabetic,
    /// Vertical middle.
    Middle,
    /// Hanging baseline (text hangs below the anchor point).
    Hanging,
}

/// A single line of unshaped text.
#[derive(Clone, Debug, PartialEq)]
pub struct TextShape {
    /// Anchor point.
    pub pos: Point,
    /// The text content.
    pub text: String,
    /// Font size in scene units.
    pub font_size: f64,
    /// CSS-style font weight.
    pub font_weight: u16,
    /// Horizontal anchoring.
    pub anchor: TextAnchor,
    /// Vertical alignment.
    pub baseline: TextBaseline,
}

impl TextShape {
    /// Creates a text shape with a 12px normal-weight font, start-anchored on the alphabetic
    /// baseline.
    pub fn new(pos: impl Into<Point>, text: impl Into<String>) -> Self {
        Self {
            pos: pos.into(),
            text: text.into(),
            font_size: 12.0,
            font_weight: 400,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Alphabetic,
        }
    }

    /// Sets the font size.
    #[must_use]
    pub fn with_font_size(mut self, font_size: f64) -> Self {
        self.font_size = font_size;
        self
    }

    /// Sets the font weight.
    #[must_use]
    pub fn with_font_weight(mut self, font_weight: u16) -> Self {
        self.font_weight = font_weight;
        self
    }

    /// Sets the horizontal anchor.
    #[must_use]
    pub fn with_anchor(mut self, anchor: TextAnchor) -> Self {
        self.anchor = anchor;
        self
    }

    /// Sets the baseline.
    #[must_use]
    pub fn with_baseline(mut self, baseline: TextBaseline) -> Self {
        self.baseline = baseline;
        self
    }
}

/// Geometry of a [`Shape`].
#[derive(Clone, Debug, PartialEq)]
pub enum Geometry {
    /// Rectangle.
    Rect(Rect),
    /// Circle.
    Circle(Circle),
    /// Path.
    Path(BezPath),
    /// Text.
    Text(TextShape),
}

/// A stroke paint and width.
#[derive(Clone, Debug, PartialEq)]
pub struct Stroke {
    /// Stroke paint.
    pub brush: Brush,
    /// Stroke width in scene units.
    pub width: f64,
}

/// One element owned by a [`crate::ShapeNode`].
#[derive(Clone, Debug, PartialEq)]
pub struct Shape {
    /// Role of this shape within its node (the SVG class, e.g. `"mark"` or `"label-year"`).
    pub role: &'static str,
    /// The geometry.
    pub geometry: Geometry,
    /// Fill paint; `None` means no fill.
    pub fill: Option<Brush>,
    /// Optional outline.
    pub stroke: Option<Stroke>,
    /// Overall opacity in `0..=1`.
    pub opacity: f64,
}

impl Shape {
    fn new(role: &'static str, geometry: Geometry) -> Self {
        Self {
            role,
            geometry,
            fill: None,
            stroke: None,
            opacity: 1.0,
        }
    }

    /// Creates a rectangle shape.
    pub fn rect(role: &'static str, rect: Rect) -> Self {
        Self::new(role, Geometry::Rect(rect))
    }

    /// Creates a circle shape.
    pub fn circle(role: &'static str, circle: Circle) -> Self {
        Self::new(role, Geometry::Circle(circle))
    }

    /// Creates a path shape.
    pub fn path(role: &'static str, path: BezPath) -> Self {
        Self::new(role, Geometry::Path(path))
    }

    /// Creates a text shape.
    pub fn text(role: &'static str, text: TextShape) -> Self {
        Self::new(role, Geometry::Text(text))
    }

    /// Sets the fill paint.
    #[must_use]
    pub fn with_fill(mut self, fill: impl Into<Brush>) -> Self {
        self.fill = Some(fill.into());
        self
    }

    /// Sets the outline.
    #[must_use]
    pub fn with_stroke(mut self, brush: impl Into<Brush>, width: f64) -> Self {
        self.stroke = Some(Stroke {
            brush: brush.into(),
            width,
        });
        self
    }

    /// Sets the overall opacity.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f64) -> Self {
        self.opacity = opacity.clamp(0.0, 1.0);
        self
    }

    /// Returns the element kind.
    pub fn kind(&self) -> ShapeKind {
        match self.geometry {
            Geometry::Rect(_) => ShapeKind::Rect,
            Geometry::Circle(_) => ShapeKind::Circle,
            Geometry::Path(_) => ShapeKind::Path,
            Geometry::Text(_) => ShapeKind::Text,
        }
    }

    /// Returns the geometric bounds in node-local coordinates.
    ///
    /// Text has no bounds here: measuring it needs a text backend.
    pub fn bounds(&self) -> Option<Rect> {
        match &self.geometry {
            Geometry::Rect(r) => Some(*r),
            Geometry::Circle(c) => Some(c.bounding_box()),
            Geometry::Path(p) => Some(p.bounding_box()),
            Geometry::Text(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::color::palette::css;

    use super::*;

    #[test]
    fn kinds_and_bounds() {
        let r = Shape::rect("mark", Rect::new(0.0, 0.0, 10.0, 5.0)).with_fill(css::GOLD);
        assert_eq!(r.kind(), ShapeKind::Rect);
        assert_eq!(r.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 5.0)));

        let c = Shape::circle("ring", Circle::new((5.0, 5.0), 5.0));
        assert_eq!(c.bounds(), Some(Rect::new(0.0, 0.0, 10.0, 10.0)));

        let t = Shape::text("label", TextShape::new((0.0, 0.0), "1880"));
        assert_eq!(t.kind(), ShapeKind::Text);
        assert!(t.bounds().is_none());
    }

    #[test]
    fn opacity_is_clamped() {
        let s = Shape::rect("mark", Rect::ZERO).with_opacity(3.0);
        assert_eq!(s.opacity, 1.0);
    }
}
