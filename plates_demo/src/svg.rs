// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a plate's shape tree.

use kurbo::{Rect, Vec2};
use peniko::Brush;
use plates_core::{Geometry, Scene, Shape, TextAnchor, TextBaseline};

/// Serializes `scene` in paint order, one `<g>` per layer and per node.
pub(crate) fn to_svg_string(scene: &Scene, view: Rect) -> String {
    let mut out = String::new();
    out.push_str(r#"<svg xmlns="http://www.w3.org/2000/svg" "#);
    out.push_str(&format!(
        r#"viewBox="{} {} {} {}" width="{}" height="{}">"#,
        view.x0,
        view.y0,
        view.width(),
        view.height(),
        view.width(),
        view.height()
    ));
    out.push('\n');

    for layer in scene.layers() {
        out.push_str(&format!(r#"<g data-layer="{}""#, layer.id().0));
        write_translate(&mut out, layer.offset());
        out.push_str(">\n");
        for node in layer.nodes() {
            out.push_str(&format!(
                r#"<g data-key="{}""#,
                escape_xml(&node.key().to_string())
            ));
            write_translate(&mut out, node.offset());
            out.push_str(">\n");
            for shape in node.shapes() {
                write_shape(&mut out, shape);
            }
            out.push_str("</g>\n");
        }
        out.push_str("</g>\n");
    }

    out.push_str("</svg>\n");
    out
}

fn write_shape(out: &mut String, shape: &Shape) {
    match &shape.geometry {
        Geometry::Rect(r) => {
            out.push_str(&format!(
                r#"<rect class="{}" x="{}" y="{}" width="{}" height="{}""#,
                shape.role,
                r.x0,
                r.y0,
                r.width(),
                r.height(),
            ));
            write_paint(out, shape);
            out.push_str("/>\n");
        }
        Geometry::Circle(c) => {
            out.push_str(&format!(
                r#"<circle class="{}" cx="{}" cy="{}" r="{}""#,
                shape.role, c.center.x, c.center.y, c.radius
            ));
            write_paint(out, shape);
            out.push_str("/>\n");
        }
        Geometry::Path(p) => {
            out.push_str(&format!(r#"<path class="{}" d="{}""#, shape.role, p.to_svg()));
            write_paint(out, shape);
            out.push_str("/>\n");
        }
        Geometry::Text(t) => {
            let baseline = match t.baseline {
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Middle => "middle",
                TextBaseline::Hanging => "hanging",
            };
            out.push_str(&format!(
                r#"<text class="{}" x="{}" y="{}" font-size="{}" dominant-baseline="{}""#,
                shape.role, t.pos.x, t.pos.y, t.font_size, baseline
            ));
            if t.font_weight != 400 {
                out.push_str(&format!(r#" font-weight="{}""#, t.font_weight));
            }
            out.push_str(match t.anchor {
                TextAnchor::Start => r#" text-anchor="start""#,
                TextAnchor::Middle => r#" text-anchor="middle""#,
                TextAnchor::End => r#" text-anchor="end""#,
            });
            write_paint(out, shape);
            out.push('>');
            out.push_str(&escape_xml(&t.text));
            out.push_str("</text>\n");
        }
    }
}

fn write_translate(out: &mut String, offset: Vec2) {
    if offset != Vec2::ZERO {
        out.push_str(&format!(
            r#" transform="translate({} {})""#,
            offset.x, offset.y
        ));
    }
}

fn write_paint(out: &mut String, shape: &Shape) {
    match &shape.fill {
        Some(fill) => write_paint_attr(out, "fill", fill),
        // Text without a fill still needs to be visible.
        None if matches!(shape.geometry, Geometry::Text(_)) => {}
        None => out.push_str(r#" fill="none""#),
    }
    if let Some(stroke) = &shape.stroke {
        write_paint_attr(out, "stroke", &stroke.brush);
        out.push_str(&format!(r#" stroke-width="{}""#, stroke.width));
    }
    if shape.opacity < 1.0 {
        out.push_str(&format!(r#" opacity="{}""#, shape.opacity));
    }
}

fn svg_paint(brush: &Brush) -> (String, Option<f64>) {
    match brush {
        Brush::Solid(color) => {
            let rgba = color.to_rgba8();
            let paint = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
            let opacity = if rgba.a == 255 {
                None
            } else {
                Some(f64::from(rgba.a) / 255.0)
            };
            (paint, opacity)
        }
        _ => ("none".to_string(), None),
    }
}

fn write_paint_attr(out: &mut String, name: &str, brush: &Brush) {
    let (value, opacity) = svg_paint(brush);
    out.push_str(&format!(r#" {name}="{value}""#));
    if let Some(o) = opacity {
        out.push_str(&format!(r#" {name}-opacity="{o}""#));
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use kurbo::{BezPath, Circle};
    use peniko::color::palette::css;
    use plates_core::{DatumKey, JoinBy, LayerId, Shapes, TextShape};

    use super::*;

    #[test]
    fn nodes_serialize_with_offsets_paint_and_escaped_text() {
        let mut scene = Scene::new();
        let rows = ["R&D", "Sales"];
        let key = |s: &&str| DatumKey::text(*s);
        scene.join_layer(LayerId::new(1), &rows, JoinBy::Key(&key), |name, i| {
            let mut shapes = Shapes::new();
            shapes.push(
                Shape::rect("mark", Rect::new(0.0, 0.0, 10.0 * (i + 1) as f64, 5.0))
                    .with_fill(css::CRIMSON)
                    .with_opacity(0.5),
            );
            shapes.push(Shape::text("label", TextShape::new((0.0, 0.0), *name)));
            shapes
        });
        scene.set_offsets(LayerId::new(1), &[Vec2::new(0.0, 0.0), Vec2::new(3.0, 4.0)]);

        let svg = to_svg_string(&scene, Rect::new(0.0, 0.0, 100.0, 50.0));
        assert!(svg.starts_with(r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 100 50""#));
        assert!(svg.contains(r#"<g data-key="R&amp;D">"#));
        assert!(svg.contains(r#"<g data-key="Sales" transform="translate(3 4)">"#));
        assert!(svg.contains(r##"width="20" height="5" fill="#dc143c" opacity="0.5"/>"##));
        assert!(svg.contains(">R&amp;D</text>"));
        assert!(svg.ends_with("</svg>\n"));
    }

    #[test]
    fn unfilled_shapes_are_explicitly_unfilled() {
        let mut scene = Scene::new();
        let mut path = BezPath::new();
        path.move_to((0.0, 0.0));
        path.line_to((10.0, 10.0));
        scene.join_layer(LayerId::new(0), &[()], JoinBy::Index, |_, _| {
            let mut shapes = Shapes::new();
            shapes.push(Shape::path("line", path.clone()).with_stroke(css::BLACK, 2.0));
            shapes.push(Shape::circle("point", Circle::new((1.0, 2.0), 3.0)));
            shapes
        });
        let svg = to_svg_string(&scene, Rect::new(0.0, 0.0, 10.0, 10.0));
        assert!(svg.contains(r#"<path class="line" d="M0"#));
        assert!(svg.contains(r##"fill="none" stroke="#000000" stroke-width="2"/>"##));
        assert!(svg.contains(r#"<circle class="point" cx="1" cy="2" r="3" fill="none"/>"#));
    }
}
