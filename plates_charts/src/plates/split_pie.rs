// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::sync::Arc;
use alloc::vec;
use alloc::vec::Vec;

use peniko::Brush;
use peniko::color::palette::css;
use plates_core::{DatumKey, JoinBy, Record, Shape};
use smallvec::smallvec;

use super::{label, palette};
use crate::error::PlateError;
use crate::geometry::{annular_arc, polar_to_cartesian};
use crate::layers;
use crate::plate::{Pass, Plate};
use crate::scale::{ScaleLinear, ScaleOrdinal};

/// One angular group of a [`SplitPieSpec`].
#[derive(Clone, Debug, PartialEq)]
pub struct PieGroup {
    /// Value of the group field selecting this group's records.
    pub id: Arc<str>,
    /// Caption drawn just outside the group's middle angle; empty for none.
    pub caption: Arc<str>,
    /// Angle of 0%, in degrees clockwise from 12 o'clock.
    pub start_angle: f64,
    /// Angle of 100%.
    pub end_angle: f64,
}

impl PieGroup {
    /// Creates a group spanning `start_angle..end_angle`.
    pub fn new(id: impl Into<Arc<str>>, start_angle: f64, end_angle: f64) -> Self {
        Self {
            id: id.into(),
            caption: "".into(),
            start_angle,
            end_angle,
        }
    }

    /// Sets the caption.
    #[must_use]
    pub fn with_caption(mut self, caption: impl Into<Arc<str>>) -> Self {
        self.caption = caption.into();
        self
    }
}

/// A pie split into angular groups, each mapping `0..100` percent onto its own angle span.
///
/// Within a group, records are stacked in dataset order: a slice starts where the previous one's
/// accumulated share ended. Slices are colored by category through an ordinal scale shared by
/// every group, so a category keeps its color across groups.
#[derive(Clone, Debug, PartialEq)]
pub struct SplitPieSpec {
    /// Field selecting the group.
    pub group: Arc<str>,
    /// Category field; colors slices and keys them within a group.
    pub category: Arc<str>,
    /// Percentage field.
    pub share: Arc<str>,
    /// The groups, in drawing order.
    pub groups: Vec<PieGroup>,
    /// Category colors.
    pub palette: Vec<Brush>,
    /// Slice outline.
    pub stroke: Brush,
    /// Slice opacity.
    pub opacity: f64,
}

impl SplitPieSpec {
    /// Creates a split pie with the period palette and no groups.
    pub fn new(
        group: impl Into<Arc<str>>,
        category: impl Into<Arc<str>>,
        share: impl Into<Arc<str>>,
    ) -> Self {
        Self {
            group: group.into(),
            category: category.into(),
            share: share.into(),
            groups: Vec::new(),
            palette: palette(&[
                "#7e6583", "#4682b4", "#00aa00", "#dc143c", "#ffc0cb", "#ffd700", "#d2b48c",
                "#654321", "#000000",
            ]),
            stroke: css::BLACK.with_alpha(0.9).into(),
            opacity: 0.65,
        }
    }

    /// Adds a group.
    #[must_use]
    pub fn with_group(mut self, group: PieGroup) -> Self {
        self.groups.push(group);
        self
    }
}

impl Plate for SplitPieSpec {
    fn numeric_fields(&self) -> Vec<&str> {
        vec![&*self.share]
    }

    fn render(&self, pass: &mut Pass<'_>) -> Result<(), PlateError> {
        let records = pass.records();
        let plot = pass.plot();
        let center = plot.center();
        let radius = plot.width().min(plot.height()) / 2.0;

        let category = |r: &Record| r.key(&self.category).unwrap_or(DatumKey::Index(0));
        let colors = ScaleOrdinal::new(records.iter().map(category), self.palette.clone());

        let mut drawn = 0;
        let mut captioned = Vec::new();
        for (g, group) in (0_u32..).zip(&self.groups) {
            let members: Vec<Record> = records
                .iter()
                .filter(|r| r.text(&self.group) == Some(&*group.id))
                .cloned()
                .collect();
            if members.is_empty() {
                pass.clear(layers::group(g));
                continue;
            }

            let angle = ScaleLinear::new((0.0, 100.0), (group.start_angle, group.end_angle));
            let mut acc = 0.0;
            let mut slices = Vec::with_capacity(members.len());
            for r in &members {
                let share = r.number(&self.share);
                slices.push(annular_arc(
                    center,
                    radius,
                    0.0,
                    angle.map(acc),
                    angle.map(acc + share),
                )?);
                acc += share;
            }

            let emphasis: Vec<_> = (0..members.len()).map(|i| pass.emphasis(drawn + i)).collect();
            pass.join(layers::group(g), &members, JoinBy::Key(&category), |r, i| {
                let mut slice = Shape::path("mark", slices[i].clone())
                    .with_stroke(self.stroke.clone(), 1.0)
                    .with_opacity(emphasis[i].opacity(self.opacity));
                if let Some(fill) = colors.map(&category(r)) {
                    slice = slice.with_fill(fill.clone());
                }
                smallvec![slice]
            });
            drawn += members.len();
            if !group.caption.is_empty() {
                captioned.push(group);
            }
        }

        let caption_at = |group: &PieGroup| {
            let mid = (group.start_angle + group.end_angle) / 2.0;
            polar_to_cartesian(center, radius + 8.0, mid)
        };
        if captioned.is_empty() {
            pass.clear(layers::LABELS);
            return Ok(());
        }
        let key = |group: &&PieGroup| DatumKey::text(group.id.clone());
        pass.join(layers::LABELS, &captioned, JoinBy::Key(&key), |group, _| {
            let text = label(caption_at(*group), &*group.caption, 14.0);
            smallvec![Shape::text("caption", text)]
        });
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Shape as _;
    use plates_core::{Geometry, Scene, Selection, Viewport};
    use plates_text::HeuristicTextMeasurer;

    use super::*;
    use crate::plate::{PlateKind, PlateSpec, RenderContext};
    use crate::title::TitleSpec;

    fn occupations() -> Vec<Record> {
        [
            ("b", "agriculture", 62.0),
            ("b", "domestic", 28.0),
            ("b", "manufacturing", 10.0),
            ("w", "agriculture", 64.0),
            ("w", "manufacturing", 36.0),
        ]
        .iter()
        .map(|&(group, occupation, share)| {
            Record::new()
                .with("group", group)
                .with("occupation", occupation)
                .with("percentage", share)
        })
        .collect()
    }

    fn spec() -> SplitPieSpec {
        SplitPieSpec::new("group", "occupation", "percentage")
            .with_group(PieGroup::new("b", 210.0, 330.0).with_caption("Black"))
            .with_group(PieGroup::new("w", 30.0, 150.0))
    }

    #[test]
    fn groups_stack_shares_within_their_span() {
        let data = occupations();
        let plate = PlateSpec::new("data09", TitleSpec::new(""), PlateKind::SplitPie(spec()));
        let mut scene = Scene::new();
        let ctx = RenderContext {
            data: &data,
            viewport: Viewport::new(240.0, 240.0),
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();

        let b = scene.layer(layers::group(0)).unwrap().nodes();
        let w = scene.layer(layers::group(1)).unwrap().nodes();
        assert_eq!(b.len(), 3);
        assert_eq!(w.len(), 2);
        // Same category, same color across groups.
        assert_eq!(b[0].shapes()[0].fill, w[0].shapes()[0].fill);
        assert_ne!(b[0].shapes()[0].fill, b[1].shapes()[0].fill);

        // The "w" group spans 30°..150°, entirely right of center.
        for node in w {
            let Geometry::Path(path) = &node.shapes()[0].geometry else {
                panic!("expected path");
            };
            assert!(path.bounding_box().x0 >= 120.0 - 1e-9);
        }

        let captions = scene.layer(layers::LABELS).unwrap().nodes();
        assert_eq!(captions.len(), 1);
    }

    #[test]
    fn group_without_records_is_cleared() {
        let mut data = occupations();
        let plate = PlateSpec::new("data09", TitleSpec::new(""), PlateKind::SplitPie(spec()));
        let mut scene = Scene::new();
        let viewport = Viewport::new(240.0, 240.0);
        let ctx = RenderContext {
            data: &data,
            viewport,
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();

        data.retain(|r| r.text("group") == Some("b"));
        let ctx = RenderContext {
            data: &data,
            viewport,
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();
        assert!(scene.layer(layers::group(1)).is_none());
        assert_eq!(scene.layer(layers::group(0)).unwrap().nodes().len(), 3);
    }

    #[test]
    fn caption_exits_with_the_last_captioned_group() {
        let mut data = occupations();
        let plate = PlateSpec::new("data09", TitleSpec::new(""), PlateKind::SplitPie(spec()));
        let mut scene = Scene::new();
        let viewport = Viewport::new(240.0, 240.0);
        let ctx = RenderContext {
            data: &data,
            viewport,
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();
        assert_eq!(scene.layer(layers::LABELS).unwrap().nodes().len(), 1);

        data.retain(|r| r.text("group") == Some("w"));
        let ctx = RenderContext {
            data: &data,
            viewport,
            measurer: &HeuristicTextMeasurer,
            selected: Selection::default(),
        };
        plate.render(&ctx, &mut scene).unwrap();
        assert!(scene.layer(layers::group(0)).is_none());
        assert!(scene.layer(layers::LABELS).is_none());
        assert_eq!(scene.layer(layers::group(1)).unwrap().nodes().len(), 2);
    }
}
