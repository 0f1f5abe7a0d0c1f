// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The shape tree.
//!
//! A [`Scene`] is an ordered list of layers; each layer is an ordered list of [`ShapeNode`]s, one
//! per joined datum. Layers paint in the order they were first joined, nodes in data order.

use alloc::vec;
use alloc::vec::Vec;

use kurbo::{Rect, Vec2};
use smallvec::SmallVec;

use crate::join::{JoinBy, Keyed, reconcile};
use crate::key::{DatumKey, LayerId, NodeId};
use crate::shape::Shape;

/// The shapes carried by one node. Most nodes hold a mark and a label or two.
pub type Shapes = SmallVec<[Shape; 4]>;

/// A persistent element bound to one datum key.
#[derive(Clone, Debug, PartialEq)]
pub struct ShapeNode {
    id: NodeId,
    key: DatumKey,
    offset: Vec2,
    shapes: Shapes,
}

impl ShapeNode {
    /// Returns the stable node id.
    pub fn id(&self) -> NodeId {
        self.id
    }

    /// Returns the datum key this node is bound to.
    pub fn key(&self) -> &DatumKey {
        &self.key
    }

    /// Returns the layout-assigned offset.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Returns the node's shapes, in node-local coordinates.
    pub fn shapes(&self) -> &[Shape] {
        &self.shapes
    }

    /// Returns the union of the shapes' bounds in layer coordinates (offset applied).
    ///
    /// Text shapes do not contribute.
    pub fn bounds(&self) -> Option<Rect> {
        self.shapes
            .iter()
            .filter_map(Shape::bounds)
            .reduce(|a, b| a.union(b))
            .map(|r| r + self.offset)
    }
}

impl Keyed for ShapeNode {
    fn datum_key(&self) -> &DatumKey {
        &self.key
    }
}

/// A change to the shape tree produced by a join.
#[derive(Clone, Debug, PartialEq)]
pub enum ShapeDiff {
    /// A node was created.
    Enter {
        /// Layer of the node.
        layer: LayerId,
        /// The new node id.
        id: NodeId,
        /// Datum key the node is bound to.
        key: DatumKey,
    },
    /// A node was re-bound to a datum with the same key.
    Update {
        /// Layer of the node.
        layer: LayerId,
        /// The node id.
        id: NodeId,
        /// Whether the node's shapes changed.
        changed: bool,
    },
    /// A node was removed.
    Exit {
        /// Layer of the node.
        layer: LayerId,
        /// The removed node id.
        id: NodeId,
        /// Datum key the node was bound to.
        key: DatumKey,
    },
}

impl ShapeDiff {
    /// Returns `true` unless this is an [`ShapeDiff::Update`] that changed nothing.
    pub fn is_change(&self) -> bool {
        !matches!(self, Self::Update { changed: false, .. })
    }
}

/// A group of sibling nodes sharing one container offset.
#[derive(Clone, Debug, PartialEq)]
pub struct Layer {
    id: LayerId,
    offset: Vec2,
    nodes: Vec<ShapeNode>,
}

impl Layer {
    /// Returns the layer id.
    pub fn id(&self) -> LayerId {
        self.id
    }

    /// Returns the container offset applied to every node.
    pub fn offset(&self) -> Vec2 {
        self.offset
    }

    /// Returns the nodes in paint order.
    pub fn nodes(&self) -> &[ShapeNode] {
        &self.nodes
    }

    /// Returns the node bound to `key`, if any.
    pub fn node(&self, key: &DatumKey) -> Option<&ShapeNode> {
        self.nodes.iter().find(|n| n.key == *key)
    }
}

/// The shape tree of one plate.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Scene {
    layers: Vec<Layer>,
    next_id: u64,
}

impl Scene {
    /// Creates an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns all layers in paint order.
    pub fn layers(&self) -> &[Layer] {
        &self.layers
    }

    /// Returns a layer by id.
    pub fn layer(&self, id: LayerId) -> Option<&Layer> {
        self.layers.iter().find(|l| l.id == id)
    }

    /// Returns the total number of nodes across all layers.
    pub fn node_count(&self) -> usize {
        self.layers.iter().map(|l| l.nodes.len()).sum()
    }

    /// Finds a node by id.
    pub fn node(&self, id: NodeId) -> Option<&ShapeNode> {
        self.layers
            .iter()
            .flat_map(|l| l.nodes.iter())
            .find(|n| n.id == id)
    }

    fn layer_index(&mut self, id: LayerId) -> usize {
        if let Some(i) = self.layers.iter().position(|l| l.id == id) {
            return i;
        }
        self.layers.push(Layer {
            id,
            offset: Vec2::ZERO,
            nodes: Vec::new(),
        });
        self.layers.len() - 1
    }

    /// Joins `data` into `layer` and rebuilds every bound node's shapes with `build`.
    ///
    /// Entering nodes get fresh ids; updating nodes keep theirs; exiting nodes are dropped.
    /// Empty `data` is a no-op: nothing is mutated and no diffs are returned.
    pub fn join_layer<T>(
        &mut self,
        layer: LayerId,
        data: &[T],
        by: JoinBy<'_, T>,
        mut build: impl FnMut(&T, usize) -> Shapes,
    ) -> Vec<ShapeDiff> {
        if data.is_empty() {
            return Vec::new();
        }

        let index = self.layer_index(layer);
        let existing = core::mem::take(&mut self.layers[index].nodes);
        let next_id = &mut self.next_id;
        let mut join = reconcile(existing, data, by, |key, _, _| {
            let id = NodeId(*next_id);
            *next_id += 1;
            ShapeNode {
                id,
                key,
                offset: Vec2::ZERO,
                shapes: Shapes::new(),
            }
        });

        let mut entered = vec![false; join.nodes.len()];
        for &i in &join.entering {
            entered[i] = true;
        }

        let mut diffs = Vec::with_capacity(join.nodes.len() + join.exiting.len());
        join.for_each(data, |node, datum, i| {
            let shapes = build(datum, i);
            if entered[i] {
                diffs.push(ShapeDiff::Enter {
                    layer,
                    id: node.id,
                    key: node.key.clone(),
                });
            } else {
                diffs.push(ShapeDiff::Update {
                    layer,
                    id: node.id,
                    changed: node.shapes != shapes,
                });
            }
            node.shapes = shapes;
        });
        for node in &join.exiting {
            diffs.push(ShapeDiff::Exit {
                layer,
                id: node.id,
                key: node.key.clone(),
            });
        }

        log::debug!(
            "layer {}: {} entering, {} updating, {} exiting",
            layer.0,
            join.entering.len(),
            join.updating.len(),
            join.exiting.len()
        );

        self.layers[index].nodes = join.nodes;
        diffs
    }

    /// Assigns layout offsets to the nodes of `layer`, pairing them by position.
    ///
    /// Returns how many offsets changed.
    pub fn set_offsets(&mut self, layer: LayerId, offsets: &[Vec2]) -> usize {
        let Some(layer) = self.layers.iter_mut().find(|l| l.id == layer) else {
            return 0;
        };
        let mut changed = 0;
        for (node, &offset) in layer.nodes.iter_mut().zip(offsets) {
            if node.offset != offset {
                node.offset = offset;
                changed += 1;
            }
        }
        changed
    }

    /// Sets the container offset of `layer`.
    pub fn set_layer_offset(&mut self, layer: LayerId, offset: Vec2) {
        let index = self.layer_index(layer);
        self.layers[index].offset = offset;
    }

    /// Removes a layer, reporting an exit for each of its nodes.
    pub fn remove_layer(&mut self, layer: LayerId) -> Vec<ShapeDiff> {
        let Some(index) = self.layers.iter().position(|l| l.id == layer) else {
            return Vec::new();
        };
        self.layers
            .remove(index)
            .nodes
            .into_iter()
            .map(|n| ShapeDiff::Exit {
                layer,
                id: n.id,
                key: n.key,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use kurbo::Rect;
    use smallvec::smallvec;

    use super::*;

    const BARS: LayerId = LayerId::new(1);

    fn year_key(v: &(f64, f64)) -> DatumKey {
        DatumKey::number(v.0)
    }

    fn bar(v: &(f64, f64), _: usize) -> Shapes {
        smallvec![Shape::rect("mark", Rect::new(0.0, 0.0, v.1, 10.0))]
    }

    #[test]
    fn rerender_with_same_data_reports_unchanged_updates() {
        let data = [(1880.0, 100.0), (1890.0, 300.0)];
        let mut scene = Scene::new();
        let first = scene.join_layer(BARS, &data, JoinBy::Key(&year_key), bar);
        assert!(matches!(
            &first[..],
            [ShapeDiff::Enter { .. }, ShapeDiff::Enter { .. }]
        ));
        let snapshot = scene.clone();

        let second = scene.join_layer(BARS, &data, JoinBy::Key(&year_key), bar);
        assert!(second.iter().all(|d| !d.is_change()));
        assert_eq!(scene, snapshot);
    }

    #[test]
    fn keyed_nodes_keep_ids_and_exits_are_reported() {
        let mut scene = Scene::new();
        scene.join_layer(
            BARS,
            &[(1880.0, 1.0), (1890.0, 2.0)],
            JoinBy::Key(&year_key),
            bar,
        );
        let id_1890 = scene.layer(BARS).unwrap().nodes()[1].id();

        let diffs = scene.join_layer(
            BARS,
            &[(1890.0, 5.0), (1900.0, 1.0)],
            JoinBy::Key(&year_key),
            bar,
        );
        let layer = scene.layer(BARS).unwrap();
        assert_eq!(layer.nodes()[0].id(), id_1890);
        assert!(diffs.contains(&ShapeDiff::Update {
            layer: BARS,
            id: id_1890,
            changed: true,
        }));
        assert!(
            diffs
                .iter()
                .any(|d| matches!(d, ShapeDiff::Exit { key, .. } if *key == DatumKey::number(1880.0)))
        );
        assert_eq!(scene.node_count(), 2);
    }

    #[test]
    fn empty_data_is_a_no_op() {
        let mut scene = Scene::new();
        scene.join_layer(BARS, &[(1.0, 1.0)], JoinBy::Index, bar);
        let before = scene.clone();
        let empty: [(f64, f64); 0] = [];
        let diffs = scene.join_layer(BARS, &empty, JoinBy::Index, bar);
        assert!(diffs.is_empty());
        assert_eq!(scene, before);
    }

    #[test]
    fn offsets_move_node_bounds() {
        let mut scene = Scene::new();
        scene.join_layer(BARS, &[(1.0, 4.0), (2.0, 6.0)], JoinBy::Index, bar);
        let changed = scene.set_offsets(BARS, &[Vec2::new(0.0, 0.0), Vec2::new(0.0, 15.0)]);
        assert_eq!(changed, 1);
        let node = &scene.layer(BARS).unwrap().nodes()[1];
        assert_eq!(node.bounds(), Some(Rect::new(0.0, 15.0, 6.0, 25.0)));
    }

    #[test]
    fn removing_a_layer_exits_all_nodes() {
        let mut scene = Scene::new();
        scene.join_layer(BARS, &[(1.0, 4.0), (2.0, 6.0)], JoinBy::Index, bar);
        let diffs = scene.remove_layer(BARS);
        assert_eq!(diffs.len(), 2);
        assert!(scene.layer(BARS).is_none());
    }
}
