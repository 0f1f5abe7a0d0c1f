// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The join engine.
//!
//! [`reconcile`] matches a new dataset against the nodes produced by the previous pass and sorts
//! the outcome into three sets, the same way a d3 data join does:
//! - **entering**: data with no matching node; a node is built by the caller's factory,
//! - **updating**: data whose node is reused as-is,
//! - **exiting**: nodes with no matching datum.
//!
//! The engine holds no state between calls. Everything that persists lives in the node list the
//! caller passes back in.

use alloc::vec::Vec;
use core::fmt;

use hashbrown::HashMap;

use crate::key::DatumKey;

/// How data are matched to existing nodes.
pub enum JoinBy<'a, T> {
    /// Match by position: datum `i` pairs with the node created for index `i`.
    Index,
    /// Match by key equality.
    Key(&'a dyn Fn(&T) -> DatumKey),
}

impl<T> JoinBy<'_, T> {
    /// Returns the join key for `datum` at position `index`.
    pub fn key(&self, index: usize, datum: &T) -> DatumKey {
        match self {
            Self::Index => DatumKey::Index(index),
            Self::Key(f) => f(datum),
        }
    }
}

impl<T> Clone for JoinBy<'_, T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for JoinBy<'_, T> {}

impl<T> fmt::Debug for JoinBy<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Index => f.write_str("JoinBy::Index"),
            Self::Key(_) => f.write_str("JoinBy::Key(..)"),
        }
    }
}

/// Anything that remembers the datum key it was created for.
pub trait Keyed {
    /// Returns the key this element is bound to.
    fn datum_key(&self) -> &DatumKey;
}

/// Outcome of [`reconcile`].
#[derive(Debug)]
pub struct Join<N> {
    /// Bound nodes, in the order of the joined data.
    pub nodes: Vec<N>,
    /// Indices into `nodes` (and the data) of newly created nodes.
    pub entering: Vec<usize>,
    /// Indices into `nodes` (and the data) of reused nodes.
    pub updating: Vec<usize>,
    /// Nodes that matched no datum.
    pub exiting: Vec<N>,
}

impl<N> Join<N> {
    /// Returns `true` if nothing entered or exited.
    pub fn is_stable(&self) -> bool {
        self.entering.is_empty() && self.exiting.is_empty()
    }

    /// Applies `f` to every bound node (`entering ∪ updating`) in data order.
    pub fn for_each<T>(&mut self, data: &[T], mut f: impl FnMut(&mut N, &T, usize)) {
        for (i, (node, datum)) in self.nodes.iter_mut().zip(data).enumerate() {
            f(node, datum, i);
        }
    }
}

/// Joins `data` against `existing` nodes.
///
/// `create` is called once per entering datum with its key, the datum, and its index. When a key
/// appears more than once in `data`, only the first occurrence can reuse a node; the others
/// enter. Existing nodes sharing a key are matched first-come, and the rest exit.
pub fn reconcile<T, N: Keyed>(
    existing: Vec<N>,
    data: &[T],
    by: JoinBy<'_, T>,
    mut create: impl FnMut(DatumKey, &T, usize) -> N,
) -> Join<N> {
    let mut slots: Vec<Option<N>> = existing.into_iter().map(Some).collect();
    let mut by_key: HashMap<DatumKey, usize> = HashMap::with_capacity(slots.len());
    for (i, slot) in slots.iter().enumerate() {
        if let Some(node) = slot {
            by_key.entry(node.datum_key().clone()).or_insert(i);
        }
    }

    let mut nodes = Vec::with_capacity(data.len());
    let mut entering = Vec::new();
    let mut updating = Vec::new();
    for (i, datum) in data.iter().enumerate() {
        let key = by.key(i, datum);
        match by_key.remove(&key).and_then(|slot| slots[slot].take()) {
            Some(node) => {
                updating.push(i);
                nodes.push(node);
            }
            None => {
                entering.push(i);
                nodes.push(create(key, datum, i));
            }
        }
    }

    let exiting = slots.into_iter().flatten().collect();
    Join {
        nodes,
        entering,
        updating,
        exiting,
    }
}
