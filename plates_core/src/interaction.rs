// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover selection.
//!
//! A plate tracks at most one hovered item. While something is hovered, that item is
//! highlighted and its siblings are muted; leaving restores everything.

/// A pointer event routed to a plate, already resolved to an item index.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PointerEvent {
    /// The pointer entered the item at this index.
    Enter(usize),
    /// The pointer left the hovered item.
    Leave,
}

/// How an item should be drawn given the current selection.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Emphasis {
    /// Nothing is hovered.
    Normal,
    /// This item is hovered.
    Highlighted,
    /// Another item is hovered.
    Muted,
}

impl Emphasis {
    /// Opacity multiplier applied to muted items.
    pub const MUTED_OPACITY: f64 = 0.3;

    /// Returns the opacity to draw with, given the item's resting opacity.
    pub fn opacity(self, base: f64) -> f64 {
        match self {
            Self::Normal | Self::Highlighted => base,
            Self::Muted => base * Self::MUTED_OPACITY,
        }
    }
}

/// The current hover state.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Selection {
    hovered: Option<usize>,
}

impl Selection {
    /// Applies a pointer event. Returns `true` if the selection changed.
    pub fn apply(&mut self, event: PointerEvent) -> bool {
        let next = match event {
            PointerEvent::Enter(i) => Some(i),
            PointerEvent::Leave => None,
        };
        let changed = self.hovered != next;
        self.hovered = next;
        changed
    }

    /// Returns the hovered index.
    pub fn hovered(&self) -> Option<usize> {
        self.hovered
    }

    /// Returns how the item at `index` should be drawn.
    pub fn emphasis(&self, index: usize) -> Emphasis {
        match self.hovered {
            None => Emphasis::Normal,
            Some(h) if h == index => Emphasis::Highlighted,
            Some(_) => Emphasis::Muted,
        }
    }
}
