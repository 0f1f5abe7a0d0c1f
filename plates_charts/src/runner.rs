// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Driving a plate through its lifecycle.

use alloc::vec::Vec;

use plates_core::{
    Delivery, FetchError, PlateHost, PointerEvent, Record, RequestToken, Scene, Selection,
    Viewport,
};
use plates_text::TextMeasurer;

use crate::error::PlateError;
use crate::plate::{PlateSpec, RenderContext, RenderOutcome};

/// Owns a plate's dataset, scene, and hover state, and re-renders whenever one of them changes.
///
/// The runner is synchronous: the host issues the dataset request returned by
/// [`PlateRunner::mount`] however it likes and hands the response to
/// [`PlateRunner::deliver`]. Responses to superseded requests, or arriving after
/// [`PlateRunner::unmount`], are dropped.
#[derive(Debug)]
pub struct PlateRunner<M> {
    spec: PlateSpec,
    host: PlateHost<Record>,
    scene: Scene,
    selected: Selection,
    measurer: M,
    last: Option<RenderOutcome>,
}

impl<M: TextMeasurer> PlateRunner<M> {
    /// Creates an unmounted runner.
    pub fn new(spec: PlateSpec, measurer: M) -> Self {
        Self {
            spec,
            host: PlateHost::new(),
            scene: Scene::new(),
            selected: Selection::default(),
            measurer,
            last: None,
        }
    }

    /// Mounts the plate and returns the token of its dataset request.
    pub fn mount(&mut self) -> RequestToken {
        let token = self.host.begin_fetch();
        log::debug!("plate `{}`: requesting dataset ({token:?})", self.spec.dataset);
        token
    }

    /// Hands over a dataset response. Accepted responses trigger a render pass.
    pub fn deliver(
        &mut self,
        token: RequestToken,
        result: Result<Vec<Record>, FetchError>,
    ) -> Result<Delivery, PlateError> {
        let delivery = self.host.deliver(token, result);
        if delivery == Delivery::Accepted {
            self.render()?;
        }
        Ok(delivery)
    }

    /// Updates the viewport and re-renders.
    pub fn resize(&mut self, viewport: Viewport) -> Result<&RenderOutcome, PlateError> {
        self.host.resize(viewport);
        self.render()
    }

    /// Applies a pointer event and re-renders.
    ///
    /// An event that leaves the hover state as it was produces a pass with no changes.
    pub fn pointer(&mut self, event: PointerEvent) -> Result<&RenderOutcome, PlateError> {
        if self.selected.apply(event) {
            log::debug!("plate `{}`: hover {:?}", self.spec.dataset, self.selected.hovered());
        }
        self.render()
    }

    /// Unmounts the plate: the scene is cleared and later responses are dropped.
    pub fn unmount(&mut self) {
        self.host.unmount();
        self.scene = Scene::new();
        self.selected = Selection::default();
        self.last = None;
    }

    /// Runs a render pass with the current data, viewport, and selection.
    pub fn render(&mut self) -> Result<&RenderOutcome, PlateError> {
        let outcome = match self.host.ready() {
            Err(reason) => {
                log::debug!("plate `{}`: skipped ({reason:?})", self.spec.dataset);
                RenderOutcome::Skipped(reason)
            }
            Ok((data, viewport)) => {
                let ctx = RenderContext {
                    data,
                    viewport,
                    measurer: &self.measurer,
                    selected: self.selected,
                };
                self.spec.render(&ctx, &mut self.scene)?
            }
        };
        Ok(self.last.insert(outcome))
    }

    /// Returns the outcome of the most recent pass.
    pub fn last_outcome(&self) -> Option<&RenderOutcome> {
        self.last.as_ref()
    }

    /// Returns the shape tree.
    pub fn scene(&self) -> &Scene {
        &self.scene
    }

    /// Returns the plate configuration.
    pub fn spec(&self) -> &PlateSpec {
        &self.spec
    }

    /// Returns the lifecycle state.
    pub fn host(&self) -> &PlateHost<Record> {
        &self.host
    }

    /// Returns the hover state.
    pub fn selection(&self) -> Selection {
        self.selected
    }
}
