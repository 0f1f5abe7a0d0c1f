// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Plate lifecycle: viewport, dataset request, and the stale-response guard.
//!
//! A plate issues one dataset request per mount. The response may arrive after the viewport has
//! already changed, after a newer request was issued, or after the plate was unmounted.
//! [`PlateHost`] hands out a [`RequestToken`] per request and only accepts the response carrying
//! the current token while mounted.

use alloc::vec::Vec;

use crate::error::FetchError;

/// The size of the rendering surface.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Viewport {
    /// Width in scene units.
    pub width: f64,
    /// Height in scene units.
    pub height: f64,
}

impl Viewport {
    /// Creates a viewport.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` once the surface has a finite, non-zero size.
    pub fn is_ready(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Identifies one dataset request.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RequestToken(u64);

/// Where the plate's dataset currently stands.
#[derive(Clone, Debug, PartialEq)]
pub enum DataState<T> {
    /// No request has been issued.
    Idle,
    /// Waiting for the response to the given request.
    Pending(RequestToken),
    /// Data arrived.
    Ready(Vec<T>),
    /// The provider rejected the request; the plate stays blank.
    Failed(FetchError),
}

/// What happened to a delivered response.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Delivery {
    /// The response was for the current request and has been stored.
    Accepted,
    /// The response belonged to a superseded request.
    Stale,
    /// The plate was unmounted before the response arrived.
    Unmounted,
}

/// Why a render pass produced nothing.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SkipReason {
    /// The plate is not mounted.
    NotMounted,
    /// The dataset has not arrived yet.
    Pending,
    /// The dataset request failed.
    Failed,
    /// The dataset is empty, or no record survived coercion.
    EmptyData,
    /// The viewport has no usable size yet.
    ViewportNotReady,
}

/// Lifecycle state shared by every plate.
#[derive(Clone, Debug)]
pub struct PlateHost<T> {
    state: DataState<T>,
    viewport: Viewport,
    next_token: u64,
    mounted: bool,
}

impl<T> Default for PlateHost<T> {
    fn default() -> Self {
        Self {
            state: DataState::Idle,
            viewport: Viewport::default(),
            next_token: 0,
            mounted: false,
        }
    }
}

impl<T> PlateHost<T> {
    /// Creates an unmounted host with no data and a 0×0 viewport.
    pub fn new() -> Self {
        Self::default()
    }

    /// Mounts the plate (if needed) and issues a new request, superseding any pending one.
    pub fn begin_fetch(&mut self) -> RequestToken {
        self.mounted = true;
        let token = RequestToken(self.next_token);
        self.next_token += 1;
        self.state = DataState::Pending(token);
        token
    }

    /// Offers a response. Only the response for the current request is stored.
    pub fn deliver(&mut self, token: RequestToken, result: Result<Vec<T>, FetchError>) -> Delivery {
        if !self.mounted {
            log::debug!("dropping response {token:?}: plate unmounted");
            return Delivery::Unmounted;
        }
        if !matches!(self.state, DataState::Pending(current) if current == token) {
            log::debug!("dropping stale response {token:?}");
            return Delivery::Stale;
        }
        self.state = match result {
            Ok(data) => DataState::Ready(data),
            Err(err) => {
                log::warn!("dataset request failed: {err}");
                DataState::Failed(err)
            }
        };
        Delivery::Accepted
    }

    /// Updates the viewport. Returns `true` if it changed.
    pub fn resize(&mut self, viewport: Viewport) -> bool {
        let changed = self.viewport != viewport;
        self.viewport = viewport;
        changed
    }

    /// Unmounts the plate; later responses are ignored.
    pub fn unmount(&mut self) {
        self.mounted = false;
    }

    /// Returns `true` while mounted.
    pub fn is_mounted(&self) -> bool {
        self.mounted
    }

    /// Returns the current viewport.
    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// Returns the data state.
    pub fn state(&self) -> &DataState<T> {
        &self.state
    }

    /// Returns the data and viewport if a render pass can run.
    pub fn ready(&self) -> Result<(&[T], Viewport), SkipReason> {
        if !self.mounted {
            return Err(SkipReason::NotMounted);
        }
        let data = match &self.state {
            DataState::Idle | DataState::Pending(_) => return Err(SkipReason::Pending),
            DataState::Failed(_) => return Err(SkipReason::Failed),
            DataState::Ready(data) => data,
        };
        if data.is_empty() {
            return Err(SkipReason::EmptyData);
        }
        if !self.viewport.is_ready() {
            return Err(SkipReason::ViewportNotReady);
        }
        Ok((data, self.viewport))
    }
}
