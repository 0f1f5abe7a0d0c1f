// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::string::String;

/// Error returned by a [`crate::DatasetProvider`].
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum FetchError {
    /// No dataset with this name exists.
    #[error("dataset `{0}` not found")]
    NotFound(String),
    /// The dataset exists but could not be read.
    #[error("dataset `{name}` could not be read: {message}")]
    Parse {
        /// Dataset name.
        name: String,
        /// What went wrong.
        message: String,
    },
}
