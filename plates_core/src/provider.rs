// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use alloc::vec::Vec;

use crate::error::FetchError;
use crate::record::Record;

/// A source of named datasets.
///
/// Implementations apply the dataset's [`crate::FieldMap`] before returning, so every record a
/// plate sees is already typed. Files, network fetches, and in-memory tables all fit behind this
/// trait.
pub trait DatasetProvider {
    /// Loads the dataset called `name`.
    fn load(&self, name: &str) -> Result<Vec<Record>, FetchError>;
}
