// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use insight_core::SceneError;

/// Errors returned by [`ChartRenderer::render`](crate::ChartRenderer::render).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum RenderError {
    /// The chart produced marks that could not be reconciled.
    #[error("chart produced an inconsistent scene")]
    Scene(#[from] SceneError),
}
