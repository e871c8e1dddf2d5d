// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Pieces shared by every page.

use insight_charts::{Chart, ChartRenderer, HeuristicTextMeasurer, Size};
use insight_core::{RenderedMark, Transition};
use kurbo::Rect;

use crate::config::ChartConfig;

/// Container size and transition given to every chart of a page.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartSettings {
    /// Default container size.
    pub size: Size,
    /// Shared enter, update and exit transition.
    pub transition: Transition,
}

impl ChartSettings {
    /// Settings from the `[chart]` configuration table.
    pub fn from_config(config: &ChartConfig) -> Self {
        Self {
            size: Size::new(config.width, config.height),
            transition: Transition::default().with_duration_ms(config.transition_ms),
        }
    }

    pub(crate) fn renderer<C: Chart>(&self, chart: C) -> ChartRenderer<C> {
        ChartRenderer::new(chart)
            .with_size(self.size)
            .with_transition(self.transition)
    }
}

impl Default for ChartSettings {
    fn default() -> Self {
        Self::from_config(&ChartConfig::default())
    }
}

/// What one chart shows at one instant.
#[derive(Clone, Debug, PartialEq)]
pub struct ChartSnapshot {
    /// Stable chart name, usable as a file stem.
    pub name: &'static str,
    /// Container size.
    pub size: Size,
    /// Marks in paint order.
    pub marks: Vec<RenderedMark>,
    /// Tooltip box and lines, while a datum is hovered.
    pub tooltip: Option<(Rect, Vec<String>)>,
}

impl ChartSnapshot {
    pub(crate) fn capture<C: Chart>(
        name: &'static str,
        renderer: &ChartRenderer<C>,
        now: f64,
    ) -> Self {
        let tooltip = renderer
            .tooltip_box(&HeuristicTextMeasurer)
            .map(|bbox| (bbox, renderer.tooltip().lines().to_vec()));
        Self {
            name,
            size: renderer.size(),
            marks: renderer.frame(now),
            tooltip,
        }
    }
}
