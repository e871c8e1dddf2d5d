// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The chart seam: turning input data plus a layout into marks and hit regions.

use alloc::vec::Vec;

use insight_core::Mark;

use crate::hit::HitRegion;
use crate::layout::{ChartLayout, Margins};

/// Everything a chart produces for one render.
#[derive(Clone, Debug, Default)]
pub struct ChartOutput {
    /// Marks to reconcile against the previous render.
    pub marks: Vec<Mark>,
    /// Hoverable regions in paint order (later regions are on top).
    pub hits: Vec<HitRegion>,
}

impl ChartOutput {
    /// Creates an empty output.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends marks.
    pub fn extend(&mut self, marks: impl IntoIterator<Item = Mark>) {
        self.marks.extend(marks);
    }

    /// Appends one mark.
    pub fn push(&mut self, mark: Mark) {
        self.marks.push(mark);
    }

    /// Appends one hit region.
    pub fn hit(&mut self, region: HitRegion) {
        self.hits.push(region);
    }
}

/// A chart type.
///
/// `build` is a pure function of the input and layout: scales are derived from the current
/// data extent and the plot rectangle, and every mark is keyed by the meaning of its datum.
/// Empty input must still produce a valid (possibly axis-only) output.
pub trait Chart {
    /// Data the chart draws.
    type Input: ?Sized;

    /// Fixed space around the plot.
    fn margins(&self) -> Margins;

    /// Builds marks and hit regions for `input` inside `layout`.
    fn build(&self, input: &Self::Input, layout: &ChartLayout) -> ChartOutput;
}
