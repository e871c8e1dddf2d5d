// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Point (circle) mark generation.

use insight_core::{Mark, MarkId, MarkPayload, Style};
use kurbo::Point;
use peniko::Color;

/// A circle that grows from radius zero on enter and shrinks back on exit.
#[derive(Clone, Debug)]
pub struct PointMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Center in scene coordinates.
    pub center: Point,
    /// Radius in scene units.
    pub radius: f64,
    /// Fill and stroke.
    pub style: Style,
    /// Rendering order hint.
    pub z_index: i32,
}

impl PointMarkSpec {
    /// Creates a filled point.
    pub fn new(id: MarkId, center: Point, radius: f64, fill: Color) -> Self {
        Self {
            id,
            center,
            radius: radius.max(0.0),
            style: Style::filled(fill),
            z_index: crate::z_order::SERIES_POINTS,
        }
    }

    /// Adds an outline.
    pub fn with_stroke(mut self, stroke: Color, stroke_width: f64) -> Self {
        self.style = self.style.with_stroke(stroke, stroke_width);
        self
    }

    /// Sets the fill opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.style = self.style.with_opacity(opacity);
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Generates the point mark.
    pub fn mark(&self) -> Mark {
        let zero = MarkPayload::circle(self.center, 0.0, self.style.clone());
        Mark::new(
            self.id,
            MarkPayload::circle(self.center, self.radius, self.style.clone()),
        )
        .with_z_index(self.z_index)
        .with_zero(zero)
    }
}
