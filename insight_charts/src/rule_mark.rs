// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Rule mark generation.
//!
//! A "rule" is a straight line segment used for axis domains, ticks, gridlines and
//! reference lines.

use insight_core::{Mark, MarkId, MarkPayload, Style};
use kurbo::{BezPath, Point};
use peniko::Color;

use crate::z_order;

/// A rule mark spec (a stroked line segment).
#[derive(Clone, Debug)]
pub struct RuleMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Start point in scene coordinates.
    pub from: Point,
    /// End point in scene coordinates.
    pub to: Point,
    /// Stroke color.
    pub stroke: Color,
    /// Stroke width in scene coordinates.
    pub stroke_width: f64,
    /// Optional `(dash, gap)` pattern.
    pub dash: Option<(f64, f64)>,
    /// Rendering order hint.
    pub z_index: i32,
}

impl RuleMarkSpec {
    /// Creates a new rule between two points.
    pub fn new(id: MarkId, from: Point, to: Point) -> Self {
        Self {
            id,
            from,
            to,
            stroke: Color::WHITE,
            stroke_width: 1.0,
            dash: None,
            z_index: z_order::SERIES_STROKE,
        }
    }

    /// Creates a horizontal rule.
    pub fn horizontal(id: MarkId, y: f64, x0: f64, x1: f64) -> Self {
        Self::new(id, Point::new(x0, y), Point::new(x1, y))
    }

    /// Creates a vertical rule.
    pub fn vertical(id: MarkId, x: f64, y0: f64, y1: f64) -> Self {
        Self::new(id, Point::new(x, y0), Point::new(x, y1))
    }

    /// Sets stroke color and width.
    pub fn with_stroke(mut self, stroke: Color, stroke_width: f64) -> Self {
        self.stroke = stroke;
        self.stroke_width = stroke_width;
        self
    }

    /// Draws the rule dashed.
    pub fn with_dash(mut self, dash: f64, gap: f64) -> Self {
        self.dash = Some((dash, gap));
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// The line geometry.
    pub fn path(&self) -> BezPath {
        let mut p = BezPath::new();
        p.move_to(self.from);
        p.line_to(self.to);
        p
    }

    /// Generates the rule mark; it fades in and out.
    pub fn mark(&self) -> Mark {
        let mut style = Style::stroked(self.stroke, self.stroke_width);
        if let Some((dash, gap)) = self.dash {
            style = style.with_dash(dash, gap);
        }
        Mark::new(self.id, MarkPayload::path(self.path(), style))
            .with_z_index(self.z_index)
            .with_fade()
    }
}
