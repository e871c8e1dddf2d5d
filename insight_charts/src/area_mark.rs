// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Area and line mark generation.

use alloc::vec::Vec;

use insight_core::{Mark, MarkId, MarkPayload, Style};
use kurbo::{BezPath, Point};
use peniko::Color;

/// A filled band between `lower` and `upper` at each x.
///
/// The band enters from, and exits to, a flat band lying on `baseline`.
#[derive(Clone, Debug)]
pub struct AreaMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// X positions in scene coordinates.
    pub xs: Vec<f64>,
    /// Lower edge y per x.
    pub lower: Vec<f64>,
    /// Upper edge y per x.
    pub upper: Vec<f64>,
    /// Y the band collapses onto when entering or exiting.
    pub baseline: f64,
    /// Fill and stroke.
    pub style: Style,
    /// Rendering order hint.
    pub z_index: i32,
}

impl AreaMarkSpec {
    /// Creates an area spec. Extra entries in `lower` or `upper` are ignored.
    pub fn new(id: MarkId, xs: Vec<f64>, lower: Vec<f64>, upper: Vec<f64>, baseline: f64) -> Self {
        Self {
            id,
            xs,
            lower,
            upper,
            baseline,
            style: Style::default(),
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Sets the fill color.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.style.fill = Some(fill);
        self
    }

    /// Sets the fill opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.style.opacity = opacity;
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    fn band(&self, lower: impl Fn(usize) -> f64, upper: impl Fn(usize) -> f64) -> BezPath {
        let n = self.xs.len().min(self.lower.len()).min(self.upper.len());
        let mut p = BezPath::new();
        for i in 0..n {
            let pt = Point::new(self.xs[i], upper(i));
            if i == 0 {
                p.move_to(pt);
            } else {
                p.line_to(pt);
            }
        }
        for i in (0..n).rev() {
            p.line_to(Point::new(self.xs[i], lower(i)));
        }
        if n > 0 {
            p.close_path();
        }
        p
    }

    /// Target geometry.
    pub fn path(&self) -> BezPath {
        self.band(|i| self.lower[i], |i| self.upper[i])
    }

    /// Generates the area mark.
    pub fn mark(&self) -> Mark {
        let flat = self.band(|_| self.baseline, |_| self.baseline);
        Mark::new(self.id, MarkPayload::path(self.path(), self.style.clone()))
            .with_z_index(self.z_index)
            .with_zero(MarkPayload::path(flat, self.style.clone()))
    }
}

/// A stroked polyline.
#[derive(Clone, Debug)]
pub struct LineMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Vertices in scene coordinates.
    pub points: Vec<Point>,
    /// Y the line flattens onto when entering or exiting; `None` fades instead.
    pub baseline: Option<f64>,
    /// Stroke.
    pub style: Style,
    /// Rendering order hint.
    pub z_index: i32,
}

impl LineMarkSpec {
    /// Creates a line through `points`.
    pub fn new(id: MarkId, points: Vec<Point>, stroke: Color, stroke_width: f64) -> Self {
        Self {
            id,
            points,
            baseline: None,
            style: Style::stroked(stroke, stroke_width),
            z_index: crate::z_order::SERIES_STROKE,
        }
    }

    /// Flattens onto `baseline` on enter and exit.
    pub fn with_baseline(mut self, baseline: f64) -> Self {
        self.baseline = Some(baseline);
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    fn polyline(points: impl Iterator<Item = Point>) -> BezPath {
        let mut p = BezPath::new();
        for (i, pt) in points.enumerate() {
            if i == 0 {
                p.move_to(pt);
            } else {
                p.line_to(pt);
            }
        }
        p
    }

    /// Target geometry.
    pub fn path(&self) -> BezPath {
        Self::polyline(self.points.iter().copied())
    }

    /// Generates the line mark.
    pub fn mark(&self) -> Mark {
        let mark = Mark::new(self.id, MarkPayload::path(self.path(), self.style.clone()))
            .with_z_index(self.z_index);
        match self.baseline {
            Some(y) => {
                let flat = Self::polyline(self.points.iter().map(|p| Point::new(p.x, y)));
                mark.with_zero(MarkPayload::path(flat, self.style.clone()))
            }
            None => mark.with_fade(),
        }
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn area_zero_state_matches_structure() {
        let area = AreaMarkSpec::new(
            MarkId::from_raw(7),
            alloc::vec![0.0, 10.0, 20.0],
            alloc::vec![100.0, 100.0, 100.0],
            alloc::vec![50.0, 40.0, 60.0],
            100.0,
        );
        let mark = area.mark();
        let Some(MarkPayload::Path { path: zero, .. }) = &mark.enter else {
            panic!("expected path enter state");
        };
        let MarkPayload::Path { path, .. } = &mark.payload else {
            panic!("expected path payload");
        };
        assert_eq!(zero.elements().len(), path.elements().len());
        assert_eq!(path.elements().len(), 7, "3 upper + 3 lower + close");
    }

    #[test]
    fn empty_area_is_an_empty_path() {
        let area = AreaMarkSpec::new(MarkId::from_raw(1), alloc::vec![], alloc::vec![], alloc::vec![], 0.0);
        assert!(area.path().elements().is_empty());
    }
}
