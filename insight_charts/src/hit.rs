// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Hover hit testing.
//!
//! Charts emit one [`HitRegion`] per hoverable datum, built from the same geometry they
//! render. The renderer tests regions against the pointer and applies the region's
//! [`Emphasis`] to its target mark.

use alloc::string::String;
use alloc::vec::Vec;

use insight_core::{MarkId, MarkPayload};
use kurbo::{Point, Rect};
use peniko::Color;

/// Geometry used to test whether the pointer is over a datum.
#[derive(Clone, Debug, PartialEq)]
pub enum HitShape {
    /// Axis-aligned rectangle (bars, heatmap cells).
    Rect(Rect),
    /// Disc (bubbles).
    Circle {
        /// Center.
        center: Point,
        /// Radius.
        radius: f64,
    },
    /// Polygon rings combined with the even-odd rule (map regions).
    Polygon(Vec<Vec<Point>>),
    /// Line segment with a pick tolerance (reference lines).
    Segment {
        /// Start point.
        from: Point,
        /// End point.
        to: Point,
        /// Maximum distance from the segment.
        tolerance: f64,
    },
    /// One band of a stacked area: hit when the pointer's y lies between `lower` and `upper`
    /// at the x nearest to the pointer.
    StackedBand {
        /// X positions.
        xs: Vec<f64>,
        /// Lower edge y per x.
        lower: Vec<f64>,
        /// Upper edge y per x.
        upper: Vec<f64>,
    },
    /// A rectangle split into columns around `xs`: hit anywhere inside `area`, resolving to
    /// the nearest x (line charts).
    NearestX {
        /// Area that captures the pointer.
        area: Rect,
        /// X positions.
        xs: Vec<f64>,
    },
}

fn rect_contains(r: &Rect, p: Point) -> bool {
    p.x >= r.x0 && p.x <= r.x1 && p.y >= r.y0 && p.y <= r.y1
}

fn nearest(xs: &[f64], x: f64) -> Option<usize> {
    (0..xs.len()).min_by(|&a, &b| (xs[a] - x).abs().total_cmp(&(xs[b] - x).abs()))
}

fn ring_contains(ring: &[Point], p: Point) -> bool {
    let mut inside = false;
    let n = ring.len();
    if n < 3 {
        return false;
    }
    let mut j = n - 1;
    for i in 0..n {
        let (a, b) = (ring[i], ring[j]);
        if (a.y > p.y) != (b.y > p.y) && p.x < (b.x - a.x) * (p.y - a.y) / (b.y - a.y) + a.x {
            inside = !inside;
        }
        j = i;
    }
    inside
}

fn segment_distance(from: Point, to: Point, p: Point) -> f64 {
    let d = to - from;
    let len2 = d.hypot2();
    if len2 == 0.0 {
        return (p - from).hypot();
    }
    let t = ((p - from).dot(d) / len2).clamp(0.0, 1.0);
    (p - (from + d * t)).hypot()
}

impl HitShape {
    /// Tests `p`; returns the data index hit (always `0` for single-datum shapes).
    pub fn hit(&self, p: Point) -> Option<usize> {
        match self {
            Self::Rect(r) => rect_contains(r, p).then_some(0),
            Self::Circle { center, radius } => ((p - *center).hypot() <= *radius).then_some(0),
            Self::Polygon(rings) => rings
                .iter()
                .fold(false, |inside, ring| inside ^ ring_contains(ring, p))
                .then_some(0),
            Self::Segment {
                from,
                to,
                tolerance,
            } => (segment_distance(*from, *to, p) <= *tolerance).then_some(0),
            Self::StackedBand { xs, lower, upper } => {
                let n = xs.len().min(lower.len()).min(upper.len());
                let (first, last) = (xs.first()?, xs.get(n.checked_sub(1)?)?);
                if p.x < first.min(*last) || p.x > first.max(*last) {
                    return None;
                }
                let i = nearest(&xs[..n], p.x)?;
                let (y0, y1) = (lower[i].min(upper[i]), lower[i].max(upper[i]));
                (p.y >= y0 && p.y <= y1 && y1 > y0).then_some(i)
            }
            Self::NearestX { area, xs } => {
                if !rect_contains(area, p) {
                    return None;
                }
                nearest(xs, p.x)
            }
        }
    }
}

/// Tooltip content of a region.
#[derive(Clone, Debug, PartialEq)]
pub enum TooltipLines {
    /// The same lines wherever the region is hit.
    Fixed(Vec<String>),
    /// Lines per data index (stacked bands).
    PerIndex(Vec<Vec<String>>),
}

impl TooltipLines {
    /// Lines for data index `index`.
    pub fn at(&self, index: usize) -> &[String] {
        match self {
            Self::Fixed(lines) => lines,
            Self::PerIndex(per) => per.get(index).map_or(&[], Vec::as_slice),
        }
    }
}

/// Style overrides applied to a hovered mark.
#[derive(Clone, Copy, Debug, Default)]
pub struct Emphasis {
    /// Replacement opacity.
    pub opacity: Option<f32>,
    /// Replacement stroke color and width.
    pub stroke: Option<(Color, f64)>,
    /// Replacement fill.
    pub fill: Option<Color>,
}

impl Emphasis {
    /// Changes opacity only.
    pub fn opacity(opacity: f32) -> Self {
        Self {
            opacity: Some(opacity),
            ..Self::default()
        }
    }

    /// Changes the outline only.
    pub fn stroke(color: Color, width: f64) -> Self {
        Self {
            stroke: Some((color, width)),
            ..Self::default()
        }
    }

    /// Changes the fill only.
    pub fn fill(color: Color) -> Self {
        Self {
            fill: Some(color),
            ..Self::default()
        }
    }

    /// Adds an opacity change.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = Some(opacity);
        self
    }

    /// Applies the overrides to `payload`.
    pub fn apply(&self, payload: &mut MarkPayload) {
        let style = payload.style_mut();
        if let Some(opacity) = self.opacity {
            style.opacity = opacity;
        }
        if let Some((color, width)) = self.stroke {
            style.stroke = Some(color);
            style.stroke_width = width;
        }
        if let Some(fill) = self.fill {
            style.fill = Some(fill);
        }
    }
}

/// A hoverable datum.
#[derive(Clone, Debug)]
pub struct HitRegion {
    /// Mark emphasized while hovered.
    pub target: MarkId,
    /// Semantic key of the datum.
    pub key: String,
    /// Hit geometry.
    pub shape: HitShape,
    /// Tooltip content.
    pub tooltip: TooltipLines,
    /// Hover styling.
    pub emphasis: Emphasis,
    /// Marker dots drawn while hovered, per data index.
    pub markers: Vec<Vec<Point>>,
    /// Radius of marker dots.
    pub marker_radius: f64,
}

impl HitRegion {
    /// Creates a region with fixed tooltip lines and no emphasis.
    pub fn new(target: MarkId, key: impl Into<String>, shape: HitShape, lines: Vec<String>) -> Self {
        Self {
            target,
            key: key.into(),
            shape,
            tooltip: TooltipLines::Fixed(lines),
            emphasis: Emphasis::default(),
            markers: Vec::new(),
            marker_radius: 3.0,
        }
    }

    /// Uses per-index tooltip lines.
    pub fn with_lines_per_index(mut self, lines: Vec<Vec<String>>) -> Self {
        self.tooltip = TooltipLines::PerIndex(lines);
        self
    }

    /// Sets hover styling.
    pub fn with_emphasis(mut self, emphasis: Emphasis) -> Self {
        self.emphasis = emphasis;
        self
    }

    /// Draws dots at `markers[index]` while data index `index` is hovered.
    pub fn with_markers(mut self, markers: Vec<Vec<Point>>, radius: f64) -> Self {
        self.markers = markers;
        self.marker_radius = radius;
        self
    }

    /// Marker dots for data index `index`.
    pub fn markers_at(&self, index: usize) -> &[Point] {
        self.markers.get(index).map_or(&[], Vec::as_slice)
    }
}

/// Index of the topmost region containing `p` (later regions are on top), plus the data
/// index inside that region.
pub(crate) fn topmost(regions: &[HitRegion], p: Point) -> Option<(usize, usize)> {
    regions
        .iter()
        .enumerate()
        .rev()
        .find_map(|(i, r)| r.shape.hit(p).map(|idx| (i, idx)))
}
