// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Timing and interpolation of mark payloads.

use kurbo::{BezPath, PathEl, Point, Rect};
use peniko::Color;

use crate::{MarkPayload, Style};

/// Shared duration of enter/update/exit transitions, in milliseconds.
pub const DEFAULT_DURATION_MS: f64 = 750.0;

/// Easing curve applied to linear progress.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum Easing {
    /// No easing.
    Linear,
    /// Symmetric cubic ease-in-out.
    #[default]
    CubicInOut,
}

impl Easing {
    /// Maps linear progress `t` in `[0, 1]` to eased progress.
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::Linear => t,
            Self::CubicInOut => {
                let t2 = t * 2.0;
                if t2 <= 1.0 {
                    t2 * t2 * t2 / 2.0
                } else {
                    let u = t2 - 2.0;
                    (u * u * u + 2.0) / 2.0
                }
            }
        }
    }
}

/// Duration and easing of a transition.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Transition {
    /// Duration in milliseconds. Zero snaps to the target.
    pub duration_ms: f64,
    /// Easing curve.
    pub easing: Easing,
}

impl Default for Transition {
    fn default() -> Self {
        Self {
            duration_ms: DEFAULT_DURATION_MS,
            easing: Easing::CubicInOut,
        }
    }
}

impl Transition {
    /// A transition that snaps to its target.
    pub fn immediate() -> Self {
        Self {
            duration_ms: 0.0,
            easing: Easing::Linear,
        }
    }

    /// Sets the duration.
    pub fn with_duration_ms(mut self, duration_ms: f64) -> Self {
        self.duration_ms = duration_ms.max(0.0);
        self
    }

    /// Eased progress at `now` for a transition started at `start`.
    pub fn progress(&self, start: f64, now: f64) -> f64 {
        if self.duration_ms <= 0.0 {
            return 1.0;
        }
        self.easing.apply((now - start) / self.duration_ms)
    }

    /// Returns `true` once a transition started at `start` has finished.
    pub fn is_done(&self, start: f64, now: f64) -> bool {
        now - start >= self.duration_ms
    }
}

fn lerp(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

fn lerp_point(a: Point, b: Point, t: f64) -> Point {
    Point::new(lerp(a.x, b.x, t), lerp(a.y, b.y, t))
}

fn lerp_rect(a: Rect, b: Rect, t: f64) -> Rect {
    Rect::new(
        lerp(a.x0, b.x0, t),
        lerp(a.y0, b.y0, t),
        lerp(a.x1, b.x1, t),
        lerp(a.y1, b.y1, t),
    )
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "interpolation parameter only needs f32 precision for colors"
)]
fn lerp_color(a: Option<Color>, b: Option<Color>, t: f64) -> Option<Color> {
    match (a, b) {
        (Some(a), Some(b)) => {
            let t = t as f32;
            let mut out = [0.0_f32; 4];
            for (i, c) in out.iter_mut().enumerate() {
                *c = a.components[i] + (b.components[i] - a.components[i]) * t;
            }
            Some(Color::new(out))
        }
        _ => b,
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "opacity is stored as f32"
)]
fn lerp_style(a: &Style, b: &Style, t: f64) -> Style {
    Style {
        fill: lerp_color(a.fill, b.fill, t),
        stroke: lerp_color(a.stroke, b.stroke, t),
        stroke_width: lerp(a.stroke_width, b.stroke_width, t),
        dash: b.dash,
        opacity: lerp(f64::from(a.opacity), f64::from(b.opacity), t) as f32,
    }
}

fn lerp_path(a: &BezPath, b: &BezPath, t: f64) -> Option<BezPath> {
    let (ea, eb) = (a.elements(), b.elements());
    if ea.len() != eb.len() {
        return None;
    }
    let mut out = BezPath::new();
    for (x, y) in ea.iter().zip(eb) {
        let el = match (*x, *y) {
            (PathEl::MoveTo(p), PathEl::MoveTo(q)) => PathEl::MoveTo(lerp_point(p, q, t)),
            (PathEl::LineTo(p), PathEl::LineTo(q)) => PathEl::LineTo(lerp_point(p, q, t)),
            (PathEl::QuadTo(p1, p2), PathEl::QuadTo(q1, q2)) => {
                PathEl::QuadTo(lerp_point(p1, q1, t), lerp_point(p2, q2, t))
            }
            (PathEl::CurveTo(p1, p2, p3), PathEl::CurveTo(q1, q2, q3)) => PathEl::CurveTo(
                lerp_point(p1, q1, t),
                lerp_point(p2, q2, t),
                lerp_point(p3, q3, t),
            ),
            (PathEl::ClosePath, PathEl::ClosePath) => PathEl::ClosePath,
            _ => return None,
        };
        out.push(el);
    }
    Some(out)
}

impl MarkPayload {
    /// Interpolates from `self` towards `to` at eased progress `t`.
    ///
    /// Payloads of different kinds, and paths with different element structure, snap to
    /// `to`. Text content always comes from `to`.
    pub fn lerp(&self, to: &Self, t: f64) -> Self {
        if t >= 1.0 {
            return to.clone();
        }
        match (self, to) {
            (Self::Rect { rect: a, style: sa }, Self::Rect { rect: b, style: sb }) => Self::Rect {
                rect: lerp_rect(*a, *b, t),
                style: lerp_style(sa, sb, t),
            },
            (
                Self::Circle {
                    center: ca,
                    radius: ra,
                    style: sa,
                },
                Self::Circle {
                    center: cb,
                    radius: rb,
                    style: sb,
                },
            ) => Self::Circle {
                center: lerp_point(*ca, *cb, t),
                radius: lerp(*ra, *rb, t),
                style: lerp_style(sa, sb, t),
            },
            (Self::Path { path: pa, style: sa }, Self::Path { path: pb, style: sb }) => {
                match lerp_path(pa, pb, t) {
                    Some(path) => Self::Path {
                        path,
                        style: lerp_style(sa, sb, t),
                    },
                    None => to.clone(),
                }
            }
            (
                Self::Text {
                    pos: pa,
                    font_size: fa,
                    angle: aa,
                    style: sa,
                    ..
                },
                Self::Text {
                    pos: pb,
                    text,
                    font_size: fb,
                    angle: ab,
                    anchor,
                    baseline,
                    style: sb,
                },
            ) => Self::Text {
                pos: lerp_point(*pa, *pb, t),
                text: text.clone(),
                font_size: lerp(*fa, *fb, t),
                angle: lerp(*aa, *ab, t),
                anchor: *anchor,
                baseline: *baseline,
                style: lerp_style(sa, sb, t),
            },
            _ => to.clone(),
        }
    }
}
