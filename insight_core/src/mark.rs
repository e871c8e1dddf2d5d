// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Marks: stable identities plus renderable payloads.

use alloc::string::String;

use kurbo::{BezPath, Point, Rect};
use peniko::Color;

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0000_0100_0000_01b3;

const fn fnv1a(mut hash: u64, bytes: &[u8]) -> u64 {
    let mut i = 0;
    while i < bytes.len() {
        hash ^= bytes[i] as u64;
        hash = hash.wrapping_mul(FNV_PRIME);
        i += 1;
    }
    hash
}

/// Stable identity of a mark across reconciliation ticks.
///
/// Ids are derived from a namespace (the role of the mark inside a chart, e.g. `"bars"` or
/// `"legend-label"`) and the semantic key of the datum it draws.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MarkId(pub u64);

impl MarkId {
    /// Creates an id from a raw value.
    pub const fn from_raw(raw: u64) -> Self {
        Self(raw)
    }

    /// Hashes a namespace name into a seed for [`MarkId::for_key`].
    pub const fn space(name: &str) -> u64 {
        fnv1a(FNV_OFFSET, name.as_bytes())
    }

    /// Id for the datum identified by `key` inside namespace `space`.
    pub fn for_key(space: u64, key: &str) -> Self {
        Self(fnv1a(fnv1a(space, &[0xff]), key.as_bytes()))
    }

    /// Id for a datum identified by a composite key (e.g. market and year).
    pub fn for_pair(space: u64, a: &str, b: &str) -> Self {
        let h = fnv1a(fnv1a(space, &[0xff]), a.as_bytes());
        Self(fnv1a(fnv1a(h, &[0x1f]), b.as_bytes()))
    }
}

/// Horizontal text anchoring.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextAnchor {
    /// Text starts at the anchor point.
    #[default]
    Start,
    /// Text is centered on the anchor point.
    Middle,
    /// Text ends at the anchor point.
    End,
}

/// Vertical text alignment relative to the anchor point.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub enum TextBaseline {
    /// Anchor is at the top of the text.
    Top,
    /// Anchor is at the vertical middle of the text.
    #[default]
    Middle,
    /// Anchor is at the alphabetic baseline.
    Alphabetic,
    /// Anchor is at the bottom of the text.
    Bottom,
}

/// Paint and opacity shared by all payload kinds.
#[derive(Clone, Debug)]
pub struct Style {
    /// Fill color, if any.
    pub fill: Option<Color>,
    /// Stroke color, if any.
    pub stroke: Option<Color>,
    /// Stroke width in scene units.
    pub stroke_width: f64,
    /// Dash pattern as `(dash, gap)`.
    pub dash: Option<(f64, f64)>,
    /// Overall opacity in `[0, 1]`.
    pub opacity: f32,
}

impl Default for Style {
    fn default() -> Self {
        Self {
            fill: None,
            stroke: None,
            stroke_width: 1.0,
            dash: None,
            opacity: 1.0,
        }
    }
}

impl Style {
    /// A filled style with no stroke.
    pub fn filled(fill: Color) -> Self {
        Self {
            fill: Some(fill),
            ..Self::default()
        }
    }

    /// A stroked style with no fill.
    pub fn stroked(stroke: Color, stroke_width: f64) -> Self {
        Self {
            stroke: Some(stroke),
            stroke_width,
            ..Self::default()
        }
    }

    /// Sets the stroke.
    pub fn with_stroke(mut self, stroke: Color, stroke_width: f64) -> Self {
        self.stroke = Some(stroke);
        self.stroke_width = stroke_width;
        self
    }

    /// Sets a dash pattern.
    pub fn with_dash(mut self, dash: f64, gap: f64) -> Self {
        self.dash = Some((dash, gap));
        self
    }

    /// Sets the opacity.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }
}

fn color_eq(a: Option<Color>, b: Option<Color>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => a.components == b.components,
        (None, None) => true,
        _ => false,
    }
}

impl PartialEq for Style {
    fn eq(&self, other: &Self) -> bool {
        color_eq(self.fill, other.fill)
            && color_eq(self.stroke, other.stroke)
            && self.stroke_width == other.stroke_width
            && self.dash == other.dash
            && self.opacity == other.opacity
    }
}

/// The kind of a [`MarkPayload`].
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum MarkKind {
    /// Axis-aligned rectangle.
    Rect,
    /// Circle.
    Circle,
    /// Arbitrary path (lines, areas, polygons).
    Path,
    /// Unshaped text.
    Text,
}

/// Renderable geometry and style for one mark.
#[derive(Clone, Debug, PartialEq)]
pub enum MarkPayload {
    /// An axis-aligned rectangle.
    Rect {
        /// Rectangle in scene coordinates.
        rect: Rect,
        /// Paint.
        style: Style,
    },
    /// A circle.
    Circle {
        /// Center in scene coordinates.
        center: Point,
        /// Radius in scene units.
        radius: f64,
        /// Paint.
        style: Style,
    },
    /// A path.
    Path {
        /// Path geometry in scene coordinates.
        path: BezPath,
        /// Paint.
        style: Style,
    },
    /// A text run.
    Text {
        /// Anchor position.
        pos: Point,
        /// Text content.
        text: String,
        /// Font size in scene units.
        font_size: f64,
        /// Rotation in degrees around `pos`.
        angle: f64,
        /// Horizontal anchor.
        anchor: TextAnchor,
        /// Vertical baseline.
        baseline: TextBaseline,
        /// Paint (`fill` is the glyph color).
        style: Style,
    },
}

impl MarkPayload {
    /// A filled rectangle.
    pub fn rect(rect: Rect, style: Style) -> Self {
        Self::Rect { rect, style }
    }

    /// A circle.
    pub fn circle(center: Point, radius: f64, style: Style) -> Self {
        Self::Circle {
            center,
            radius,
            style,
        }
    }

    /// A path.
    pub fn path(path: BezPath, style: Style) -> Self {
        Self::Path { path, style }
    }

    /// A text run with default size, anchor and baseline.
    pub fn text(pos: Point, text: impl Into<String>, style: Style) -> Self {
        Self::Text {
            pos,
            text: text.into(),
            font_size: 11.0,
            angle: 0.0,
            anchor: TextAnchor::Start,
            baseline: TextBaseline::Middle,
            style,
        }
    }

    /// Returns the payload kind.
    pub fn kind(&self) -> MarkKind {
        match self {
            Self::Rect { .. } => MarkKind::Rect,
            Self::Circle { .. } => MarkKind::Circle,
            Self::Path { .. } => MarkKind::Path,
            Self::Text { .. } => MarkKind::Text,
        }
    }

    /// Returns the payload style.
    pub fn style(&self) -> &Style {
        match self {
            Self::Rect { style, .. }
            | Self::Circle { style, .. }
            | Self::Path { style, .. }
            | Self::Text { style, .. } => style,
        }
    }

    /// Returns the payload style mutably.
    pub fn style_mut(&mut self) -> &mut Style {
        match self {
            Self::Rect { style, .. }
            | Self::Circle { style, .. }
            | Self::Path { style, .. }
            | Self::Text { style, .. } => style,
        }
    }

    /// Returns a copy with the opacity replaced.
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.style_mut().opacity = opacity;
        self
    }

    /// Sets text size, rotation, anchor and baseline. No-op for non-text payloads.
    pub fn with_text_layout(
        mut self,
        size: f64,
        rotation: f64,
        text_anchor: TextAnchor,
        text_baseline: TextBaseline,
    ) -> Self {
        if let Self::Text {
            font_size,
            angle,
            anchor,
            baseline,
            ..
        } = &mut self
        {
            *font_size = size;
            *angle = rotation;
            *anchor = text_anchor;
            *baseline = text_baseline;
        }
        self
    }
}

/// A single keyed mark.
#[derive(Clone, Debug, PartialEq)]
pub struct Mark {
    /// Stable identity.
    pub id: MarkId,
    /// Paint order; higher values draw on top.
    pub z_index: i32,
    /// Target state.
    pub payload: MarkPayload,
    /// State a newly entering mark starts from. `None` appears at the target immediately.
    pub enter: Option<MarkPayload>,
    /// State an exiting mark animates to before removal. `None` removes immediately.
    pub exit: Option<MarkPayload>,
}

impl Mark {
    /// Creates a mark with no enter/exit animation.
    pub fn new(id: MarkId, payload: MarkPayload) -> Self {
        Self {
            id,
            z_index: 0,
            payload,
            enter: None,
            exit: None,
        }
    }

    /// Sets the paint order.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Sets the state the mark enters from.
    pub fn with_enter(mut self, enter: MarkPayload) -> Self {
        self.enter = Some(enter);
        self
    }

    /// Sets the state the mark exits to.
    pub fn with_exit(mut self, exit: MarkPayload) -> Self {
        self.exit = Some(exit);
        self
    }

    /// Uses the same zero state for enter and exit.
    pub fn with_zero(self, zero: MarkPayload) -> Self {
        self.with_enter(zero.clone()).with_exit(zero)
    }

    /// Fades in and out instead of changing geometry.
    pub fn with_fade(self) -> Self {
        let zero = self.payload.clone().with_opacity(0.0);
        self.with_zero(zero)
    }

    /// Returns the payload kind.
    pub fn kind(&self) -> MarkKind {
        self.payload.kind()
    }
}
