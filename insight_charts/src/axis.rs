// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Axis mark generation.
//!
//! An [`AxisSpec`] is a list of positioned ticks plus an orientation. Ticks are keyed by
//! their value (continuous scales) or category name (band and point scales), so a tick that
//! survives a domain change slides to its new position instead of being recreated.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashSet;
use insight_core::{Mark, MarkId, TextAnchor, TextBaseline};
use kurbo::Point;
use peniko::Color;

use crate::color::{rgb, theme};
use crate::format::{AXIS_LABEL_CHARS, truncate_label};
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleBand, ScaleLinear, ScalePoint};
use crate::text_mark::TextMarkSpec;
use crate::z_order;

const DOMAIN: u64 = MarkId::space("axis-domain");
const TICK: u64 = MarkId::space("axis-tick");
const LABEL: u64 = MarkId::space("axis-label");
const GRID: u64 = MarkId::space("axis-grid");
const TITLE: u64 = MarkId::space("axis-title");

/// Which side of the plot an axis sits on.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AxisOrient {
    /// Below the plot; ticks point down.
    Bottom,
    /// Left of the plot; ticks point left.
    Left,
    /// Right of the plot; ticks point right.
    Right,
}

/// One tick on an axis.
#[derive(Clone, Debug, PartialEq)]
pub struct AxisTick {
    /// Identity of the tick across renders.
    pub key: String,
    /// Position along the axis in scene coordinates.
    pub pos: f64,
    /// Displayed label.
    pub label: String,
}

/// Axis colors and font sizes.
#[derive(Clone, Copy, Debug)]
pub struct AxisStyle {
    /// Domain line and tick color.
    pub rule: Color,
    /// Label and title color.
    pub text: Color,
    /// Tick label font size.
    pub label_font_size: f64,
    /// Title font size.
    pub title_font_size: f64,
}

impl Default for AxisStyle {
    fn default() -> Self {
        Self {
            rule: rgb(theme::AXIS),
            text: rgb(theme::TEXT),
            label_font_size: 11.0,
            title_font_size: 12.0,
        }
    }
}

/// An axis: domain line, ticks, labels, optional gridlines and title.
#[derive(Clone, Debug)]
pub struct AxisSpec {
    /// Name that keeps this axis' marks apart from other axes in the same chart.
    pub name: &'static str,
    /// Side of the plot.
    pub orient: AxisOrient,
    /// Cross-axis position of the domain line (y for bottom axes, x for side axes).
    pub offset: f64,
    /// Start and end of the domain line along the axis.
    pub extent: (f64, f64),
    /// Ticks in display order.
    pub ticks: Vec<AxisTick>,
    /// Tick length.
    pub tick_size: f64,
    /// Label rotation in degrees.
    pub label_angle: f64,
    /// Cross-axis span of gridlines, when enabled.
    pub grid: Option<(f64, f64)>,
    /// Axis title and its distance from the domain line.
    pub title: Option<(String, f64)>,
    /// Colors and sizes.
    pub style: AxisStyle,
}

impl AxisSpec {
    /// Creates an axis without ticks.
    pub fn new(name: &'static str, orient: AxisOrient, offset: f64, extent: (f64, f64)) -> Self {
        Self {
            name,
            orient,
            offset,
            extent,
            ticks: Vec::new(),
            tick_size: 6.0,
            label_angle: 0.0,
            grid: None,
            title: None,
            style: AxisStyle::default(),
        }
    }

    /// Axis for a continuous scale with about `count` ticks formatted by `format`.
    pub fn linear(
        name: &'static str,
        orient: AxisOrient,
        offset: f64,
        scale: &ScaleLinear,
        count: usize,
        format: impl Fn(f64) -> String,
    ) -> Self {
        let (r0, r1) = scale.range();
        let mut axis = Self::new(name, orient, offset, (r0.min(r1), r0.max(r1)));
        axis.ticks = scale
            .ticks(count)
            .into_iter()
            .map(|v| AxisTick {
                key: format!("{v}"),
                pos: scale.map(v),
                label: format(v),
            })
            .collect();
        axis
    }

    /// Axis for a band scale; one tick per category at the band center.
    pub fn band<S: AsRef<str>>(
        name: &'static str,
        orient: AxisOrient,
        offset: f64,
        scale: &ScaleBand,
        categories: &[S],
        extent: (f64, f64),
    ) -> Self {
        let mut axis = Self::new(name, orient, offset, extent);
        axis.ticks = categories
            .iter()
            .take(scale.count())
            .enumerate()
            .map(|(i, c)| AxisTick {
                key: String::from(c.as_ref()),
                pos: scale.center(i),
                label: truncate_label(c.as_ref(), AXIS_LABEL_CHARS),
            })
            .collect();
        axis
    }

    /// Axis for a point scale; one tick per category.
    pub fn point<S: AsRef<str>>(
        name: &'static str,
        orient: AxisOrient,
        offset: f64,
        scale: &ScalePoint,
        categories: &[S],
        extent: (f64, f64),
    ) -> Self {
        let mut axis = Self::new(name, orient, offset, extent);
        axis.ticks = categories
            .iter()
            .enumerate()
            .map(|(i, c)| AxisTick {
                key: String::from(c.as_ref()),
                pos: scale.x(i),
                label: truncate_label(c.as_ref(), AXIS_LABEL_CHARS),
            })
            .collect();
        axis
    }

    /// Axis for a continuous year scale; one tick per year in `years`.
    pub fn years(
        name: &'static str,
        orient: AxisOrient,
        offset: f64,
        scale: &ScaleLinear,
        years: &[i32],
    ) -> Self {
        let (r0, r1) = scale.range();
        let mut axis = Self::new(name, orient, offset, (r0.min(r1), r0.max(r1)));
        axis.ticks = years
            .iter()
            .map(|&year| AxisTick {
                key: format!("{year}"),
                pos: scale.map(f64::from(year)),
                label: format!("{year}"),
            })
            .collect();
        axis
    }

    /// Rotates tick labels.
    pub fn with_label_angle(mut self, angle: f64) -> Self {
        self.label_angle = angle;
        self
    }

    /// Draws gridlines spanning `from..to` across the plot.
    pub fn with_grid(mut self, from: f64, to: f64) -> Self {
        self.grid = Some((from, to));
        self
    }

    /// Adds a title `distance` away from the domain line.
    pub fn with_title(mut self, title: impl Into<String>, distance: f64) -> Self {
        self.title = Some((title.into(), distance));
        self
    }

    /// Overrides colors and sizes.
    pub fn with_style(mut self, style: AxisStyle) -> Self {
        self.style = style;
        self
    }

    fn at(&self, along: f64, across: f64) -> Point {
        match self.orient {
            AxisOrient::Bottom => Point::new(along, across),
            AxisOrient::Left | AxisOrient::Right => Point::new(across, along),
        }
    }

    /// Direction ticks point in, away from the plot.
    fn outward(&self) -> f64 {
        match self.orient {
            AxisOrient::Bottom | AxisOrient::Right => 1.0,
            AxisOrient::Left => -1.0,
        }
    }

    fn label_layout(&self) -> (TextAnchor, TextBaseline) {
        match self.orient {
            AxisOrient::Bottom if self.label_angle != 0.0 => (TextAnchor::End, TextBaseline::Middle),
            AxisOrient::Bottom => (TextAnchor::Middle, TextBaseline::Top),
            AxisOrient::Left => (TextAnchor::End, TextBaseline::Middle),
            AxisOrient::Right => (TextAnchor::Start, TextBaseline::Middle),
        }
    }

    /// Generates axis marks. Ticks with a repeated key are drawn once.
    pub fn marks(&self) -> Vec<Mark> {
        let mut out = Vec::with_capacity(self.ticks.len() * 3 + 2);
        let rule = self.style.rule;
        let out_dir = self.outward();

        out.push(
            RuleMarkSpec::new(
                MarkId::for_key(DOMAIN, self.name),
                self.at(self.extent.0, self.offset),
                self.at(self.extent.1, self.offset),
            )
            .with_stroke(rule, 1.0)
            .with_z_index(z_order::AXIS_RULES)
            .mark(),
        );

        let (anchor, baseline) = self.label_layout();
        let mut seen = HashSet::new();
        for tick in &self.ticks {
            if !tick.pos.is_finite() || !seen.insert(tick.key.as_str()) {
                continue;
            }
            out.push(
                RuleMarkSpec::new(
                    MarkId::for_pair(TICK, self.name, &tick.key),
                    self.at(tick.pos, self.offset),
                    self.at(tick.pos, self.offset + out_dir * self.tick_size),
                )
                .with_stroke(rule, 1.0)
                .with_z_index(z_order::AXIS_RULES)
                .mark(),
            );
            out.push(
                TextMarkSpec::new(
                    MarkId::for_pair(LABEL, self.name, &tick.key),
                    self.at(tick.pos, self.offset + out_dir * (self.tick_size + 3.0)),
                    tick.label.clone(),
                )
                .with_font_size(self.style.label_font_size)
                .with_fill(self.style.text)
                .with_angle(self.label_angle)
                .with_anchor(anchor)
                .with_baseline(baseline)
                .with_z_index(z_order::AXIS_LABELS)
                .mark(),
            );
            if let Some((from, to)) = self.grid {
                out.push(
                    RuleMarkSpec::new(
                        MarkId::for_pair(GRID, self.name, &tick.key),
                        self.at(tick.pos, from),
                        self.at(tick.pos, to),
                    )
                    .with_stroke(rule.with_alpha(0.2), 1.0)
                    .with_z_index(z_order::GRID_LINES)
                    .mark(),
                );
            }
        }

        if let Some((title, distance)) = &self.title {
            let mid = (self.extent.0 + self.extent.1) * 0.5;
            let angle = match self.orient {
                AxisOrient::Bottom => 0.0,
                AxisOrient::Left => -90.0,
                AxisOrient::Right => 90.0,
            };
            out.push(
                TextMarkSpec::new(
                    MarkId::for_key(TITLE, self.name),
                    self.at(mid, self.offset + out_dir * distance),
                    title.clone(),
                )
                .with_font_size(self.style.title_font_size)
                .with_fill(self.style.text)
                .with_angle(angle)
                .with_anchor(TextAnchor::Middle)
                .with_z_index(z_order::AXIS_TITLES)
                .mark(),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use insight_core::{MarkKind, MarkPayload};

    use super::*;
    use crate::format::format_si;

    fn labels(marks: &[Mark]) -> Vec<String> {
        marks
            .iter()
            .filter(|m| m.z_index == z_order::AXIS_LABELS)
            .filter_map(|m| match &m.payload {
                MarkPayload::Text { text, .. } => Some(text.clone()),
                _ => None,
            })
            .collect()
    }

    #[test]
    fn linear_axis_formats_ticks() {
        let scale = ScaleLinear::new((0.0, 2_000_000.0), (300.0, 0.0));
        let axis = AxisSpec::linear("y", AxisOrient::Left, 60.0, &scale, 5, format_si);
        let marks = axis.marks();
        assert_eq!(
            labels(&marks),
            ["0.0", "500k", "1.0M", "1.5M", "2.0M"].map(String::from)
        );
        assert_eq!(marks[0].kind(), MarkKind::Path, "domain line first");
    }

    #[test]
    fn band_labels_are_truncated_but_keyed_by_full_name() {
        let cats = ["Counter-Strike: Global Offensive", "Dota 2"];
        let scale = ScaleBand::new((0.0, 200.0), cats.len());
        let axis = AxisSpec::band("x", AxisOrient::Bottom, 300.0, &scale, &cats, (0.0, 200.0))
            .with_label_angle(-45.0);
        assert_eq!(axis.ticks[0].key, cats[0]);
        assert_eq!(axis.ticks[0].label, "Counter-Strike: Global...");
        let text_ids: Vec<MarkId> = axis
            .marks()
            .iter()
            .filter(|m| m.kind() == MarkKind::Text)
            .map(|m| m.id)
            .collect();
        assert_eq!(text_ids[0], MarkId::for_pair(LABEL, "x", cats[0]));
    }

    #[test]
    fn surviving_ticks_keep_their_identity() {
        let a = ScaleLinear::new((0.0, 100.0), (300.0, 0.0));
        let b = ScaleLinear::new((0.0, 200.0), (300.0, 0.0));
        let fmt = |v: f64| format!("{v}");
        let ids = |s: &ScaleLinear| -> HashSet<MarkId> {
            AxisSpec::linear("y", AxisOrient::Left, 0.0, s, 5, fmt)
                .marks()
                .into_iter()
                .map(|m| m.id)
                .collect()
        };
        let shared = ids(&a).intersection(&ids(&b)).count();
        // Domain line plus the 0 and 100 ticks (tick + label each).
        assert_eq!(shared, 5);
    }

    #[test]
    fn gridlines_and_title_are_optional() {
        let scale = ScaleLinear::new((0.0, 10.0), (300.0, 0.0));
        let bare = AxisSpec::linear("y", AxisOrient::Left, 60.0, &scale, 2, format_si).marks();
        let full = AxisSpec::linear("y", AxisOrient::Left, 60.0, &scale, 2, format_si)
            .with_grid(60.0, 400.0)
            .with_title("Peak Viewers", 45.0)
            .marks();
        let ticks = bare.len() - 1;
        assert_eq!(full.len(), bare.len() + ticks / 2 + 1);
    }
}
