// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Per-instance chart state: scene, animation, hover and tooltip.

use alloc::vec::Vec;

use insight_core::{
    Animator, MarkDiff, MarkId, MarkPayload, RenderedMark, Scene, Style, Tooltip, Transition,
};
use kurbo::{Point, Rect};
use log::{debug, trace};

use crate::chart::{Chart, ChartOutput};
use crate::color::{rgb, theme};
use crate::error::RenderError;
use crate::hit::{HitRegion, topmost};
use crate::layout::{ChartLayout, Size};
use crate::measure::TextMeasurer;
use crate::z_order;

const HOVER_MARKER: u64 = MarkId::space("hover-marker");

/// Font size of tooltip text.
pub const TOOLTIP_FONT_SIZE: f64 = 12.0;
/// Horizontal and vertical padding inside the tooltip box.
pub const TOOLTIP_PADDING: (f64, f64) = (8.0, 6.0);
/// Line advance of tooltip text, in multiples of the font size.
const TOOLTIP_LINE_HEIGHT: f64 = 1.4;

/// Result of a render request.
#[derive(Clone, Debug, PartialEq)]
pub enum RenderOutcome {
    /// Marks were reconciled; the diffs are already playing.
    Drawn {
        /// Enter, update and exit operations of this render.
        diffs: Vec<MarkDiff>,
    },
    /// The container has no measurable area yet; nothing changed.
    Skipped,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct Hover {
    region: usize,
    index: usize,
}

/// Owns everything one chart instance draws.
///
/// Nothing here is shared between instances: each renderer has its own scene, animator,
/// hit regions and tooltip, and releases them when dropped.
#[derive(Debug)]
pub struct ChartRenderer<C: Chart> {
    chart: C,
    size: Size,
    scene: Scene,
    animator: Animator,
    tooltip: Tooltip,
    hits: Vec<HitRegion>,
    pointer: Option<Point>,
    hover: Option<Hover>,
}

impl<C: Chart> ChartRenderer<C> {
    /// Creates a renderer with the default transition and an unmeasured container.
    pub fn new(chart: C) -> Self {
        Self {
            chart,
            size: Size::default(),
            scene: Scene::new(),
            animator: Animator::new(Transition::default()),
            tooltip: Tooltip::new(),
            hits: Vec::new(),
            pointer: None,
            hover: None,
        }
    }

    /// Replaces the transition used for subsequent diffs.
    pub fn with_transition(mut self, transition: Transition) -> Self {
        self.animator = Animator::new(transition);
        self
    }

    /// Sets the container size.
    pub fn with_size(mut self, size: Size) -> Self {
        self.size = size;
        self
    }

    /// The chart configuration.
    pub fn chart(&self) -> &C {
        &self.chart
    }

    /// Mutable chart configuration; takes effect on the next render.
    pub fn chart_mut(&mut self) -> &mut C {
        &mut self.chart
    }

    /// Current container size.
    pub fn size(&self) -> Size {
        self.size
    }

    /// Records a new container size; takes effect on the next render.
    pub fn resize(&mut self, size: Size) {
        self.size = size;
    }

    /// Rebuilds the chart for `input` and starts transitions at time `now` (milliseconds).
    ///
    /// Skips without touching any state while the container is unmeasured.
    pub fn render(&mut self, input: &C::Input, now: f64) -> Result<RenderOutcome, RenderError> {
        if self.size.is_empty() {
            debug!(
                "skipping render: container is {}x{}",
                self.size.width, self.size.height
            );
            return Ok(RenderOutcome::Skipped);
        }
        let layout = ChartLayout::arrange(self.size, self.chart.margins());
        let ChartOutput { marks, hits } = self.chart.build(input, &layout);
        let diffs = self.scene.tick(marks)?;
        trace!("render produced {} diffs", diffs.len());
        self.animator.settle(now);
        self.animator.apply(&diffs, now);
        self.hits = hits;
        self.hover = None;
        self.refresh_hover();
        Ok(RenderOutcome::Drawn { diffs })
    }

    /// Tracks the pointer: the topmost region under it is emphasized and described by the
    /// tooltip.
    pub fn pointer_move(&mut self, pointer: Point) {
        self.pointer = Some(pointer);
        self.refresh_hover();
    }

    /// Reverts emphasis and hides the tooltip.
    pub fn pointer_leave(&mut self) {
        self.pointer = None;
        self.hover = None;
        self.tooltip.hide();
    }

    fn refresh_hover(&mut self) {
        let Some(pointer) = self.pointer else {
            return;
        };
        match topmost(&self.hits, pointer) {
            Some((region, index)) => {
                let next = Hover { region, index };
                if self.hover == Some(next) {
                    self.tooltip.move_to(pointer);
                } else {
                    self.hover = Some(next);
                    let lines = self.hits[region].tooltip.at(index).to_vec();
                    self.tooltip.show(pointer, lines);
                }
            }
            None => {
                self.hover = None;
                self.tooltip.hide();
            }
        }
    }

    /// Key of the hovered datum.
    pub fn hovered(&self) -> Option<&str> {
        self.hover
            .and_then(|h| self.hits.get(h.region))
            .map(|r| r.key.as_str())
    }

    /// The tooltip owned by this renderer.
    pub fn tooltip(&self) -> &Tooltip {
        &self.tooltip
    }

    /// Background box of the visible tooltip, sized by `measurer`.
    ///
    /// The box flips to the left of the pointer when it would leave the container.
    pub fn tooltip_box(&self, measurer: &impl TextMeasurer) -> Option<Rect> {
        let pos = self.tooltip.position()?;
        let (mut width, mut height) = (0.0_f64, 0.0);
        for line in self.tooltip.lines() {
            let (w, h) = measurer.measure(line, TOOLTIP_FONT_SIZE);
            width = width.max(w);
            height += h * TOOLTIP_LINE_HEIGHT;
        }
        let (pad_x, pad_y) = TOOLTIP_PADDING;
        let (width, height) = (width + 2.0 * pad_x, height + 2.0 * pad_y);
        let x0 = if pos.x + width > self.size.width {
            (pos.x - width - 2.0 * insight_core::TOOLTIP_OFFSET.x).max(0.0)
        } else {
            pos.x
        };
        Some(Rect::new(x0, pos.y, x0 + width, pos.y + height))
    }

    /// Hit regions of the last render.
    pub fn hit_regions(&self) -> &[HitRegion] {
        &self.hits
    }

    /// Returns `true` while a transition is running at `now`.
    pub fn is_animating(&self, now: f64) -> bool {
        self.animator.is_animating(now)
    }

    /// Drops finished exit transitions.
    pub fn settle(&mut self, now: f64) {
        self.animator.settle(now);
    }

    /// Marks to draw at `now` in paint order, with hover emphasis and markers applied.
    pub fn frame(&self, now: f64) -> Vec<RenderedMark> {
        let mut marks = self.animator.frame(now);
        let Some(hover) = self.hover else {
            return marks;
        };
        let Some(region) = self.hits.get(hover.region) else {
            return marks;
        };
        for mark in marks.iter_mut().filter(|m| m.id == region.target) {
            region.emphasis.apply(&mut mark.payload);
        }
        let style = Style::filled(rgb(theme::TEXT));
        for (n, &center) in region.markers_at(hover.index).iter().enumerate() {
            marks.push(RenderedMark {
                id: MarkId::from_raw(HOVER_MARKER.wrapping_add(n as u64)),
                z_index: z_order::HOVER_OVERLAY,
                payload: MarkPayload::circle(center, region.marker_radius, style.clone()),
            });
        }
        marks
    }
}

impl<C: Chart> Drop for ChartRenderer<C> {
    fn drop(&mut self) {
        self.tooltip.hide();
        self.hits.clear();
        trace!("chart renderer released {} scene marks", self.scene.len());
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use alloc::string::String;
    use alloc::vec;

    use insight_core::Mark;
    use kurbo::Rect;

    use super::*;
    use crate::bar_mark::BarMarkSpec;
    use crate::hit::{Emphasis, HitShape};
    use crate::layout::Margins;
    use crate::scale::{ScaleBand, ScaleLinear, zero_based_domain};

    const BARS: u64 = MarkId::space("test-bars");

    struct Bars;

    impl Chart for Bars {
        type Input = [(&'static str, f64)];

        fn margins(&self) -> Margins {
            Margins::new(10.0, 10.0, 10.0, 10.0)
        }

        fn build(&self, input: &Self::Input, layout: &ChartLayout) -> ChartOutput {
            let band = ScaleBand::new(layout.x_range(), input.len());
            let y = ScaleLinear::new(
                zero_based_domain(input.iter().map(|d| d.1)),
                layout.y_range(),
            );
            let mut out = ChartOutput::new();
            for (i, (key, v)) in input.iter().enumerate() {
                let bar = BarMarkSpec::vertical(
                    MarkId::for_key(BARS, key),
                    band.x(i),
                    band.band_width(),
                    y.map(0.0),
                    y.map(*v),
                );
                out.hit(
                    HitRegion::new(
                        bar.id,
                        *key,
                        HitShape::Rect(bar.rect()),
                        vec![String::from(*key)],
                    )
                    .with_emphasis(Emphasis::opacity(0.8)),
                );
                out.push(bar.mark());
            }
            out
        }
    }

    struct Dupes;

    impl Chart for Dupes {
        type Input = ();

        fn margins(&self) -> Margins {
            Margins::default()
        }

        fn build(&self, _: &(), _: &ChartLayout) -> ChartOutput {
            let payload = MarkPayload::rect(Rect::ZERO, Style::default());
            let mut out = ChartOutput::new();
            out.push(Mark::new(MarkId::from_raw(1), payload.clone()));
            out.push(Mark::new(MarkId::from_raw(1), payload));
            out
        }
    }

    fn rect_of(r: &ChartRenderer<Bars>, key: &str, now: f64) -> Rect {
        let id = MarkId::for_key(BARS, key);
        match r.frame(now).into_iter().find(|m| m.id == id) {
            Some(RenderedMark {
                payload: MarkPayload::Rect { rect, .. },
                ..
            }) => rect,
            other => panic!("no rect for {key}: {other:?}"),
        }
    }

    #[test]
    fn unmeasured_container_skips_then_recovers() {
        let mut r = ChartRenderer::new(Bars);
        let data = [("a", 1.0)];
        assert_eq!(r.render(&data, 0.0), Ok(RenderOutcome::Skipped));
        assert!(r.frame(0.0).is_empty(), "nothing drawn while skipped");
        r.resize(Size::new(220.0, 120.0));
        let Ok(RenderOutcome::Drawn { diffs }) = r.render(&data, 0.0) else {
            panic!("expected a drawn render");
        };
        assert_eq!(diffs.len(), 1);
    }

    #[test]
    fn bars_grow_from_the_baseline() {
        let mut r = ChartRenderer::new(Bars).with_size(Size::new(220.0, 120.0));
        r.render(&[("a", 4.0)], 0.0).unwrap();
        assert_eq!(rect_of(&r, "a", 0.0).height(), 0.0, "enters with zero height");
        assert_eq!(rect_of(&r, "a", 750.0).height(), 100.0, "ends at full height");
        assert!(!r.is_animating(750.0));
    }

    #[test]
    fn keyed_updates_continue_from_the_displayed_state() {
        let mut r = ChartRenderer::new(Bars).with_size(Size::new(220.0, 120.0));
        r.render(&[("a", 4.0), ("b", 2.0)], 0.0).unwrap();
        // "a" is removed; "b" becomes the maximum and grows, it is not rebuilt.
        let Ok(RenderOutcome::Drawn { diffs }) = r.render(&[("b", 2.0)], 750.0) else {
            panic!("expected a drawn render");
        };
        assert!(diffs.iter().any(|d| matches!(d, MarkDiff::Exit { .. })), "a exits");
        assert!(diffs.iter().all(|d| !matches!(d, MarkDiff::Enter { .. })), "b is kept");
        assert_eq!(rect_of(&r, "b", 750.0).height(), 50.0);
        assert_eq!(rect_of(&r, "b", 1500.0).height(), 100.0);
        assert_eq!(rect_of(&r, "a", 1500.0).height(), 0.0, "a collapses onto the baseline");
        r.settle(1500.0);
        assert_eq!(r.frame(1500.0).len(), 1);
    }

    #[test]
    fn hover_emphasizes_and_leave_reverts() {
        let mut r = ChartRenderer::new(Bars).with_size(Size::new(220.0, 120.0));
        r.render(&[("a", 4.0), ("b", 2.0)], 0.0).unwrap();
        let a = rect_of(&r, "a", 750.0);
        r.pointer_move(a.center());
        assert_eq!(r.hovered(), Some("a"));
        assert_eq!(r.tooltip().lines(), ["a"]);
        assert_eq!(r.tooltip().position(), Some(a.center() + insight_core::TOOLTIP_OFFSET));
        let id = MarkId::for_key(BARS, "a");
        let opacity = |r: &ChartRenderer<Bars>| {
            r.frame(750.0)
                .into_iter()
                .find(|m| m.id == id)
                .map(|m| m.payload.style().opacity)
        };
        assert_eq!(opacity(&r), Some(0.8));
        r.pointer_leave();
        assert!(!r.tooltip().is_visible());
        assert_eq!(opacity(&r), Some(1.0));
    }

    #[test]
    fn tooltip_box_stays_inside_the_container() {
        use crate::measure::HeuristicTextMeasurer;

        let mut r = ChartRenderer::new(Bars).with_size(Size::new(220.0, 120.0));
        r.render(&[("a", 4.0), ("b", 2.0)], 0.0).unwrap();
        assert_eq!(r.tooltip_box(&HeuristicTextMeasurer), None, "hidden tooltip has no box");
        r.pointer_move(rect_of(&r, "b", 750.0).center());
        let bbox = r.tooltip_box(&HeuristicTextMeasurer).expect("visible tooltip");
        assert!(bbox.x1 <= 220.0, "flipped left of the pointer");
        assert!(bbox.width() > 2.0 * TOOLTIP_PADDING.0);
    }

    #[test]
    fn hover_is_recomputed_after_data_changes() {
        let mut r = ChartRenderer::new(Bars).with_size(Size::new(220.0, 120.0));
        r.render(&[("a", 4.0)], 0.0).unwrap();
        r.pointer_move(Point::new(110.0, 100.0));
        assert_eq!(r.hovered(), Some("a"));
        r.render(&[("b", 4.0)], 750.0).unwrap();
        assert_eq!(r.hovered(), Some("b"));
        assert_eq!(r.tooltip().lines(), ["b"]);
    }

    #[test]
    fn duplicate_ids_are_reported_without_changing_state() {
        let mut r = ChartRenderer::new(Dupes).with_size(Size::new(10.0, 10.0));
        assert!(matches!(r.render(&(), 0.0), Err(RenderError::Scene(_))));
        assert!(r.frame(0.0).is_empty(), "scene untouched");
    }
}
