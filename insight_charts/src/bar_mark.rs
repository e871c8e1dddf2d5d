// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bar mark generation.

use insight_core::{Mark, MarkId, MarkPayload, Style};
use kurbo::Rect;
use peniko::Color;

/// Direction a bar grows from its baseline.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum BarOrient {
    /// Bars grow along y from a horizontal baseline.
    #[default]
    Vertical,
    /// Bars grow along x from a vertical baseline.
    Horizontal,
}

/// A single bar.
///
/// The bar enters from, and exits to, a zero-length rectangle on its baseline.
#[derive(Clone, Debug)]
pub struct BarMarkSpec {
    /// Stable mark id.
    pub id: MarkId,
    /// Growth direction.
    pub orient: BarOrient,
    /// Band start along the category axis.
    pub band_start: f64,
    /// Band width along the category axis.
    pub band_width: f64,
    /// Baseline position along the value axis (scene units).
    pub baseline: f64,
    /// Bar end position along the value axis (scene units).
    pub value: f64,
    /// Fill and stroke.
    pub style: Style,
    /// Rendering order hint.
    pub z_index: i32,
}

impl BarMarkSpec {
    /// Creates a vertical bar spanning `band_start..band_start + band_width` from `baseline`
    /// to `value`.
    pub fn vertical(id: MarkId, band_start: f64, band_width: f64, baseline: f64, value: f64) -> Self {
        Self {
            id,
            orient: BarOrient::Vertical,
            band_start,
            band_width,
            baseline,
            value,
            style: Style::default(),
            z_index: crate::z_order::SERIES_FILL,
        }
    }

    /// Creates a horizontal bar.
    pub fn horizontal(
        id: MarkId,
        band_start: f64,
        band_width: f64,
        baseline: f64,
        value: f64,
    ) -> Self {
        Self {
            orient: BarOrient::Horizontal,
            ..Self::vertical(id, band_start, band_width, baseline, value)
        }
    }

    /// Sets the fill color.
    pub fn with_fill(mut self, fill: Color) -> Self {
        self.style.fill = Some(fill);
        self
    }

    /// Sets the full style.
    pub fn with_style(mut self, style: Style) -> Self {
        self.style = style;
        self
    }

    /// Sets the z-index used for render ordering.
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    fn rect_to(&self, end: f64) -> Rect {
        let (a0, a1) = (self.band_start, self.band_start + self.band_width.max(0.0));
        let (v0, v1) = (self.baseline.min(end), self.baseline.max(end));
        match self.orient {
            BarOrient::Vertical => Rect::new(a0, v0, a1, v1),
            BarOrient::Horizontal => Rect::new(v0, a0, v1, a1),
        }
    }

    /// Target geometry.
    pub fn rect(&self) -> Rect {
        self.rect_to(self.value)
    }

    /// Generates the bar mark.
    pub fn mark(&self) -> Mark {
        let zero = MarkPayload::rect(self.rect_to(self.baseline), self.style.clone());
        Mark::new(self.id, MarkPayload::rect(self.rect(), self.style.clone()))
            .with_z_index(self.z_index)
            .with_zero(zero)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn vertical_bar_enters_from_baseline() {
        let bar = BarMarkSpec::vertical(MarkId::from_raw(1), 10.0, 20.0, 300.0, 100.0);
        assert_eq!(bar.rect(), Rect::new(10.0, 100.0, 30.0, 300.0));
        let mark = bar.mark();
        let Some(MarkPayload::Rect { rect, .. }) = mark.enter else {
            panic!("expected rect enter state");
        };
        assert_eq!(rect.height(), 0.0);
        assert_eq!(rect.y0, 300.0);
    }

    #[test]
    fn negative_horizontal_bar_extends_left_of_baseline() {
        let bar = BarMarkSpec::horizontal(MarkId::from_raw(1), 5.0, 10.0, 200.0, 150.0);
        assert_eq!(bar.rect(), Rect::new(150.0, 5.0, 200.0, 15.0));
    }
}
