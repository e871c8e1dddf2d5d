// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Container sizing and fixed-margin plot layout.

use kurbo::Rect;

/// A width/height pair used by chart layout.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Size {
    /// Width in chart coordinate units.
    pub width: f64,
    /// Height in chart coordinate units.
    pub height: f64,
}

impl Size {
    /// Creates a size.
    pub const fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Returns `true` if either side is zero, negative or not finite.
    pub fn is_empty(&self) -> bool {
        !(self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0)
    }
}

/// Space reserved around the plot for axes, titles and legends.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Margins {
    /// Top margin.
    pub top: f64,
    /// Right margin.
    pub right: f64,
    /// Bottom margin.
    pub bottom: f64,
    /// Left margin.
    pub left: f64,
}

impl Margins {
    /// Creates margins in CSS order (top, right, bottom, left).
    pub const fn new(top: f64, right: f64, bottom: f64, left: f64) -> Self {
        Self {
            top,
            right,
            bottom,
            left,
        }
    }
}

/// Output of the layout pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ChartLayout {
    /// Outer chart bounds.
    pub view: Rect,
    /// The plot rectangle, inset from `view` by the margins.
    pub plot: Rect,
}

impl ChartLayout {
    /// Lays out a chart of `view` size with fixed `margins`.
    ///
    /// The plot never has negative extent; a container smaller than its margins gives an
    /// empty plot.
    pub fn arrange(view: Size, margins: Margins) -> Self {
        let view_rect = Rect::new(0.0, 0.0, view.width.max(0.0), view.height.max(0.0));
        let x0 = margins.left.min(view_rect.x1);
        let y0 = margins.top.min(view_rect.y1);
        let plot = Rect::new(
            x0,
            y0,
            (view_rect.x1 - margins.right).max(x0),
            (view_rect.y1 - margins.bottom).max(y0),
        );
        Self {
            view: view_rect,
            plot,
        }
    }

    /// Horizontal plot range, left to right.
    pub fn x_range(&self) -> (f64, f64) {
        (self.plot.x0, self.plot.x1)
    }

    /// Vertical plot range, bottom to top (screen y decreases upwards).
    pub fn y_range(&self) -> (f64, f64) {
        (self.plot.y1, self.plot.y0)
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn plot_is_view_minus_margins() {
        let layout = ChartLayout::arrange(
            Size::new(600.0, 400.0),
            Margins::new(20.0, 140.0, 40.0, 60.0),
        );
        assert_eq!(layout.plot, Rect::new(60.0, 20.0, 460.0, 360.0));
        assert_eq!(layout.y_range(), (360.0, 20.0));
    }

    #[test]
    fn tiny_containers_do_not_invert_the_plot() {
        let layout = ChartLayout::arrange(Size::new(50.0, 10.0), Margins::new(20.0, 20.0, 20.0, 20.0));
        assert!(layout.plot.width() >= 0.0);
        assert!(layout.plot.height() >= 0.0);
    }

    #[test]
    fn zero_sizes_are_empty() {
        assert!(Size::new(0.0, 300.0).is_empty());
        assert!(Size::new(f64::NAN, 300.0).is_empty());
        assert!(!Size::new(1.0, 1.0).is_empty());
    }
}
