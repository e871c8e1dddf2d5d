// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Two series over years, each on its own vertical axis.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use insight_core::MarkId;
use kurbo::{Point, Rect};

use crate::area_mark::LineMarkSpec;
use crate::axis::{AxisOrient, AxisSpec};
use crate::chart::{Chart, ChartOutput};
use crate::color::{SERIES_PALETTE, rgb};
use crate::format::{format_currency, format_grouped, format_si};
use crate::hit::{HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins};
use crate::legend::{LegendItem, LegendSpec};
use crate::scale::{ScaleLinearSpec, infer_domain, zero_based_domain};

const LINES: u64 = MarkId::space("dual-axis-lines");

/// Both series at one year.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct YearPair {
    /// Year.
    pub year: i32,
    /// Value on the left axis.
    pub left: f64,
    /// Value on the right axis.
    pub right: f64,
}

/// A dual-axis line chart.
///
/// The left series is a plain quantity and the right series is a currency amount. Hovering
/// anywhere over the plot picks the nearest year and marks both lines there.
#[derive(Clone, Debug)]
pub struct DualAxisLineChart {
    /// Space around the plot.
    pub margins: Margins,
    /// Left series name, used for its axis title, legend row and tooltip line.
    pub left_title: String,
    /// Right series name.
    pub right_title: String,
}

impl DualAxisLineChart {
    /// Creates the viewership versus earnings chart.
    pub fn new() -> Self {
        Self {
            margins: Margins::new(40.0, 60.0, 50.0, 60.0),
            left_title: String::from("Avg. Hours Watched"),
            right_title: String::from("Avg. Total Earnings"),
        }
    }
}

impl Default for DualAxisLineChart {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for DualAxisLineChart {
    type Input = [YearPair];

    fn margins(&self) -> Margins {
        self.margins
    }

    fn build(&self, input: &[YearPair], layout: &ChartLayout) -> ChartOutput {
        let plot = layout.plot;
        let mut points = input.to_vec();
        points.sort_by_key(|p| p.year);
        let years: Vec<i32> = points.iter().map(|p| p.year).collect();

        let x = ScaleLinearSpec::new(infer_domain(years.iter().map(|&y| f64::from(y))).unwrap_or((0.0, 0.0)))
            .with_nice(true)
            .instantiate_resolved(layout.x_range(), years.len().max(1));
        let left = ScaleLinearSpec::new(zero_based_domain(points.iter().map(|p| p.left)))
            .with_nice(true)
            .instantiate_resolved(layout.y_range(), 6);
        let right = ScaleLinearSpec::new(zero_based_domain(points.iter().map(|p| p.right)))
            .with_nice(true)
            .instantiate_resolved(layout.y_range(), 6);

        let xs: Vec<f64> = years.iter().map(|&y| x.map(f64::from(y))).collect();
        let left_pts: Vec<Point> = xs
            .iter()
            .zip(&points)
            .map(|(&px, p)| Point::new(px, left.map(p.left)))
            .collect();
        let right_pts: Vec<Point> = xs
            .iter()
            .zip(&points)
            .map(|(&px, p)| Point::new(px, right.map(p.right)))
            .collect();
        let (left_color, right_color) = (rgb(SERIES_PALETTE[0]), rgb(SERIES_PALETTE[1]));

        let mut out = ChartOutput::new();
        let left_line = LineMarkSpec::new(MarkId::for_key(LINES, "left"), left_pts.clone(), left_color, 2.0)
            .with_baseline(plot.y1);
        let right_line = LineMarkSpec::new(MarkId::for_key(LINES, "right"), right_pts.clone(), right_color, 2.0)
            .with_baseline(plot.y1);
        out.push(left_line.mark());
        out.push(right_line.mark());

        if !points.is_empty() {
            let lines = points
                .iter()
                .map(|p| {
                    alloc::vec![
                        format!("Year: {}", p.year),
                        format!("{}: {}", self.left_title, format_grouped(p.left)),
                        format!("{}: {}", self.right_title, format_currency(p.right)),
                    ]
                })
                .collect();
            let markers = left_pts
                .iter()
                .zip(&right_pts)
                .map(|(&l, &r)| alloc::vec![l, r])
                .collect();
            out.hit(
                HitRegion::new(
                    left_line.id,
                    "years",
                    HitShape::NearestX {
                        area: Rect::new(plot.x0, plot.y0, plot.x1, plot.y1),
                        xs,
                    },
                    Vec::new(),
                )
                .with_lines_per_index(lines)
                .with_markers(markers, 4.0),
            );
        }

        out.extend(
            AxisSpec::years("x", AxisOrient::Bottom, plot.y1, &x, &years)
                .with_title("Year", 40.0)
                .marks(),
        );
        out.extend(
            AxisSpec::linear("left", AxisOrient::Left, plot.x0, &left, 6, format_si)
                .with_title(self.left_title.clone(), self.margins.left - 12.0)
                .marks(),
        );
        out.extend(
            AxisSpec::linear("right", AxisOrient::Right, plot.x1, &right, 6, format_si)
                .with_title(self.right_title.clone(), self.margins.right - 12.0)
                .marks(),
        );
        out.extend(
            LegendSpec::new(
                "series",
                Point::new(layout.view.x1 - self.margins.right - 150.0, plot.y1 - 50.0),
                alloc::vec![
                    LegendItem::new(self.left_title.clone(), left_color),
                    LegendItem::new(self.right_title.clone(), right_color),
                ],
            )
            .marks(),
        );
        out
    }
}
