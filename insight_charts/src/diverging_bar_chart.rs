// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Horizontal bars growing left or right from a zero line.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use insight_core::MarkId;

use crate::axis::{AxisOrient, AxisSpec};
use crate::bar_mark::BarMarkSpec;
use crate::chart::{Chart, ChartOutput};
use crate::color::{rgb, theme};
use crate::format::format_fixed;
use crate::hit::{Emphasis, HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins};
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleBand, ScaleLinearSpec, infer_domain};
use crate::z_order;

const BARS: u64 = MarkId::space("diverging-bars");
const ZERO: u64 = MarkId::space("diverging-zero");

/// Signed bars per category, sorted by category name.
///
/// The value domain always contains zero so that the zero line stays inside the plot.
#[derive(Clone, Debug)]
pub struct DivergingBarChart {
    /// Space around the plot.
    pub margins: Margins,
    /// Label of the value in tooltips.
    pub metric: String,
    /// Bar fill.
    pub fill: u32,
    /// Bar fill while hovered.
    pub hover_fill: u32,
}

impl DivergingBarChart {
    /// Creates the year-over-year growth chart.
    pub fn new() -> Self {
        Self {
            margins: Margins::new(20.0, 40.0, 40.0, 130.0),
            metric: String::from("YoY Growth"),
            fill: 0x3399ff,
            hover_fill: 0x66bbff,
        }
    }
}

impl Default for DivergingBarChart {
    fn default() -> Self {
        Self::new()
    }
}

fn format_growth(v: f64) -> String {
    format!("{}%", format_fixed(v, 0))
}

impl Chart for DivergingBarChart {
    type Input = [(String, f64)];

    fn margins(&self) -> Margins {
        self.margins
    }

    fn build(&self, input: &[(String, f64)], layout: &ChartLayout) -> ChartOutput {
        let plot = layout.plot;
        let mut rows: Vec<&(String, f64)> = input.iter().filter(|(_, v)| v.is_finite()).collect();
        rows.sort_by(|a, b| a.0.cmp(&b.0));

        let (lo, hi) = infer_domain(rows.iter().map(|(_, v)| *v)).unwrap_or((0.0, 0.0));
        let x = ScaleLinearSpec::new((lo.min(0.0), hi.max(0.0)))
            .with_nice(true)
            .instantiate_resolved(layout.x_range(), 8);
        let zero = x.map(0.0);
        let band = ScaleBand::new((plot.y0, plot.y1), rows.len()).with_padding(0.2, 0.1);

        let mut out = ChartOutput::new();
        out.push(
            RuleMarkSpec::vertical(MarkId::for_key(ZERO, "zero"), zero, plot.y0, plot.y1)
                .with_stroke(rgb(theme::AXIS), 1.0)
                .with_z_index(z_order::REFERENCE_LINES)
                .mark(),
        );
        for (i, (key, value)) in rows.iter().enumerate() {
            let bar = BarMarkSpec::horizontal(
                MarkId::for_key(BARS, key),
                band.x(i),
                band.band_width(),
                zero,
                x.map(*value),
            )
            .with_fill(rgb(self.fill));
            out.hit(
                HitRegion::new(
                    bar.id,
                    key.clone(),
                    HitShape::Rect(bar.rect()),
                    alloc::vec![
                        key.clone(),
                        format!("{}: {}%", self.metric, format_fixed(*value, 2)),
                    ],
                )
                .with_emphasis(Emphasis::fill(rgb(self.hover_fill))),
            );
            out.push(bar.mark());
        }

        let keys: Vec<&str> = rows.iter().map(|(k, _)| k.as_str()).collect();
        let mut y_axis = AxisSpec::band("y", AxisOrient::Left, plot.x0, &band, &keys, (plot.y0, plot.y1));
        y_axis.tick_size = 0.0;
        out.extend(y_axis.marks());
        out.extend(AxisSpec::linear("x", AxisOrient::Bottom, plot.y1, &x, 8, format_growth).marks());
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use insight_core::MarkPayload;

    use super::*;
    use crate::layout::Size;

    #[test]
    fn negative_growth_extends_left_of_zero() {
        let chart = DivergingBarChart::new();
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let input = [(String::from("Fortnite"), -20.0), (String::from("Dota 2"), 40.0)];
        let out = chart.build(&input, &layout);
        let HitShape::Rect(fortnite) = out.hits[1].shape else {
            panic!("expected a rect");
        };
        let HitShape::Rect(dota) = out.hits[0].shape else {
            panic!("expected a rect");
        };
        assert_eq!(out.hits[0].key, "Dota 2", "sorted by name");
        assert!((fortnite.x1 - dota.x0).abs() < 1e-9, "both bars meet at the zero line");
        assert!(fortnite.y0 > dota.y0);
        assert_eq!(out.hits[1].tooltip.at(0)[1], "YoY Growth: -20.00%");
    }

    #[test]
    fn zero_stays_in_the_domain_for_all_positive_input() {
        let chart = DivergingBarChart::new();
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let out = chart.build(&[(String::from("Valorant"), 25.0)], &layout);
        let zero = out
            .marks
            .iter()
            .find(|m| m.id == MarkId::for_key(ZERO, "zero"))
            .expect("zero line");
        let MarkPayload::Path { path, .. } = &zero.payload else {
            panic!("expected a path");
        };
        let bbox = kurbo::Shape::bounding_box(path);
        assert_eq!(bbox.x0, layout.plot.x0);
    }

    #[test]
    fn hover_brightens_the_fill() {
        let chart = DivergingBarChart::new();
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let out = chart.build(&[(String::from("Valorant"), 25.0)], &layout);
        let mut payload = out.marks[1].payload.clone();
        out.hits[0].emphasis.apply(&mut payload);
        assert_eq!(
            payload.style().fill.map(|c| c.components),
            Some(rgb(0x66bbff).components)
        );
    }
}
