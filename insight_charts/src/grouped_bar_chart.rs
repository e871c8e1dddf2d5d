// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped bars: one cluster per category, one bar per series inside each cluster.

use alloc::string::String;
use alloc::vec::Vec;

use insight_core::MarkId;
use kurbo::Point;

use crate::axis::{AxisOrient, AxisSpec};
use crate::bar_mark::BarMarkSpec;
use crate::chart::{Chart, ChartOutput};
use crate::color::{CategoryColors, SERIES_PALETTE};
use crate::format::format_si;
use crate::hit::{Emphasis, HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins};
use crate::legend::{LegendItem, LegendSpec};
use crate::scale::{ScaleBand, ScaleLinearSpec, zero_based_domain};

const BARS: u64 = MarkId::space("grouped-bars");

/// One bar inside a group.
#[derive(Clone, Debug, PartialEq)]
pub struct GroupedBar {
    /// Series the bar belongs to.
    pub series: String,
    /// Bar height in data units.
    pub value: f64,
    /// Tooltip lines after the group key.
    pub details: Vec<String>,
}

/// One cluster of bars.
#[derive(Clone, Debug, PartialEq)]
pub struct BarGroup {
    /// Category shown on the x axis.
    pub key: String,
    /// Bars in any order; they are laid out in the chart's series order.
    pub bars: Vec<GroupedBar>,
}

/// Grouped bar chart with a shared zero-based value axis and a series legend.
#[derive(Clone, Debug)]
pub struct GroupedBarChart {
    /// Space around the plot.
    pub margins: Margins,
    /// Series in cluster order; also the legend rows.
    pub series: Vec<String>,
    /// Series colors.
    pub colors: CategoryColors,
    /// Approximate number of value ticks.
    pub y_ticks: usize,
}

impl GroupedBarChart {
    /// Creates a chart for `series`, colored from the two-series palette.
    pub fn new<S: Into<String>>(series: impl IntoIterator<Item = S>) -> Self {
        let series: Vec<String> = series.into_iter().map(Into::into).collect();
        Self {
            margins: Margins::new(40.0, 40.0, 100.0, 60.0),
            colors: CategoryColors::new(&SERIES_PALETTE).with_domain(&series),
            series,
            y_ticks: 6,
        }
    }
}

impl Chart for GroupedBarChart {
    type Input = [BarGroup];

    fn margins(&self) -> Margins {
        self.margins
    }

    fn build(&self, input: &[BarGroup], layout: &ChartLayout) -> ChartOutput {
        let plot = layout.plot;
        let outer = ScaleBand::new(layout.x_range(), input.len()).with_padding(0.3, 0.3);
        let inner = ScaleBand::new((0.0, outer.band_width()), self.series.len()).with_padding(0.1, 0.0);
        let y = ScaleLinearSpec::new(zero_based_domain(
            input.iter().flat_map(|g| g.bars.iter().map(|b| b.value)),
        ))
        .with_nice(true)
        .instantiate_resolved(layout.y_range(), self.y_ticks);
        let baseline = y.map(0.0);

        let mut out = ChartOutput::new();
        for (gi, group) in input.iter().enumerate() {
            for (si, series) in self.series.iter().enumerate() {
                let Some(bar) = group.bars.iter().find(|b| &b.series == series) else {
                    continue;
                };
                let spec = BarMarkSpec::vertical(
                    MarkId::for_pair(BARS, &group.key, series),
                    outer.x(gi) + inner.x(si),
                    inner.band_width(),
                    baseline,
                    y.map(bar.value),
                )
                .with_fill(self.colors.color(series));
                let mut lines = Vec::with_capacity(bar.details.len() + 1);
                lines.push(group.key.clone());
                lines.extend(bar.details.iter().cloned());
                out.hit(
                    HitRegion::new(spec.id, group.key.clone(), HitShape::Rect(spec.rect()), lines)
                        .with_emphasis(Emphasis::opacity(0.8)),
                );
                out.push(spec.mark());
            }
        }

        let keys: Vec<&str> = input.iter().map(|g| g.key.as_str()).collect();
        out.extend(
            AxisSpec::band("x", AxisOrient::Bottom, plot.y1, &outer, &keys, layout.x_range())
                .with_label_angle(-45.0)
                .marks(),
        );
        out.extend(AxisSpec::linear("y", AxisOrient::Left, plot.x0, &y, self.y_ticks, format_si).marks());

        let mut legend = LegendSpec::new(
            "series",
            Point::new(layout.view.x1 - self.margins.right - 150.0, self.margins.top - 20.0),
            self.series
                .iter()
                .map(|s| LegendItem::new(s.clone(), self.colors.color(s)))
                .collect(),
        );
        legend.swatch_size = 15.0;
        out.extend(legend.marks());
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use insight_core::MarkPayload;

    use super::*;
    use crate::layout::Size;

    fn group(key: &str, watched: f64, earnings: f64) -> BarGroup {
        BarGroup {
            key: key.into(),
            bars: alloc::vec![
                GroupedBar {
                    series: "Avg. Total Earnings".into(),
                    value: earnings,
                    details: alloc::vec![],
                },
                GroupedBar {
                    series: "Avg. Hours Watched".into(),
                    value: watched,
                    details: alloc::vec![],
                },
            ],
        }
    }

    fn rect_of(out: &ChartOutput, group: &str, series: &str) -> kurbo::Rect {
        let id = MarkId::for_pair(BARS, group, series);
        match out.marks.iter().find(|m| m.id == id).map(|m| &m.payload) {
            Some(MarkPayload::Rect { rect, .. }) => *rect,
            other => panic!("no bar for {group}/{series}: {other:?}"),
        }
    }

    #[test]
    fn bars_follow_series_order_inside_each_group() {
        let chart = GroupedBarChart::new(["Avg. Hours Watched", "Avg. Total Earnings"]);
        let layout = ChartLayout::arrange(Size::new(800.0, 500.0), chart.margins());
        let out = chart.build(&[group("MOBA", 10.0, 20.0), group("Strategy", 5.0, 1.0)], &layout);

        let watched = rect_of(&out, "MOBA", "Avg. Hours Watched");
        let earnings = rect_of(&out, "MOBA", "Avg. Total Earnings");
        assert!(watched.x1 <= earnings.x0, "watched bar sits left of earnings");
        assert!(earnings.height() > watched.height());
        let strategy = rect_of(&out, "Strategy", "Avg. Hours Watched");
        assert!(strategy.x0 > earnings.x1, "groups do not overlap");
        assert_eq!(out.hits.len(), 4);
    }

    #[test]
    fn series_missing_from_a_group_leave_a_gap() {
        let chart = GroupedBarChart::new(["a", "b"]);
        let layout = ChartLayout::arrange(Size::new(400.0, 300.0), chart.margins());
        let input = [BarGroup {
            key: "g".into(),
            bars: alloc::vec![GroupedBar {
                series: "b".into(),
                value: 1.0,
                details: alloc::vec![],
            }],
        }];
        let out = chart.build(&input, &layout);
        assert_eq!(out.hits.len(), 1);
        assert_eq!(out.hits[0].target, MarkId::for_pair(BARS, "g", "b"));
    }
}
