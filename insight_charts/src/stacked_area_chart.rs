// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked area chart over years.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use insight_core::MarkId;
use insight_transforms::{Pivot, StackOrder, stack};
use kurbo::Point;

use crate::area_mark::AreaMarkSpec;
use crate::axis::{AxisOrient, AxisSpec};
use crate::chart::{Chart, ChartOutput};
use crate::color::CategoryColors;
use crate::format::{format_grouped, format_si};
use crate::hit::{HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins};
use crate::legend::{LegendItem, LegendSpec};
use crate::scale::{ScaleLinearSpec, infer_domain};

const AREAS: u64 = MarkId::space("stacked-areas");

/// Stacked areas, one per series of a year-by-series [`Pivot`].
///
/// The first series of the pivot is drawn on top and the last one rests on the baseline.
/// Hovering resolves the band under the pointer at the nearest year and marks its top and
/// bottom edges.
#[derive(Clone, Debug)]
pub struct StackedAreaChart {
    /// Space around the plot.
    pub margins: Margins,
    /// Series colors.
    pub colors: CategoryColors,
    /// Label used for the stacked metric in tooltips.
    pub metric: String,
    /// Value axis title.
    pub y_title: String,
}

impl StackedAreaChart {
    /// Creates a chart for peak viewers per game.
    pub fn new(colors: CategoryColors) -> Self {
        Self {
            margins: Margins::new(20.0, 140.0, 40.0, 60.0),
            colors,
            metric: String::from("Peak viewers"),
            y_title: String::from("Peak Viewers"),
        }
    }
}

impl Chart for StackedAreaChart {
    type Input = Pivot<i32, String>;

    fn margins(&self) -> Margins {
        self.margins
    }

    fn build(&self, input: &Pivot<i32, String>, layout: &ChartLayout) -> ChartOutput {
        let plot = layout.plot;
        let stacked = stack(input, StackOrder::Reverse);

        let years = infer_domain(input.xs.iter().map(|&y| f64::from(y))).unwrap_or((0.0, 0.0));
        let x = ScaleLinearSpec::new(years)
            .with_nice(true)
            .instantiate_resolved(layout.x_range(), input.xs.len().max(1));
        let top = stacked
            .iter()
            .flat_map(|s| s.upper.iter().copied())
            .fold(0.0_f64, f64::max);
        let y = ScaleLinearSpec::new((0.0, top))
            .with_nice(true)
            .instantiate_resolved(layout.y_range(), 5);
        let baseline = y.map(0.0);
        let xs: Vec<f64> = input.xs.iter().map(|&yr| x.map(f64::from(yr))).collect();

        let mut out = ChartOutput::new();
        for series in &stacked {
            let lower: Vec<f64> = series.lower.iter().map(|&v| y.map(v)).collect();
            let upper: Vec<f64> = series.upper.iter().map(|&v| y.map(v)).collect();
            let id = MarkId::for_key(AREAS, &series.key);
            let area = AreaMarkSpec::new(id, xs.clone(), lower.clone(), upper.clone(), baseline)
                .with_fill(self.colors.color(&series.key));

            let lines = input
                .xs
                .iter()
                .zip(&series.values)
                .map(|(year, v)| {
                    alloc::vec![
                        series.key.clone(),
                        format!("Year: {year}"),
                        format!("{}: {}", self.metric, format_grouped(*v)),
                    ]
                })
                .collect();
            let markers = xs
                .iter()
                .zip(lower.iter().zip(&upper))
                .map(|(&px, (&lo, &hi))| alloc::vec![Point::new(px, hi), Point::new(px, lo)])
                .collect();
            out.hit(
                HitRegion::new(
                    id,
                    series.key.clone(),
                    HitShape::StackedBand {
                        xs: xs.clone(),
                        lower,
                        upper,
                    },
                    Vec::new(),
                )
                .with_lines_per_index(lines)
                .with_markers(markers, 3.0),
            );
            out.push(area.mark());
        }

        out.extend(
            AxisSpec::years("x", AxisOrient::Bottom, plot.y1, &x, &input.xs)
                .with_title("Year", 32.0)
                .marks(),
        );
        out.extend(
            AxisSpec::linear("y", AxisOrient::Left, plot.x0, &y, 5, format_si)
                .with_title(self.y_title.clone(), self.margins.left - 12.0)
                .marks(),
        );
        out.extend(
            LegendSpec::new(
                "series",
                Point::new(plot.x1 + 10.0, plot.y0),
                input
                    .series
                    .iter()
                    .rev()
                    .map(|key| LegendItem::new(key.clone(), self.colors.color(key)))
                    .collect(),
            )
            .marks(),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use insight_transforms::{OTHERS, pivot};

    use super::*;
    use crate::layout::Size;

    fn input() -> Pivot<i32, String> {
        let rows = [
            (2019, "Dota 2", 100.0),
            (2020, "Dota 2", 200.0),
            (2019, "Fortnite", 50.0),
            (2020, "Fortnite", 50.0),
            (2019, OTHERS, 10.0),
            (2020, OTHERS, 30.0),
        ];
        pivot(&rows, |r| r.0, |r| String::from(r.1), |r| r.2)
    }

    #[test]
    fn last_series_rests_on_the_baseline() {
        let chart = StackedAreaChart::new(CategoryColors::games());
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let out = chart.build(&input(), &layout);
        let others = out.hits.iter().find(|h| h.key == OTHERS).expect("Others band");
        let HitShape::StackedBand { lower, .. } = &others.shape else {
            panic!("expected a stacked band");
        };
        assert!(lower.iter().all(|&y| y == layout.plot.y1), "Others sits on the x axis");
    }

    #[test]
    fn hover_resolves_band_at_nearest_year() {
        let chart = StackedAreaChart::new(CategoryColors::games());
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let out = chart.build(&input(), &layout);
        let dota = out.hits.iter().find(|h| h.key == "Dota 2").expect("Dota 2 band");
        let HitShape::StackedBand { xs, lower, upper } = &dota.shape else {
            panic!("expected a stacked band");
        };
        let p = Point::new(xs[1] - 1.0, (lower[1] + upper[1]) * 0.5);
        assert_eq!(dota.shape.hit(p), Some(1));
        assert_eq!(
            dota.tooltip.at(1),
            ["Dota 2", "Year: 2020", "Peak viewers: 200"].map(String::from)
        );
        assert_eq!(dota.markers_at(1).len(), 2, "top and bottom markers");
    }

    #[test]
    fn empty_pivot_draws_only_the_frame() {
        let chart = StackedAreaChart::new(CategoryColors::games());
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let out = chart.build(&Pivot::default(), &layout);
        assert!(out.hits.is_empty());
        assert!(!out.marks.is_empty());
    }
}
