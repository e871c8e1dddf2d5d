// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Stacked bar chart of revenue per market and year.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use insight_core::{Mark, MarkId, MarkPayload, Style, TextAnchor};
use insight_transforms::{Pivot, StackOrder, stack};
use kurbo::{Point, Rect};

use crate::axis::{AxisOrient, AxisSpec};
use crate::chart::{Chart, ChartOutput};
use crate::color::{CategoryColors, rgb, theme};
use crate::format::{format_grouped, format_millions, format_percent};
use crate::hit::{Emphasis, HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins};
use crate::legend::{LegendItem, LegendSpec};
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleBand, ScaleLinearSpec};
use crate::text_mark::TextMarkSpec;
use crate::z_order;

const SEGMENTS: u64 = MarkId::space("stacked-bar-segments");
const FORECAST_FRAME: u64 = MarkId::space("stacked-bar-forecast");
const DIVIDER: u64 = MarkId::space("stacked-bar-divider");

/// Input of [`StackedBarChart`].
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MarketRevenue {
    /// Revenue per year and market.
    pub revenue: Pivot<i32, String>,
    /// Years whose figures are forecasts.
    pub forecast_years: Vec<i32>,
    /// Percentage change per year and market; missing cells read as zero.
    pub change: Pivot<i32, String>,
}

impl MarketRevenue {
    fn change_at(&self, market: &str, year: i32) -> f64 {
        let Some(s) = self.change.series.iter().position(|m| m == market) else {
            return 0.0;
        };
        let Some(x) = self.change.xs.iter().position(|&y| y == year) else {
            return 0.0;
        };
        self.change.value(s, x)
    }

    fn is_forecast(&self, year: i32) -> bool {
        self.forecast_years.contains(&year)
    }
}

/// One bar per year, split into market segments stacked in alphabetical order.
///
/// Forecast years are outlined with a dashed frame, and a divider separates the last actual
/// year from the first forecast year.
#[derive(Clone, Debug)]
pub struct StackedBarChart {
    /// Space around the plot.
    pub margins: Margins,
    /// Market colors.
    pub colors: CategoryColors,
}

impl StackedBarChart {
    /// Creates a chart with the given market colors.
    pub fn new(colors: CategoryColors) -> Self {
        Self {
            margins: Margins::new(40.0, 100.0, 40.0, 80.0),
            colors,
        }
    }
}

impl Chart for StackedBarChart {
    type Input = MarketRevenue;

    fn margins(&self) -> Margins {
        self.margins
    }

    fn build(&self, input: &MarketRevenue, layout: &ChartLayout) -> ChartOutput {
        let plot = layout.plot;
        let mut markets = input.revenue.series.clone();
        markets.sort();
        let revenue = input.revenue.clone().with_series_order(&markets);
        let stacked = stack(&revenue, StackOrder::Reverse);
        let years: Vec<String> = revenue.xs.iter().map(|y| format!("{y}")).collect();

        let band = ScaleBand::new(layout.x_range(), years.len()).with_padding(0.2, 0.1);
        let max_total = (0..revenue.xs.len())
            .map(|x| revenue.total_at(x))
            .fold(0.0_f64, f64::max);
        let y = ScaleLinearSpec::new((0.0, max_total))
            .with_nice(true)
            .instantiate_resolved(layout.y_range(), 6);
        let baseline = y.map(0.0);

        let mut out = ChartOutput::new();
        for (xi, &year) in revenue.xs.iter().enumerate() {
            if !input.is_forecast(year) {
                continue;
            }
            let frame = Rect::new(
                band.x(xi),
                y.map(revenue.total_at(xi)),
                band.x(xi) + band.band_width(),
                baseline,
            );
            let zero = Rect::new(frame.x0, baseline, frame.x1, baseline);
            let style = Style::stroked(rgb(0xaaaaaa), 1.0).with_dash(4.0, 2.0);
            out.push(
                Mark::new(
                    MarkId::for_key(FORECAST_FRAME, &years[xi]),
                    MarkPayload::rect(frame, style.clone()),
                )
                .with_z_index(z_order::PLOT_BACKGROUND)
                .with_zero(MarkPayload::rect(zero, style)),
            );
        }

        for series in &stacked {
            let color = self.colors.color(&series.key);
            for (xi, &year) in revenue.xs.iter().enumerate() {
                let value = series.values[xi];
                if value == 0.0 {
                    continue;
                }
                let id = MarkId::for_pair(SEGMENTS, &series.key, &years[xi]);
                let rect = Rect::new(
                    band.x(xi),
                    y.map(series.upper[xi]),
                    band.x(xi) + band.band_width(),
                    y.map(series.lower[xi]),
                );
                let kind = if input.is_forecast(year) {
                    "forecast"
                } else {
                    "actual"
                };
                let lines = alloc::vec![
                    series.key.clone(),
                    format!("Type: {kind}"),
                    format!("Year: {year}"),
                    format!("Revenue: {}", format_grouped(value)),
                    format!(
                        "Percentage Change: {}",
                        format_percent(input.change_at(&series.key, year))
                    ),
                ];
                out.hit(
                    HitRegion::new(id, series.key.clone(), HitShape::Rect(rect), lines)
                        .with_emphasis(Emphasis::opacity(0.7)),
                );
                let zero = Rect::new(rect.x0, baseline, rect.x1, baseline);
                out.push(
                    Mark::new(id, MarkPayload::rect(rect, Style::filled(color)))
                        .with_z_index(z_order::SERIES_FILL)
                        .with_zero(MarkPayload::rect(zero, Style::filled(color))),
                );
            }
        }

        if let Some(boundary) = forecast_boundary(input, &revenue.xs, &band) {
            let white = rgb(theme::TEXT);
            out.push(
                RuleMarkSpec::vertical(MarkId::for_key(DIVIDER, "line"), boundary, plot.y0 - 30.0, plot.y1)
                    .with_stroke(white, 2.0)
                    .with_dash(5.0, 5.0)
                    .with_z_index(z_order::REFERENCE_LINES)
                    .mark(),
            );
            out.push(
                TextMarkSpec::new(
                    MarkId::for_key(DIVIDER, "actual"),
                    Point::new((plot.x0 + boundary) * 0.5, plot.y0),
                    "Actual",
                )
                .with_font_size(14.0)
                .with_anchor(TextAnchor::End)
                .mark(),
            );
            out.push(
                TextMarkSpec::new(
                    MarkId::for_key(DIVIDER, "forecast"),
                    Point::new((boundary + plot.x1) * 0.5 - 30.0, plot.y0),
                    "Forecast",
                )
                .with_font_size(14.0)
                .with_anchor(TextAnchor::Start)
                .mark(),
            );
        }

        out.extend(AxisSpec::band("x", AxisOrient::Bottom, plot.y1, &band, &years, layout.x_range()).marks());
        out.extend(AxisSpec::linear("y", AxisOrient::Left, plot.x0, &y, 6, format_millions).marks());

        let mut legend = LegendSpec::new(
            "markets",
            Point::new(plot.x1, plot.y0 - 30.0),
            markets
                .iter()
                .map(|m| LegendItem::new(m.clone(), self.colors.color(m)))
                .collect(),
        );
        legend.swatch_size = 15.0;
        out.extend(legend.marks());
        out
    }
}

/// X position between the last actual year and the first forecast year that follows it.
fn forecast_boundary(input: &MarketRevenue, years: &[i32], band: &ScaleBand) -> Option<f64> {
    let first = years.iter().position(|&y| input.is_forecast(y))?;
    if first == 0 {
        return None;
    }
    Some((band.x(first - 1) + band.band_width() + band.x(first)) * 0.5)
}
