// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Bubble and scatter charts with a size legend.
//!
//! [`BubbleChart::engagement`] plots hours streamed against hours watched with bubbles sized
//! by average viewers, labelled, and crossed by hoverable average lines.
//! [`BubbleChart::revenue_growth`] plots average revenue against average growth with a color
//! legend per market.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use insight_core::{Mark, MarkId, MarkPayload, Style, TextAnchor, TextBaseline};
use kurbo::Point;
use peniko::Color;

use crate::axis::{AxisOrient, AxisSpec};
use crate::chart::{Chart, ChartOutput};
use crate::color::{CategoryColors, rgb, theme};
use crate::format::{format_grouped, format_millions, format_si};
use crate::hit::{Emphasis, HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins};
use crate::legend::{LegendItem, LegendSpec};
use crate::point_mark::PointMarkSpec;
use crate::rule_mark::RuleMarkSpec;
use crate::scale::{ScaleLinearSpec, ScaleSqrt, infer_domain, zero_based_domain};
use crate::text_mark::TextMarkSpec;
use crate::z_order;

const BUBBLES: u64 = MarkId::space("bubbles");
const LABELS: u64 = MarkId::space("bubble-labels");
const REFERENCE: u64 = MarkId::space("bubble-reference");
const SIZE_LEGEND: u64 = MarkId::space("bubble-size-legend");

/// One bubble.
#[derive(Clone, Debug, PartialEq)]
pub struct Bubble {
    /// Category; the bubble's identity and color key.
    pub key: String,
    /// Horizontal value.
    pub x: f64,
    /// Vertical value.
    pub y: f64,
    /// Value the area of the bubble encodes.
    pub size: f64,
    /// Tooltip lines after the key.
    pub details: Vec<String>,
}

/// Dashed lines at the mean x and mean y, each with its own tooltip.
#[derive(Clone, Debug, PartialEq)]
pub struct ReferenceLines {
    /// Tooltip label of the vertical line at the mean x.
    pub x_label: String,
    /// Tooltip label of the horizontal line at the mean y.
    pub y_label: String,
}

/// Sample values shown in the size legend.
#[derive(Clone, Debug, PartialEq)]
pub enum SizeSteps {
    /// Fixed data values.
    Fixed(Vec<f64>),
    /// Fractions of the largest size in the data.
    OfMax(Vec<f64>),
}

/// Circles explaining the size encoding.
#[derive(Clone, Debug, PartialEq)]
pub struct SizeLegend {
    /// Legend title.
    pub title: String,
    /// Sample values.
    pub steps: SizeSteps,
    /// Distance between sample rows.
    pub row_height: f64,
}

/// A bubble chart.
#[derive(Clone, Debug)]
pub struct BubbleChart {
    /// Space around the plot.
    pub margins: Margins,
    /// Bubble colors by key.
    pub colors: CategoryColors,
    /// Horizontal axis title.
    pub x_title: String,
    /// Vertical axis title.
    pub y_title: String,
    /// Horizontal tick format.
    pub x_format: fn(f64) -> String,
    /// Vertical tick format.
    pub y_format: fn(f64) -> String,
    /// Approximate tick count on both axes.
    pub ticks: usize,
    /// Whether the vertical domain starts at zero; otherwise it spans the data.
    pub y_from_zero: bool,
    /// Radius range of the size scale.
    pub radius: (f64, f64),
    /// Bubble outline color and width.
    pub outline: (Color, f64),
    /// Outline width while hovered.
    pub hover_outline_width: f64,
    /// Draws the key under each bubble.
    pub labels: bool,
    /// Average lines, when enabled.
    pub reference_lines: Option<ReferenceLines>,
    /// Lists keys with color swatches.
    pub color_legend: bool,
    /// Size legend.
    pub size_legend: SizeLegend,
}

impl BubbleChart {
    /// Hours streamed against hours watched, sized by average viewers.
    pub fn engagement(colors: CategoryColors) -> Self {
        Self {
            margins: Margins::new(20.0, 140.0, 40.0, 60.0),
            colors,
            x_title: String::from("Avg. Hours Streamed"),
            y_title: String::from("Avg. Hours Watched"),
            x_format: format_si,
            y_format: format_si,
            ticks: 5,
            y_from_zero: true,
            radius: (0.0, 15.0),
            outline: (rgb(theme::OUTLINE), 1.0),
            hover_outline_width: 3.0,
            labels: true,
            reference_lines: Some(ReferenceLines {
                x_label: String::from("Avg. Hours Streamed"),
                y_label: String::from("Avg. Hours Watched"),
            }),
            color_legend: false,
            size_legend: SizeLegend {
                title: String::from("Avg. Viewers"),
                steps: SizeSteps::Fixed(alloc::vec![50_000.0, 100_000.0, 150_000.0, 200_000.0, 250_000.0]),
                row_height: 40.0,
            },
        }
    }

    /// Average revenue against average percentage change, sized by total revenue.
    pub fn revenue_growth(colors: CategoryColors) -> Self {
        Self {
            margins: Margins::new(20.0, 200.0, 50.0, 70.0),
            colors,
            x_title: String::from("Avg. Revenue"),
            y_title: String::from("Avg. Percentage Change"),
            x_format: format_millions,
            y_format: |v| format!("{v}%"),
            ticks: 8,
            y_from_zero: false,
            radius: (3.0, 10.0),
            outline: (rgb(theme::TEXT), 1.0),
            hover_outline_width: 2.0,
            labels: false,
            reference_lines: None,
            color_legend: true,
            size_legend: SizeLegend {
                title: String::from("Absolute Revenue"),
                steps: SizeSteps::OfMax(alloc::vec![0.2, 0.4, 0.6, 0.8, 1.0]),
                row_height: 30.0,
            },
        }
    }
}

#[allow(clippy::cast_precision_loss, reason = "bubble counts are small")]
fn mean(values: impl ExactSizeIterator<Item = f64>) -> f64 {
    let n = values.len();
    if n == 0 {
        return 0.0;
    }
    values.sum::<f64>() / n as f64
}

impl Chart for BubbleChart {
    type Input = [Bubble];

    fn margins(&self) -> Margins {
        self.margins
    }

    #[allow(clippy::cast_precision_loss, reason = "legend row counts are small")]
    fn build(&self, input: &[Bubble], layout: &ChartLayout) -> ChartOutput {
        let plot = layout.plot;
        let x = ScaleLinearSpec::new(zero_based_domain(input.iter().map(|b| b.x)))
            .with_nice(true)
            .instantiate_resolved(layout.x_range(), self.ticks);
        let y_domain = if self.y_from_zero {
            zero_based_domain(input.iter().map(|b| b.y))
        } else {
            infer_domain(input.iter().map(|b| b.y)).unwrap_or((0.0, 0.0))
        };
        let y = ScaleLinearSpec::new(y_domain)
            .with_nice(true)
            .instantiate_resolved(layout.y_range(), self.ticks);
        let max_size = zero_based_domain(input.iter().map(|b| b.size)).1;
        let r = ScaleSqrt::new((0.0, max_size), self.radius);

        let mut out = ChartOutput::new();
        let (outline, outline_width) = self.outline;

        if let Some(lines) = &self.reference_lines {
            let dash = rgb(theme::AXIS);
            let mean_x = mean(input.iter().map(|b| b.x));
            let mean_y = mean(input.iter().map(|b| b.y));
            let rules = [
                (
                    RuleMarkSpec::horizontal(MarkId::for_key(REFERENCE, "y"), y.map(mean_y), plot.x0, plot.x1),
                    format!("{}: {}", lines.y_label, format_grouped(mean_y)),
                ),
                (
                    RuleMarkSpec::vertical(MarkId::for_key(REFERENCE, "x"), x.map(mean_x), plot.y1, plot.y0),
                    format!("{}: {}", lines.x_label, format_grouped(mean_x)),
                ),
            ];
            for (rule, text) in rules {
                let rule = rule
                    .with_stroke(dash, 1.0)
                    .with_dash(3.0, 3.0)
                    .with_z_index(z_order::REFERENCE_LINES);
                out.hit(
                    HitRegion::new(
                        rule.id,
                        text.clone(),
                        HitShape::Segment {
                            from: rule.from,
                            to: rule.to,
                            tolerance: 5.0,
                        },
                        alloc::vec![text],
                    )
                    .with_emphasis(Emphasis::stroke(rgb(theme::TEXT), 3.0)),
                );
                out.push(rule.mark());
            }
        }

        for bubble in input {
            let center = Point::new(x.map(bubble.x), y.map(bubble.y));
            let radius = r.map(bubble.size);
            let point = PointMarkSpec::new(
                MarkId::for_key(BUBBLES, &bubble.key),
                center,
                radius,
                self.colors.color(&bubble.key),
            )
            .with_stroke(outline, outline_width)
            .with_opacity(0.8);
            let mut lines = Vec::with_capacity(bubble.details.len() + 1);
            lines.push(bubble.key.clone());
            lines.extend(bubble.details.iter().cloned());
            out.hit(
                HitRegion::new(point.id, bubble.key.clone(), HitShape::Circle { center, radius }, lines)
                    .with_emphasis(Emphasis::stroke(outline, self.hover_outline_width).with_opacity(1.0)),
            );
            out.push(point.mark());

            if self.labels {
                out.push(
                    TextMarkSpec::new(
                        MarkId::for_key(LABELS, &bubble.key),
                        Point::new(center.x, center.y + radius + 14.0),
                        bubble.key.clone(),
                    )
                    .with_anchor(TextAnchor::Middle)
                    .mark(),
                );
            }
        }

        out.extend(
            AxisSpec::linear("x", AxisOrient::Bottom, plot.y1, &x, self.ticks, self.x_format)
                .with_title(self.x_title.clone(), self.margins.bottom - 6.0)
                .marks(),
        );
        out.extend(
            AxisSpec::linear("y", AxisOrient::Left, plot.x0, &y, self.ticks, self.y_format)
                .with_title(self.y_title.clone(), self.margins.left - 12.0)
                .marks(),
        );

        let mut legend_top = plot.y0;
        if self.color_legend {
            let mut keys: Vec<&str> = input.iter().map(|b| b.key.as_str()).collect();
            keys.sort_unstable();
            keys.dedup();
            let mut legend = LegendSpec::new(
                "bubbles",
                Point::new(plot.x1 + 20.0, legend_top),
                keys.iter()
                    .map(|k| LegendItem::new(*k, self.colors.color(k)))
                    .collect(),
            );
            legend.swatch_size = 15.0;
            legend_top += legend.row_height * (keys.len() + 1) as f64;
            out.extend(legend.marks());
        }
        out.extend(self.size_legend_marks(Point::new(plot.x1 + 20.0, legend_top), &r, max_size));
        out
    }
}

impl BubbleChart {
    #[allow(clippy::cast_precision_loss, reason = "legend row counts are small")]
    fn size_legend_marks(&self, origin: Point, r: &ScaleSqrt, max_size: f64) -> Vec<Mark> {
        let legend = &self.size_legend;
        let values: Vec<f64> = match &legend.steps {
            SizeSteps::Fixed(values) => values.clone(),
            SizeSteps::OfMax(fractions) => fractions.iter().map(|f| f * max_size).collect(),
        };
        let mut out = Vec::with_capacity(values.len() * 2 + 1);
        out.push(
            TextMarkSpec::new(MarkId::for_key(SIZE_LEGEND, "title"), origin, legend.title.clone())
                .with_z_index(z_order::LEGEND_LABELS)
                .mark(),
        );
        let style = Style::filled(rgb(theme::NEUTRAL)).with_stroke(rgb(theme::OUTLINE), 1.0);
        for (i, v) in values.iter().enumerate() {
            let radius = r.map(*v);
            let center = Point::new(origin.x + 15.0, origin.y + 20.0 + legend.row_height * i as f64);
            let key = format!("{i}");
            out.push(
                Mark::new(
                    MarkId::for_pair(SIZE_LEGEND, "circle", &key),
                    MarkPayload::circle(center, radius, style.clone()),
                )
                .with_z_index(z_order::LEGEND_SWATCHES)
                .with_fade(),
            );
            out.push(
                TextMarkSpec::new(
                    MarkId::for_pair(SIZE_LEGEND, "label", &key),
                    Point::new(center.x + radius + 8.0, center.y),
                    format_grouped(*v),
                )
                .with_baseline(TextBaseline::Middle)
                .with_z_index(z_order::LEGEND_LABELS)
                .mark(),
            );
        }
        out
    }
}
