// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Single-series vertical bar chart over categories.

use alloc::string::String;
use alloc::vec::Vec;

use insight_core::MarkId;
use smallvec::SmallVec;

use crate::axis::{AxisOrient, AxisSpec};
use crate::bar_mark::BarMarkSpec;
use crate::chart::{Chart, ChartOutput};
use crate::color::CategoryColors;
use crate::format::format_si;
use crate::hit::{Emphasis, HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins};
use crate::scale::{ScaleBand, ScaleLinearSpec, zero_based_domain};

const BARS: u64 = MarkId::space("bar-chart-bars");

/// One bar.
#[derive(Clone, Debug, PartialEq)]
pub struct BarDatum {
    /// Category shown on the x axis; also the bar's identity.
    pub key: String,
    /// Bar height in data units.
    pub value: f64,
    /// Category the bar color is looked up by (e.g. the genre of a game).
    pub color_key: String,
    /// Tooltip lines after the key.
    pub details: SmallVec<[String; 3]>,
}

impl BarDatum {
    /// Creates a bar colored by its own key.
    pub fn new(key: impl Into<String>, value: f64) -> Self {
        let key = key.into();
        Self {
            color_key: key.clone(),
            key,
            value,
            details: SmallVec::new(),
        }
    }

    /// Colors the bar by another category.
    pub fn with_color_key(mut self, color_key: impl Into<String>) -> Self {
        self.color_key = color_key.into();
        self
    }

    /// Adds a tooltip line.
    pub fn with_detail(mut self, line: impl Into<String>) -> Self {
        self.details.push(line.into());
        self
    }
}

/// Bars on a band scale with a zero-based value axis.
///
/// Bars are keyed by category, enter from the baseline with zero height and dim slightly
/// while hovered.
#[derive(Clone, Debug)]
pub struct BarChart {
    /// Space around the plot.
    pub margins: Margins,
    /// Bar colors.
    pub colors: CategoryColors,
    /// Value axis title.
    pub y_title: String,
    /// Value axis tick format.
    pub y_format: fn(f64) -> String,
    /// Approximate number of value ticks.
    pub y_ticks: usize,
    /// Category label rotation in degrees.
    pub label_angle: f64,
}

impl BarChart {
    /// Creates a bar chart with rotated category labels and SI value ticks.
    pub fn new(colors: CategoryColors, y_title: impl Into<String>) -> Self {
        Self {
            margins: Margins::new(40.0, 40.0, 100.0, 80.0),
            colors,
            y_title: y_title.into(),
            y_format: format_si,
            y_ticks: 8,
            label_angle: -45.0,
        }
    }

    /// Overrides the margins.
    pub fn with_margins(mut self, margins: Margins) -> Self {
        self.margins = margins;
        self
    }

    /// Overrides the value tick format.
    pub fn with_y_format(mut self, y_format: fn(f64) -> String) -> Self {
        self.y_format = y_format;
        self
    }
}

impl Chart for BarChart {
    type Input = [BarDatum];

    fn margins(&self) -> Margins {
        self.margins
    }

    fn build(&self, input: &[BarDatum], layout: &ChartLayout) -> ChartOutput {
        let plot = layout.plot;
        let band = ScaleBand::new(layout.x_range(), input.len()).with_padding(0.2, 0.2);
        let y = ScaleLinearSpec::new(zero_based_domain(input.iter().map(|d| d.value)))
            .with_nice(true)
            .instantiate_resolved(layout.y_range(), self.y_ticks);
        let baseline = y.map(0.0);

        let mut out = ChartOutput::new();
        for (i, datum) in input.iter().enumerate() {
            let bar = BarMarkSpec::vertical(
                MarkId::for_key(BARS, &datum.key),
                band.x(i),
                band.band_width(),
                baseline,
                y.map(datum.value),
            )
            .with_fill(self.colors.color(&datum.color_key));
            let mut lines = Vec::with_capacity(datum.details.len() + 1);
            lines.push(datum.key.clone());
            lines.extend(datum.details.iter().cloned());
            out.hit(
                HitRegion::new(bar.id, datum.key.clone(), HitShape::Rect(bar.rect()), lines)
                    .with_emphasis(Emphasis::opacity(0.8)),
            );
            out.push(bar.mark());
        }

        let keys: Vec<&str> = input.iter().map(|d| d.key.as_str()).collect();
        out.extend(
            AxisSpec::band("x", AxisOrient::Bottom, plot.y1, &band, &keys, layout.x_range())
                .with_label_angle(self.label_angle)
                .marks(),
        );
        out.extend(
            AxisSpec::linear("y", AxisOrient::Left, plot.x0, &y, self.y_ticks, self.y_format)
                .with_title(self.y_title.clone(), self.margins.left - 15.0)
                .marks(),
        );
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use insight_core::{MarkPayload, Scene};

    use super::*;
    use crate::color::GENRE_PALETTE;
    use crate::layout::Size;

    fn layout() -> ChartLayout {
        ChartLayout::arrange(Size::new(600.0, 400.0), Margins::new(40.0, 40.0, 100.0, 80.0))
    }

    fn bar_rect(out: &ChartOutput, key: &str) -> Option<kurbo::Rect> {
        let id = MarkId::for_key(BARS, key);
        out.marks.iter().find(|m| m.id == id).and_then(|m| match m.payload {
            MarkPayload::Rect { rect, .. } => Some(rect),
            _ => None,
        })
    }

    #[test]
    fn empty_input_still_draws_axes() {
        let chart = BarChart::new(CategoryColors::new(&GENRE_PALETTE), "Avg Prize Pool");
        let out = chart.build(&[], &layout());
        assert!(!out.marks.is_empty(), "axis frame is drawn");
        assert!(out.hits.is_empty());
        assert!(Scene::new().tick(out.marks).is_ok());
    }

    #[test]
    fn all_zero_values_do_not_divide_by_zero() {
        let chart = BarChart::new(CategoryColors::new(&GENRE_PALETTE), "Avg Prize Pool");
        let out = chart.build(&[BarDatum::new("MOBA", 0.0), BarDatum::new("Strategy", 0.0)], &layout());
        let rect = bar_rect(&out, "MOBA").expect("MOBA bar");
        assert!(rect.height().is_finite());
        assert_eq!(rect.height(), 0.0);
    }

    #[test]
    fn bars_are_colored_by_color_key_and_keyed_by_name() {
        let colors = CategoryColors::genres(["Battle Royale", "MOBA"]);
        let chart = BarChart::new(colors.clone(), "Total Earnings");
        let data = [
            BarDatum::new("Dota 2", 200.0).with_color_key("MOBA"),
            BarDatum::new("Fortnite", 100.0).with_color_key("Battle Royale"),
        ];
        let out = chart.build(&data, &layout());
        let id = MarkId::for_key(BARS, "Dota 2");
        let mark = out.marks.iter().find(|m| m.id == id).expect("Dota 2 bar");
        assert_eq!(
            mark.payload.style().fill.map(|c| c.components),
            Some(colors.color("MOBA").components)
        );
        let dota = bar_rect(&out, "Dota 2").expect("Dota 2 bar");
        let fortnite = bar_rect(&out, "Fortnite").expect("Fortnite bar");
        assert!(dota.height() > fortnite.height());
        assert_eq!(out.hits[0].tooltip.at(0)[0], "Dota 2");
    }
}
