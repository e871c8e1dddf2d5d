// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Legend mark generation.
//!
//! A legend is a vertical list of swatches with labels. Entries are keyed by category, so
//! they enter, move and exit together with the series they describe.

use alloc::string::String;
use alloc::vec::Vec;

use insight_core::{Mark, MarkId, MarkPayload, Style, TextAnchor, TextBaseline};
use kurbo::{Point, Rect};
use peniko::Color;

use crate::color::{rgb, theme};
use crate::format::{LEGEND_LABEL_CHARS, truncate_label};
use crate::text_mark::TextMarkSpec;
use crate::z_order;

const SWATCH: u64 = MarkId::space("legend-swatch");
const LABEL: u64 = MarkId::space("legend-label");

/// A legend row.
#[derive(Clone, Debug)]
pub struct LegendItem {
    /// Category key.
    pub key: String,
    /// Swatch color.
    pub color: Color,
}

impl LegendItem {
    /// Creates an item; the label is the key.
    pub fn new(key: impl Into<String>, color: Color) -> Self {
        Self {
            key: key.into(),
            color,
        }
    }
}

/// A vertical swatch legend.
#[derive(Clone, Debug)]
pub struct LegendSpec {
    /// Name that keeps this legend's marks apart from other legends in the same chart.
    pub name: &'static str,
    /// Top-left corner.
    pub origin: Point,
    /// Rows in display order.
    pub items: Vec<LegendItem>,
    /// Swatch side length.
    pub swatch_size: f64,
    /// Distance between row tops.
    pub row_height: f64,
    /// Label font size.
    pub font_size: f64,
    /// Label color.
    pub text: Color,
}

impl LegendSpec {
    /// Creates a legend at `origin`.
    pub fn new(name: &'static str, origin: Point, items: Vec<LegendItem>) -> Self {
        Self {
            name,
            origin,
            items,
            swatch_size: 12.0,
            row_height: 20.0,
            font_size: 12.0,
            text: rgb(theme::TEXT),
        }
    }

    /// Sets the distance between row tops.
    pub fn with_row_height(mut self, row_height: f64) -> Self {
        self.row_height = row_height;
        self
    }

    /// Bounding box of the swatch of row `index`.
    #[allow(clippy::cast_precision_loss, reason = "legend row counts are small")]
    pub fn swatch_rect(&self, index: usize) -> Rect {
        let y = self.origin.y + self.row_height * index as f64;
        Rect::new(
            self.origin.x,
            y,
            self.origin.x + self.swatch_size,
            y + self.swatch_size,
        )
    }

    /// Generates swatch and label marks for every row.
    pub fn marks(&self) -> Vec<Mark> {
        let mut out = Vec::with_capacity(self.items.len() * 2);
        for (i, item) in self.items.iter().enumerate() {
            let swatch = self.swatch_rect(i);
            out.push(
                Mark::new(
                    MarkId::for_pair(SWATCH, self.name, &item.key),
                    MarkPayload::rect(swatch, Style::filled(item.color)),
                )
                .with_z_index(z_order::LEGEND_SWATCHES)
                .with_fade(),
            );
            out.push(
                TextMarkSpec::new(
                    MarkId::for_pair(LABEL, self.name, &item.key),
                    Point::new(swatch.x1 + 6.0, swatch.center().y),
                    truncate_label(&item.key, LEGEND_LABEL_CHARS),
                )
                .with_font_size(self.font_size)
                .with_fill(self.text)
                .with_anchor(TextAnchor::Start)
                .with_baseline(TextBaseline::Middle)
                .with_z_index(z_order::LEGEND_LABELS)
                .mark(),
            );
        }
        out
    }
}
