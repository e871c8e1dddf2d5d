// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Fixed-cell heatmap of a signed value by row and year.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use insight_core::{Mark, MarkId, MarkPayload, Style, TextAnchor, TextBaseline};
use kurbo::{Point, Rect};

use crate::chart::{Chart, ChartOutput};
use crate::color::{DivergingColor, RDYLGN, contrasting_text, rgb, theme};
use crate::format::format_percent;
use crate::hit::{HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins, Size};
use crate::text_mark::TextMarkSpec;
use crate::z_order;

const CELLS: u64 = MarkId::space("heatmap-cells");
const VALUES: u64 = MarkId::space("heatmap-values");
const ROW_LABELS: u64 = MarkId::space("heatmap-rows");
const COLUMN_LABELS: u64 = MarkId::space("heatmap-columns");

/// One observed cell.
#[derive(Clone, Debug, PartialEq)]
pub struct HeatCell {
    /// Row key.
    pub row: String,
    /// Column year.
    pub year: i32,
    /// Signed value, e.g. a percentage change.
    pub value: f64,
}

/// A grid of rows (sorted by name) by years (ascending).
///
/// Colors diverge around zero over a domain symmetric in the largest magnitude. Cells with no
/// observation are painted neutral and left unlabeled.
#[derive(Clone, Debug)]
pub struct Heatmap {
    /// Space around the grid.
    pub margins: Margins,
    /// Cell size.
    pub cell: Size,
}

impl Heatmap {
    /// Creates a heatmap with 80 by 40 cells.
    pub fn new() -> Self {
        Self {
            margins: Margins::new(50.0, 10.0, 30.0, 250.0),
            cell: Size::new(80.0, 40.0),
        }
    }

    /// Container size that fits every cell of `input`.
    #[allow(clippy::cast_precision_loss, reason = "grid dimensions are small")]
    pub fn natural_size(&self, input: &[HeatCell]) -> Size {
        let (rows, years) = axes(input);
        Size::new(
            self.margins.left + years.len() as f64 * self.cell.width + self.margins.right,
            self.margins.top + rows.len() as f64 * self.cell.height + self.margins.bottom,
        )
    }
}

impl Default for Heatmap {
    fn default() -> Self {
        Self::new()
    }
}

fn axes(input: &[HeatCell]) -> (Vec<&str>, Vec<i32>) {
    let mut rows: Vec<&str> = input.iter().map(|c| c.row.as_str()).collect();
    rows.sort_unstable();
    rows.dedup();
    let mut years: Vec<i32> = input.iter().map(|c| c.year).collect();
    years.sort_unstable();
    years.dedup();
    (rows, years)
}

impl Chart for Heatmap {
    type Input = [HeatCell];

    fn margins(&self) -> Margins {
        self.margins
    }

    #[allow(clippy::cast_precision_loss, reason = "grid dimensions are small")]
    fn build(&self, input: &[HeatCell], layout: &ChartLayout) -> ChartOutput {
        let origin = Point::new(layout.plot.x0, layout.plot.y0);
        let (rows, years) = axes(input);
        let values: HashMap<(&str, i32), f64> = input
            .iter()
            .filter(|c| c.value.is_finite())
            .map(|c| ((c.row.as_str(), c.year), c.value))
            .collect();
        let max_abs = values.values().fold(0.0_f64, |m, v| m.max(v.abs()));
        let color = DivergingColor::symmetric(max_abs, &RDYLGN);
        let white = rgb(theme::TEXT);

        let mut out = ChartOutput::new();
        for (ri, row) in rows.iter().enumerate() {
            let y0 = origin.y + ri as f64 * self.cell.height;
            for (ci, &year) in years.iter().enumerate() {
                let x0 = origin.x + ci as f64 * self.cell.width;
                let rect = Rect::new(x0, y0, x0 + self.cell.width, y0 + self.cell.height);
                let year_key = format!("{year}");
                let id = MarkId::for_pair(CELLS, row, &year_key);
                let value = values.get(&(*row, year)).copied();
                let fill = value.map_or(rgb(theme::NEUTRAL), |v| color.map(v));
                out.push(
                    Mark::new(id, MarkPayload::rect(rect, Style::filled(fill).with_stroke(white, 1.0)))
                        .with_z_index(z_order::SERIES_FILL)
                        .with_fade(),
                );
                if let Some(v) = value {
                    out.push(
                        TextMarkSpec::new(
                            MarkId::for_pair(VALUES, row, &year_key),
                            rect.center(),
                            format_percent(v),
                        )
                        .with_fill(contrasting_text(fill))
                        .with_anchor(TextAnchor::Middle)
                        .with_baseline(TextBaseline::Middle)
                        .mark(),
                    );
                }
                out.hit(HitRegion::new(
                    id,
                    String::from(*row),
                    HitShape::Rect(rect),
                    alloc::vec![
                        String::from(*row),
                        format!("Year: {year}"),
                        format!("Percentage Change: {}", format_percent(value.unwrap_or(0.0))),
                    ],
                ));
            }
            out.push(
                TextMarkSpec::new(
                    MarkId::for_key(ROW_LABELS, row),
                    Point::new(origin.x - 10.0, y0 + self.cell.height * 0.5),
                    *row,
                )
                .with_anchor(TextAnchor::End)
                .with_baseline(TextBaseline::Middle)
                .with_z_index(z_order::AXIS_LABELS)
                .mark(),
            );
        }
        for (ci, year) in years.iter().enumerate() {
            out.push(
                TextMarkSpec::new(
                    MarkId::for_key(COLUMN_LABELS, &format!("{year}")),
                    Point::new(
                        origin.x + (ci as f64 + 0.5) * self.cell.width,
                        origin.y - 10.0,
                    ),
                    format!("{year}"),
                )
                .with_anchor(TextAnchor::Middle)
                .with_z_index(z_order::AXIS_LABELS)
                .mark(),
            );
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use peniko::Color;

    use super::*;

    fn cell(row: &str, year: i32, value: f64) -> HeatCell {
        HeatCell {
            row: row.into(),
            year,
            value,
        }
    }

    fn build(input: &[HeatCell]) -> ChartOutput {
        let chart = Heatmap::new();
        let layout = ChartLayout::arrange(chart.natural_size(input), chart.margins());
        chart.build(input, &layout)
    }

    fn fill_of(out: &ChartOutput, row: &str, year: &str) -> Color {
        let id = MarkId::for_pair(CELLS, row, year);
        let mark = out.marks.iter().find(|m| m.id == id).expect("cell mark");
        mark.payload.style().fill.expect("cell fill")
    }

    #[test]
    fn grid_covers_every_row_and_year() {
        let input = [cell("Streaming", 2020, 10.0), cell("Betting", 2021, -10.0)];
        let chart = Heatmap::new();
        assert_eq!(chart.natural_size(&input), Size::new(250.0 + 160.0 + 10.0, 50.0 + 80.0 + 30.0));
        let out = build(&input);
        assert_eq!(out.hits.len(), 4, "2 rows by 2 years");
        assert_eq!(out.hits[0].key, "Betting", "rows sorted by name");
    }

    #[test]
    fn missing_cells_are_neutral_and_unlabeled() {
        let out = build(&[cell("Streaming", 2020, 10.0), cell("Betting", 2021, -10.0)]);
        assert_eq!(fill_of(&out, "Betting", "2020").components, rgb(theme::NEUTRAL).components);
        assert!(!out.marks.iter().any(|m| m.id == MarkId::for_pair(VALUES, "Betting", "2020")));
        let missing = out
            .hits
            .iter()
            .find(|h| h.target == MarkId::for_pair(CELLS, "Betting", "2020"))
            .expect("missing cell region");
        assert_eq!(missing.tooltip.at(0)[2], "Percentage Change: 0.0%");
    }

    fn label_of(out: &ChartOutput, row: &str, year: &str) -> std::string::String {
        let id = MarkId::for_pair(VALUES, row, year);
        match &out.marks.iter().find(|m| m.id == id).expect("value mark").payload {
            MarkPayload::Text { text, .. } => text.clone(),
            other => panic!("expected text, got {other:?}"),
        }
    }

    #[test]
    fn cell_labels_are_percentages() {
        let out = build(&[cell("NA", 2022, 5.3), cell("EU", 2022, -2.0)]);
        assert_eq!(label_of(&out, "NA", "2022"), "5.3%");
        assert_eq!(label_of(&out, "EU", "2022"), "-2.0%");
        assert_eq!(fill_of(&out, "NA", "2022").components, rgb(RDYLGN[10]).components);
    }

    #[test]
    fn symmetric_domain_maps_extremes_to_palette_ends() {
        let out = build(&[cell("Streaming", 2020, 4.0), cell("Betting", 2020, -2.0)]);
        assert_eq!(fill_of(&out, "Streaming", "2020").components, rgb(RDYLGN[10]).components);
        assert_ne!(fill_of(&out, "Betting", "2020").components, rgb(RDYLGN[0]).components);
    }
}
