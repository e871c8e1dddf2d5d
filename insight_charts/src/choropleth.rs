// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! World map shaded by a value per region.

use alloc::format;
use alloc::string::String;
use alloc::sync::Arc;
use alloc::vec::Vec;

use hashbrown::{HashMap, HashSet};
use insight_core::{Mark, MarkId, MarkPayload, Style, TextAnchor, TextBaseline};
use kurbo::{Point, Rect};
use log::debug;

use crate::chart::{Chart, ChartOutput};
use crate::color::{GNBU, SequentialColor, rgb, theme};
use crate::format::{format_currency, format_grouped};
use crate::geo::{GeoRegion, Mercator, rings_path};
use crate::hit::{Emphasis, HitRegion, HitShape};
use crate::layout::{ChartLayout, Margins};
use crate::text_mark::TextMarkSpec;
use crate::z_order;

const REGIONS: u64 = MarkId::space("choropleth-regions");
const SCALE: u64 = MarkId::space("choropleth-scale");

/// Number of flat steps used to draw the color ramp legend.
const RAMP_STEPS: usize = 20;

/// Input of [`Choropleth`].
#[derive(Clone, Debug, Default)]
pub struct RegionValues {
    /// Boundaries, shared with whoever loaded them.
    pub regions: Arc<[GeoRegion]>,
    /// Total value per region name.
    pub values: Vec<(String, f64)>,
}

/// Regions colored on a sequential ramp over the observed value range.
///
/// Regions without a value are drawn neutral and are not hoverable.
#[derive(Clone, Debug)]
pub struct Choropleth {
    /// Space around the map.
    pub margins: Margins,
    /// Ramp legend width.
    pub legend_width: f64,
}

impl Choropleth {
    /// Creates a full-bleed map with a ramp legend in the lower left corner.
    pub fn new() -> Self {
        Self {
            margins: Margins::new(0.0, 0.0, 0.0, 0.0),
            legend_width: 200.0,
        }
    }
}

impl Default for Choropleth {
    fn default() -> Self {
        Self::new()
    }
}

impl Chart for Choropleth {
    type Input = RegionValues;

    fn margins(&self) -> Margins {
        self.margins
    }

    #[allow(clippy::cast_precision_loss, reason = "ramp step counts are small")]
    fn build(&self, input: &RegionValues, layout: &ChartLayout) -> ChartOutput {
        let mut totals: HashMap<&str, f64> = HashMap::new();
        for (name, v) in &input.values {
            if v.is_finite() {
                *totals.entry(name.as_str()).or_insert(0.0) += v;
            }
        }
        let (lo, hi) = totals
            .values()
            .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), &v| (lo.min(v), hi.max(v)));
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (0.0, 0.0) };
        let color = SequentialColor::new((lo, hi), &GNBU);
        let projection = Mercator::fit(&input.regions, layout.plot);
        let outline = rgb(theme::OUTLINE);

        let mut out = ChartOutput::new();
        let mut seen = HashSet::new();
        for region in input.regions.iter() {
            if !seen.insert(region.name.as_str()) {
                debug!("skipping repeated map region {:?}", region.name);
                continue;
            }
            let rings = projection.project_rings(region);
            let id = MarkId::for_key(REGIONS, &region.name);
            let value = totals.get(region.name.as_str()).copied();
            let fill = value.map_or(rgb(theme::NEUTRAL), |v| color.map(v));
            out.push(
                Mark::new(
                    id,
                    MarkPayload::path(rings_path(&rings), Style::filled(fill).with_stroke(outline, 0.1)),
                )
                .with_z_index(z_order::SERIES_FILL)
                .with_fade(),
            );
            if let Some(v) = value {
                out.hit(
                    HitRegion::new(
                        id,
                        region.name.clone(),
                        HitShape::Polygon(rings),
                        alloc::vec![region.name.clone(), format!("Revenue: {}", format_currency(v))],
                    )
                    .with_emphasis(Emphasis::stroke(rgb(theme::HIGHLIGHT), 0.5)),
                );
            }
        }

        if !totals.is_empty() {
            let origin = Point::new(layout.view.x0 + 40.0, layout.view.y1 - 40.0);
            let step = self.legend_width / RAMP_STEPS as f64;
            for i in 0..RAMP_STEPS {
                let t = (i as f64 + 0.5) / RAMP_STEPS as f64;
                let x0 = origin.x + step * i as f64;
                out.push(
                    Mark::new(
                        MarkId::for_pair(SCALE, "step", &format!("{i}")),
                        MarkPayload::rect(
                            Rect::new(x0, origin.y, x0 + step, origin.y + 10.0),
                            Style::filled(color.map(lo + (hi - lo) * t)),
                        ),
                    )
                    .with_z_index(z_order::LEGEND_SWATCHES)
                    .with_fade(),
                );
            }
            for (key, x, v, anchor) in [
                ("min", origin.x, lo, TextAnchor::Start),
                ("max", origin.x + self.legend_width, hi, TextAnchor::End),
            ] {
                out.push(
                    TextMarkSpec::new(
                        MarkId::for_pair(SCALE, "label", key),
                        Point::new(x, origin.y + 14.0),
                        format_grouped(v),
                    )
                    .with_anchor(anchor)
                    .with_baseline(TextBaseline::Top)
                    .with_z_index(z_order::LEGEND_LABELS)
                    .mark(),
                );
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use crate::layout::Size;

    fn square(name: &str, lon: f64) -> GeoRegion {
        GeoRegion::new(
            name,
            alloc::vec![alloc::vec![alloc::vec![
                [lon, 0.0],
                [lon + 10.0, 0.0],
                [lon + 10.0, 10.0],
                [lon, 10.0],
            ]]],
        )
    }

    fn input() -> RegionValues {
        RegionValues {
            regions: Arc::from(alloc::vec![square("France", 0.0), square("Atlantis", 20.0), square("Chile", 40.0)]),
            values: alloc::vec![
                (String::from("France"), 100.0),
                (String::from("Chile"), 50.0),
                (String::from("Chile"), 50.0),
                (String::from("Nowhere"), 10.0),
            ],
        }
    }

    #[test]
    fn unmatched_regions_are_neutral_and_not_hoverable() {
        let chart = Choropleth::new();
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let out = chart.build(&input(), &layout);
        let atlantis = out
            .marks
            .iter()
            .find(|m| m.id == MarkId::for_key(REGIONS, "Atlantis"))
            .expect("Atlantis is drawn");
        assert_eq!(
            atlantis.payload.style().fill.map(|c| c.components),
            Some(rgb(theme::NEUTRAL).components)
        );
        let keys: Vec<&str> = out.hits.iter().map(|h| h.key.as_str()).collect();
        assert_eq!(keys, ["France", "Chile"]);
    }

    #[test]
    fn values_are_summed_per_region() {
        let chart = Choropleth::new();
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let out = chart.build(&input(), &layout);
        let chile = out.hits.iter().find(|h| h.key == "Chile").expect("Chile region");
        assert_eq!(chile.tooltip.at(0)[1], "Revenue: $100");
        let fill = |name: &str| {
            out.marks
                .iter()
                .find(|m| m.id == MarkId::for_key(REGIONS, name))
                .and_then(|m| m.payload.style().fill)
                .map(|c| c.components)
        };
        assert_eq!(fill("Chile"), fill("France"), "equal totals, equal color");
    }

    #[test]
    fn pointer_inside_a_region_hits_it() {
        let chart = Choropleth::new();
        let layout = ChartLayout::arrange(Size::new(600.0, 400.0), chart.margins());
        let out = chart.build(&input(), &layout);
        let france = &out.hits[0];
        let HitShape::Polygon(rings) = &france.shape else {
            panic!("expected polygon");
        };
        let c = Rect::from_points(rings[0][0], rings[0][2]).center();
        assert_eq!(france.shape.hit(c), Some(0));
    }
}
