// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Scales, guides and the dashboard chart types, built on `insight_core`.
//!
//! Every chart implements [`Chart`]: given its input rows and a [`ChartLayout`] it returns a
//! [`ChartOutput`], a flat list of keyed marks plus the hit regions that drive hover emphasis
//! and tooltips. A [`ChartRenderer`] owns one chart instance and turns successive outputs into
//! animated enter/update/exit transitions.
//!
//! - **Scales** map data values into screen coordinates.
//! - **Guides** (axes, legends) are generated as marks keyed by tick label or category.
//! - **Colors** stay stable per category across re-renders and filter changes.
//!
//! Text shaping is out of scope; text marks store unshaped strings and tooltip boxes are sized
//! through a [`TextMeasurer`].

#![no_std]

extern crate alloc;
#[cfg(feature = "std")]
extern crate std;

mod area_mark;
mod axis;
mod bar_chart;
mod bar_mark;
mod bubble_chart;
mod chart;
mod choropleth;
mod color;
mod diverging_bar_chart;
mod error;
#[cfg(not(feature = "std"))]
mod float;
mod format;
mod geo;
mod grouped_bar_chart;
mod heatmap;
mod hit;
mod layout;
mod legend;
mod line_chart;
mod measure;
mod point_mark;
mod renderer;
mod rule_mark;
mod scale;
mod stacked_area_chart;
mod stacked_bar_chart;
mod text_mark;
pub mod z_order;

pub use area_mark::{AreaMarkSpec, LineMarkSpec};
pub use axis::{AxisOrient, AxisSpec, AxisStyle, AxisTick};
pub use bar_chart::{BarChart, BarDatum};
pub use bar_mark::{BarMarkSpec, BarOrient};
pub use bubble_chart::{Bubble, BubbleChart, ReferenceLines, SizeLegend, SizeSteps};
pub use chart::{Chart, ChartOutput};
pub use choropleth::{Choropleth, RegionValues};
pub use color::{
    CategoryColors, DivergingColor, GAME_COLORS, GAME_PALETTE, GENRE_PALETTE, GNBU,
    MARKET_PALETTE, RDYLGN, SERIES_PALETTE, SequentialColor, contrasting_text, rgb, theme,
};
pub use diverging_bar_chart::DivergingBarChart;
pub use error::RenderError;
pub use format::{
    AXIS_LABEL_CHARS, LEGEND_LABEL_CHARS, format_currency, format_fixed, format_grouped,
    format_millions, format_percent, format_si, format_year, truncate_label,
};
pub use geo::{GeoRegion, MAX_LATITUDE, Mercator, Ring, rings_path};
pub use grouped_bar_chart::{BarGroup, GroupedBar, GroupedBarChart};
pub use heatmap::{HeatCell, Heatmap};
pub use hit::{Emphasis, HitRegion, HitShape, TooltipLines};
pub use layout::{ChartLayout, Margins, Size};
pub use legend::{LegendItem, LegendSpec};
pub use line_chart::{DualAxisLineChart, YearPair};
pub use measure::{HeuristicTextMeasurer, TextMeasurer};
pub use point_mark::PointMarkSpec;
pub use renderer::{ChartRenderer, RenderOutcome, TOOLTIP_FONT_SIZE, TOOLTIP_PADDING};
pub use rule_mark::RuleMarkSpec;
pub use scale::{
    ScaleBand, ScaleLinear, ScaleLinearSpec, ScalePoint, ScaleSqrt, infer_domain,
    zero_based_domain,
};
pub use stacked_area_chart::StackedAreaChart;
pub use stacked_bar_chart::{MarketRevenue, StackedBarChart};
pub use text_mark::TextMarkSpec;
