// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Revenue by country and market.

use std::collections::BTreeMap;
use std::collections::HashMap;
use std::sync::Arc;

use insight_charts::{
    Bubble, BubbleChart, CategoryColors, ChartRenderer, Choropleth, GeoRegion, HeatCell, Heatmap,
    MarketRevenue, RegionValues, RenderError, StackedBarChart, format_currency, format_percent,
};
use insight_transforms::{JoinKeys, Reducer, group_reduce, pivot};
use log::debug;

use crate::page::{ChartSettings, ChartSnapshot};
use crate::records::{GlobalRevenueRow, RevenueByMarketRow, RevenueChangeRow, RevenueKind};

/// Everything the revenue charts draw, derived in one pass.
#[derive(Clone, Debug, Default)]
pub struct RevenueView {
    /// Every market, sorted; colors are assigned over this set.
    pub markets: Vec<String>,
    /// Revenue per country over the years shared by all three datasets.
    pub by_country: RegionValues,
    /// Percentage change per market and year over the shared years.
    pub change_cells: Vec<HeatCell>,
    /// Revenue per market and year with its forecast years.
    pub by_market: MarketRevenue,
    /// Mean revenue against mean percentage change per market.
    pub growth: Vec<Bubble>,
}

impl RevenueView {
    /// Derives the view.
    ///
    /// The map and the change table read the years shared by all three datasets; the market
    /// charts read every year.
    pub fn derive(
        global: &[GlobalRevenueRow],
        by_market: &[RevenueByMarketRow],
        change: &[RevenueChangeRow],
        regions: Arc<[GeoRegion]>,
    ) -> Self {
        let years = JoinKeys::<i32>::new()
            .with(global, |r| &r.year)
            .with(by_market, |r| &r.year)
            .with(change, |r| &r.year);
        let shared_global = years.retain(global, |r| &r.year);
        let shared_change = years.retain(change, |r| &r.year);

        let by_country = RegionValues {
            regions,
            values: shared_global
                .into_iter()
                .map(|r| (r.country, r.revenue_usd))
                .collect(),
        };
        let change_cells = shared_change
            .into_iter()
            .map(|r| HeatCell {
                row: r.market,
                year: r.year,
                value: r.percentage_change,
            })
            .collect();

        let mut markets: Vec<String> = by_market.iter().map(|r| r.market.clone()).collect();
        markets.sort();
        markets.dedup();

        Self {
            markets,
            by_country,
            change_cells,
            by_market: market_revenue(by_market, change),
            growth: growth_bubbles(by_market, change),
        }
    }
}

/// A year is a forecast when its first row says so.
fn market_revenue(by_market: &[RevenueByMarketRow], change: &[RevenueChangeRow]) -> MarketRevenue {
    let mut kinds: BTreeMap<i32, RevenueKind> = BTreeMap::new();
    for row in by_market {
        kinds.entry(row.year).or_insert(row.kind);
    }
    MarketRevenue {
        revenue: pivot(by_market, |r| r.year, |r| r.market.clone(), |r| r.revenue),
        forecast_years: kinds
            .into_iter()
            .filter(|(_, kind)| *kind == RevenueKind::Forecast)
            .map(|(year, _)| year)
            .collect(),
        change: pivot(change, |r| r.year, |r| r.market.clone(), |r| r.percentage_change),
    }
}

fn growth_bubbles(by_market: &[RevenueByMarketRow], change: &[RevenueChangeRow]) -> Vec<Bubble> {
    let pct: HashMap<String, f64> = group_reduce(
        change,
        |r| r.market.clone(),
        &[Reducer::Mean(&|r: &RevenueChangeRow| r.percentage_change)],
    )
    .into_iter()
    .map(|row| {
        let v = row.value(0);
        (row.key, v)
    })
    .collect();

    group_reduce(
        by_market,
        |r| r.market.clone(),
        &[
            Reducer::Mean(&|r: &RevenueByMarketRow| r.revenue),
            Reducer::Sum(&|r: &RevenueByMarketRow| r.revenue.abs()),
        ],
    )
    .into_iter()
    .map(|row| {
        let (mean, absolute) = (row.value(0), row.value(1));
        let change = pct.get(&row.key).copied().unwrap_or(0.0);
        Bubble {
            key: row.key,
            x: mean,
            y: change,
            size: absolute,
            details: vec![
                format!("Absolute Revenue: {}", format_currency(absolute)),
                format!("Average Revenue: {}", format_currency(mean)),
                format!("Percentage Change: {}", format_percent(change)),
            ],
        }
    })
    .collect()
}

/// The revenue page: four charts without a control.
#[derive(Debug)]
pub struct RevenuePage {
    global: Arc<[GlobalRevenueRow]>,
    by_market: Arc<[RevenueByMarketRow]>,
    change: Arc<[RevenueChangeRow]>,
    regions: Arc<[GeoRegion]>,
    view: Arc<RevenueView>,
    map: ChartRenderer<Choropleth>,
    change_table: ChartRenderer<Heatmap>,
    by_market_chart: ChartRenderer<StackedBarChart>,
    growth: ChartRenderer<BubbleChart>,
}

impl RevenuePage {
    /// Creates an empty page.
    pub fn new(settings: ChartSettings) -> Self {
        let colors = || CategoryColors::markets(core::iter::empty::<&str>());
        Self {
            global: Arc::from([]),
            by_market: Arc::from([]),
            change: Arc::from([]),
            regions: Arc::from([]),
            view: Arc::new(RevenueView::default()),
            map: settings.renderer(Choropleth::new()),
            change_table: settings.renderer(Heatmap::new()),
            by_market_chart: settings.renderer(StackedBarChart::new(colors())),
            growth: settings.renderer(BubbleChart::revenue_growth(colors())),
        }
    }

    /// Current derived view.
    pub fn view(&self) -> &Arc<RevenueView> {
        &self.view
    }

    /// Replaces the rows and boundaries and recomputes the view.
    pub fn set_data(
        &mut self,
        global: Arc<[GlobalRevenueRow]>,
        by_market: Arc<[RevenueByMarketRow]>,
        change: Arc<[RevenueChangeRow]>,
        regions: Arc<[GeoRegion]>,
    ) {
        self.global = global;
        self.by_market = by_market;
        self.change = change;
        self.regions = regions;

        let view = RevenueView::derive(
            &self.global,
            &self.by_market,
            &self.change,
            Arc::clone(&self.regions),
        );
        debug!(
            "revenue view: {} markets, {} change cells",
            view.markets.len(),
            view.change_cells.len()
        );
        let colors = CategoryColors::markets(&view.markets);
        self.by_market_chart.chart_mut().colors = colors.clone();
        self.growth.chart_mut().colors = colors;
        let table = self.change_table.chart().natural_size(&view.change_cells);
        self.change_table.resize(table);
        self.view = Arc::new(view);
    }

    /// Renders every chart from the current view at time `now`.
    pub fn render(&mut self, now: f64) -> Result<(), RenderError> {
        let view = Arc::clone(&self.view);
        self.map.render(&view.by_country, now)?;
        self.change_table.render(&view.change_cells, now)?;
        self.by_market_chart.render(&view.by_market, now)?;
        self.growth.render(&view.growth, now)?;
        Ok(())
    }

    /// Revenue map.
    pub fn map(&self) -> &ChartRenderer<Choropleth> {
        &self.map
    }

    /// Mutable revenue map, for pointer events and resizing.
    pub fn map_mut(&mut self) -> &mut ChartRenderer<Choropleth> {
        &mut self.map
    }

    /// Percentage change table.
    pub fn change_table(&self) -> &ChartRenderer<Heatmap> {
        &self.change_table
    }

    /// Mutable percentage change table.
    pub fn change_table_mut(&mut self) -> &mut ChartRenderer<Heatmap> {
        &mut self.change_table
    }

    /// Revenue by market chart.
    pub fn by_market(&self) -> &ChartRenderer<StackedBarChart> {
        &self.by_market_chart
    }

    /// Mutable revenue by market chart.
    pub fn by_market_mut(&mut self) -> &mut ChartRenderer<StackedBarChart> {
        &mut self.by_market_chart
    }

    /// Revenue growth chart.
    pub fn growth(&self) -> &ChartRenderer<BubbleChart> {
        &self.growth
    }

    /// Mutable revenue growth chart.
    pub fn growth_mut(&mut self) -> &mut ChartRenderer<BubbleChart> {
        &mut self.growth
    }

    /// Snapshots of every chart at time `now`.
    pub fn snapshots(&self, now: f64) -> Vec<ChartSnapshot> {
        vec![
            ChartSnapshot::capture("global_revenue", &self.map, now),
            ChartSnapshot::capture("percentage_change", &self.change_table, now),
            ChartSnapshot::capture("revenue_by_market", &self.by_market_chart, now),
            ChartSnapshot::capture("revenue_growth", &self.growth, now),
        ]
    }
}

#[cfg(test)]
mod tests {
    use insight_charts::Size;
    use kurbo::Point;

    use super::*;

    fn global(country: &str, year: i32, revenue: f64) -> GlobalRevenueRow {
        GlobalRevenueRow {
            country: country.to_owned(),
            year,
            revenue_usd: revenue,
        }
    }

    fn market(market: &str, year: i32, revenue: f64, kind: RevenueKind) -> RevenueByMarketRow {
        RevenueByMarketRow {
            market: market.to_owned(),
            year,
            revenue,
            kind,
        }
    }

    fn change(market: &str, year: i32, pct: f64) -> RevenueChangeRow {
        RevenueChangeRow {
            market: market.to_owned(),
            year,
            percentage_change: pct,
        }
    }

    fn sample() -> (Vec<GlobalRevenueRow>, Vec<RevenueByMarketRow>, Vec<RevenueChangeRow>) {
        (
            vec![
                global("China", 2021, 300.0),
                global("China", 2022, 400.0),
                global("Brazil", 2019, 50.0),
            ],
            vec![
                market("NA", 2021, 100.0, RevenueKind::Actual),
                market("Europe", 2021, 80.0, RevenueKind::Actual),
                market("NA", 2022, 120.0, RevenueKind::Actual),
                market("NA", 2023, 140.0, RevenueKind::Forecast),
                market("Europe", 2023, 90.0, RevenueKind::Forecast),
            ],
            vec![
                change("NA", 2022, 5.3),
                change("NA", 2023, 16.7),
                change("Europe", 2023, 12.5),
            ],
        )
    }

    #[test]
    fn map_and_table_read_the_shared_years() {
        let (g, m, c) = sample();
        let view = RevenueView::derive(&g, &m, &c, Arc::from([]));
        assert_eq!(view.by_country.values, [("China".to_owned(), 400.0)], "only 2022 is shared");
        assert_eq!(
            view.change_cells,
            [HeatCell {
                row: "NA".into(),
                year: 2022,
                value: 5.3,
            }]
        );
    }

    #[test]
    fn market_charts_read_every_year() {
        let (g, m, c) = sample();
        let view = RevenueView::derive(&g, &m, &c, Arc::from([]));
        assert_eq!(view.markets, ["Europe", "NA"]);
        assert_eq!(view.by_market.revenue.xs, [2021, 2022, 2023]);
        assert_eq!(view.by_market.forecast_years, [2023]);
        assert_eq!(view.by_market.change.xs, [2022, 2023]);
    }

    #[test]
    fn growth_bubbles_average_each_market() {
        let (g, m, c) = sample();
        let view = RevenueView::derive(&g, &m, &c, Arc::from([]));
        let na = view.growth.iter().find(|b| b.key == "NA").expect("NA bubble");
        assert_eq!(na.x, 120.0);
        assert_eq!(na.size, 360.0);
        assert!((na.y - 11.0).abs() < 1e-9, "mean of 5.3 and 16.7");
        assert_eq!(na.details[2], "Percentage Change: 11.0%");
    }

    #[test]
    fn markets_without_change_rows_grow_by_zero() {
        let (g, m, _) = sample();
        let view = RevenueView::derive(&g, &m, &[], Arc::from([]));
        assert!(view.growth.iter().all(|b| b.y == 0.0));
        assert!(view.change_cells.is_empty(), "no shared years");
        assert!(view.by_country.values.is_empty());
    }

    #[test]
    fn the_table_is_sized_to_its_cells() {
        let (g, m, c) = sample();
        let mut page = RevenuePage::new(ChartSettings::default());
        page.set_data(g.into(), m.into(), c.into(), Arc::from([]));
        assert_eq!(page.change_table().size(), Size::new(250.0 + 80.0 + 10.0, 50.0 + 40.0 + 30.0));
        page.render(0.0).expect("render");

        let cell = page.change_table().hit_regions()[0].clone();
        assert_eq!(cell.key, "NA");
        page.change_table_mut().pointer_move(Point::new(250.0 + 40.0, 50.0 + 20.0));
        assert_eq!(page.change_table().hovered(), Some("NA"));
        let snapshots = page.snapshots(1_000.0);
        let table = snapshots
            .iter()
            .find(|s| s.name == "percentage_change")
            .expect("table snapshot");
        let (_, lines) = table.tooltip.as_ref().expect("tooltip");
        assert!(lines.iter().any(|l| l.contains("5.3%")), "{lines:?}");
    }
}
