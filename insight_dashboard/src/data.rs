// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Every dataset of the dashboard, loaded together.

use std::sync::Arc;

use insight_charts::GeoRegion;

use crate::config::DashboardConfig;
use crate::loader::{Dataset, DatasetKind, load_or_empty, load_regions_or_empty};
use crate::records::{
    GeneralEsportsRow, GlobalRevenueRow, HistoricalEarningsRow, RevenueByMarketRow,
    RevenueChangeRow, ViewershipRow,
};

/// Every dataset the dashboard reads, as loaded.
///
/// Cloning is cheap; rows are shared.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct DashboardData {
    /// Viewership rows.
    pub viewership: Arc<[ViewershipRow]>,
    /// General esports rows.
    pub general_esports: Arc<[GeneralEsportsRow]>,
    /// Historical earnings rows.
    pub historical_earnings: Arc<[HistoricalEarningsRow]>,
    /// Global revenue rows.
    pub global_revenue: Arc<[GlobalRevenueRow]>,
    /// Revenue by market rows.
    pub revenue_by_market: Arc<[RevenueByMarketRow]>,
    /// Revenue change rows.
    pub revenue_change: Arc<[RevenueChangeRow]>,
    /// World boundaries.
    pub regions: Arc<[GeoRegion]>,
}

impl DashboardData {
    /// Loads every file named by `config` concurrently.
    ///
    /// Files that fail to load are logged and left empty.
    pub async fn load(config: &DashboardConfig) -> Self {
        let path = |kind| config.path_of(kind);
        let (viewership, general, historical, global, by_market, change, regions) = tokio::join!(
            load_or_empty(DatasetKind::Viewership, path(DatasetKind::Viewership)),
            load_or_empty(DatasetKind::GeneralEsports, path(DatasetKind::GeneralEsports)),
            load_or_empty(DatasetKind::HistoricalEarnings, path(DatasetKind::HistoricalEarnings)),
            load_or_empty(DatasetKind::GlobalRevenue, path(DatasetKind::GlobalRevenue)),
            load_or_empty(DatasetKind::RevenueByMarket, path(DatasetKind::RevenueByMarket)),
            load_or_empty(DatasetKind::RevenueChange, path(DatasetKind::RevenueChange)),
            load_regions_or_empty(config.regions_path()),
        );
        let mut data = Self {
            regions,
            ..Self::default()
        };
        for dataset in [viewership, general, historical, global, by_market, change] {
            data.insert(dataset);
        }
        data
    }

    /// Replaces the rows of `dataset`'s kind.
    pub fn insert(&mut self, dataset: Dataset) {
        match dataset {
            Dataset::Viewership(rows) => self.viewership = rows,
            Dataset::GeneralEsports(rows) => self.general_esports = rows,
            Dataset::HistoricalEarnings(rows) => self.historical_earnings = rows,
            Dataset::GlobalRevenue(rows) => self.global_revenue = rows,
            Dataset::RevenueByMarket(rows) => self.revenue_by_market = rows,
            Dataset::RevenueChange(rows) => self.revenue_change = rows,
        }
    }
}
