// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Loading, filtering and page composition for the esports insight dashboard.
//!
//! Data flows one way: the loader reads the CSV and GeoJSON files into shared row slices, each
//! page joins and aggregates its rows into a view under its top-N control, and every chart of
//! the page renders from that one view. A page never hands a chart a half-updated view: it
//! derives the whole view first and swaps it in afterwards.
//!
//! ```no_run
//! use insight_dashboard::{Dashboard, DashboardConfig, MemoryStore, Section};
//!
//! # async fn run() -> Result<(), Box<dyn std::error::Error>> {
//! let config = DashboardConfig::load("dashboard.toml")?;
//! let mut dashboard = Dashboard::new(&config, MemoryStore::new());
//! dashboard.reload(&config).await;
//! dashboard.select(Section::Viewership)?;
//! dashboard.viewership_mut().set_top_n(3);
//! dashboard.render_active(0.0)?;
//! # Ok(())
//! # }
//! ```

mod config;
mod dashboard;
mod data;
mod error;
mod filter;
mod loader;
mod page;
mod prize_pool_page;
mod records;
mod regions;
mod revenue_page;
mod storage;
mod viewership_page;

pub use config::{ChartConfig, DashboardConfig, DataFiles, FilterConfig, TopNRange};
pub use dashboard::{ACTIVE_SECTION_KEY, Dashboard, Section};
pub use data::DashboardData;
pub use error::{CoerceError, ConfigError, LoadError, StorageError};
pub use filter::TopNControl;
pub use loader::{
    Dataset, DatasetKind, LoadGuard, LoadTicket, load, load_or_empty, load_regions,
    load_regions_or_empty,
};
pub use page::{ChartSettings, ChartSnapshot};
pub use prize_pool_page::{
    HOURS_WATCHED, PrizePoolPage, PrizePoolView, TOP_GAMES, TOTAL_EARNINGS, UNKNOWN_GENRE,
};
pub use records::{
    GeneralEsportsRow, GlobalRevenueRow, HistoricalEarningsRow, RevenueByMarketRow,
    RevenueChangeRow, RevenueKind, ViewershipRow, parse_number, parse_year,
};
pub use regions::parse_regions;
pub use revenue_page::{RevenuePage, RevenueView};
pub use storage::{FileStore, MemoryStore, SessionStore};
pub use viewership_page::{ViewershipPage, ViewershipView};
