// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! The dashboard: pages, the active section and its persistence.

use std::sync::Arc;

use insight_charts::RenderError;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use crate::config::DashboardConfig;
use crate::data::DashboardData;
use crate::error::StorageError;
use crate::loader::LoadGuard;
use crate::page::{ChartSettings, ChartSnapshot};
use crate::prize_pool_page::PrizePoolPage;
use crate::revenue_page::RevenuePage;
use crate::storage::SessionStore;
use crate::viewership_page::ViewershipPage;

/// Session key holding the active section.
pub const ACTIVE_SECTION_KEY: &str = "activeSection";

/// A dashboard section.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Section {
    /// Every chart.
    #[default]
    Overview,
    /// Revenue by country and market.
    Revenue,
    /// Twitch viewership.
    Viewership,
    /// Tournament prize pools.
    Tournament,
}

impl Section {
    /// Every section, in navigation order.
    pub const ALL: [Self; 4] = [Self::Overview, Self::Revenue, Self::Viewership, Self::Tournament];

    /// Navigation label.
    pub fn title(self) -> &'static str {
        match self {
            Self::Overview => "Overview",
            Self::Revenue => "Revenue",
            Self::Viewership => "Viewership",
            Self::Tournament => "Tournament",
        }
    }
}

/// Owns every page and the active section.
///
/// The active section is written to the session store on every change and removed when
/// the dashboard is dropped.
#[derive(Debug)]
pub struct Dashboard<S: SessionStore> {
    store: S,
    section: Section,
    viewership: ViewershipPage,
    prize_pool: PrizePoolPage,
    revenue: RevenuePage,
    loads: LoadGuard,
}

impl<S: SessionStore> Dashboard<S> {
    /// Creates a dashboard without data, restoring the active section from `store`.
    pub fn new(config: &DashboardConfig, store: S) -> Self {
        let settings = ChartSettings::from_config(&config.chart);
        let section = restore_section(&store);
        Self {
            store,
            section,
            viewership: ViewershipPage::new(config.filters.games.control(), settings),
            prize_pool: PrizePoolPage::new(config.filters.genres.control(), settings),
            revenue: RevenuePage::new(settings),
            loads: LoadGuard::new(),
        }
    }

    /// The active section.
    pub fn section(&self) -> Section {
        self.section
    }

    /// Activates `section` and persists it.
    pub fn select(&mut self, section: Section) -> Result<(), StorageError> {
        self.section = section;
        let raw = serde_json::to_string(&section)?;
        self.store.set(ACTIVE_SECTION_KEY, &raw)
    }

    /// The session store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Loads every dataset named by `config`.
    ///
    /// Resolves to `None` when another load was started before this one finished.
    pub fn load<'a>(
        &'a self,
        config: &'a DashboardConfig,
    ) -> impl Future<Output = Option<DashboardData>> + 'a {
        self.loads.run(DashboardData::load(config))
    }

    /// Loads every dataset and hands it to the pages. Returns `false` for a stale load.
    pub async fn reload(&mut self, config: &DashboardConfig) -> bool {
        match self.load(config).await {
            Some(data) => {
                self.set_data(&data);
                true
            }
            None => false,
        }
    }

    /// Hands freshly loaded data to every page.
    pub fn set_data(&mut self, data: &DashboardData) {
        info!(
            "dashboard data: {} viewership, {} general, {} historical, {} global, {} market, {} change rows, {} regions",
            data.viewership.len(),
            data.general_esports.len(),
            data.historical_earnings.len(),
            data.global_revenue.len(),
            data.revenue_by_market.len(),
            data.revenue_change.len(),
            data.regions.len()
        );
        self.viewership.set_data(Arc::clone(&data.viewership));
        self.prize_pool.set_data(
            Arc::clone(&data.viewership),
            Arc::clone(&data.general_esports),
            Arc::clone(&data.historical_earnings),
        );
        self.revenue.set_data(
            Arc::clone(&data.global_revenue),
            Arc::clone(&data.revenue_by_market),
            Arc::clone(&data.revenue_change),
            Arc::clone(&data.regions),
        );
    }

    /// Renders the pages of the active section at time `now`.
    pub fn render_active(&mut self, now: f64) -> Result<(), RenderError> {
        match self.section {
            Section::Overview => {
                self.revenue.render(now)?;
                self.viewership.render(now)?;
                self.prize_pool.render(now)
            }
            Section::Revenue => self.revenue.render(now),
            Section::Viewership => self.viewership.render(now),
            Section::Tournament => self.prize_pool.render(now),
        }
    }

    /// Snapshots of the charts of the active section at time `now`.
    pub fn snapshots(&self, now: f64) -> Vec<ChartSnapshot> {
        match self.section {
            Section::Overview => {
                let mut all = self.revenue.snapshots(now);
                all.extend(self.viewership.snapshots(now));
                all.extend(self.prize_pool.snapshots(now));
                all
            }
            Section::Revenue => self.revenue.snapshots(now),
            Section::Viewership => self.viewership.snapshots(now),
            Section::Tournament => self.prize_pool.snapshots(now),
        }
    }

    /// Viewership page.
    pub fn viewership(&self) -> &ViewershipPage {
        &self.viewership
    }

    /// Mutable viewership page.
    pub fn viewership_mut(&mut self) -> &mut ViewershipPage {
        &mut self.viewership
    }

    /// Prize pool page.
    pub fn prize_pool(&self) -> &PrizePoolPage {
        &self.prize_pool
    }

    /// Mutable prize pool page.
    pub fn prize_pool_mut(&mut self) -> &mut PrizePoolPage {
        &mut self.prize_pool
    }

    /// Revenue page.
    pub fn revenue(&self) -> &RevenuePage {
        &self.revenue
    }

    /// Mutable revenue page.
    pub fn revenue_mut(&mut self) -> &mut RevenuePage {
        &mut self.revenue
    }
}

impl<S: SessionStore> Drop for Dashboard<S> {
    fn drop(&mut self) {
        if let Err(err) = self.store.remove(ACTIVE_SECTION_KEY) {
            warn!("could not clear the active section: {err}");
        }
    }
}

fn restore_section(store: &impl SessionStore) -> Section {
    let raw = match store.get(ACTIVE_SECTION_KEY) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Section::default(),
        Err(err) => {
            warn!("could not read the active section: {err}");
            return Section::default();
        }
    };
    serde_json::from_str(&raw).unwrap_or_else(|err| {
        warn!("ignoring stored section {raw:?}: {err}");
        Section::default()
    })
}

#[cfg(test)]
mod tests {
    use crate::storage::{FileStore, MemoryStore};

    use super::*;

    #[test]
    fn sections_serialize_in_lowercase() {
        assert_eq!(serde_json::to_string(&Section::Tournament).expect("serializable"), "\"tournament\"");
        assert_eq!(Section::ALL.map(Section::title)[2], "Viewership");
    }

    #[test]
    fn the_section_defaults_to_overview_and_is_persisted() {
        let mut dashboard = Dashboard::new(&DashboardConfig::default(), MemoryStore::new());
        assert_eq!(dashboard.section(), Section::Overview);
        dashboard.select(Section::Revenue).expect("writable");
        assert_eq!(
            dashboard.store().get(ACTIVE_SECTION_KEY).expect("readable").as_deref(),
            Some("\"revenue\"")
        );
    }

    #[test]
    fn the_section_survives_a_reload_and_is_cleared_on_drop() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("session.json");
        let config = DashboardConfig::default();

        let mut first = Dashboard::new(&config, FileStore::new(&path));
        first.select(Section::Viewership).expect("writable");
        let second = Dashboard::new(&config, FileStore::new(&path));
        assert_eq!(second.section(), Section::Viewership);

        drop(second);
        drop(first);
        assert_eq!(FileStore::new(&path).get(ACTIVE_SECTION_KEY).expect("readable"), None);
    }

    #[test]
    fn unreadable_sections_fall_back_to_overview() {
        let mut store = MemoryStore::new();
        store.set(ACTIVE_SECTION_KEY, "\"settings\"").expect("writable");
        let dashboard = Dashboard::new(&DashboardConfig::default(), store);
        assert_eq!(dashboard.section(), Section::Overview);
    }

    #[tokio::test]
    async fn reload_feeds_every_page() {
        let dir = tempfile::tempdir().expect("temp dir");
        std::fs::write(
            dir.path().join("viewership.csv"),
            "Year,Game,Peak_viewers,Hours_streamed,Hours_watched,Avg_viewers\n\
             2020,Dota 2,\"1,000\",10,100,50\n\
             2021,Dota 2,\"2,000\",20,200,60\n",
        )
        .expect("write file");
        std::fs::write(
            dir.path().join("general_esports.csv"),
            "Game,Genre,Total_Earnings,Total_Tournaments\nDota 2,MOBA,300,3\n",
        )
        .expect("write file");
        std::fs::write(
            dir.path().join("historical_earnings.csv"),
            "Date,Game,Earnings\n2020-06-01,Dota 2,300\n",
        )
        .expect("write file");
        let config = DashboardConfig::default().with_data_dir(dir.path());

        let mut dashboard = Dashboard::new(&config, MemoryStore::new());
        assert!(dashboard.reload(&config).await);
        assert_eq!(&*dashboard.viewership().view().top_games, ["Dota 2"]);
        assert_eq!(&*dashboard.prize_pool().view().top_genres, ["MOBA"]);
        assert!(dashboard.revenue().view().growth.is_empty(), "revenue files are missing");

        dashboard.render_active(0.0).expect("render");
        assert_eq!(dashboard.snapshots(1_000.0).len(), 11);
        dashboard.select(Section::Tournament).expect("writable");
        assert_eq!(dashboard.snapshots(1_000.0).len(), 4);
    }

    #[tokio::test]
    async fn a_superseded_load_is_discarded() {
        let config = DashboardConfig::default().with_data_dir("does-not-exist");
        let dashboard = Dashboard::new(&config, MemoryStore::new());
        let stale = dashboard.load(&config);
        let fresh = dashboard.load(&config);
        let (stale, fresh) = tokio::join!(stale, fresh);
        assert!(stale.is_none());
        assert!(fresh.is_some());
    }
}
