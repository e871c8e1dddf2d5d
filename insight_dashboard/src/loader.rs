// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Async dataset loading.
//!
//! Files are read with `tokio::fs` and parsed on a blocking task. The `*_or_empty` variants
//! log failures and hand back an empty dataset, so one broken file only blanks the charts
//! that depend on it.

use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use insight_charts::GeoRegion;
use log::{info, warn};
use serde::de::DeserializeOwned;

use crate::error::LoadError;
use crate::records::{
    GeneralEsportsRow, GlobalRevenueRow, HistoricalEarningsRow, RevenueByMarketRow,
    RevenueChangeRow, ViewershipRow,
};
use crate::regions::parse_regions;

/// Names the six tabular datasets.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum DatasetKind {
    /// Twitch viewership per game and year.
    Viewership,
    /// Tournament totals per game.
    GeneralEsports,
    /// Prize money per game and period.
    HistoricalEarnings,
    /// Revenue per country and year.
    GlobalRevenue,
    /// Revenue per market and year.
    RevenueByMarket,
    /// Revenue change per market and year.
    RevenueChange,
}

impl DatasetKind {
    /// Every kind, in load order.
    pub const ALL: [Self; 6] = [
        Self::Viewership,
        Self::GeneralEsports,
        Self::HistoricalEarnings,
        Self::GlobalRevenue,
        Self::RevenueByMarket,
        Self::RevenueChange,
    ];

    /// Short name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            Self::Viewership => "viewership",
            Self::GeneralEsports => "general esports",
            Self::HistoricalEarnings => "historical earnings",
            Self::GlobalRevenue => "global revenue",
            Self::RevenueByMarket => "revenue by market",
            Self::RevenueChange => "revenue change",
        }
    }

    /// A dataset of this kind with no rows.
    pub fn empty(self) -> Dataset {
        match self {
            Self::Viewership => Dataset::Viewership(Arc::new([])),
            Self::GeneralEsports => Dataset::GeneralEsports(Arc::new([])),
            Self::HistoricalEarnings => Dataset::HistoricalEarnings(Arc::new([])),
            Self::GlobalRevenue => Dataset::GlobalRevenue(Arc::new([])),
            Self::RevenueByMarket => Dataset::RevenueByMarket(Arc::new([])),
            Self::RevenueChange => Dataset::RevenueChange(Arc::new([])),
        }
    }
}

/// The rows of one dataset.
///
/// Rows are immutable once loaded and shared by every page that reads them.
#[derive(Clone, Debug, PartialEq)]
pub enum Dataset {
    /// Viewership rows.
    Viewership(Arc<[ViewershipRow]>),
    /// General esports rows.
    GeneralEsports(Arc<[GeneralEsportsRow]>),
    /// Historical earnings rows.
    HistoricalEarnings(Arc<[HistoricalEarningsRow]>),
    /// Global revenue rows.
    GlobalRevenue(Arc<[GlobalRevenueRow]>),
    /// Revenue by market rows.
    RevenueByMarket(Arc<[RevenueByMarketRow]>),
    /// Revenue change rows.
    RevenueChange(Arc<[RevenueChangeRow]>),
}

fn rows<T: DeserializeOwned>(bytes: &[u8]) -> Result<Arc<[T]>, csv::Error> {
    csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(bytes)
        .deserialize()
        .collect()
}

impl Dataset {
    /// Parses headered CSV as rows of `kind`.
    pub fn parse(kind: DatasetKind, bytes: &[u8]) -> Result<Self, csv::Error> {
        Ok(match kind {
            DatasetKind::Viewership => Self::Viewership(rows(bytes)?),
            DatasetKind::GeneralEsports => Self::GeneralEsports(rows(bytes)?),
            DatasetKind::HistoricalEarnings => Self::HistoricalEarnings(rows(bytes)?),
            DatasetKind::GlobalRevenue => Self::GlobalRevenue(rows(bytes)?),
            DatasetKind::RevenueByMarket => Self::RevenueByMarket(rows(bytes)?),
            DatasetKind::RevenueChange => Self::RevenueChange(rows(bytes)?),
        })
    }

    /// Which dataset this is.
    pub fn kind(&self) -> DatasetKind {
        match self {
            Self::Viewership(_) => DatasetKind::Viewership,
            Self::GeneralEsports(_) => DatasetKind::GeneralEsports,
            Self::HistoricalEarnings(_) => DatasetKind::HistoricalEarnings,
            Self::GlobalRevenue(_) => DatasetKind::GlobalRevenue,
            Self::RevenueByMarket(_) => DatasetKind::RevenueByMarket,
            Self::RevenueChange(_) => DatasetKind::RevenueChange,
        }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        match self {
            Self::Viewership(r) => r.len(),
            Self::GeneralEsports(r) => r.len(),
            Self::HistoricalEarnings(r) => r.len(),
            Self::GlobalRevenue(r) => r.len(),
            Self::RevenueByMarket(r) => r.len(),
            Self::RevenueChange(r) => r.len(),
        }
    }

    /// Returns `true` when there are no rows.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

async fn read(path: &Path) -> Result<Vec<u8>, LoadError> {
    tokio::fs::read(path).await.map_err(|source| LoadError::Io {
        path: path.to_path_buf(),
        source,
    })
}

/// Loads the CSV file at `path` as rows of `kind`.
pub async fn load(kind: DatasetKind, path: impl AsRef<Path>) -> Result<Dataset, LoadError> {
    let path = path.as_ref().to_path_buf();
    let bytes = read(&path).await?;
    let parsed = tokio::task::spawn_blocking(move || Dataset::parse(kind, &bytes)).await?;
    let dataset = parsed.map_err(|source| LoadError::Csv {
        row: source.position().map(|p| p.line()),
        path: path.clone(),
        source,
    })?;
    info!("loaded {} {} rows from {}", dataset.len(), kind.name(), path.display());
    Ok(dataset)
}

/// Loads like [`load`], substituting an empty dataset on failure.
pub async fn load_or_empty(kind: DatasetKind, path: impl AsRef<Path>) -> Dataset {
    match load(kind, path).await {
        Ok(dataset) => dataset,
        Err(err) => {
            warn!("{err}; showing no {} data", kind.name());
            kind.empty()
        }
    }
}

/// Loads world-region boundaries from a GeoJSON feature collection.
pub async fn load_regions(path: impl AsRef<Path>) -> Result<Arc<[GeoRegion]>, LoadError> {
    let path: PathBuf = path.as_ref().to_path_buf();
    let bytes = read(&path).await?;
    let parsed = tokio::task::spawn_blocking(move || parse_regions(&bytes)).await?;
    let regions = parsed.map_err(|source| LoadError::GeoJson {
        path: path.clone(),
        source,
    })?;
    info!("loaded {} regions from {}", regions.len(), path.display());
    Ok(regions.into())
}

/// Loads like [`load_regions`], substituting no regions on failure.
pub async fn load_regions_or_empty(path: impl AsRef<Path>) -> Arc<[GeoRegion]> {
    match load_regions(path).await {
        Ok(regions) => regions,
        Err(err) => {
            warn!("{err}; the map will be empty");
            Arc::new([])
        }
    }
}

/// Identifies one load started through a [`LoadGuard`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord)]
pub struct LoadTicket(u64);

/// Discards loads that finish after a newer load was started.
///
/// Every load takes a ticket when it starts; its result is accepted only if no other load
/// started since, whatever order the loads complete in.
#[derive(Debug, Default)]
pub struct LoadGuard {
    latest: AtomicU64,
}

impl LoadGuard {
    /// Creates a guard with no load in flight.
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a load; every earlier ticket becomes stale.
    pub fn begin(&self) -> LoadTicket {
        LoadTicket(self.latest.fetch_add(1, Ordering::AcqRel) + 1)
    }

    /// Returns `true` if `ticket` belongs to the most recently started load.
    pub fn is_current(&self, ticket: LoadTicket) -> bool {
        self.latest.load(Ordering::Acquire) == ticket.0
    }

    /// Takes a ticket now and resolves to the output of `load` only if it is still current
    /// when `load` completes.
    pub fn run<F: Future>(&self, load: F) -> impl Future<Output = Option<F::Output>> {
        let ticket = self.begin();
        async move {
            let out = load.await;
            if self.is_current(ticket) {
                Some(out)
            } else {
                warn!("ignoring stale load {}", ticket.0);
                None
            }
        }
    }
}
