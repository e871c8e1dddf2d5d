// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dashboard configuration.
//!
//! Every field has a default, so a TOML file only needs the values it changes:
//!
//! ```toml
//! data_dir = "data"
//!
//! [files]
//! viewership = "twitch_viewership.csv"
//!
//! [filters.games]
//! default = 7
//! ```

use std::path::{Path, PathBuf};

use insight_core::DEFAULT_DURATION_MS;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::filter::TopNControl;
use crate::loader::DatasetKind;

/// Everything the dashboard reads at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    /// Directory the data files are resolved against.
    pub data_dir: PathBuf,
    /// Data file names.
    pub files: DataFiles,
    /// Chart container defaults.
    pub chart: ChartConfig,
    /// Top-N control ranges.
    pub filters: FilterConfig,
    /// File that persists the active section; in memory when unset.
    pub session_file: Option<PathBuf>,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_dir: PathBuf::from("data"),
            files: DataFiles::default(),
            chart: ChartConfig::default(),
            filters: FilterConfig::default(),
            session_file: None,
        }
    }
}

/// File names of the datasets, relative to [`DashboardConfig::data_dir`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DataFiles {
    /// Viewership CSV.
    pub viewership: String,
    /// General esports CSV.
    pub general_esports: String,
    /// Historical earnings CSV.
    pub historical_earnings: String,
    /// Global revenue CSV.
    pub global_revenue: String,
    /// Revenue by market CSV.
    pub revenue_by_market: String,
    /// Revenue change CSV.
    pub revenue_change: String,
    /// World boundaries GeoJSON.
    pub world_regions: String,
}

impl Default for DataFiles {
    fn default() -> Self {
        Self {
            viewership: "viewership.csv".into(),
            general_esports: "general_esports.csv".into(),
            historical_earnings: "historical_earnings.csv".into(),
            global_revenue: "global_revenue.csv".into(),
            revenue_by_market: "revenue_by_market.csv".into(),
            revenue_change: "revenue_change.csv".into(),
            world_regions: "world.geojson".into(),
        }
    }
}

/// Chart container defaults.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChartConfig {
    /// Container width.
    pub width: f64,
    /// Container height.
    pub height: f64,
    /// Enter, update and exit duration in milliseconds.
    pub transition_ms: f64,
}

impl Default for ChartConfig {
    fn default() -> Self {
        Self {
            width: 800.0,
            height: 500.0,
            transition_ms: DEFAULT_DURATION_MS,
        }
    }
}

/// Initial value and bounds of one top-N control.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct TopNRange {
    /// Initial value.
    pub default: usize,
    /// Smallest selectable value.
    pub min: usize,
    /// Largest selectable value.
    pub max: usize,
}

impl TopNRange {
    /// Builds the control this range describes.
    pub fn control(self) -> TopNControl {
        TopNControl::new(self.default, self.min, self.max)
    }
}

/// Top-N control ranges.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FilterConfig {
    /// Game count on the viewership page.
    pub games: TopNRange,
    /// Genre count on the prize pool page.
    pub genres: TopNRange,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            games: TopNRange {
                default: 5,
                min: 3,
                max: 10,
            },
            genres: TopNRange {
                default: 5,
                min: 3,
                max: 12,
            },
        }
    }
}

impl DashboardConfig {
    /// Parses a TOML document.
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(text)?)
    }

    /// Reads a TOML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    /// Sets the data directory.
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Persists the active section in `path`.
    pub fn with_session_file(mut self, path: impl Into<PathBuf>) -> Self {
        self.session_file = Some(path.into());
        self
    }

    /// Sets the default chart container size.
    pub fn with_chart_size(mut self, width: f64, height: f64) -> Self {
        self.chart.width = width;
        self.chart.height = height;
        self
    }

    /// Sets the transition duration.
    pub fn with_transition_ms(mut self, ms: f64) -> Self {
        self.chart.transition_ms = ms;
        self
    }

    /// Path of the CSV file holding `kind`.
    pub fn path_of(&self, kind: DatasetKind) -> PathBuf {
        let name = match kind {
            DatasetKind::Viewership => &self.files.viewership,
            DatasetKind::GeneralEsports => &self.files.general_esports,
            DatasetKind::HistoricalEarnings => &self.files.historical_earnings,
            DatasetKind::GlobalRevenue => &self.files.global_revenue,
            DatasetKind::RevenueByMarket => &self.files.revenue_by_market,
            DatasetKind::RevenueChange => &self.files.revenue_change,
        };
        self.data_dir.join(name)
    }

    /// Path of the world boundaries.
    pub fn regions_path(&self) -> PathBuf {
        self.data_dir.join(&self.files.world_regions)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_documents_give_the_defaults() {
        let config = DashboardConfig::from_toml_str("").expect("empty TOML");
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.chart.transition_ms, 750.0);
        assert_eq!(config.filters.games.control().value(), 5);
        assert_eq!(config.filters.genres.control().range(), 3..=12);
    }

    #[test]
    fn partial_documents_override_only_their_fields() {
        let config = DashboardConfig::from_toml_str(
            r#"
            data_dir = "/srv/esports"
            session_file = "session.json"

            [files]
            viewership = "twitch.csv"

            [filters.games]
            default = 7
            min = 3
            max = 10
            "#,
        )
        .expect("valid TOML");
        assert_eq!(
            config.path_of(DatasetKind::Viewership),
            PathBuf::from("/srv/esports/twitch.csv")
        );
        assert_eq!(
            config.path_of(DatasetKind::RevenueChange),
            PathBuf::from("/srv/esports/revenue_change.csv")
        );
        assert_eq!(config.filters.games.default, 7);
        assert_eq!(config.filters.genres, FilterConfig::default().genres);
        assert_eq!(config.session_file, Some(PathBuf::from("session.json")));
    }

    #[test]
    fn files_are_read_from_disk() {
        let dir = tempfile::tempdir().expect("temp dir");
        let path = dir.path().join("dashboard.toml");
        std::fs::write(&path, "[chart]\nwidth = 1024.0\n").expect("write config");
        let config = DashboardConfig::load(&path).expect("valid file");
        assert_eq!(config.chart.width, 1024.0);
        assert_eq!(config.chart.height, 500.0);

        let missing = DashboardConfig::load(dir.path().join("missing.toml"));
        assert!(matches!(missing, Err(ConfigError::Io { .. })));
        assert!(matches!(
            DashboardConfig::from_toml_str("data_dir = 3"),
            Err(ConfigError::Toml(_))
        ));
    }

    #[test]
    fn builders_override_fields() {
        let config = DashboardConfig::default()
            .with_data_dir("fixtures")
            .with_chart_size(640.0, 480.0)
            .with_transition_ms(0.0);
        assert_eq!(config.regions_path(), PathBuf::from("fixtures/world.geojson"));
        assert_eq!((config.chart.width, config.chart.height), (640.0, 480.0));
        assert_eq!(config.chart.transition_ms, 0.0);
    }
}
