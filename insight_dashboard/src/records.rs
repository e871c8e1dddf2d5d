// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! One row type per dataset, with lenient cell coercion.
//!
//! Numeric cells accept grouping commas, a leading `$` and a trailing `%`; blank cells read as
//! zero. Year cells accept `2019`, `2019.0`, ISO dates and `M/D/YYYY` dates.

use chrono::{Datelike, NaiveDate, NaiveDateTime};
use serde::{Deserialize, Deserializer};

use crate::error::CoerceError;

/// Parses a numeric cell.
pub fn parse_number(raw: &str) -> Result<f64, CoerceError> {
    let cleaned: String = raw
        .trim()
        .trim_end_matches('%')
        .chars()
        .filter(|c| !matches!(c, ',' | '$' | ' '))
        .collect();
    if cleaned.is_empty() {
        return Ok(0.0);
    }
    match cleaned.parse::<f64>() {
        Ok(v) if v.is_finite() => Ok(v),
        _ => Err(CoerceError::Number(raw.to_owned())),
    }
}

/// Parses a year cell, reducing dates to their year.
pub fn parse_year(raw: &str) -> Result<i32, CoerceError> {
    let s = raw.trim();
    if let Ok(year) = s.parse::<i32>() {
        return Ok(year);
    }
    if let Ok(v) = s.parse::<f64>()
        && v.fract() == 0.0
        && v.abs() <= f64::from(i32::MAX)
    {
        #[allow(clippy::cast_possible_truncation, reason = "integral and range checked")]
        return Ok(v as i32);
    }
    for format in ["%Y-%m-%d", "%m/%d/%Y", "%Y/%m/%d"] {
        if let Ok(date) = NaiveDate::parse_from_str(s, format) {
            return Ok(date.year());
        }
    }
    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(at) = NaiveDateTime::parse_from_str(s, format) {
            return Ok(at.year());
        }
    }
    Err(CoerceError::Year(raw.to_owned()))
}

fn number<'de, D: Deserializer<'de>>(d: D) -> Result<f64, D::Error> {
    let raw = String::deserialize(d)?;
    parse_number(&raw).map_err(serde::de::Error::custom)
}

fn year<'de, D: Deserializer<'de>>(d: D) -> Result<i32, D::Error> {
    let raw = String::deserialize(d)?;
    parse_year(&raw).map_err(serde::de::Error::custom)
}

/// Whether a revenue figure was observed or projected.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
pub enum RevenueKind {
    /// Reported revenue.
    #[default]
    Actual,
    /// Projected revenue.
    Forecast,
}

impl RevenueKind {
    /// Parses `Actual` or `Forecast` in any case; blank reads as `Actual`.
    pub fn parse(raw: &str) -> Result<Self, CoerceError> {
        let s = raw.trim();
        if s.is_empty() || s.eq_ignore_ascii_case("actual") {
            Ok(Self::Actual)
        } else if s.eq_ignore_ascii_case("forecast") {
            Ok(Self::Forecast)
        } else {
            Err(CoerceError::Kind(raw.to_owned()))
        }
    }
}

fn kind<'de, D: Deserializer<'de>>(d: D) -> Result<RevenueKind, D::Error> {
    let raw = String::deserialize(d)?;
    RevenueKind::parse(&raw).map_err(serde::de::Error::custom)
}

/// Twitch viewership of one game in one year.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ViewershipRow {
    /// Year.
    #[serde(rename = "Year", deserialize_with = "year")]
    pub year: i32,
    /// Game.
    #[serde(rename = "Game")]
    pub game: String,
    /// Peak concurrent viewers.
    #[serde(rename = "Peak_viewers", deserialize_with = "number")]
    pub peak_viewers: f64,
    /// Hours streamed.
    #[serde(rename = "Hours_streamed", deserialize_with = "number")]
    pub hours_streamed: f64,
    /// Hours watched.
    #[serde(rename = "Hours_watched", deserialize_with = "number")]
    pub hours_watched: f64,
    /// Average concurrent viewers.
    #[serde(rename = "Avg_viewers", deserialize_with = "number")]
    pub avg_viewers: f64,
}

/// All-time tournament totals of one game.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GeneralEsportsRow {
    /// Game.
    #[serde(rename = "Game")]
    pub game: String,
    /// Genre.
    #[serde(rename = "Genre")]
    pub genre: String,
    /// Prize money awarded.
    #[serde(rename = "Total_Earnings", deserialize_with = "number")]
    pub total_earnings: f64,
    /// Tournaments held.
    #[serde(rename = "Total_Tournaments", deserialize_with = "number")]
    pub total_tournaments: f64,
}

/// Prize money of one game over one period.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct HistoricalEarningsRow {
    /// Year of the period.
    #[serde(rename = "Date", deserialize_with = "year")]
    pub year: i32,
    /// Game.
    #[serde(rename = "Game")]
    pub game: String,
    /// Prize money awarded.
    #[serde(rename = "Earnings", deserialize_with = "number")]
    pub earnings: f64,
}

/// Esports revenue of one country in one year.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct GlobalRevenueRow {
    /// Country; matched against region names on the map.
    #[serde(rename = "Country")]
    pub country: String,
    /// Year.
    #[serde(rename = "Year", deserialize_with = "year")]
    pub year: i32,
    /// Revenue in dollars.
    #[serde(rename = "Revenue_USD", deserialize_with = "number")]
    pub revenue_usd: f64,
}

/// Revenue of one market in one year.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RevenueByMarketRow {
    /// Market.
    #[serde(rename = "Market")]
    pub market: String,
    /// Year.
    #[serde(rename = "Year", deserialize_with = "year")]
    pub year: i32,
    /// Revenue in dollars.
    #[serde(rename = "Revenue", deserialize_with = "number")]
    pub revenue: f64,
    /// Actual or forecast.
    #[serde(rename = "Actual/Forecast", default, deserialize_with = "kind")]
    pub kind: RevenueKind,
}

/// Year-over-year revenue change of one market.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct RevenueChangeRow {
    /// Market.
    #[serde(rename = "Market")]
    pub market: String,
    /// Year.
    #[serde(rename = "Year", deserialize_with = "year")]
    pub year: i32,
    /// Change in percent.
    #[serde(rename = "Percentage_Change", deserialize_with = "number")]
    pub percentage_change: f64,
}
