// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Data shaping for dashboard charts.
//!
//! Everything here is a pure function of its inputs and is recomputed from scratch on every
//! change:
//! - [`join`] and [`JoinKeys`] keep only rows whose key appears in every dataset,
//! - [`group_reduce`] partitions rows by key and applies [`Reducer`]s,
//! - [`top_n`] ranks keys by a summed metric (ties keep first-seen order) and
//!   [`fold_others`] folds the rest into an [`OTHERS`] bucket,
//! - [`pivot`] and [`stack`] prepare stacked series,
//! - [`mean_yoy_growth`] averages consecutive-year growth.
//!
//! None of these functions fail: empty input gives empty output and reductions over nothing
//! give `0.0`.

#![no_std]

extern crate alloc;

mod aggregate;
mod growth;
mod join;
mod pivot;
mod rank;
mod stack;

pub use aggregate::{AggregateOp, AggregatedRow, Metric, Reducer, group_reduce};
pub use growth::mean_yoy_growth;
pub use join::{JoinKeys, join};
pub use pivot::{Pivot, pivot};
pub use rank::{Bucket, OTHERS, fold_others, top_n, top_n_by};
pub use stack::{StackOrder, StackedSeries, stack};
