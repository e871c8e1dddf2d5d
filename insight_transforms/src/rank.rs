// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Top-N ranking and the "Others" bucket.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

use crate::{Reducer, group_reduce};

/// Label of the synthetic bucket that absorbs every non-selected key.
pub const OTHERS: &str = "Others";

/// Returns the `n` keys with the largest summed metric.
///
/// Ties keep the order in which keys were first seen, so repeated calls on identical input
/// give identical output, and a smaller `n` gives a prefix of a larger one.
pub fn top_n<T, K>(
    rows: &[T],
    key: impl Fn(&T) -> K,
    metric: impl Fn(&T) -> f64,
    n: usize,
) -> Vec<K>
where
    K: Eq + Hash + Clone,
{
    top_n_by(rows, key, Reducer::Sum(&metric), n)
}

/// Returns the `n` keys with the largest value of `reducer`.
///
/// Use this to rank by something other than a sum, e.g. genres by mean earnings.
pub fn top_n_by<T, K>(
    rows: &[T],
    key: impl Fn(&T) -> K,
    reducer: Reducer<'_, T>,
    n: usize,
) -> Vec<K>
where
    K: Eq + Hash + Clone,
{
    let mut ranked = group_reduce(rows, key, core::slice::from_ref(&reducer));
    ranked.sort_by(|a, b| b.value(0).total_cmp(&a.value(0)));
    ranked.truncate(n);
    ranked.into_iter().map(|row| row.key).collect()
}

/// A named key or the synthetic "Others" bucket.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum Bucket<K> {
    /// A selected key.
    Named(K),
    /// Everything that was not selected.
    Others,
}

impl<K: AsRef<str>> Bucket<K> {
    /// Display label of the bucket.
    pub fn label(&self) -> &str {
        match self {
            Self::Named(k) => k.as_ref(),
            Self::Others => OTHERS,
        }
    }
}

/// Sums `metric` per selected key and folds every other row into [`Bucket::Others`].
///
/// Output follows `selection` order (selected keys without rows get `0.0`), followed by the
/// `Others` bucket when at least one row falls outside the selection. The values always add
/// up to the sum of `metric` over all rows. Empty input gives empty output.
pub fn fold_others<T, K>(
    rows: &[T],
    key: impl Fn(&T) -> K,
    metric: impl Fn(&T) -> f64,
    selection: &[K],
) -> Vec<(Bucket<K>, f64)>
where
    K: Eq + Hash + Clone,
{
    if rows.is_empty() {
        return Vec::new();
    }
    let slots: HashMap<&K, usize> = selection.iter().enumerate().map(|(i, k)| (k, i)).collect();
    let mut named = alloc::vec![0.0; selection.len()];
    let mut others: Option<f64> = None;
    for row in rows {
        let slot = slots.get(&key(row)).copied();
        let v = metric(row);
        let v = if v.is_finite() { v } else { 0.0 };
        match slot {
            Some(i) => named[i] += v,
            None => *others.get_or_insert(0.0) += v,
        }
    }
    selection
        .iter()
        .cloned()
        .map(Bucket::Named)
        .zip(named)
        .chain(others.map(|v| (Bucket::Others, v)))
        .collect()
}
