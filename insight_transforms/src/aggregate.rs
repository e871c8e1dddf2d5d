// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Grouped reductions.

use alloc::vec::Vec;
use core::fmt;
use core::hash::Hash;

use hashbrown::HashMap;
use smallvec::SmallVec;

/// Aggregation operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregateOp {
    /// Count rows.
    Count,
    /// Sum values (skips non-finite).
    Sum,
    /// Minimum value (skips non-finite).
    Min,
    /// Maximum value (skips non-finite).
    Max,
    /// Mean value (skips non-finite).
    Mean,
    /// Sum of one metric divided by the sum of another.
    RatioOfSums,
}

/// Metric extraction for a reducer.
pub type Metric<'a, T> = &'a dyn Fn(&T) -> f64;

/// A reduction applied to each partition of [`group_reduce`].
///
/// Reductions over an empty set of finite values give `0.0`.
pub enum Reducer<'a, T> {
    /// Number of rows in the partition.
    Count,
    /// Sum of the metric.
    Sum(Metric<'a, T>),
    /// Arithmetic mean of the metric.
    Mean(Metric<'a, T>),
    /// Minimum of the metric.
    Min(Metric<'a, T>),
    /// Maximum of the metric.
    Max(Metric<'a, T>),
    /// `sum(numerator) / sum(denominator)`, or `0.0` when the denominator sums to zero.
    ///
    /// This is the per-unit average of pooled totals, not the mean of per-row ratios.
    RatioOfSums(Metric<'a, T>, Metric<'a, T>),
}

impl<T> fmt::Debug for Reducer<'_, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Reducer").field(&self.op()).finish()
    }
}

impl<T> Reducer<'_, T> {
    /// The operation this reducer performs.
    pub fn op(&self) -> AggregateOp {
        match self {
            Self::Count => AggregateOp::Count,
            Self::Sum(_) => AggregateOp::Sum,
            Self::Mean(_) => AggregateOp::Mean,
            Self::Min(_) => AggregateOp::Min,
            Self::Max(_) => AggregateOp::Max,
            Self::RatioOfSums(..) => AggregateOp::RatioOfSums,
        }
    }

    #[allow(clippy::cast_precision_loss, reason = "row counts are far below 2^52")]
    fn reduce(&self, rows: &[&T]) -> f64 {
        match self {
            Self::Count => rows.len() as f64,
            Self::Sum(metric) => finite_values(rows, *metric).sum(),
            Self::Mean(metric) => {
                let (sum, n) =
                    finite_values(rows, *metric).fold((0.0, 0_usize), |(s, n), v| (s + v, n + 1));
                if n == 0 { 0.0 } else { sum / n as f64 }
            }
            Self::Min(metric) => finite_values(rows, *metric).reduce(f64::min).unwrap_or(0.0),
            Self::Max(metric) => finite_values(rows, *metric).reduce(f64::max).unwrap_or(0.0),
            Self::RatioOfSums(numerator, denominator) => {
                let den: f64 = finite_values(rows, *denominator).sum();
                if den == 0.0 {
                    0.0
                } else {
                    finite_values(rows, *numerator).sum::<f64>() / den
                }
            }
        }
    }
}

fn finite_values<'r, T>(
    rows: &'r [&'r T],
    metric: &'r dyn Fn(&T) -> f64,
) -> impl Iterator<Item = f64> + 'r {
    rows.iter().map(move |row| metric(row)).filter(|v| v.is_finite())
}

/// One summary row per distinct key.
#[derive(Clone, Debug, PartialEq)]
pub struct AggregatedRow<K> {
    /// Group key.
    pub key: K,
    /// Number of input rows in the group.
    pub count: usize,
    /// One value per reducer, in reducer order.
    pub values: SmallVec<[f64; 4]>,
}

impl<K> AggregatedRow<K> {
    /// Value of the `i`th reducer, or `0.0` if out of range.
    pub fn value(&self, i: usize) -> f64 {
        self.values.get(i).copied().unwrap_or(0.0)
    }
}

/// Partitions `rows` by `key` and applies every reducer to each partition.
///
/// Groups appear in the order their key is first seen. Only keys present in the input are
/// emitted, so empty input gives empty output.
pub fn group_reduce<T, K>(
    rows: &[T],
    key: impl Fn(&T) -> K,
    reducers: &[Reducer<'_, T>],
) -> Vec<AggregatedRow<K>>
where
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut groups: Vec<(K, Vec<&T>)> = Vec::new();
    for row in rows {
        let k = key(row);
        match index.get(&k) {
            Some(&i) => groups[i].1.push(row),
            None => {
                index.insert(k.clone(), groups.len());
                groups.push((k, alloc::vec![row]));
            }
        }
    }
    groups
        .into_iter()
        .map(|(key, members)| AggregatedRow {
            values: reducers.iter().map(|r| r.reduce(&members)).collect(),
            count: members.len(),
            key,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    struct Tournament {
        genre: &'static str,
        earnings: f64,
        tournaments: f64,
    }

    fn t(genre: &'static str, earnings: f64, tournaments: f64) -> Tournament {
        Tournament {
            genre,
            earnings,
            tournaments,
        }
    }

    #[test]
    fn prize_pool_average_pools_totals() {
        let rows = [t("MOBA", 1000.0, 2.0), t("MOBA", 500.0, 1.0)];
        let out = group_reduce(
            &rows,
            |r| r.genre,
            &[Reducer::RatioOfSums(&|r| r.earnings, &|r| r.tournaments)],
        );
        assert_eq!(out.len(), 1);
        assert_eq!(out[0].value(0), 500.0, "(1000+500)/(2+1), not mean of ratios");
    }

    #[test]
    fn one_row_per_key_in_first_seen_order() {
        let rows = [
            t("Shooter", 10.0, 1.0),
            t("MOBA", 20.0, 2.0),
            t("Shooter", 30.0, 3.0),
        ];
        let out = group_reduce(
            &rows,
            |r| r.genre,
            &[
                Reducer::Count,
                Reducer::Sum(&|r| r.earnings),
                Reducer::Mean(&|r| r.earnings),
                Reducer::Min(&|r| r.tournaments),
                Reducer::Max(&|r| r.tournaments),
            ],
        );
        let keys: std::vec::Vec<_> = out.iter().map(|r| r.key).collect();
        assert_eq!(keys, ["Shooter", "MOBA"]);
        assert_eq!(out[0].values.as_slice(), &[2.0, 40.0, 20.0, 1.0, 3.0]);
        assert_eq!(out[0].count, 2);
        assert_eq!(out[1].values.as_slice(), &[1.0, 20.0, 20.0, 2.0, 2.0]);
    }

    #[test]
    fn zero_denominators_and_nan_give_zero() {
        let rows = [t("Card", 100.0, 0.0), t("Fighting", f64::NAN, 4.0)];
        let out = group_reduce(
            &rows,
            |r| r.genre,
            &[
                Reducer::RatioOfSums(&|r| r.earnings, &|r| r.tournaments),
                Reducer::Mean(&|r| r.earnings),
                Reducer::Min(&|r| r.earnings),
            ],
        );
        assert_eq!(out[0].value(0), 0.0, "no tournaments");
        assert_eq!(out[1].value(1), 0.0, "no finite earnings");
        assert_eq!(out[1].value(2), 0.0, "min over nothing");
        assert!(out.iter().all(|r| r.values.iter().all(|v| v.is_finite())));
    }

    #[test]
    fn empty_input_gives_empty_output() {
        let rows: [Tournament; 0] = [];
        let out = group_reduce(&rows, |r| r.genre, &[Reducer::Count]);
        assert!(out.is_empty());
    }

    #[test]
    fn rerunning_is_bitwise_identical() {
        let rows = [
            t("MOBA", 0.1, 1.0),
            t("MOBA", 0.2, 1.0),
            t("Shooter", 0.3, 1.0),
        ];
        let reducers = [Reducer::Mean(&|r: &Tournament| r.earnings)];
        let a = group_reduce(&rows, |r| r.genre, &reducers);
        let b = group_reduce(&rows, |r| r.genre, &reducers);
        assert_eq!(a.len(), b.len());
        for (x, y) in a.iter().zip(&b) {
            assert_eq!(x.key, y.key);
            assert_eq!(x.value(0).to_bits(), y.value(0).to_bits());
        }
    }
}
