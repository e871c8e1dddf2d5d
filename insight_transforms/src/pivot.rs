// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Dense x-by-series grids.

use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// A dense grid of values indexed by series and x.
///
/// `values[s][x]` is the sum of every input value for series `series[s]` at `xs[x]`; cells
/// with no input are `0.0`.
#[derive(Clone, Debug, PartialEq)]
pub struct Pivot<X, S> {
    /// Distinct x values in ascending order.
    pub xs: Vec<X>,
    /// Distinct series keys in first-seen order.
    pub series: Vec<S>,
    /// Values indexed `[series][x]`.
    pub values: Vec<Vec<f64>>,
}

impl<X, S> Default for Pivot<X, S> {
    fn default() -> Self {
        Self {
            xs: Vec::new(),
            series: Vec::new(),
            values: Vec::new(),
        }
    }
}

impl<X, S: PartialEq + Clone> Pivot<X, S> {
    /// Returns `true` when there are no cells.
    pub fn is_empty(&self) -> bool {
        self.xs.is_empty() || self.series.is_empty()
    }

    /// Value for series index `s` at x index `x`, or `0.0` out of range.
    pub fn value(&self, s: usize, x: usize) -> f64 {
        self.values
            .get(s)
            .and_then(|row| row.get(x))
            .copied()
            .unwrap_or(0.0)
    }

    /// Sum over all series at x index `x`.
    pub fn total_at(&self, x: usize) -> f64 {
        self.values.iter().filter_map(|row| row.get(x)).sum()
    }

    /// Reorders series to `order`. Series missing from the grid are added as zeros and
    /// series not named in `order` are dropped.
    pub fn with_series_order(mut self, order: &[S]) -> Self {
        let width = self.xs.len();
        let mut values = Vec::with_capacity(order.len());
        for key in order {
            match self.series.iter().position(|s| s == key) {
                Some(i) => values.push(core::mem::take(&mut self.values[i])),
                None => values.push(alloc::vec![0.0; width]),
            }
        }
        self.series = order.to_vec();
        self.values = values;
        self
    }
}

/// Builds a [`Pivot`] from rows, summing duplicate `(series, x)` cells.
pub fn pivot<T, X, S>(
    rows: &[T],
    x: impl Fn(&T) -> X,
    series: impl Fn(&T) -> S,
    value: impl Fn(&T) -> f64,
) -> Pivot<X, S>
where
    X: Ord + Clone,
    S: Eq + Hash + Clone,
{
    let mut xs: Vec<X> = rows.iter().map(&x).collect();
    xs.sort();
    xs.dedup();

    let mut series_index: HashMap<S, usize> = HashMap::new();
    let mut keys = Vec::new();
    let mut values: Vec<Vec<f64>> = Vec::new();
    for row in rows {
        let s = series(row);
        let si = match series_index.get(&s) {
            Some(&i) => i,
            None => {
                series_index.insert(s.clone(), keys.len());
                keys.push(s);
                values.push(alloc::vec![0.0; xs.len()]);
                keys.len() - 1
            }
        };
        let v = value(row);
        if !v.is_finite() {
            continue;
        }
        if let Ok(xi) = xs.binary_search(&x(row)) {
            values[si][xi] += v;
        }
    }
    Pivot {
        xs,
        series: keys,
        values,
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn sums_duplicates_and_fills_gaps() {
        let rows = [
            (2021, "Mobile", 10.0),
            (2020, "PC", 5.0),
            (2021, "PC", 7.0),
            (2021, "PC", 1.0),
        ];
        let p = pivot(&rows, |r| r.0, |r| r.1, |r| r.2);
        assert_eq!(p.xs, [2020, 2021]);
        assert_eq!(p.series, ["Mobile", "PC"]);
        assert_eq!(p.value(0, 0), 0.0, "Mobile has no 2020 row");
        assert_eq!(p.value(1, 1), 8.0, "duplicates are summed");
        assert_eq!(p.total_at(1), 18.0);
    }

    #[test]
    fn reorder_adds_and_drops_series() {
        let rows = [(1, "a", 1.0), (1, "b", 2.0)];
        let p = pivot(&rows, |r| r.0, |r| r.1, |r| r.2).with_series_order(&["b", "z"]);
        assert_eq!(p.series, ["b", "z"]);
        assert_eq!(p.values, [[2.0], [0.0]]);
    }

    #[test]
    fn empty_rows_give_empty_pivot() {
        let rows: [(i32, &str, f64); 0] = [];
        assert!(pivot(&rows, |r| r.0, |r| r.1, |r| r.2).is_empty());
    }
}
