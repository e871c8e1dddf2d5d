// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Year-over-year growth.

use alloc::collections::BTreeMap;
use alloc::vec::Vec;
use core::hash::Hash;

use hashbrown::HashMap;

/// Mean year-over-year growth of `value` per key, in percent.
///
/// Values are first summed per `(key, year)`. Growth is `(cur - prev) / prev * 100` for each
/// pair of consecutive years with `prev > 0`; the mean is taken over those pairs. Keys with no
/// such pair are omitted. Output follows first-seen key order.
#[allow(clippy::cast_precision_loss, reason = "pair counts are tiny")]
pub fn mean_yoy_growth<T, K>(
    rows: &[T],
    key: impl Fn(&T) -> K,
    year: impl Fn(&T) -> i32,
    value: impl Fn(&T) -> f64,
) -> Vec<(K, f64)>
where
    K: Eq + Hash + Clone,
{
    let mut index: HashMap<K, usize> = HashMap::new();
    let mut series: Vec<(K, BTreeMap<i32, f64>)> = Vec::new();
    for row in rows {
        let v = value(row);
        if !v.is_finite() {
            continue;
        }
        let k = key(row);
        let i = match index.get(&k) {
            Some(&i) => i,
            None => {
                index.insert(k.clone(), series.len());
                series.push((k, BTreeMap::new()));
                series.len() - 1
            }
        };
        *series[i].1.entry(year(row)).or_insert(0.0) += v;
    }

    series
        .into_iter()
        .filter_map(|(k, by_year)| {
            let points: Vec<(i32, f64)> = by_year.into_iter().collect();
            let rates: Vec<f64> = points
                .windows(2)
                .filter(|w| w[1].0 == w[0].0 + 1 && w[0].1 > 0.0)
                .map(|w| (w[1].1 - w[0].1) / w[0].1 * 100.0)
                .collect();
            (!rates.is_empty()).then(|| (k, rates.iter().sum::<f64>() / rates.len() as f64))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn averages_consecutive_years_only() {
        let rows = [
            ("Dota 2", 2018, 100.0),
            ("Dota 2", 2019, 150.0),
            ("Dota 2", 2020, 120.0),
            ("Dota 2", 2022, 1000.0),
        ];
        let out = mean_yoy_growth(&rows, |r| r.0, |r| r.1, |r| r.2);
        assert_eq!(out.len(), 1);
        // +50% then -20%; the 2020 -> 2022 gap is skipped.
        assert!((out[0].1 - 15.0).abs() < 1e-9, "got {}", out[0].1);
    }

    #[test]
    fn zero_previous_year_is_skipped_and_single_years_omitted() {
        let rows = [
            ("New", 2019, 0.0),
            ("New", 2020, 500.0),
            ("Solo", 2021, 10.0),
            ("Flat", 2020, 10.0),
            ("Flat", 2021, 10.0),
        ];
        let out = mean_yoy_growth(&rows, |r| r.0, |r| r.1, |r| r.2);
        assert_eq!(out, [("Flat", 0.0)]);
    }

    #[test]
    fn empty_input_is_empty() {
        let rows: [(&str, i32, f64); 0] = [];
        assert!(mean_yoy_growth(&rows, |r| r.0, |r| r.1, |r| r.2).is_empty());
    }
}
