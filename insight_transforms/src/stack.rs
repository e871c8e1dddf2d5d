// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Zero-baseline stacking of pivoted series.

use alloc::vec::Vec;

use crate::Pivot;

/// Order in which series are laid on top of each other.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StackOrder {
    /// The first series is at the bottom.
    #[default]
    Input,
    /// The last series is at the bottom.
    Reverse,
}

/// One stacked series: its band at every x.
#[derive(Clone, Debug, PartialEq)]
pub struct StackedSeries<S> {
    /// Series key.
    pub key: S,
    /// Raw values per x.
    pub values: Vec<f64>,
    /// Band start per x.
    pub lower: Vec<f64>,
    /// Band end per x.
    pub upper: Vec<f64>,
}

/// Stacks the series of `pivot` around a zero baseline.
///
/// Positive values stack upwards from 0 and negative values stack downwards from 0. The
/// result keeps the pivot's series order; `order` only decides which series sits closest to
/// the baseline.
pub fn stack<X, S: Clone>(pivot: &Pivot<X, S>, order: StackOrder) -> Vec<StackedSeries<S>> {
    let width = pivot.xs.len();
    let mut out: Vec<StackedSeries<S>> = pivot
        .series
        .iter()
        .zip(&pivot.values)
        .map(|(key, values)| StackedSeries {
            key: key.clone(),
            values: values.clone(),
            lower: alloc::vec![0.0; width],
            upper: alloc::vec![0.0; width],
        })
        .collect();

    let mut positions: Vec<usize> = (0..out.len()).collect();
    if order == StackOrder::Reverse {
        positions.reverse();
    }

    for x in 0..width {
        let (mut pos, mut neg) = (0.0, 0.0);
        for &s in &positions {
            let series = &mut out[s];
            let v = series.values.get(x).copied().unwrap_or(0.0);
            if v >= 0.0 {
                series.lower[x] = pos;
                pos += v;
                series.upper[x] = pos;
            } else {
                series.lower[x] = neg;
                neg += v;
                series.upper[x] = neg;
            }
        }
    }
    out
}
