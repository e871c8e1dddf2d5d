// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tiny scale utilities.
//!
//! Every scale is rebuilt from the current data extent on each render. Degenerate domains
//! (`min == max`, e.g. all values zero) collapse to a single output point instead of dividing
//! by zero.

use alloc::vec::Vec;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// A linear mapping from a continuous domain to a continuous range.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleLinear {
    domain: (f64, f64),
    range: (f64, f64),
}

/// Specification for a linear scale (domain + options, no range yet).
#[derive(Clone, Copy, Debug)]
pub struct ScaleLinearSpec {
    /// Domain in data units.
    pub domain: (f64, f64),
    /// Whether to "nice" the domain based on tick generation.
    pub nice: bool,
}

impl ScaleLinear {
    /// Creates a new scale mapping `domain` values to `range` values.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value from domain space into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 || !denom.is_finite() {
            return r0;
        }
        let t = (x - d0) / denom;
        r0 + t * (r1 - r0)
    }

    /// Maps a value from range space back into domain space.
    pub fn invert(&self, y: f64) -> f64 {
        let (d0, d1) = self.domain;
        let (r0, r1) = self.range;
        let denom = r1 - r0;
        if denom == 0.0 {
            return d0;
        }
        d0 + (y - r0) / denom * (d1 - d0)
    }

    /// Returns the minimum of the configured domain (as authored).
    pub fn domain_min(&self) -> f64 {
        self.domain.0
    }

    /// Returns the maximum of the configured domain (as authored).
    pub fn domain_max(&self) -> f64 {
        self.domain.1
    }

    /// Returns the output range.
    pub fn range(&self) -> (f64, f64) {
        self.range
    }

    /// Returns "nice-ish" tick values for the domain.
    pub fn ticks(&self, count: usize) -> Vec<f64> {
        nice_ticks(self.domain.0, self.domain.1, count)
    }
}

impl ScaleLinearSpec {
    /// Creates a new linear scale spec.
    pub fn new(domain: (f64, f64)) -> Self {
        Self {
            domain,
            nice: false,
        }
    }

    /// Enables or disables nice-domain behavior.
    pub fn with_nice(mut self, nice: bool) -> Self {
        self.nice = nice;
        self
    }

    /// Returns the effective domain after applying `nice` (if enabled).
    pub fn resolved_domain(&self, tick_count: usize) -> (f64, f64) {
        if !self.nice {
            return self.domain;
        }
        let ticks = nice_ticks(self.domain.0, self.domain.1, tick_count);
        match (ticks.first(), ticks.last()) {
            (Some(&first), Some(&last)) if ticks.len() >= 2 => (first, last),
            _ => self.domain,
        }
    }

    /// Instantiates a concrete scale for a given output range.
    pub fn instantiate(&self, range: (f64, f64)) -> ScaleLinear {
        ScaleLinear::new(self.domain, range)
    }

    /// Instantiates a concrete scale using the `resolved_domain` (respecting `nice`).
    pub fn instantiate_resolved(&self, range: (f64, f64), tick_count: usize) -> ScaleLinear {
        ScaleLinear::new(self.resolved_domain(tick_count), range)
    }
}

#[allow(clippy::cast_precision_loss, reason = "tick counts are small")]
pub(crate) fn nice_ticks(mut min: f64, mut max: f64, count: usize) -> Vec<f64> {
    if count == 0 || !min.is_finite() || !max.is_finite() {
        return Vec::new();
    }
    if min == max {
        return alloc::vec![min];
    }
    if min > max {
        core::mem::swap(&mut min, &mut max);
    }
    let span = max - min;
    let step0 = span / count.max(1) as f64;
    let step = nice_step(step0);
    if step == 0.0 {
        return alloc::vec![min, max];
    }

    let start = (min / step).floor() * step;
    let stop = (max / step).ceil() * step;

    let n_f = ((stop - start) / step).round();
    let n = if n_f.is_finite() && n_f >= 0.0 {
        let n_f = n_f.min(10_000.0);
        #[allow(
            clippy::cast_possible_truncation,
            reason = "guarded by finite/non-negative checks and capped at 10k"
        )]
        {
            n_f as u64
        }
    } else {
        0
    };
    (0..=n).map(|i| start + step * i as f64).collect()
}

fn nice_step(step: f64) -> f64 {
    if !step.is_finite() || step <= 0.0 {
        return 0.0;
    }
    let power = step.log10().floor();
    let base = 10_f64.powf(power);
    let error = step / base;
    let nice = if error >= 7.5 {
        10.0
    } else if error >= 3.5 {
        5.0
    } else if error >= 1.5 {
        2.0
    } else {
        1.0
    };
    nice * base
}

/// A square-root mapping, used for bubble radii so that area tracks value.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleSqrt {
    domain: (f64, f64),
    range: (f64, f64),
}

impl ScaleSqrt {
    /// Creates a new square-root scale. Negative inputs are treated as zero.
    pub fn new(domain: (f64, f64), range: (f64, f64)) -> Self {
        Self { domain, range }
    }

    /// Maps a value into range space.
    pub fn map(&self, x: f64) -> f64 {
        let (d0, d1) = (self.domain.0.max(0.0).sqrt(), self.domain.1.max(0.0).sqrt());
        let (r0, r1) = self.range;
        let denom = d1 - d0;
        if denom == 0.0 || !denom.is_finite() {
            return r0;
        }
        let t = (x.max(0.0).sqrt() - d0) / denom;
        r0 + t * (r1 - r0)
    }
}

/// A discrete band scale for categorical charts.
///
/// Padding is expressed in band widths.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScaleBand {
    range: (f64, f64),
    count: usize,
    padding_inner: f64,
    padding_outer: f64,
}

impl ScaleBand {
    /// Creates a new band scale covering `count` bands over `range`.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding_inner: 0.1,
            padding_outer: 0.1,
        }
    }

    /// Sets inner and outer padding in band units.
    pub fn with_padding(mut self, inner: f64, outer: f64) -> Self {
        self.padding_inner = inner.max(0.0);
        self.padding_outer = outer.max(0.0);
        self
    }

    /// Returns the computed band width.
    #[allow(clippy::cast_precision_loss, reason = "band counts are small")]
    pub fn band_width(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        if n <= 0.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = n + self.padding_inner * (n - 1.0) + 2.0 * self.padding_outer;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the number of bands.
    pub fn count(&self) -> usize {
        self.count
    }

    /// Returns the start position for a band at `index`.
    #[allow(clippy::cast_precision_loss, reason = "band indices are small")]
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        let bw = self.band_width();
        let step = bw * (1.0 + self.padding_inner);
        let start = if r1 >= r0 { r0 } else { r1 };
        start + bw * self.padding_outer + step * index as f64
    }

    /// Returns the center position for a band at `index`.
    pub fn center(&self, index: usize) -> f64 {
        self.x(index) + self.band_width() * 0.5
    }
}

/// A discrete point scale (like band without width).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScalePoint {
    range: (f64, f64),
    count: usize,
    padding: f64,
}

impl ScalePoint {
    /// Creates a new point scale.
    pub fn new(range: (f64, f64), count: usize) -> Self {
        Self {
            range,
            count,
            padding: 0.5,
        }
    }

    /// Sets the outer padding in point steps.
    pub fn with_padding(mut self, padding: f64) -> Self {
        self.padding = padding.max(0.0);
        self
    }

    #[allow(clippy::cast_precision_loss, reason = "point counts are small")]
    fn step(&self) -> f64 {
        let (r0, r1) = self.range;
        let n = self.count as f64;
        if n <= 1.0 {
            return 0.0;
        }
        let span = (r1 - r0).abs();
        let denom = (n - 1.0) + 2.0 * self.padding;
        if denom == 0.0 { 0.0 } else { span / denom }
    }

    /// Returns the position for a point at `index`.
    ///
    /// A single point sits in the middle of the range.
    #[allow(clippy::cast_precision_loss, reason = "point indices are small")]
    pub fn x(&self, index: usize) -> f64 {
        let (r0, r1) = self.range;
        if self.count <= 1 {
            return (r0 + r1) * 0.5;
        }
        let step = self.step();
        let start = if r1 >= r0 { r0 } else { r1 };
        start + self.padding * step + step * index as f64
    }

    /// Index of the point nearest to `pos`, if any.
    pub fn nearest(&self, pos: f64) -> Option<usize> {
        (0..self.count).min_by(|&a, &b| {
            (self.x(a) - pos)
                .abs()
                .total_cmp(&(self.x(b) - pos).abs())
        })
    }
}

/// Infers a `(min, max)` domain over finite values.
///
/// Returns `None` if no finite values are present.
pub fn infer_domain(values: impl IntoIterator<Item = f64>) -> Option<(f64, f64)> {
    let mut min = f64::INFINITY;
    let mut max = f64::NEG_INFINITY;
    for v in values {
        if !v.is_finite() {
            continue;
        }
        min = min.min(v);
        max = max.max(v);
    }
    (min.is_finite() && max.is_finite()).then_some((min, max))
}

/// Domain `[0, max]` over finite values, `[0, 0]` for empty input.
pub fn zero_based_domain(values: impl IntoIterator<Item = f64>) -> (f64, f64) {
    let max = infer_domain(values).map_or(0.0, |(_, max)| max);
    (0.0, max.max(0.0))
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;

    #[test]
    fn degenerate_domain_collapses_to_a_point() {
        let s = ScaleLinear::new((0.0, 0.0), (360.0, 20.0));
        assert_eq!(s.map(0.0), 360.0);
        assert_eq!(s.map(42.0), 360.0);
        let spec = ScaleLinearSpec::new((0.0, 0.0)).with_nice(true);
        assert_eq!(spec.resolved_domain(10), (0.0, 0.0));
        let r = ScaleSqrt::new((0.0, 0.0), (0.0, 15.0));
        assert_eq!(r.map(5.0), 0.0);
    }

    #[test]
    fn nice_domain_extends_to_round_ticks() {
        let spec = ScaleLinearSpec::new((0.0, 9_432_000.0)).with_nice(true);
        assert_eq!(spec.resolved_domain(10), (0.0, 10_000_000.0));
        let s = spec.instantiate_resolved((400.0, 0.0), 10);
        assert_eq!(s.map(5_000_000.0), 200.0);
        assert_eq!(s.invert(200.0), 5_000_000.0);
    }

    #[test]
    fn sqrt_scale_maps_area_linearly() {
        let r = ScaleSqrt::new((0.0, 400.0), (0.0, 20.0));
        assert_eq!(r.map(100.0), 10.0);
        assert_eq!(r.map(-5.0), 0.0, "negative treated as zero");
    }

    #[test]
    fn band_positions_are_monotonic_and_fit_range() {
        let b = ScaleBand::new((0.0, 100.0), 4).with_padding(0.2, 0.2);
        assert!(b.x(0) > 0.0);
        assert!(b.x(1) > b.x(0));
        assert!(b.x(3) + b.band_width() <= 100.0 + 1e-9);
        assert_eq!(ScaleBand::new((0.0, 100.0), 0).band_width(), 0.0);
    }

    #[test]
    fn point_scale_nearest() {
        let p = ScalePoint::new((0.0, 100.0), 3).with_padding(0.0);
        assert_eq!(p.x(0), 0.0);
        assert_eq!(p.x(2), 100.0);
        assert_eq!(p.nearest(60.0), Some(1));
        assert_eq!(p.nearest(90.0), Some(2));
        assert_eq!(ScalePoint::new((0.0, 100.0), 0).nearest(5.0), None);
        assert_eq!(ScalePoint::new((0.0, 100.0), 1).x(0), 50.0);
    }

    #[test]
    fn domain_inference_skips_non_finite() {
        assert_eq!(infer_domain([3.0, f64::NAN, -1.0]), Some((-1.0, 3.0)));
        assert_eq!(infer_domain([]), None);
        assert_eq!(zero_based_domain([]), (0.0, 0.0));
        assert_eq!(zero_based_domain([5.0, 2.0]), (0.0, 5.0));
    }
}
