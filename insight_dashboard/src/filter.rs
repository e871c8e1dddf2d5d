// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

use std::ops::RangeInclusive;

/// A top-N selector bounded to `min..=max`.
///
/// Values are clamped here, before they reach any aggregation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TopNControl {
    value: usize,
    min: usize,
    max: usize,
}

impl TopNControl {
    /// Creates a control; `value` is clamped into `min..=max` and swapped bounds are
    /// reordered.
    pub fn new(value: usize, min: usize, max: usize) -> Self {
        let (min, max) = if min <= max { (min, max) } else { (max, min) };
        Self {
            value: value.clamp(min, max),
            min,
            max,
        }
    }

    /// Game selector: 3 to 10, default 5.
    pub fn games() -> Self {
        Self::new(5, 3, 10)
    }

    /// Genre selector: 3 to 12, default 5.
    pub fn genres() -> Self {
        Self::new(5, 3, 12)
    }

    /// Current value.
    pub fn value(&self) -> usize {
        self.value
    }

    /// Selectable range.
    pub fn range(&self) -> RangeInclusive<usize> {
        self.min..=self.max
    }

    /// Every selectable value, ascending.
    pub fn options(&self) -> impl Iterator<Item = usize> {
        self.range()
    }

    /// Sets the value, clamped into range. Returns `true` if it changed.
    pub fn set(&mut self, value: usize) -> bool {
        let value = value.clamp(self.min, self.max);
        let changed = value != self.value;
        self.value = value;
        changed
    }

    /// Handles a raw selector value, which may be negative or out of range.
    pub fn on_change(&mut self, raw: i64) -> bool {
        self.set(usize::try_from(raw).unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn presets_match_the_selectors() {
        let games = TopNControl::games();
        assert_eq!(games.value(), 5);
        assert_eq!(games.options().collect::<Vec<_>>(), (3..=10).collect::<Vec<_>>());
        assert_eq!(TopNControl::genres().range(), 3..=12);
    }

    #[test]
    fn out_of_range_values_are_clamped() {
        let mut games = TopNControl::games();
        assert!(games.set(50));
        assert_eq!(games.value(), 10);
        assert!(games.on_change(-4));
        assert_eq!(games.value(), 3);
        assert!(!games.on_change(1), "already at the minimum");
    }

    #[test]
    fn unchanged_values_report_no_change() {
        let mut genres = TopNControl::genres();
        assert!(!genres.set(5));
        assert!(genres.set(8));
        assert_eq!(genres.value(), 8);
    }

    #[test]
    fn constructor_normalizes_bounds() {
        let control = TopNControl::new(1, 10, 3);
        assert_eq!(control.range(), 3..=10);
        assert_eq!(control.value(), 3);
    }
}
