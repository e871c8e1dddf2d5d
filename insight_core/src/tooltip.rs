// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! A floating tooltip owned by one chart instance.

use alloc::string::String;

use kurbo::{Point, Vec2};
use smallvec::SmallVec;

/// Offset of the tooltip's top-left corner from the pointer.
pub const TOOLTIP_OFFSET: Vec2 = Vec2::new(12.0, 0.0);

/// Floating tooltip state.
///
/// Each chart renderer owns exactly one tooltip; it is created hidden together with the
/// renderer and released with it.
#[derive(Clone, Debug, Default)]
pub struct Tooltip {
    visible: bool,
    pointer: Point,
    lines: SmallVec<[String; 4]>,
}

impl Tooltip {
    /// Creates a hidden tooltip.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shows `lines` next to `pointer`.
    pub fn show(&mut self, pointer: Point, lines: impl IntoIterator<Item = String>) {
        self.lines.clear();
        self.lines.extend(lines);
        self.pointer = pointer;
        self.visible = !self.lines.is_empty();
    }

    /// Follows the pointer without changing content.
    pub fn move_to(&mut self, pointer: Point) {
        self.pointer = pointer;
    }

    /// Hides the tooltip and drops its content.
    pub fn hide(&mut self) {
        self.visible = false;
        self.lines.clear();
    }

    /// Returns `true` while shown.
    pub fn is_visible(&self) -> bool {
        self.visible
    }

    /// Top-left corner of the tooltip box, when visible.
    pub fn position(&self) -> Option<Point> {
        self.visible.then(|| self.pointer + TOOLTIP_OFFSET)
    }

    /// Content lines; the first line names the hovered item.
    pub fn lines(&self) -> &[String] {
        &self.lines
    }
}

#[cfg(test)]
mod tests {
    extern crate std;

    use super::*;
    use alloc::string::ToString;
    use alloc::vec;

    #[test]
    fn tracks_pointer_with_offset() {
        let mut tip = Tooltip::new();
        assert_eq!(tip.position(), None, "hidden by default");
        tip.show(
            Point::new(100.0, 40.0),
            vec!["Dota 2".to_string(), "Peak viewers: 1,234".to_string()],
        );
        assert_eq!(tip.position(), Some(Point::new(112.0, 40.0)));
        tip.move_to(Point::new(120.0, 45.0));
        assert_eq!(tip.position(), Some(Point::new(132.0, 45.0)));
        assert_eq!(tip.lines().len(), 2);
    }

    #[test]
    fn hide_clears_content() {
        let mut tip = Tooltip::new();
        tip.show(Point::ZERO, vec!["NA".to_string()]);
        tip.hide();
        assert!(!tip.is_visible());
        assert!(tip.lines().is_empty());
    }

    #[test]
    fn empty_content_stays_hidden() {
        let mut tip = Tooltip::new();
        tip.show(Point::ZERO, std::vec::Vec::new());
        assert!(!tip.is_visible(), "nothing to show");
    }
}
