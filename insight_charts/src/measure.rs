// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Text measurement used to size tooltip boxes.

/// Measures unshaped text.
pub trait TextMeasurer {
    /// Returns `(width, height)` of `text` set at `font_size`, in scene units.
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64);
}

/// Approximates every glyph as 0.6em wide and every line as 1em tall.
///
/// Good enough for tooltips of short labels without a font stack.
#[derive(Clone, Copy, Debug, Default)]
pub struct HeuristicTextMeasurer;

impl TextMeasurer for HeuristicTextMeasurer {
    #[allow(clippy::cast_precision_loss, reason = "label lengths are small")]
    fn measure(&self, text: &str, font_size: f64) -> (f64, f64) {
        (0.6 * font_size * text.chars().count() as f64, font_size)
    }
}
