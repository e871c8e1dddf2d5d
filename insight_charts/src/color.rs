// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Palettes, stable category colors and continuous color scales.

use alloc::string::String;
use alloc::vec::Vec;

use hashbrown::HashMap;
use insight_core::MarkId;
use insight_transforms::OTHERS;
use peniko::Color;

/// Converts a `0xRRGGBB` literal into an opaque color.
pub fn rgb(hex: u32) -> Color {
    let [_, r, g, b] = hex.to_be_bytes();
    Color::from_rgb8(r, g, b)
}

/// Dark theme colors shared by every chart.
pub mod theme {
    /// Page/plot background.
    pub const BACKGROUND: u32 = 0x0c10_1a;
    /// Text and labels.
    pub const TEXT: u32 = 0xffff_ff;
    /// Axis lines, ticks and reference lines.
    pub const AXIS: u32 = 0x9999_99;
    /// Outlines around bubbles and regions.
    pub const OUTLINE: u32 = 0x3333_33;
    /// Tooltip box fill.
    pub const TOOLTIP: u32 = 0x3333_33;
    /// Fill for categories or regions without data.
    pub const NEUTRAL: u32 = 0xcccc_cc;
    /// Fill for the synthetic "Others" bucket.
    pub const OTHERS: u32 = 0xd9d9_d9;
    /// Stroke used to highlight a hovered region.
    pub const HIGHLIGHT: u32 = 0xff00_00;
}

/// Twelve-color palette used for genres.
pub const GENRE_PALETTE: [u32; 12] = [
    0x3182bd, 0x6baed6, 0x9ecae1, 0xc6dbef, 0xe6550d, 0xfd8d3c, 0xfdae6b, 0xfdd0a2, 0x31a354,
    0x74c476, 0xa1d99b, 0xc7e9c0,
];

/// Six-color palette used for revenue markets.
pub const MARKET_PALETTE: [u32; 6] = [0x4e79a7, 0xf28e2b, 0xe15759, 0x76b7b2, 0x59a14f, 0xedc948];

/// Ten-color palette used for games without a fixed color.
pub const GAME_PALETTE: [u32; 10] = [
    0x8dd3c7, 0xffffb3, 0xbebada, 0xfb8072, 0x80b1d3, 0xfdb462, 0xb3de69, 0xfccde5, 0xbc80bd,
    0xffed6f,
];

/// Fixed colors for well-known games.
pub const GAME_COLORS: [(&str, u32); 12] = [
    ("Sports", 0x8dd3c7),
    ("VALORANT", 0xffffb3),
    ("Grand Theft Auto V", 0xbebada),
    ("Minecraft", 0xfb8072),
    ("Dota 2", 0x80b1d3),
    ("Counter-Strike: Global Offensive", 0xfdb462),
    ("Fortnite", 0xb3de69),
    ("Call of Duty: Warzone", 0xfccde5),
    ("Just Chatting", 0xfccde5),
    ("World of Warcraft", 0xbc80bd),
    ("Special Events", 0xbc80bd),
    ("League of Legends", 0xffed6f),
];

/// Two-series palette (hours watched, earnings).
pub const SERIES_PALETTE: [u32; 2] = [0x1f77b4, 0xff7f0e];

/// Sequential green-blue ramp.
pub const GNBU: [u32; 9] = [
    0xf7fcf0, 0xe0f3db, 0xccebc5, 0xa8ddb5, 0x7bccc4, 0x4eb3d3, 0x2b8cbe, 0x0868ac, 0x084081,
];

/// Diverging red-yellow-green ramp.
pub const RDYLGN: [u32; 11] = [
    0xa50026, 0xd73027, 0xf46d43, 0xfdae61, 0xfee08b, 0xffffbf, 0xd9ef8b, 0xa6d96a, 0x66bd63,
    0x1a9850, 0x006837,
];

const CATEGORY_SPACE: u64 = MarkId::space("category-color");

/// A category-to-color mapping keyed by category name.
///
/// Colors never depend on the position of a category in the currently displayed subset:
/// fixed entries win, then names assigned through [`CategoryColors::with_domain`], then a
/// palette slot chosen by hashing the name.
#[derive(Clone, Debug)]
pub struct CategoryColors {
    assigned: HashMap<String, Color>,
    palette: Vec<Color>,
    fallback: Color,
}

impl CategoryColors {
    /// Creates a mapping over `palette` with the neutral fallback color.
    pub fn new(palette: &[u32]) -> Self {
        Self {
            assigned: HashMap::new(),
            palette: palette.iter().copied().map(rgb).collect(),
            fallback: rgb(theme::NEUTRAL),
        }
    }

    /// Game colors: well-known games are pinned, the rest hash into the game palette and
    /// "Others" is light grey.
    pub fn games() -> Self {
        Self::new(&GAME_PALETTE)
            .with_fixed(&GAME_COLORS)
            .with_fixed(&[(OTHERS, theme::OTHERS)])
    }

    /// Genre colors assigned over the full genre set.
    pub fn genres<S: AsRef<str>>(all_genres: impl IntoIterator<Item = S>) -> Self {
        Self::new(&GENRE_PALETTE).with_domain(all_genres)
    }

    /// Market colors assigned over the full market set.
    pub fn markets<S: AsRef<str>>(all_markets: impl IntoIterator<Item = S>) -> Self {
        Self::new(&MARKET_PALETTE).with_domain(all_markets)
    }

    /// Pins fixed colors for specific names.
    pub fn with_fixed(mut self, fixed: &[(&str, u32)]) -> Self {
        for (name, hex) in fixed {
            self.assigned.insert(String::from(*name), rgb(*hex));
        }
        self
    }

    /// Assigns palette slots to `names` in order, skipping names that already have a color.
    ///
    /// Pass the full category set (not a top-N subset) so colors stay put when the subset
    /// changes.
    pub fn with_domain<S: AsRef<str>>(mut self, names: impl IntoIterator<Item = S>) -> Self {
        if self.palette.is_empty() {
            return self;
        }
        let mut slot = 0;
        for name in names {
            let name = name.as_ref();
            if self.assigned.contains_key(name) {
                continue;
            }
            let color = self.palette[slot % self.palette.len()];
            self.assigned.insert(String::from(name), color);
            slot += 1;
        }
        self
    }

    /// Sets the color used when there is no palette.
    pub fn with_fallback(mut self, hex: u32) -> Self {
        self.fallback = rgb(hex);
        self
    }

    /// Color for `name`.
    #[allow(
        clippy::cast_possible_truncation,
        reason = "modulo by the palette length fits in usize"
    )]
    pub fn color(&self, name: &str) -> Color {
        if let Some(color) = self.assigned.get(name) {
            return *color;
        }
        if self.palette.is_empty() {
            return self.fallback;
        }
        let h = MarkId::for_key(CATEGORY_SPACE, name).0;
        self.palette[(h % self.palette.len() as u64) as usize]
    }
}

#[allow(
    clippy::cast_possible_truncation,
    reason = "ramp positions are clamped and ramps are short"
)]
#[allow(clippy::cast_precision_loss, reason = "ramps are short")]
fn ramp(stops: &[u32], t: f64) -> Color {
    match stops.len() {
        0 => rgb(theme::NEUTRAL),
        1 => rgb(stops[0]),
        n => {
            let t = if t.is_finite() { t.clamp(0.0, 1.0) } else { 0.5 };
            if t >= 1.0 {
                return rgb(stops[n - 1]);
            }
            let scaled = t * (n - 1) as f64;
            let i = (scaled as usize).min(n - 2);
            let f = (scaled - i as f64) as f32;
            let (a, b) = (rgb(stops[i]), rgb(stops[i + 1]));
            let mut out = [0.0_f32; 4];
            for (k, c) in out.iter_mut().enumerate() {
                *c = a.components[k] + (b.components[k] - a.components[k]) * f;
            }
            Color::new(out)
        }
    }
}

/// A sequential color scale over `[min, max]`.
#[derive(Clone, Copy, Debug)]
pub struct SequentialColor {
    domain: (f64, f64),
    stops: &'static [u32],
}

impl SequentialColor {
    /// Creates a sequential scale over `domain` using ramp `stops`.
    pub fn new(domain: (f64, f64), stops: &'static [u32]) -> Self {
        Self { domain, stops }
    }

    /// Ramp position of `v` in `[0, 1]`; a degenerate domain maps to the middle.
    pub fn position(&self, v: f64) -> f64 {
        let (d0, d1) = self.domain;
        let denom = d1 - d0;
        if denom == 0.0 || !denom.is_finite() {
            return 0.5;
        }
        ((v - d0) / denom).clamp(0.0, 1.0)
    }

    /// Color for `v`.
    pub fn map(&self, v: f64) -> Color {
        ramp(self.stops, self.position(v))
    }
}

/// A diverging color scale over `[low, mid, high]`.
#[derive(Clone, Copy, Debug)]
pub struct DivergingColor {
    domain: (f64, f64, f64),
    stops: &'static [u32],
}

impl DivergingColor {
    /// Creates a diverging scale using ramp `stops`.
    pub fn new(domain: (f64, f64, f64), stops: &'static [u32]) -> Self {
        Self { domain, stops }
    }

    /// Symmetric domain `[-max_abs, 0, max_abs]` around zero.
    pub fn symmetric(max_abs: f64, stops: &'static [u32]) -> Self {
        let m = if max_abs.is_finite() { max_abs.abs() } else { 0.0 };
        Self::new((-m, 0.0, m), stops)
    }

    /// Ramp position of `v`: below `0.5` under the midpoint, above `0.5` over it.
    pub fn position(&self, v: f64) -> f64 {
        let (lo, mid, hi) = self.domain;
        let half = if v < mid {
            let d = mid - lo;
            if d == 0.0 { 0.0 } else { (v - mid) / d }
        } else {
            let d = hi - mid;
            if d == 0.0 { 0.0 } else { (v - mid) / d }
        };
        (0.5 + 0.5 * half).clamp(0.0, 1.0)
    }

    /// Color for `v`.
    pub fn map(&self, v: f64) -> Color {
        ramp(self.stops, self.position(v))
    }
}

/// Black or white, whichever reads better on `fill` (by HSL lightness).
pub fn contrasting_text(fill: Color) -> Color {
    let [r, g, b, _] = fill.components;
    let lightness = (r.max(g).max(b) + r.min(g).min(b)) * 0.5;
    if lightness < 0.5 {
        rgb(0xffffff)
    } else {
        rgb(0x000000)
    }
}
