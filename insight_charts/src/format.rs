// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Number and label formatting for ticks, tooltips and legends.

use alloc::format;
use alloc::string::String;

#[cfg(not(feature = "std"))]
use crate::float::FloatExt;

/// Maximum characters for axis category labels.
pub const AXIS_LABEL_CHARS: usize = 25;
/// Maximum characters for legend labels.
pub const LEGEND_LABEL_CHARS: usize = 20;

#[allow(
    clippy::cast_possible_truncation,
    reason = "display values are far below i64::MAX"
)]
fn rounded_integer(v: f64) -> i64 {
    if v.is_finite() { v.round() as i64 } else { 0 }
}

fn group_digits(digits: &str) -> String {
    let len = digits.len();
    let mut out = String::with_capacity(len + len / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// Rounds to an integer and inserts thousands separators (`1234567.4` → `"1,234,567"`).
pub fn format_grouped(v: f64) -> String {
    let n = rounded_integer(v);
    let digits = format!("{}", n.unsigned_abs());
    if n < 0 {
        format!("-{}", group_digits(&digits))
    } else {
        group_digits(&digits)
    }
}

/// Dollar amount with grouping and no fractional digits (`"$1,234"`).
pub fn format_currency(v: f64) -> String {
    let n = rounded_integer(v);
    let digits = group_digits(&format!("{}", n.unsigned_abs()));
    if n < 0 {
        format!("-${digits}")
    } else {
        format!("${digits}")
    }
}

/// Fixed-point value with `decimals` fractional digits; negative zero prints as zero.
pub fn format_fixed(v: f64, decimals: usize) -> String {
    if !v.is_finite() {
        return format!("{:.*}", decimals, 0.0);
    }
    let s = format!("{v:.decimals$}");
    if s.starts_with('-') && s[1..].chars().all(|c| c == '0' || c == '.') {
        String::from(&s[1..])
    } else {
        s
    }
}

/// Percentage with one fractional digit (`5.3` → `"5.3%"`).
pub fn format_percent(v: f64) -> String {
    format!("{}%", format_fixed(v, 1))
}

/// Integer year (`2019.0` → `"2019"`).
pub fn format_year(v: f64) -> String {
    format!("{}", rounded_integer(v))
}

/// Millions with grouping and an `M` suffix; zero prints as `"0.0"`.
pub fn format_millions(v: f64) -> String {
    if v == 0.0 {
        return String::from("0.0");
    }
    format!("{}M", format_grouped(v / 1e6))
}

const SI_PREFIXES: [&str; 11] = ["n", "µ", "m", "", "k", "M", "G", "T", "P", "E", "Z"];

/// Two significant digits with an SI prefix (`1234567` → `"1.2M"`, `500000` → `"500k"`).
#[allow(
    clippy::cast_possible_truncation,
    reason = "decimal exponents of finite f64 fit in i32"
)]
#[allow(clippy::cast_sign_loss, reason = "indices are clamped to be non-negative")]
pub fn format_si(v: f64) -> String {
    const SIG: i32 = 2;
    if v == 0.0 || !v.is_finite() {
        return String::from("0.0");
    }
    let mut exp = v.abs().log10().floor() as i32;
    // Rounding to two digits can carry into the next power (999_500 → 1.0M).
    let unit = 10_f64.powf(f64::from(exp - SIG + 1));
    let rounded = (v.abs() / unit).round() * unit;
    if rounded > 0.0 {
        exp = rounded.log10().floor() as i32;
    }
    let group = exp.div_euclid(3).clamp(-3, 7);
    let scaled = v / 10_f64.powf(f64::from(group * 3));
    let decimals = (SIG - 1 - (exp - group * 3)).max(0) as usize;
    let prefix = SI_PREFIXES[(group + 3) as usize];
    format!("{}{prefix}", format_fixed(scaled, decimals))
}

/// Truncates `name` to at most `max` characters, ending in `"..."` when shortened.
pub fn truncate_label(name: &str, max: usize) -> String {
    if name.chars().count() <= max {
        return String::from(name);
    }
    let keep = max.saturating_sub(3);
    let mut out: String = name.chars().take(keep).collect();
    out.push_str("...");
    out
}
