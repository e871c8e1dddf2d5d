// Copyright 2025 the VizIR Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Minimal SVG dump of a chart snapshot.

use std::fmt::Write as _;

use insight_charts::{TOOLTIP_FONT_SIZE, TOOLTIP_PADDING};
use insight_core::{MarkPayload, Style, TextAnchor, TextBaseline};
use insight_dashboard::ChartSnapshot;
use kurbo::Rect;
use peniko::Color;

const TOOLTIP_LINE_HEIGHT: f64 = 1.4;

/// Writes `snapshot` as a standalone SVG document, tooltip included.
pub(crate) fn snapshot_to_svg(snapshot: &ChartSnapshot) -> String {
    let (width, height) = (snapshot.size.width, snapshot.size.height);
    let mut out = String::new();
    let _ = writeln!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {width} {height}" width="{width}" height="{height}" font-family="sans-serif">"#
    );
    let _ = writeln!(out, "<title>{}</title>", escape_xml(snapshot.name));

    for mark in &snapshot.marks {
        write_payload(&mut out, &mark.payload);
    }
    if let Some((bbox, lines)) = &snapshot.tooltip {
        write_tooltip(&mut out, *bbox, lines);
    }

    out.push_str("</svg>\n");
    out
}

fn write_payload(out: &mut String, payload: &MarkPayload) {
    match payload {
        MarkPayload::Rect { rect, style } => {
            let _ = write!(
                out,
                r#"<rect x="{}" y="{}" width="{}" height="{}""#,
                rect.x0,
                rect.y0,
                rect.width(),
                rect.height(),
            );
            write_style(out, style);
            out.push_str("/>\n");
        }
        MarkPayload::Circle {
            center,
            radius,
            style,
        } => {
            let _ = write!(
                out,
                r#"<circle cx="{}" cy="{}" r="{radius}""#,
                center.x, center.y
            );
            write_style(out, style);
            out.push_str("/>\n");
        }
        MarkPayload::Path { path, style } => {
            let _ = write!(out, r#"<path d="{}""#, path.to_svg());
            write_style(out, style);
            out.push_str("/>\n");
        }
        MarkPayload::Text {
            pos,
            text,
            font_size,
            angle,
            anchor,
            baseline,
            style,
        } => {
            let baseline = match baseline {
                TextBaseline::Top => "hanging",
                TextBaseline::Middle => "middle",
                TextBaseline::Alphabetic => "alphabetic",
                TextBaseline::Bottom => "text-after-edge",
            };
            let anchor = match anchor {
                TextAnchor::Start => "start",
                TextAnchor::Middle => "middle",
                TextAnchor::End => "end",
            };
            let _ = write!(
                out,
                r#"<text x="{}" y="{}" font-size="{font_size}" dominant-baseline="{baseline}" text-anchor="{anchor}""#,
                pos.x, pos.y
            );
            if *angle != 0.0 {
                let _ = write!(out, r#" transform="rotate({angle} {} {})""#, pos.x, pos.y);
            }
            write_style(out, style);
            out.push('>');
            out.push_str(&escape_xml(text));
            out.push_str("</text>\n");
        }
    }
}

fn write_tooltip(out: &mut String, bbox: Rect, lines: &[String]) {
    let _ = writeln!(
        out,
        r##"<rect x="{}" y="{}" width="{}" height="{}" rx="4" fill="#ffffff" fill-opacity="0.95" stroke="#999999" stroke-width="1"/>"##,
        bbox.x0,
        bbox.y0,
        bbox.width(),
        bbox.height(),
    );
    let (pad_x, pad_y) = TOOLTIP_PADDING;
    let line_height = TOOLTIP_FONT_SIZE * TOOLTIP_LINE_HEIGHT;
    for (i, line) in lines.iter().enumerate() {
        let y = bbox.y0 + pad_y + line_height * i as f64;
        let _ = writeln!(
            out,
            r##"<text x="{}" y="{y}" font-size="{TOOLTIP_FONT_SIZE}" dominant-baseline="hanging" fill="#333333">{}</text>"##,
            bbox.x0 + pad_x,
            escape_xml(line)
        );
    }
}

fn write_style(out: &mut String, style: &Style) {
    write_paint_attr(out, "fill", style.fill);
    if let Some(stroke) = style.stroke
        && style.stroke_width > 0.0
    {
        write_paint_attr(out, "stroke", Some(stroke));
        let _ = write!(out, r#" stroke-width="{}""#, style.stroke_width);
        if let Some((dash, gap)) = style.dash {
            let _ = write!(out, r#" stroke-dasharray="{dash} {gap}""#);
        }
    }
    if style.opacity < 1.0 {
        let _ = write!(out, r#" opacity="{}""#, style.opacity.max(0.0));
    }
}

fn svg_paint(color: Color) -> (String, Option<f64>) {
    let rgba = color.to_rgba8();
    let value = format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b);
    let opacity = if rgba.a == 255 {
        None
    } else {
        Some(f64::from(rgba.a) / 255.0)
    };
    (value, opacity)
}

fn write_paint_attr(out: &mut String, name: &str, color: Option<Color>) {
    let Some(color) = color else {
        let _ = write!(out, r#" {name}="none""#);
        return;
    };
    let (value, opacity) = svg_paint(color);
    let _ = write!(out, r#" {name}="{value}""#);
    if let Some(o) = opacity {
        let _ = write!(out, r#" {name}-opacity="{o}""#);
    }
}

fn escape_xml(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    out
}
