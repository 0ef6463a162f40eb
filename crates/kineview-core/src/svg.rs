//! Vector rendition of a draw list, used by the embedded animation sink.

use crate::render::{DrawList, Shape};
use std::fmt::Write;

fn css(c: [f32; 3]) -> String {
    let [r, g, b] = c.map(|v| (v.clamp(0.0, 1.0) * 255.0).round() as u8);
    format!("rgb({r},{g},{b})")
}

fn escape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Serialize one draw list as a standalone `<svg>` element.
pub fn to_svg(list: &DrawList) -> String {
    let (w, h) = (list.viewport.width, list.viewport.height);
    let mut out = String::new();
    // Writing into a String cannot fail.
    let _ = write!(
        out,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}">"#
    );
    let _ = write!(out, r#"<rect width="{w}" height="{h}" fill="{}"/>"#, css(list.background));
    for prim in list.paint_order() {
        let color = css(prim.color);
        let _ = match prim.shape {
            Shape::Segment { a, b, width } => write!(
                out,
                r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{color}" stroke-width="{width:.2}" stroke-linecap="round"/>"#,
                a.x, a.y, b.x, b.y
            ),
            Shape::Marker { center, radius } => write!(
                out,
                r#"<circle cx="{:.2}" cy="{:.2}" r="{radius:.2}" fill="{color}"/>"#,
                center.x, center.y
            ),
        };
    }
    for text in &list.overlay {
        if text.text.is_empty() {
            continue;
        }
        let _ = write!(
            out,
            r#"<text x="{:.1}" y="{:.1}" fill="{}" font-family="monospace" font-size="12" xml:space="preserve">{}</text>"#,
            text.position.x,
            text.position.y,
            css(text.color),
            escape(&text.text)
        );
    }
    out.push_str("</svg>");
    out
}
