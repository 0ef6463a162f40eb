//! Software rasterization of a draw list, for still-image and video sinks.
//!
//! Segments and markers get one pixel of coverage-based antialiasing. Overlay
//! text is not rasterized (no font is bundled); the SVG and HTML sinks keep it.

use crate::render::{DrawList, Shape};
use glam::Vec2;
use image::{Rgba, RgbaImage};

#[inline]
fn channel(c: f32) -> u8 {
    (c.clamp(0.0, 1.0) * 255.0).round() as u8
}

#[inline]
fn rgba(c: [f32; 3]) -> Rgba<u8> {
    Rgba([channel(c[0]), channel(c[1]), channel(c[2]), 255])
}

fn blend(img: &mut RgbaImage, x: u32, y: u32, color: [f32; 3], coverage: f32) {
    if coverage <= 0.0 {
        return;
    }
    let a = coverage.min(1.0);
    let px = img.get_pixel_mut(x, y);
    for (dst, src) in px.0.iter_mut().take(3).zip(color) {
        let mixed = *dst as f32 / 255.0 * (1.0 - a) + src.clamp(0.0, 1.0) * a;
        *dst = channel(mixed);
    }
}

/// Pixel range covering `[lo, hi]`, clamped to the image.
fn span(lo: f32, hi: f32, limit: u32) -> Option<(u32, u32)> {
    if !(lo.is_finite() && hi.is_finite()) || hi < 0.0 || lo >= limit as f32 {
        return None;
    }
    let start = lo.max(0.0).floor() as u32;
    let end = (hi.ceil() as u32).min(limit.saturating_sub(1));
    (start <= end).then_some((start, end))
}

fn distance_to_segment(p: Vec2, a: Vec2, b: Vec2) -> f32 {
    let ab = b - a;
    let len2 = ab.length_squared();
    if len2 <= f32::EPSILON {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len2).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

fn draw_segment(img: &mut RgbaImage, a: Vec2, b: Vec2, width: f32, color: [f32; 3]) {
    let half = (0.5 * width).max(0.5);
    let pad = half + 1.0;
    let Some((x0, x1)) = span(a.x.min(b.x) - pad, a.x.max(b.x) + pad, img.width()) else {
        return;
    };
    let Some((y0, y1)) = span(a.y.min(b.y) - pad, a.y.max(b.y) + pad, img.height()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let coverage = half + 0.5 - distance_to_segment(p, a, b);
            blend(img, x, y, color, coverage);
        }
    }
}

fn draw_marker(img: &mut RgbaImage, center: Vec2, radius: f32, color: [f32; 3]) {
    let pad = radius + 1.0;
    let Some((x0, x1)) = span(center.x - pad, center.x + pad, img.width()) else {
        return;
    };
    let Some((y0, y1)) = span(center.y - pad, center.y + pad, img.height()) else {
        return;
    };
    for y in y0..=y1 {
        for x in x0..=x1 {
            let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
            let coverage = radius + 0.5 - p.distance(center);
            blend(img, x, y, color, coverage);
        }
    }
}

/// Paint a draw list into a new RGBA image of its viewport size.
pub fn rasterize(list: &DrawList) -> RgbaImage {
    let width = list.viewport.width.max(1);
    let height = list.viewport.height.max(1);
    let mut img = RgbaImage::from_pixel(width, height, rgba(list.background));
    for prim in list.paint_order() {
        match prim.shape {
            Shape::Segment { a, b, width } => draw_segment(&mut img, a, b, width, prim.color),
            Shape::Marker { center, radius } => draw_marker(&mut img, center, radius, prim.color),
        }
    }
    img
}
