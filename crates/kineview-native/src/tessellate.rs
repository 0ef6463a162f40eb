use glam::Vec2;
use kineview_core::{DrawList, Shape};

const MARKER_SEGMENTS: usize = 16; // triangles per marker fan

#[repr(C)]
#[derive(Copy, Clone, Debug, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Vertex {
    pub pos: [f32; 2],
    pub color: [f32; 4],
}

fn push_triangle(out: &mut Vec<Vertex>, pts: [Vec2; 3], color: [f32; 4]) {
    out.extend(pts.map(|p| Vertex {
        pos: p.to_array(),
        color,
    }));
}

fn push_segment(out: &mut Vec<Vertex>, a: Vec2, b: Vec2, width: f32, color: [f32; 4]) {
    let dir = (b - a).normalize_or_zero();
    let dir = if dir == Vec2::ZERO { Vec2::X } else { dir };
    let half = 0.5 * width.max(1.0);
    let n = dir.perp() * half;
    // Extend the ends by half the width so joints look closed.
    let (a, b) = (a - dir * half, b + dir * half);
    push_triangle(out, [a + n, a - n, b - n], color);
    push_triangle(out, [a + n, b - n, b + n], color);
}

fn push_marker(out: &mut Vec<Vertex>, center: Vec2, radius: f32, color: [f32; 4]) {
    let step = std::f32::consts::TAU / MARKER_SEGMENTS as f32;
    for i in 0..MARKER_SEGMENTS {
        let a0 = step * i as f32;
        let a1 = step * (i + 1) as f32;
        push_triangle(
            out,
            [
                center,
                center + Vec2::new(a0.cos(), a0.sin()) * radius,
                center + Vec2::new(a1.cos(), a1.sin()) * radius,
            ],
            color,
        );
    }
}

/// Triangle list for a draw list, in paint order, positions in pixels.
pub fn tessellate(list: &DrawList, out: &mut Vec<Vertex>) {
    out.clear();
    for prim in list.paint_order() {
        let [r, g, b] = prim.color;
        let color = [r, g, b, 1.0];
        match prim.shape {
            Shape::Segment { a, b, width } => {
                if a.is_finite() && b.is_finite() {
                    push_segment(out, a, b, width, color);
                }
            }
            Shape::Marker { center, radius } => {
                if center.is_finite() {
                    push_marker(out, center, radius, color);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use kineview_core::{Layer, Primitive, Viewport};

    fn list(primitives: Vec<Primitive>) -> DrawList {
        DrawList {
            viewport: Viewport::new(100, 100),
            time: 0.0,
            index: None,
            background: [0.0; 3],
            grid: Vec::new(),
            primitives,
            overlay: Vec::new(),
        }
    }

    #[test]
    fn segment_and_marker_vertex_counts() {
        let prims = vec![
            Primitive {
                layer: Layer::Interconnection,
                label: "arm".into(),
                shape: Shape::Segment {
                    a: Vec2::new(10.0, 10.0),
                    b: Vec2::new(50.0, 10.0),
                    width: 2.0,
                },
                color: [1.0, 0.0, 0.0],
                depth: 1.0,
            },
            Primitive {
                layer: Layer::Point,
                label: "hand".into(),
                shape: Shape::Marker {
                    center: Vec2::new(50.0, 10.0),
                    radius: 4.0,
                },
                color: [0.0, 1.0, 0.0],
                depth: 1.0,
            },
        ];
        let mut out = Vec::new();
        tessellate(&list(prims), &mut out);
        assert_eq!(out.len(), 6 + 3 * MARKER_SEGMENTS);
        assert_eq!(out[0].color, [1.0, 0.0, 0.0, 1.0]);
        assert_eq!(out[6].color, [0.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn degenerate_segment_still_covers_pixels() {
        let prims = vec![Primitive {
            layer: Layer::FrameAxis,
            label: "pelvis".into(),
            shape: Shape::Segment {
                a: Vec2::splat(20.0),
                b: Vec2::splat(20.0),
                width: 3.0,
            },
            color: [1.0; 3],
            depth: 0.0,
        }];
        let mut out = Vec::new();
        tessellate(&list(prims), &mut out);
        assert_eq!(out.len(), 6);
        assert!(out.iter().all(|v| v.pos[0].is_finite() && v.pos[1].is_finite()));
    }
}
