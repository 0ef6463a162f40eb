//! Scene to draw-list renderer.
//!
//! Each call samples the scene at the cursor time, maps every vertex through
//! the axis convention and the camera, and returns a flat [`DrawList`] that a
//! front-end (or an export sink) paints in order:
//!
//! 1. background fill,
//! 2. grid lines (always underneath),
//! 3. `primitives`, already sorted back to front,
//! 4. overlay text.
//!
//! Occlusion uses the painter's algorithm rather than a depth buffer: each
//! primitive is sorted by its average view depth, ties keep insertion order
//! (interconnections, then points, then frame axes). Long segments crossing
//! other geometry can be mis-ordered; for sparse marker scenes this is an
//! accepted approximation.

use crate::camera::{Projected, Viewport};
use crate::constants::{FRAME_AXIS_COLORS, GRID_LINE_WIDTH};
use crate::overlay::overlay_lines;
use crate::scene::{expand_polyline, SceneModel};
use crate::state::PlayerState;
use crate::timeline::{sample, sample_index};
use fnv::FnvHashMap;
use glam::{Mat4, Vec2, Vec3};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Layer {
    Grid,
    Interconnection,
    Point,
    FrameAxis,
}

#[derive(Clone, Debug, PartialEq)]
pub enum Shape {
    Segment { a: Vec2, b: Vec2, width: f32 },
    Marker { center: Vec2, radius: f32 },
}

#[derive(Clone, Debug, PartialEq)]
pub struct Primitive {
    pub layer: Layer,
    /// Track or interconnection name the primitive comes from.
    pub label: String,
    pub shape: Shape,
    pub color: [f32; 3],
    pub depth: f32,
}

#[derive(Clone, Debug, PartialEq)]
pub struct OverlayText {
    pub text: String,
    /// Baseline start in pixels.
    pub position: Vec2,
    pub color: [f32; 3],
}

#[derive(Clone, Debug, PartialEq)]
pub struct DrawList {
    pub viewport: Viewport,
    pub time: f64,
    pub index: Option<usize>,
    pub background: [f32; 3],
    pub grid: Vec<Primitive>,
    pub primitives: Vec<Primitive>,
    pub overlay: Vec<OverlayText>,
}

impl DrawList {
    /// Grid then sorted primitives, in paint order.
    pub fn paint_order(&self) -> impl Iterator<Item = &Primitive> {
        self.grid.iter().chain(self.primitives.iter())
    }

    pub fn labels(&self, layer: Layer) -> impl Iterator<Item = &str> {
        self.primitives
            .iter()
            .filter(move |p| p.layer == layer)
            .map(|p| p.label.as_str())
    }

    pub fn has_point(&self, name: &str) -> bool {
        self.labels(Layer::Point).any(|l| l == name)
    }

    pub fn has_frame(&self, name: &str) -> bool {
        self.labels(Layer::FrameAxis).any(|l| l == name)
    }
}

/// Shared per-frame projection context.
struct Projector<'a> {
    state: &'a PlayerState,
    view: Mat4,
    proj: Mat4,
    viewport: Viewport,
}

impl<'a> Projector<'a> {
    fn new(state: &'a PlayerState, viewport: Viewport) -> Self {
        Self {
            state,
            view: state.camera.view_matrix(),
            proj: state.camera.projection_matrix(viewport.aspect()),
            viewport,
        }
    }

    fn point(&self, data: Vec3) -> Option<Projected> {
        let display = self.state.convention.to_display(data);
        self.state
            .camera
            .project_with(&self.view, &self.proj, display, self.viewport)
    }

    fn segment_display(&self, a: Vec3, b: Vec3) -> Option<(Projected, Projected)> {
        self.state
            .camera
            .project_segment(&self.view, &self.proj, a, b, self.viewport)
    }

    fn segment(&self, a: Vec3, b: Vec3) -> Option<(Projected, Projected)> {
        let c = &self.state.convention;
        self.segment_display(c.to_display(a), c.to_display(b))
    }
}

fn segment(layer: Layer, label: &str, ends: (Projected, Projected), width: f32, color: [f32; 3]) -> Primitive {
    let (a, b) = ends;
    Primitive {
        layer,
        label: label.to_string(),
        shape: Shape::Segment {
            a: a.screen,
            b: b.screen,
            width,
        },
        color,
        depth: 0.5 * (a.depth + b.depth),
    }
}

fn grid_lines(p: &Projector<'_>) -> Vec<Primitive> {
    let style = &p.state.style;
    let pitch = style.grid_size();
    if pitch <= 0.0 {
        return Vec::new();
    }
    let n = style.grid_divisions();
    let half = 0.5 * pitch * n as f32;
    let origin = p.state.convention.to_display(style.grid_origin());
    let color = style.grid_color();
    let mut lines = Vec::with_capacity(2 * (n as usize + 1));
    for i in 0..=n {
        let offset = -half + pitch * i as f32;
        let along_z = (
            origin + Vec3::new(offset, 0.0, -half),
            origin + Vec3::new(offset, 0.0, half),
        );
        let along_x = (
            origin + Vec3::new(-half, 0.0, offset),
            origin + Vec3::new(half, 0.0, offset),
        );
        for (a, b) in [along_z, along_x] {
            if let Some(ends) = p.segment_display(a, b) {
                lines.push(segment(Layer::Grid, "grid", ends, GRID_LINE_WIDTH, color));
            }
        }
    }
    lines
}

/// Render the scene at the cursor's current time.
///
/// Never fails: missing samples, tracks that are not points or transforms,
/// unresolved interconnections and geometry behind the eye are all omitted
/// from the returned list.
pub fn render(scene: &SceneModel, state: &PlayerState, viewport: Viewport) -> DrawList {
    let time = state.cursor.current_time();
    let style = &state.style;
    let p = Projector::new(state, viewport);

    let mut present: FnvHashMap<&str, (Vec3, Projected)> = FnvHashMap::default();
    for (name, track) in scene.points() {
        if let Some(pos) = sample(track, time) {
            if let Some(projected) = p.point(pos) {
                present.insert(name.as_str(), (pos, projected));
            }
        }
    }

    let mut primitives = Vec::new();

    let width = style.interconnection_width();
    if width > 0.0 {
        let available: Vec<&str> = scene.points().keys().map(String::as_str).collect();
        for (ic_name, ic) in scene.interconnections() {
            for polyline in &ic.links {
                let expanded = expand_polyline(polyline, &available);
                if expanded.is_empty() {
                    log::trace!("[render] {ic_name}: polyline {polyline:?} matches no point");
                }
                for line in &expanded {
                    for pair in line.windows(2) {
                        let (Some((a, _)), Some((b, _))) =
                            (present.get(pair[0].as_str()), present.get(pair[1].as_str()))
                        else {
                            continue;
                        };
                        if let Some(ends) = p.segment(*a, *b) {
                            primitives.push(segment(Layer::Interconnection, ic_name, ends, width, ic.color));
                        }
                    }
                }
            }
        }
    }

    let radius = style.point_size();
    if radius > 0.0 {
        for name in scene.points().keys() {
            if let Some((_, projected)) = present.get(name.as_str()) {
                primitives.push(Primitive {
                    layer: Layer::Point,
                    label: name.clone(),
                    shape: Shape::Marker {
                        center: projected.screen,
                        radius,
                    },
                    color: style.default_point_color(),
                    depth: projected.depth,
                });
            }
        }
    }

    let (size, frame_width) = (style.frame_size(), style.frame_width());
    if size > 0.0 && frame_width > 0.0 {
        for (name, track) in scene.frames() {
            let Some(m) = sample(track, time) else {
                continue;
            };
            let origin = m.transform_point3(Vec3::ZERO);
            for (axis, color) in [Vec3::X, Vec3::Y, Vec3::Z].into_iter().zip(FRAME_AXIS_COLORS) {
                let tip = m.transform_point3(axis * size);
                if let Some(ends) = p.segment(origin, tip) {
                    primitives.push(segment(Layer::FrameAxis, name, ends, frame_width, color));
                }
            }
        }
    }

    // Stable: equal depths keep insertion order.
    primitives.sort_by(|a, b| b.depth.total_cmp(&a.depth));

    let index = sample_index(scene.reference_times(), time);
    DrawList {
        viewport,
        time,
        index,
        background: style.background_color(),
        grid: grid_lines(&p),
        primitives,
        overlay: overlay_lines(state, index),
    }
}
