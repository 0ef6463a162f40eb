//! Orbit camera around a display-space target.

use crate::constants::{
    BASE_FOV_RADIANS, CAMERA_DISTANCE, ELEVATION_LIMIT, MAX_FOV_RADIANS, ORTHO_HALF_HEIGHT,
    ZOOM_MIN, Z_FAR, Z_NEAR,
};
use crate::error::PlayerError;
use glam::{Mat4, Vec2, Vec3, Vec4};
use std::f32::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::str::FromStr;

/// Drawing surface size in pixels.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Viewport {
    pub width: u32,
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    pub fn aspect(&self) -> f32 {
        self.width.max(1) as f32 / self.height.max(1) as f32
    }
}

/// Screen position in pixels (origin top-left, y down) and view depth.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Projected {
    pub screen: Vec2,
    /// Distance in front of the eye along the view direction; larger is farther.
    pub depth: f32,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ViewPreset {
    Front,
    Back,
    Left,
    Right,
    Top,
    Bottom,
}

impl ViewPreset {
    pub const ALL: [ViewPreset; 6] = [
        ViewPreset::Front,
        ViewPreset::Back,
        ViewPreset::Left,
        ViewPreset::Right,
        ViewPreset::Top,
        ViewPreset::Bottom,
    ];

    /// `(azimuth, elevation)` in radians.
    pub fn angles(self) -> (f32, f32) {
        match self {
            ViewPreset::Front => (0.0, 0.0),
            ViewPreset::Back => (PI, 0.0),
            ViewPreset::Left => (-FRAC_PI_2, 0.0),
            ViewPreset::Right => (FRAC_PI_2, 0.0),
            ViewPreset::Top => (0.0, ELEVATION_LIMIT),
            ViewPreset::Bottom => (0.0, -ELEVATION_LIMIT),
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            ViewPreset::Front => "front",
            ViewPreset::Back => "back",
            ViewPreset::Left => "left",
            ViewPreset::Right => "right",
            ViewPreset::Top => "top",
            ViewPreset::Bottom => "bottom",
        }
    }
}

impl fmt::Display for ViewPreset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ViewPreset {
    type Err = PlayerError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        ViewPreset::ALL
            .into_iter()
            .find(|p| p.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| PlayerError::invalid("view", format!("unknown view preset {s:?}")))
    }
}

/// Camera orbiting `target` (display space).
///
/// At azimuth 0 and elevation 0 the eye sits on +z and sees the anterior
/// face; positive azimuth swings the eye toward -x, the subject's right.
#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    azimuth: f32,
    elevation: f32,
    target: Vec3,
    zoom: f32,
    perspective: bool,
}

impl Default for Camera {
    fn default() -> Self {
        Self {
            azimuth: 0.0,
            elevation: 0.0,
            target: Vec3::ZERO,
            zoom: 1.0,
            perspective: true,
        }
    }
}

impl Camera {
    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn elevation(&self) -> f32 {
        self.elevation
    }

    pub fn target(&self) -> Vec3 {
        self.target
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn perspective(&self) -> bool {
        self.perspective
    }

    pub fn set_azimuth(&mut self, azimuth: f32) -> Result<(), PlayerError> {
        if !azimuth.is_finite() {
            return Err(PlayerError::invalid("azimuth", format!("{azimuth} is not finite")));
        }
        self.azimuth = azimuth;
        Ok(())
    }

    /// Store `elevation` clamped strictly inside (-pi/2, pi/2).
    pub fn set_elevation(&mut self, elevation: f32) -> Result<(), PlayerError> {
        if elevation.is_nan() {
            return Err(PlayerError::invalid("elevation", "NaN"));
        }
        self.elevation = elevation.clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
        Ok(())
    }

    pub fn set_target(&mut self, target: Vec3) -> Result<(), PlayerError> {
        if !target.is_finite() {
            return Err(PlayerError::invalid("target", format!("{target} is not finite")));
        }
        self.target = target;
        Ok(())
    }

    /// Store `zoom`, raising anything below `ZOOM_MIN` (including zero and
    /// negatives) to it.
    pub fn set_zoom(&mut self, zoom: f32) -> Result<(), PlayerError> {
        if zoom.is_nan() || zoom == f32::INFINITY {
            return Err(PlayerError::invalid("zoom", format!("{zoom} is not finite")));
        }
        self.zoom = zoom.max(ZOOM_MIN);
        Ok(())
    }

    pub fn set_perspective(&mut self, perspective: bool) {
        self.perspective = perspective;
    }

    pub fn set_view(&mut self, preset: ViewPreset) {
        let (azimuth, elevation) = preset.angles();
        self.azimuth = azimuth;
        self.elevation = elevation;
    }

    pub(crate) fn rotate(&mut self, d_azimuth: f32, d_elevation: f32) {
        self.azimuth += d_azimuth;
        self.elevation = (self.elevation + d_elevation).clamp(-ELEVATION_LIMIT, ELEVATION_LIMIT);
    }

    pub(crate) fn scale_zoom(&mut self, factor: f32) {
        if factor.is_finite() && factor > 0.0 {
            self.zoom = (self.zoom * factor).clamp(ZOOM_MIN, 1.0 / ZOOM_MIN);
        }
    }

    /// Unit vector from the target toward the eye.
    pub fn eye_direction(&self) -> Vec3 {
        let (sa, ca) = self.azimuth.sin_cos();
        let (se, ce) = self.elevation.sin_cos();
        Vec3::new(-sa * ce, se, ca * ce)
    }

    pub fn eye(&self) -> Vec3 {
        self.target + self.eye_direction() * CAMERA_DISTANCE
    }

    /// Screen-right and screen-up directions in display space.
    pub fn basis(&self) -> (Vec3, Vec3) {
        let back = self.eye_direction();
        let right = Vec3::Y.cross(back).normalize();
        let up = back.cross(right);
        (right, up)
    }

    pub fn view_matrix(&self) -> Mat4 {
        Mat4::look_at_rh(self.eye(), self.target, Vec3::Y)
    }

    pub fn fov_radians(&self) -> f32 {
        (BASE_FOV_RADIANS / self.zoom).min(MAX_FOV_RADIANS)
    }

    pub fn projection_matrix(&self, aspect: f32) -> Mat4 {
        if self.perspective {
            Mat4::perspective_rh(self.fov_radians(), aspect, Z_NEAR, Z_FAR)
        } else {
            let h = ORTHO_HALF_HEIGHT / self.zoom;
            let w = h * aspect;
            Mat4::orthographic_rh(-w, w, -h, h, Z_NEAR, Z_FAR)
        }
    }

    /// Project a display-space point to the viewport. `None` when the point is
    /// at or behind the eye plane of a perspective camera.
    pub fn project(&self, p: Vec3, viewport: Viewport) -> Option<Projected> {
        let view = self.view_matrix();
        let proj = self.projection_matrix(viewport.aspect());
        self.project_with(&view, &proj, p, viewport)
    }

    /// Same as [`Camera::project`] with precomputed matrices, for per-frame loops.
    pub fn project_with(&self, view: &Mat4, proj: &Mat4, p: Vec3, viewport: Viewport) -> Option<Projected> {
        self.project_view(proj, view.transform_point3(p), viewport)
    }

    /// Project a point already expressed in view space (eye at the origin,
    /// looking down -z).
    pub fn project_view(&self, proj: &Mat4, in_view: Vec3, viewport: Viewport) -> Option<Projected> {
        let depth = -in_view.z;
        if self.perspective && depth < Z_NEAR {
            return None;
        }
        let clip = *proj * Vec4::new(in_view.x, in_view.y, in_view.z, 1.0);
        if clip.w.abs() <= f32::EPSILON {
            return None;
        }
        let ndc = clip.truncate() / clip.w;
        if !ndc.is_finite() {
            return None;
        }
        let w = viewport.width as f32;
        let h = viewport.height as f32;
        Some(Projected {
            screen: Vec2::new((ndc.x * 0.5 + 0.5) * w, (0.5 - ndc.y * 0.5) * h),
            depth,
        })
    }

    /// Project a display-space segment, trimming the part behind the near
    /// plane of a perspective camera. `None` when nothing is left.
    pub fn project_segment(
        &self,
        view: &Mat4,
        proj: &Mat4,
        a: Vec3,
        b: Vec3,
        viewport: Viewport,
    ) -> Option<(Projected, Projected)> {
        let mut va = view.transform_point3(a);
        let mut vb = view.transform_point3(b);
        if self.perspective {
            // View space looks down -z; trim slightly in front of the near plane.
            let limit = -2.0 * Z_NEAR;
            match (va.z <= limit, vb.z <= limit) {
                (false, false) => return None,
                (true, false) => vb = va + (vb - va) * ((limit - va.z) / (vb.z - va.z)),
                (false, true) => va = vb + (va - vb) * ((limit - vb.z) / (va.z - vb.z)),
                (true, true) => {}
            }
        }
        Some((
            self.project_view(proj, va, viewport)?,
            self.project_view(proj, vb, viewport)?,
        ))
    }
}
