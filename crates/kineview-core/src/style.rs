use crate::constants::*;
use crate::error::PlayerError;
use crate::scene::validate_color;
use glam::Vec3;

/// Sizes, widths and colors used by the renderer.
///
/// Every setter validates its input and leaves the previous value in place on
/// failure. Sizes and widths accept zero, which hides the primitive.
#[derive(Clone, Debug, PartialEq)]
pub struct Style {
    point_size: f32,
    default_point_color: [f32; 3],
    interconnection_width: f32,
    frame_size: f32,
    frame_width: f32,
    grid_size: f32,
    grid_divisions: u32,
    grid_origin: Vec3,
    grid_color: [f32; 3],
    background_color: [f32; 3],
}

impl Default for Style {
    fn default() -> Self {
        Self {
            point_size: DEFAULT_POINT_SIZE,
            default_point_color: DEFAULT_POINT_COLOR,
            interconnection_width: DEFAULT_INTERCONNECTION_WIDTH,
            frame_size: DEFAULT_FRAME_SIZE,
            frame_width: DEFAULT_FRAME_WIDTH,
            grid_size: DEFAULT_GRID_SIZE,
            grid_divisions: DEFAULT_GRID_DIVISIONS,
            grid_origin: Vec3::ZERO,
            grid_color: DEFAULT_GRID_COLOR,
            background_color: DEFAULT_BACKGROUND_COLOR,
        }
    }
}

fn validate_size(field: &'static str, v: f32) -> Result<f32, PlayerError> {
    if v.is_finite() && v >= 0.0 {
        Ok(v)
    } else {
        Err(PlayerError::invalid(field, format!("expected a finite value >= 0, got {v}")))
    }
}

impl Style {
    pub fn point_size(&self) -> f32 {
        self.point_size
    }

    pub fn default_point_color(&self) -> [f32; 3] {
        self.default_point_color
    }

    pub fn interconnection_width(&self) -> f32 {
        self.interconnection_width
    }

    pub fn frame_size(&self) -> f32 {
        self.frame_size
    }

    pub fn frame_width(&self) -> f32 {
        self.frame_width
    }

    pub fn grid_size(&self) -> f32 {
        self.grid_size
    }

    pub fn grid_divisions(&self) -> u32 {
        self.grid_divisions
    }

    /// Grid center in data space.
    pub fn grid_origin(&self) -> Vec3 {
        self.grid_origin
    }

    pub fn grid_color(&self) -> [f32; 3] {
        self.grid_color
    }

    pub fn background_color(&self) -> [f32; 3] {
        self.background_color
    }

    pub fn set_point_size(&mut self, v: f32) -> Result<(), PlayerError> {
        self.point_size = validate_size("point_size", v)?;
        Ok(())
    }

    pub fn set_default_point_color(&mut self, c: [f32; 3]) -> Result<(), PlayerError> {
        validate_color("default_point_color", c)?;
        self.default_point_color = c;
        Ok(())
    }

    pub fn set_interconnection_width(&mut self, v: f32) -> Result<(), PlayerError> {
        self.interconnection_width = validate_size("interconnection_width", v)?;
        Ok(())
    }

    pub fn set_frame_size(&mut self, v: f32) -> Result<(), PlayerError> {
        self.frame_size = validate_size("frame_size", v)?;
        Ok(())
    }

    pub fn set_frame_width(&mut self, v: f32) -> Result<(), PlayerError> {
        self.frame_width = validate_size("frame_width", v)?;
        Ok(())
    }

    pub fn set_grid_size(&mut self, v: f32) -> Result<(), PlayerError> {
        self.grid_size = validate_size("grid_size", v)?;
        Ok(())
    }

    pub fn set_grid_divisions(&mut self, n: u32) -> Result<(), PlayerError> {
        if n == 0 {
            return Err(PlayerError::invalid("grid_divisions", "expected at least one cell"));
        }
        if n > MAX_GRID_DIVISIONS {
            return Err(PlayerError::invalid(
                "grid_divisions",
                format!("{n} exceeds the limit of {MAX_GRID_DIVISIONS}"),
            ));
        }
        self.grid_divisions = n;
        Ok(())
    }

    pub fn set_grid_origin(&mut self, origin: Vec3) -> Result<(), PlayerError> {
        if !origin.is_finite() {
            return Err(PlayerError::invalid("grid_origin", format!("{origin} is not finite")));
        }
        self.grid_origin = origin;
        Ok(())
    }

    pub fn set_grid_color(&mut self, c: [f32; 3]) -> Result<(), PlayerError> {
        validate_color("grid_color", c)?;
        self.grid_color = c;
        Ok(())
    }

    pub fn set_background_color(&mut self, c: [f32; 3]) -> Result<(), PlayerError> {
        validate_color("background_color", c)?;
        self.background_color = c;
        Ok(())
    }
}
