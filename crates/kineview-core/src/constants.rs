use std::f32::consts::{FRAC_PI_2, FRAC_PI_4};

// Shared tuning constants used by the core and the native front-end.

// Camera
pub const ELEVATION_LIMIT: f32 = FRAC_PI_2 - 1.0e-3; // open bound kept away from the poles
pub const DEFAULT_ELEVATION: f32 = 0.2; // slight downward look at start
pub const ZOOM_MIN: f32 = 1.0e-3; // smallest stored zoom, keeps projections finite
pub const CAMERA_DISTANCE: f32 = 5.0; // eye distance from target, display units
pub const BASE_FOV_RADIANS: f32 = FRAC_PI_4; // vertical field of view at zoom 1
pub const MAX_FOV_RADIANS: f32 = 3.0; // widest field of view reachable by zooming out
pub const ORTHO_HALF_HEIGHT: f32 = 2.0; // half of the visible height at zoom 1
pub const Z_NEAR: f32 = 0.01;
pub const Z_FAR: f32 = 1000.0;

// Timeline
pub const TIME_EPSILON: f64 = 1.0e-9; // tolerance when matching a time to a sample stamp
pub const SECOND_STEP: f64 = 1.0; // shift+arrow jump
pub const PLAYBACK_RATE_LIMIT: f64 = 64.0; // |rate| ceiling for up/down doubling

// Interaction
pub const ROTATE_SENSITIVITY: f32 = 0.01; // radians per pixel of drag
pub const PAN_SENSITIVITY: f32 = 0.005; // display units per pixel at zoom 1
pub const SCROLL_ZOOM_FACTOR: f32 = 1.1; // zoom multiplier per scroll line
pub const DRAG_ZOOM_FACTOR: f32 = 1.01; // zoom multiplier per pixel of secondary drag

// Style defaults
pub const DEFAULT_POINT_SIZE: f32 = 4.0; // marker radius in pixels
pub const DEFAULT_INTERCONNECTION_WIDTH: f32 = 1.5; // pixels
pub const DEFAULT_FRAME_SIZE: f32 = 0.1; // triad axis length, data units
pub const DEFAULT_FRAME_WIDTH: f32 = 3.0; // pixels
pub const DEFAULT_GRID_SIZE: f32 = 1.0; // cell pitch, data units
pub const DEFAULT_GRID_DIVISIONS: u32 = 10; // cells per side
pub const MAX_GRID_DIVISIONS: u32 = 1000;
pub const GRID_LINE_WIDTH: f32 = 1.0; // pixels

pub const DEFAULT_POINT_COLOR: [f32; 3] = [0.8, 0.8, 0.8];
pub const DEFAULT_GRID_COLOR: [f32; 3] = [0.3, 0.3, 0.3];
pub const DEFAULT_BACKGROUND_COLOR: [f32; 3] = [0.0, 0.0, 0.0];

// Triad axis colors: x, y, z
pub const FRAME_AXIS_COLORS: [[f32; 3]; 3] = [
    [1.0, 0.0, 0.0], // red
    [0.0, 1.0, 0.0], // green
    [0.3, 0.3, 1.0], // blue-ish, reads better on dark backgrounds
];

// Overlay
pub const OVERLAY_COLOR: [f32; 3] = [1.0, 1.0, 1.0];
pub const OVERLAY_MARGIN_PX: f32 = 8.0;
pub const OVERLAY_LINE_HEIGHT_PX: f32 = 16.0;

// Export
pub const DEFAULT_EXPORT_WIDTH: u32 = 800;
pub const DEFAULT_EXPORT_HEIGHT: u32 = 600;
pub const DEFAULT_EXPORT_FRAME_RATE: f64 = 30.0;
pub const MAX_EXPORT_FRAMES: usize = 10_000_000; // about 92 hours at 30 fps
