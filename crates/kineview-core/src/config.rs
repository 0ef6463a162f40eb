//! Construction options for [`crate::Player`].
//!
//! Every field has a named default, so a partial JSON document (or `{}`) is
//! a valid configuration. Older option names are accepted as aliases.

use crate::axes::Axis;
use crate::constants::*;
use crate::scene::Interconnections;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlayerConfig {
    #[serde(alias = "segments")]
    pub interconnections: Interconnections,

    pub up: Axis,
    pub anterior: Axis,

    pub azimuth: f32,
    pub elevation: f32,
    /// Camera pivot, in data coordinates.
    pub target: [f32; 3],
    pub zoom: f32,
    pub perspective: bool,

    /// Starting time. Takes precedence over `initial_frame_index`.
    pub current_time: Option<f64>,
    #[serde(alias = "current_frame")]
    pub initial_frame_index: Option<usize>,
    pub playback_rate: f64,
    #[serde(rename = "loop", alias = "looping")]
    pub looping: bool,

    pub point_size: f32,
    pub default_point_color: [f32; 3],
    #[serde(alias = "segment_width")]
    pub interconnection_width: f32,
    pub frame_size: f32,
    pub frame_width: f32,
    pub grid_size: f32,
    pub grid_divisions: u32,
    pub grid_origin: [f32; 3],
    pub grid_color: [f32; 3],
    pub background_color: [f32; 3],
}

impl Default for PlayerConfig {
    fn default() -> Self {
        Self {
            interconnections: Interconnections::new(),
            up: Axis::Y,
            anterior: Axis::X,
            azimuth: 0.0,
            elevation: DEFAULT_ELEVATION,
            target: [0.0; 3],
            zoom: 1.0,
            perspective: true,
            current_time: None,
            initial_frame_index: None,
            playback_rate: 1.0,
            looping: true,
            point_size: DEFAULT_POINT_SIZE,
            default_point_color: DEFAULT_POINT_COLOR,
            interconnection_width: DEFAULT_INTERCONNECTION_WIDTH,
            frame_size: DEFAULT_FRAME_SIZE,
            frame_width: DEFAULT_FRAME_WIDTH,
            grid_size: DEFAULT_GRID_SIZE,
            grid_divisions: DEFAULT_GRID_DIVISIONS,
            grid_origin: [0.0; 3],
            grid_color: DEFAULT_GRID_COLOR,
            background_color: DEFAULT_BACKGROUND_COLOR,
        }
    }
}

impl PlayerConfig {
    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }
}
