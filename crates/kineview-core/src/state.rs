//! View and playback state shared by the renderer and the interaction
//! controller.
//!
//! These types avoid referencing windowing or GPU APIs; a front-end holds one
//! [`PlayerState`] (through the [`crate::Player`]) and hands it by reference
//! to whichever component needs it on the current event.

use crate::axes::AxisConvention;
use crate::camera::Camera;
use crate::style::Style;
use crate::timeline::TimeCursor;

#[derive(Clone, Debug, PartialEq)]
pub struct PlayerState {
    pub camera: Camera,
    pub cursor: TimeCursor,
    pub style: Style,
    pub convention: AxisConvention,
    pub show_help: bool,
    /// `(azimuth, elevation)` restored by the "initial view" shortcut.
    pub initial_view: (f32, f32),
}

impl Default for PlayerState {
    fn default() -> Self {
        Self {
            camera: Camera::default(),
            cursor: TimeCursor::default(),
            style: Style::default(),
            convention: AxisConvention::default(),
            show_help: false,
            initial_view: (0.0, 0.0),
        }
    }
}

impl PlayerState {
    pub fn restore_initial_view(&mut self) {
        let (azimuth, elevation) = self.initial_view;
        // Both were validated when the player was built.
        let _ = self.camera.set_azimuth(azimuth);
        let _ = self.camera.set_elevation(elevation);
    }
}
