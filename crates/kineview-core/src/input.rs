//! Pointer, scroll and keyboard handling.
//!
//! Front-ends translate their native events into [`InputEvent`] and feed them
//! to an [`InteractionController`], which mutates the camera and the time
//! cursor of a [`PlayerState`]. Pure key lookups are exposed separately so
//! they can be tested without a window.

use crate::camera::ViewPreset;
use crate::constants::{
    DRAG_ZOOM_FACTOR, PAN_SENSITIVITY, ROTATE_SENSITIVITY, SCROLL_ZOOM_FACTOR, SECOND_STEP,
};
use crate::scene::SceneModel;
use crate::state::PlayerState;
use glam::Vec2;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Primary,
    Middle,
    Secondary,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub shift: bool,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Key {
    Space,
    Left,
    Right,
    Up,
    Down,
    Home,
    End,
    Char(char),
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum InputEvent {
    PointerDown {
        button: MouseButton,
        position: Vec2,
        modifiers: Modifiers,
    },
    PointerMove {
        position: Vec2,
    },
    PointerUp {
        button: MouseButton,
    },
    /// Positive values zoom in, in scroll lines.
    Scroll {
        delta: f32,
    },
    KeyDown {
        key: Key,
        modifiers: Modifiers,
    },
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DragMode {
    Rotate,
    Pan,
    Zoom,
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        button: MouseButton,
        mode: DragMode,
        last: Vec2,
    },
}

/// What a key does, independent of any state.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum KeyAction {
    TogglePlay,
    StepSample { forward: bool },
    StepSeconds(f64),
    ScalePlaybackRate(f64),
    SeekStart,
    SeekEnd,
    InitialView,
    View(ViewPreset),
    TogglePerspective,
    ToggleHelp,
}

#[inline]
pub fn view_for_key(c: char) -> Option<ViewPreset> {
    match c {
        '2' => Some(ViewPreset::Front),
        '3' => Some(ViewPreset::Back),
        '4' => Some(ViewPreset::Left),
        '5' => Some(ViewPreset::Right),
        '6' => Some(ViewPreset::Top),
        '7' => Some(ViewPreset::Bottom),
        _ => None,
    }
}

pub fn key_action(key: Key, modifiers: Modifiers) -> Option<KeyAction> {
    match key {
        Key::Space => Some(KeyAction::TogglePlay),
        Key::Left if modifiers.shift => Some(KeyAction::StepSeconds(-SECOND_STEP)),
        Key::Right if modifiers.shift => Some(KeyAction::StepSeconds(SECOND_STEP)),
        Key::Left => Some(KeyAction::StepSample { forward: false }),
        Key::Right => Some(KeyAction::StepSample { forward: true }),
        Key::Up => Some(KeyAction::ScalePlaybackRate(2.0)),
        Key::Down => Some(KeyAction::ScalePlaybackRate(0.5)),
        Key::Home => Some(KeyAction::SeekStart),
        Key::End => Some(KeyAction::SeekEnd),
        Key::Char(c) => match c.to_ascii_lowercase() {
            ' ' => Some(KeyAction::TogglePlay),
            '1' => Some(KeyAction::InitialView),
            'd' => Some(KeyAction::TogglePerspective),
            'h' => Some(KeyAction::ToggleHelp),
            other => view_for_key(other).map(KeyAction::View),
        },
    }
}

pub fn drag_mode(button: MouseButton, modifiers: Modifiers) -> DragMode {
    match button {
        MouseButton::Primary if modifiers.shift => DragMode::Pan,
        MouseButton::Primary => DragMode::Rotate,
        MouseButton::Middle => DragMode::Pan,
        MouseButton::Secondary => DragMode::Zoom,
    }
}

/// Applies a key action. Returns whether anything visible changed.
pub fn apply_key_action(action: KeyAction, state: &mut PlayerState, scene: &SceneModel) -> bool {
    match action {
        KeyAction::TogglePlay => state.cursor.toggle_play(),
        KeyAction::StepSample { forward } => {
            state.cursor.pause();
            state.cursor.step(scene.reference_times(), forward);
        }
        KeyAction::StepSeconds(dt) => {
            let t = state.cursor.current_time() + dt;
            state.cursor.seek(t);
        }
        KeyAction::ScalePlaybackRate(f) => state.cursor.scale_playback_rate(f),
        KeyAction::SeekStart => state.cursor.seek_start(),
        KeyAction::SeekEnd => state.cursor.seek_end(),
        KeyAction::InitialView => state.restore_initial_view(),
        KeyAction::View(preset) => state.camera.set_view(preset),
        KeyAction::TogglePerspective => {
            let p = state.camera.perspective();
            state.camera.set_perspective(!p);
        }
        KeyAction::ToggleHelp => state.show_help = !state.show_help,
    }
    true
}

#[derive(Clone, Debug, Default)]
pub struct InteractionController {
    drag: DragState,
}

impl InteractionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn drag_state(&self) -> DragState {
        self.drag
    }

    /// Apply one event. Returns whether a redraw is needed.
    pub fn handle(&mut self, event: InputEvent, state: &mut PlayerState, scene: &SceneModel) -> bool {
        match event {
            InputEvent::PointerDown {
                button,
                position,
                modifiers,
            } => {
                if matches!(self.drag, DragState::Idle) {
                    self.drag = DragState::Dragging {
                        button,
                        mode: drag_mode(button, modifiers),
                        last: position,
                    };
                }
                false
            }
            InputEvent::PointerMove { position } => {
                let DragState::Dragging { button, mode, last } = self.drag else {
                    return false;
                };
                let delta = position - last;
                self.drag = DragState::Dragging {
                    button,
                    mode,
                    last: position,
                };
                apply_drag(mode, delta, state);
                delta != Vec2::ZERO
            }
            InputEvent::PointerUp { button } => {
                match self.drag {
                    DragState::Dragging { button: b, .. } if b == button => {
                        self.drag = DragState::Idle;
                    }
                    _ => {}
                }
                false
            }
            InputEvent::Scroll { delta } => {
                if !delta.is_finite() || delta == 0.0 {
                    return false;
                }
                state.camera.scale_zoom(SCROLL_ZOOM_FACTOR.powf(delta));
                true
            }
            InputEvent::KeyDown { key, modifiers } => match key_action(key, modifiers) {
                Some(action) => {
                    log::debug!("[keys] {key:?} -> {action:?}");
                    apply_key_action(action, state, scene)
                }
                None => false,
            },
        }
    }
}

fn apply_drag(mode: DragMode, delta: Vec2, state: &mut PlayerState) {
    let camera = &mut state.camera;
    match mode {
        DragMode::Rotate => {
            camera.rotate(-delta.x * ROTATE_SENSITIVITY, delta.y * ROTATE_SENSITIVITY);
        }
        DragMode::Pan => {
            let (right, up) = camera.basis();
            let scale = PAN_SENSITIVITY / camera.zoom();
            let target = camera.target() - right * delta.x * scale + up * delta.y * scale;
            if camera.set_target(target).is_err() {
                log::debug!("[mouse] pan produced a non-finite target, ignored");
            }
        }
        DragMode::Zoom => {
            camera.scale_zoom(DRAG_ZOOM_FACTOR.powf(-delta.y));
        }
    }
}
