//! winit events to core input events.

use glam::Vec2;
use kineview_core::{InputEvent, Key, Modifiers, MouseButton};
use winit::event::{ElementState, MouseScrollDelta};
use winit::keyboard::{Key as WinitKey, ModifiersState, NamedKey};

const PIXELS_PER_LINE: f32 = 40.0;

pub fn modifiers(state: ModifiersState) -> Modifiers {
    Modifiers {
        shift: state.shift_key(),
    }
}

pub fn mouse_button(button: winit::event::MouseButton) -> Option<MouseButton> {
    match button {
        winit::event::MouseButton::Left => Some(MouseButton::Primary),
        winit::event::MouseButton::Middle => Some(MouseButton::Middle),
        winit::event::MouseButton::Right => Some(MouseButton::Secondary),
        _ => None,
    }
}

pub fn key(logical: &WinitKey) -> Option<Key> {
    match logical {
        WinitKey::Named(NamedKey::Space) => Some(Key::Space),
        WinitKey::Named(NamedKey::ArrowLeft) => Some(Key::Left),
        WinitKey::Named(NamedKey::ArrowRight) => Some(Key::Right),
        WinitKey::Named(NamedKey::ArrowUp) => Some(Key::Up),
        WinitKey::Named(NamedKey::ArrowDown) => Some(Key::Down),
        WinitKey::Named(NamedKey::Home) => Some(Key::Home),
        WinitKey::Named(NamedKey::End) => Some(Key::End),
        WinitKey::Character(s) => s.chars().next().map(Key::Char),
        _ => None,
    }
}

pub fn mouse_input(
    state: ElementState,
    button: winit::event::MouseButton,
    position: Vec2,
    mods: Modifiers,
) -> Option<InputEvent> {
    let button = mouse_button(button)?;
    Some(match state {
        ElementState::Pressed => InputEvent::PointerDown {
            button,
            position,
            modifiers: mods,
        },
        ElementState::Released => InputEvent::PointerUp { button },
    })
}

/// Scroll in lines; pixel deltas (touchpads) are converted.
pub fn scroll(delta: MouseScrollDelta) -> InputEvent {
    let lines = match delta {
        MouseScrollDelta::LineDelta(_, y) => y,
        MouseScrollDelta::PixelDelta(p) => p.y as f32 / PIXELS_PER_LINE,
    };
    InputEvent::Scroll { delta: lines }
}
