use crate::constants::{OVERLAY_COLOR, OVERLAY_LINE_HEIGHT_PX, OVERLAY_MARGIN_PX};
use crate::render::OverlayText;
use crate::state::PlayerState;
use glam::Vec2;

pub const HELP_LINES: &[&str] = &[
    "space        play / pause",
    "left/right   previous / next sample",
    "shift+arrow  one second back / forward",
    "up/down      playback rate x2 / /2",
    "home/end     first / last time",
    "1            initial view",
    "2-7          front, back, left, right, top, bottom",
    "d            toggle perspective",
    "h            show / hide this help",
    "drag         rotate",
    "shift+drag   pan (or middle drag)",
    "right drag   zoom (or scroll)",
];

/// Text shown over the scene: the time line, then the help block if enabled.
pub fn overlay_lines(state: &PlayerState, index: Option<usize>) -> Vec<OverlayText> {
    let cursor = &state.cursor;
    let mut status = match index {
        Some(i) => format!("{:.3} s (frame {i})", cursor.current_time()),
        None => format!("{:.3} s", cursor.current_time()),
    };
    if cursor.playback_rate() != 1.0 {
        status.push_str(&format!("  x{}", cursor.playback_rate()));
    }
    if cursor.is_playing() {
        status.push_str("  [playing]");
    }

    let mut lines = vec![status];
    if state.show_help {
        lines.push(String::new());
        lines.extend(HELP_LINES.iter().map(|l| l.to_string()));
    }

    lines
        .into_iter()
        .enumerate()
        .map(|(i, text)| OverlayText {
            text,
            position: Vec2::new(
                OVERLAY_MARGIN_PX,
                OVERLAY_MARGIN_PX + OVERLAY_LINE_HEIGHT_PX * (i as f32 + 1.0),
            ),
            color: OVERLAY_COLOR,
        })
        .collect()
}
