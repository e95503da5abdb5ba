//! Input events delivered by the host window

use asmcad_scene::{Button, IVec2};
use serde::{Deserialize, Serialize};

use crate::error::{EditorError, Result};

/// One discrete input event, in scene coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum InputEvent {
    PointerDown {
        x: i32,
        y: i32,
        #[serde(default = "default_button")]
        button: Button,
    },
    PointerUp {
        x: i32,
        y: i32,
    },
    PointerMove {
        x: i32,
        y: i32,
    },
    /// Positive deltas are the wheel turned away from the user
    Wheel {
        x: i32,
        y: i32,
        delta: i32,
    },
    Resize {
        width: i32,
        height: i32,
    },
    Quit,
}

fn default_button() -> Button {
    Button::Left
}

impl InputEvent {
    /// Pointer position carried by the event, if any
    pub fn position(&self) -> Option<IVec2> {
        match *self {
            InputEvent::PointerDown { x, y, .. }
            | InputEvent::PointerUp { x, y }
            | InputEvent::PointerMove { x, y }
            | InputEvent::Wheel { x, y, .. } => Some(IVec2::new(x, y)),
            InputEvent::Resize { .. } | InputEvent::Quit => None,
        }
    }
}

/// Parse an event script: one JSON object per line. Blank lines and lines
/// starting with `#` are skipped.
pub fn parse_events(text: &str) -> Result<Vec<InputEvent>> {
    text.lines()
        .enumerate()
        .filter(|(_, line)| {
            let line = line.trim();
            !line.is_empty() && !line.starts_with('#')
        })
        .map(|(i, line)| {
            serde_json::from_str(line).map_err(|e| EditorError::InvalidEvent {
                line: i + 1,
                message: e.to_string(),
            })
        })
        .collect()
}
