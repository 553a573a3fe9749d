//! Input events delivered to a remote surface.
//!
//! The client does not render anything itself.  Whatever draws the touchpad
//! and text field (a browser page, a native toolkit, a test script) reports
//! what happened as one JSON object per line:
//!
//! ```json
//! {"type":"Press","x":120.0,"y":80.0,"t":1000}
//! {"type":"Move","x":126.0,"y":83.0,"t":1016}
//! {"type":"Release","t":1100}
//! {"type":"Tap"}
//! {"type":"KeyDown","code":65}
//! {"type":"FieldValue","value":"\\\\\\hi///"}
//! ```
//!
//! Timestamps `t` are milliseconds on any monotonic clock; only differences
//! between them matter.  Serde's `#[serde(tag = "type")]` handles the
//! discriminant.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One input notification from the control surface.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum SurfaceEvent {
    /// A finger or button went down, at an absolute position when the
    /// surface reports one.
    Press {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        x: Option<f64>,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        y: Option<f64>,
        t: u64,
    },
    /// The pointer is now at an absolute position.
    Move { x: f64, y: f64, t: u64 },
    /// The pointer moved by a relative amount.
    MoveBy { dx: f64, dy: f64, t: u64 },
    /// The finger or button lifted.
    Release { t: u64 },
    /// The tap detector recognised a single tap.
    Tap,
    /// The tap detector recognised a double tap.
    DoubleTap,
    /// A key went down in the text field.
    KeyDown { code: u32 },
    /// A key went up in the text field.
    KeyUp { code: u32 },
    /// The text field gained focus.
    Focus,
    /// The text field lost focus.
    Blur,
    /// The text field was clicked.
    FieldClick,
    /// The text field's content changed to `value`.
    FieldValue { value: String },
    /// Switch the channel to a new host URL.
    Endpoint { url: String },
}

impl SurfaceEvent {
    /// Short variant name for log lines.
    ///
    /// Never includes field values, so typed text and URLs with credentials
    /// stay out of the logs.
    pub fn type_name(&self) -> &'static str {
        match self {
            SurfaceEvent::Press { .. } => "Press",
            SurfaceEvent::Move { .. } => "Move",
            SurfaceEvent::MoveBy { .. } => "MoveBy",
            SurfaceEvent::Release { .. } => "Release",
            SurfaceEvent::Tap => "Tap",
            SurfaceEvent::DoubleTap => "DoubleTap",
            SurfaceEvent::KeyDown { .. } => "KeyDown",
            SurfaceEvent::KeyUp { .. } => "KeyUp",
            SurfaceEvent::Focus => "Focus",
            SurfaceEvent::Blur => "Blur",
            SurfaceEvent::FieldClick => "FieldClick",
            SurfaceEvent::FieldValue { .. } => "FieldValue",
            SurfaceEvent::Endpoint { .. } => "Endpoint",
        }
    }
}

/// A line of input that is not a valid [`SurfaceEvent`].
#[derive(Debug, Error)]
#[error("invalid input event: {0}")]
pub struct EventError(#[from] serde_json::Error);

/// Parses one line of input.  Blank lines yield `Ok(None)`.
///
/// # Errors
///
/// Returns [`EventError`] when the line is not a JSON event object.
pub fn parse_event_line(line: &str) -> Result<Option<SurfaceEvent>, EventError> {
    let line = line.trim();
    if line.is_empty() {
        return Ok(None);
    }
    Ok(Some(serde_json::from_str(line)?))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
