//! Semantic commands and the per-tick frame they are coalesced into.
//!
//! # Wire shape
//!
//! One frame is one JSON object.  An absent key means "no update this tick":
//!
//! ```text
//! { mm?: [dx, dy],                  accumulated move delta
//!   mp?: button,                    button pressed
//!   mr?: button,                    button released
//!   mc?: button,                    button clicked
//!   kp?: key code,                  key pressed
//!   kr?: key code,                  key released
//!   tc?: { b?: n, i?: "text", d?: n } }   text edit
//! ```
//!
//! # Coalescing (for beginners)
//!
//! Input arrives far more often than frames are sent.  Between two flushes
//! the [`CommandQueue`] keeps at most one pending value per command kind:
//!
//! - **move** accumulates: `move(2,3)` then `move(-1,4)` is sent as `[1,7]`.
//! - **everything else** is last-write-wins: a second `click` replaces the first.

use serde::{Deserialize, Serialize};

/// Pointer button identifiers, encoded on the wire as small integers.
///
/// A touch surface only ever drives the primary button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left / single-finger button.
    Primary,
}

impl MouseButton {
    /// The integer carried in `mp`, `mr` and `mc`.
    pub fn code(self) -> u8 {
        match self {
            MouseButton::Primary => 1,
        }
    }
}

fn is_zero(n: &u32) -> bool {
    *n == 0
}

/// A structured text edit inferred from the sentinel field.
///
/// Neutral fields (zero counts, empty text) are omitted when serialized.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TextEdit {
    /// Characters erased to the left of the caret.
    #[serde(rename = "b", default, skip_serializing_if = "is_zero")]
    pub backspaces: u32,
    /// Text typed at the caret.
    #[serde(rename = "i", default, skip_serializing_if = "String::is_empty")]
    pub insertions: String,
    /// Characters erased to the right of the caret.
    #[serde(rename = "d", default, skip_serializing_if = "is_zero")]
    pub deletions: u32,
}

impl TextEdit {
    pub fn new(backspaces: u32, insertions: impl Into<String>, deletions: u32) -> Self {
        Self {
            backspaces,
            insertions: insertions.into(),
            deletions,
        }
    }
}

/// One semantic command produced by the recognizer or the keypad.
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Move { dx: f64, dy: f64 },
    Press(MouseButton),
    Release(MouseButton),
    Click(MouseButton),
    KeyPress(u32),
    KeyRelease(u32),
    TextEdit(TextEdit),
}

/// The seven command kinds, one queue slot each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CommandKind {
    Move,
    Press,
    Release,
    Click,
    KeyPress,
    KeyRelease,
    TextEdit,
}

impl CommandKind {
    /// Wire key of this kind's slot.
    pub fn wire_key(self) -> &'static str {
        match self {
            CommandKind::Move => "mm",
            CommandKind::Press => "mp",
            CommandKind::Release => "mr",
            CommandKind::Click => "mc",
            CommandKind::KeyPress => "kp",
            CommandKind::KeyRelease => "kr",
            CommandKind::TextEdit => "tc",
        }
    }
}

impl Command {
    pub fn kind(&self) -> CommandKind {
        match self {
            Command::Move { .. } => CommandKind::Move,
            Command::Press(_) => CommandKind::Press,
            Command::Release(_) => CommandKind::Release,
            Command::Click(_) => CommandKind::Click,
            Command::KeyPress(_) => CommandKind::KeyPress,
            Command::KeyRelease(_) => CommandKind::KeyRelease,
            Command::TextEdit(_) => CommandKind::TextEdit,
        }
    }
}

/// One outbound batch: at most one value per command kind.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Frame {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mm: Option<[f64; 2]>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mp: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mr: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mc: Option<u8>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kp: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kr: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tc: Option<TextEdit>,
}

impl Frame {
    /// `true` when no slot holds a value; such a frame is never sent.
    pub fn is_empty(&self) -> bool {
        self.mm.is_none()
            && self.mp.is_none()
            && self.mr.is_none()
            && self.mc.is_none()
            && self.kp.is_none()
            && self.kr.is_none()
            && self.tc.is_none()
    }

    /// Wire keys of the slots that hold a value, in wire order.  Used for
    /// log lines.
    pub fn keys(&self) -> Vec<&'static str> {
        let slots = [
            (self.mm.is_some(), CommandKind::Move),
            (self.mp.is_some(), CommandKind::Press),
            (self.mr.is_some(), CommandKind::Release),
            (self.mc.is_some(), CommandKind::Click),
            (self.kp.is_some(), CommandKind::KeyPress),
            (self.kr.is_some(), CommandKind::KeyRelease),
            (self.tc.is_some(), CommandKind::TextEdit),
        ];
        slots
            .into_iter()
            .filter_map(|(set, kind)| set.then_some(kind.wire_key()))
            .collect()
    }
}

/// Pending commands between two flushes.
#[derive(Debug, Clone, Default)]
pub struct CommandQueue {
    pending: Frame,
}

impl CommandQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a command: moves are summed component-wise, every other kind
    /// replaces the pending value of the same kind.
    pub fn enqueue(&mut self, command: Command) {
        let slot = &mut self.pending;
        match command {
            Command::Move { dx, dy } => {
                slot.mm = Some(match slot.mm {
                    Some([px, py]) => [px + dx, py + dy],
                    None => [dx, dy],
                });
            }
            Command::Press(button) => slot.mp = Some(button.code()),
            Command::Release(button) => slot.mr = Some(button.code()),
            Command::Click(button) => slot.mc = Some(button.code()),
            Command::KeyPress(code) => slot.kp = Some(code),
            Command::KeyRelease(code) => slot.kr = Some(code),
            Command::TextEdit(edit) => slot.tc = Some(edit),
        }
    }

    /// Swaps the pending frame for an empty one and returns it.
    pub fn take(&mut self) -> Frame {
        std::mem::take(&mut self.pending)
    }

    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Read-only view of what the next flush would send.
    pub fn pending(&self) -> &Frame {
        &self.pending
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────
