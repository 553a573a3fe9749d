//! Text-edit inference from a masked sentinel buffer.
//!
//! Per-key events are unreliable on touch keyboards: IME composition,
//! autocorrect and swipe typing all change the text without a matching key
//! event.  Instead of listening to keys, the host text field is filled with a
//! known sentinel and the caret is placed in its middle:
//!
//! ```text
//! \\\\\\\\\\\\\\\|///////////////
//!  pad_len × '\'  ^  pad_len × '/'
//!                caret
//! ```
//!
//! Whatever the user does only touches characters around the caret.  On each
//! poll the field content is matched against `^(\\*)([^\\/]*)(/*)$`:
//!
//! - missing leading `\` are **backspaces**,
//! - missing trailing `/` are **deletions**,
//! - the middle run is **inserted text**.
//!
//! If the user types a literal `\` or `/` next to the caret, a pad run grows
//! longer than `pad_len`.  The surplus is not a deletion of anything, so it is
//! folded back into the inserted text (leading surplus before the middle,
//! trailing surplus after it).

use once_cell::sync::Lazy;
use regex::Regex;
use tracing::debug;

use crate::protocol::commands::TextEdit;

/// Default number of pad characters on each side of the caret.
pub const DEFAULT_PAD_LEN: usize = 15;

/// Character repeated to the left of the caret.
pub const LEFT_PAD: char = '\\';

/// Character repeated to the right of the caret.
pub const RIGHT_PAD: char = '/';

static SENTINEL_PATTERN: Lazy<Regex> = Lazy::new(|| {
    // A constant pattern; it is covered by the unit tests below.
    Regex::new(r"^(\\*)([^\\/]*)(/*)$").expect("sentinel pattern must compile")
});

/// The sentinel state of a host text field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextEditBuffer {
    pad_len: usize,
    left_pad: String,
    right_pad: String,
    default_mask: String,
}

impl TextEditBuffer {
    /// Builds the sentinel for `pad_len` characters per side (at least 1).
    pub fn new(pad_len: usize) -> Self {
        let pad_len = pad_len.max(1);
        let left_pad: String = std::iter::repeat(LEFT_PAD).take(pad_len).collect();
        let right_pad: String = std::iter::repeat(RIGHT_PAD).take(pad_len).collect();
        let default_mask = format!("{left_pad}{right_pad}");
        Self {
            pad_len,
            left_pad,
            right_pad,
            default_mask,
        }
    }

    pub fn pad_len(&self) -> usize {
        self.pad_len
    }

    pub fn left_pad(&self) -> &str {
        &self.left_pad
    }

    pub fn right_pad(&self) -> &str {
        &self.right_pad
    }

    /// The value the field holds when nothing has been typed.
    pub fn default_mask(&self) -> &str {
        &self.default_mask
    }

    /// Caret position (in characters) between the two pads.
    pub fn caret(&self) -> usize {
        self.pad_len
    }

    /// `true` when `content` is the untouched sentinel.
    pub fn is_default(&self, content: &str) -> bool {
        content == self.default_mask
    }

    /// Infers the edit that turned the sentinel into `content`.
    ///
    /// Returns `None` when nothing changed, and also when `content` does not
    /// have the sentinel shape (the field was rewritten by something other
    /// than typing); that read is simply skipped.
    pub fn diff(&self, content: &str) -> Option<TextEdit> {
        if self.is_default(content) {
            return None;
        }

        let Some(caps) = SENTINEL_PATTERN.captures(content) else {
            debug!(len = content.len(), "text field does not match the sentinel shape");
            return None;
        };

        // Both pad characters are ASCII, so byte length equals char count.
        let leading = caps.get(1).map_or(0, |m| m.as_str().len());
        let middle = caps.get(2).map_or("", |m| m.as_str());
        let trailing = caps.get(3).map_or(0, |m| m.as_str().len());

        let backspaces = self.pad_len.saturating_sub(leading);
        let deletions = self.pad_len.saturating_sub(trailing);
        let leading_surplus = leading.saturating_sub(self.pad_len);
        let trailing_surplus = trailing.saturating_sub(self.pad_len);

        let mut insertions = String::with_capacity(leading_surplus + middle.len() + trailing_surplus);
        insertions.extend(std::iter::repeat(LEFT_PAD).take(leading_surplus));
        insertions.push_str(middle);
        insertions.extend(std::iter::repeat(RIGHT_PAD).take(trailing_surplus));

        Some(TextEdit {
            backspaces: to_count(backspaces),
            insertions,
            deletions: to_count(deletions),
        })
    }
}

impl Default for TextEditBuffer {
    fn default() -> Self {
        Self::new(DEFAULT_PAD_LEN)
    }
}

fn to_count(n: usize) -> u32 {
    u32::try_from(n).unwrap_or(u32::MAX)
}

// ── Tests ─────────────────────────────────────────────────────────────────────
