//! Keypad: key events and sentinel-based text capture for one text field.
//!
//! On touch keyboards individual key events are unreliable (IME composition,
//! autocorrect and swipe typing rewrite whole words at once), so the keypad
//! does not trust them for text.  Instead it keeps the field filled with a
//! known sentinel, `\\\\…////` with the caret in the middle, and every poll
//! compares what is there now with the sentinel.  The difference is one
//! [`TextEdit`](remote_core::TextEdit): how many characters were erased to
//! the left of the caret, what was typed, and how many were erased to the
//! right.  The field is then reset so the next poll starts from a clean
//! baseline.
//!
//! Raw key codes are still forwarded as `keyPress`/`keyRelease`, which the
//! host uses for keys that never produce text (arrows, Enter, Escape).

use remote_core::domain::text_edit::TextEditBuffer;
use remote_core::protocol::Command;
use tracing::trace;

/// A host text field the keypad can read and rewrite.
pub trait TextField {
    /// Current content.
    fn value(&self) -> String;

    /// Replaces the content.
    fn set_value(&mut self, value: &str);

    /// Places the caret before the character at `position`.
    fn set_caret(&mut self, position: usize);
}

/// A text field that exists only in memory.
///
/// The session binary uses it to mirror the real field: the surface reports
/// the field's content with `FieldValue` events and the keypad resets it
/// here.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VirtualTextField {
    value: String,
    caret: usize,
}

impl VirtualTextField {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn caret(&self) -> usize {
        self.caret
    }

    /// Simulates typing `text` at the caret.
    pub fn type_text(&mut self, text: &str) {
        let at = self.byte_offset(self.caret);
        self.value.insert_str(at, text);
        self.caret += text.chars().count();
    }

    /// Simulates `count` presses of Backspace.
    pub fn backspace(&mut self, count: usize) {
        let start = self.byte_offset(self.caret.saturating_sub(count));
        let end = self.byte_offset(self.caret);
        self.value.replace_range(start..end, "");
        self.caret = self.caret.saturating_sub(count);
    }

    /// Simulates `count` presses of Delete.
    pub fn delete_forward(&mut self, count: usize) {
        let start = self.byte_offset(self.caret);
        let end = self.byte_offset(self.caret + count);
        self.value.replace_range(start..end, "");
    }

    fn byte_offset(&self, chars: usize) -> usize {
        self.value
            .char_indices()
            .nth(chars)
            .map_or(self.value.len(), |(i, _)| i)
    }
}

impl TextField for VirtualTextField {
    fn value(&self) -> String {
        self.value.clone()
    }

    fn set_value(&mut self, value: &str) {
        self.value = value.to_string();
        self.caret = self.caret.min(value.chars().count());
    }

    fn set_caret(&mut self, position: usize) {
        self.caret = position.min(self.value.chars().count());
    }
}

/// Text capture and key forwarding for one field.
#[derive(Debug)]
pub struct Keypad<F: TextField> {
    field: F,
    buffer: TextEditBuffer,
    listening: bool,
}

impl<F: TextField> Keypad<F> {
    /// Creates an unfocused keypad over `field` with `pad_len` sentinel
    /// characters per side.
    pub fn new(field: F, pad_len: usize) -> Self {
        Self {
            field,
            buffer: TextEditBuffer::new(pad_len),
            listening: false,
        }
    }

    pub fn field(&self) -> &F {
        &self.field
    }

    pub fn field_mut(&mut self) -> &mut F {
        &mut self.field
    }

    pub fn buffer(&self) -> &TextEditBuffer {
        &self.buffer
    }

    /// `true` while the field has focus and polling should run.
    pub fn is_listening(&self) -> bool {
        self.listening
    }

    /// The field gained focus: install the sentinel and start listening.
    pub fn focus(&mut self) {
        self.reset_field();
        self.listening = true;
    }

    /// The field lost focus: stop listening.
    pub fn blur(&mut self) {
        self.listening = false;
    }

    /// A click inside the field may have moved the caret away from the
    /// centre; put the sentinel back.
    pub fn click(&mut self) {
        if self.listening {
            self.reset_field();
        }
    }

    /// Scheduled read.  Does nothing unless the field has focus.
    pub fn poll(&mut self) -> Option<Command> {
        if !self.listening {
            return None;
        }
        self.read()
    }

    /// Reads the field now instead of waiting for the next poll.
    ///
    /// An unfocused field holds no sentinel, so there is nothing to diff.
    pub fn flush(&mut self) -> Option<Command> {
        if !self.listening {
            return None;
        }
        self.read()
    }

    /// Key down; a zero code (no key identity) is ignored.
    pub fn key_down(&self, code: u32) -> Option<Command> {
        (code != 0).then_some(Command::KeyPress(code))
    }

    /// Key up; a zero code is ignored.
    pub fn key_up(&self, code: u32) -> Option<Command> {
        (code != 0).then_some(Command::KeyRelease(code))
    }

    fn read(&mut self) -> Option<Command> {
        let content = self.field.value();
        if self.buffer.is_default(&content) {
            return None;
        }
        let edit = self.buffer.diff(&content);
        self.reset_field();
        let edit = edit?;
        trace!(
            backspaces = edit.backspaces,
            deletions = edit.deletions,
            inserted = edit.insertions.chars().count(),
            "text edit"
        );
        Some(Command::TextEdit(edit))
    }

    fn reset_field(&mut self) {
        self.field.set_value(self.buffer.default_mask());
        self.field.set_caret(self.buffer.caret());
    }
}

// ── Tests ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use remote_core::protocol::TextEdit;

    use super::*;

    fn focused_keypad() -> Keypad<VirtualTextField> {
        let mut keypad = Keypad::new(VirtualTextField::new(), 15);
        keypad.focus();
        keypad
    }

    #[test]
    fn test_focus_installs_sentinel_with_centred_caret() {
        // Act
        let keypad = focused_keypad();

        // Assert
        assert_eq!(keypad.field().value(), format!("{}{}", "\\".repeat(15), "/".repeat(15)));
        assert_eq!(keypad.field().caret(), 15);
        assert!(keypad.is_listening());
    }

    #[test]
    fn test_typing_produces_insertion_and_resets_field() {
        // Arrange
        let mut keypad = focused_keypad();
        keypad.field_mut().type_text("hi");

        // Act
        let command = keypad.poll();

        // Assert
        assert_eq!(command, Some(Command::TextEdit(TextEdit::new(0, "hi", 0))));
        assert!(keypad.buffer().is_default(&keypad.field().value()));
    }

    #[test]
    fn test_backspace_and_delete_are_counted() {
        // Arrange
        let mut keypad = focused_keypad();
        keypad.field_mut().backspace(3);
        keypad.field_mut().type_text("ab");
        keypad.field_mut().delete_forward(2);

        // Act
        let command = keypad.poll();

        // Assert
        assert_eq!(command, Some(Command::TextEdit(TextEdit::new(3, "ab", 2))));
    }

    #[test]
    fn test_repeated_polls_without_change_emit_nothing() {
        let mut keypad = focused_keypad();
        assert_eq!(keypad.poll(), None);
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_poll_is_inert_after_blur() {
        // Arrange
        let mut keypad = focused_keypad();
        keypad.field_mut().type_text("x");
        keypad.blur();

        // Act / Assert
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_flush_reads_typed_text_before_the_next_poll() {
        let mut keypad = focused_keypad();
        keypad.field_mut().type_text("x");

        assert_eq!(keypad.flush(), Some(Command::TextEdit(TextEdit::new(0, "x", 0))));
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_flush_without_focus_emits_nothing() {
        // Arrange: the field never held the sentinel
        let mut keypad = Keypad::new(VirtualTextField::new(), 15);

        // Act
        let command = keypad.flush();

        // Assert: the empty field is left alone
        assert_eq!(command, None);
        assert_eq!(keypad.field().value(), "");
    }

    #[test]
    fn test_foreign_content_is_skipped_but_field_is_reset() {
        // Arrange: something outside the keypad rewrote the field
        let mut keypad = focused_keypad();
        keypad.field_mut().set_value("a/b");

        // Act
        let command = keypad.poll();

        // Assert
        assert_eq!(command, None);
        assert!(keypad.buffer().is_default(&keypad.field().value()));
    }

    #[test]
    fn test_click_recentres_caret_without_emitting() {
        // Arrange
        let mut keypad = focused_keypad();
        keypad.field_mut().set_caret(2);

        // Act
        keypad.click();

        // Assert
        assert_eq!(keypad.field().caret(), 15);
        assert_eq!(keypad.poll(), None);
    }

    #[test]
    fn test_zero_key_code_is_ignored() {
        let keypad = focused_keypad();
        assert_eq!(keypad.key_down(0), None);
        assert_eq!(keypad.key_up(0), None);
        assert_eq!(keypad.key_down(13), Some(Command::KeyPress(13)));
        assert_eq!(keypad.key_up(13), Some(Command::KeyRelease(13)));
    }

    #[test]
    fn test_virtual_field_handles_multibyte_text() {
        let mut field = VirtualTextField::new();
        field.type_text("héllo");
        field.backspace(2);
        assert_eq!(field.value(), "hél");
        assert_eq!(field.caret(), 3);
    }
}
