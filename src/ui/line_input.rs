use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum InputResult {
    /// Key consumed, text unchanged (cursor moves).
    Continue,
    Changed,
    Submit,
    Cancel,
    /// Not an editing key; the caller may bind it.
    Ignored,
}

/// Single-line answer field with cursor editing.
#[derive(Clone, Debug, Default)]
pub struct LineInput {
    text: String,
    /// Cursor position as a char index (0 = before first char).
    cursor: usize,
}

impl LineInput {
    pub fn new(text: &str) -> Self {
        Self {
            text: text.to_string(),
            cursor: text.chars().count(),
        }
    }

    pub fn value(&self) -> &str {
        &self.text
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Replace the text and put the cursor at the end.
    pub fn set(&mut self, text: &str) {
        self.text = text.to_string();
        self.cursor = self.text.chars().count();
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.cursor = 0;
    }

    /// Returns (before_cursor, cursor_char, after_cursor) for styled rendering.
    /// When cursor is at end of text, cursor_char is None.
    pub fn render_parts(&self) -> (&str, Option<char>, &str) {
        let byte_offset = self.char_to_byte(self.cursor);
        match self.text[byte_offset..].chars().next() {
            Some(ch) => {
                let next_byte = byte_offset + ch.len_utf8();
                (&self.text[..byte_offset], Some(ch), &self.text[next_byte..])
            }
            None => (&self.text, None, ""),
        }
    }

    pub fn handle(&mut self, key: KeyEvent) -> InputResult {
        let ctrl = key.modifiers.contains(KeyModifiers::CONTROL);
        match key.code {
            KeyCode::Esc => InputResult::Cancel,
            KeyCode::Enter => InputResult::Submit,
            KeyCode::Left => {
                self.cursor = self.cursor.saturating_sub(1);
                InputResult::Continue
            }
            KeyCode::Right => {
                self.cursor = (self.cursor + 1).min(self.len());
                InputResult::Continue
            }
            KeyCode::Home => {
                self.cursor = 0;
                InputResult::Continue
            }
            KeyCode::End => {
                self.cursor = self.len();
                InputResult::Continue
            }
            KeyCode::Backspace => {
                if self.cursor == 0 {
                    return InputResult::Continue;
                }
                self.cursor -= 1;
                self.remove_at_cursor();
                InputResult::Changed
            }
            KeyCode::Delete => {
                if self.cursor >= self.len() {
                    return InputResult::Continue;
                }
                self.remove_at_cursor();
                InputResult::Changed
            }
            KeyCode::Char('a') if ctrl => {
                self.cursor = 0;
                InputResult::Continue
            }
            KeyCode::Char('e') if ctrl => {
                self.cursor = self.len();
                InputResult::Continue
            }
            KeyCode::Char('u') if ctrl => {
                if self.text.is_empty() {
                    return InputResult::Continue;
                }
                self.clear();
                InputResult::Changed
            }
            KeyCode::Char('w') if ctrl => {
                if self.delete_word_back() {
                    InputResult::Changed
                } else {
                    InputResult::Continue
                }
            }
            KeyCode::Char(ch) if !ctrl && !key.modifiers.contains(KeyModifiers::ALT) => {
                let byte_offset = self.char_to_byte(self.cursor);
                self.text.insert(byte_offset, ch);
                self.cursor += 1;
                InputResult::Changed
            }
            _ => InputResult::Ignored,
        }
    }

    fn len(&self) -> usize {
        self.text.chars().count()
    }

    fn remove_at_cursor(&mut self) {
        let byte_offset = self.char_to_byte(self.cursor);
        if let Some(ch) = self.text[byte_offset..].chars().next() {
            self.text
                .replace_range(byte_offset..byte_offset + ch.len_utf8(), "");
        }
    }

    /// Convert char index to byte offset.
    fn char_to_byte(&self, char_idx: usize) -> usize {
        self.text
            .char_indices()
            .nth(char_idx)
            .map(|(b, _)| b)
            .unwrap_or(self.text.len())
    }

    /// Delete word before cursor (unix-word-rubout: skip whitespace, then non-whitespace).
    fn delete_word_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        let chars: Vec<char> = self.text.chars().collect();
        let mut pos = self.cursor;

        while pos > 0 && chars[pos - 1].is_whitespace() {
            pos -= 1;
        }
        while pos > 0 && !chars[pos - 1].is_whitespace() {
            pos -= 1;
        }

        let start_byte = self.char_to_byte(pos);
        let end_byte = self.char_to_byte(self.cursor);
        self.text.replace_range(start_byte..end_byte, "");
        self.cursor = pos;
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn ctrl(ch: char) -> KeyEvent {
        KeyEvent::new(KeyCode::Char(ch), KeyModifiers::CONTROL)
    }

    fn typed(text: &str) -> LineInput {
        let mut input = LineInput::default();
        for ch in text.chars() {
            input.handle(key(KeyCode::Char(ch)));
        }
        input
    }

    #[test]
    fn typing_reports_changes() {
        let mut input = LineInput::default();
        assert_eq!(input.handle(key(KeyCode::Char('s'))), InputResult::Changed);
        assert_eq!(input.value(), "s");
        assert_eq!(input.handle(key(KeyCode::Left)), InputResult::Continue);
        assert_eq!(input.handle(key(KeyCode::Enter)), InputResult::Submit);
        assert_eq!(input.handle(key(KeyCode::Esc)), InputResult::Cancel);
    }

    #[test]
    fn insert_in_the_middle() {
        let mut input = typed("snwy");
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Left));
        input.handle(key(KeyCode::Char('o')));
        assert_eq!(input.value(), "snowy");
        assert_eq!(input.render_parts(), ("sno", Some('w'), "y"));
    }

    #[test]
    fn backspace_and_delete_respect_bounds() {
        let mut input = typed("ab");
        assert_eq!(input.handle(key(KeyCode::Delete)), InputResult::Continue);
        assert_eq!(input.handle(key(KeyCode::Backspace)), InputResult::Changed);
        assert_eq!(input.value(), "a");
        input.handle(key(KeyCode::Home));
        assert_eq!(input.handle(key(KeyCode::Backspace)), InputResult::Continue);
        assert_eq!(input.handle(key(KeyCode::Delete)), InputResult::Changed);
        assert_eq!(input.value(), "");
    }

    #[test]
    fn multibyte_editing() {
        let mut input = typed("café");
        input.handle(key(KeyCode::Backspace));
        assert_eq!(input.value(), "caf");
        input.handle(key(KeyCode::Char('é')));
        input.handle(key(KeyCode::Left));
        assert_eq!(input.render_parts(), ("caf", Some('é'), ""));
    }

    #[test]
    fn ctrl_w_deletes_previous_word() {
        let mut input = typed("we go inside ");
        assert_eq!(input.handle(ctrl('w')), InputResult::Changed);
        assert_eq!(input.value(), "we go ");
        input.handle(key(KeyCode::Home));
        assert_eq!(input.handle(ctrl('w')), InputResult::Continue);
    }

    #[test]
    fn ctrl_u_clears_and_ctrl_a_e_move() {
        let mut input = typed("snow");
        input.handle(ctrl('a'));
        assert_eq!(input.render_parts(), ("", Some('s'), "now"));
        input.handle(ctrl('e'));
        assert_eq!(input.render_parts(), ("snow", None, ""));
        assert_eq!(input.handle(ctrl('u')), InputResult::Changed);
        assert!(input.is_blank());
    }

    #[test]
    fn unbound_keys_are_ignored() {
        let mut input = LineInput::new("x");
        assert_eq!(input.handle(key(KeyCode::F(5))), InputResult::Ignored);
        assert_eq!(input.handle(ctrl('r')), InputResult::Ignored);
        assert_eq!(input.value(), "x");
    }

    #[test]
    fn set_moves_cursor_to_end() {
        let mut input = LineInput::default();
        input.set("26th");
        assert_eq!(input.render_parts(), ("26th", None, ""));
    }
}
