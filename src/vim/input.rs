/// Editable text with a character cursor. Newlines are allowed, so the
/// same buffer backs one-line fields and the contract text area.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct InputBuffer {
    content: String,
    cursor: usize,
}

impl InputBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(value: &str) -> Self {
        let mut buffer = Self::new();
        buffer.set(value);
        buffer
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_empty(&self) -> bool {
        self.content.is_empty()
    }

    pub fn len(&self) -> usize {
        self.content.chars().count()
    }

    pub fn insert(&mut self, c: char) {
        let byte_pos = self.byte_position(self.cursor);
        self.content.insert(byte_pos, c);
        self.cursor += 1;
    }

    /// Insert pasted text at the cursor. `\r\n` and lone `\r` become `\n`.
    pub fn insert_str(&mut self, text: &str) {
        let text = text.replace("\r\n", "\n").replace('\r', "\n");
        let byte_pos = self.byte_position(self.cursor);
        self.content.insert_str(byte_pos, &text);
        self.cursor += text.chars().count();
    }

    pub fn delete_back(&mut self) -> bool {
        if self.cursor == 0 {
            return false;
        }
        self.cursor -= 1;
        self.remove_at_cursor();
        true
    }

    pub fn delete_forward(&mut self) -> bool {
        if self.cursor >= self.len() {
            return false;
        }
        self.remove_at_cursor();
        true
    }

    pub fn move_left(&mut self) {
        if self.cursor > 0 {
            self.cursor -= 1;
        }
    }

    pub fn move_right(&mut self) {
        if self.cursor < self.len() {
            self.cursor += 1;
        }
    }

    /// Start of the current line
    pub fn move_start(&mut self) {
        self.cursor = self.line_start(self.cursor);
    }

    /// End of the current line
    pub fn move_end(&mut self) {
        self.cursor = self.line_end(self.cursor);
    }

    pub fn move_up(&mut self) {
        let start = self.line_start(self.cursor);
        if start == 0 {
            return;
        }
        let column = self.cursor - start;
        let prev_start = self.line_start(start - 1);
        self.cursor = (prev_start + column).min(start - 1);
    }

    pub fn move_down(&mut self) {
        let end = self.line_end(self.cursor);
        if end >= self.len() {
            return;
        }
        let column = self.cursor - self.line_start(self.cursor);
        let next_start = end + 1;
        self.cursor = (next_start + column).min(self.line_end(next_start));
    }

    pub fn clear(&mut self) {
        self.content.clear();
        self.cursor = 0;
    }

    pub fn set(&mut self, value: &str) {
        self.content = value.to_string();
        self.cursor = self.len();
    }

    /// Zero-based (line, column) of the cursor
    pub fn cursor_position(&self) -> (usize, usize) {
        let before: Vec<char> = self.content.chars().take(self.cursor).collect();
        let line = before.iter().filter(|&&c| c == '\n').count();
        let column = self.cursor - self.line_start(self.cursor);
        (line, column)
    }

    pub fn line_count(&self) -> usize {
        self.content.split('\n').count()
    }

    fn line_start(&self, pos: usize) -> usize {
        self.content
            .chars()
            .take(pos)
            .enumerate()
            .filter(|(_, c)| *c == '\n')
            .last()
            .map(|(i, _)| i + 1)
            .unwrap_or(0)
    }

    fn line_end(&self, pos: usize) -> usize {
        self.content
            .chars()
            .enumerate()
            .skip(pos)
            .find(|(_, c)| *c == '\n')
            .map(|(i, _)| i)
            .unwrap_or_else(|| self.len())
    }

    fn remove_at_cursor(&mut self) {
        let byte_pos = self.byte_position(self.cursor);
        let next_byte_pos = self.byte_position(self.cursor + 1);
        self.content.drain(byte_pos..next_byte_pos);
    }

    fn byte_position(&self, pos: usize) -> usize {
        self.content
            .char_indices()
            .nth(pos)
            .map(|(i, _)| i)
            .unwrap_or(self.content.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn edits_multibyte_text() {
        let mut buffer = InputBuffer::with_content("CLÁUSULA");
        buffer.move_left();
        buffer.move_left();
        buffer.move_left();
        buffer.move_left();
        buffer.move_left();
        assert!(buffer.delete_back());
        assert_eq!(buffer.content(), "CLUSULA");
        buffer.insert('Á');
        assert_eq!(buffer.content(), "CLÁUSULA");
        assert_eq!(buffer.cursor(), 3);
    }

    #[test]
    fn paste_normalizes_line_endings() {
        let mut buffer = InputBuffer::new();
        buffer.insert_str("a\r\nb\rc");
        assert_eq!(buffer.content(), "a\nb\nc");
        assert_eq!(buffer.cursor(), 5);
        assert_eq!(buffer.line_count(), 3);
        assert_eq!(buffer.cursor_position(), (2, 1));
    }

    #[test]
    fn home_and_end_stay_on_the_line() {
        let mut buffer = InputBuffer::with_content("first\nsecond");
        buffer.move_start();
        assert_eq!(buffer.cursor_position(), (1, 0));
        buffer.move_end();
        assert_eq!(buffer.cursor_position(), (1, 6));
    }

    #[test]
    fn vertical_moves_clamp_to_line_length() {
        let mut buffer = InputBuffer::with_content("ab\nlonger line");
        buffer.move_up();
        assert_eq!(buffer.cursor_position(), (0, 2));
        buffer.move_up();
        assert_eq!(buffer.cursor_position(), (0, 2));

        buffer.move_start();
        buffer.move_down();
        assert_eq!(buffer.cursor_position(), (1, 0));
        buffer.move_down();
        assert_eq!(buffer.cursor_position(), (1, 0));
    }

    #[test]
    fn delete_at_bounds_is_a_no_op() {
        let mut buffer = InputBuffer::new();
        assert!(!buffer.delete_back());
        assert!(!buffer.delete_forward());

        buffer.set("x");
        buffer.move_start();
        assert!(buffer.delete_forward());
        assert!(buffer.is_empty());
    }
}
