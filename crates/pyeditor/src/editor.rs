use ropey::Rope;
use std::cmp;
use unicode_width::UnicodeWidthChar;

/// Whether a key handler consumed the event or left it to the default handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventFlow {
    Continue,
    Break,
}

/// Insert position shown in the status bar: line counts from 1, column from 0.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CursorPosition {
    pub line: usize,
    pub column: usize,
}

/// The editable document and its cursor.
#[derive(Clone)]
pub struct Editor {
    rope: Rope,
    cursor_line: usize,
    cursor_col: usize,
    viewport_offset: usize,
    viewport_height: usize,
    modified: bool,
    focused: bool,
    indent_pad: String,
}

impl Editor {
    pub fn new() -> Self {
        Self::with_indent_width(4)
    }

    pub fn with_indent_width(width: usize) -> Self {
        Self {
            rope: Rope::new(),
            cursor_line: 0,
            cursor_col: 0,
            viewport_offset: 0,
            viewport_height: 24, // Updated on every draw
            modified: false,
            focused: false,
            indent_pad: " ".repeat(width),
        }
    }

    /// The whole document with surrounding whitespace stripped.
    pub fn get_content(&self) -> String {
        self.rope.to_string().trim_matches(is_strippable).to_string()
    }

    /// Replace the document, put the cursor at the start and take focus.
    pub fn set_content(&mut self, text: &str) {
        log::info!("insert {} bytes listing", text.len());
        self.rope = Rope::from_str(&normalize_newlines(text));
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.viewport_offset = 0;
        self.modified = false;
        self.focus();
    }

    /// Tab indents with spaces instead of inserting a tab character.
    pub fn tab_event(&mut self) -> EventFlow {
        log::debug!("Tab event");
        let pad = self.indent_pad.clone();
        self.insert_str(&pad);
        EventFlow::Break
    }

    pub fn focus(&mut self) {
        self.focused = true;
    }

    pub fn has_focus(&self) -> bool {
        self.focused
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    pub fn mark_saved(&mut self) {
        self.modified = false;
    }

    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// Zero-based (line, column) of the cursor.
    pub fn cursor(&self) -> (usize, usize) {
        (self.cursor_line, self.cursor_col)
    }

    pub fn cursor_position(&self) -> CursorPosition {
        CursorPosition {
            line: self.cursor_line + 1,
            column: self.cursor_col,
        }
    }

    pub fn set_cursor_position(&mut self, line: usize, col: usize) {
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = line.min(max_line);
        self.cursor_col = col.min(self.line_len(self.cursor_line));
        self.adjust_viewport();
    }

    pub fn set_viewport_height(&mut self, height: usize) {
        self.viewport_height = height.max(1);
        self.adjust_viewport();
    }

    pub fn viewport_offset(&self) -> usize {
        self.viewport_offset
    }

    /// Visible lines without their line breaks, tabs expanded to the indent width.
    pub fn viewport_lines(&self) -> Vec<String> {
        let end_line = cmp::min(
            self.viewport_offset + self.viewport_height,
            self.rope.len_lines(),
        );

        (self.viewport_offset..end_line)
            .map(|i| {
                self.rope
                    .line(i)
                    .chars()
                    .take(self.line_len(i))
                    .map(|c| if c == '\t' { self.indent_pad.clone() } else { c.to_string() })
                    .collect()
            })
            .collect()
    }

    /// Screen column of the cursor within its line.
    pub fn cursor_display_col(&self) -> usize {
        self.rope
            .line(self.cursor_line)
            .chars()
            .take(self.cursor_col)
            .map(|c| self.char_width(c))
            .sum()
    }

    /// Move the cursor to a click at `row` lines below the viewport top and `display_col`
    /// screen columns from the left edge of the text.
    pub fn click_at(&mut self, row: usize, display_col: usize) {
        let line = cmp::min(
            self.viewport_offset + row,
            self.rope.len_lines().saturating_sub(1),
        );

        let mut width = 0;
        let mut col = 0;
        for c in self.rope.line(line).chars().take(self.line_len(line)) {
            let w = self.char_width(c);
            if width + w > display_col {
                break;
            }
            width += w;
            col += 1;
        }

        self.cursor_line = line;
        self.cursor_col = col;
        self.adjust_viewport();
    }

    pub fn insert_char(&mut self, c: char) {
        if c == '\n' {
            self.insert_newline();
            return;
        }
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, c);
        self.cursor_col += 1;
        self.modified = true;
    }

    pub fn insert_str(&mut self, text: &str) {
        if text.is_empty() {
            return;
        }
        let text = normalize_newlines(text);
        let char_idx = self.cursor_char_idx();
        self.rope.insert(char_idx, &text);
        self.move_to_char_idx(char_idx + text.chars().count());
        self.modified = true;
    }

    pub fn insert_newline(&mut self) {
        let char_idx = self.cursor_char_idx();
        self.rope.insert_char(char_idx, '\n');
        self.cursor_line += 1;
        self.cursor_col = 0;
        self.modified = true;
        self.adjust_viewport();
    }

    pub fn delete_char_backward(&mut self) {
        let char_idx = self.cursor_char_idx();
        if char_idx == 0 {
            return;
        }
        self.move_to_char_idx(char_idx - 1);
        self.rope.remove(char_idx - 1..char_idx);
        self.modified = true;
    }

    pub fn delete_char_forward(&mut self) {
        let char_idx = self.cursor_char_idx();
        if char_idx < self.rope.len_chars() {
            self.rope.remove(char_idx..char_idx + 1);
            self.modified = true;
        }
    }

    pub fn move_cursor_up(&mut self) {
        if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.adjust_cursor_col();
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_down(&mut self) {
        if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.adjust_cursor_col();
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_left(&mut self) {
        if self.cursor_col > 0 {
            self.cursor_col -= 1;
        } else if self.cursor_line > 0 {
            self.cursor_line -= 1;
            self.cursor_col = self.line_len(self.cursor_line);
            self.adjust_viewport();
        }
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_col < self.line_len(self.cursor_line) {
            self.cursor_col += 1;
        } else if self.cursor_line + 1 < self.rope.len_lines() {
            self.cursor_line += 1;
            self.cursor_col = 0;
            self.adjust_viewport();
        }
    }

    pub fn move_to_line_start(&mut self) {
        self.cursor_col = 0;
    }

    pub fn move_to_line_end(&mut self) {
        self.cursor_col = self.line_len(self.cursor_line);
    }

    pub fn page_up(&mut self) {
        self.cursor_line = self.cursor_line.saturating_sub(self.viewport_height);
        self.viewport_offset = self.viewport_offset.saturating_sub(self.viewport_height);
        self.adjust_cursor_col();
        self.adjust_viewport();
    }

    pub fn page_down(&mut self) {
        let max_line = self.rope.len_lines().saturating_sub(1);
        self.cursor_line = cmp::min(self.cursor_line + self.viewport_height, max_line);
        self.viewport_offset = cmp::min(
            self.viewport_offset + self.viewport_height,
            max_line.saturating_sub(self.viewport_height - 1),
        );
        self.adjust_cursor_col();
        self.adjust_viewport();
    }

    /// Characters on `line`, line break excluded.
    fn line_len(&self, line: usize) -> usize {
        let Some(slice) = self.rope.get_line(line) else {
            return 0;
        };
        let mut len = slice.len_chars();
        if len > 0 && slice.char(len - 1) == '\n' {
            len -= 1;
            if len > 0 && slice.char(len - 1) == '\r' {
                len -= 1;
            }
        }
        len
    }

    fn char_width(&self, c: char) -> usize {
        if c == '\t' {
            self.indent_pad.len()
        } else {
            c.width().unwrap_or(0)
        }
    }

    fn cursor_char_idx(&self) -> usize {
        self.rope.line_to_char(self.cursor_line) + self.cursor_col
    }

    fn move_to_char_idx(&mut self, char_idx: usize) {
        let char_idx = char_idx.min(self.rope.len_chars());
        self.cursor_line = self.rope.char_to_line(char_idx);
        self.cursor_col = char_idx - self.rope.line_to_char(self.cursor_line);
        self.adjust_viewport();
    }

    fn adjust_cursor_col(&mut self) {
        self.cursor_col = cmp::min(self.cursor_col, self.line_len(self.cursor_line));
    }

    fn adjust_viewport(&mut self) {
        if self.cursor_line < self.viewport_offset {
            self.viewport_offset = self.cursor_line;
        } else if self.cursor_line >= self.viewport_offset + self.viewport_height {
            self.viewport_offset = self.cursor_line + 1 - self.viewport_height;
        }
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new()
    }
}

/// Unicode whitespace plus the ASCII separators U+001C..U+001F, which Python's
/// `str.strip` also removes.
fn is_strippable(c: char) -> bool {
    c.is_whitespace() || ('\u{1c}'..='\u{1f}').contains(&c)
}

/// Windows and classic Mac line endings become `\n`.
fn normalize_newlines(text: &str) -> String {
    text.replace("\r\n", "\n").replace('\r', "\n")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_editor_creation() {
        let editor = Editor::new();
        assert_eq!(editor.cursor(), (0, 0));
        assert_eq!(editor.line_count(), 1); // Empty editor has one empty line
        assert!(!editor.is_modified());
        assert!(!editor.has_focus());
    }

    #[test]
    fn test_content_round_trip_strips_whitespace() {
        let mut editor = Editor::new();
        for text in ["", "x", "  indented\n", "\n\nprint(1)\n\n", "a\n  b  \n", " \t \n"] {
            editor.set_content(text);
            assert_eq!(editor.get_content(), text.trim());
        }
    }

    #[test]
    fn test_get_content_strips_trailing_blank_lines() {
        let mut editor = Editor::new();
        editor.set_content("print('hi')  \n\n");
        assert_eq!(editor.get_content(), "print('hi')");
    }

    #[test]
    fn test_get_content_strips_ascii_separators() {
        let mut editor = Editor::new();
        editor.set_content("\u{1c}\u{1f} print(1)\u{1d}\n\u{1e}");
        assert_eq!(editor.get_content(), "print(1)");
    }

    #[test]
    fn test_set_content_normalizes_crlf() {
        let mut editor = Editor::new();
        editor.set_content("a = 1\r\nb = 2\r\n");
        assert_eq!(editor.get_content(), "a = 1\nb = 2");
        assert_eq!(editor.line_count(), 3);

        editor.set_content("old\rmac");
        assert_eq!(editor.get_content(), "old\nmac");
    }

    #[test]
    fn test_backspace_joins_crlf_lines() {
        let mut editor = Editor::new();
        editor.set_content("ab\r\ncd");
        editor.set_cursor_position(1, 0);
        editor.delete_char_backward();
        assert_eq!(editor.get_content(), "abcd");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_set_content_resets_cursor_and_focuses() {
        let mut editor = Editor::new();
        editor.set_content("one\ntwo\nthree");
        editor.set_cursor_position(2, 3);
        editor.insert_char('!');

        editor.set_content("new\ncontent");
        assert_eq!(editor.cursor_position(), CursorPosition { line: 1, column: 0 });
        assert_eq!(editor.viewport_offset(), 0);
        assert!(editor.has_focus());
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_tab_event_inserts_indent_pad() {
        let mut editor = Editor::new();
        editor.set_content("ab");
        editor.move_cursor_right();

        assert_eq!(editor.tab_event(), EventFlow::Break);
        assert_eq!(editor.get_content(), "a    b");
        assert_eq!(editor.cursor(), (0, 5));
        assert!(!editor.get_content().contains('\t'));
    }

    #[test]
    fn test_tab_width_follows_configuration() {
        let mut editor = Editor::with_indent_width(2);
        editor.set_content("x");
        editor.tab_event();
        assert_eq!(editor.get_content(), "x");
        assert_eq!(editor.rope.to_string(), "  x");
    }

    #[test]
    fn test_text_insertion() {
        let mut editor = Editor::new();
        editor.insert_char('H');
        editor.insert_char('i');

        assert_eq!(editor.get_content(), "Hi");
        assert_eq!(editor.cursor(), (0, 2));
        assert!(editor.is_modified());
    }

    #[test]
    fn test_newline_insertion() {
        let mut editor = Editor::new();
        editor.insert_char('H');
        editor.insert_char('i');
        editor.insert_newline();
        editor.insert_char('!');

        assert_eq!(editor.get_content(), "Hi\n!");
        assert_eq!(editor.cursor_position(), CursorPosition { line: 2, column: 1 });
        assert_eq!(editor.line_count(), 2);
    }

    #[test]
    fn test_insert_str_moves_cursor_past_text() {
        let mut editor = Editor::new();
        editor.set_content("end");
        editor.insert_str("for i in x:\r\n    pass\n");

        assert_eq!(editor.rope.to_string(), "for i in x:\n    pass\nend");
        assert_eq!(editor.cursor(), (2, 0));
    }

    #[test]
    fn test_backspace_joins_lines() {
        let mut editor = Editor::new();
        editor.set_content("ab\ncd");
        editor.set_cursor_position(1, 0);
        editor.delete_char_backward();

        assert_eq!(editor.get_content(), "abcd");
        assert_eq!(editor.cursor(), (0, 2));
    }

    #[test]
    fn test_backspace_at_start_is_noop() {
        let mut editor = Editor::new();
        editor.set_content("abc");
        editor.delete_char_backward();
        assert_eq!(editor.get_content(), "abc");
        assert!(!editor.is_modified());
    }

    #[test]
    fn test_delete_forward() {
        let mut editor = Editor::new();
        editor.set_content("abc");
        editor.delete_char_forward();
        assert_eq!(editor.get_content(), "bc");
    }

    #[test]
    fn test_cursor_movement() {
        let mut editor = Editor::new();
        editor.set_content("Hello\nWorld");

        editor.move_cursor_right();
        assert_eq!(editor.cursor(), (0, 1));

        editor.move_cursor_down();
        assert_eq!(editor.cursor(), (1, 1));

        editor.move_cursor_left();
        editor.move_cursor_left();
        assert_eq!(editor.cursor(), (0, 5));

        editor.move_cursor_right();
        assert_eq!(editor.cursor(), (1, 0));

        editor.move_to_line_end();
        assert_eq!(editor.cursor(), (1, 5));

        editor.move_cursor_up();
        editor.move_to_line_start();
        assert_eq!(editor.cursor(), (0, 0));
    }

    #[test]
    fn test_vertical_motion_clamps_column() {
        let mut editor = Editor::new();
        editor.set_content("a long line\nab");
        editor.move_to_line_end();
        editor.move_cursor_down();
        assert_eq!(editor.cursor(), (1, 2));
    }

    #[test]
    fn test_set_cursor_position_clamps() {
        let mut editor = Editor::new();
        editor.set_content("abc\nde");
        editor.set_cursor_position(10, 10);
        assert_eq!(editor.cursor(), (1, 2));
    }

    #[test]
    fn test_viewport_follows_cursor() {
        let mut editor = Editor::new();
        let text = (1..=50).map(|i| i.to_string()).collect::<Vec<_>>().join("\n");
        editor.set_content(&text);
        editor.set_viewport_height(10);

        editor.set_cursor_position(30, 0);
        assert_eq!(editor.viewport_offset(), 21);
        assert_eq!(editor.viewport_lines().first().map(String::as_str), Some("22"));

        editor.page_up();
        assert_eq!(editor.cursor(), (20, 0));
        assert!(editor.viewport_offset() <= 20);
    }

    #[test]
    fn test_viewport_lines_expand_tabs() {
        let mut editor = Editor::new();
        editor.set_content("\tx\r\ny");
        assert_eq!(editor.viewport_lines(), vec!["    x".to_string(), "y".to_string()]);
    }

    #[test]
    fn test_click_maps_display_columns() {
        let mut editor = Editor::new();
        editor.set_content("全角ab\nxyz");

        editor.click_at(0, 4);
        assert_eq!(editor.cursor(), (0, 2));

        editor.click_at(0, 3);
        assert_eq!(editor.cursor(), (0, 1));

        editor.click_at(5, 99);
        assert_eq!(editor.cursor(), (1, 3));
    }

    #[test]
    fn test_cursor_display_col_counts_wide_chars() {
        let mut editor = Editor::new();
        editor.set_content("全角ab");
        editor.set_cursor_position(0, 3);
        assert_eq!(editor.cursor_display_col(), 5);
    }

    #[test]
    fn test_modified_state() {
        let mut editor = Editor::new();
        assert!(!editor.is_modified());

        editor.insert_char('a');
        assert!(editor.is_modified());

        editor.mark_saved();
        assert!(!editor.is_modified());
    }
}
