use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};

/// Multi-line editor backing the content tab: one list item per line.
#[derive(Clone, Debug)]
pub struct TextArea {
    lines: Vec<String>,
    row: usize,
    /// Column as a char index within `lines[row]`.
    col: usize,
    /// Set on any edit; cleared when text is loaded.
    dirty: bool,
}

impl Default for TextArea {
    fn default() -> Self {
        Self {
            lines: vec![String::new()],
            row: 0,
            col: 0,
            dirty: false,
        }
    }
}

impl TextArea {
    pub fn from_lines<S: AsRef<str>>(lines: &[S]) -> Self {
        let mut area = Self::default();
        area.set_lines(lines);
        area
    }

    /// Replace the buffer and move the cursor to the top.
    pub fn set_lines<S: AsRef<str>>(&mut self, lines: &[S]) {
        self.lines = lines.iter().map(|l| l.as_ref().to_string()).collect();
        if self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.row = 0;
        self.col = 0;
        self.dirty = false;
    }

    pub fn text(&self) -> String {
        self.lines.join("\n")
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    pub fn cursor(&self) -> (usize, usize) {
        (self.row, self.col)
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    /// Forget pending edits once the buffer matches what was stored.
    pub fn mark_clean(&mut self) {
        self.dirty = false;
    }

    /// Returns true when the key was consumed.
    pub fn handle(&mut self, key: KeyEvent) -> bool {
        if key.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        match key.code {
            KeyCode::Char(ch) => {
                let at = self.byte_col();
                self.lines[self.row].insert(at, ch);
                self.col += 1;
                self.dirty = true;
            }
            KeyCode::Enter => {
                let at = self.byte_col();
                let rest = self.lines[self.row].split_off(at);
                self.row += 1;
                self.lines.insert(self.row, rest);
                self.col = 0;
                self.dirty = true;
            }
            KeyCode::Backspace => {
                if self.col > 0 {
                    self.col -= 1;
                    self.remove_char_at_cursor();
                } else if self.row > 0 {
                    let line = self.lines.remove(self.row);
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                    self.lines[self.row].push_str(&line);
                }
                self.dirty = true;
            }
            KeyCode::Delete => {
                if self.col < self.line_len(self.row) {
                    self.remove_char_at_cursor();
                } else if self.row + 1 < self.lines.len() {
                    let next = self.lines.remove(self.row + 1);
                    self.lines[self.row].push_str(&next);
                }
                self.dirty = true;
            }
            KeyCode::Left => {
                if self.col > 0 {
                    self.col -= 1;
                } else if self.row > 0 {
                    self.row -= 1;
                    self.col = self.line_len(self.row);
                }
            }
            KeyCode::Right => {
                if self.col < self.line_len(self.row) {
                    self.col += 1;
                } else if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = 0;
                }
            }
            KeyCode::Up => {
                if self.row > 0 {
                    self.row -= 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
            }
            KeyCode::Down => {
                if self.row + 1 < self.lines.len() {
                    self.row += 1;
                    self.col = self.col.min(self.line_len(self.row));
                }
            }
            KeyCode::Home => self.col = 0,
            KeyCode::End => self.col = self.line_len(self.row),
            _ => return false,
        }
        true
    }

    fn line_len(&self, row: usize) -> usize {
        self.lines[row].chars().count()
    }

    fn byte_col(&self) -> usize {
        let line = &self.lines[self.row];
        line.char_indices()
            .nth(self.col)
            .map(|(b, _)| b)
            .unwrap_or(line.len())
    }

    fn remove_char_at_cursor(&mut self) {
        let at = self.byte_col();
        let line = &mut self.lines[self.row];
        if let Some(ch) = line[at..].chars().next() {
            line.replace_range(at..at + ch.len_utf8(), "");
        }
    }
}
