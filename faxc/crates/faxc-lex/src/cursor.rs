//! Character cursor for traversing source code.
//!
//! The source language is ASCII-only, so the cursor never has to deal with
//! multi-byte characters or grapheme boundaries.

/// A cursor for traversing source code character by character.
pub struct Cursor<'a> {
    source: &'a str,
    position: usize,
    line: u32,
    /// 0-based column, resets to 0 at every `\n`.
    column: u32,
}

impl<'a> Cursor<'a> {
    pub fn new(source: &'a str) -> Self {
        Self { source, position: 0, line: 1, column: 0 }
    }

    /// The character at the cursor, or `'\0'` at end of input.
    pub fn current_char(&self) -> char {
        self.peek_char(0)
    }

    /// The character `offset` bytes ahead of the cursor, or `'\0'` past the end.
    pub fn peek_char(&self, offset: usize) -> char {
        let pos = self.position + offset;
        self.source.as_bytes().get(pos).map(|&b| b as char).unwrap_or('\0')
    }

    /// Advances past the current character, updating line/column.
    pub fn advance(&mut self) {
        if let Some(&b) = self.source.as_bytes().get(self.position) {
            self.position += 1;
            if b == b'\n' {
                self.line += 1;
                self.column = 0;
            } else {
                self.column += 1;
            }
        }
    }

    pub fn is_at_end(&self) -> bool {
        self.position >= self.source.len()
    }

    /// Consumes the current character if it equals `expected`.
    pub fn match_char(&mut self, expected: char) -> bool {
        if self.current_char() == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    pub fn line(&self) -> u32 {
        self.line
    }

    pub fn column(&self) -> u32 {
        self.column
    }

    pub fn position(&self) -> usize {
        self.position
    }

    /// The source text from `start` (a byte offset) up to the cursor.
    pub fn slice_from(&self, start: usize) -> &'a str {
        &self.source[start..self.position]
    }
}
