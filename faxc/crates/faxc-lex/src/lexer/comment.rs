//! Comment and whitespace skipping.
//!
//! Comments run from `#` to the end of the line, as in the source
//! language's reference implementation.

use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Skips whitespace and `#`-comments. Called before lexing each token.
    pub fn skip_whitespace_and_comments(&mut self) {
        loop {
            if self.cursor.is_at_end() {
                return;
            }
            match self.cursor.current_char() {
                ' ' | '\t' | '\r' | '\n' => self.cursor.advance(),
                '#' => self.skip_line_comment(),
                _ => return,
            }
        }
    }

    fn skip_line_comment(&mut self) {
        while !self.cursor.is_at_end() && self.cursor.current_char() != '\n' {
            self.cursor.advance();
        }
    }
}
