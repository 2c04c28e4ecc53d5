//! Core lexer implementation.

use faxc_util::{DiagnosticBuilder, Handler, SourceLoc};

use crate::cursor::Cursor;
use crate::token::Token;

/// Lexer producing a lazy stream of [`Token`]s from source text.
///
/// Every character not recognized as whitespace, a comment, a digit, an
/// identifier/keyword start, or `(`/`)`/`,` falls through to `Token::Char`
/// so the parser can treat it as a candidate operator.
pub struct Lexer<'a> {
    pub cursor: Cursor<'a>,
    pub handler: &'a mut Handler,
    /// Byte offset of the token currently being produced.
    pub token_start: usize,
    token_start_line: u32,
    token_start_col: u32,
}

impl<'a> Lexer<'a> {
    pub fn new(source: &'a str, handler: &'a mut Handler) -> Self {
        Self {
            cursor: Cursor::new(source),
            handler,
            token_start: 0,
            token_start_line: 1,
            token_start_col: 0,
        }
    }

    /// Returns the next token, or `Token::End` at end of input.
    pub fn next_token(&mut self) -> Token {
        self.skip_whitespace_and_comments();

        self.token_start = self.cursor.position();
        self.token_start_line = self.cursor.line();
        self.token_start_col = self.cursor.column();

        if self.cursor.is_at_end() {
            return Token::End;
        }

        match self.cursor.current_char() {
            c if crate::unicode::is_ascii_ident_start(c) => self.lex_identifier(),
            c if c.is_ascii_digit() => self.lex_number(),
            c => {
                self.cursor.advance();
                Token::Char(c)
            }
        }
    }

    /// The source location of the start of the token most recently
    /// returned by [`next_token`](Self::next_token).
    pub fn token_loc(&self) -> SourceLoc {
        SourceLoc::new(self.token_start_line, self.token_start_col)
    }

    pub fn report_error(&mut self, message: String) {
        DiagnosticBuilder::error(message).loc(self.token_loc()).emit(self.handler);
    }
}

impl<'a> Iterator for Lexer<'a> {
    type Item = Token;

    fn next(&mut self) -> Option<Self::Item> {
        let token = self.next_token();
        if token == Token::End {
            None
        } else {
            Some(token)
        }
    }
}
