//! Number literal lexing.

use crate::token::Token;
use crate::Lexer;

impl<'a> Lexer<'a> {
    /// Lexes a numeric literal: greedily consumes `[0-9.]` characters and
    /// parses the result as `f64`. A malformed literal (e.g. two decimal
    /// points) is not reported as an error; it silently parses to `0.0`,
    /// matching how the rest of the lexer never aborts on bad input.
    pub fn lex_number(&mut self) -> Token {
        let start = self.cursor.position();
        while self.cursor.current_char().is_ascii_digit() || self.cursor.current_char() == '.' {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(start);
        Token::Number(text.parse::<f64>().unwrap_or(0.0))
    }
}
