//! Identifier and keyword lexing.

use crate::token::{keyword_from_ident, Token};
use crate::unicode::is_ascii_ident_continue;
use crate::Lexer;
use faxc_util::Symbol;

impl<'a> Lexer<'a> {
    /// Lexes an identifier or keyword: a letter followed by alphanumerics,
    /// checked against the reserved-word table.
    pub fn lex_identifier(&mut self) -> Token {
        while is_ascii_ident_continue(self.cursor.current_char()) {
            self.cursor.advance();
        }
        let text = self.cursor.slice_from(self.token_start);
        keyword_from_ident(text).unwrap_or_else(|| Token::Identifier(Symbol::intern(text)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex_ident(source: &str) -> Token {
        let mut handler = faxc_util::Handler::new();
        let mut lexer = crate::Lexer::new(source, &mut handler);
        lexer.lex_identifier()
    }

    #[test]
    fn plain_identifier() {
        assert_eq!(lex_ident("foobar"), Token::Identifier(Symbol::intern("foobar")));
    }

    #[test]
    fn identifier_with_trailing_digits() {
        assert_eq!(lex_ident("foo2"), Token::Identifier(Symbol::intern("foo2")));
    }

    #[test]
    fn underscore_does_not_continue_an_identifier() {
        assert_eq!(lex_ident("foo_bar"), Token::Identifier(Symbol::intern("foo")));
    }

    #[test]
    fn every_reserved_word_lexes_to_its_keyword() {
        assert_eq!(lex_ident("fn"), Token::Def);
        assert_eq!(lex_ident("using"), Token::Extern);
        assert_eq!(lex_ident("if"), Token::If);
        assert_eq!(lex_ident("then"), Token::Then);
        assert_eq!(lex_ident("else"), Token::Else);
        assert_eq!(lex_ident("binary"), Token::Binary);
        assert_eq!(lex_ident("unary"), Token::Unary);
        assert_eq!(lex_ident("let"), Token::Let);
        assert_eq!(lex_ident("in"), Token::In);
    }
}
