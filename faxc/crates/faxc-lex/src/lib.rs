//! Lexical analysis: turns source text into a lazy stream of [`Token`]s,
//! each paired on demand with the [`faxc_util::SourceLoc`] of its first
//! character.

pub mod cursor;
mod lexer;
pub mod token;
pub mod unicode;

pub use lexer::Lexer;
pub use token::Token;
