//! Source locations.
//!
//! A [`SourceLoc`] names the position of a single character in the source
//! text: a 1-based line and a 0-based column that resets at every `\n`.
//! Every token and every AST node carries the location of its leading
//! character so diagnostics never need to re-scan the source to find where
//! something went wrong.

use std::fmt;

/// A position in source text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SourceLoc {
    /// 1-based line number.
    pub line: u32,
    /// 0-based column, incrementing per character and resetting on `\n`.
    pub col: u32,
}

impl SourceLoc {
    /// The location of the first character of a fresh source stream.
    pub const START: SourceLoc = SourceLoc { line: 1, col: 0 };

    pub const fn new(line: u32, col: u32) -> Self {
        Self { line, col }
    }

    /// Advances this location past `c`, returning the location of the
    /// character that follows it.
    pub fn advance(self, c: char) -> Self {
        if c == '\n' {
            SourceLoc { line: self.line + 1, col: 0 }
        } else {
            SourceLoc { line: self.line, col: self.col + 1 }
        }
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}
