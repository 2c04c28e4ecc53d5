//! ASCII identifier character classes.
//!
//! The language has no Unicode identifiers, and no underscore in
//! identifiers either — `[A-Za-z][A-Za-z0-9]*` is the whole grammar, so
//! `_x` lexes as `Char('_')` followed by an identifier `x`.

/// Whether `c` can start an identifier: a letter.
pub fn is_ascii_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic()
}

/// Whether `c` can continue an identifier once started.
pub fn is_ascii_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric()
}
