//! Shared foundation types used by every stage of the compiler: interned
//! identifiers, source locations, the diagnostic sink, and the mutable
//! operator precedence table the parser and lowering pass both touch.

pub mod diagnostic;
pub mod precedence;
pub mod span;
pub mod symbol;

pub use diagnostic::{Diagnostic, DiagnosticBuilder, Handler};
pub use precedence::PrecedenceTable;
pub use span::SourceLoc;
pub use symbol::{
    Symbol, KW_BINARY, KW_ELSE, KW_FN, KW_IF, KW_IN, KW_LET, KW_THEN, KW_UNARY, KW_USING,
};

pub use rustc_hash::{FxHashMap, FxHashSet};
