//! Diagnostic collection — the user-facing error channel shared by the
//! lexer, parser, and lowering pass.
//!
//! # Examples
//!
//! ```
//! use faxc_util::diagnostic::{DiagnosticBuilder, Handler};
//! use faxc_util::SourceLoc;
//!
//! let mut handler = Handler::new();
//! DiagnosticBuilder::error("unexpected token").loc(SourceLoc::START).emit(&mut handler);
//! assert!(handler.has_errors());
//! ```

mod builder;

pub use builder::DiagnosticBuilder;

use crate::SourceLoc;

/// A single recorded error, in the order it was raised.
#[derive(Clone, Debug, PartialEq)]
pub struct Diagnostic {
    pub message: String,
    pub loc: SourceLoc,
}

/// Collects diagnostics in order. Never aborts; callers decide how (or
/// whether) to recover after reporting one.
#[derive(Debug, Default)]
pub struct Handler {
    diagnostics: Vec<Diagnostic>,
}

impl Handler {
    pub fn new() -> Self {
        Self { diagnostics: Vec::new() }
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.diagnostics.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        !self.diagnostics.is_empty()
    }

    pub fn diagnostics(&self) -> &[Diagnostic] {
        &self.diagnostics
    }

    /// Writes every diagnostic to `out`, one per line, formatted
    /// `Error at <line>:<col>: <message>`, in the order they were raised.
    pub fn print_to(&self, out: &mut dyn std::io::Write) -> std::io::Result<()> {
        for diag in &self.diagnostics {
            writeln!(out, "Error at {}: {}", diag.loc, diag.message)?;
        }
        Ok(())
    }
}
