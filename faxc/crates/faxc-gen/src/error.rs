//! Error types for LLVM code generation
//!
//! This module defines error types for the faxc-gen crate, providing
//! proper error handling instead of panics.

use thiserror::Error;

/// Error type for LLVM code generation
#[derive(Debug, Error)]
pub enum CodeGenError {
    /// Redeclaring a function with a different arity than its first
    /// declaration.
    #[error("function '{0}' redeclared with a different arity")]
    FunctionArityMismatch(String),

    /// Function not found
    #[error("function '{0}' not found")]
    FunctionNotFound(String),

    /// No function body is currently open
    #[error("no function body is currently open")]
    NoOpenFunction,

    /// Compilation error (target, linking, etc.)
    #[error("compilation error: {0}")]
    CompilationError(String),

    /// Internal error - indicates a bug
    #[error("internal error: {0}")]
    Internal(String),
}

/// Result type alias for code generation operations
pub type Result<T> = std::result::Result<T, CodeGenError>;
