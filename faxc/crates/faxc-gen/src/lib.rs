//! LLVM IR code generation for the compiler: an [`faxc_sem::IrBuilder`]
//! back-end plus the object-file/linker tail of the pipeline.

pub mod error;
pub mod linker;
pub mod llvm;

pub use error::{CodeGenError, Result};
pub use linker::*;
pub use llvm::*;
