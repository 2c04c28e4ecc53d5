//! Semantic lowering: walks the parsed AST and drives an [`ir::IrBuilder`]
//! back-end, threading a named-value environment and a prototype table
//! through the walk so recursive and forward-referenced calls resolve.

pub mod env;
pub mod ir;
pub mod lower;
pub mod proto;

pub use env::Environment;
pub use ir::IrBuilder;
pub use lower::{LowerError, Lowerer, ENTRY_POINT_NAME};
pub use proto::PrototypeTable;
