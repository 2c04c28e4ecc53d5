//! The IR-builder contract: the seam between lowering and a concrete
//! code-generation back-end.
//!
//! Lowering never touches LLVM (or any other back-end) directly; it only
//! calls methods on this trait, in the same shapes a hand-written LLVM
//! `if`/`then`/`else` codegen would use (three basic blocks joined by a
//! phi), so the same lowering pass can drive any back-end that
//! implements it.

use faxc_par::Prototype;
use faxc_util::Symbol;

pub trait IrBuilder: Sized {
    /// An SSA-ish value handle in the back-end's IR (e.g. an LLVM `f64` or
    /// pointer value).
    type Value: Clone;
    /// A declared-or-defined function handle.
    type Function: Clone;
    /// A basic block handle, for branching constructs.
    type Block: Clone;
    /// Whatever the back-end reports when it cannot build a requested
    /// operation (e.g. a redefinition with a mismatched arity).
    type Error: std::error::Error;

    /// A literal floating-point constant.
    fn const_number(&mut self, value: f64) -> Self::Value;

    /// Declares (or returns the existing declaration of) a function from
    /// its prototype, without requiring a body.
    fn declare_function(&mut self, proto: &Prototype) -> Result<Self::Function, Self::Error>;

    /// Opens the body of a previously declared function: creates its
    /// entry block and positions the builder there.
    fn begin_function_body(&mut self, function: &Self::Function) -> Self::Block;

    /// Reads the value of the `index`-th parameter inside the function
    /// whose body is currently open.
    fn function_param(&mut self, function: &Self::Function, index: usize) -> Self::Value;

    /// Allocates a fresh, uninitialized mutable storage cell for a local
    /// named `name` (a parameter or a `let` binding).
    fn alloca(&mut self, name: Symbol) -> Self::Value;

    fn store(&mut self, cell: &Self::Value, value: Self::Value);
    fn load(&mut self, cell: &Self::Value) -> Self::Value;

    fn build_binary(&mut self, op: char, lhs: Self::Value, rhs: Self::Value) -> Self::Value;

    fn build_call(
        &mut self,
        function: &Self::Function,
        args: Vec<Self::Value>,
    ) -> Result<Self::Value, Self::Error>;

    fn create_block(&mut self, name: &str) -> Self::Block;
    fn current_block(&mut self) -> Self::Block;
    fn set_current_block(&mut self, block: Self::Block);
    fn build_cond_branch(&mut self, cond: Self::Value, then_block: Self::Block, else_block: Self::Block);
    fn build_branch(&mut self, target: Self::Block);
    fn build_phi(&mut self, incoming: Vec<(Self::Value, Self::Block)>) -> Self::Value;

    /// Finalizes a function with its already-lowered body value as the
    /// return value.
    fn finish_function(&mut self, function: Self::Function, body: Self::Value);

    /// Verifies a just-finished function body. `false` means the caller
    /// must follow up with [`IrBuilder::erase_function`].
    fn verify_function(&mut self, function: &Self::Function) -> bool;

    /// Removes a function that failed verification from its module.
    fn erase_function(&mut self, function: Self::Function);
}
