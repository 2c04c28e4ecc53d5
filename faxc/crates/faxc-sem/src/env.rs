//! The named-value environment: a per-function stack of name bindings.
//!
//! `let` shadows a name for the extent of its body and must restore
//! whatever was visible before on exit, so bindings are pushed and popped
//! in strict stack order rather than kept in a single flat map.

use faxc_util::{FxHashMap, Symbol};

/// A mutable storage cell for one local binding, as handed back by the
/// [`crate::ir::IrBuilder`] that allocated it.
pub type Cell<B> = <B as crate::ir::IrBuilder>::Value;

pub struct Environment<B: crate::ir::IrBuilder> {
    bindings: FxHashMap<Symbol, Vec<Cell<B>>>,
}

impl<B: crate::ir::IrBuilder> Environment<B> {
    pub fn new() -> Self {
        Self { bindings: FxHashMap::default() }
    }

    /// Binds `name` to `cell`, shadowing any binding already in scope.
    pub fn push(&mut self, name: Symbol, cell: Cell<B>) {
        self.bindings.entry(name).or_default().push(cell);
    }

    /// Removes the innermost binding for `name`, restoring whatever was
    /// shadowed underneath it.
    pub fn pop(&mut self, name: Symbol) {
        if let Some(stack) = self.bindings.get_mut(&name) {
            stack.pop();
            if stack.is_empty() {
                self.bindings.remove(&name);
            }
        }
    }

    pub fn get(&self, name: Symbol) -> Option<&Cell<B>> {
        self.bindings.get(&name).and_then(|stack| stack.last())
    }

    /// Clears every binding, for starting a fresh function body.
    pub fn clear(&mut self) {
        self.bindings.clear();
    }
}

impl<B: crate::ir::IrBuilder> Default for Environment<B> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use faxc_util::Symbol;
    use std::cell::RefCell;
    use std::rc::Rc;

    struct FakeBuilder;

    impl crate::ir::IrBuilder for FakeBuilder {
        type Value = i32;
        type Function = ();
        type Block = ();
        type Error = std::convert::Infallible;

        fn const_number(&mut self, _value: f64) -> Self::Value {
            0
        }
        fn declare_function(&mut self, _proto: &faxc_par::Prototype) -> Result<Self::Function, Self::Error> {
            unreachable!()
        }
        fn begin_function_body(&mut self, _function: &Self::Function) -> Self::Block {
            unreachable!()
        }
        fn function_param(&mut self, _function: &Self::Function, _index: usize) -> Self::Value {
            unreachable!()
        }
        fn alloca(&mut self, _name: Symbol) -> Self::Value {
            0
        }
        fn store(&mut self, _cell: &Self::Value, _value: Self::Value) {}
        fn load(&mut self, _cell: &Self::Value) -> Self::Value {
            0
        }
        fn build_binary(&mut self, _op: char, _lhs: Self::Value, _rhs: Self::Value) -> Self::Value {
            0
        }
        fn build_call(
            &mut self,
            _function: &Self::Function,
            _args: Vec<Self::Value>,
        ) -> Result<Self::Value, Self::Error> {
            unreachable!()
        }
        fn create_block(&mut self, _name: &str) -> Self::Block {
            unreachable!()
        }
        fn current_block(&mut self) -> Self::Block {
            unreachable!()
        }
        fn set_current_block(&mut self, _block: Self::Block) {
            unreachable!()
        }
        fn build_cond_branch(&mut self, _cond: Self::Value, _then_block: Self::Block, _else_block: Self::Block) {
            unreachable!()
        }
        fn build_branch(&mut self, _target: Self::Block) {
            unreachable!()
        }
        fn build_phi(&mut self, _incoming: Vec<(Self::Value, Self::Block)>) -> Self::Value {
            unreachable!()
        }
        fn finish_function(&mut self, _function: Self::Function, _body: Self::Value) {}
        fn verify_function(&mut self, _function: &Self::Function) -> bool {
            true
        }
        fn erase_function(&mut self, _function: Self::Function) {}
    }

    #[allow(dead_code)]
    fn suppress_unused(_: Rc<RefCell<()>>) {}

    #[test]
    fn shadowing_restores_the_previous_binding() {
        let mut env: Environment<FakeBuilder> = Environment::new();
        let x = Symbol::intern("x");
        env.push(x, 1);
        env.push(x, 2);
        assert_eq!(env.get(x), Some(&2));
        env.pop(x);
        assert_eq!(env.get(x), Some(&1));
        env.pop(x);
        assert_eq!(env.get(x), None);
    }

    #[test]
    fn unrelated_names_do_not_interfere() {
        let mut env: Environment<FakeBuilder> = Environment::new();
        let x = Symbol::intern("x");
        let y = Symbol::intern("y");
        env.push(x, 1);
        env.push(y, 2);
        assert_eq!(env.get(x), Some(&1));
        assert_eq!(env.get(y), Some(&2));
    }
}
