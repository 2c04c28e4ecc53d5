//! LLVM IR code generation: an [`faxc_sem::IrBuilder`] implementation built
//! on `inkwell`.
//!
//! Every value in the language is an `f64`, so every `IrBuilder::Value`
//! produced here is either a plain `f64` (the result of evaluating an
//! expression) or a pointer to one (a parameter or `let` binding's storage
//! cell, as returned by `alloca`). The two are kept apart in [`Value`]
//! rather than given separate trait associated types, since `store`/`load`
//! need to move between them within the same call.

use std::collections::HashMap;
use std::path::Path;

use faxc_par::{Prototype, PrototypeKind};
use faxc_sem::IrBuilder;
use faxc_util::Symbol;
use inkwell::basic_block::BasicBlock;
use inkwell::builder::Builder;
use inkwell::context::Context;
use inkwell::module::Module;
use inkwell::values::{BasicMetadataValueEnum, FloatValue, FunctionValue, PointerValue};
use inkwell::{AddressSpace, FloatPredicate, OptimizationLevel};

use crate::error::{CodeGenError, Result};

/// A value handed to or returned from an [`IrBuilder`] call: either a
/// floating-point SSA value or a pointer to a mutable storage cell.
#[derive(Clone)]
pub enum Value<'ctx> {
    Float(FloatValue<'ctx>),
    Cell(PointerValue<'ctx>),
}

impl<'ctx> Value<'ctx> {
    fn as_float(&self) -> FloatValue<'ctx> {
        match self {
            Value::Float(v) => *v,
            Value::Cell(_) => panic!("expected a float value, found a storage cell"),
        }
    }

    fn as_cell(&self) -> PointerValue<'ctx> {
        match self {
            Value::Cell(v) => *v,
            Value::Float(_) => panic!("expected a storage cell, found a float value"),
        }
    }
}

pub struct LlvmBackend<'ctx> {
    pub context: &'ctx Context,
    pub module: Module<'ctx>,
    pub builder: Builder<'ctx>,
    pub target_triple: String,
    pub opt_level: OptimizationLevel,
    current_function: Option<FunctionValue<'ctx>>,
}

impl<'ctx> LlvmBackend<'ctx> {
    pub fn new(
        context: &'ctx Context,
        module_name: &str,
        target_triple: String,
        opt_level: OptimizationLevel,
    ) -> Self {
        inkwell::targets::Target::initialize_all(&inkwell::targets::InitializationConfig::default());

        let module = context.create_module(module_name);

        let triple = inkwell::targets::TargetTriple::create(&target_triple);
        module.set_triple(&triple);

        if let Ok(target) = inkwell::targets::Target::from_triple(&triple) {
            if let Some(target_machine) = target.create_target_machine(
                &triple,
                "generic",
                "",
                opt_level,
                inkwell::targets::RelocMode::Default,
                inkwell::targets::CodeModel::Default,
            ) {
                let data_layout = target_machine.get_target_data().get_data_layout();
                module.set_data_layout(&data_layout);
            }
        }

        Self {
            context,
            module,
            builder: context.create_builder(),
            target_triple,
            opt_level,
            current_function: None,
        }
    }

    fn f64_type(&self) -> inkwell::types::FloatType<'ctx> {
        self.context.f64_type()
    }

    fn function(&self) -> Result<FunctionValue<'ctx>> {
        self.current_function.ok_or(CodeGenError::NoOpenFunction)
    }

    /// Allocates at the start of the current function's entry block, the
    /// way Kaleidoscope-style codegen does it so a `let` inside a loop
    /// doesn't grow the stack per iteration.
    fn entry_alloca(&self, function: FunctionValue<'ctx>, name: &str) -> Result<PointerValue<'ctx>> {
        let entry = function.get_first_basic_block().ok_or(CodeGenError::NoOpenFunction)?;
        let scratch = self.context.create_builder();
        match entry.get_first_instruction() {
            Some(instr) => scratch.position_before(&instr),
            None => scratch.position_at_end(entry),
        }
        scratch
            .build_alloca(self.f64_type(), name)
            .map_err(|e| CodeGenError::Internal(format!("alloca failed: {e}")))
    }

    pub fn emit_llvm_ir(&self) -> String {
        self.module.print_to_string().to_string()
    }

    pub fn write_ir_to_file(&self, path: &Path) -> std::io::Result<()> {
        use std::fs::File;
        use std::io::Write;
        let ir = self.emit_llvm_ir();
        let mut file = File::create(path)?;
        file.write_all(ir.as_bytes())?;
        Ok(())
    }

    pub fn get_module(&self) -> &Module<'ctx> {
        &self.module
    }

    fn target_machine(&self) -> Result<inkwell::targets::TargetMachine> {
        let triple = inkwell::targets::TargetTriple::create(&self.target_triple);
        let target = inkwell::targets::Target::from_triple(&triple)
            .map_err(|e| CodeGenError::CompilationError(format!("failed to get target: {e}")))?;
        target
            .create_target_machine(
                &triple,
                "generic",
                "",
                self.opt_level,
                inkwell::targets::RelocMode::Default,
                inkwell::targets::CodeModel::Default,
            )
            .ok_or_else(|| CodeGenError::CompilationError("failed to create target machine".to_string()))
    }

    pub fn write_object_file(&self, path: &Path) -> Result<()> {
        use inkwell::targets::FileType;
        self.target_machine()?
            .write_to_file(&self.module, FileType::Object, path)
            .map_err(|e| CodeGenError::CompilationError(format!("failed to write object file: {e}")))
    }

    pub fn write_asm_file(&self, path: &Path) -> Result<()> {
        use inkwell::targets::FileType;
        self.target_machine()?
            .write_to_file(&self.module, FileType::Assembly, path)
            .map_err(|e| CodeGenError::CompilationError(format!("failed to write asm file: {e}")))
    }
}

impl<'ctx> IrBuilder for LlvmBackend<'ctx> {
    type Value = Value<'ctx>;
    type Function = FunctionValue<'ctx>;
    type Block = BasicBlock<'ctx>;
    type Error = CodeGenError;

    fn const_number(&mut self, value: f64) -> Self::Value {
        Value::Float(self.f64_type().const_float(value))
    }

    fn declare_function(&mut self, proto: &Prototype) -> Result<Self::Function> {
        let name = proto.name.as_str();
        if let Some(existing) = self.module.get_function(name) {
            if existing.count_params() as usize != proto.params.len() {
                return Err(CodeGenError::FunctionArityMismatch(name.to_string()));
            }
            return Ok(existing);
        }
        let f64_type = self.f64_type();
        let param_types = vec![f64_type.into(); proto.params.len()];
        let fn_type = f64_type.fn_type(&param_types, false);
        Ok(self.module.add_function(name, fn_type, Some(inkwell::module::Linkage::External)))
    }

    fn begin_function_body(&mut self, function: &Self::Function) -> Self::Block {
        let entry = self.context.append_basic_block(*function, "entry");
        self.builder.position_at_end(entry);
        self.current_function = Some(*function);
        entry
    }

    fn function_param(&mut self, function: &Self::Function, index: usize) -> Self::Value {
        let param = function
            .get_nth_param(index as u32)
            .expect("parameter index is within the declared arity");
        Value::Float(param.into_float_value())
    }

    fn alloca(&mut self, name: Symbol) -> Self::Value {
        let function = self.function().expect("alloca requires an open function body");
        let cell = self
            .entry_alloca(function, name.as_str())
            .expect("entry-block alloca should not fail");
        Value::Cell(cell)
    }

    fn store(&mut self, cell: &Self::Value, value: Self::Value) {
        self.builder
            .build_store(cell.as_cell(), value.as_float())
            .expect("store should not fail inside an open function body");
    }

    fn load(&mut self, cell: &Self::Value) -> Self::Value {
        let loaded = self
            .builder
            .build_load(self.f64_type(), cell.as_cell(), "loadtmp")
            .expect("load should not fail inside an open function body");
        Value::Float(loaded.into_float_value())
    }

    fn build_binary(&mut self, op: char, lhs: Self::Value, rhs: Self::Value) -> Self::Value {
        let lhs = lhs.as_float();
        let rhs = rhs.as_float();
        match op {
            '+' => Value::Float(self.builder.build_float_add(lhs, rhs, "addtmp").unwrap()),
            '-' => Value::Float(self.builder.build_float_sub(lhs, rhs, "subtmp").unwrap()),
            '*' => Value::Float(self.builder.build_float_mul(lhs, rhs, "multmp").unwrap()),
            '<' => {
                let cmp = self
                    .builder
                    .build_float_compare(FloatPredicate::ULT, lhs, rhs, "cmptmp")
                    .unwrap();
                let as_float = self
                    .builder
                    .build_unsigned_int_to_float(cmp, self.f64_type(), "booltmp")
                    .unwrap();
                Value::Float(as_float)
            }
            other => unreachable!("build_binary called with non-builtin operator '{other}'"),
        }
    }

    fn build_call(&mut self, function: &Self::Function, args: Vec<Self::Value>) -> Result<Self::Value> {
        let arg_values: Vec<BasicMetadataValueEnum> =
            args.iter().map(|v| v.as_float().into()).collect();
        let call = self
            .builder
            .build_call(*function, &arg_values, "calltmp")
            .map_err(|e| CodeGenError::Internal(format!("call failed: {e}")))?;
        let result = call
            .try_as_basic_value()
            .left()
            .ok_or_else(|| CodeGenError::FunctionNotFound(function.get_name().to_string_lossy().into_owned()))?;
        Ok(Value::Float(result.into_float_value()))
    }

    fn create_block(&mut self, name: &str) -> Self::Block {
        let function = self.function().expect("create_block requires an open function body");
        self.context.append_basic_block(function, name)
    }

    fn current_block(&mut self) -> Self::Block {
        self.builder.get_insert_block().expect("builder has no current block")
    }

    fn set_current_block(&mut self, block: Self::Block) {
        self.builder.position_at_end(block);
    }

    fn build_cond_branch(&mut self, cond: Self::Value, then_block: Self::Block, else_block: Self::Block) {
        let zero = self.f64_type().const_float(0.0);
        let cond_bool = self
            .builder
            .build_float_compare(FloatPredicate::ONE, cond.as_float(), zero, "ifcond")
            .unwrap();
        self.builder.build_conditional_branch(cond_bool, then_block, else_block).unwrap();
    }

    fn build_branch(&mut self, target: Self::Block) {
        self.builder.build_unconditional_branch(target).unwrap();
    }

    fn build_phi(&mut self, incoming: Vec<(Self::Value, Self::Block)>) -> Self::Value {
        let phi = self.builder.build_phi(self.f64_type(), "iftmp").unwrap();
        for (value, block) in &incoming {
            let float_value = value.as_float();
            phi.add_incoming(&[(&float_value as &dyn inkwell::values::BasicValue, *block)]);
        }
        Value::Float(phi.as_basic_value().into_float_value())
    }

    fn finish_function(&mut self, function: Self::Function, body: Self::Value) {
        self.builder.build_return(Some(&body.as_float())).unwrap();
        self.current_function = None;
        let _ = function;
    }

    fn verify_function(&mut self, function: &Self::Function) -> bool {
        function.verify(true)
    }

    fn erase_function(&mut self, function: Self::Function) {
        tracing::warn!(
            name = %function.get_name().to_string_lossy(),
            "function failed verification, erasing from module"
        );
        unsafe {
            function.delete();
        }
    }
}

#[cfg(test)]
mod llvm_tests {
    use super::*;
    use faxc_util::SourceLoc;
    use inkwell::context::Context;

    fn backend(context: &Context) -> LlvmBackend<'_> {
        LlvmBackend::new(context, "test", "x86_64-unknown-linux-gnu".to_string(), OptimizationLevel::None)
    }

    #[test]
    fn test_llvm_backend_creation() {
        let context = Context::create();
        let backend = backend(&context);
        assert_eq!(backend.target_triple, "x86_64-unknown-linux-gnu");
    }

    #[test]
    fn test_emit_empty_module() {
        let context = Context::create();
        let backend = backend(&context);
        let ir = backend.emit_llvm_ir();
        assert!(ir.contains("target triple"));
    }

    #[test]
    fn declares_and_calls_a_two_argument_function() {
        let context = Context::create();
        let mut backend = backend(&context);
        let proto = Prototype {
            name: Symbol::intern("add"),
            params: vec![Symbol::intern("a"), Symbol::intern("b")],
            kind: PrototypeKind::Function,
            is_extern: false,
            loc: SourceLoc::START,
        };
        let function = backend.declare_function(&proto).unwrap();
        backend.begin_function_body(&function);
        let a = backend.function_param(&function, 0);
        let b = backend.function_param(&function, 1);
        let sum = backend.build_binary('+', a, b);
        backend.finish_function(function, sum);
        assert!(backend.verify_function(&function));

        let ir = backend.emit_llvm_ir();
        assert!(ir.contains("define double @add"));
        assert!(ir.contains("fadd"));
    }

    #[test]
    fn a_function_missing_its_terminator_fails_verification() {
        let context = Context::create();
        let mut backend = backend(&context);
        let proto = Prototype {
            name: Symbol::intern("broken"),
            params: vec![],
            kind: PrototypeKind::Function,
            is_extern: false,
            loc: SourceLoc::START,
        };
        let function = backend.declare_function(&proto).unwrap();
        backend.begin_function_body(&function);
        assert!(!backend.verify_function(&function));
    }

    #[test]
    fn redeclaring_with_a_different_arity_is_an_error() {
        let context = Context::create();
        let mut backend = backend(&context);
        let one_arg = Prototype {
            name: Symbol::intern("f"),
            params: vec![Symbol::intern("a")],
            kind: PrototypeKind::Function,
            is_extern: true,
            loc: SourceLoc::START,
        };
        let two_arg = Prototype {
            name: Symbol::intern("f"),
            params: vec![Symbol::intern("a"), Symbol::intern("b")],
            kind: PrototypeKind::Function,
            is_extern: true,
            loc: SourceLoc::START,
        };
        backend.declare_function(&one_arg).unwrap();
        let err = backend.declare_function(&two_arg).unwrap_err();
        assert!(matches!(err, CodeGenError::FunctionArityMismatch(_)));
    }

    #[test]
    fn let_binding_round_trips_through_alloca() {
        let context = Context::create();
        let mut backend = backend(&context);
        let proto = Prototype {
            name: Symbol::intern("identity"),
            params: vec![],
            kind: PrototypeKind::Function,
            is_extern: false,
            loc: SourceLoc::START,
        };
        let function = backend.declare_function(&proto).unwrap();
        backend.begin_function_body(&function);
        let cell = backend.alloca(Symbol::intern("x"));
        let value = backend.const_number(7.0);
        backend.store(&cell, value);
        let loaded = backend.load(&cell);
        backend.finish_function(function, loaded);

        let ir = backend.emit_llvm_ir();
        assert!(ir.contains("alloca double"));
        assert!(ir.contains("load double"));
    }
}
