//! Semantic lowering: walks the AST and emits IR through an [`IrBuilder`],
//! installing user-defined operator prototypes into the shared precedence
//! table as each one is lowered.

use std::cell::RefCell;
use std::rc::Rc;

use faxc_par::{Expr, Function, Prototype, PrototypeKind, ANON_EXPR_NAME};
use faxc_util::{FxHashMap, PrecedenceTable, SourceLoc, Symbol};

use crate::env::Environment;
use crate::ir::IrBuilder;
use crate::proto::PrototypeTable;

/// The entry point the runtime source calls: a synthesized, no-argument
/// function built by [`Lowerer::finish_program`] that invokes every
/// top-level bare expression lowered so far, in source order, and returns
/// the last one's value. The runtime source stays static across
/// compilations even though the number and names of anonymous expressions
/// vary per program.
pub const ENTRY_POINT_NAME: &str = "__fax_main";

#[derive(thiserror::Error, Debug)]
pub enum LowerError<E: std::error::Error> {
    #[error("Unknown function referenced: '{0}'")]
    UnknownFunction(Symbol),
    #[error("Unknown variable name: '{0}'")]
    UnknownVariable(Symbol),
    #[error("Unknown unary operator: '{0}'")]
    UnknownUnaryOperator(char),
    #[error("destination of '=' must be a variable")]
    AssignmentTargetMustBeVariable,
    #[error("Incorrect # arguments passed: '{name}' expects {expected}, found {found}")]
    ArityMismatch { name: Symbol, expected: usize, found: usize },
    #[error("function '{0}' failed verification")]
    FunctionVerificationFailed(Symbol),
    #[error(transparent)]
    Backend(#[from] E),
}

const BUILTIN_BINARY_OPS: [char; 4] = ['+', '-', '*', '<'];

pub struct Lowerer<B: IrBuilder> {
    builder: B,
    env: Environment<B>,
    prototypes: PrototypeTable,
    precedence: Rc<RefCell<PrecedenceTable>>,
    declared: FxHashMap<Symbol, B::Function>,
    anon_functions: Vec<Symbol>,
}

impl<B: IrBuilder> Lowerer<B> {
    pub fn new(builder: B, precedence: Rc<RefCell<PrecedenceTable>>) -> Self {
        Self {
            builder,
            env: Environment::new(),
            prototypes: PrototypeTable::new(),
            precedence,
            declared: FxHashMap::default(),
            anon_functions: Vec::new(),
        }
    }

    pub fn into_builder(self) -> B {
        self.builder
    }

    /// The back-end, for drivers that need concrete back-end operations
    /// (emitting IR text, writing an object file) alongside lowering.
    pub fn builder(&self) -> &B {
        &self.builder
    }

    /// Looks up (declaring on demand into the current module) the
    /// function handle for `name`: first any already-declared function,
    /// then the most recently parsed prototype for that name, erroring
    /// only if neither exists.
    fn get_function(&mut self, name: Symbol) -> Result<B::Function, LowerError<B::Error>> {
        if let Some(function) = self.declared.get(&name) {
            return Ok(function.clone());
        }
        if let Some(proto) = self.prototypes.get(name).cloned() {
            let function = self.builder.declare_function(&proto)?;
            self.declared.insert(name, function.clone());
            return Ok(function);
        }
        Err(LowerError::UnknownFunction(name))
    }

    /// Lowers one top-level function or extern declaration. Installs the
    /// prototype (and, for a `binary` declaration, its precedence) before
    /// the body is lowered, so a recursive call or a self-referential
    /// operator use inside the body resolves correctly.
    pub fn lower_function(&mut self, function: &Function) -> Result<(), LowerError<B::Error>> {
        self.prototypes.install(function.proto.clone());

        if let PrototypeKind::BinaryOp { precedence } = function.proto.kind {
            let op = operator_char(&function.proto.name);
            self.precedence.borrow_mut().install(op, precedence);
        }

        let Some(body) = &function.body else {
            return Ok(());
        };

        let handle = self.get_function(function.proto.name)?;
        self.builder.begin_function_body(&handle);

        self.env.clear();
        for (index, param) in function.proto.params.iter().enumerate() {
            let value = self.builder.function_param(&handle, index);
            let cell = self.builder.alloca(*param);
            self.builder.store(&cell, value);
            self.env.push(*param, cell);
        }

        let body_value = self.lower_expr(body)?;
        self.builder.finish_function(handle.clone(), body_value);
        self.env.clear();

        if !self.builder.verify_function(&handle) {
            self.builder.erase_function(handle);
            self.declared.remove(&function.proto.name);
            return Err(LowerError::FunctionVerificationFailed(function.proto.name));
        }

        if is_anonymous_expr_name(function.proto.name) {
            self.anon_functions.push(function.proto.name);
        }
        Ok(())
    }

    /// Synthesizes [`ENTRY_POINT_NAME`]: a zero-argument function that
    /// calls every bare top-level expression lowered so far, in source
    /// order, and returns the last one's value (or `0.0` if none were
    /// lowered). Call this once, after the whole compilation unit has
    /// been parsed and lowered.
    pub fn finish_program(&mut self) -> Result<(), LowerError<B::Error>> {
        let proto = Prototype {
            name: Symbol::intern(ENTRY_POINT_NAME),
            params: Vec::new(),
            kind: PrototypeKind::Function,
            is_extern: false,
            loc: SourceLoc::START,
        };
        let handle = self.builder.declare_function(&proto)?;
        self.builder.begin_function_body(&handle);

        let mut last = self.builder.const_number(0.0);
        let anon_functions = std::mem::take(&mut self.anon_functions);
        for name in &anon_functions {
            let function = self.get_function(*name)?;
            last = self.builder.build_call(&function, Vec::new())?;
        }
        self.anon_functions = anon_functions;

        self.builder.finish_function(handle.clone(), last);
        if !self.builder.verify_function(&handle) {
            self.builder.erase_function(handle);
            return Err(LowerError::FunctionVerificationFailed(proto.name));
        }
        Ok(())
    }

    fn lower_expr(&mut self, expr: &Expr) -> Result<B::Value, LowerError<B::Error>> {
        match expr {
            Expr::Number(value) => Ok(self.builder.const_number(*value)),

            Expr::Variable(name) => {
                let cell = self.env.get(*name).cloned().ok_or(LowerError::UnknownVariable(*name))?;
                Ok(self.builder.load(&cell))
            }

            Expr::Binary { op, lhs, rhs, .. } if *op == '=' => {
                let Expr::Variable(name) = lhs.as_ref() else {
                    return Err(LowerError::AssignmentTargetMustBeVariable);
                };
                let value = self.lower_expr(rhs)?;
                let cell = self.env.get(*name).cloned().ok_or(LowerError::UnknownVariable(*name))?;
                self.builder.store(&cell, value.clone());
                Ok(value)
            }

            Expr::Binary { op, lhs, rhs, .. } if BUILTIN_BINARY_OPS.contains(op) => {
                let lhs_value = self.lower_expr(lhs)?;
                let rhs_value = self.lower_expr(rhs)?;
                Ok(self.builder.build_binary(*op, lhs_value, rhs_value))
            }

            Expr::Binary { op, lhs, rhs, .. } => {
                let lhs_value = self.lower_expr(lhs)?;
                let rhs_value = self.lower_expr(rhs)?;
                // The parser only ever climbs on an operator that already
                // has a precedence entry, which is installed at the same
                // moment its defining `binary` function enters the
                // prototype table — so the lookup below cannot miss.
                let function = self
                    .get_function(Symbol::intern(&format!("binary{op}")))
                    .expect("custom binary operator function must exist once its precedence is installed");
                Ok(self.builder.build_call(&function, vec![lhs_value, rhs_value])?)
            }

            Expr::Unary { op, operand, .. } => {
                let operand_value = self.lower_expr(operand)?;
                let function = self
                    .get_function(Symbol::intern(&format!("unary{op}")))
                    .map_err(|_| LowerError::UnknownUnaryOperator(*op))?;
                Ok(self.builder.build_call(&function, vec![operand_value])?)
            }

            Expr::Call { callee, args, .. } => {
                let expected_arity = self.prototypes.get(*callee).map(|proto| proto.params.len());
                let function = self.get_function(*callee)?;
                if let Some(expected) = expected_arity {
                    if expected != args.len() {
                        return Err(LowerError::ArityMismatch {
                            name: *callee,
                            expected,
                            found: args.len(),
                        });
                    }
                }
                let mut arg_values = Vec::with_capacity(args.len());
                for arg in args {
                    arg_values.push(self.lower_expr(arg)?);
                }
                Ok(self.builder.build_call(&function, arg_values)?)
            }

            Expr::If { cond, then_branch, else_branch, .. } => {
                let cond_value = self.lower_expr(cond)?;

                let then_block = self.builder.create_block("then");
                let else_block = self.builder.create_block("else");
                let merge_block = self.builder.create_block("ifcont");
                self.builder.build_cond_branch(cond_value, then_block.clone(), else_block.clone());

                self.builder.set_current_block(then_block);
                let then_value = self.lower_expr(then_branch)?;
                let then_end = self.builder.current_block();
                self.builder.build_branch(merge_block.clone());

                self.builder.set_current_block(else_block);
                let else_value = self.lower_expr(else_branch)?;
                let else_end = self.builder.current_block();
                self.builder.build_branch(merge_block.clone());

                self.builder.set_current_block(merge_block);
                Ok(self.builder.build_phi(vec![(then_value, then_end), (else_value, else_end)]))
            }

            Expr::Let { bindings, body, .. } => {
                let mut pushed = Vec::with_capacity(bindings.len());
                let mut failure = None;

                for (name, init) in bindings {
                    let init_value = match init {
                        Some(init) => self.lower_expr(init),
                        None => Ok(self.builder.const_number(0.0)),
                    };
                    match init_value {
                        Ok(init_value) => {
                            let cell = self.builder.alloca(*name);
                            self.builder.store(&cell, init_value);
                            self.env.push(*name, cell);
                            pushed.push(*name);
                        }
                        Err(error) => {
                            failure = Some(error);
                            break;
                        }
                    }
                }

                let result = match failure {
                    Some(error) => Err(error),
                    None => self.lower_expr(body),
                };

                for name in pushed.into_iter().rev() {
                    self.env.pop(name);
                }

                result
            }
        }
    }
}

/// Recovers the single operator character from a mangled `binary{op}` or
/// `unary{op}` prototype name.
fn operator_char(mangled: &Symbol) -> char {
    mangled.as_str().chars().last().expect("mangled operator name is never empty")
}

/// True for `__anon_expr` and its uniquified successors (`__anon_expr.1`,
/// `__anon_expr.2`, ...).
fn is_anonymous_expr_name(name: Symbol) -> bool {
    let name = name.as_str();
    name == ANON_EXPR_NAME || name.strip_prefix(ANON_EXPR_NAME).is_some_and(|rest| rest.starts_with('.'))
}
