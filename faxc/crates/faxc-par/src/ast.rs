//! AST node definitions.

use faxc_util::{SourceLoc, Symbol};

/// An expression, carrying the location of the token it started at.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Number(f64),
    Variable(Symbol),
    Binary { op: char, lhs: Box<Expr>, rhs: Box<Expr>, loc: SourceLoc },
    Unary { op: char, operand: Box<Expr>, loc: SourceLoc },
    Call { callee: Symbol, args: Vec<Expr>, loc: SourceLoc },
    If { cond: Box<Expr>, then_branch: Box<Expr>, else_branch: Box<Expr>, loc: SourceLoc },
    /// `let a = 1, b, c = 3 in ...` — bindings come into scope left to
    /// right; a binding with no initializer defaults to `0.0`.
    Let { bindings: Vec<(Symbol, Option<Expr>)>, body: Box<Expr>, loc: SourceLoc },
}

impl Expr {
    pub fn loc(&self) -> SourceLoc {
        match self {
            Expr::Number(_) | Expr::Variable(_) => SourceLoc::START,
            Expr::Binary { loc, .. }
            | Expr::Unary { loc, .. }
            | Expr::Call { loc, .. }
            | Expr::If { loc, .. }
            | Expr::Let { loc, .. } => *loc,
        }
    }
}

/// The shape of a function prototype: how it is invoked.
#[derive(Debug, Clone, PartialEq)]
pub enum PrototypeKind {
    /// An ordinary named function.
    Function,
    /// A user-defined prefix unary operator.
    UnaryOp,
    /// A user-defined infix binary operator, installed into the
    /// precedence table at the given precedence once lowered.
    BinaryOp { precedence: u32 },
}

/// `fn name(args...)`, `fn unary<op>(arg)`, or `fn binary<op> <prec>(lhs rhs)`.
#[derive(Debug, Clone, PartialEq)]
pub struct Prototype {
    pub name: Symbol,
    pub params: Vec<Symbol>,
    pub kind: PrototypeKind,
    pub is_extern: bool,
    pub loc: SourceLoc,
}

/// A prototype paired with a body, or `None` for an `using` declaration.
#[derive(Debug, Clone, PartialEq)]
pub struct Function {
    pub proto: Prototype,
    pub body: Option<Expr>,
}

/// Name given to the implicit function wrapping a bare top-level expression.
pub const ANON_EXPR_NAME: &str = "__anon_expr";
