//! Recursive-descent parser with operator-precedence climbing.
//!
//! The parser only *reads* the shared [`PrecedenceTable`]; installing new
//! operator precedences is the lowering pass's job, and it happens once a
//! `binary` function has actually been lowered. Because the table is
//! mutated between parsing one top-level item and the next (the driver
//! parses and lowers one item at a time rather than the whole file up
//! front), the table is threaded through as `Rc<RefCell<_>>` rather than
//! a plain borrow — the two passes never hold it at the same instant,
//! but they do take turns across the lifetime of a single `Parser`.

pub mod ast;

pub use ast::{Expr, Function, Prototype, PrototypeKind, ANON_EXPR_NAME};

use std::cell::RefCell;
use std::rc::Rc;

use faxc_lex::{Lexer, Token};
use faxc_util::precedence::{MAX_USER_PRECEDENCE, MIN_USER_PRECEDENCE};
use faxc_util::{DiagnosticBuilder, Handler, PrecedenceTable, SourceLoc, Symbol};

/// Precedence a user `binary` operator gets when no literal is given.
const DEFAULT_USER_PRECEDENCE: u32 = 30;

pub struct Parser<'a> {
    lexer: Lexer<'a>,
    current: Token,
    current_loc: SourceLoc,
    precedence: Rc<RefCell<PrecedenceTable>>,
    anon_count: u32,
}

impl<'a> Parser<'a> {
    pub fn new(source: &'a str, precedence: Rc<RefCell<PrecedenceTable>>, handler: &'a mut Handler) -> Self {
        let mut lexer = Lexer::new(source, handler);
        let current = lexer.next_token();
        let current_loc = lexer.token_loc();
        Self { lexer, current, current_loc, precedence, anon_count: 0 }
    }

    /// Parses `source` to completion, returning every top-level function
    /// (including the implicit one wrapping a bare top-level expression).
    /// Never aborts: a malformed item is skipped via [`Self::synchronize`]
    /// and parsing continues with the next one.
    ///
    /// This collects the whole file before returning, so it is only
    /// correct when nothing in `source` depends on a `binary`/`unary`
    /// declaration earlier in the same file being lowered first. Callers
    /// that need that interleaving should drive [`Self::next_function`]
    /// themselves, lowering each item before asking for the next.
    pub fn parse_source(source: &'a str, precedence: Rc<RefCell<PrecedenceTable>>, handler: &'a mut Handler) -> Vec<Function> {
        let mut parser = Self::new(source, precedence, handler);
        let mut functions = Vec::new();
        while let Some(function) = parser.next_function() {
            functions.push(function);
        }
        functions
    }

    /// Parses and returns the next top-level function, or `None` at end
    /// of input. Stray `;` separators are skipped, and a malformed item
    /// is recovered from internally rather than surfacing as `None`.
    pub fn next_function(&mut self) -> Option<Function> {
        loop {
            if self.is_at_end() {
                return None;
            }
            if self.current == Token::Char(';') {
                self.advance();
                continue;
            }
            let item = match self.current {
                Token::Def => self.parse_definition(),
                Token::Extern => self.parse_extern(),
                _ => self.parse_top_level_expr(),
            };
            match item {
                Some(function) => return Some(function),
                None => self.synchronize(),
            }
        }
    }

    fn parse_definition(&mut self) -> Option<Function> {
        self.advance();
        let proto = self.parse_prototype(false)?;
        let body = self.parse_expr()?;
        Some(Function { proto, body: Some(body) })
    }

    fn parse_extern(&mut self) -> Option<Function> {
        self.advance();
        let proto = self.parse_prototype(true)?;
        Some(Function { proto, body: None })
    }

    /// Names each bare top-level expression uniquely (`__anon_expr`,
    /// `__anon_expr.1`, ...) so a runtime can call every one of them, in
    /// source order, from a single compiled object rather than only the
    /// most recent.
    fn parse_top_level_expr(&mut self) -> Option<Function> {
        let loc = self.current_loc;
        let expr = self.parse_expr()?;
        let name = if self.anon_count == 0 {
            ANON_EXPR_NAME.to_string()
        } else {
            format!("{ANON_EXPR_NAME}.{}", self.anon_count)
        };
        self.anon_count += 1;
        let proto = Prototype {
            name: Symbol::intern(&name),
            params: Vec::new(),
            kind: PrototypeKind::Function,
            is_extern: false,
            loc,
        };
        Some(Function { proto, body: Some(expr) })
    }

    fn parse_prototype(&mut self, is_extern: bool) -> Option<Prototype> {
        let loc = self.current_loc;

        if self.match_token(&Token::Unary) {
            let op = self.expect_operator_char()?;
            self.expect_char('(')?;
            let param = self.expect_identifier()?;
            self.expect_char(')')?;
            return Some(Prototype {
                name: Symbol::intern(&format!("unary{op}")),
                params: vec![param],
                kind: PrototypeKind::UnaryOp,
                is_extern,
                loc,
            });
        }

        if self.match_token(&Token::Binary) {
            let op = self.expect_operator_char()?;
            let mut precedence = DEFAULT_USER_PRECEDENCE;
            if let Token::Number(literal) = self.current {
                self.advance();
                let requested = literal as u32;
                if requested < MIN_USER_PRECEDENCE || requested > MAX_USER_PRECEDENCE {
                    self.error(format!(
                        "Invalid precedence: must be {MIN_USER_PRECEDENCE}..{MAX_USER_PRECEDENCE}"
                    ));
                } else {
                    precedence = requested;
                }
            }
            self.expect_char('(')?;
            let lhs = self.expect_identifier()?;
            let rhs = self.expect_identifier()?;
            self.expect_char(')')?;
            return Some(Prototype {
                name: Symbol::intern(&format!("binary{op}")),
                params: vec![lhs, rhs],
                kind: PrototypeKind::BinaryOp { precedence },
                is_extern,
                loc,
            });
        }

        let name = self.expect_identifier()?;
        self.expect_char('(')?;
        let mut params = Vec::new();
        while let Token::Identifier(sym) = self.current {
            params.push(sym);
            self.advance();
        }
        self.expect_char(')')?;
        Some(Prototype { name, params, kind: PrototypeKind::Function, is_extern, loc })
    }

    fn parse_expr(&mut self) -> Option<Expr> {
        let lhs = self.parse_unary()?;
        self.parse_binop_rhs(0, lhs)
    }

    /// Climbs operator precedence starting from `lhs`, consuming any
    /// infix operator whose precedence is at least `min_precedence`.
    fn parse_binop_rhs(&mut self, min_precedence: u32, mut lhs: Expr) -> Option<Expr> {
        loop {
            let Token::Char(op) = self.current else { return Some(lhs) };
            let Some(op_precedence) = self.precedence.borrow().get(op) else { return Some(lhs) };
            if op_precedence < min_precedence {
                return Some(lhs);
            }

            let loc = self.current_loc;
            self.advance();
            let mut rhs = self.parse_unary()?;

            if let Token::Char(next_op) = self.current {
                if let Some(next_precedence) = self.precedence.borrow().get(next_op) {
                    if next_precedence > op_precedence {
                        rhs = self.parse_binop_rhs(op_precedence + 1, rhs)?;
                    }
                }
            }

            lhs = Expr::Binary { op, lhs: Box::new(lhs), rhs: Box::new(rhs), loc };
        }
    }

    fn parse_unary(&mut self) -> Option<Expr> {
        if let Token::Char(op) = self.current {
            if op != '(' && op != ')' && op != ',' {
                let loc = self.current_loc;
                self.advance();
                let operand = self.parse_unary()?;
                return Some(Expr::Unary { op, operand: Box::new(operand), loc });
            }
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Option<Expr> {
        let loc = self.current_loc;
        match self.current {
            Token::Number(value) => {
                self.advance();
                Some(Expr::Number(value))
            }
            Token::Char('(') => {
                self.advance();
                let inner = self.parse_expr()?;
                self.expect_char(')')?;
                Some(inner)
            }
            Token::Identifier(name) => {
                self.advance();
                if self.match_token(&Token::Char('(')) {
                    let mut args = Vec::new();
                    if !self.check_char(')') {
                        loop {
                            args.push(self.parse_expr()?);
                            if !self.match_token(&Token::Char(',')) {
                                break;
                            }
                        }
                    }
                    self.expect_char(')')?;
                    Some(Expr::Call { callee: name, args, loc })
                } else {
                    Some(Expr::Variable(name))
                }
            }
            Token::If => {
                self.advance();
                let cond = self.parse_expr()?;
                self.expect_keyword(Token::Then)?;
                let then_branch = self.parse_expr()?;
                self.expect_keyword(Token::Else)?;
                let else_branch = self.parse_expr()?;
                Some(Expr::If {
                    cond: Box::new(cond),
                    then_branch: Box::new(then_branch),
                    else_branch: Box::new(else_branch),
                    loc,
                })
            }
            Token::Let => {
                self.advance();
                let mut bindings = Vec::new();
                loop {
                    let name = self.expect_identifier()?;
                    let init = if self.match_token(&Token::Char('=')) {
                        Some(self.parse_expr()?)
                    } else {
                        None
                    };
                    bindings.push((name, init));
                    if !self.match_token(&Token::Char(',')) {
                        break;
                    }
                }
                self.expect_keyword(Token::In)?;
                let body = self.parse_expr()?;
                Some(Expr::Let { bindings, body: Box::new(body), loc })
            }
            _ => {
                self.error("expected an expression".to_string());
                None
            }
        }
    }

    fn expect_identifier(&mut self) -> Option<Symbol> {
        if let Token::Identifier(sym) = self.current {
            self.advance();
            Some(sym)
        } else {
            self.error("expected an identifier".to_string());
            None
        }
    }

    fn expect_operator_char(&mut self) -> Option<char> {
        if let Token::Char(c) = self.current {
            if c != '(' && c != ')' && c != ',' {
                self.advance();
                return Some(c);
            }
        }
        self.error("expected an operator character".to_string());
        None
    }

    fn expect_char(&mut self, expected: char) -> Option<()> {
        if self.check_char(expected) {
            self.advance();
            Some(())
        } else {
            self.error(format!("expected '{expected}'"));
            None
        }
    }

    fn expect_keyword(&mut self, expected: Token) -> Option<()> {
        if self.current == expected {
            self.advance();
            Some(())
        } else {
            self.error(format!("expected {expected:?}"));
            None
        }
    }

    fn check_char(&self, expected: char) -> bool {
        self.current == Token::Char(expected)
    }

    fn match_token(&mut self, expected: &Token) -> bool {
        if &self.current == expected {
            self.advance();
            true
        } else {
            false
        }
    }

    fn advance(&mut self) {
        self.current = self.lexer.next_token();
        self.current_loc = self.lexer.token_loc();
    }

    fn is_at_end(&self) -> bool {
        self.current == Token::End
    }

    fn error(&mut self, message: String) {
        DiagnosticBuilder::error(message).loc(self.current_loc).emit(self.lexer.handler);
    }

    /// Skips tokens until `;` (consumed) or a token that can start a fresh
    /// top-level item (`fn`, `using`, end of input).
    fn synchronize(&mut self) {
        while !self.is_at_end() {
            match self.current {
                Token::Char(';') => {
                    self.advance();
                    return;
                }
                Token::Def | Token::Extern => return,
                _ => self.advance(),
            }
        }
    }
}
