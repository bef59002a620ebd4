//! Pre-run checks. Everything found is reported together, in program
//! order, and a program with any finding is not run.

use std::collections::HashSet;

use crate::ast::{Body, Expression, Program, Statement};
use crate::diagnostic::Diagnostic;
use crate::span::Span;

pub(crate) fn check_program(program: &Program) -> Vec<Diagnostic> {
    let mut checker = Checker::default();
    for stmt in program.statements() {
        checker.stmt(stmt);
    }
    checker.diagnostics
}

#[derive(Default)]
struct Checker {
    diagnostics: Vec<Diagnostic>,
}

impl Checker {
    fn stmt(&mut self, stmt: &Statement) {
        match stmt {
            Statement::VarDecl { init, .. } => {
                if let Some(init) = init {
                    self.expr(init);
                }
            }
            Statement::Assign { value, .. } | Statement::ExprStmt { value } => self.expr(value),
            Statement::Return { value } => {
                if let Some(value) = value {
                    self.expr(value);
                }
            }
            Statement::If { cond, then, else_ } => {
                self.expr(cond);
                self.stmt(then);
                if let Some(else_) = else_ {
                    self.stmt(else_);
                }
            }
            Statement::While { cond, body } => {
                self.expr(cond);
                self.stmt(body);
            }
            Statement::Block { body } => body.iter().for_each(|s| self.stmt(s)),
            Statement::FuncDef { name, params, body } => {
                self.params(params, &format!("function '{}'", name));
                self.body(body);
            }
        }
    }

    fn body(&mut self, body: &Body) {
        match body {
            Body::Block(stmts) => stmts.iter().for_each(|s| self.stmt(s)),
            Body::Expr(expr) => self.expr(expr),
        }
    }

    fn expr(&mut self, expr: &Expression) {
        match expr {
            Expression::IntLit(_)
            | Expression::FloatLit(_)
            | Expression::StringLit(_)
            | Expression::BoolLit(_)
            | Expression::Ident(_) => {}
            Expression::Binary { left, right, .. } => {
                self.expr(left);
                self.expr(right);
            }
            Expression::Unary { operand, .. } => self.expr(operand),
            Expression::Call { callee, args } => {
                if let Some(kind) = never_callable(callee) {
                    self.diagnostics.push(
                        Diagnostic::error(
                            format!("cannot call {} `{}`", kind, callee),
                            Span::dummy(),
                        )
                        .with_help("only functions, lambdas, and builtins can be called".to_string()),
                    );
                }
                self.expr(callee);
                args.iter().for_each(|a| self.expr(a));
            }
            Expression::ArrayLit { elements } => elements.iter().for_each(|e| self.expr(e)),
            Expression::Lambda { params, body } => {
                self.params(params, "lambda");
                self.body(body);
            }
        }
    }

    fn params(&mut self, params: &[String], owner: &str) {
        let mut seen = HashSet::new();
        for param in params {
            if !seen.insert(param.as_str()) {
                self.diagnostics.push(Diagnostic::error(
                    format!("duplicate parameter '{}' in {}", param, owner),
                    Span::dummy(),
                ));
            }
        }
    }
}

/// What a callee is, if it can never evaluate to a function.
fn never_callable(callee: &Expression) -> Option<&'static str> {
    match callee {
        Expression::IntLit(_) => Some("an integer literal"),
        Expression::FloatLit(_) => Some("a float literal"),
        Expression::StringLit(_) => Some("a string literal"),
        Expression::BoolLit(_) => Some("a boolean literal"),
        Expression::ArrayLit { .. } => Some("an array literal"),
        Expression::Binary { .. } | Expression::Unary { .. } => Some("an operator result"),
        _ => None,
    }
}
