//! Program assembly and the auto-display rewrite.
//!
//! The last observable value of a top-level program becomes an explicit
//! `display(value);` call. Only syntactic tails are touched: the final
//! statement of the program, and the final statements of branches reached
//! through a tail `if`. Function bodies are never rewritten.


use crate::ast::{Program, Statement};

/// Where a statement sits relative to the program's tail.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Tail {
    /// The last statement of the program body.
    Program,
    /// The last statement of a branch of a tail `if`.
    Branch,
}

/// Bind lowered statements under the entry point, applying the
/// auto-display rewrite once.
pub fn assemble(mut statements: Vec<Statement>) -> Program {
    // A program that is a single block is that block's body.
    if matches!(statements.as_slice(), [Statement::Block { .. }]) {
        if let Some(Statement::Block { body }) = statements.pop() {
            statements = body;
        }
    }

    let statements = rewrite_tail(statements, Tail::Program);
    tracing::debug!(
        statements = statements.len(),
        displays = statements.last().is_some_and(ends_in_display),
        "assembled program"
    );
    Program::from_statements(statements)
}

fn rewrite_tail(mut statements: Vec<Statement>, at: Tail) -> Vec<Statement> {
    if let Some(last) = statements.pop() {
        statements.push(rewrite(last, at));
    }
    statements
}

fn rewrite(stmt: Statement, at: Tail) -> Statement {
    match stmt {
        Statement::ExprStmt { value } => Statement::display(value),
        Statement::If { cond, then, else_ } => Statement::If {
            cond,
            then: Box::new(rewrite(*then, Tail::Branch)),
            else_: else_.map(|e| Box::new(rewrite(*e, Tail::Branch))),
        },
        Statement::Block { body } if at == Tail::Branch => Statement::Block {
            body: rewrite_tail(body, Tail::Branch),
        },
        other => other,
    }
}

/// Whether every path through a tail ends in a display call.
fn ends_in_display(stmt: &Statement) -> bool {
    match stmt {
        Statement::If {
            then,
            else_: Some(else_),
            ..
        } => ends_in_display(then) && ends_in_display(else_),
        Statement::Block { body } => body.last().is_some_and(ends_in_display),
        other => other.as_display().is_some(),
    }
}
