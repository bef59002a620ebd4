//! Rendering of the target AST back to source form.
//!
//! Programs render as a `fn main() { ... }` wrapper with four-space
//! indentation. Parentheses appear only where operator precedence needs
//! them, so rendering a lowered `(((e)))` gives the same text as `e`.

use std::fmt;

use super::{Body, Expression, Operation, Program, Statement};

const INDENT: &str = "    ";

/// Render a whole program, entry point included.
pub fn format_program(program: &Program) -> String {
    let mut out = format!("fn {}() {{\n", program.entry_point());
    for stmt in program.statements() {
        out.push_str(INDENT);
        write_stmt(&mut out, stmt, 1);
        out.push('\n');
    }
    out.push_str("}\n");
    out
}

/// Render one statement at the given nesting level. The first line is
/// not indented; nested lines are.
pub fn format_stmt(stmt: &Statement, level: usize) -> String {
    let mut out = String::new();
    write_stmt(&mut out, stmt, level);
    out
}

fn write_stmt(out: &mut String, stmt: &Statement, level: usize) {
    match stmt {
        Statement::VarDecl { name, init: None } => {
            out.push_str(&format!("let {};", name));
        }
        Statement::VarDecl {
            name,
            init: Some(init),
        } => {
            out.push_str(&format!("let {} = {};", name, format_expr(init, level)));
        }
        Statement::Assign { name, value } => {
            out.push_str(&format!("{} = {};", name, format_expr(value, level)));
        }
        Statement::ExprStmt { value } => {
            out.push_str(&format_expr(value, level));
            out.push(';');
        }
        Statement::Return { value: None } => out.push_str("return;"),
        Statement::Return { value: Some(value) } => {
            out.push_str(&format!("return {};", format_expr(value, level)));
        }
        Statement::If { cond, then, else_ } => {
            out.push_str(&format!("if ({}) ", format_expr(cond, level)));
            write_stmt(out, then, level);
            if let Some(else_) = else_ {
                out.push_str(" else ");
                write_stmt(out, else_, level);
            }
        }
        Statement::While { cond, body } => {
            out.push_str(&format!("while ({}) ", format_expr(cond, level)));
            write_stmt(out, body, level);
        }
        Statement::Block { body } => write_block(out, body, level),
        Statement::FuncDef { name, params, body } => {
            out.push_str(&format!("fn {}({}) ", name, params.join(", ")));
            match body {
                Body::Block(stmts) => write_block(out, stmts, level),
                Body::Expr(expr) => {
                    out.push_str(&format!("=> {};", format_expr(expr, level)));
                }
            }
        }
    }
}

fn write_block(out: &mut String, body: &[Statement], level: usize) {
    if body.is_empty() {
        out.push_str("{}");
        return;
    }
    out.push_str("{\n");
    for stmt in body {
        out.push_str(&INDENT.repeat(level + 1));
        write_stmt(out, stmt, level + 1);
        out.push('\n');
    }
    out.push_str(&INDENT.repeat(level));
    out.push('}');
}

/// Render an expression. `level` only matters for block-bodied lambdas.
pub fn format_expr(expr: &Expression, level: usize) -> String {
    match expr {
        Expression::IntLit(n) => n.to_string(),
        Expression::FloatLit(x) => format_float(*x),
        Expression::StringLit(s) => format!("\"{}\"", s),
        Expression::BoolLit(b) => b.to_string(),
        Expression::Ident(name) => name.clone(),
        Expression::Binary { op, left, right } => {
            let l = format_operand(left, *op, false, level);
            let r = format_operand(right, *op, true, level);
            format!("{} {} {}", l, op, r)
        }
        Expression::Unary { op, operand } => {
            let inner = format_expr(operand, level);
            if needs_parens(operand) {
                format!("{}({})", op, inner)
            } else {
                format!("{}{}", op, inner)
            }
        }
        Expression::Call { callee, args } => {
            let args: Vec<String> = args.iter().map(|a| format_expr(a, level)).collect();
            let callee_str = format_expr(callee, level);
            if needs_parens(callee) {
                format!("({})({})", callee_str, args.join(", "))
            } else {
                format!("{}({})", callee_str, args.join(", "))
            }
        }
        Expression::ArrayLit { elements } => {
            let inner: Vec<String> = elements.iter().map(|e| format_expr(e, level)).collect();
            format!("[{}]", inner.join(", "))
        }
        Expression::Lambda { params, body } => {
            let mut out = format!("({}) => ", params.join(", "));
            match body {
                Body::Expr(expr) => out.push_str(&format_expr(expr, level)),
                Body::Block(stmts) => write_block(&mut out, stmts, level),
            }
            out
        }
    }
}

/// Operands of a binary operator get parentheses when they bind looser,
/// or equally loose on the right since every level is left-associative.
fn format_operand(expr: &Expression, parent: Operation, is_right: bool, level: usize) -> String {
    let text = format_expr(expr, level);
    let wrap = match expr {
        Expression::Binary { op, .. } => {
            let (child, parent) = (op.precedence(), parent.precedence());
            child < parent || (is_right && child == parent)
        }
        Expression::Lambda { .. } => true,
        _ => false,
    };
    if wrap {
        format!("({})", text)
    } else {
        text
    }
}

fn needs_parens(expr: &Expression) -> bool {
    matches!(
        expr,
        Expression::Binary { .. } | Expression::Unary { .. } | Expression::Lambda { .. }
    )
}

/// Floats always carry a decimal point so they never read back as ints.
pub fn format_float(x: f64) -> String {
    let text = x.to_string();
    if !x.is_finite() || text.contains('.') {
        text
    } else {
        format!("{}.0", text)
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_program(self))
    }
}

impl fmt::Display for Statement {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_stmt(self, 0))
    }
}

impl fmt::Display for Expression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&format_expr(self, 0))
    }
}
