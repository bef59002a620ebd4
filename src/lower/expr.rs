use crate::ast::{Body, Expression};
use crate::tree::{NodeKind, ParseNode, TokenKind};

use super::ops::{lookup_binary, lookup_unary};
use super::shape::{classify_expression, ExprShape};
use super::stmt::lower_block;
use super::LowerError;

/// Lower one expression node. Grouping parentheses leave no trace.
pub fn lower_expression(node: &ParseNode) -> Result<Expression, LowerError> {
    match classify_expression(node) {
        ExprShape::Int(tok) => tok
            .text()
            .parse::<i64>()
            .map(Expression::IntLit)
            .map_err(|_| invalid_literal("integer", tok)),
        ExprShape::Float(tok) => tok
            .text()
            .parse::<f64>()
            .map(Expression::FloatLit)
            .map_err(|_| invalid_literal("float", tok)),
        ExprShape::Str(tok) => strip_quotes(tok.text())
            .map(|s| Expression::StringLit(s.to_string()))
            .ok_or_else(|| invalid_literal("string", tok)),
        ExprShape::Bool(tok) => Ok(Expression::BoolLit(tok.text() == "true")),
        ExprShape::Ident(tok) => Ok(Expression::Ident(tok.text().to_string())),
        ExprShape::Group(inner) => lower_expression(inner),
        ExprShape::Binary { left, op, right } => {
            let op = lookup_binary(op.text(), op.span())?;
            let left = lower_expression(left)?;
            let right = lower_expression(right)?;
            Ok(Expression::binary(op, left, right))
        }
        ExprShape::Prefix { op, operand } => {
            let op = lookup_unary(op.text(), op.span())?;
            Ok(Expression::Unary {
                op,
                operand: Box::new(lower_expression(operand)?),
            })
        }
        ExprShape::Call { callee, args } => {
            let callee = lower_expression(callee)?;
            let args = lower_elements(args)?;
            Ok(Expression::Call {
                callee: Box::new(callee),
                args,
            })
        }
        ExprShape::Array(node) => Ok(Expression::ArrayLit {
            elements: lower_elements(node)?,
        }),
        ExprShape::Lambda(node) => lower_lambda(node),
        ExprShape::Unknown => Err(LowerError::unsupported_expression(node)),
    }
}

/// Every `Expression` child, left to right.
fn lower_elements(node: &ParseNode) -> Result<Vec<Expression>, LowerError> {
    node.children_of(NodeKind::Expression)
        .map(lower_expression)
        .collect()
}

fn lower_lambda(node: &ParseNode) -> Result<Expression, LowerError> {
    let params = param_names(node);
    let body = if let Some(block) = node.child(NodeKind::Block) {
        Body::Block(lower_block(block)?)
    } else if let Some(expr) = node.child(NodeKind::Expression) {
        Body::Expr(Box::new(lower_expression(expr)?))
    } else {
        return Err(LowerError::unsupported_expression(node));
    };
    Ok(Expression::Lambda { params, body })
}

/// Names from the node's parameter list; empty when there is none.
pub(super) fn param_names(node: &ParseNode) -> Vec<String> {
    node.child(NodeKind::ParameterList)
        .map(|list| {
            list.children_of(NodeKind::Token(TokenKind::Ident))
                .map(|name| name.text().to_string())
                .collect()
        })
        .unwrap_or_default()
}

/// Drop exactly one leading and one trailing character.
fn strip_quotes(text: &str) -> Option<&str> {
    let mut chars = text.chars();
    chars.next()?;
    chars.next_back()?;
    Some(chars.as_str())
}

fn invalid_literal(kind: &'static str, tok: &ParseNode) -> LowerError {
    LowerError::InvalidLiteral {
        kind,
        text: tok.text().to_string(),
        span: tok.span(),
    }
}
