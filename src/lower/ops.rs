//! Operator table: token spelling → `Operation`.

use crate::ast::Operation;
use crate::span::Span;

use super::LowerError;

/// Map an operator spelling to its operation. An unknown spelling is
/// always an error.
pub fn lookup(spelling: &str, span: Span) -> Result<Operation, LowerError> {
    Operation::from_spelling(spelling).ok_or_else(|| LowerError::UnsupportedOperator {
        spelling: spelling.to_string(),
        span,
    })
}

/// Like [`lookup`], but the operation must be infix.
pub(super) fn lookup_binary(spelling: &str, span: Span) -> Result<Operation, LowerError> {
    match lookup(spelling, span)? {
        op if op.is_unary() => Err(LowerError::UnsupportedOperator {
            spelling: spelling.to_string(),
            span,
        }),
        op => Ok(op),
    }
}

/// Like [`lookup`], but the operation must be prefix.
pub(super) fn lookup_unary(spelling: &str, span: Span) -> Result<Operation, LowerError> {
    match lookup(spelling, span)? {
        op if op.is_unary() => Ok(op),
        _ => Err(LowerError::UnsupportedOperator {
            spelling: spelling.to_string(),
            span,
        }),
    }
}
