//! Lowering: grammar-shaped parse tree → target AST.
//!
//! Each parse node is first classified into a closed shape (see `shape`),
//! then a single exhaustive match builds the target node. The pass is pure:
//! it holds no state between calls and the first error aborts the request.

mod expr;
pub mod ops;
mod shape;
mod stmt;


pub use expr::lower_expression;
pub use stmt::{lower_block, lower_statement};

use crate::ast::Statement;
use crate::diagnostic::Diagnostic;
use crate::span::Span;
use crate::tree::{NodeKind, ParseNode};

/// Name given to a function definition whose name token is missing.
pub const UNNAMED_FUNCTION: &str = "unnamed";

/// A fatal lowering failure. Every variant carries the span of the node
/// that caused it; node-level variants also carry its source text.
#[derive(Clone, Debug, PartialEq, thiserror::Error)]
pub enum LowerError {
    #[error("unsupported operator '{spelling}'")]
    UnsupportedOperator { spelling: String, span: Span },

    #[error("unsupported expression: `{text}`")]
    UnsupportedExpression { text: String, span: Span },

    #[error("unsupported statement: `{text}`")]
    UnsupportedStatement { text: String, span: Span },

    #[error("invalid {kind} literal `{text}`")]
    InvalidLiteral {
        kind: &'static str,
        text: String,
        span: Span,
    },

    #[error("failed to lower function '{name}'")]
    FunctionLowering {
        name: String,
        span: Span,
        source: Box<LowerError>,
    },
}

impl LowerError {
    pub fn span(&self) -> Span {
        match self {
            LowerError::UnsupportedOperator { span, .. }
            | LowerError::UnsupportedExpression { span, .. }
            | LowerError::UnsupportedStatement { span, .. }
            | LowerError::InvalidLiteral { span, .. }
            | LowerError::FunctionLowering { span, .. } => *span,
        }
    }

    /// The innermost cause, following function-lowering wrappers.
    pub fn root_cause(&self) -> &LowerError {
        match self {
            LowerError::FunctionLowering { source, .. } => source.root_cause(),
            other => other,
        }
    }

    pub fn to_diagnostic(&self) -> Diagnostic {
        match self {
            LowerError::FunctionLowering { .. } => {
                let cause = self.root_cause();
                Diagnostic::error(self.to_string(), cause.span())
                    .with_note(format!("caused by: {}", cause))
            }
            LowerError::UnsupportedOperator { .. } => {
                Diagnostic::error(self.to_string(), self.span()).with_help(
                    "supported operators are + - * / % < > <= >= == != && || !".to_string(),
                )
            }
            _ => Diagnostic::error(self.to_string(), self.span()),
        }
    }

    pub(crate) fn unsupported_statement(node: &ParseNode) -> Self {
        LowerError::UnsupportedStatement {
            text: node.text().to_string(),
            span: node.span(),
        }
    }

    pub(crate) fn unsupported_expression(node: &ParseNode) -> Self {
        LowerError::UnsupportedExpression {
            text: node.text().to_string(),
            span: node.span(),
        }
    }
}

/// Lower every top-level statement of a `Program` node, in source order.
pub fn lower_program(root: &ParseNode) -> Result<Vec<Statement>, LowerError> {
    if root.kind() != NodeKind::Program {
        return Err(LowerError::unsupported_statement(root));
    }
    let statements = root
        .children_of(NodeKind::Statement)
        .map(lower_statement)
        .collect::<Result<Vec<_>, _>>()
        .inspect_err(|err| tracing::warn!(error = %err, "lowering failed"))?;
    tracing::debug!(statements = statements.len(), "lowered program");
    Ok(statements)
}
