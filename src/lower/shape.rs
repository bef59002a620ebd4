//! Shape classification.
//!
//! A parse node is recognized structurally, by which children it has,
//! before any lowering happens. Unrecognized nodes classify as `Unknown`
//! and the lowerers turn that into an error; nothing is guessed.

use crate::tree::{NodeKind, ParseNode, TokenKind};

#[derive(Clone, Copy, Debug)]
pub(super) enum StmtShape<'a> {
    VarDecl(&'a ParseNode),
    Assign(&'a ParseNode),
    FuncDef(&'a ParseNode),
    Return(&'a ParseNode),
    If(&'a ParseNode),
    While(&'a ParseNode),
    Expr(&'a ParseNode),
    Block(&'a ParseNode),
    Unknown,
}

#[derive(Clone, Copy, Debug)]
pub(super) enum ExprShape<'a> {
    Int(&'a ParseNode),
    Float(&'a ParseNode),
    Str(&'a ParseNode),
    Bool(&'a ParseNode),
    Ident(&'a ParseNode),
    /// `( inner )`
    Group(&'a ParseNode),
    Binary {
        left: &'a ParseNode,
        op: &'a ParseNode,
        right: &'a ParseNode,
    },
    Prefix {
        op: &'a ParseNode,
        operand: &'a ParseNode,
    },
    Call {
        callee: &'a ParseNode,
        args: &'a ParseNode,
    },
    Array(&'a ParseNode),
    Lambda(&'a ParseNode),
    Unknown,
}

/// Sub-structures a statement may carry, in the order they are tried.
const STATEMENT_KINDS: [NodeKind; 8] = [
    NodeKind::VariableDeclaration,
    NodeKind::Assignment,
    NodeKind::FunctionDefinition,
    NodeKind::ReturnStatement,
    NodeKind::IfStatement,
    NodeKind::WhileStatement,
    NodeKind::Expression,
    NodeKind::Block,
];

pub(super) fn classify_statement(node: &ParseNode) -> StmtShape<'_> {
    let inner = if node.kind() == NodeKind::Statement {
        STATEMENT_KINDS.iter().find_map(|kind| node.child(*kind))
    } else {
        Some(node)
    };
    let Some(inner) = inner else {
        return StmtShape::Unknown;
    };
    match inner.kind() {
        NodeKind::VariableDeclaration => StmtShape::VarDecl(inner),
        NodeKind::Assignment => StmtShape::Assign(inner),
        NodeKind::FunctionDefinition => StmtShape::FuncDef(inner),
        NodeKind::ReturnStatement => StmtShape::Return(inner),
        NodeKind::IfStatement => StmtShape::If(inner),
        NodeKind::WhileStatement => StmtShape::While(inner),
        NodeKind::Expression => StmtShape::Expr(inner),
        NodeKind::Block => StmtShape::Block(inner),
        _ => StmtShape::Unknown,
    }
}

pub(super) fn classify_expression(node: &ParseNode) -> ExprShape<'_> {
    match node.kind() {
        NodeKind::Token(kind) => classify_token(node, kind),
        NodeKind::ArrayLiteral => ExprShape::Array(node),
        NodeKind::LambdaExpression => ExprShape::Lambda(node),
        NodeKind::Primary => match node.children() {
            [only] => classify_expression(only),
            _ => ExprShape::Unknown,
        },
        NodeKind::Expression => classify_composite(node),
        _ => ExprShape::Unknown,
    }
}

fn classify_token(node: &ParseNode, kind: TokenKind) -> ExprShape<'_> {
    match kind {
        TokenKind::Int => ExprShape::Int(node),
        TokenKind::Float => ExprShape::Float(node),
        TokenKind::Str => ExprShape::Str(node),
        TokenKind::Bool => ExprShape::Bool(node),
        TokenKind::Ident => ExprShape::Ident(node),
        TokenKind::Operator | TokenKind::Keyword | TokenKind::Punct => ExprShape::Unknown,
    }
}

fn classify_composite(node: &ParseNode) -> ExprShape<'_> {
    match node.children() {
        [only] => classify_expression(only),
        [open, inner, close] if open.is_token("(") && close.is_token(")") => {
            ExprShape::Group(inner)
        }
        [left, op, right] if is_token(op) && is_operand(left) && is_operand(right) => {
            ExprShape::Binary { left, op, right }
        }
        [op, operand] if is_token(op) && is_operand(operand) => ExprShape::Prefix { op, operand },
        [callee, open, args, close]
            if open.is_token("(")
                && args.kind() == NodeKind::ArgumentList
                && close.is_token(")") =>
        {
            ExprShape::Call { callee, args }
        }
        _ => ExprShape::Unknown,
    }
}

fn is_token(node: &ParseNode) -> bool {
    matches!(node.kind(), NodeKind::Token(_))
}

fn is_operand(node: &ParseNode) -> bool {
    matches!(node.kind(), NodeKind::Expression | NodeKind::Primary)
}
