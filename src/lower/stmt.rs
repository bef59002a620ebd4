use crate::ast::{Body, Expression, Statement};
use crate::tree::{NodeKind, ParseNode, TokenKind};

use super::expr::{lower_expression, param_names};
use super::shape::{classify_statement, StmtShape};
use super::{LowerError, UNNAMED_FUNCTION};

/// Lower one statement node. Auto-display is not applied here.
pub fn lower_statement(node: &ParseNode) -> Result<Statement, LowerError> {
    match classify_statement(node) {
        StmtShape::VarDecl(decl) => {
            let name = declared_name(decl)?;
            let init = decl
                .child(NodeKind::Expression)
                .map(lower_expression)
                .transpose()?;
            Ok(Statement::VarDecl { name, init })
        }
        StmtShape::Assign(assign) => {
            let name = declared_name(assign)?;
            let value = required_expression(assign)?;
            Ok(Statement::Assign { name, value })
        }
        StmtShape::FuncDef(def) => lower_function(def),
        StmtShape::Return(ret) => {
            let value = ret
                .child(NodeKind::Expression)
                .map(lower_expression)
                .transpose()?;
            Ok(Statement::Return { value })
        }
        StmtShape::If(node) => {
            let cond = required_expression(node)?;
            let mut branches = node.children_of(NodeKind::Statement);
            let then = branches
                .next()
                .ok_or_else(|| LowerError::unsupported_statement(node))?;
            let then = Box::new(lower_statement(then)?);
            let else_ = branches
                .next()
                .map(lower_statement)
                .transpose()?
                .map(Box::new);
            Ok(Statement::If { cond, then, else_ })
        }
        StmtShape::While(node) => {
            let cond = required_expression(node)?;
            let body = node
                .child(NodeKind::Statement)
                .ok_or_else(|| LowerError::unsupported_statement(node))?;
            Ok(Statement::While {
                cond,
                body: Box::new(lower_statement(body)?),
            })
        }
        StmtShape::Expr(expr) => Ok(Statement::ExprStmt {
            value: lower_expression(expr)?,
        }),
        StmtShape::Block(block) => Ok(Statement::Block {
            body: lower_block(block)?,
        }),
        StmtShape::Unknown => Err(LowerError::unsupported_statement(node)),
    }
}

/// Lower every statement of a block, in source order.
pub fn lower_block(node: &ParseNode) -> Result<Vec<Statement>, LowerError> {
    node.children_of(NodeKind::Statement)
        .map(lower_statement)
        .collect()
}

/// `fn f(a) => e;` becomes a block returning `e`; a block body is lowered
/// as written; with neither the body is empty. Any failure inside is
/// reported as a failure of the function as a whole.
fn lower_function(def: &ParseNode) -> Result<Statement, LowerError> {
    let name = def
        .token_child(TokenKind::Ident)
        .map_or(UNNAMED_FUNCTION, ParseNode::text)
        .to_string();

    let body = lower_function_body(def).map_err(|source| LowerError::FunctionLowering {
        name: name.clone(),
        span: def.span(),
        source: Box::new(source),
    })?;

    Ok(Statement::FuncDef {
        name,
        params: param_names(def),
        body,
    })
}

fn lower_function_body(def: &ParseNode) -> Result<Body, LowerError> {
    if let Some(expr) = def.child(NodeKind::Expression).filter(|_| def.is_arrow()) {
        let value = lower_expression(expr)?;
        return Ok(Body::Block(vec![Statement::Return { value: Some(value) }]));
    }
    match def.child(NodeKind::Block) {
        Some(block) => Ok(Body::Block(lower_block(block)?)),
        None => Ok(Body::Block(Vec::new())),
    }
}

fn declared_name(node: &ParseNode) -> Result<String, LowerError> {
    node.token_child(TokenKind::Ident)
        .map(|name| name.text().to_string())
        .ok_or_else(|| LowerError::unsupported_statement(node))
}

fn required_expression(node: &ParseNode) -> Result<Expression, LowerError> {
    let expr = node
        .child(NodeKind::Expression)
        .ok_or_else(|| LowerError::unsupported_statement(node))?;
    lower_expression(expr)
}
