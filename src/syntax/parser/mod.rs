//! Recursive-descent parser producing the grammar-shaped parse tree.
//!
//! The parser never builds lowered nodes; it only records which grammar
//! rule matched and what source each node covers. Syntax errors are
//! collected as diagnostics and a tree with any diagnostics is rejected.

mod expr;

#[cfg(test)]
mod tests;

use std::sync::Arc;

use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};
use crate::tree::{NodeKind, ParseNode, TokenKind};

pub(crate) const DEFAULT_MAX_NESTING_DEPTH: u32 = 256;

pub(crate) struct Parser<'src> {
    source: &'src str,
    shared: Arc<str>,
    tokens: Vec<Spanned<Lexeme>>,
    pos: usize,
    diagnostics: Vec<Diagnostic>,
    depth: u32,
    max_depth: u32,
    overflowed: bool,
}

impl<'src> Parser<'src> {
    pub(crate) fn new(tokens: Vec<Spanned<Lexeme>>, source: &'src str) -> Self {
        Self {
            source,
            shared: Arc::from(source),
            tokens,
            pos: 0,
            diagnostics: Vec::new(),
            depth: 0,
            max_depth: DEFAULT_MAX_NESTING_DEPTH,
            overflowed: false,
        }
    }

    pub(crate) fn with_max_depth(mut self, max_depth: u32) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Returns false once the depth limit is hit; the error is reported once
    /// and parsing stops.
    fn enter_nesting(&mut self) -> bool {
        if self.overflowed {
            return false;
        }
        self.depth += 1;
        if self.depth > self.max_depth {
            self.depth -= 1;
            let msg = format!("nesting depth exceeded (maximum {} levels)", self.max_depth);
            self.error_with_help(
                &msg,
                "simplify your program by extracting deeply nested code into functions",
            );
            self.overflowed = true;
            return false;
        }
        true
    }

    fn exit_nesting(&mut self) {
        self.exit_nesting_by(1);
    }

    fn exit_nesting_by(&mut self, levels: u32) {
        self.depth -= levels;
    }

    pub(crate) fn parse_program(mut self) -> Result<ParseNode, Vec<Diagnostic>> {
        let mut statements = Vec::new();
        while !self.at(&Lexeme::Eof) {
            statements.push(self.parse_statement_guarded());
            if self.overflowed {
                break;
            }
        }

        if !self.diagnostics.is_empty() {
            return Err(self.diagnostics);
        }
        let span = Span::new(0, self.source.len() as u32);
        Ok(ParseNode::sliced(NodeKind::Program, &self.shared, span, statements))
    }

    /// Parse one statement, always making progress and resynchronizing at
    /// the next `;` after a malformed statement.
    fn parse_statement_guarded(&mut self) -> ParseNode {
        let before_pos = self.pos;
        let before_errors = self.diagnostics.len();
        let stmt = self.parse_statement();
        if self.diagnostics.len() > before_errors && !self.overflowed {
            self.synchronize();
        }
        if self.pos == before_pos && !self.at(&Lexeme::Eof) {
            self.advance();
        }
        stmt
    }

    fn synchronize(&mut self) {
        if matches!(
            self.prev_lexeme(),
            Some(Lexeme::Semicolon) | Some(Lexeme::RBrace)
        ) {
            return;
        }
        while !self.at(&Lexeme::Eof) && !self.at(&Lexeme::RBrace) {
            if self.eat(&Lexeme::Semicolon) {
                return;
            }
            self.advance();
        }
    }

    fn parse_statement(&mut self) -> ParseNode {
        if !self.enter_nesting() {
            return self.missing(NodeKind::Statement);
        }

        let mut children = Vec::new();
        match self.peek().clone() {
            Lexeme::Let => {
                children.push(self.parse_variable_declaration());
                children.extend(self.expect(&Lexeme::Semicolon));
            }
            Lexeme::Fn => children.push(self.parse_function_definition()),
            Lexeme::Return => {
                children.push(self.parse_return());
                children.extend(self.expect(&Lexeme::Semicolon));
            }
            Lexeme::If => children.push(self.parse_if()),
            Lexeme::While => children.push(self.parse_while()),
            Lexeme::LBrace => children.push(self.parse_block()),
            Lexeme::Ident(_) if self.peek_at(1) == &Lexeme::Eq => {
                children.push(self.parse_assignment());
                children.extend(self.expect(&Lexeme::Semicolon));
            }
            _ => {
                children.push(self.parse_expression());
                children.extend(self.expect(&Lexeme::Semicolon));
            }
        }

        self.exit_nesting();
        self.node(NodeKind::Statement, children)
    }

    pub(super) fn parse_block(&mut self) -> ParseNode {
        let mut children = Vec::new();
        children.extend(self.expect(&Lexeme::LBrace));
        while !self.at(&Lexeme::RBrace) && !self.at(&Lexeme::Eof) {
            children.push(self.parse_statement_guarded());
            if self.overflowed {
                break;
            }
        }
        children.extend(self.expect(&Lexeme::RBrace));
        self.node(NodeKind::Block, children)
    }

    fn parse_variable_declaration(&mut self) -> ParseNode {
        let mut children = vec![self.bump()]; // let
        children.extend(self.expect_ident());
        if self.at(&Lexeme::Eq) {
            children.push(self.bump());
            children.push(self.parse_expression());
        }
        self.node(NodeKind::VariableDeclaration, children)
    }

    fn parse_assignment(&mut self) -> ParseNode {
        let name = self.bump();
        let eq = self.bump();
        let value = self.parse_expression();
        self.node(NodeKind::Assignment, vec![name, eq, value])
    }

    /// `fn name(params) => expr;` or `fn name(params) { ... }`.
    fn parse_function_definition(&mut self) -> ParseNode {
        let mut children = vec![self.bump()]; // fn
        children.extend(self.expect_ident());
        children.extend(self.expect(&Lexeme::LParen));
        if !self.at(&Lexeme::RParen) {
            children.push(self.parse_parameter_list());
        }
        children.extend(self.expect(&Lexeme::RParen));

        let mut arrow = false;
        if self.at(&Lexeme::FatArrow) {
            arrow = true;
            children.push(self.bump());
            children.push(self.parse_expression());
            children.extend(self.expect(&Lexeme::Semicolon));
        } else if self.at(&Lexeme::LBrace) {
            children.push(self.parse_block());
        } else {
            self.error_with_help(
                &format!(
                    "expected '=>' or '{{' after function parameters, found {}",
                    self.peek().description()
                ),
                "write `fn f(a) => a + 1;` or `fn f(a) { return a + 1; }`",
            );
        }
        self.node(NodeKind::FunctionDefinition, children)
            .with_arrow(arrow)
    }

    pub(super) fn parse_parameter_list(&mut self) -> ParseNode {
        let mut children = Vec::new();
        children.extend(self.expect_ident());
        while self.at(&Lexeme::Comma) {
            children.push(self.bump());
            children.extend(self.expect_ident());
        }
        self.node(NodeKind::ParameterList, children)
    }

    fn parse_return(&mut self) -> ParseNode {
        let mut children = vec![self.bump()]; // return
        if !self.at(&Lexeme::Semicolon) {
            children.push(self.parse_expression());
        }
        self.node(NodeKind::ReturnStatement, children)
    }

    fn parse_if(&mut self) -> ParseNode {
        let mut children = vec![self.bump()]; // if
        children.extend(self.expect(&Lexeme::LParen));
        children.push(self.parse_expression());
        children.extend(self.expect(&Lexeme::RParen));
        children.push(self.parse_statement());
        if self.at(&Lexeme::Else) {
            children.push(self.bump());
            children.push(self.parse_statement());
        }
        self.node(NodeKind::IfStatement, children)
    }

    fn parse_while(&mut self) -> ParseNode {
        let mut children = vec![self.bump()]; // while
        children.extend(self.expect(&Lexeme::LParen));
        children.push(self.parse_expression());
        children.extend(self.expect(&Lexeme::RParen));
        children.push(self.parse_statement());
        self.node(NodeKind::WhileStatement, children)
    }

    // --- Node construction ---

    /// Interior node covering its children; text is the covered source.
    fn node(&self, kind: NodeKind, children: Vec<ParseNode>) -> ParseNode {
        let span = children
            .iter()
            .map(ParseNode::span)
            .reduce(Span::merge)
            .unwrap_or_else(|| self.empty_span());
        ParseNode::sliced(kind, &self.shared, span, children)
    }

    /// Empty placeholder at the current position, used after an error.
    fn missing(&self, kind: NodeKind) -> ParseNode {
        ParseNode::sliced(kind, &self.shared, self.empty_span(), Vec::new())
    }

    fn empty_span(&self) -> Span {
        let at = self.current_span().start;
        Span::new(at, at)
    }

    /// Consume the current token as a leaf node.
    fn bump(&mut self) -> ParseNode {
        let tok = self.advance();
        let (kind, span) = (NodeKind::Token(token_kind(&tok.node)), tok.span);
        ParseNode::sliced(kind, &self.shared, span, Vec::new())
    }

    // --- Utility methods ---

    fn peek(&self) -> &Lexeme {
        &self.tokens[self.pos].node
    }

    fn peek_at(&self, offset: usize) -> &Lexeme {
        let idx = (self.pos + offset).min(self.tokens.len() - 1);
        &self.tokens[idx].node
    }

    fn prev_lexeme(&self) -> Option<&Lexeme> {
        self.pos.checked_sub(1).map(|i| &self.tokens[i].node)
    }

    fn current_span(&self) -> Span {
        self.tokens[self.pos].span
    }

    fn advance(&mut self) -> &Spanned<Lexeme> {
        let idx = self.pos;
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
        &self.tokens[idx]
    }

    fn at(&self, token: &Lexeme) -> bool {
        std::mem::discriminant(self.peek()) == std::mem::discriminant(token)
    }

    fn eat(&mut self, token: &Lexeme) -> bool {
        if self.at(token) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn expect(&mut self, token: &Lexeme) -> Option<ParseNode> {
        if self.at(token) {
            Some(self.bump())
        } else {
            self.error_at_current(&format!(
                "expected {}, found {}",
                token.description(),
                self.peek().description()
            ));
            None
        }
    }

    fn expect_ident(&mut self) -> Option<ParseNode> {
        if matches!(self.peek(), Lexeme::Ident(_)) {
            Some(self.bump())
        } else {
            self.error_at_current(&format!(
                "expected identifier, found {}",
                self.peek().description()
            ));
            None
        }
    }

    /// Once the nesting limit has been hit, follow-on errors are dropped.
    fn error_at_current(&mut self, msg: &str) {
        if self.overflowed {
            return;
        }
        self.diagnostics
            .push(Diagnostic::error(msg.to_string(), self.current_span()));
    }

    fn error_with_help(&mut self, msg: &str, help: &str) {
        if self.overflowed {
            return;
        }
        self.diagnostics.push(
            Diagnostic::error(msg.to_string(), self.current_span()).with_help(help.to_string()),
        );
    }
}

fn token_kind(lexeme: &Lexeme) -> TokenKind {
    match lexeme {
        Lexeme::Integer(_) => TokenKind::Int,
        Lexeme::Float(_) => TokenKind::Float,
        Lexeme::Str(_) => TokenKind::Str,
        Lexeme::True | Lexeme::False => TokenKind::Bool,
        Lexeme::Ident(_) => TokenKind::Ident,
        Lexeme::Let
        | Lexeme::Fn
        | Lexeme::Return
        | Lexeme::If
        | Lexeme::Else
        | Lexeme::While => TokenKind::Keyword,
        Lexeme::Bang => TokenKind::Operator,
        other if other.is_binary_operator() => TokenKind::Operator,
        _ => TokenKind::Punct,
    }
}
