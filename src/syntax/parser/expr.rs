use crate::lexeme::Lexeme;
use crate::tree::{NodeKind, ParseNode};

use super::Parser;

impl Parser<'_> {
    pub(super) fn parse_expression(&mut self) -> ParseNode {
        self.parse_expr_bp(0)
    }

    fn parse_expr_bp(&mut self, min_bp: u8) -> ParseNode {
        if !self.enter_nesting() {
            return self.missing(NodeKind::Expression);
        }

        let mut lhs = self.parse_unary();

        // Each fold deepens the left spine by one level.
        let mut folds = 0;
        loop {
            let Some((l_bp, r_bp)) = binding_power(self.peek()) else {
                break;
            };
            if l_bp < min_bp || !self.enter_nesting() {
                break;
            }
            folds += 1;

            let op = self.bump();
            let rhs = self.parse_expr_bp(r_bp);
            lhs = self.node(NodeKind::Expression, vec![lhs, op, rhs]);
        }

        self.exit_nesting_by(folds + 1);
        lhs
    }

    /// Prefix `!` binds tighter than any infix operator, looser than calls.
    fn parse_unary(&mut self) -> ParseNode {
        if self.at(&Lexeme::Bang) {
            if !self.enter_nesting() {
                return self.missing(NodeKind::Expression);
            }
            let op = self.bump();
            let operand = self.parse_unary();
            self.exit_nesting();
            return self.node(NodeKind::Expression, vec![op, operand]);
        }
        let primary = self.parse_primary();
        self.parse_postfix(primary)
    }

    /// Call chains: `f(a)(b)`. Like infix folds, each call nests the
    /// callee one level deeper.
    fn parse_postfix(&mut self, mut expr: ParseNode) -> ParseNode {
        let mut calls = 0;
        while self.at(&Lexeme::LParen) && self.enter_nesting() {
            calls += 1;
            let lparen = self.bump();
            let args = self.parse_arguments();
            let mut children = vec![expr, lparen, args];
            children.extend(self.expect(&Lexeme::RParen));
            expr = self.node(NodeKind::Expression, children);
        }
        self.exit_nesting_by(calls);
        expr
    }

    /// The argument list node is always present, possibly empty.
    fn parse_arguments(&mut self) -> ParseNode {
        let mut children = Vec::new();
        if !self.at(&Lexeme::RParen) {
            children.push(self.parse_expression());
            while self.at(&Lexeme::Comma) {
                children.push(self.bump());
                children.push(self.parse_expression());
            }
        }
        self.node(NodeKind::ArgumentList, children)
    }

    fn parse_primary(&mut self) -> ParseNode {
        match self.peek().clone() {
            Lexeme::Integer(_)
            | Lexeme::Float(_)
            | Lexeme::Str(_)
            | Lexeme::True
            | Lexeme::False => {
                let leaf = self.bump();
                self.wrap_primary(leaf)
            }
            Lexeme::Ident(_) => {
                if self.peek_at(1) == &Lexeme::FatArrow {
                    let name = self.bump();
                    let params = self.node(NodeKind::ParameterList, vec![name]);
                    return self.parse_lambda_rest(vec![params]);
                }
                let leaf = self.bump();
                self.wrap_primary(leaf)
            }
            Lexeme::LBracket => {
                let array = self.parse_array_literal();
                self.wrap_primary(array)
            }
            Lexeme::LParen => {
                if self.lambda_ahead() {
                    let mut children = vec![self.bump()]; // (
                    if !self.at(&Lexeme::RParen) {
                        children.push(self.parse_parameter_list());
                    }
                    children.extend(self.expect(&Lexeme::RParen));
                    return self.parse_lambda_rest(children);
                }
                // Parenthesized group: kept as `( expr )` for the lowerer to collapse.
                let lparen = self.bump();
                let inner = self.parse_expression();
                let mut children = vec![lparen, inner];
                children.extend(self.expect(&Lexeme::RParen));
                self.node(NodeKind::Expression, children)
            }
            _ => {
                self.error_with_help(
                    &format!("expected expression, found {}", self.peek().description()),
                    "expressions include literals (42, 3.14, \"text\", true), names, calls, arrays, and lambdas",
                );
                let missing = self.missing(NodeKind::Expression);
                if !self.at(&Lexeme::Eof) && !self.at(&Lexeme::Semicolon) && !self.at(&Lexeme::RBrace) {
                    self.advance();
                }
                missing
            }
        }
    }

    fn parse_array_literal(&mut self) -> ParseNode {
        let mut children = vec![self.bump()]; // [
        if !self.at(&Lexeme::RBracket) {
            children.push(self.parse_expression());
            while self.at(&Lexeme::Comma) {
                children.push(self.bump());
                children.push(self.parse_expression());
            }
        }
        children.extend(self.expect(&Lexeme::RBracket));
        self.node(NodeKind::ArrayLiteral, children)
    }

    /// Parse `=> body` after the lambda parameters.
    fn parse_lambda_rest(&mut self, mut children: Vec<ParseNode>) -> ParseNode {
        children.extend(self.expect(&Lexeme::FatArrow));
        if self.at(&Lexeme::LBrace) {
            children.push(self.parse_block());
        } else {
            children.push(self.parse_expression());
        }
        let lambda = self.node(NodeKind::LambdaExpression, children);
        self.wrap_primary(lambda)
    }

    fn wrap_primary(&self, inner: ParseNode) -> ParseNode {
        let primary = self.node(NodeKind::Primary, vec![inner]);
        self.node(NodeKind::Expression, vec![primary])
    }

    /// Whether the `(` at the cursor opens a lambda parameter list:
    /// only names and commas up to the matching `)`, then `=>`.
    fn lambda_ahead(&self) -> bool {
        let mut offset = 1;
        loop {
            match self.peek_at(offset) {
                Lexeme::Ident(_) | Lexeme::Comma => offset += 1,
                Lexeme::RParen => return self.peek_at(offset + 1) == &Lexeme::FatArrow,
                _ => return false,
            }
        }
    }
}

/// Returns (left binding power, right binding power) for an infix operator.
/// All levels are left-associative.
fn binding_power(lexeme: &Lexeme) -> Option<(u8, u8)> {
    let bp = match lexeme {
        Lexeme::PipePipe => (1, 2),
        Lexeme::AmpAmp => (3, 4),
        Lexeme::EqEq | Lexeme::BangEq => (5, 6),
        Lexeme::Lt | Lexeme::Gt | Lexeme::LtEq | Lexeme::GtEq => (7, 8),
        Lexeme::Plus | Lexeme::Minus => (9, 10),
        Lexeme::Star | Lexeme::Slash | Lexeme::Percent => (11, 12),
        _ => return None,
    };
    Some(bp)
}
