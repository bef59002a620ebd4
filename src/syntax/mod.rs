//! Front end: source text → grammar-shaped parse tree.

pub mod lexeme;
pub(crate) mod lexer;
pub(crate) mod parser;
pub mod span;
pub mod tree;

use crate::diagnostic::Diagnostic;
use lexer::Lexer;
use parser::Parser;
use tree::ParseNode;

pub(crate) use parser::DEFAULT_MAX_NESTING_DEPTH;

/// Lex and parse a whole program. Returns every lexical and syntax
/// diagnostic found; a tree is only returned when there are none.
pub fn parse(source: &str, max_nesting_depth: u32) -> Result<ParseNode, Vec<Diagnostic>> {
    let (tokens, lex_errors) = Lexer::new(source).tokenize();
    if !lex_errors.is_empty() {
        return Err(lex_errors);
    }
    tracing::debug!(tokens = tokens.len(), "lexed source");

    Parser::new(tokens, source)
        .with_max_depth(max_nesting_depth)
        .parse_program()
}
