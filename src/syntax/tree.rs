//! Grammar-shaped parse tree.
//!
//! Nodes mirror the grammar rules one-to-one and keep the exact source text
//! they cover. Consumers only ask structural questions: which kind a node
//! is, which children it has, and what its text is.

use std::fmt;
use std::sync::Arc;

use crate::span::Span;

/// Leaf token categories.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Int,
    Float,
    Str,
    Bool,
    Ident,
    /// Infix and prefix operators (`+`, `&&`, `!`, ...).
    Operator,
    Keyword,
    /// Delimiters and separators, including `=` and `=>`.
    Punct,
}

/// Grammar rule a node was produced by.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum NodeKind {
    Program,
    Statement,
    VariableDeclaration,
    Assignment,
    FunctionDefinition,
    ReturnStatement,
    IfStatement,
    WhileStatement,
    Block,
    Expression,
    Primary,
    ParameterList,
    ArgumentList,
    ArrayLiteral,
    LambdaExpression,
    Token(TokenKind),
}

#[derive(Clone)]
pub struct ParseNode {
    kind: NodeKind,
    span: Span,
    children: Vec<ParseNode>,
    /// Set on function definitions written as `fn f(..) => expr;`.
    arrow: bool,
    /// Every node of a parsed tree shares one copy of the source and keeps
    /// only the range it covers.
    source: Arc<str>,
    text: Span,
}

impl ParseNode {
    /// A node owning its own text; used for hand-built trees.
    pub fn new(kind: NodeKind, text: impl Into<String>, span: Span, children: Vec<ParseNode>) -> Self {
        let source: Arc<str> = Arc::from(text.into());
        let text = Span::new(0, source.len() as u32);
        Self {
            kind,
            span,
            children,
            arrow: false,
            source,
            text,
        }
    }

    /// A node whose text is the `span` slice of a shared source.
    pub(crate) fn sliced(kind: NodeKind, source: &Arc<str>, span: Span, children: Vec<ParseNode>) -> Self {
        Self {
            kind,
            span,
            children,
            arrow: false,
            source: Arc::clone(source),
            text: span,
        }
    }

    pub fn token(kind: TokenKind, text: impl Into<String>, span: Span) -> Self {
        Self::new(NodeKind::Token(kind), text, span, Vec::new())
    }

    /// Build an interior node whose text is its children's text joined by
    /// single spaces and whose span covers all children.
    pub fn from_children(kind: NodeKind, children: Vec<ParseNode>) -> Self {
        let text = children
            .iter()
            .map(ParseNode::text)
            .collect::<Vec<_>>()
            .join(" ");
        let span = children
            .iter()
            .map(|c| c.span)
            .reduce(Span::merge)
            .unwrap_or_else(Span::dummy);
        Self::new(kind, text, span, children)
    }

    pub fn with_arrow(mut self, arrow: bool) -> Self {
        self.arrow = arrow;
        self
    }

    pub fn kind(&self) -> NodeKind {
        self.kind
    }

    pub fn text(&self) -> &str {
        self.source.get(self.text.range()).unwrap_or_default()
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn children(&self) -> &[ParseNode] {
        &self.children
    }

    pub fn is_arrow(&self) -> bool {
        self.arrow
    }

    /// First child of the given kind.
    pub fn child(&self, kind: NodeKind) -> Option<&ParseNode> {
        self.children.iter().find(|c| c.kind == kind)
    }

    /// All children of the given kind, in source order.
    pub fn children_of(&self, kind: NodeKind) -> impl Iterator<Item = &ParseNode> + '_ {
        self.children.iter().filter(move |c| c.kind == kind)
    }

    pub fn has(&self, kind: NodeKind) -> bool {
        self.child(kind).is_some()
    }

    /// First token child of the given category.
    pub fn token_child(&self, kind: TokenKind) -> Option<&ParseNode> {
        self.child(NodeKind::Token(kind))
    }

    /// Whether this node is a token leaf spelled exactly `text`.
    pub fn is_token(&self, text: &str) -> bool {
        matches!(self.kind, NodeKind::Token(_)) && self.text() == text
    }

    /// Number of nodes in this subtree.
    pub fn size(&self) -> usize {
        1 + self.children.iter().map(ParseNode::size).sum::<usize>()
    }
}

impl PartialEq for ParseNode {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
            && self.span == other.span
            && self.arrow == other.arrow
            && self.text() == other.text()
            && self.children == other.children
    }
}

impl fmt::Debug for ParseNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ParseNode")
            .field("kind", &self.kind)
            .field("text", &self.text())
            .field("span", &self.span)
            .field("arrow", &self.arrow)
            .field("children", &self.children)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tok(kind: TokenKind, text: &str, start: u32) -> ParseNode {
        ParseNode::token(kind, text, Span::new(start, start + text.len() as u32))
    }

    #[test]
    fn test_from_children_joins_text_and_spans() {
        let node = ParseNode::from_children(
            NodeKind::Assignment,
            vec![
                tok(TokenKind::Ident, "x", 0),
                tok(TokenKind::Punct, "=", 2),
                tok(TokenKind::Int, "1", 4),
            ],
        );
        assert_eq!(node.text(), "x = 1");
        assert_eq!(node.span(), Span::new(0, 5));
        assert_eq!(node.size(), 4);
    }

    #[test]
    fn test_structural_queries() {
        let node = ParseNode::from_children(
            NodeKind::ParameterList,
            vec![
                tok(TokenKind::Ident, "a", 0),
                tok(TokenKind::Punct, ",", 1),
                tok(TokenKind::Ident, "b", 3),
            ],
        );
        assert!(node.has(NodeKind::Token(TokenKind::Ident)));
        assert!(!node.has(NodeKind::Expression));
        let names: Vec<_> = node
            .children_of(NodeKind::Token(TokenKind::Ident))
            .map(ParseNode::text)
            .collect();
        assert_eq!(names, vec!["a", "b"]);
        assert!(node.children()[1].is_token(","));
        assert!(!node.is_token("a"));
    }

    #[test]
    fn test_empty_interior_node() {
        let node = ParseNode::from_children(NodeKind::ArgumentList, Vec::new());
        assert_eq!(node.text(), "");
        assert_eq!(node.span(), Span::dummy());
        assert!(!node.is_arrow());
        assert!(node.clone().with_arrow(true).is_arrow());
    }

    #[test]
    fn test_parsed_nodes_share_one_source() {
        let source = format!("{}1;", "1 + ".repeat(200));
        let root = crate::syntax::parse(&source, 256).unwrap();
        let mut stack = vec![&root];
        let mut nodes = 0;
        while let Some(node) = stack.pop() {
            assert!(Arc::ptr_eq(&node.source, &root.source));
            nodes += 1;
            stack.extend(node.children());
        }
        assert!(nodes > 1000);
        assert_eq!(root.children()[0].text(), source);
        assert_eq!(root.children()[0].children()[0].children()[2].text(), "1");
    }
}
