use super::*;
use crate::syntax::lexer::Lexer;

fn parse(source: &str) -> ParseNode {
    let (tokens, lex_diags) = Lexer::new(source).tokenize();
    assert!(lex_diags.is_empty(), "lex errors: {:?}", lex_diags);
    Parser::new(tokens, source).parse_program().unwrap()
}

fn parse_err(source: &str) -> Vec<Diagnostic> {
    let (tokens, _) = Lexer::new(source).tokenize();
    match Parser::new(tokens, source).parse_program() {
        Ok(_) => vec![],
        Err(diags) => diags,
    }
}

/// The single child of the first statement.
fn first_inner(root: &ParseNode) -> &ParseNode {
    &root.children()[0].children()[0]
}

fn kinds(node: &ParseNode) -> Vec<NodeKind> {
    node.children().iter().map(ParseNode::kind).collect()
}

#[test]
fn test_program_of_statements() {
    let root = parse("let x = 1; x = x + 1; x;");
    assert_eq!(root.kind(), NodeKind::Program);
    assert_eq!(root.children().len(), 3);
    for stmt in root.children() {
        assert_eq!(stmt.kind(), NodeKind::Statement);
    }
    assert_eq!(root.children()[1].text(), "x = x + 1;");
}

#[test]
fn test_variable_declaration_shape() {
    let root = parse("let x = 10;");
    let decl = first_inner(&root);
    assert_eq!(decl.kind(), NodeKind::VariableDeclaration);
    assert_eq!(decl.text(), "let x = 10");
    assert_eq!(
        decl.token_child(TokenKind::Ident).map(ParseNode::text),
        Some("x")
    );
    assert!(decl.has(NodeKind::Expression));
}

#[test]
fn test_declaration_without_initializer() {
    let root = parse("let y;");
    let decl = first_inner(&root);
    assert!(!decl.has(NodeKind::Expression));
}

#[test]
fn test_binary_node_has_three_children() {
    let root = parse("3 + 5 * 2;");
    let expr = first_inner(&root);
    assert_eq!(
        kinds(expr),
        vec![
            NodeKind::Expression,
            NodeKind::Token(TokenKind::Operator),
            NodeKind::Expression
        ]
    );
    assert!(expr.children()[1].is_token("+"));
    // `*` binds tighter, so it sits on the right.
    assert_eq!(expr.children()[2].text(), "5 * 2");
}

#[test]
fn test_left_associativity() {
    let root = parse("10 - 3 - 2;");
    let expr = first_inner(&root);
    assert_eq!(expr.children()[0].text(), "10 - 3");
    assert_eq!(expr.children()[2].text(), "2");
}

#[test]
fn test_logical_precedence() {
    let root = parse("a || b && c == d;");
    let expr = first_inner(&root);
    assert!(expr.children()[1].is_token("||"));
    assert_eq!(expr.children()[2].text(), "b && c == d");
}

#[test]
fn test_parenthesized_group_kept() {
    let root = parse("(1 + 2) * 3;");
    let expr = first_inner(&root);
    let group = &expr.children()[0];
    assert_eq!(group.kind(), NodeKind::Expression);
    assert!(group.children()[0].is_token("("));
    assert!(group.children()[2].is_token(")"));
}

#[test]
fn test_unary_not() {
    let root = parse("!done;");
    let expr = first_inner(&root);
    assert_eq!(expr.children().len(), 2);
    assert!(expr.children()[0].is_token("!"));
}

#[test]
fn test_call_always_has_argument_list() {
    let root = parse("f(); g(1, 2);");
    let empty = first_inner(&root);
    assert_eq!(empty.children().len(), 4);
    let args = empty.child(NodeKind::ArgumentList).unwrap();
    assert!(args.children().is_empty());

    let call = &root.children()[1].children()[0];
    let args = call.child(NodeKind::ArgumentList).unwrap();
    assert_eq!(args.children_of(NodeKind::Expression).count(), 2);
}

#[test]
fn test_chained_calls() {
    let root = parse("make(1)(2);");
    let outer = first_inner(&root);
    assert_eq!(outer.children()[0].text(), "make(1)");
}

#[test]
fn test_array_literal() {
    let root = parse("[1, 2, 3];");
    let primary = first_inner(&root).child(NodeKind::Primary).unwrap();
    let array = primary.child(NodeKind::ArrayLiteral).unwrap();
    assert_eq!(array.children_of(NodeKind::Expression).count(), 3);
}

#[test]
fn test_lambda_forms() {
    let root = parse("let f = (a, b) => a + b; let g = x => { x; }; let h = () => 1;");
    let lambda_of = |i: usize| {
        root.children()[i].children()[0]
            .child(NodeKind::Expression)
            .unwrap()
            .child(NodeKind::Primary)
            .unwrap()
            .child(NodeKind::LambdaExpression)
            .unwrap()
            .clone()
    };
    let f = lambda_of(0);
    assert!(f.has(NodeKind::ParameterList));
    assert!(f.has(NodeKind::Expression));

    let g = lambda_of(1);
    assert_eq!(g.child(NodeKind::ParameterList).unwrap().text(), "x");
    assert!(g.has(NodeKind::Block));

    let h = lambda_of(2);
    assert!(!h.has(NodeKind::ParameterList));
}

#[test]
fn test_group_is_not_lambda() {
    let root = parse("(a) + 1;");
    let expr = first_inner(&root);
    assert!(expr.children()[1].is_token("+"));
}

#[test]
fn test_function_definition_arrow_flag() {
    let root = parse("fn f(a, b) => a + b; fn g(a) { a; }");
    let f = first_inner(&root);
    assert_eq!(f.kind(), NodeKind::FunctionDefinition);
    assert!(f.is_arrow());
    assert!(f.has(NodeKind::Expression));

    let g = &root.children()[1].children()[0];
    assert!(!g.is_arrow());
    assert!(g.has(NodeKind::Block));
}

#[test]
fn test_if_else_statements() {
    let root = parse("if (x > 1) { 1; } else { 2; }");
    let stmt = first_inner(&root);
    assert_eq!(stmt.kind(), NodeKind::IfStatement);
    assert_eq!(stmt.children_of(NodeKind::Statement).count(), 2);
}

#[test]
fn test_while_statement() {
    let root = parse("while (i <= 5) i = i + 1;");
    let stmt = first_inner(&root);
    assert_eq!(stmt.kind(), NodeKind::WhileStatement);
    let body = stmt.child(NodeKind::Statement).unwrap();
    assert_eq!(body.children()[0].kind(), NodeKind::Assignment);
}

#[test]
fn test_return_without_value() {
    let root = parse("fn f() { return; }");
    let block = first_inner(&root).child(NodeKind::Block).unwrap();
    let ret = &block.children_of(NodeKind::Statement).next().unwrap().children()[0];
    assert_eq!(ret.kind(), NodeKind::ReturnStatement);
    assert!(!ret.has(NodeKind::Expression));
}

#[test]
fn test_empty_program() {
    let root = parse("  // only a comment\n");
    assert!(root.children().is_empty());
}

#[test]
fn test_missing_semicolon() {
    let diags = parse_err("let x = 1");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("expected ';'"));
}

#[test]
fn test_errors_are_collected_across_statements() {
    let diags = parse_err("let = 1; 1 + ; let y = 2;");
    assert_eq!(diags.len(), 2);
    assert!(diags[0].message.contains("expected identifier"));
    assert!(diags[1].message.contains("expected expression"));
}

#[test]
fn test_function_without_body() {
    let diags = parse_err("fn f(a);");
    assert!(diags[0].message.contains("expected '=>' or '{'"));
    assert!(diags[0].help.is_some());
}

#[test]
fn test_nesting_limit() {
    let source = format!("{}1{};", "(".repeat(40), ")".repeat(40));
    let (tokens, _) = Lexer::new(&source).tokenize();
    let diags = Parser::new(tokens, &source)
        .with_max_depth(16)
        .parse_program()
        .unwrap_err();
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("nesting depth exceeded"));
}

fn depth_errors(source: &str, max_depth: u32) -> Vec<Diagnostic> {
    let (tokens, _) = Lexer::new(source).tokenize();
    match Parser::new(tokens, source).with_max_depth(max_depth).parse_program() {
        Ok(_) => vec![],
        Err(diags) => diags,
    }
}

#[test]
fn test_operator_chain_counts_toward_nesting() {
    let chain = |terms: usize| format!("{}1;", "1 + ".repeat(terms - 1));

    assert!(depth_errors(&chain(40), 64).is_empty());

    let diags = depth_errors(&chain(100), 64);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("nesting depth exceeded"));

    let diags = depth_errors(&chain(5000), DEFAULT_MAX_NESTING_DEPTH);
    assert_eq!(diags.len(), 1);
}

#[test]
fn test_mixed_precedence_chain_counts_toward_nesting() {
    let source = format!("{}x;", "x * 2 - ".repeat(80));
    let diags = depth_errors(&source, 64);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("nesting depth exceeded"));
}

#[test]
fn test_call_chain_counts_toward_nesting() {
    let source = format!("f{};", "(1)".repeat(100));
    assert!(depth_errors(&source, 128).is_empty());
    let diags = depth_errors(&source, 64);
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("nesting depth exceeded"));
}

#[test]
fn test_nesting_is_released_between_statements() {
    let statement = format!("{}1;\n", "1 + ".repeat(40));
    assert!(depth_errors(&statement.repeat(50), 64).is_empty());
}
