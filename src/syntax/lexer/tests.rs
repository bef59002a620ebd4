use super::*;

fn lex(source: &str) -> Vec<Lexeme> {
    let (tokens, diags) = Lexer::new(source).tokenize();
    assert!(diags.is_empty(), "lex errors: {:?}", diags);
    tokens.into_iter().map(|t| t.node).collect()
}

fn lex_errors(source: &str) -> Vec<Diagnostic> {
    Lexer::new(source).tokenize().1
}

#[test]
fn test_keywords_and_idents() {
    let toks = lex("let fn return if else while true false foo _bar9");
    assert_eq!(
        toks,
        vec![
            Lexeme::Let,
            Lexeme::Fn,
            Lexeme::Return,
            Lexeme::If,
            Lexeme::Else,
            Lexeme::While,
            Lexeme::True,
            Lexeme::False,
            Lexeme::Ident("foo".into()),
            Lexeme::Ident("_bar9".into()),
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_operators() {
    let toks = lex("+ - * / % < > <= >= == != && || ! = =>");
    assert_eq!(
        toks,
        vec![
            Lexeme::Plus,
            Lexeme::Minus,
            Lexeme::Star,
            Lexeme::Slash,
            Lexeme::Percent,
            Lexeme::Lt,
            Lexeme::Gt,
            Lexeme::LtEq,
            Lexeme::GtEq,
            Lexeme::EqEq,
            Lexeme::BangEq,
            Lexeme::AmpAmp,
            Lexeme::PipePipe,
            Lexeme::Bang,
            Lexeme::Eq,
            Lexeme::FatArrow,
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_number_literals_keep_spelling() {
    let toks = lex("42 3.14 007");
    assert_eq!(
        toks,
        vec![
            Lexeme::Integer("42".into()),
            Lexeme::Float("3.14".into()),
            Lexeme::Integer("007".into()),
            Lexeme::Eof,
        ]
    );
}

#[test]
fn test_string_keeps_quotes() {
    let toks = lex(r#"let s = "Hello, World";"#);
    assert_eq!(toks[3], Lexeme::Str("\"Hello, World\"".into()));
}

#[test]
fn test_string_has_no_escapes() {
    let toks = lex(r#""a\n""#);
    assert_eq!(toks[0], Lexeme::Str(r#""a\n""#.into()));
}

#[test]
fn test_line_comments_skipped() {
    let toks = lex("// header\nx; // trailing\n");
    assert_eq!(
        toks,
        vec![Lexeme::Ident("x".into()), Lexeme::Semicolon, Lexeme::Eof]
    );
}

#[test]
fn test_spans() {
    let (tokens, _) = Lexer::new("let abc").tokenize();
    assert_eq!(tokens[0].span, Span::new(0, 3));
    assert_eq!(tokens[1].span, Span::new(4, 7));
    assert_eq!(tokens[2].span, Span::new(7, 7));
}

#[test]
fn test_integer_overflow_is_reported() {
    let diags = lex_errors("99999999999999999999;");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("too large"));
}

#[test]
fn test_unterminated_string() {
    let diags = lex_errors("\"abc");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("unterminated"));
}

#[test]
fn test_single_ampersand_and_pipe() {
    let diags = lex_errors("a & b | c");
    assert_eq!(diags.len(), 2);
    assert_eq!(diags[0].help.as_deref(), Some("use `&&` for logical and"));
}

#[test]
fn test_unknown_character_collects_all() {
    let diags = lex_errors("x @ y # é");
    assert_eq!(diags.len(), 3);
    assert!(diags[2].message.contains("U+00E9"));
}

#[test]
fn test_dot_without_fraction_is_error() {
    let diags = lex_errors("1.;");
    assert_eq!(diags.len(), 1);
    assert!(diags[0].message.contains("'.'"));
}
