/// All lexemes in the Simple language.
#[derive(Clone, Debug, PartialEq)]
pub enum Lexeme {
    // Keywords
    Let,
    Fn,
    Return,
    If,
    Else,
    While,
    True,
    False,

    // Symbols
    LParen,    // (
    RParen,    // )
    LBrace,    // {
    RBrace,    // }
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Semicolon, // ;
    Eq,        // =
    FatArrow,  // =>
    EqEq,      // ==
    BangEq,    // !=
    Bang,      // !
    Plus,      // +
    Minus,     // -
    Star,      // *
    Slash,     // /
    Percent,   // %
    Lt,        // <
    Gt,        // >
    LtEq,      // <=
    GtEq,      // >=
    AmpAmp,    // &&
    PipePipe,  // ||

    // Literals. The raw source spelling is kept; the lowerer parses it.
    Integer(String),
    Float(String),
    Str(String),
    Ident(String),

    // End of file
    Eof,
}

impl Lexeme {
    /// Try to match an identifier string to a keyword lexeme.
    pub fn from_keyword(s: &str) -> Option<Lexeme> {
        match s {
            "let" => Some(Lexeme::Let),
            "fn" => Some(Lexeme::Fn),
            "return" => Some(Lexeme::Return),
            "if" => Some(Lexeme::If),
            "else" => Some(Lexeme::Else),
            "while" => Some(Lexeme::While),
            "true" => Some(Lexeme::True),
            "false" => Some(Lexeme::False),
            _ => None,
        }
    }

    /// Source spelling of fixed lexemes; literals return their text.
    pub fn spelling(&self) -> &str {
        match self {
            Lexeme::Let => "let",
            Lexeme::Fn => "fn",
            Lexeme::Return => "return",
            Lexeme::If => "if",
            Lexeme::Else => "else",
            Lexeme::While => "while",
            Lexeme::True => "true",
            Lexeme::False => "false",
            Lexeme::LParen => "(",
            Lexeme::RParen => ")",
            Lexeme::LBrace => "{",
            Lexeme::RBrace => "}",
            Lexeme::LBracket => "[",
            Lexeme::RBracket => "]",
            Lexeme::Comma => ",",
            Lexeme::Semicolon => ";",
            Lexeme::Eq => "=",
            Lexeme::FatArrow => "=>",
            Lexeme::EqEq => "==",
            Lexeme::BangEq => "!=",
            Lexeme::Bang => "!",
            Lexeme::Plus => "+",
            Lexeme::Minus => "-",
            Lexeme::Star => "*",
            Lexeme::Slash => "/",
            Lexeme::Percent => "%",
            Lexeme::Lt => "<",
            Lexeme::Gt => ">",
            Lexeme::LtEq => "<=",
            Lexeme::GtEq => ">=",
            Lexeme::AmpAmp => "&&",
            Lexeme::PipePipe => "||",
            Lexeme::Integer(s) | Lexeme::Float(s) | Lexeme::Str(s) | Lexeme::Ident(s) => s,
            Lexeme::Eof => "",
        }
    }

    /// Whether this lexeme is an infix binary operator.
    pub fn is_binary_operator(&self) -> bool {
        matches!(
            self,
            Lexeme::Plus
                | Lexeme::Minus
                | Lexeme::Star
                | Lexeme::Slash
                | Lexeme::Percent
                | Lexeme::Lt
                | Lexeme::Gt
                | Lexeme::LtEq
                | Lexeme::GtEq
                | Lexeme::EqEq
                | Lexeme::BangEq
                | Lexeme::AmpAmp
                | Lexeme::PipePipe
        )
    }

    /// Human-readable description for error messages.
    pub fn description(&self) -> String {
        match self {
            Lexeme::Integer(s) => format!("integer '{}'", s),
            Lexeme::Float(s) => format!("float '{}'", s),
            Lexeme::Str(s) => format!("string {}", s),
            Lexeme::Ident(s) => format!("identifier '{}'", s),
            Lexeme::Eof => "end of file".to_string(),
            Lexeme::Let
            | Lexeme::Fn
            | Lexeme::Return
            | Lexeme::If
            | Lexeme::Else
            | Lexeme::While
            | Lexeme::True
            | Lexeme::False => format!("keyword '{}'", self.spelling()),
            _ => format!("'{}'", self.spelling()),
        }
    }
}
