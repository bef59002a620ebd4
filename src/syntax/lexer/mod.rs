use crate::diagnostic::Diagnostic;
use crate::lexeme::Lexeme;
use crate::span::{Span, Spanned};

/// Multi-byte symbols, tried before the single-byte table.
const PAIRS: &[(&str, Lexeme)] = &[
    ("==", Lexeme::EqEq),
    ("=>", Lexeme::FatArrow),
    ("!=", Lexeme::BangEq),
    ("<=", Lexeme::LtEq),
    (">=", Lexeme::GtEq),
    ("&&", Lexeme::AmpAmp),
    ("||", Lexeme::PipePipe),
];

const SINGLES: &[(u8, Lexeme)] = &[
    (b'(', Lexeme::LParen),
    (b')', Lexeme::RParen),
    (b'{', Lexeme::LBrace),
    (b'}', Lexeme::RBrace),
    (b'[', Lexeme::LBracket),
    (b']', Lexeme::RBracket),
    (b',', Lexeme::Comma),
    (b';', Lexeme::Semicolon),
    (b'+', Lexeme::Plus),
    (b'-', Lexeme::Minus),
    (b'*', Lexeme::Star),
    (b'/', Lexeme::Slash),
    (b'%', Lexeme::Percent),
    (b'=', Lexeme::Eq),
    (b'!', Lexeme::Bang),
    (b'<', Lexeme::Lt),
    (b'>', Lexeme::Gt),
];

/// Byte-oriented scanner. Every malformed lexeme is reported and skipped,
/// so one pass collects all lexical errors.
pub(crate) struct Lexer<'src> {
    src: &'src str,
    at: usize,
    errors: Vec<Diagnostic>,
}

impl<'src> Lexer<'src> {
    pub(crate) fn new(src: &'src str) -> Self {
        Self {
            src,
            at: 0,
            errors: Vec::new(),
        }
    }

    /// Lex the whole input. The token list always ends with `Eof`.
    pub(crate) fn tokenize(mut self) -> (Vec<Spanned<Lexeme>>, Vec<Diagnostic>) {
        let mut tokens = Vec::new();
        loop {
            self.skip_trivia();
            let start = self.at;
            let Some(byte) = self.byte(0) else {
                tokens.push(self.token(Lexeme::Eof, start));
                break;
            };

            let lexeme = match byte {
                b'a'..=b'z' | b'A'..=b'Z' | b'_' => Some(self.word()),
                b'0'..=b'9' => Some(self.number()),
                b'"' => self.string(),
                _ => self.symbol(),
            };
            if let Some(lexeme) = lexeme {
                tokens.push(self.token(lexeme, start));
            }
        }
        (tokens, self.errors)
    }

    fn byte(&self, ahead: usize) -> Option<u8> {
        self.src.as_bytes().get(self.at + ahead).copied()
    }

    fn rest(&self) -> &'src str {
        &self.src[self.at..]
    }

    fn eat_while(&mut self, pred: impl Fn(u8) -> bool) {
        while self.byte(0).is_some_and(&pred) {
            self.at += 1;
        }
    }

    fn token(&self, lexeme: Lexeme, start: usize) -> Spanned<Lexeme> {
        Spanned::new(lexeme, self.span_from(start))
    }

    fn span_from(&self, start: usize) -> Span {
        Span::new(start as u32, self.at as u32)
    }

    fn error(&mut self, start: usize, message: String, help: &str) {
        self.errors
            .push(Diagnostic::error(message, self.span_from(start)).with_help(help.to_string()));
    }

    /// Whitespace and `//` line comments.
    fn skip_trivia(&mut self) {
        loop {
            self.eat_while(|b| b.is_ascii_whitespace());
            if !self.rest().starts_with("//") {
                return;
            }
            self.eat_while(|b| b != b'\n');
        }
    }

    fn word(&mut self) -> Lexeme {
        let start = self.at;
        self.eat_while(|b| b.is_ascii_alphanumeric() || b == b'_');
        let word = &self.src[start..self.at];
        Lexeme::from_keyword(word).unwrap_or_else(|| Lexeme::Ident(word.to_string()))
    }

    /// Integers must fit a signed 64-bit value; floats are `digits.digits`.
    fn number(&mut self) -> Lexeme {
        let start = self.at;
        self.eat_while(|b| b.is_ascii_digit());

        if self.byte(0) == Some(b'.') && self.byte(1).is_some_and(|b| b.is_ascii_digit()) {
            self.at += 1;
            self.eat_while(|b| b.is_ascii_digit());
            return Lexeme::Float(self.src[start..self.at].to_string());
        }

        let digits = &self.src[start..self.at];
        if digits.parse::<i64>().is_err() {
            self.error(
                start,
                format!("integer literal '{}' is too large", digits),
                &format!("maximum integer value is {}", i64::MAX),
            );
        }
        Lexeme::Integer(digits.to_string())
    }

    /// Strings run to the next `"`; there are no escape sequences. The
    /// lexeme keeps its quotes.
    fn string(&mut self) -> Option<Lexeme> {
        let start = self.at;
        match self.src[start + 1..].find('"') {
            Some(len) => {
                self.at = start + len + 2;
                Some(Lexeme::Str(self.src[start..self.at].to_string()))
            }
            None => {
                self.at = self.src.len();
                self.error(
                    start,
                    "unterminated string literal".to_string(),
                    "close the string with a matching '\"'",
                );
                None
            }
        }
    }

    fn symbol(&mut self) -> Option<Lexeme> {
        let start = self.at;
        if let Some((text, lexeme)) = PAIRS.iter().find(|(text, _)| self.rest().starts_with(text)) {
            self.at += text.len();
            return Some(lexeme.clone());
        }

        let byte = self.byte(0)?;
        if let Some((_, lexeme)) = SINGLES.iter().find(|(b, _)| *b == byte) {
            self.at += 1;
            return Some(lexeme.clone());
        }

        // Step over the whole UTF-8 sequence so the next scan starts on a boundary.
        let ch = self.rest().chars().next().unwrap_or('\u{FFFD}');
        self.at += ch.len_utf8();
        match ch {
            '&' => self.error(
                start,
                "unexpected '&'; Simple has no bitwise operators".to_string(),
                "use `&&` for logical and",
            ),
            '|' => self.error(
                start,
                "unexpected '|'; Simple has no bitwise operators".to_string(),
                "use `||` for logical or",
            ),
            _ => self.error(
                start,
                format!("unexpected character '{}' (U+{:04X})", ch, ch as u32),
                "this character is not recognized as part of Simple syntax",
            ),
        }
        None
    }
}

#[cfg(test)]
mod tests;
