use std::fmt;
use serde::Serialize;
use crate::language::value::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum TokenKind {
    EndOfInput,         // end of source
    // -------- //
    IntegerLiteral,     // 42
    FloatLiteral,       // 3.14
    Identifier,         // names
    // -------- //
    Plus,               // +
    Minus,              // -
    Star,               // *
    Slash,              // /
    IntDivKeyword,      // DIV
    LParen,             // (
    RParen,             // )
    Assign,             // :=
    Semicolon,          // ;
    Colon,              // :
    Comma,              // ,
    Dot,                // .
    // -------- //
    ProgramKeyword,     // PROGRAM
    VarKeyword,         // VAR
    BeginKeyword,       // BEGIN
    EndKeyword,         // END
    TypeInteger,        // INTEGER
    TypeReal,           // REAL
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TokenKind::EndOfInput => write!(f, "end of input"),
            TokenKind::IntegerLiteral => write!(f, "integer literal"),
            TokenKind::FloatLiteral => write!(f, "real literal"),
            TokenKind::Identifier => write!(f, "identifier"),
            TokenKind::Plus => write!(f, "'+'"),
            TokenKind::Minus => write!(f, "'-'"),
            TokenKind::Star => write!(f, "'*'"),
            TokenKind::Slash => write!(f, "'/'"),
            TokenKind::IntDivKeyword => write!(f, "DIV"),
            TokenKind::LParen => write!(f, "'('"),
            TokenKind::RParen => write!(f, "')'"),
            TokenKind::Assign => write!(f, "':='"),
            TokenKind::Semicolon => write!(f, "';'"),
            TokenKind::Colon => write!(f, "':'"),
            TokenKind::Comma => write!(f, "','"),
            TokenKind::Dot => write!(f, "'.'"),
            TokenKind::ProgramKeyword => write!(f, "PROGRAM"),
            TokenKind::VarKeyword => write!(f, "VAR"),
            TokenKind::BeginKeyword => write!(f, "BEGIN"),
            TokenKind::EndKeyword => write!(f, "END"),
            TokenKind::TypeInteger => write!(f, "INTEGER"),
            TokenKind::TypeReal => write!(f, "REAL"),
        }
    }
}

/// Payload of the tokens that carry one: numeric literals and identifiers.
#[derive(Debug, Clone, PartialEq)]
pub enum Literal {
    Number(Number),
    Name(String),
}

/// Location of a token in the source. `offset` is in bytes, `line` and
/// `column` start at 1.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Position {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub fn start() -> Self {
        Position { offset: 0, line: 1, column: 1 }
    }
}

impl Default for Position {
    fn default() -> Self {
        Position::start()
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub kind: TokenKind,
    pub literal: Option<Literal>,
    pub position: Position,
}

impl Token {
    pub fn new(kind: TokenKind, position: Position) -> Self {
        Token { kind, literal: None, position }
    }

    pub fn with_literal(kind: TokenKind, literal: Literal, position: Position) -> Self {
        Token { kind, literal: Some(literal), position }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match (&self.kind, &self.literal) {
            (TokenKind::IntegerLiteral | TokenKind::FloatLiteral, Some(Literal::Number(n))) => write!(f, "{}", n),
            (TokenKind::Identifier, Some(Literal::Name(name))) => write!(f, "identifier '{}'", name),
            (kind, _) => write!(f, "{}", kind),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_uses_literal_payload() {
        let pos = Position::start();
        let ident = Token::with_literal(TokenKind::Identifier, Literal::Name("alpha".into()), pos);
        let real = Token::with_literal(TokenKind::FloatLiteral, Literal::Number(Number::Real(2.5)), pos);

        assert_eq!(ident.to_string(), "identifier 'alpha'");
        assert_eq!(real.to_string(), "2.5");
        assert_eq!(Token::new(TokenKind::Assign, pos).to_string(), "':='");
        assert_eq!(Token::new(TokenKind::EndOfInput, pos).to_string(), "end of input");
    }
}
