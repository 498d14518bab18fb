use std::fmt;
use derive_more::{Display, Error};
use serde::{Deserialize, Serialize};
use crate::language::token::{Position, Token, TokenKind};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ErrorKind {
    Lexical,
    Syntax,
    Name,
    Arithmetic,
    Type,
    Recursion,
}

/// Token kinds a grammar rule would have accepted at the failure point.
#[derive(Debug, Clone, PartialEq)]
pub struct Expected(pub Vec<TokenKind>);

impl Expected {
    pub fn contains(&self, kind: TokenKind) -> bool {
        self.0.contains(&kind)
    }
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "nothing"),
            [single] => write!(f, "{}", single),
            [init @ .., last] => {
                let head: Vec<String> = init.iter().map(|k| k.to_string()).collect();
                write!(f, "{} or {}", head.join(", "), last)
            }
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Display)]
pub enum ArithmeticFault {
    #[display("division by zero")]
    DivisionByZero,
    #[display("integer overflow")]
    Overflow,
}

#[derive(Debug, Clone, PartialEq, Display, Error)]
pub enum Error {
    #[display("unexpected character {character:?} at {position}")]
    Lexical { character: char, position: Position },
    #[display("unterminated comment starting at {position}")]
    UnterminatedComment { position: Position },
    #[display("numeric literal {literal} is out of range at {position}")]
    LiteralOutOfRange { literal: String, position: Position },
    #[display("expected {expected}, found {found} at {position}")]
    Syntax { expected: Expected, found: Token, position: Position },
    #[display("variable '{identifier}' is used before assignment")]
    Name { identifier: String },
    #[display("{fault}")]
    Arithmetic { fault: ArithmeticFault },
    #[display("{message}")]
    Type { message: String },
    #[display("nesting exceeds the limit of {limit} levels")]
    Recursion { limit: usize },
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Lexical { .. }
            | Error::UnterminatedComment { .. }
            | Error::LiteralOutOfRange { .. } => ErrorKind::Lexical,
            Error::Syntax { .. } => ErrorKind::Syntax,
            Error::Name { .. } => ErrorKind::Name,
            Error::Arithmetic { .. } => ErrorKind::Arithmetic,
            Error::Type { .. } => ErrorKind::Type,
            Error::Recursion { .. } => ErrorKind::Recursion,
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[macro_export]
macro_rules! parser_error {
    ($token:expr, $($expected:expr),+ $(,)?) => {
        Err($crate::language::error::Error::Syntax {
            expected: $crate::language::error::Expected(vec![$($expected),+]),
            position: $token.position,
            found: $token,
        })
    };
}

#[macro_export]
macro_rules! runtime_error {
    (arithmetic: $fault:expr) => {
        Err($crate::language::error::Error::Arithmetic { fault: $fault })
    };
    (type: $($arg:tt)+) => {
        Err($crate::language::error::Error::Type { message: format!($($arg)+) })
    };
}
