use std::collections::HashMap;
use lazy_static::lazy_static;
use log::trace;
use crate::language::token::{Literal, Position, Token, TokenKind};
use crate::language::error::{Error, Result};
use crate::language::value::Number;

lazy_static! {
    static ref RESERVED_KEYWORDS: HashMap<&'static str, TokenKind> = {
        let mut keywords = HashMap::new();
        keywords.insert("PROGRAM", TokenKind::ProgramKeyword);
        keywords.insert("VAR", TokenKind::VarKeyword);
        keywords.insert("BEGIN", TokenKind::BeginKeyword);
        keywords.insert("END", TokenKind::EndKeyword);
        keywords.insert("INTEGER", TokenKind::TypeInteger);
        keywords.insert("REAL", TokenKind::TypeReal);
        keywords.insert("DIV", TokenKind::IntDivKeyword);
        keywords
    };
}

/// Pull-based tokenizer. Every call to [`Lexer::next_token`] scans exactly one
/// token; once the input is exhausted it keeps returning `EndOfInput`.
pub struct Lexer {
    pub(crate) input: Vec<char>,
    pub(crate) position: usize,
    pub(crate) offset: usize,
    pub(crate) line: usize,
    pub(crate) column: usize,
}

impl Lexer {
    pub fn new(input: &str) -> Self {
        Lexer {
            input: input.chars().collect(),
            position: 0,
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    pub fn peek_next(&self) -> Option<char> {
        self.input.get(self.position + 1).copied()
    }

    pub fn consume(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;
        self.offset += ch.len_utf8();

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn here(&self) -> Position {
        Position {
            offset: self.offset,
            line: self.line,
            column: self.column,
        }
    }

    /// Skips whitespace and `{ ... }` comments.
    pub fn skip_trivia(&mut self) -> Result<()> {
        while let Some(ch) = self.peek() {
            if ch.is_whitespace() {
                self.consume();
            } else if ch == '{' {
                self.skip_comment()?;
            } else {
                break;
            }
        }
        Ok(())
    }

    fn skip_comment(&mut self) -> Result<()> {
        let start = self.here();
        self.consume();

        while let Some(ch) = self.consume() {
            if ch == '}' {
                return Ok(());
            }
        }

        Err(Error::UnterminatedComment { position: start })
    }

    fn read_word(&mut self) -> String {
        let mut word = String::new();

        while let Some(ch) = self.peek() {
            if ch.is_alphanumeric() {
                word.push(ch);
                self.consume();
            } else {
                break;
            }
        }

        word
    }

    fn read_digits(&mut self, into: &mut String) {
        while let Some(ch) = self.peek() {
            if ch.is_ascii_digit() {
                into.push(ch);
                self.consume();
            } else {
                break;
            }
        }
    }

    fn read_number(&mut self, start: Position) -> Result<Token> {
        let mut text = String::new();
        self.read_digits(&mut text);

        let is_real = self.peek() == Some('.')
            && self.peek_next().is_some_and(|ch| ch.is_ascii_digit());

        if is_real {
            text.push('.');
            self.consume();
            self.read_digits(&mut text);

            let value = text.parse::<f64>().map_err(|_| Error::LiteralOutOfRange {
                literal: text.clone(),
                position: start,
            })?;
            Ok(Token::with_literal(TokenKind::FloatLiteral, Literal::Number(Number::Real(value)), start))
        } else {
            let value = text.parse::<i64>().map_err(|_| Error::LiteralOutOfRange {
                literal: text.clone(),
                position: start,
            })?;
            Ok(Token::with_literal(TokenKind::IntegerLiteral, Literal::Number(Number::Integer(value)), start))
        }
    }

    pub fn next_token(&mut self) -> Result<Token> {
        self.skip_trivia()?;

        let start = self.here();

        let token = match self.peek() {
            None => Token::new(TokenKind::EndOfInput, start),
            Some(ch) => match ch {
                '0'..='9' => self.read_number(start)?,
                ':' => {
                    self.consume();
                    if self.peek() == Some('=') {
                        self.consume();
                        Token::new(TokenKind::Assign, start)
                    } else {
                        Token::new(TokenKind::Colon, start)
                    }
                },
                '(' | ')' | '*' | '/' | '+' | '-' | ';' | ',' | '.' => {
                    self.consume();
                    let kind = match ch {
                        '(' => TokenKind::LParen,
                        ')' => TokenKind::RParen,
                        '*' => TokenKind::Star,
                        '/' => TokenKind::Slash,
                        '+' => TokenKind::Plus,
                        '-' => TokenKind::Minus,
                        ';' => TokenKind::Semicolon,
                        ',' => TokenKind::Comma,
                        _ => TokenKind::Dot,
                    };
                    Token::new(kind, start)
                },
                _ if ch.is_alphabetic() => {
                    let word = self.read_word();
                    match RESERVED_KEYWORDS.get(word.as_str()) {
                        Some(kind) => Token::new(*kind, start),
                        None => Token::with_literal(TokenKind::Identifier, Literal::Name(word), start),
                    }
                },
                _ => return Err(Error::Lexical { character: ch, position: start }),
            },
        };

        trace!("token {} at {}", token, token.position);
        Ok(token)
    }

    /// Scans the rest of the input. The result always ends with exactly one
    /// `EndOfInput` token.
    pub fn tokenize(&mut self) -> Result<Vec<Token>> {
        let mut tokens = Vec::new();

        loop {
            let token = self.next_token()?;
            let done = token.is(TokenKind::EndOfInput);
            tokens.push(token);

            if done {
                break;
            }
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        Lexer::new(source)
            .tokenize()
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn scans_operators_and_keywords() {
        use TokenKind::*;
        assert_eq!(
            kinds("BEGIN a := (b + 2) * 3 DIV c - 4 / 5; END."),
            vec![
                BeginKeyword, Identifier, Assign, LParen, Identifier, Plus, IntegerLiteral,
                RParen, Star, IntegerLiteral, IntDivKeyword, Identifier, Minus, IntegerLiteral,
                Slash, IntegerLiteral, Semicolon, EndKeyword, Dot, EndOfInput,
            ]
        );
    }

    #[test]
    fn colon_and_assign_are_distinguished() {
        use TokenKind::*;
        assert_eq!(kinds("a, b : REAL; x := 1"), vec![
            Identifier, Comma, Identifier, Colon, TypeReal, Semicolon,
            Identifier, Assign, IntegerLiteral, EndOfInput,
        ]);
        let err = Lexer::new(": =").tokenize().unwrap_err();
        assert!(matches!(err, Error::Lexical { character: '=', .. }));
    }

    #[test]
    fn numbers_split_on_fractional_digits() {
        let tokens = Lexer::new("12 3.25 7.").tokenize().unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Number(Number::Integer(12))));
        assert_eq!(tokens[1].literal, Some(Literal::Number(Number::Real(3.25))));
        assert_eq!(tokens[2].kind, TokenKind::IntegerLiteral);
        assert_eq!(tokens[3].kind, TokenKind::Dot);
        assert_eq!(tokens[4].kind, TokenKind::EndOfInput);
    }

    #[test]
    fn keywords_are_case_sensitive() {
        let tokens = Lexer::new("begin BEGIN Div").tokenize().unwrap();
        assert_eq!(tokens[0].literal, Some(Literal::Name("begin".into())));
        assert_eq!(tokens[1].kind, TokenKind::BeginKeyword);
        assert_eq!(tokens[2].kind, TokenKind::Identifier);
    }

    #[test]
    fn end_of_input_is_sticky() {
        let mut lexer = Lexer::new("  x ");
        assert_eq!(lexer.next_token().unwrap().kind, TokenKind::Identifier);
        for _ in 0..3 {
            assert_eq!(lexer.next_token().unwrap().kind, TokenKind::EndOfInput);
        }
    }

    #[test]
    fn comments_are_skipped() {
        use TokenKind::*;
        assert_eq!(kinds("{ header } a { inline } := 1 {tail}"), vec![Identifier, Assign, IntegerLiteral, EndOfInput]);
    }

    #[test]
    fn unterminated_comment_reports_its_start() {
        let err = Lexer::new("a := 1 { never closed").tokenize().unwrap_err();
        assert_eq!(err, Error::UnterminatedComment {
            position: Position { offset: 7, line: 1, column: 8 },
        });
    }

    #[test]
    fn invalid_character_carries_byte_offset() {
        let err = Lexer::new("é := 1 ? 2").tokenize();
        // 'é' is alphabetic, so the failure is the '?' after it
        assert_eq!(err.unwrap_err(), Error::Lexical {
            character: '?',
            position: Position { offset: 8, line: 1, column: 8 },
        });
    }

    #[test]
    fn tracks_lines_and_columns() {
        let tokens = Lexer::new("BEGIN\n  x := 1\nEND").tokenize().unwrap();
        assert_eq!(tokens[1].position, Position { offset: 8, line: 2, column: 3 });
        assert_eq!(tokens[4].position, Position { offset: 15, line: 3, column: 1 });
    }

    #[test]
    fn oversized_integer_is_rejected() {
        let err = Lexer::new("99999999999999999999").next_token().unwrap_err();
        assert!(matches!(err, Error::LiteralOutOfRange { ref literal, .. } if literal == "99999999999999999999"));
    }

    #[test]
    fn same_source_yields_same_tokens() {
        let source = "PROGRAM P; VAR a : REAL; BEGIN a := 1.5 * (2 - -3) END.";
        assert_eq!(Lexer::new(source).tokenize().unwrap(), Lexer::new(source).tokenize().unwrap());
    }
}
