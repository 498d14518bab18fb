use log::{debug, error};
use crate::language::token::{Literal, Token, TokenKind};
use crate::language::ast::{
    Assign, BinaryOperator, Block, Compound, Expr, Program, Statement, TypeTag, UnaryOperator, Var, VarDecl,
};
use crate::language::lexer::Lexer;
use crate::language::error::{Error, Result};
use crate::parser_error;

/// Counts every active recursive rule (`compound`, `stmtList`, `stmt`, `expr`,
/// `term`, `factor`), so one parenthesis or BEGIN level costs three. Keeps the
/// deepest accepted input well inside a 2 MiB thread stack.
pub const DEFAULT_MAX_DEPTH: usize = 96;

/// Recursive-descent parser with one token of lookahead.
///
/// ```text
/// program      := 'PROGRAM' ident ';' block '.'
/// block        := declarations compound
/// declarations := ('VAR' (varDecl ';')+)?
/// varDecl      := ident (',' ident)* ':' typeSpec
/// typeSpec     := 'INTEGER' | 'REAL'
/// compound     := 'BEGIN' stmtList 'END'
/// stmtList     := stmt (';' stmt)*
/// stmt         := compound | assign | empty
/// assign       := ident ':=' expr
/// expr         := term (('+' | '-') term)*
/// term         := factor (('*' | '/' | 'DIV') factor)*
/// factor       := ('+' | '-') factor | INTEGER | REAL | '(' expr ')' | ident
/// ```
pub struct Parser {
    lexer: Lexer,
    current: Token,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(mut lexer: Lexer) -> Result<Self> {
        let current = lexer.next_token()?;
        Ok(Parser {
            lexer,
            current,
            depth: 0,
            max_depth: DEFAULT_MAX_DEPTH,
        })
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Parses a whole program; input after the final `.` is an error.
    pub fn parse(&mut self) -> Result<Program> {
        let program = self.program()?;
        self.consume(TokenKind::EndOfInput)?;
        Ok(program)
    }

    /// Parses a single expression spanning the whole input.
    pub fn parse_expression(&mut self) -> Result<Expr> {
        let expr = self.expr()?;
        self.consume(TokenKind::EndOfInput)?;
        Ok(expr)
    }

    fn program(&mut self) -> Result<Program> {
        self.consume(TokenKind::ProgramKeyword)?;
        let name = self.variable()?.name;
        self.consume(TokenKind::Semicolon)?;
        let block = self.block()?;
        self.consume(TokenKind::Dot)?;

        Ok(Program { name, block })
    }

    fn block(&mut self) -> Result<Block> {
        let declarations = self.declarations()?;
        let body = self.compound_statement()?;
        Ok(Block { declarations, body })
    }

    fn declarations(&mut self) -> Result<Vec<VarDecl>> {
        let mut declarations = Vec::new();

        if self.match_token(TokenKind::VarKeyword)? {
            loop {
                declarations.extend(self.variable_declaration()?);
                self.consume(TokenKind::Semicolon)?;

                if !self.check(TokenKind::Identifier) {
                    break;
                }
            }
        }

        Ok(declarations)
    }

    fn variable_declaration(&mut self) -> Result<Vec<VarDecl>> {
        let mut names = vec![self.variable()?.name];

        while self.match_token(TokenKind::Comma)? {
            names.push(self.variable()?.name);
        }

        self.consume(TokenKind::Colon)?;
        let declared_type = self.type_spec()?;

        Ok(names
            .into_iter()
            .map(|name| VarDecl { name, declared_type })
            .collect())
    }

    fn type_spec(&mut self) -> Result<TypeTag> {
        if self.match_token(TokenKind::TypeInteger)? {
            Ok(TypeTag::Integer)
        } else if self.match_token(TokenKind::TypeReal)? {
            Ok(TypeTag::Real)
        } else {
            let found = self.current.clone();
            parser_error!(found, TokenKind::TypeInteger, TokenKind::TypeReal)
        }
    }

    fn compound_statement(&mut self) -> Result<Compound> {
        self.descend()?;
        self.consume(TokenKind::BeginKeyword)?;
        let statements = self.statement_list()?;
        self.consume(TokenKind::EndKeyword)?;
        self.ascend();

        Ok(Compound { statements })
    }

    fn statement_list(&mut self) -> Result<Vec<Statement>> {
        self.descend()?;
        let mut statements = vec![self.statement()?];

        while self.match_token(TokenKind::Semicolon)? {
            statements.push(self.statement()?);
        }

        // `x y := 1`: a name right after a statement means a missing ';'
        if self.check(TokenKind::Identifier) {
            let found = self.current.clone();
            return parser_error!(found, TokenKind::Semicolon, TokenKind::EndKeyword);
        }

        self.ascend();
        Ok(statements)
    }

    fn statement(&mut self) -> Result<Statement> {
        self.descend()?;
        let statement = if self.check(TokenKind::BeginKeyword) {
            Statement::Compound(self.compound_statement()?)
        } else if self.check(TokenKind::Identifier) {
            Statement::Assign(self.assignment_statement()?)
        } else {
            Statement::NoOp
        };
        self.ascend();
        Ok(statement)
    }

    fn assignment_statement(&mut self) -> Result<Assign> {
        let target = self.variable()?;
        self.consume(TokenKind::Assign)?;
        let value = self.expr()?;
        Ok(Assign { target, value })
    }

    fn variable(&mut self) -> Result<Var> {
        let token = self.consume(TokenKind::Identifier)?;
        match token.literal {
            Some(Literal::Name(name)) => Ok(Var { name, position: token.position }),
            _ => parser_error!(token, TokenKind::Identifier),
        }
    }

    fn expr(&mut self) -> Result<Expr> {
        self.descend()?;
        let mut node = self.term()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Plus => BinaryOperator::Plus,
                TokenKind::Minus => BinaryOperator::Minus,
                _ => break,
            };
            self.advance()?;
            node = Expr::binary(op, node, self.term()?);
        }

        self.ascend();
        Ok(node)
    }

    fn term(&mut self) -> Result<Expr> {
        self.descend()?;
        let mut node = self.factor()?;

        loop {
            let op = match self.current.kind {
                TokenKind::Star => BinaryOperator::Multiply,
                TokenKind::Slash => BinaryOperator::FloatDivide,
                TokenKind::IntDivKeyword => BinaryOperator::IntegerDivide,
                _ => break,
            };
            self.advance()?;
            node = Expr::binary(op, node, self.factor()?);
        }

        self.ascend();
        Ok(node)
    }

    fn factor(&mut self) -> Result<Expr> {
        self.descend()?;

        let node = match self.current.kind {
            TokenKind::Plus => {
                self.advance()?;
                Expr::unary(UnaryOperator::Plus, self.factor()?)
            },
            TokenKind::Minus => {
                self.advance()?;
                Expr::unary(UnaryOperator::Minus, self.factor()?)
            },
            TokenKind::IntegerLiteral | TokenKind::FloatLiteral => {
                let token = self.advance()?;
                match token.literal {
                    Some(Literal::Number(value)) => Expr::NumberLiteral(value),
                    _ => return parser_error!(token, TokenKind::IntegerLiteral, TokenKind::FloatLiteral),
                }
            },
            TokenKind::LParen => {
                self.advance()?;
                let inner = self.expr()?;
                self.consume(TokenKind::RParen)?;
                inner
            },
            TokenKind::Identifier => Expr::Var(self.variable()?),
            _ => {
                let found = self.current.clone();
                return parser_error!(
                    found,
                    TokenKind::Plus,
                    TokenKind::Minus,
                    TokenKind::IntegerLiteral,
                    TokenKind::FloatLiteral,
                    TokenKind::LParen,
                    TokenKind::Identifier,
                );
            },
        };

        self.ascend();
        Ok(node)
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.max_depth {
            return Err(Error::Recursion { limit: self.max_depth });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn check(&self, kind: TokenKind) -> bool {
        self.current.is(kind)
    }

    /// Moves to the next token and returns the one just passed.
    fn advance(&mut self) -> Result<Token> {
        let next = self.lexer.next_token()?;
        Ok(std::mem::replace(&mut self.current, next))
    }

    fn match_token(&mut self, kind: TokenKind) -> Result<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn consume(&mut self, kind: TokenKind) -> Result<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            let found = self.current.clone();
            parser_error!(found, kind)
        }
    }
}

pub fn parse(input: &str) -> Result<Program> {
    parse_with_depth(input, DEFAULT_MAX_DEPTH)
}

pub fn parse_with_depth(input: &str, max_depth: usize) -> Result<Program> {
    debug!("parsing program ({} bytes)", input.len());

    let result = Parser::new(Lexer::new(input))
        .and_then(|parser| parser.with_max_depth(max_depth).parse());

    match &result {
        Ok(program) => debug!("parsed program '{}' with {} declarations", program.name, program.block.declarations.len()),
        Err(e) => error!("parse failed: {}", e),
    }
    result
}

pub fn parse_expression(input: &str) -> Result<Expr> {
    parse_expression_with_depth(input, DEFAULT_MAX_DEPTH)
}

pub fn parse_expression_with_depth(input: &str, max_depth: usize) -> Result<Expr> {
    Parser::new(Lexer::new(input))?
        .with_max_depth(max_depth)
        .parse_expression()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::error::ErrorKind;
    use crate::language::value::Number;

    fn int(value: i64) -> Expr {
        Expr::NumberLiteral(Number::Integer(value))
    }

    #[test]
    fn precedence_binds_multiplication_tighter() {
        let expr = parse_expression("2 + 3 * 4").unwrap();
        assert_eq!(expr, Expr::binary(
            BinaryOperator::Plus,
            int(2),
            Expr::binary(BinaryOperator::Multiply, int(3), int(4)),
        ));
    }

    #[test]
    fn binary_operators_fold_left() {
        let expr = parse_expression("10 - 3 - 2").unwrap();
        assert_eq!(expr, Expr::binary(
            BinaryOperator::Minus,
            Expr::binary(BinaryOperator::Minus, int(10), int(3)),
            int(2),
        ));
        assert_eq!(parse_expression("8 / 4 DIV 2 * 1").unwrap().to_string(), "(((8 / 4) DIV 2) * 1)");
    }

    #[test]
    fn unary_operators_nest_to_the_right() {
        let expr = parse_expression("+-5").unwrap();
        assert_eq!(expr, Expr::unary(UnaryOperator::Plus, Expr::unary(UnaryOperator::Minus, int(5))));
        assert_eq!(parse_expression("- - (1)").unwrap().to_string(), "--1");
    }

    #[test]
    fn declarations_expand_name_lists() {
        let program = parse("PROGRAM P; VAR a, b : INTEGER; c : REAL; BEGIN END.").unwrap();
        let decls: Vec<(String, TypeTag)> = program.block.declarations
            .iter()
            .map(|d| (d.name.clone(), d.declared_type))
            .collect();
        assert_eq!(decls, vec![
            ("a".to_string(), TypeTag::Integer),
            ("b".to_string(), TypeTag::Integer),
            ("c".to_string(), TypeTag::Real),
        ]);
        assert_eq!(program.block.body.statements, vec![Statement::NoOp]);
    }

    #[test]
    fn empty_statements_are_noops() {
        let program = parse("PROGRAM P; BEGIN ; BEGIN END; END.").unwrap();
        assert_eq!(program.block.body.statements, vec![
            Statement::NoOp,
            Statement::Compound(Compound { statements: vec![Statement::NoOp] }),
            Statement::NoOp,
        ]);
    }

    #[test]
    fn var_keyword_needs_a_declaration() {
        let err = parse("PROGRAM P; VAR BEGIN END.").unwrap_err();
        assert!(matches!(err, Error::Syntax { ref expected, .. } if expected.contains(TokenKind::Identifier)));
    }

    #[test]
    fn missing_final_dot_is_rejected() {
        let err = parse("PROGRAM P; BEGIN x := 1 END").unwrap_err();
        match err {
            Error::Syntax { expected, found, .. } => {
                assert!(expected.contains(TokenKind::Dot));
                assert_eq!(found.kind, TokenKind::EndOfInput);
            },
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn bare_compound_is_not_a_program() {
        let err = parse("BEGIN x := 1 END.").unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Syntax);
    }

    #[test]
    fn trailing_input_is_rejected() {
        let err = parse("PROGRAM P; BEGIN END. x").unwrap_err();
        assert!(matches!(err, Error::Syntax { ref expected, .. } if expected.contains(TokenKind::EndOfInput)));
        assert!(parse_expression("1 2").is_err());
    }

    #[test]
    fn identifier_after_statement_needs_separator() {
        let err = parse("PROGRAM P; BEGIN x := 1 y := 2 END.").unwrap_err();
        match err {
            Error::Syntax { expected, found, .. } => {
                assert!(expected.contains(TokenKind::Semicolon));
                assert!(expected.contains(TokenKind::EndKeyword));
                assert_eq!(found.literal, Some(Literal::Name("y".into())));
            },
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn div_is_never_a_variable() {
        assert!(parse("PROGRAM P; BEGIN DIV := 1 END.").is_err());
    }

    #[test]
    fn lexical_errors_pass_through() {
        let err = parse("PROGRAM P; BEGIN x := 1 % 2 END.").unwrap_err();
        assert!(matches!(err, Error::Lexical { character: '%', .. }));
    }

    #[test]
    fn nesting_limit_applies_to_parentheses_and_unary_chains() {
        let deep = format!("{}1{}", "(".repeat(20), ")".repeat(20));
        assert!(parse_expression_with_depth(&deep, 63).is_ok());
        assert!(parse_expression_with_depth(&deep, 62).is_err());
        assert_eq!(
            parse_expression_with_depth(&deep, 10).unwrap_err(),
            Error::Recursion { limit: 10 }
        );

        let unary = format!("{}1", "-".repeat(50));
        assert_eq!(
            parse_expression_with_depth(&unary, 16).unwrap_err(),
            Error::Recursion { limit: 16 }
        );
    }

    #[test]
    fn nesting_limit_applies_to_compounds() {
        let source = format!("PROGRAM P; {} {}.", "BEGIN ".repeat(8), "END ".repeat(8));
        assert!(parse_with_depth(&source, 24).is_ok());
        assert!(matches!(parse_with_depth(&source, 23), Err(Error::Recursion { limit: 23 })));
    }

    #[test]
    fn variable_positions_point_at_the_name() {
        let program = parse("PROGRAM P;\nBEGIN\n  total := 1\nEND.").unwrap();
        match &program.block.body.statements[0] {
            Statement::Assign(assign) => {
                assert_eq!(assign.target.name, "total");
                assert_eq!((assign.target.position.line, assign.target.position.column), (3, 3));
            },
            other => panic!("unexpected statement {other:?}"),
        }
    }
}
