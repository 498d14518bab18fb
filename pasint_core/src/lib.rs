use serde::{Deserialize, Serialize};
use std::error::Error as StdError;
use std::fmt;
use log::{debug, error, info};
use language::{ast::Expr, Error, ErrorKind, Interpreter, InterpreterConfig, Lexer, Number, Program, VariableStore};

pub mod language;

/// Work a driver (CLI, REPL, script loader) can hand to a [`Session`].
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum Command {
    RunProgram { source: String },
    EvaluateExpression { source: String },
    Tokenize { source: String },
    ParseProgram { source: String },
}

#[derive(Debug, Serialize, Clone, PartialEq)]
pub enum Response {
    Variables(VariableStore),
    Value(Number),
    Tokens(Vec<String>),
    Syntax(String),
    Error(CoreError),
}

#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub enum CoreError {
    Lexical(String),
    Syntax(String),
    Name(String),
    Arithmetic(String),
    Type(String),
    Recursion(String),
}

impl CoreError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            CoreError::Lexical(_) => ErrorKind::Lexical,
            CoreError::Syntax(_) => ErrorKind::Syntax,
            CoreError::Name(_) => ErrorKind::Name,
            CoreError::Arithmetic(_) => ErrorKind::Arithmetic,
            CoreError::Type(_) => ErrorKind::Type,
            CoreError::Recursion(_) => ErrorKind::Recursion,
        }
    }
}

impl From<Error> for CoreError {
    fn from(err: Error) -> Self {
        let message = err.to_string();
        match err.kind() {
            ErrorKind::Lexical => CoreError::Lexical(message),
            ErrorKind::Syntax => CoreError::Syntax(message),
            ErrorKind::Name => CoreError::Name(message),
            ErrorKind::Arithmetic => CoreError::Arithmetic(message),
            ErrorKind::Type => CoreError::Type(message),
            ErrorKind::Recursion => CoreError::Recursion(message),
        }
    }
}

impl fmt::Display for CoreError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoreError::Lexical(s) => write!(f, "Lexical Error: {}", s),
            CoreError::Syntax(s) => write!(f, "Syntax Error: {}", s),
            CoreError::Name(s) => write!(f, "Name Error: {}", s),
            CoreError::Arithmetic(s) => write!(f, "Arithmetic Error: {}", s),
            CoreError::Type(s) => write!(f, "Type Error: {}", s),
            CoreError::Recursion(s) => write!(f, "Recursion Error: {}", s),
        }
    }
}
impl StdError for CoreError {}

/// One interpreter instance and its variable store. Commands executed on the
/// same session see each other's assignments.
#[derive(Debug, Default)]
pub struct Session {
    interpreter: Interpreter,
}

impl Session {
    pub fn new(config: InterpreterConfig) -> Self {
        Session {
            interpreter: Interpreter::with_config(config),
        }
    }

    pub fn variables(&self) -> &VariableStore {
        self.interpreter.variables()
    }

    pub fn execute(&mut self, command: Command) -> Response {
        debug!("session executing command: {:?}", command);
        let max_depth = self.interpreter.config().max_depth;

        let result = match command {
            Command::RunProgram { source } => language::parser::parse_with_depth(&source, max_depth)
                .and_then(|program| self.interpreter.interpret(&program))
                .map(|()| Response::Variables(self.interpreter.variables().clone())),
            Command::EvaluateExpression { source } => language::parser::parse_expression_with_depth(&source, max_depth)
                .and_then(|expr| self.interpreter.evaluate(&expr))
                .map(Response::Value),
            Command::Tokenize { source } => Lexer::new(&source)
                .tokenize()
                .map(|tokens| Response::Tokens(tokens.iter().map(|t| t.to_string()).collect())),
            Command::ParseProgram { source } => language::parser::parse_with_depth(&source, max_depth)
                .map(|program| Response::Syntax(program.to_string())),
        };

        match result {
            Ok(response) => {
                info!("command completed");
                response
            },
            Err(e) => {
                error!("command failed: {}", e);
                Response::Error(e.into())
            },
        }
    }
}

/// Lazy token source over `source`.
pub fn tokenize(source: &str) -> Lexer {
    Lexer::new(source)
}

pub fn parse(source: &str) -> language::Result<Program> {
    language::parse(source)
}

pub fn parse_expression(source: &str) -> language::Result<Expr> {
    language::parse_expression(source)
}

/// Runs `program` on a fresh interpreter and returns the final bindings.
pub fn interpret(program: &Program) -> language::Result<VariableStore> {
    let mut interpreter = Interpreter::new();
    interpreter.interpret(program)?;
    Ok(interpreter.into_variables())
}

/// Parses and runs a whole program.
pub fn run(source: &str) -> language::Result<VariableStore> {
    interpret(&parse(source)?)
}

/// Parses and evaluates a bare expression with an empty variable store.
pub fn evaluate(source: &str) -> language::Result<Number> {
    Interpreter::new().evaluate(&parse_expression(source)?)
}
