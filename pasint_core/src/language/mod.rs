pub mod token;
pub mod value;
pub mod ast;
pub mod lexer;
pub mod parser;
pub mod error;
pub mod interpreter;

pub use error::{Error, ErrorKind, Result};
pub use ast::Program;
pub use lexer::Lexer;
pub use parser::{parse, parse_expression, Parser};
pub use interpreter::{Interpreter, InterpreterConfig, VariableStore};
pub use value::Number;
