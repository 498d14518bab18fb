use std::fmt;
use serde::{Deserialize, Serialize};
use crate::language::token::Position;
use crate::language::value::Number;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TypeTag {
    Integer,
    Real,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOperator {
    Plus,
    Minus,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOperator {
    Plus,
    Minus,
    Multiply,
    FloatDivide,
    IntegerDivide,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Program {
    pub name: String,
    pub block: Block,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Block {
    pub declarations: Vec<VarDecl>,
    pub body: Compound,
}

#[derive(Debug, Clone, PartialEq)]
pub struct VarDecl {
    pub name: String,
    pub declared_type: TypeTag,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Compound {
    pub statements: Vec<Statement>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Statement {
    Compound(Compound),
    Assign(Assign),
    NoOp,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Assign {
    pub target: Var,
    pub value: Expr,
}

/// A variable reference. The name is resolved when evaluated, not when parsed.
#[derive(Debug, Clone, PartialEq)]
pub struct Var {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    Var(Var),
    UnaryOp {
        op: UnaryOperator,
        operand: Box<Expr>,
    },
    BinOp {
        op: BinaryOperator,
        left: Box<Expr>,
        right: Box<Expr>,
    },
    NumberLiteral(Number),
}

impl Expr {
    pub fn unary(op: UnaryOperator, operand: Expr) -> Self {
        Expr::UnaryOp { op, operand: Box::new(operand) }
    }

    pub fn binary(op: BinaryOperator, left: Expr, right: Expr) -> Self {
        Expr::BinOp { op, left: Box::new(left), right: Box::new(right) }
    }
}

/// One method per node variant. `Statement::accept` and `Expr::accept` match
/// exhaustively, so a new variant without a visitor method does not compile.
pub trait AstVisitor {
    type Value;
    type Error;

    fn visit_program(&mut self, program: &Program) -> Result<(), Self::Error>;
    fn visit_block(&mut self, block: &Block) -> Result<(), Self::Error>;
    fn visit_compound(&mut self, compound: &Compound) -> Result<(), Self::Error>;
    fn visit_assign(&mut self, assign: &Assign) -> Result<(), Self::Error>;
    fn visit_no_op(&mut self) -> Result<(), Self::Error>;
    fn visit_var(&mut self, var: &Var) -> Result<Self::Value, Self::Error>;
    fn visit_unary_op(&mut self, op: UnaryOperator, operand: &Expr) -> Result<Self::Value, Self::Error>;
    fn visit_bin_op(&mut self, op: BinaryOperator, left: &Expr, right: &Expr) -> Result<Self::Value, Self::Error>;
    fn visit_number(&mut self, value: Number) -> Result<Self::Value, Self::Error>;
}

impl Statement {
    pub fn accept<V: AstVisitor>(&self, visitor: &mut V) -> Result<(), V::Error> {
        match self {
            Statement::Compound(compound) => visitor.visit_compound(compound),
            Statement::Assign(assign) => visitor.visit_assign(assign),
            Statement::NoOp => visitor.visit_no_op(),
        }
    }
}

impl Expr {
    pub fn accept<V: AstVisitor>(&self, visitor: &mut V) -> Result<V::Value, V::Error> {
        match self {
            Expr::Var(var) => visitor.visit_var(var),
            Expr::UnaryOp { op, operand } => visitor.visit_unary_op(*op, operand),
            Expr::BinOp { op, left, right } => visitor.visit_bin_op(*op, left, right),
            Expr::NumberLiteral(value) => visitor.visit_number(*value),
        }
    }
}

impl fmt::Display for TypeTag {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            TypeTag::Integer => write!(f, "INTEGER"),
            TypeTag::Real => write!(f, "REAL"),
        }
    }
}

impl fmt::Display for UnaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            UnaryOperator::Plus => write!(f, "+"),
            UnaryOperator::Minus => write!(f, "-"),
        }
    }
}

impl fmt::Display for BinaryOperator {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            BinaryOperator::Plus => write!(f, "+"),
            BinaryOperator::Minus => write!(f, "-"),
            BinaryOperator::Multiply => write!(f, "*"),
            BinaryOperator::FloatDivide => write!(f, "/"),
            BinaryOperator::IntegerDivide => write!(f, "DIV"),
        }
    }
}

impl fmt::Display for Program {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        writeln!(f, "PROGRAM {};", self.name)?;
        write!(f, "{}.", self.block)
    }
}

impl fmt::Display for Block {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if !self.declarations.is_empty() {
            writeln!(f, "VAR")?;
            for decl in &self.declarations {
                writeln!(f, "  {};", decl)?;
            }
        }
        self.body.write_indented(f, 0)
    }
}

impl fmt::Display for VarDecl {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} : {}", self.name, self.declared_type)
    }
}

impl Compound {
    fn write_indented(&self, f: &mut fmt::Formatter, depth: usize) -> fmt::Result {
        let pad = "  ".repeat(depth);
        writeln!(f, "{}BEGIN", pad)?;
        for (i, stmt) in self.statements.iter().enumerate() {
            let separator = if i + 1 < self.statements.len() { ";" } else { "" };
            match stmt {
                Statement::Compound(inner) => {
                    inner.write_indented(f, depth + 1)?;
                    writeln!(f, "{}", separator)?;
                },
                Statement::Assign(assign) => writeln!(f, "{}  {}{}", pad, assign, separator)?,
                Statement::NoOp => writeln!(f, "{}", separator)?,
            }
        }
        write!(f, "{}END", pad)
    }
}

impl fmt::Display for Compound {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.write_indented(f, 0)
    }
}

impl fmt::Display for Assign {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} := {}", self.target.name, self.value)
    }
}

impl fmt::Display for Expr {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Expr::Var(var) => write!(f, "{}", var.name),
            Expr::UnaryOp { op, operand } => write!(f, "{}{}", op, operand),
            Expr::BinOp { op, left, right } => write!(f, "({} {} {})", left, op, right),
            Expr::NumberLiteral(value) => write!(f, "{}", value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn var(name: &str) -> Expr {
        Expr::Var(Var { name: name.to_string(), position: Position::start() })
    }

    #[test]
    fn expressions_render_fully_parenthesised() {
        let expr = Expr::binary(
            BinaryOperator::Minus,
            Expr::binary(BinaryOperator::IntegerDivide, var("a"), Expr::NumberLiteral(Number::Integer(2))),
            Expr::unary(UnaryOperator::Minus, Expr::NumberLiteral(Number::Real(1.5))),
        );
        assert_eq!(expr.to_string(), "((a DIV 2) - -1.5)");
    }

    #[test]
    fn program_renders_as_source() {
        let program = Program {
            name: "Demo".to_string(),
            block: Block {
                declarations: vec![VarDecl { name: "x".to_string(), declared_type: TypeTag::Real }],
                body: Compound {
                    statements: vec![
                        Statement::Assign(Assign {
                            target: Var { name: "x".to_string(), position: Position::start() },
                            value: Expr::NumberLiteral(Number::Integer(1)),
                        }),
                        Statement::Compound(Compound { statements: vec![Statement::NoOp] }),
                    ],
                },
            },
        };

        assert_eq!(
            program.to_string(),
            "PROGRAM Demo;\nVAR\n  x : REAL;\nBEGIN\n  x := 1;\n  BEGIN\n\n  END\nEND."
        );
    }
}
