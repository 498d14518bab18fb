mod context;
mod evaluator;

use std::collections::HashMap;
use log::{debug, trace, warn};
use serde::Deserialize;
use crate::language::ast::{
    Assign, AstVisitor, BinaryOperator, Block, Compound, Expr, Program, TypeTag, UnaryOperator, Var,
};
use crate::language::error::{Error, Result};
use crate::language::parser::DEFAULT_MAX_DEPTH;
use crate::language::value::Number;
use crate::runtime_error;

pub use context::VariableStore;
pub use evaluator::{apply_binary, apply_unary};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct InterpreterConfig {
    /// Reject REAL values assigned to INTEGER-declared variables.
    pub strict_types: bool,
    /// Nesting limit shared by the parser and the tree walk.
    pub max_depth: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            strict_types: false,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}

/// Tree-walking evaluator over a single flat variable scope.
#[derive(Debug, Default)]
pub struct Interpreter {
    config: InterpreterConfig,
    variables: VariableStore,
    declared: HashMap<String, TypeTag>,
    depth: usize,
}

impl Interpreter {
    pub fn new() -> Self {
        Interpreter::with_config(InterpreterConfig::default())
    }

    pub fn with_config(config: InterpreterConfig) -> Self {
        Interpreter {
            config,
            variables: VariableStore::new(),
            declared: HashMap::new(),
            depth: 0,
        }
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    pub fn interpret(&mut self, program: &Program) -> Result<()> {
        debug!("interpreting program '{}'", program.name);
        self.depth = 0;
        self.declared.clear();
        self.visit_program(program)?;
        debug!("program '{}' finished with {} bindings", program.name, self.variables.len());
        Ok(())
    }

    /// Evaluates a bare expression against the current store.
    pub fn evaluate(&mut self, expr: &Expr) -> Result<Number> {
        self.depth = 0;
        expr.accept(self)
    }

    pub fn variables(&self) -> &VariableStore {
        &self.variables
    }

    pub fn into_variables(self) -> VariableStore {
        self.variables
    }

    fn descend(&mut self) -> Result<()> {
        self.depth += 1;
        if self.depth > self.config.max_depth {
            return Err(Error::Recursion { limit: self.config.max_depth });
        }
        Ok(())
    }

    fn ascend(&mut self) {
        self.depth -= 1;
    }

    fn coerce(&self, name: &str, value: Number) -> Result<Number> {
        match (self.declared.get(name), value) {
            (Some(TypeTag::Real), Number::Integer(_)) => Ok(value.to_real()),
            (Some(TypeTag::Integer), Number::Real(_)) if self.config.strict_types => {
                runtime_error!(type: "cannot assign REAL value {} to INTEGER variable '{}'", value, name)
            },
            (Some(TypeTag::Integer), Number::Real(_)) => {
                warn!("storing REAL value {} in INTEGER variable '{}'", value, name);
                Ok(value)
            },
            _ => Ok(value),
        }
    }
}

impl AstVisitor for Interpreter {
    type Value = Number;
    type Error = Error;

    fn visit_program(&mut self, program: &Program) -> Result<()> {
        self.visit_block(&program.block)
    }

    fn visit_block(&mut self, block: &Block) -> Result<()> {
        for decl in &block.declarations {
            self.declared.insert(decl.name.clone(), decl.declared_type);
        }
        self.visit_compound(&block.body)
    }

    fn visit_compound(&mut self, compound: &Compound) -> Result<()> {
        self.descend()?;
        for stmt in &compound.statements {
            stmt.accept(self)?;
        }
        self.ascend();
        Ok(())
    }

    fn visit_assign(&mut self, assign: &Assign) -> Result<()> {
        let value = assign.value.accept(self)?;
        let value = self.coerce(&assign.target.name, value)?;
        trace!("{} := {}", assign.target.name, value);
        self.variables.set_variable(&assign.target.name, value);
        Ok(())
    }

    fn visit_no_op(&mut self) -> Result<()> {
        Ok(())
    }

    fn visit_var(&mut self, var: &Var) -> Result<Number> {
        self.variables
            .get_variable(&var.name)
            .ok_or_else(|| Error::Name { identifier: var.name.clone() })
    }

    fn visit_unary_op(&mut self, op: UnaryOperator, operand: &Expr) -> Result<Number> {
        self.descend()?;
        let value = operand.accept(self)?;
        self.ascend();
        apply_unary(op, value)
    }

    /// `a + b + c` parses as a left-leaning chain. The left spine is walked
    /// in a loop; only right operands count towards the depth limit.
    fn visit_bin_op(&mut self, op: BinaryOperator, left: &Expr, right: &Expr) -> Result<Number> {
        let mut pending = vec![(op, right)];
        let mut leftmost = left;
        while let Expr::BinOp { op, left, right } = leftmost {
            pending.push((*op, right.as_ref()));
            leftmost = left.as_ref();
        }

        let mut acc = leftmost.accept(self)?;
        for (op, right) in pending.into_iter().rev() {
            self.descend()?;
            let rhs = right.accept(self)?;
            self.ascend();
            acc = apply_binary(op, acc, rhs)?;
        }
        Ok(acc)
    }

    fn visit_number(&mut self, value: Number) -> Result<Number> {
        Ok(value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::language::error::{ArithmeticFault, ErrorKind};
    use crate::language::parser::{parse, parse_expression};

    fn run(source: &str) -> Result<VariableStore> {
        let program = parse(source)?;
        let mut interpreter = Interpreter::new();
        interpreter.interpret(&program)?;
        Ok(interpreter.into_variables())
    }

    #[test]
    fn statements_run_in_order() {
        let vars = run("PROGRAM P; BEGIN a := 1; b := a + 1; a := b * 10 END.").unwrap();
        assert_eq!(vars.get_variable("a"), Some(Number::Integer(20)));
        assert_eq!(vars.get_variable("b"), Some(Number::Integer(2)));
    }

    #[test]
    fn nested_compounds_share_the_scope() {
        let vars = run("PROGRAM P; BEGIN BEGIN x := 2 END; y := x * x END.").unwrap();
        assert_eq!(vars.get_variable("y"), Some(Number::Integer(4)));
    }

    #[test]
    fn reading_unassigned_variable_is_a_name_error() {
        let err = run("PROGRAM P; VAR x, y : INTEGER; BEGIN x := y END.").unwrap_err();
        assert_eq!(err, Error::Name { identifier: "y".to_string() });
    }

    #[test]
    fn failed_statement_stops_execution() {
        let program = parse("PROGRAM P; BEGIN a := 1; b := a DIV 0; c := 3 END.").unwrap();
        let mut interpreter = Interpreter::new();

        let err = interpreter.interpret(&program).unwrap_err();
        assert_eq!(err, Error::Arithmetic { fault: ArithmeticFault::DivisionByZero });
        assert!(interpreter.variables().has_variable("a"));
        assert!(!interpreter.variables().has_variable("c"));
    }

    #[test]
    fn real_declarations_widen_integers() {
        let vars = run("PROGRAM P; VAR r : REAL; i : INTEGER; BEGIN r := 3; i := 3 END.").unwrap();
        assert_eq!(vars.get_variable("r"), Some(Number::Real(3.0)));
        assert_eq!(vars.get_variable("i"), Some(Number::Integer(3)));
    }

    #[test]
    fn narrowing_is_only_rejected_in_strict_mode() {
        let source = "PROGRAM P; VAR i : INTEGER; BEGIN i := 7 / 2 END.";
        let program = parse(source).unwrap();

        let mut lenient = Interpreter::new();
        lenient.interpret(&program).unwrap();
        assert_eq!(lenient.variables().get_variable("i"), Some(Number::Real(3.5)));

        let mut strict = Interpreter::with_config(InterpreterConfig { strict_types: true, ..Default::default() });
        let err = strict.interpret(&program).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Type);
        assert!(strict.variables().is_empty());
    }

    #[test]
    fn evaluate_uses_existing_bindings() {
        let mut interpreter = Interpreter::new();
        interpreter.interpret(&parse("PROGRAM P; BEGIN a := 4 END.").unwrap()).unwrap();

        let value = interpreter.evaluate(&parse_expression("a * 2.5").unwrap()).unwrap();
        assert_eq!(value, Number::Real(10.0));
    }

    #[test]
    fn declared_types_belong_to_one_program() {
        let mut interpreter = Interpreter::new();
        interpreter.interpret(&parse("PROGRAM A; VAR r : REAL; BEGIN r := 1 END.").unwrap()).unwrap();
        assert_eq!(interpreter.variables().get_variable("r"), Some(Number::Real(1.0)));

        interpreter.interpret(&parse("PROGRAM B; BEGIN r := 2 END.").unwrap()).unwrap();
        assert_eq!(interpreter.variables().get_variable("r"), Some(Number::Integer(2)));
    }

    #[test]
    fn long_sums_are_not_nesting() {
        let terms = vec!["1"; 300].join(" + ");
        let program = parse(&format!("PROGRAM P; BEGIN x := {} END.", terms)).unwrap();
        let mut interpreter = Interpreter::with_config(InterpreterConfig { max_depth: 8, ..Default::default() });

        interpreter.interpret(&program).unwrap();
        assert_eq!(interpreter.variables().get_variable("x"), Some(Number::Integer(300)));

        let chain = parse_expression("100 - 10 DIV 3 - 1 * 2 + 0.5").unwrap();
        assert_eq!(interpreter.evaluate(&chain).unwrap(), Number::Real(95.5));
    }

    #[test]
    fn tree_walk_honours_depth_limit() {
        let expr = parse_expression("((((1))))+(-(-(2)))").unwrap();
        let mut shallow = Interpreter::with_config(InterpreterConfig { max_depth: 2, ..Default::default() });
        assert_eq!(shallow.evaluate(&expr).unwrap_err(), Error::Recursion { limit: 2 });

        let mut roomy = Interpreter::new();
        assert_eq!(roomy.evaluate(&expr).unwrap(), Number::Integer(3));
    }
}
