use log::trace;
use crate::language::ast::{BinaryOperator, UnaryOperator};
use crate::language::error::{ArithmeticFault, Result};
use crate::language::value::Number;
use crate::runtime_error;

pub fn apply_unary(op: UnaryOperator, value: Number) -> Result<Number> {
    match (op, value) {
        (UnaryOperator::Plus, value) => Ok(value),
        (UnaryOperator::Minus, Number::Integer(i)) => match i.checked_neg() {
            Some(negated) => Ok(Number::Integer(negated)),
            None => runtime_error!(arithmetic: ArithmeticFault::Overflow),
        },
        (UnaryOperator::Minus, Number::Real(r)) => Ok(Number::Real(-r)),
    }
}

/// Integer operands stay integers for `+ - * DIV`; any real operand makes the
/// result real. `/` always produces a real.
pub fn apply_binary(op: BinaryOperator, left: Number, right: Number) -> Result<Number> {
    trace!("binary operation: {} {} {}", left, op, right);

    match op {
        BinaryOperator::Plus => promote(left, right, i64::checked_add, |a, b| a + b),
        BinaryOperator::Minus => promote(left, right, i64::checked_sub, |a, b| a - b),
        BinaryOperator::Multiply => promote(left, right, i64::checked_mul, |a, b| a * b),
        BinaryOperator::FloatDivide => {
            if right.is_zero() {
                return runtime_error!(arithmetic: ArithmeticFault::DivisionByZero);
            }
            Ok(Number::Real(left.as_f64() / right.as_f64()))
        },
        BinaryOperator::IntegerDivide => match (left, right) {
            (Number::Integer(_), Number::Integer(0)) => runtime_error!(arithmetic: ArithmeticFault::DivisionByZero),
            (Number::Integer(a), Number::Integer(b)) => match a.checked_div(b) {
                Some(quotient) => Ok(Number::Integer(quotient)),
                None => runtime_error!(arithmetic: ArithmeticFault::Overflow),
            },
            _ => runtime_error!(type: "DIV needs INTEGER operands, got {} and {}", left, right),
        },
    }
}

fn promote(
    left: Number,
    right: Number,
    integer_op: fn(i64, i64) -> Option<i64>,
    real_op: fn(f64, f64) -> f64,
) -> Result<Number> {
    match (left, right) {
        (Number::Integer(a), Number::Integer(b)) => match integer_op(a, b) {
            Some(value) => Ok(Number::Integer(value)),
            None => runtime_error!(arithmetic: ArithmeticFault::Overflow),
        },
        _ => Ok(Number::Real(real_op(left.as_f64(), right.as_f64()))),
    }
}
