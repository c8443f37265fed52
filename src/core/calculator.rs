//! Arithmetic over decimal operands

use rust_decimal::Decimal;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum CalcError {
    #[error("Attempted to divide by zero.")]
    DivisionByZero,

    #[error("Invalid operator selected: '{0}'")]
    InvalidOperator(String),

    #[error("Result is out of the supported decimal range")]
    Overflow,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    Add,
    Subtract,
    Multiply,
    Divide,
}

impl Operator {
    pub fn symbol(&self) -> &'static str {
        match self {
            Operator::Add => "+",
            Operator::Subtract => "-",
            Operator::Multiply => "*",
            Operator::Divide => "/",
        }
    }
}

impl FromStr for Operator {
    type Err = CalcError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "+" => Ok(Operator::Add),
            "-" => Ok(Operator::Subtract),
            "*" => Ok(Operator::Multiply),
            "/" => Ok(Operator::Divide),
            other => Err(CalcError::InvalidOperator(other.to_string())),
        }
    }
}

impl fmt::Display for Operator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.symbol())
    }
}

/// Four basic operations. Results are never rounded here; callers round
/// for display or conversion.
pub trait Evaluator: Send + Sync {
    fn add(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError>;
    fn subtract(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError>;
    fn multiply(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError>;
    fn divide(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError>;

    fn evaluate(&self, a: Decimal, b: Decimal, op: Operator) -> Result<Decimal, CalcError> {
        match op {
            Operator::Add => self.add(a, b),
            Operator::Subtract => self.subtract(a, b),
            Operator::Multiply => self.multiply(a, b),
            Operator::Divide => self.divide(a, b),
        }
    }

    fn evaluate_symbol(&self, a: Decimal, b: Decimal, symbol: &str) -> Result<Decimal, CalcError> {
        self.evaluate(a, b, symbol.parse()?)
    }
}

#[derive(Debug, Default, Clone, Copy)]
pub struct StandardCalculator;

impl Evaluator for StandardCalculator {
    fn add(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        a.checked_add(b).ok_or(CalcError::Overflow)
    }

    fn subtract(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        a.checked_sub(b).ok_or(CalcError::Overflow)
    }

    fn multiply(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        a.checked_mul(b).ok_or(CalcError::Overflow)
    }

    fn divide(&self, a: Decimal, b: Decimal) -> Result<Decimal, CalcError> {
        if b.is_zero() {
            return Err(CalcError::DivisionByZero);
        }
        a.checked_div(b).ok_or(CalcError::Overflow)
    }
}

/// Evaluates with the standard calculator.
pub fn evaluate(a: Decimal, b: Decimal, op: Operator) -> Result<Decimal, CalcError> {
    StandardCalculator.evaluate(a, b, op)
}
