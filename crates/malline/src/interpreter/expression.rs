//! Boolean expressions used by `if`, `ifnot` and `for ... where`.

use std::cmp::Ordering;

use crate::error::Error;
use crate::interpreter::{Context, Resolvable};

/// A comparison operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Comparison {
    Equal,
    NotEqual,
    Greater,
    GreaterOrEqual,
    Less,
    LessOrEqual,
}

impl Comparison {
    /// Map an operator symbol to its comparison.
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        match symbol {
            "==" => Some(Comparison::Equal),
            "!=" => Some(Comparison::NotEqual),
            ">" => Some(Comparison::Greater),
            ">=" => Some(Comparison::GreaterOrEqual),
            "<" => Some(Comparison::Less),
            "<=" => Some(Comparison::LessOrEqual),
            _ => None,
        }
    }
}

/// A parsed boolean expression.
#[derive(Debug, Clone)]
pub enum Expression {
    /// A constant, used when building expressions by hand.
    Static(bool),
    /// The truthiness of a resolved value.
    Variable(Resolvable),
    Not(Box<Expression>),
    And(Box<Expression>, Box<Expression>),
    Or(Box<Expression>, Box<Expression>),
    Compare {
        operator: Comparison,
        lhs: Box<Expression>,
        rhs: Box<Expression>,
    },
}

impl Expression {
    /// Evaluate the expression in `context`.
    ///
    /// `and` and `or` short-circuit. Comparisons only look at operands that
    /// are plain variables; any other operand makes `==` and the ordering
    /// operators false, and `!=` true.
    pub fn evaluate(&self, context: &Context<'_>) -> Result<bool, Error> {
        match self {
            Expression::Static(value) => Ok(*value),
            Expression::Variable(resolvable) => Ok(resolvable.resolve(context)?.is_truthy()),
            Expression::Not(inner) => Ok(!inner.evaluate(context)?),
            Expression::And(lhs, rhs) => Ok(lhs.evaluate(context)? && rhs.evaluate(context)?),
            Expression::Or(lhs, rhs) => Ok(lhs.evaluate(context)? || rhs.evaluate(context)?),
            Expression::Compare { operator, lhs, rhs } => {
                let (Expression::Variable(lhs), Expression::Variable(rhs)) = (&**lhs, &**rhs)
                else {
                    return Ok(*operator == Comparison::NotEqual);
                };
                let lhs = lhs.resolve(context)?;
                let rhs = rhs.resolve(context)?;

                Ok(match operator {
                    Comparison::Equal => lhs == rhs,
                    Comparison::NotEqual => lhs != rhs,
                    Comparison::Greater => lhs.compare(&rhs) == Some(Ordering::Greater),
                    Comparison::GreaterOrEqual => matches!(
                        lhs.compare(&rhs),
                        Some(Ordering::Greater | Ordering::Equal)
                    ),
                    Comparison::Less => lhs.compare(&rhs) == Some(Ordering::Less),
                    Comparison::LessOrEqual => matches!(
                        lhs.compare(&rhs),
                        Some(Ordering::Less | Ordering::Equal)
                    ),
                })
            }
        }
    }
}
