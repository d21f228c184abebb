//! Precedence-climbing parser for boolean tag expressions.
//!
//! Operators, loosest to tightest:
//! - `or` (6)
//! - `and` (7)
//! - `not` prefix (8)
//! - `==` `!=` `>` `>=` `<` `<=` (10)

use std::mem;

use crate::error::Error;
use crate::interpreter::{Comparison, Expression, Resolvable};
use crate::parser::TokenParser;

/// Parse the components of an `if`-style tag into an [`Expression`].
///
/// Components that are not operators are compiled as variables, ranges or
/// filter expressions.
pub fn parse_expression(
    components: &[String],
    parser: &TokenParser<'_>,
) -> Result<Expression, Error> {
    let tokens = components
        .iter()
        .map(|component| classify(component, parser))
        .collect::<Result<Vec<_>, Error>>()?;

    let mut parser = ExpressionParser {
        tokens,
        position: 0,
    };
    let expression = parser.expression(0)?;
    if parser.position < parser.tokens.len() {
        return Err(Error::syntax("'if' expression error: dangling token"));
    }
    Ok(expression)
}

/// Binding power of the `not` prefix operator.
const NOT_BINDING_POWER: u8 = 8;

#[derive(Debug, Clone, Copy)]
enum Infix {
    Or,
    And,
    Compare(Comparison),
}

impl Infix {
    fn binding_power(self) -> u8 {
        match self {
            Infix::Or => 6,
            Infix::And => 7,
            Infix::Compare(_) => 10,
        }
    }

    fn build(self, lhs: Expression, rhs: Expression) -> Expression {
        let (lhs, rhs) = (Box::new(lhs), Box::new(rhs));
        match self {
            Infix::Or => Expression::Or(lhs, rhs),
            Infix::And => Expression::And(lhs, rhs),
            Infix::Compare(operator) => Expression::Compare { operator, lhs, rhs },
        }
    }
}

#[derive(Debug)]
enum ExpressionToken {
    Infix { name: String, operator: Infix },
    Not,
    Variable(Resolvable),
    End,
}

impl ExpressionToken {
    fn binding_power(&self) -> u8 {
        match self {
            ExpressionToken::Infix { operator, .. } => operator.binding_power(),
            ExpressionToken::Not => NOT_BINDING_POWER,
            ExpressionToken::Variable(_) | ExpressionToken::End => 0,
        }
    }
}

fn classify(component: &str, parser: &TokenParser<'_>) -> Result<ExpressionToken, Error> {
    let infix = match component {
        "not" => return Ok(ExpressionToken::Not),
        "or" => Some(Infix::Or),
        "and" => Some(Infix::And),
        _ => Comparison::from_symbol(component).map(Infix::Compare),
    };

    match infix {
        Some(operator) => Ok(ExpressionToken::Infix {
            name: component.to_string(),
            operator,
        }),
        None => parser
            .compile_resolvable(component)
            .map(ExpressionToken::Variable),
    }
}

struct ExpressionParser {
    tokens: Vec<ExpressionToken>,
    position: usize,
}

impl ExpressionParser {
    fn current_binding_power(&self) -> u8 {
        self.tokens
            .get(self.position)
            .map_or(0, ExpressionToken::binding_power)
    }

    /// Move the current token out of the queue, leaving an end marker.
    fn advance(&mut self) -> ExpressionToken {
        match self.tokens.get_mut(self.position) {
            Some(token) => {
                self.position += 1;
                mem::replace(token, ExpressionToken::End)
            }
            None => ExpressionToken::End,
        }
    }

    fn expression(&mut self, binding_power: u8) -> Result<Expression, Error> {
        let token = self.advance();
        let mut left = self.null_denotation(token)?;

        while binding_power < self.current_binding_power() {
            let token = self.advance();
            left = self.left_denotation(token, left)?;
        }

        Ok(left)
    }

    /// A token in prefix position.
    fn null_denotation(&mut self, token: ExpressionToken) -> Result<Expression, Error> {
        match token {
            ExpressionToken::Not => {
                let operand = self.expression(NOT_BINDING_POWER)?;
                Ok(Expression::Not(Box::new(operand)))
            }
            ExpressionToken::Infix { name, .. } => Err(Error::syntax(format!(
                "'if' expression error: infix operator '{name}' doesn't have a left hand side"
            ))),
            ExpressionToken::Variable(variable) => Ok(Expression::Variable(variable)),
            ExpressionToken::End => Err(Error::syntax("'if' expression error: end")),
        }
    }

    /// A token following a complete left operand.
    fn left_denotation(
        &mut self,
        token: ExpressionToken,
        left: Expression,
    ) -> Result<Expression, Error> {
        match token {
            ExpressionToken::Infix { operator, .. } => {
                let right = self.expression(operator.binding_power())?;
                Ok(operator.build(left, right))
            }
            ExpressionToken::Not => Err(Error::syntax(
                "'if' expression error: prefix operator 'not' was called with a left hand side",
            )),
            ExpressionToken::Variable(variable) => Err(Error::syntax(format!(
                "'if' expression error: variable '{variable}' was called with a left hand side"
            ))),
            ExpressionToken::End => Err(Error::syntax("'if' expression error: end")),
        }
    }
}
