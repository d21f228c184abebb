//! `if`/`elif`/`else` and `ifnot`.

use crate::error::Error;
use crate::interpreter::{Context, Expression};
use crate::parser::{Token, TokenParser, parse_expression, until};
use crate::tags::{Tag, render_tags};

/// One guarded branch. A branch without an expression always matches.
#[derive(Debug)]
pub struct IfCondition {
    expression: Option<Expression>,
    tags: Vec<Tag>,
}

impl IfCondition {
    pub fn new(expression: Option<Expression>, tags: Vec<Tag>) -> Self {
        Self { expression, tags }
    }

    fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        context.push(None, |context| render_tags(&self.tags, context))
    }
}

/// Renders the first branch whose condition holds, or nothing.
#[derive(Debug)]
pub struct IfTag {
    conditions: Vec<IfCondition>,
}

impl IfTag {
    pub fn new(conditions: Vec<IfCondition>) -> Self {
        Self { conditions }
    }

    pub fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        for condition in &self.conditions {
            let matched = match &condition.expression {
                Some(expression) => expression.evaluate(context)?,
                None => true,
            };
            if matched {
                return condition.render(context);
            }
        }
        Ok(String::new())
    }
}

pub(crate) fn parse_if(parser: &mut TokenParser<'_>, token: &Token) -> Result<Tag, Error> {
    let branch_end = ["endif", "elif", "else"];

    let components = token.components();
    let expression = parse_expression(components.get(1..).unwrap_or_default(), parser)?;
    let tags = parser.parse_until(until(&branch_end))?;
    let mut conditions = vec![IfCondition::new(Some(expression), tags)];

    let mut next = parser.next_token();
    while let Some(current) = next
        .as_ref()
        .filter(|token| token.name().as_deref() == Some("elif"))
    {
        let components = current.components();
        let expression = parse_expression(&components[1..], parser)?;
        let tags = parser.parse_until(until(&branch_end))?;
        conditions.push(IfCondition::new(Some(expression), tags));
        next = parser.next_token();
    }

    if next.as_ref().is_some_and(|token| token.contents() == "else") {
        let tags = parser.parse_until(until(&["endif"]))?;
        conditions.push(IfCondition::new(None, tags));
        next = parser.next_token();
    }

    match next {
        Some(token) if token.contents() == "endif" => Ok(Tag::If(IfTag::new(conditions))),
        _ => Err(Error::syntax("`endif` was not found.")),
    }
}

/// `ifnot` renders its first body when the condition is false and its
/// `else` body when it is true.
pub(crate) fn parse_ifnot(parser: &mut TokenParser<'_>, token: &Token) -> Result<Tag, Error> {
    let components = token.components();
    if components.len() != 2 {
        return Err(Error::syntax(format!(
            "'ifnot' statements should use the following 'ifnot condition' `{}`.",
            token.contents()
        )));
    }

    let false_tags = parser.parse_until(until(&["endif", "else"]))?;
    let Some(terminator) = parser.next_token() else {
        return Err(Error::syntax("`endif` was not found."));
    };

    let mut true_tags = Vec::new();
    if terminator.contents() == "else" {
        true_tags = parser.parse_until(until(&["endif"]))?;
        if parser.next_token().is_none() {
            return Err(Error::syntax("`endif` was not found."));
        }
    }

    let expression = parse_expression(&components[1..], parser)?;
    Ok(Tag::If(IfTag::new(vec![
        IfCondition::new(Some(expression), true_tags),
        IfCondition::new(None, false_tags),
    ])))
}
