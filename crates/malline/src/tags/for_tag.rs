//! `{% for x in items [where condition] %} ... {% empty %} ... {% endfor %}`

use crate::error::Error;
use crate::interpreter::{Context, Expression, Resolvable};
use crate::parser::{Token, TokenParser, parse_expression, until};
use crate::tags::{Tag, render_tags};
use crate::types::{Map, Tuple, Value, record_fields};

/// Iterates a sequence, mapping, range or record.
///
/// Each iteration binds the loop variables and a `forloop` mapping holding
/// `first`, `last`, `counter`, `counter0` and `length`. The `empty` branch
/// renders when there is nothing to iterate, including when a `where`
/// clause filtered every item out.
#[derive(Debug)]
pub struct ForTag {
    resolvable: Resolvable,
    loop_variables: Vec<String>,
    tags: Vec<Tag>,
    empty_tags: Vec<Tag>,
    condition: Option<Expression>,
}

pub(crate) fn parse(parser: &mut TokenParser<'_>, token: &Token) -> Result<Tag, Error> {
    let components = token.components();

    let has_token =
        |name: &str, index: usize| components.len() > index + 1 && components[index] == name;
    let ends_or_has_token =
        |name: &str, index: usize| components.len() == index || has_token(name, index);

    if !(has_token("in", 2) && ends_or_has_token("where", 4)) {
        return Err(Error::syntax(
            "'for' statements should use the syntax: `for <x> in <y> [where <condition>]",
        ));
    }

    let loop_variables = components[1]
        .split(',')
        .map(|variable| variable.trim().to_string())
        .collect();

    let tags = parser.parse_until(until(&["endfor", "empty"]))?;
    let Some(terminator) = parser.next_token() else {
        return Err(Error::syntax("`endfor` was not found."));
    };

    let mut empty_tags = Vec::new();
    if terminator.contents() == "empty" {
        empty_tags = parser.parse_until(until(&["endfor"]))?;
        if parser.next_token().is_none() {
            return Err(Error::syntax("`endfor` was not found."));
        }
    }

    let resolvable = parser.compile_resolvable(&components[3])?;
    let condition = if has_token("where", 4) {
        Some(parse_expression(&components[5..], parser)?)
    } else {
        None
    };

    Ok(Tag::For(ForTag {
        resolvable,
        loop_variables,
        tags,
        empty_tags,
        condition,
    }))
}

impl ForTag {
    pub fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        let mut items = iteration_items(self.resolvable.resolve(context)?);

        if let Some(condition) = &self.condition {
            let mut kept = Vec::with_capacity(items.len());
            for item in items {
                let keep = context.push(Some(self.bindings(&item)?), |context| {
                    condition.evaluate(context)
                })?;
                if keep {
                    kept.push(item);
                }
            }
            items = kept;
        }

        if items.is_empty() {
            return context.push(None, |context| render_tags(&self.empty_tags, context));
        }

        let length = items.len();
        let mut output = String::new();
        for (index, item) in items.iter().enumerate() {
            let forloop = Map::from([
                ("first".to_string(), Value::Bool(index == 0)),
                ("last".to_string(), Value::Bool(index + 1 == length)),
                ("counter".to_string(), Value::from(index + 1)),
                ("counter0".to_string(), Value::from(index)),
                ("length".to_string(), Value::from(length)),
            ]);
            let scope = Map::from([("forloop".to_string(), Value::Mapping(forloop))]);
            let bindings = self.bindings(item)?;

            let rendered = context.push(Some(scope), |context| {
                context.push(Some(bindings), |context| render_tags(&self.tags, context))
            })?;
            output.push_str(&rendered);
        }
        Ok(output)
    }

    /// The scope binding the loop variables to `item`.
    ///
    /// A single variable takes the whole item. Several variables destructure
    /// it positionally; naming more variables than the item has components
    /// is an error.
    fn bindings(&self, item: &Value) -> Result<Map, Error> {
        match self.loop_variables.as_slice() {
            [] => Ok(Map::new()),
            [variable] => Ok(Map::from([(variable.clone(), item.clone())])),
            variables => {
                let components = item.components();
                if variables.len() > components.len() {
                    return Err(Error::syntax(format!(
                        "Tuple '{item}' has less values than loop variables"
                    )));
                }
                Ok(variables.iter().cloned().zip(components).collect())
            }
        }
    }
}

/// The values a `for` loop visits for a resolved source.
fn iteration_items(source: Value) -> Vec<Value> {
    match source {
        Value::Mapping(map) => map
            .into_iter()
            .map(|(key, value)| Value::from(Tuple::new([Value::String(key), value])))
            .collect(),
        Value::Sequence(items) => items,
        Value::Record(record) => record_fields(record.as_ref())
            .into_iter()
            .map(|(name, value)| Value::from(Tuple::new([Value::String(name), value])))
            .collect(),
        Value::Nil | Value::Bool(_) | Value::Int(_) | Value::Float(_) | Value::String(_) => {
            Vec::new()
        }
    }
}
