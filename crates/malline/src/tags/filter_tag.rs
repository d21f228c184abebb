//! `{% filter lowercase|capitalize %} ... {% endfilter %}`

use crate::error::Error;
use crate::interpreter::{Context, FilterExpression};
use crate::parser::{Token, TokenParser, until};
use crate::tags::{Tag, render_tags};
use crate::types::{Map, Value};

/// Key the rendered body is bound to while the filters run.
const FILTER_VALUE: &str = "filter_value";

/// Renders its body, then passes the text through a filter chain.
#[derive(Debug)]
pub struct FilterTag {
    expression: FilterExpression,
    tags: Vec<Tag>,
}

pub(crate) fn parse(parser: &mut TokenParser<'_>, token: &Token) -> Result<Tag, Error> {
    let components = token.components();
    let [_, filters] = components.as_slice() else {
        return Err(Error::syntax(
            "'filter' tag takes one argument, the filter expression",
        ));
    };

    let tags = parser.parse_until(until(&["endfilter"]))?;
    if parser.next_token().is_none() {
        return Err(Error::syntax("`endfilter` was not found."));
    }

    let expression = parser.compile_filter(&format!("{FILTER_VALUE}|{filters}"))?;
    Ok(Tag::Filter(FilterTag { expression, tags }))
}

impl FilterTag {
    pub fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        let text = render_tags(&self.tags, context)?;
        let scope = Map::from([(FILTER_VALUE.to_string(), Value::String(text))]);
        context.push(Some(scope), |context| {
            Ok(self.expression.resolve(context)?.to_string())
        })
    }
}
