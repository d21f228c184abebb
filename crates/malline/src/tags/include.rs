//! `{% include "name" [context] %}`

use tracing::debug;

use crate::error::Error;
use crate::interpreter::{Context, Variable};
use crate::parser::{Token, TokenParser};
use crate::tags::Tag;
use crate::types::Value;

/// Renders another template in a nested scope of the current context.
///
/// An optional second argument names a mapping whose entries are bound on
/// top of the current scope while the included template renders.
#[derive(Debug)]
pub struct IncludeTag {
    template_name: Variable,
    context: Option<Variable>,
}

pub(crate) fn parse(_parser: &mut TokenParser<'_>, token: &Token) -> Result<Tag, Error> {
    let components = token.components();
    let (name, context) = match components.as_slice() {
        [_, name] => (name, None),
        [_, name, context] => (name, Some(Variable::new(context.clone()))),
        _ => {
            return Err(Error::syntax(
                "'include' tag takes one argument, the stencil file to be included, \
                 and an optional context",
            ));
        }
    };

    Ok(Tag::Include(IncludeTag {
        template_name: Variable::new(name.clone()),
        context,
    }))
}

impl IncludeTag {
    pub fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        let Value::String(name) = self.template_name.resolve(context) else {
            return Err(Error::syntax(format!(
                "'{}' could not be resolved as a string",
                self.template_name
            )));
        };
        debug!(template = %name, "including template");
        let template = context.environment().load_template(&name)?;

        let scope = match self.context.as_ref().map(|variable| variable.resolve(context)) {
            Some(Value::Mapping(map)) => Some(map),
            _ => None,
        };
        context.push(scope, |context| template.render_in(context))
    }
}
