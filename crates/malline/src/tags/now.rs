//! `{% now %}` and `{% now "%H:%M" %}`

use std::fmt::Write;

use chrono::Local;

use crate::error::Error;
use crate::interpreter::{Context, Variable};
use crate::parser::{Token, TokenParser};
use crate::tags::Tag;
use crate::types::Value;

const DEFAULT_FORMAT: &str = "%Y-%m-%d at %H:%M";

/// Renders the current local time with a `strftime` style format.
///
/// A format that resolves to something other than a string renders
/// nothing.
#[derive(Debug)]
pub struct NowTag {
    format: Option<Variable>,
}

pub(crate) fn parse(_parser: &mut TokenParser<'_>, token: &Token) -> Result<Tag, Error> {
    let components = token.components();
    let format = match components.as_slice() {
        [_] => None,
        [_, format] => Some(Variable::new(format.clone())),
        _ => {
            return Err(Error::syntax(format!(
                "'now' tags may only have one argument: the format string `{}`.",
                token.contents()
            )));
        }
    };
    Ok(Tag::Now(NowTag { format }))
}

impl NowTag {
    pub fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        let format = match &self.format {
            None => DEFAULT_FORMAT.to_string(),
            Some(variable) => match variable.resolve(context) {
                Value::String(format) => format,
                _ => return Ok(String::new()),
            },
        };

        let mut output = String::new();
        write!(output, "{}", Local::now().format(&format))
            .map_err(|_| Error::syntax(format!("'now' tag has an invalid format `{format}`")))?;
        Ok(output)
    }
}
