//! Built-in filters.
//!
//! Filters stringify their input where they operate on text, so `nil`
//! becomes "" and numbers print as written.

use unicode_segmentation::UnicodeSegmentation;

use crate::error::Error;
use crate::types::Value;

/// `value|default:fallback,..` - the value, or the first non-nil argument.
pub fn default_value(value: Value, arguments: Vec<Value>) -> Result<Value, Error> {
    if !value.is_nil() {
        return Ok(value);
    }
    Ok(arguments
        .into_iter()
        .find(|argument| !argument.is_nil())
        .unwrap_or_default())
}

/// Uppercase the first grapheme and lowercase the rest.
pub fn capitalize(value: Value) -> Result<Value, Error> {
    let text = value.to_string();
    let mut graphemes = text.graphemes(true);
    let Some(first) = graphemes.next() else {
        return Ok(Value::String(String::new()));
    };
    let mut result = first.to_uppercase();
    result.push_str(&graphemes.as_str().to_lowercase());
    Ok(Value::String(result))
}

pub fn uppercase(value: Value) -> Result<Value, Error> {
    Ok(Value::String(value.to_string().to_uppercase()))
}

pub fn lowercase(value: Value) -> Result<Value, Error> {
    Ok(Value::String(value.to_string().to_lowercase()))
}

/// Join a sequence's stringified items. Other values pass through.
pub fn join(value: Value, arguments: Vec<Value>) -> Result<Value, Error> {
    if arguments.len() > 1 {
        return Err(Error::syntax("'join' filter takes a single argument"));
    }
    let separator = arguments
        .first()
        .map(Value::to_string)
        .unwrap_or_default();

    match value {
        Value::Sequence(items) => Ok(Value::String(
            items
                .iter()
                .map(Value::to_string)
                .collect::<Vec<_>>()
                .join(&separator),
        )),
        other => Ok(other),
    }
}

/// Split a string on a separator, a space by default. Other values pass
/// through.
pub fn split(value: Value, arguments: Vec<Value>) -> Result<Value, Error> {
    if arguments.len() > 1 {
        return Err(Error::syntax("'split' filter takes a single argument"));
    }
    let separator = arguments
        .first()
        .map_or_else(|| " ".to_string(), Value::to_string);

    match value {
        Value::String(text) if separator.is_empty() => Ok(Value::Sequence(vec![text.into()])),
        Value::String(text) => Ok(Value::Sequence(
            text.split(separator.as_str()).map(Value::from).collect(),
        )),
        other => Ok(other),
    }
}

/// `value|indent:width,indentation,indent_first`.
///
/// Indents every non-empty line after the first by `width` copies of
/// `indentation`. The first line is indented too when `indent_first` is
/// true. Defaults are 4, a space and false.
pub fn indent(value: Value, arguments: Vec<Value>) -> Result<Value, Error> {
    if arguments.len() > 3 {
        return Err(Error::syntax("'indent' filter can take at most 3 arguments"));
    }

    let width = match arguments.first() {
        None => 4,
        Some(Value::Int(width)) => usize::try_from(*width).unwrap_or(0),
        Some(other) => {
            return Err(Error::syntax(format!(
                "'indent' filter width argument must be an Integer ({other})"
            )));
        }
    };
    let unit = match arguments.get(1) {
        None => " ".to_string(),
        Some(Value::String(unit)) => unit.clone(),
        Some(other) => {
            return Err(Error::syntax(format!(
                "'indent' filter indentation argument must be a String ({other})"
            )));
        }
    };
    let indent_first = match arguments.get(2) {
        None => false,
        Some(Value::Bool(flag)) => *flag,
        Some(other) => {
            return Err(Error::syntax(format!(
                "'indent' filter indentFirst argument must be a Bool ({other})"
            )));
        }
    };

    let indentation = unit.repeat(width);
    Ok(Value::String(indent_lines(
        &value.to_string(),
        &indentation,
        indent_first,
    )))
}

fn indent_lines(content: &str, indentation: &str, indent_first: bool) -> String {
    if indentation.is_empty() {
        return content.to_string();
    }

    content
        .split('\n')
        .enumerate()
        .map(|(index, line)| {
            let indent = if index == 0 {
                indent_first
            } else {
                !line.is_empty()
            };
            if indent {
                format!("{indentation}{line}")
            } else {
                line.to_string()
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
