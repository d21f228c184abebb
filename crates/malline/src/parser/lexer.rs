//! Template lexer using winnow.
//!
//! Splits raw template source into a flat token stream:
//! - `{{ ... }}` variable output
//! - `{% ... %}` block tags
//! - `{# ... #}` comments
//! - everything else as literal text
//!
//! Delimiter contents are trimmed. An opening delimiter left unclosed at the
//! end of input swallows the rest of the source and yields an empty text
//! token instead of an error.

use tracing::trace;
use winnow::combinator::{alt, delimited, not, preceded, repeat};
use winnow::prelude::*;
use winnow::token::{any, rest, take_until};

use super::token::Token;

/// Tokenize a template source string.
///
/// ```
/// use malline::parser::{Token, tokenize};
///
/// let tokens = tokenize("Hello {{ name }}!");
/// assert_eq!(
///     tokens,
///     vec![
///         Token::Text("Hello ".into()),
///         Token::Variable("name".into()),
///         Token::Text("!".into()),
///     ]
/// );
/// ```
pub fn tokenize(input: &str) -> Vec<Token> {
    let mut remaining = input;
    let tokens = match tokens(&mut remaining) {
        Ok(tokens) if remaining.is_empty() => tokens,
        // Every character is accepted by some branch.
        _ => vec![Token::Text(input.to_string())],
    };
    trace!(count = tokens.len(), "tokenized template");
    tokens
}

fn tokens(input: &mut &str) -> ModalResult<Vec<Token>> {
    repeat(0.., token).parse_next(input)
}

fn token(input: &mut &str) -> ModalResult<Token> {
    alt((variable, block, comment, unclosed, text)).parse_next(input)
}

fn variable(input: &mut &str) -> ModalResult<Token> {
    delimited("{{", take_until(0.., "}}"), "}}")
        .map(|contents: &str| Token::Variable(contents.trim().to_string()))
        .parse_next(input)
}

fn block(input: &mut &str) -> ModalResult<Token> {
    delimited("{%", take_until(0.., "%}"), "%}")
        .map(|contents: &str| Token::Block(contents.trim().to_string()))
        .parse_next(input)
}

fn comment(input: &mut &str) -> ModalResult<Token> {
    delimited("{#", take_until(0.., "#}"), "#}")
        .map(|contents: &str| Token::Comment(contents.trim().to_string()))
        .parse_next(input)
}

/// An opening delimiter with no matching close consumes the remaining input.
fn unclosed(input: &mut &str) -> ModalResult<Token> {
    preceded(opening, rest)
        .map(|_| Token::Text(String::new()))
        .parse_next(input)
}

/// A run of characters up to the next opening delimiter.
fn text(input: &mut &str) -> ModalResult<Token> {
    repeat::<_, _, (), _, _>(1.., preceded(not(opening), any))
        .take()
        .map(|text: &str| Token::Text(text.to_string()))
        .parse_next(input)
}

fn opening<'i>(input: &mut &'i str) -> ModalResult<&'i str> {
    alt(("{{", "{%", "{#")).parse_next(input)
}
