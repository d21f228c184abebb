//! Recursive-descent driver turning tokens into a tag tree.

use std::collections::VecDeque;

use tracing::trace;

use crate::error::{Error, compute_suggestions};
use crate::interpreter::{
    Environment, Extension, Filter, FilterExpression, RangeVariable, Resolvable, TagParser,
};
use crate::parser::Token;
use crate::tags::Tag;

/// Builds a stop predicate matching block tokens named one of `names`.
///
/// ```
/// use malline::parser::{Token, until};
///
/// let stop = until(&["endif", "else"]);
/// assert!(stop(&Token::Block("else".into())));
/// assert!(!stop(&Token::Block("elif value".into())));
/// ```
pub fn until<'a>(names: &'a [&'a str]) -> impl Fn(&Token) -> bool + 'a {
    move |token| {
        token
            .name()
            .is_some_and(|name| names.contains(&name.as_str()))
    }
}

/// A queue of tokens being parsed against an [`Environment`]'s registries.
///
/// Tag parsers receive the `TokenParser` so they can parse their own bodies
/// by calling back into [`TokenParser::parse_until`].
#[derive(Debug)]
pub struct TokenParser<'env> {
    tokens: VecDeque<Token>,
    environment: &'env Environment,
}

impl<'env> TokenParser<'env> {
    /// Create a parser over `tokens`.
    pub fn new(tokens: Vec<Token>, environment: &'env Environment) -> Self {
        Self {
            tokens: tokens.into(),
            environment,
        }
    }

    /// The environment whose extensions this parser consults.
    pub fn environment(&self) -> &'env Environment {
        self.environment
    }

    /// Parse every remaining token.
    pub fn parse(&mut self) -> Result<Vec<Tag>, Error> {
        self.parse_until(|_| false)
    }

    /// Parse tokens until a block token satisfies `stop`.
    ///
    /// The stopping token is pushed back onto the queue, so the caller can
    /// inspect it with [`TokenParser::next_token`] to learn which terminator
    /// ended the body. When the tokens run out first, the caller sees `None`.
    pub fn parse_until(&mut self, stop: impl Fn(&Token) -> bool) -> Result<Vec<Tag>, Error> {
        let mut tags = Vec::new();

        while let Some(token) = self.next_token() {
            match token {
                Token::Text(text) => tags.push(Tag::Text(text)),
                Token::Variable(contents) => {
                    let expression = self.compile_filter(&contents)?;
                    tags.push(Tag::Variable(Resolvable::Filter(expression)));
                }
                Token::Comment(_) => {}
                block @ Token::Block(_) => {
                    if stop(&block) {
                        self.prepend_token(block);
                        return Ok(tags);
                    }

                    if let Some(name) = block.name() {
                        trace!(tag = %name, "parsing tag");
                        let parser = self.find_tag(&name)?;
                        tags.push(parser(self, &block)?);
                    }
                }
            }
        }

        Ok(tags)
    }

    /// Take the next token off the queue.
    pub fn next_token(&mut self) -> Option<Token> {
        self.tokens.pop_front()
    }

    /// The tokens not yet consumed, in order.
    pub fn remaining_tokens(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    /// Push a token back onto the front of the queue.
    pub fn prepend_token(&mut self, token: Token) {
        self.tokens.push_front(token);
    }

    /// Compile a variable with an optional filter chain.
    pub fn compile_filter(&self, token: &str) -> Result<FilterExpression, Error> {
        FilterExpression::new(token, self)
    }

    /// Compile a range if `token` is one, else a filter expression.
    ///
    /// A range with a missing bound is an error rather than a path.
    pub fn compile_resolvable(&self, token: &str) -> Result<Resolvable, Error> {
        match RangeVariable::new(token, self)? {
            Some(range) => Ok(Resolvable::Range(range)),
            None => self.compile_filter(token).map(Resolvable::Filter),
        }
    }

    /// Find the parser for a tag, searching extensions in lookup order.
    pub fn find_tag(&self, name: &str) -> Result<TagParser, Error> {
        self.environment
            .extensions()
            .find_map(|extension| extension.tag(name))
            .cloned()
            .ok_or_else(|| Error::UnknownTag {
                name: name.to_string(),
            })
    }

    /// Find a filter, searching extensions in lookup order.
    ///
    /// An unknown name reports near-miss filter names as suggestions.
    pub fn find_filter(&self, name: &str) -> Result<Filter, Error> {
        if let Some(filter) = self
            .environment
            .extensions()
            .find_map(|extension| extension.filter(name))
        {
            return Ok(filter.clone());
        }

        let available: Vec<&str> = self
            .environment
            .extensions()
            .flat_map(Extension::filter_names)
            .collect();
        Err(Error::UnknownFilter {
            name: name.to_string(),
            suggestions: compute_suggestions(name, &available),
        })
    }
}
