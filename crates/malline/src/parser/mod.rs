//! Template lexer and parser.
//!
//! The lexer turns source text into [`Token`]s; the [`TokenParser`] turns
//! tokens into a tree of [`Tag`](crate::Tag)s, delegating each block tag to
//! the parser registered for its name.

mod expression;
mod lexer;
mod token;
mod token_parser;

pub use expression::parse_expression;
pub use lexer::tokenize;
pub use token::{Token, smart_split};
pub use token_parser::{TokenParser, until};
