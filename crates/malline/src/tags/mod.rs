//! The tag tree and the built-in tags.

use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use crate::error::Error;
use crate::interpreter::{Context, Resolvable};

pub(crate) mod filter_tag;
pub(crate) mod for_tag;
pub(crate) mod if_tag;
pub(crate) mod include;
pub(crate) mod inheritance;
pub(crate) mod now;

pub use filter_tag::FilterTag;
pub use for_tag::ForTag;
pub use if_tag::{IfCondition, IfTag};
pub use include::IncludeTag;
pub use inheritance::{BlockContext, BlockTag, ExtendsTag};
pub use now::NowTag;

/// A node of a parsed template.
#[derive(Debug)]
pub enum Tag {
    /// Literal text, output as-is.
    Text(String),
    /// `{{ ... }}`: a resolved value, stringified.
    Variable(Resolvable),
    For(ForTag),
    If(IfTag),
    Block(Arc<BlockTag>),
    Extends(ExtendsTag),
    Include(IncludeTag),
    Filter(FilterTag),
    Now(NowTag),
    /// A tag registered by a user extension.
    Custom(Box<dyn Node>),
}

impl Tag {
    /// Render this node in `context`.
    pub fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        match self {
            Tag::Text(text) => Ok(text.clone()),
            Tag::Variable(resolvable) => Ok(resolvable.resolve(context)?.to_string()),
            Tag::For(tag) => tag.render(context),
            Tag::If(tag) => tag.render(context),
            Tag::Block(tag) => tag.render(context),
            Tag::Extends(tag) => tag.render(context),
            Tag::Include(tag) => tag.render(context),
            Tag::Filter(tag) => tag.render(context),
            Tag::Now(tag) => tag.render(context),
            Tag::Custom(node) => node.render(context),
        }
    }
}

/// Render a list of tags and concatenate their output.
pub fn render_tags(tags: &[Tag], context: &mut Context<'_>) -> Result<String, Error> {
    let mut output = String::new();
    for tag in tags {
        output.push_str(&tag.render(context)?);
    }
    Ok(output)
}

/// A renderable node contributed by a user extension.
///
/// ```
/// use malline::{Context, Environment, Error, Extension, Node, Tag, context};
///
/// #[derive(Debug)]
/// struct Shout(String);
///
/// impl Node for Shout {
///     fn render(&self, _context: &mut Context<'_>) -> Result<String, Error> {
///         Ok(self.0.to_uppercase())
///     }
/// }
///
/// let mut extension = Extension::new();
/// extension.register_tag("shout", |_parser, token| {
///     let text = token.components().get(1).cloned().unwrap_or_default();
///     Ok(Tag::Custom(Box::new(Shout(text))))
/// });
///
/// let env = Environment::builder().extensions(vec![extension]).build();
/// assert_eq!(env.render_str("{% shout hey %}", context! {}).unwrap(), "HEY");
/// ```
pub trait Node: Debug + Send + Sync {
    fn render(&self, context: &mut Context<'_>) -> Result<String, Error>;
}

pub(crate) type SimpleTagHandler = dyn Fn(&Context<'_>) -> Result<String, Error> + Send + Sync;

/// A bodiless tag whose output comes from a handler closure.
#[derive(Clone)]
pub struct SimpleTag {
    handler: Arc<SimpleTagHandler>,
}

impl SimpleTag {
    pub fn new<F>(handler: F) -> Self
    where
        F: Fn(&Context<'_>) -> Result<String, Error> + Send + Sync + 'static,
    {
        Self {
            handler: Arc::new(handler),
        }
    }

    pub(crate) fn shared(handler: Arc<SimpleTagHandler>) -> Self {
        Self { handler }
    }
}

impl Node for SimpleTag {
    fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        (self.handler)(context)
    }
}

impl Debug for SimpleTag {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str("SimpleTag")
    }
}
