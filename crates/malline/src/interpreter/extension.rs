//! Registries of tag parsers and filters.

use std::collections::BTreeMap;
use std::fmt::{self, Debug, Formatter};
use std::sync::Arc;

use tracing::trace;

use crate::error::Error;
use crate::interpreter::{Context, filters};
use crate::parser::{Token, TokenParser};
use crate::tags::{self, SimpleTag, SimpleTagHandler, Tag};
use crate::types::Value;

/// Parses the token that opened a tag, pulling any body tokens it needs from
/// the parser, into a [`Tag`].
pub type TagParser = Arc<dyn Fn(&mut TokenParser<'_>, &Token) -> Result<Tag, Error> + Send + Sync>;

type SimpleFilterFn = dyn Fn(Value) -> Result<Value, Error> + Send + Sync;
type ArgumentsFilterFn = dyn Fn(Value, Vec<Value>) -> Result<Value, Error> + Send + Sync;

/// A named transform applied to a value in a filter chain.
#[derive(Clone)]
pub enum Filter {
    /// A filter that takes no arguments.
    Simple(Arc<SimpleFilterFn>),
    /// A filter that receives its resolved arguments positionally.
    Arguments(Arc<ArgumentsFilterFn>),
}

impl Filter {
    /// Apply the filter to `value`.
    ///
    /// Passing arguments to a [`Filter::Simple`] filter is a syntax error.
    pub fn invoke(&self, value: Value, arguments: Vec<Value>) -> Result<Value, Error> {
        match self {
            Filter::Simple(filter) => {
                if !arguments.is_empty() {
                    return Err(Error::syntax("cannot invoke filter with an argument"));
                }
                filter(value)
            }
            Filter::Arguments(filter) => filter(value, arguments),
        }
    }
}

impl Debug for Filter {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Filter::Simple(_) => f.write_str("Filter::Simple"),
            Filter::Arguments(_) => f.write_str("Filter::Arguments"),
        }
    }
}

/// A set of named tag parsers and filters contributed to an
/// [`Environment`](crate::Environment).
///
/// # Example
///
/// ```
/// use malline::{Environment, Extension, Value, context};
///
/// let mut extension = Extension::new();
/// extension.register_filter("shout", |value| {
///     Ok(Value::from(format!("{}!", value.to_string().to_uppercase())))
/// });
/// extension.register_simple_tag("greeting", |_| Ok("Hello".to_string()));
///
/// let env = Environment::builder().extensions(vec![extension]).build();
/// let rendered = env
///     .render_str("{% greeting %}, {{ name|shout }}", context! { "name" => "kyle" })
///     .unwrap();
/// assert_eq!(rendered, "Hello, KYLE!");
/// ```
#[derive(Clone, Default)]
pub struct Extension {
    tags: BTreeMap<String, TagParser>,
    filters: BTreeMap<String, Filter>,
}

impl Extension {
    /// Create an empty extension.
    pub fn new() -> Self {
        Self::default()
    }

    /// The extension holding the built-in tags and filters.
    pub(crate) fn builtins() -> Self {
        let mut extension = Self::new();

        extension.register_tag("for", tags::for_tag::parse);
        extension.register_tag("if", tags::if_tag::parse_if);
        extension.register_tag("ifnot", tags::if_tag::parse_ifnot);
        extension.register_tag("now", tags::now::parse);
        extension.register_tag("include", tags::include::parse);
        extension.register_tag("extends", tags::inheritance::parse_extends);
        extension.register_tag("block", tags::inheritance::parse_block);
        extension.register_tag("filter", tags::filter_tag::parse);

        extension.register_filter_with_args("default", filters::default_value);
        extension.register_filter("capitalize", filters::capitalize);
        extension.register_filter("uppercase", filters::uppercase);
        extension.register_filter("lowercase", filters::lowercase);
        extension.register_filter_with_args("join", filters::join);
        extension.register_filter_with_args("split", filters::split);
        extension.register_filter_with_args("indent", filters::indent);

        extension
    }

    /// Register a tag parser under `name`, replacing any previous one.
    pub fn register_tag<F>(&mut self, name: impl Into<String>, parser: F)
    where
        F: Fn(&mut TokenParser<'_>, &Token) -> Result<Tag, Error> + Send + Sync + 'static,
    {
        let name = name.into();
        trace!(tag = %name, "registering tag");
        self.tags.insert(name, Arc::new(parser));
    }

    /// Register a tag that takes no body and renders through `handler`.
    pub fn register_simple_tag<F>(&mut self, name: impl Into<String>, handler: F)
    where
        F: Fn(&Context<'_>) -> Result<String, Error> + Send + Sync + 'static,
    {
        let handler: Arc<SimpleTagHandler> = Arc::new(handler);
        self.register_tag(name, move |_, _| {
            Ok(Tag::Custom(Box::new(SimpleTag::shared(Arc::clone(&handler)))))
        });
    }

    /// Register a filter that takes no arguments.
    pub fn register_filter<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(Value) -> Result<Value, Error> + Send + Sync + 'static,
    {
        let name = name.into();
        trace!(filter = %name, "registering filter");
        self.filters.insert(name, Filter::Simple(Arc::new(filter)));
    }

    /// Register a filter that receives resolved arguments.
    pub fn register_filter_with_args<F>(&mut self, name: impl Into<String>, filter: F)
    where
        F: Fn(Value, Vec<Value>) -> Result<Value, Error> + Send + Sync + 'static,
    {
        let name = name.into();
        trace!(filter = %name, "registering filter");
        self.filters.insert(name, Filter::Arguments(Arc::new(filter)));
    }

    /// Look up a tag parser.
    pub fn tag(&self, name: &str) -> Option<&TagParser> {
        self.tags.get(name)
    }

    /// Look up a filter.
    pub fn filter(&self, name: &str) -> Option<&Filter> {
        self.filters.get(name)
    }

    /// Names of all registered tags, sorted.
    pub fn tag_names(&self) -> impl Iterator<Item = &str> {
        self.tags.keys().map(String::as_str)
    }

    /// Names of all registered filters, sorted.
    pub fn filter_names(&self) -> impl Iterator<Item = &str> {
        self.filters.keys().map(String::as_str)
    }
}

impl Debug for Extension {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.debug_struct("Extension")
            .field("tags", &self.tags.keys().collect::<Vec<_>>())
            .field("filters", &self.filters.keys().collect::<Vec<_>>())
            .finish()
    }
}
