//! The environment: loader, extensions and template cache.

use std::collections::BTreeMap;
use std::iter;
use std::sync::{Arc, PoisonError, RwLock};

use bon::Builder;
use tracing::debug;

use crate::error::Error;
use crate::interpreter::{Extension, Loader, Template};
use crate::parser::{TokenParser, tokenize};
use crate::types::Map;

/// Composition root for parsing and rendering templates.
///
/// An environment owns the optional [`Loader`] that `include` and `extends`
/// read from, the user [`Extension`]s, and a cache of templates loaded by
/// name. Tags and filters are looked up in user extensions first, in
/// registration order, then in the built-in extension, so a user extension
/// can override any built-in name.
///
/// # Example
///
/// ```
/// use std::sync::Arc;
///
/// use malline::{Environment, MemoryLoader, context};
///
/// let loader = MemoryLoader::new()
///     .with("base.html", "<h1>{% block title %}Untitled{% endblock %}</h1>")
///     .with("page.html", "{% extends 'base.html' %}{% block title %}{{ title }}{% endblock %}");
///
/// let env = Environment::builder().loader(Arc::new(loader)).build();
/// let html = env
///     .render_template("page.html", context! { "title" => "Home" })
///     .unwrap();
/// assert_eq!(html, "<h1>Home</h1>");
/// ```
#[derive(Debug, Builder)]
pub struct Environment {
    /// Source of templates for `include`, `extends` and
    /// [`Environment::render_template`].
    loader: Option<Arc<dyn Loader>>,

    /// User extensions, searched before the built-ins.
    #[builder(default)]
    extensions: Vec<Extension>,

    /// Maximum number of nested scopes, including nested template renders.
    ///
    /// Inheritance or include cycles hit this limit and fail with
    /// [`Error::MaxDepthExceeded`].
    #[builder(default = 64)]
    max_depth: usize,

    /// Maximum number of items a `lower...upper` range may produce.
    #[builder(default = 100_000)]
    max_range: usize,

    /// Whether templates loaded by name are parsed once and reused.
    #[builder(default = true)]
    cache: bool,

    #[builder(skip = Extension::builtins())]
    builtins: Extension,

    #[builder(skip)]
    template_cache: RwLock<BTreeMap<String, Arc<Template>>>,
}

impl Default for Environment {
    fn default() -> Self {
        Environment::builder().build()
    }
}

impl Environment {
    /// Create an environment with no loader and only built-in tags and
    /// filters.
    pub fn new() -> Self {
        Self::default()
    }

    // =========================================================================
    // Registries
    // =========================================================================

    /// Extensions in lookup order: user extensions, then the built-ins.
    pub fn extensions(&self) -> impl Iterator<Item = &Extension> {
        self.extensions.iter().chain(iter::once(&self.builtins))
    }

    /// The configured loader, if any.
    pub fn loader(&self) -> Option<&dyn Loader> {
        self.loader.as_deref()
    }

    /// The scope nesting limit.
    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// The largest number of items a range may produce.
    pub fn max_range(&self) -> usize {
        self.max_range
    }

    // =========================================================================
    // Parsing
    // =========================================================================

    /// Parse an inline template.
    pub fn parse(&self, source: &str) -> Result<Template, Error> {
        self.parse_template(None, source)
    }

    /// Parse a template and record the name it is known by.
    pub fn parse_named(&self, name: impl Into<String>, source: &str) -> Result<Template, Error> {
        self.parse_template(Some(name.into()), source)
    }

    fn parse_template(&self, name: Option<String>, source: &str) -> Result<Template, Error> {
        let tokens = tokenize(source);
        let mut parser = TokenParser::new(tokens, self);
        let nodes = parser.parse()?;
        debug!(
            name = name.as_deref().unwrap_or("<inline>"),
            nodes = nodes.len(),
            "parsed template"
        );
        Ok(Template::new(name, nodes))
    }

    // =========================================================================
    // Loading
    // =========================================================================

    /// Load and parse the template called `name`.
    ///
    /// Fails with [`Error::NotFound`] when no loader is configured or the
    /// loader has no such template.
    pub fn load_template(&self, name: &str) -> Result<Arc<Template>, Error> {
        if let Some(template) = self.cached(name) {
            debug!(name, "template cache hit");
            return Ok(template);
        }

        let loader = self.require_loader(&[name.to_string()])?;
        let source = loader.load(name)?;
        self.store(name, &source)
    }

    /// Load the first of `names` that the loader can find.
    pub fn load_first_template(&self, names: &[String]) -> Result<Arc<Template>, Error> {
        let loader = self.require_loader(names)?;
        let (name, source) = loader.load_first(names)?;
        if let Some(template) = self.cached(&name) {
            debug!(name, "template cache hit");
            return Ok(template);
        }
        self.store(&name, &source)
    }

    /// Drop every cached template.
    pub fn clear_cache(&self) {
        self.template_cache
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }

    fn require_loader(&self, names: &[String]) -> Result<&dyn Loader, Error> {
        self.loader().ok_or_else(|| Error::NotFound {
            names: names.to_vec(),
            loader: None,
        })
    }

    fn cached(&self, name: &str) -> Option<Arc<Template>> {
        if !self.cache {
            return None;
        }
        self.template_cache
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(name)
            .cloned()
    }

    fn store(&self, name: &str, source: &str) -> Result<Arc<Template>, Error> {
        debug!(name, "loaded template");
        let template = Arc::new(self.parse_named(name, source)?);
        if self.cache {
            self.template_cache
                .write()
                .unwrap_or_else(PoisonError::into_inner)
                .insert(name.to_string(), Arc::clone(&template));
        }
        Ok(template)
    }

    // =========================================================================
    // Rendering
    // =========================================================================

    /// Load the template called `name` and render it against `data`.
    pub fn render_template(&self, name: &str, data: Map) -> Result<String, Error> {
        self.load_template(name)?.render(self, data)
    }

    /// Parse `source` and render it against `data`.
    ///
    /// ```
    /// use malline::{Environment, context};
    ///
    /// let env = Environment::new();
    /// let text = env
    ///     .render_str("{{ name|lowercase|capitalize }}", context! { "name" => "TAUNO" })
    ///     .unwrap();
    /// assert_eq!(text, "Tauno");
    /// ```
    pub fn render_str(&self, source: &str, data: Map) -> Result<String, Error> {
        self.parse(source)?.render(self, data)
    }
}
