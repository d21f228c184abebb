//! Parsed templates.

use crate::error::Error;
use crate::interpreter::{Context, Environment};
use crate::tags::{Tag, render_tags};
use crate::types::Map;

/// A parsed template, ready to render any number of times.
///
/// The tag tree is immutable; every render gets its own [`Context`], so one
/// template can be shared between threads and rendered concurrently.
#[derive(Debug)]
pub struct Template {
    name: Option<String>,
    nodes: Vec<Tag>,
}

impl Template {
    pub(crate) fn new(name: Option<String>, nodes: Vec<Tag>) -> Self {
        Self { name, nodes }
    }

    /// The name the template was loaded under, if it came from a loader.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The top-level tags.
    pub fn nodes(&self) -> &[Tag] {
        &self.nodes
    }

    /// Render against `data` in a fresh context.
    pub fn render(&self, environment: &Environment, data: Map) -> Result<String, Error> {
        let mut context = Context::new(environment, data);
        self.render_in(&mut context)
    }

    /// Render within an existing context, as `include` and `extends` do.
    pub fn render_in(&self, context: &mut Context<'_>) -> Result<String, Error> {
        render_tags(&self.nodes, context)
    }
}
