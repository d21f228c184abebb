//! Template inheritance: `extends` and `block`.
//!
//! A child template names its parent with `extends` and overrides the
//! parent's `block`s. Rendering the child renders the parent, substituting
//! each block for the most-derived override collected along the chain.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::trace;

use crate::error::Error;
use crate::interpreter::{Context, Variable};
use crate::parser::{Token, TokenParser, until};
use crate::tags::{Tag, render_tags};
use crate::types::{Map, Value};

/// Block overrides pending for the current render.
///
/// Built up as `extends` tags are rendered, most-derived template first.
/// An override is consumed the first time a block of its name renders.
#[derive(Debug, Clone, Default)]
pub struct BlockContext {
    blocks: BTreeMap<String, Arc<BlockTag>>,
}

impl BlockContext {
    /// Add overrides for names not already present, so blocks from more
    /// derived templates win.
    fn merge(&mut self, blocks: &BTreeMap<String, Arc<BlockTag>>) {
        for (name, block) in blocks {
            self.blocks
                .entry(name.clone())
                .or_insert_with(|| Arc::clone(block));
        }
    }

    /// Remove and return the override for `name`.
    fn pop(&mut self, name: &str) -> Option<Arc<BlockTag>> {
        self.blocks.remove(name)
    }
}

/// Path through which an override reaches the block it replaces.
const SUPER_PATH: &str = "block.super";

/// `{% block name %} ... {% endblock %}`: a named, overridable region.
#[derive(Debug)]
pub struct BlockTag {
    name: String,
    tags: Vec<Tag>,
    /// Whether the body mentions `block.super`.
    uses_super: bool,
}

impl BlockTag {
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Render the pending override for this block, or the block's own body.
    ///
    /// While an override that mentions `block.super` renders, `block.super`
    /// holds this block's own body rendered to text. Other overrides never
    /// render the replaced body.
    pub fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        let Some(block) = context
            .block_context_mut()
            .as_mut()
            .and_then(|blocks| blocks.pop(&self.name))
        else {
            return render_tags(&self.tags, context);
        };
        trace!(block = %self.name, uses_super = block.uses_super, "rendering block override");

        if !block.uses_super {
            return context.push(None, |context| block.render(context));
        }

        let saved = context.block_context().cloned();
        let parent = render_tags(&self.tags, context);
        *context.block_context_mut() = saved;

        let scope = Map::from([(
            "block".to_string(),
            Value::Mapping(Map::from([("super".to_string(), Value::String(parent?))])),
        )]);
        context.push(Some(scope), |context| block.render(context))
    }
}

pub(crate) fn parse_block(parser: &mut TokenParser<'_>, token: &Token) -> Result<Tag, Error> {
    let components = token.components();
    let [_, name] = components.as_slice() else {
        return Err(Error::syntax("'block' tag takes one argument, the block name"));
    };

    let uses_super = mentions_super(parser);
    let tags = parser.parse_until(until(&["endblock"]))?;
    if parser.next_token().is_none() {
        return Err(Error::syntax("`endblock` was not found."));
    }
    Ok(Tag::Block(Arc::new(BlockTag {
        name: name.clone(),
        tags,
        uses_super,
    })))
}

/// Whether any tag or variable up to the matching `endblock` mentions
/// `block.super`. Nested blocks count toward the enclosing one.
fn mentions_super(parser: &TokenParser<'_>) -> bool {
    let mut depth = 0usize;
    for token in parser.remaining_tokens() {
        if let Token::Block(_) = token {
            match token.name().as_deref() {
                Some("block") => depth += 1,
                Some("endblock") if depth == 0 => return false,
                Some("endblock") => depth -= 1,
                _ => {}
            }
        }
        if matches!(token, Token::Variable(_) | Token::Block(_))
            && token.contents().contains(SUPER_PATH)
        {
            return true;
        }
    }
    false
}

/// `{% extends "parent" %}`: render the parent with this template's blocks
/// as overrides.
#[derive(Debug)]
pub struct ExtendsTag {
    template_name: Variable,
    blocks: BTreeMap<String, Arc<BlockTag>>,
}

impl ExtendsTag {
    /// The names of the blocks this template overrides.
    pub fn block_names(&self) -> impl Iterator<Item = &str> {
        self.blocks.keys().map(String::as_str)
    }

    pub fn render(&self, context: &mut Context<'_>) -> Result<String, Error> {
        let Value::String(name) = self.template_name.resolve(context) else {
            return Err(Error::syntax(format!(
                "'{}' could not be resolved as a string",
                self.template_name
            )));
        };
        let template = context.environment().load_template(&name)?;

        let created = context.block_context().is_none();
        context
            .block_context_mut()
            .get_or_insert_with(BlockContext::default)
            .merge(&self.blocks);

        let result = context.push(None, |context| template.render_in(context));
        if created {
            *context.block_context_mut() = None;
        }
        result
    }
}

pub(crate) fn parse_extends(parser: &mut TokenParser<'_>, token: &Token) -> Result<Tag, Error> {
    let components = token.components();
    let [_, name] = components.as_slice() else {
        return Err(Error::syntax(
            "'extends' takes one argument, the stencil file to be extended",
        ));
    };

    let tags = parser.parse()?;
    if tags.iter().any(|tag| matches!(tag, Tag::Extends(_))) {
        return Err(Error::syntax(
            "'extends' cannot appear more than once in the same stencil",
        ));
    }

    let blocks = tags
        .into_iter()
        .filter_map(|tag| match tag {
            Tag::Block(block) => Some((block.name.clone(), block)),
            _ => None,
        })
        .collect();

    Ok(Tag::Extends(ExtendsTag {
        template_name: Variable::new(name.clone()),
        blocks,
    }))
}
