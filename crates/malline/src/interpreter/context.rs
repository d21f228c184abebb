//! Scoped rendering context.

use crate::error::Error;
use crate::interpreter::Environment;
use crate::tags::BlockContext;
use crate::types::{Map, Value};

/// The per-render stack of scopes.
///
/// Lookups search from the innermost scope outward. Writes always land in
/// the innermost scope. Setting a key to [`Value::Nil`] leaves a tombstone
/// that hides any outer binding of the same key until the scope is popped.
///
/// A context also carries the [`Environment`] that rendering uses to load
/// templates, and the block overrides collected while resolving `extends`.
///
/// ```
/// use malline::{Context, Environment, Value, context};
///
/// let env = Environment::default();
/// let mut ctx = Context::new(&env, context! { "name" => "Kyle" });
///
/// let inner = ctx
///     .push(None, |ctx| {
///         ctx.set("name", Value::Nil);
///         Ok(ctx.get("name").cloned())
///     })
///     .unwrap();
///
/// assert_eq!(inner, None);
/// assert_eq!(ctx.get("name"), Some(&Value::from("Kyle")));
/// ```
#[derive(Debug)]
pub struct Context<'env> {
    environment: &'env Environment,
    /// Innermost scope last.
    scopes: Vec<Map>,
    block_context: Option<BlockContext>,
}

impl<'env> Context<'env> {
    /// Create a context whose outermost scope holds `data`.
    pub fn new(environment: &'env Environment, data: Map) -> Self {
        Self {
            environment,
            scopes: vec![data],
            block_context: None,
        }
    }

    /// The environment this render runs in.
    pub fn environment(&self) -> &'env Environment {
        self.environment
    }

    /// Look up a key, searching scopes from innermost to outermost.
    ///
    /// A tombstone in an inner scope hides outer bindings.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.scopes
            .iter()
            .rev()
            .find_map(|scope| scope.get(key))
            .filter(|value| !value.is_nil())
    }

    /// Bind a key in the innermost scope.
    ///
    /// Binding [`Value::Nil`] removes the key for the lifetime of the
    /// innermost scope without touching outer scopes.
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<Value>) {
        if let Some(scope) = self.scopes.last_mut() {
            scope.insert(key.into(), value.into());
        }
    }

    /// Run `body` inside a fresh scope, seeded with `scope` if given.
    ///
    /// The scope is popped on every exit path, including errors returned by
    /// `body`. Fails with [`Error::MaxDepthExceeded`] when the scope stack
    /// would grow past the environment's limit.
    pub fn push<T>(
        &mut self,
        scope: Option<Map>,
        body: impl FnOnce(&mut Self) -> Result<T, Error>,
    ) -> Result<T, Error> {
        let limit = self.environment.max_depth();
        if self.scopes.len() > limit {
            return Err(Error::MaxDepthExceeded { limit });
        }

        self.scopes.push(scope.unwrap_or_default());
        let result = body(self);
        self.scopes.pop();
        result
    }

    /// Merge all scopes into one mapping, inner bindings winning.
    ///
    /// Tombstoned keys are absent from the result.
    pub fn flatten(&self) -> Map {
        let mut flattened = Map::new();
        for scope in &self.scopes {
            for (key, value) in scope {
                if value.is_nil() {
                    flattened.remove(key);
                } else {
                    flattened.insert(key.clone(), value.clone());
                }
            }
        }
        flattened
    }

    /// Number of scopes currently on the stack.
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    pub(crate) fn block_context(&self) -> Option<&BlockContext> {
        self.block_context.as_ref()
    }

    pub(crate) fn block_context_mut(&mut self) -> &mut Option<BlockContext> {
        &mut self.block_context
    }
}
