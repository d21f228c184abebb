//! Template interpreter.
//!
//! This module holds everything that turns a parsed tag tree into text: the
//! scoped [`Context`], value resolution, boolean expressions, the
//! [`Environment`] with its extension registries and loaders, and the
//! built-in filters.

mod context;
mod environment;
mod expression;
mod extension;
pub(crate) mod filters;
mod loader;
mod resolvable;
mod template;

pub use context::Context;
pub use environment::Environment;
pub use expression::{Comparison, Expression};
pub use extension::{Extension, Filter, TagParser};
pub use loader::{FileSystemLoader, Loader, MemoryLoader};
pub use resolvable::{FilterExpression, RangeVariable, Resolvable, Variable};
pub use template::Template;
