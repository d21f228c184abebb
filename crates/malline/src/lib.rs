//! A text template engine.
//!
//! Templates mix literal text with `{{ variable|filter }}` output,
//! `{% tag %}` control structures and `{# comments #}`. They are parsed once
//! into an immutable tag tree and rendered any number of times against a
//! scoped [`Context`].
//!
//! ```
//! use malline::{Environment, context};
//!
//! let env = Environment::new();
//! let text = env
//!     .render_str(
//!         "{% for name in names %}{{ forloop.counter }}. {{ name|capitalize }}\n{% endfor %}",
//!         context! { "names" => vec!["kyle", "katie"] },
//!     )
//!     .unwrap();
//! assert_eq!(text, "1. Kyle\n2. Katie\n");
//! ```

pub mod error;
pub mod interpreter;
pub mod parser;
pub mod tags;
pub mod types;

pub use error::{Error, compute_suggestions};
pub use interpreter::{
    Context, Environment, Expression, Extension, FileSystemLoader, Filter, FilterExpression,
    Loader, MemoryLoader, RangeVariable, Resolvable, Template, Variable,
};
pub use tags::{Node, SimpleTag, Tag};
pub use types::{Map, Record, Tuple, Value};

/// Creates a [`Map`] from key-value pairs.
///
/// Values are converted via `Into<Value>`, so strings, numbers, booleans,
/// vectors and nested maps can be passed directly.
///
/// # Example
///
/// ```
/// use malline::context;
///
/// let data = context! { "count" => 3, "name" => "Kyle" };
/// assert_eq!(data.len(), 2);
/// assert_eq!(data["count"].as_int(), Some(3));
/// assert_eq!(data["name"].as_str(), Some("Kyle"));
/// ```
#[macro_export]
macro_rules! context {
    {} => {
        $crate::Map::new()
    };
    { $($key:expr => $value:expr),+ $(,)? } => {
        {
            let mut map = $crate::Map::new();
            $(
                map.insert($key.to_string(), ::std::convert::Into::<$crate::Value>::into($value));
            )+
            map
        }
    };
}
