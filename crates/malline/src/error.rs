//! Error types for lexing, parsing, loading and rendering templates.

use std::io;
use std::path::PathBuf;

use strsim::levenshtein;
use thiserror::Error;

/// An error raised anywhere in the load -> parse -> render pipeline.
///
/// Every error aborts the render that produced it. Unresolved variables are
/// not errors: they resolve to [`Value::Nil`](crate::Value::Nil).
#[derive(Debug, Error)]
pub enum Error {
    /// Malformed tag syntax, a missing closing tag, a bad argument count or
    /// a value of the wrong type where a specific type is mandatory.
    #[error("{message}")]
    Syntax { message: String },

    /// A block tag whose name no extension registers.
    #[error("unknown tag `{name}`")]
    UnknownTag { name: String },

    /// A filter whose name no extension registers.
    #[error("unknown filter `{name}`{}", format_suggestions(suggestions))]
    UnknownFilter {
        name: String,
        suggestions: Vec<String>,
    },

    /// No configured loader could resolve any of the requested names.
    #[error(
        "template named `{}` does not exist{}",
        names.join(", "),
        format_loader(loader.as_deref())
    )]
    NotFound {
        names: Vec<String>,
        loader: Option<String>,
    },

    /// A resolved template path escapes the loader's base path.
    #[error("path `{}` is located outside of base path `{}`", path.display(), base.display())]
    SuspiciousPath { base: PathBuf, path: PathBuf },

    /// I/O error when reading a template file that exists.
    #[error("failed to read '{}': {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Scope or template nesting went deeper than the environment allows.
    #[error("maximum nesting depth of {limit} exceeded")]
    MaxDepthExceeded { limit: usize },

    /// A range would produce more items than the environment allows.
    #[error("range `{range}` exceeds the maximum of {limit} items")]
    RangeTooLarge { range: String, limit: usize },
}

impl Error {
    /// Build a [`Error::Syntax`] from any message.
    pub fn syntax(message: impl Into<String>) -> Self {
        Error::Syntax {
            message: message.into(),
        }
    }

    /// Whether this is one of the syntax-error variants.
    pub fn is_syntax(&self) -> bool {
        matches!(
            self,
            Error::Syntax { .. } | Error::UnknownTag { .. } | Error::UnknownFilter { .. }
        )
    }

    /// Whether this error reports a missing template.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// Whether this error reports a path escaping its base directory.
    pub fn is_security(&self) -> bool {
        matches!(self, Error::SuspiciousPath { .. })
    }
}

fn format_suggestions(suggestions: &[String]) -> String {
    if suggestions.is_empty() {
        String::new()
    } else {
        format!(", did you mean: {}?", suggestions.join(", "))
    }
}

fn format_loader(loader: Option<&str>) -> String {
    match loader {
        Some(loader) => format!(" in loader {loader}"),
        None => ". No loaders found".to_string(),
    }
}

/// Compute typo suggestions for `name` among `available` names.
///
/// Uses Levenshtein distance, allowing one edit for names of up to three
/// characters and two edits otherwise. Exact matches are skipped. At most
/// three suggestions are returned, closest first.
pub fn compute_suggestions<S: AsRef<str>>(name: &str, available: &[S]) -> Vec<String> {
    let max_distance = if name.len() <= 3 { 1 } else { 2 };
    let mut suggestions: Vec<(usize, String)> = available
        .iter()
        .filter_map(|candidate| {
            let candidate = candidate.as_ref();
            let dist = levenshtein(name, candidate);
            if dist <= max_distance && dist > 0 {
                Some((dist, candidate.to_string()))
            } else {
                None
            }
        })
        .collect();

    suggestions.sort();
    suggestions.dedup();
    suggestions.into_iter().take(3).map(|(_, s)| s).collect()
}
