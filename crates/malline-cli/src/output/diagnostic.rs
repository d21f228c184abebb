//! Miette diagnostic wrapper for template errors.
//!
//! Note: This module has an exception for `unused_assignments` because miette
//! derive macros read struct fields in generated code that rustc cannot track.
#![allow(unused_assignments)]

use std::path::Path;

use malline::Error;
use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

/// A miette-compatible diagnostic for a template that failed to load, parse
/// or render.
///
/// Template errors carry no positions, so the label points at the first
/// occurrence of the offending tag or filter name when one can be found.
#[derive(Debug, Error, Diagnostic)]
#[error("{message}")]
#[diagnostic(code(malline::template))]
pub struct TemplateDiagnostic {
    #[source_code]
    src: NamedSource<String>,

    #[label("here")]
    span: Option<SourceSpan>,

    message: String,

    #[help]
    help: Option<String>,
}

impl TemplateDiagnostic {
    /// Create a diagnostic for `err` raised by the template at `path`.
    pub fn from_error(path: &Path, content: &str, err: &Error) -> Self {
        let (message, span, help) = match err {
            Error::UnknownFilter { name, suggestions } => (
                format!("unknown filter `{name}`"),
                locate_filter(content, name),
                (!suggestions.is_empty())
                    .then(|| format!("did you mean: {}?", suggestions.join(", "))),
            ),
            Error::UnknownTag { name } => (
                err.to_string(),
                locate_tag(content, name),
                Some("run `malline tags` to list the available tags".to_string()),
            ),
            _ => (err.to_string(), None, None),
        };

        TemplateDiagnostic {
            src: NamedSource::new(path.display().to_string(), content.to_string()),
            span,
            message,
            help,
        }
    }
}

/// Find `|name` inside the source.
fn locate_filter(content: &str, name: &str) -> Option<SourceSpan> {
    locate_after(content, "|", name)
}

/// Find the name following a `{%` opening.
fn locate_tag(content: &str, name: &str) -> Option<SourceSpan> {
    locate_after(content, "{%", name)
}

/// Span of the first `name` that follows `marker`, skipping whitespace.
fn locate_after(content: &str, marker: &str, name: &str) -> Option<SourceSpan> {
    content.match_indices(marker).find_map(|(offset, _)| {
        let rest = &content[offset + marker.len()..];
        let trimmed = rest.trim_start();
        let start = content.len() - trimmed.len();
        trimmed
            .starts_with(name)
            .then(|| (start, name.len()).into())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn locates_filter_names() {
        let span = locate_filter("{{ name | uppercse }}", "uppercse").unwrap();
        assert_eq!(span.offset(), 10);
        assert_eq!(span.len(), 8);
    }

    #[test]
    fn locates_tag_names() {
        let span = locate_tag("a {%  frobnicate %}", "frobnicate").unwrap();
        assert_eq!(span.offset(), 6);
    }

    #[test]
    fn missing_names_have_no_span() {
        assert!(locate_filter("{{ name }}", "upper").is_none());
        assert!(locate_tag("{{ name }}", "for").is_none());
    }
}
