//! Structured values that expose named fields to templates.

use std::fmt::Debug;

use super::Value;

/// A user-defined structure that templates can navigate with dotted paths
/// and iterate with `for`.
///
/// Implementors list their own fields in declaration order and may chain to a
/// parent record whose fields are inherited: lookups search the record's own
/// fields first, then each parent in turn.
///
/// # Example
///
/// ```
/// use malline::{Record, Value};
///
/// #[derive(Debug)]
/// struct Person {
///     name: String,
/// }
///
/// impl Record for Person {
///     fn type_name(&self) -> &str {
///         "Person"
///     }
///
///     fn fields(&self) -> Vec<(String, Value)> {
///         vec![("name".to_string(), self.name.as_str().into())]
///     }
/// }
///
/// let value = Value::record(Person { name: "Tauno".into() });
/// assert_eq!(value.lookup("name"), Some(Value::from("Tauno")));
/// ```
pub trait Record: Debug + Send + Sync {
    /// Name used when the record is printed.
    fn type_name(&self) -> &str;

    /// The record's own fields, in declaration order.
    fn fields(&self) -> Vec<(String, Value)>;

    /// The record this one inherits fields from, if any.
    fn parent(&self) -> Option<&dyn Record> {
        None
    }

    /// Whether fields are positional, allowing `value.0` style access.
    fn is_tuple(&self) -> bool {
        false
    }

    /// Look up a field by name, searching inherited fields after own fields.
    fn field(&self, name: &str) -> Option<Value> {
        self.fields()
            .into_iter()
            .find(|(label, _)| label == name)
            .map(|(_, value)| value)
            .or_else(|| self.parent().and_then(|parent| parent.field(name)))
    }
}

/// All fields of a record, own fields first, followed by each ancestor's.
pub fn record_fields(record: &dyn Record) -> Vec<(String, Value)> {
    let mut fields = record.fields();
    let mut current = record.parent();
    while let Some(parent) = current {
        fields.extend(parent.fields());
        current = parent.parent();
    }
    fields
}

/// A positional value group with optional labels.
///
/// Pairs produced by iterating a mapping are `Tuple`s, and Rust tuples of two
/// or three values convert into one.
#[derive(Debug, Clone, PartialEq)]
pub struct Tuple {
    elements: Vec<(Option<String>, Value)>,
}

impl Tuple {
    /// Create an unlabelled tuple.
    pub fn new(values: impl IntoIterator<Item = Value>) -> Self {
        Self {
            elements: values.into_iter().map(|value| (None, value)).collect(),
        }
    }

    /// Create a tuple whose elements can also be addressed by label.
    pub fn labelled<L: Into<String>>(items: impl IntoIterator<Item = (L, Value)>) -> Self {
        Self {
            elements: items
                .into_iter()
                .map(|(label, value)| (Some(label.into()), value))
                .collect(),
        }
    }

    /// Number of elements.
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Whether the tuple has no elements.
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    /// Element at a position.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.elements.get(index).map(|(_, value)| value)
    }
}

impl Record for Tuple {
    fn type_name(&self) -> &str {
        "Tuple"
    }

    fn fields(&self) -> Vec<(String, Value)> {
        self.elements
            .iter()
            .enumerate()
            .map(|(index, (label, value))| {
                let label = label.clone().unwrap_or_else(|| index.to_string());
                (label, value.clone())
            })
            .collect()
    }

    fn is_tuple(&self) -> bool {
        true
    }
}
