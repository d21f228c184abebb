use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt::{self, Display, Formatter};
use std::ops::{Range, RangeInclusive};
use std::sync::Arc;

use serde::ser::{Serialize, SerializeMap, SerializeSeq, Serializer};

use super::record::{Record, Tuple, record_fields};

/// A keyed mapping of names to values, as found in a rendering context.
pub type Map = BTreeMap<String, Value>;

/// A runtime value that templates resolve, compare, filter and print.
///
/// The `Value` enum is a closed set of variants. Containers hold further
/// values, and user-defined structures participate through the [`Record`]
/// capability instead of runtime reflection.
///
/// # Example
///
/// ```
/// use malline::Value;
///
/// let count: Value = 42.into();
/// let name: Value = "Tauno".into();
/// let list: Value = vec![1, 2, 3].into();
///
/// assert_eq!(count.as_int(), Some(42));
/// assert_eq!(name.to_string(), "Tauno");
/// assert_eq!(list.to_string(), "[1, 2, 3]");
/// ```
#[derive(Debug, Clone, Default)]
pub enum Value {
    /// The absent value. Unresolved paths produce it; it prints as "".
    #[default]
    Nil,

    /// A boolean.
    Bool(bool),

    /// An integer.
    Int(i64),

    /// A floating-point number.
    Float(f64),

    /// A string.
    String(String),

    /// An ordered sequence of values.
    Sequence(Vec<Value>),

    /// A keyed mapping of values.
    Mapping(Map),

    /// A structured value exposing named fields.
    Record(Arc<dyn Record>),
}

impl Value {
    /// Wrap a [`Record`] implementation.
    pub fn record(record: impl Record + 'static) -> Self {
        Value::Record(Arc::new(record))
    }

    /// Convert any serializable value through its serde data model.
    ///
    /// Structs and maps become [`Value::Mapping`], sequences become
    /// [`Value::Sequence`].
    pub fn from_serialize<T: Serialize + ?Sized>(value: &T) -> Result<Self, serde_json::Error> {
        serde_json::to_value(value).map(Value::from)
    }

    /// Whether this is [`Value::Nil`].
    pub fn is_nil(&self) -> bool {
        matches!(self, Value::Nil)
    }

    /// Get this value as a boolean, if it is one.
    pub fn as_bool(&self) -> Option<bool> {
        match self {
            Value::Bool(b) => Some(*b),
            _ => None,
        }
    }

    /// Get this value as an integer, if it is one.
    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    /// Get this value as a float. Integers are widened.
    pub fn as_float(&self) -> Option<f64> {
        match self {
            Value::Float(f) => Some(*f),
            Value::Int(n) => Some(*n as f64),
            _ => None,
        }
    }

    /// Get this value as a string slice, if it is one.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get this value as a sequence, if it is one.
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Value::Sequence(items) => Some(items),
            _ => None,
        }
    }

    /// Get this value as a mapping, if it is one.
    pub fn as_mapping(&self) -> Option<&Map> {
        match self {
            Value::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Get this value as a record, if it is one.
    pub fn as_record(&self) -> Option<&dyn Record> {
        match self {
            Value::Record(record) => Some(record.as_ref()),
            _ => None,
        }
    }

    /// Truthiness as used by `if` conditions and `where` clauses.
    ///
    /// Numbers are true when strictly positive; strings and containers when
    /// non-empty; records when they expose at least one field.
    pub fn is_truthy(&self) -> bool {
        match self {
            Value::Nil => false,
            Value::Bool(b) => *b,
            Value::Int(n) => *n > 0,
            Value::Float(f) => *f > 0.0,
            Value::String(s) => !s.is_empty(),
            Value::Sequence(items) => !items.is_empty(),
            Value::Mapping(map) => !map.is_empty(),
            Value::Record(record) => !record_fields(record.as_ref()).is_empty(),
        }
    }

    /// Order two values.
    ///
    /// Integers and floats are compared numerically after coercion, strings
    /// lexicographically. Any other pairing has no order.
    pub fn compare(&self, other: &Value) -> Option<Ordering> {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => Some(a.cmp(b)),
            (Value::String(a), Value::String(b)) => Some(a.cmp(b)),
            _ => match (self.number(), other.number()) {
                (Some(a), Some(b)) => a.partial_cmp(&b),
                _ => None,
            },
        }
    }

    /// Number of items for containers, characters for strings.
    pub fn count(&self) -> Option<usize> {
        match self {
            Value::String(s) => Some(s.chars().count()),
            Value::Sequence(items) => Some(items.len()),
            Value::Mapping(map) => Some(map.len()),
            _ => None,
        }
    }

    /// Resolve one dotted-path segment against this value.
    ///
    /// Tries, in order: a mapping key; a sequence index (out of range is
    /// absent); the `first`, `last` and `count` pseudo-properties; then
    /// record fields, positionally for tuples and by name including
    /// inherited fields. Returns `None` when nothing matches.
    pub fn lookup(&self, segment: &str) -> Option<Value> {
        match self {
            Value::Mapping(map) => {
                if let Some(value) = map.get(segment) {
                    return Some(value.clone());
                }
            }
            Value::Sequence(items) => {
                if let Ok(index) = segment.parse::<i64>() {
                    return usize::try_from(index)
                        .ok()
                        .and_then(|index| items.get(index))
                        .cloned();
                }
            }
            _ => {}
        }

        match segment {
            "first" => {
                if let Some(value) = self.first() {
                    return Some(value);
                }
            }
            "last" => {
                if let Some(value) = self.last() {
                    return Some(value);
                }
            }
            "count" => {
                if let Some(count) = self.count() {
                    return i64::try_from(count).ok().map(Value::Int);
                }
            }
            _ => {}
        }

        let Value::Record(record) = self else {
            return None;
        };
        if record.is_tuple() {
            if let Ok(index) = segment.parse::<usize>() {
                return record.fields().into_iter().nth(index).map(|(_, v)| v);
            }
        }
        record.field(segment)
    }

    /// The components a loop destructures this value into.
    pub(crate) fn components(&self) -> Vec<Value> {
        match self {
            Value::Sequence(items) => items.clone(),
            Value::Record(record) => record_fields(record.as_ref())
                .into_iter()
                .map(|(_, value)| value)
                .collect(),
            other => vec![other.clone()],
        }
    }

    fn first(&self) -> Option<Value> {
        match self {
            Value::Sequence(items) => items.first().cloned(),
            Value::String(s) => s.chars().next().map(|c| Value::String(c.to_string())),
            _ => None,
        }
    }

    fn last(&self) -> Option<Value> {
        match self {
            Value::Sequence(items) => items.last().cloned(),
            Value::String(s) => s.chars().next_back().map(|c| Value::String(c.to_string())),
            _ => None,
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            Value::Int(n) => Some(*n as f64),
            Value::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Write this value as it appears nested inside a container.
    fn fmt_nested(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => write!(f, "nil"),
            Value::String(s) => write!(f, "{s:?}"),
            other => write!(f, "{other}"),
        }
    }
}

impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Nil, Value::Nil) => true,
            (Value::Bool(a), Value::Bool(b)) => a == b,
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::String(a), Value::String(b)) => a == b,
            (Value::Sequence(a), Value::Sequence(b)) => a == b,
            (Value::Mapping(a), Value::Mapping(b)) => a == b,
            (Value::Record(a), Value::Record(b)) => {
                a.type_name() == b.type_name()
                    && record_fields(a.as_ref()) == record_fields(b.as_ref())
            }
            _ => match (self.number(), other.number()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl Display for Value {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Value::Nil => Ok(()),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(n) => write!(f, "{n:?}"),
            Value::String(s) => write!(f, "{s}"),
            Value::Sequence(items) => {
                write!(f, "[")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    item.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Value::Mapping(map) => {
                if map.is_empty() {
                    return write!(f, "[:]");
                }
                write!(f, "[")?;
                for (i, (key, value)) in map.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{key:?}: ")?;
                    value.fmt_nested(f)?;
                }
                write!(f, "]")
            }
            Value::Record(record) => {
                let name = if record.is_tuple() { "" } else { record.type_name() };
                write!(f, "{name}(")?;
                for (i, (label, value)) in record_fields(record.as_ref()).iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    if !(record.is_tuple() && label.parse::<usize>().is_ok()) {
                        write!(f, "{label}: ")?;
                    }
                    value.fmt_nested(f)?;
                }
                write!(f, ")")
            }
        }
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Nil => serializer.serialize_none(),
            Value::Bool(b) => serializer.serialize_bool(*b),
            Value::Int(n) => serializer.serialize_i64(*n),
            Value::Float(f) => serializer.serialize_f64(*f),
            Value::String(s) => serializer.serialize_str(s),
            Value::Sequence(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Mapping(map) => {
                let mut out = serializer.serialize_map(Some(map.len()))?;
                for (key, value) in map {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
            Value::Record(record) => {
                let fields = record_fields(record.as_ref());
                let mut out = serializer.serialize_map(Some(fields.len()))?;
                for (key, value) in &fields {
                    out.serialize_entry(key, value)?;
                }
                out.end()
            }
        }
    }
}

// From implementations for common types

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Value::Bool(b)
    }
}

impl From<i32> for Value {
    fn from(n: i32) -> Self {
        Value::Int(n as i64)
    }
}

impl From<i64> for Value {
    fn from(n: i64) -> Self {
        Value::Int(n)
    }
}

impl From<u32> for Value {
    fn from(n: u32) -> Self {
        Value::Int(i64::from(n))
    }
}

/// Values past `i64::MAX` become floats rather than wrapping.
impl From<u64> for Value {
    fn from(n: u64) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Int)
    }
}

impl From<usize> for Value {
    fn from(n: usize) -> Self {
        i64::try_from(n).map_or(Value::Float(n as f64), Value::Int)
    }
}

impl From<f32> for Value {
    fn from(n: f32) -> Self {
        Value::Float(f64::from(n))
    }
}

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Value::Float(n)
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Value::String(s)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Value::String(s.to_string())
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Value::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Value::Nil, Into::into)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Value::Mapping(map)
    }
}

impl From<RangeInclusive<i64>> for Value {
    fn from(range: RangeInclusive<i64>) -> Self {
        Value::Sequence(range.map(Value::Int).collect())
    }
}

impl From<Range<i64>> for Value {
    fn from(range: Range<i64>) -> Self {
        Value::Sequence(range.map(Value::Int).collect())
    }
}

impl From<Tuple> for Value {
    fn from(tuple: Tuple) -> Self {
        Value::record(tuple)
    }
}

impl<A: Into<Value>, B: Into<Value>> From<(A, B)> for Value {
    fn from((a, b): (A, B)) -> Self {
        Value::record(Tuple::new([a.into(), b.into()]))
    }
}

impl<A: Into<Value>, B: Into<Value>, C: Into<Value>> From<(A, B, C)> for Value {
    fn from((a, b, c): (A, B, C)) -> Self {
        Value::record(Tuple::new([a.into(), b.into(), c.into()]))
    }
}

impl From<serde_json::Value> for Value {
    fn from(json: serde_json::Value) -> Self {
        match json {
            serde_json::Value::Null => Value::Nil,
            serde_json::Value::Bool(b) => Value::Bool(b),
            serde_json::Value::Number(n) => match n.as_i64() {
                Some(i) => Value::Int(i),
                None => n.as_f64().map_or(Value::Nil, Value::Float),
            },
            serde_json::Value::String(s) => Value::String(s),
            serde_json::Value::Array(items) => {
                Value::Sequence(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => {
                Value::Mapping(map.into_iter().map(|(k, v)| (k, Value::from(v))).collect())
            }
        }
    }
}
