//! Value-producing nodes: variables, filter chains and ranges.

use std::fmt::{self, Display, Formatter};

use crate::error::Error;
use crate::interpreter::{Context, Filter};
use crate::parser::{TokenParser, smart_split};
use crate::types::Value;

/// Anything that produces a [`Value`] from a [`Context`].
#[derive(Debug, Clone)]
pub enum Resolvable {
    /// A literal or dotted path.
    Variable(Variable),
    /// A base variable followed by a chain of filters.
    Filter(FilterExpression),
    /// An inclusive integer range, `lower...upper`.
    Range(RangeVariable),
}

impl Resolvable {
    /// Produce the value of this node in `context`.
    pub fn resolve(&self, context: &Context<'_>) -> Result<Value, Error> {
        match self {
            Resolvable::Variable(variable) => Ok(variable.resolve(context)),
            Resolvable::Filter(expression) => expression.resolve(context),
            Resolvable::Range(range) => range.resolve(context),
        }
    }
}

impl Display for Resolvable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            Resolvable::Variable(variable) => variable.fmt(f),
            Resolvable::Filter(expression) => expression.fmt(f),
            Resolvable::Range(range) => range.fmt(f),
        }
    }
}

/// A literal value or a dotted lookup path.
///
/// Quoted text (single or double quotes) is a string literal, `true` and
/// `false` are booleans, and numeric text is an integer or a float. Anything
/// else is a path: the first segment is looked up in the context and each
/// following segment in the value found so far.
///
/// ```
/// use malline::{Context, Environment, Value, Variable, context};
///
/// let env = Environment::default();
/// let ctx = Context::new(&env, context! { "items" => vec!["a", "b"] });
///
/// assert_eq!(Variable::new("items.1").resolve(&ctx), Value::from("b"));
/// assert_eq!(Variable::new("items.count").resolve(&ctx), Value::from(2));
/// assert_eq!(Variable::new("'text'").resolve(&ctx), Value::from("text"));
/// assert_eq!(Variable::new("missing.path").resolve(&ctx), Value::Nil);
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct Variable {
    source: String,
    kind: VariableKind,
}

#[derive(Debug, Clone, PartialEq)]
enum VariableKind {
    Literal(Value),
    Path(Vec<String>),
}

impl Variable {
    /// Classify `source` as a literal or a path.
    pub fn new(source: impl Into<String>) -> Self {
        let source = source.into();
        let kind = match parse_literal(&source) {
            Some(value) => VariableKind::Literal(value),
            None => VariableKind::Path(source.split('.').map(str::to_string).collect()),
        };
        Self { source, kind }
    }

    /// The text this variable was created from.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Resolve the variable. Missing paths resolve to [`Value::Nil`].
    pub fn resolve(&self, context: &Context<'_>) -> Value {
        match &self.kind {
            VariableKind::Literal(value) => value.clone(),
            VariableKind::Path(segments) => {
                let Some((first, rest)) = segments.split_first() else {
                    return Value::Nil;
                };
                let Some(mut current) = context.get(first).cloned() else {
                    return Value::Nil;
                };
                for segment in rest {
                    match current.lookup(segment) {
                        Some(next) => current = next,
                        None => return Value::Nil,
                    }
                }
                current
            }
        }
    }
}

impl Display for Variable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

fn parse_literal(source: &str) -> Option<Value> {
    if source.len() >= 2 {
        for quote in ['\'', '"'] {
            if source.starts_with(quote) && source.ends_with(quote) {
                return Some(Value::String(source[1..source.len() - 1].to_string()));
            }
        }
    }

    match source {
        "true" => return Some(Value::Bool(true)),
        "false" => return Some(Value::Bool(false)),
        _ => {}
    }

    if let Ok(int) = source.parse::<i64>() {
        return Some(Value::Int(int));
    }

    // `f64::from_str` also accepts words such as `inf` and `NaN`, which are
    // valid variable names here.
    let numeric = source
        .chars()
        .all(|c| c.is_ascii_digit() || matches!(c, '.' | '-' | '+' | 'e' | 'E'));
    if numeric && source.chars().any(|c| c.is_ascii_digit()) {
        return source.parse::<f64>().ok().map(Value::Float);
    }

    None
}

/// A variable piped through a chain of filters: `name|lowercase|join:", "`.
///
/// Filters are looked up when the expression is compiled, so an unknown
/// filter is a parse error. Arguments are resolved on every render.
#[derive(Debug, Clone)]
pub struct FilterExpression {
    source: String,
    variable: Variable,
    filters: Vec<AppliedFilter>,
}

#[derive(Debug, Clone)]
struct AppliedFilter {
    filter: Filter,
    arguments: Vec<Variable>,
}

impl FilterExpression {
    /// Compile `token` using the filters registered with `parser`'s
    /// environment.
    pub fn new(token: &str, parser: &TokenParser<'_>) -> Result<Self, Error> {
        let bits: Vec<String> = smart_split(token, '|')
            .into_iter()
            .map(|bit| bit.trim().to_string())
            .collect();
        let Some((base, chain)) = bits.split_first() else {
            return Err(Error::syntax(
                "Variable tags must include at least 1 argument",
            ));
        };

        let filters = chain
            .iter()
            .map(|bit| {
                let (name, arguments) = parse_filter_components(bit);
                let filter = parser.find_filter(&name)?;
                Ok(AppliedFilter { filter, arguments })
            })
            .collect::<Result<Vec<_>, Error>>()?;

        Ok(Self {
            source: token.to_string(),
            variable: Variable::new(base.clone()),
            filters,
        })
    }

    /// Resolve the base variable and apply each filter in order.
    pub fn resolve(&self, context: &Context<'_>) -> Result<Value, Error> {
        let mut value = self.variable.resolve(context);
        for applied in &self.filters {
            let arguments = applied
                .arguments
                .iter()
                .map(|argument| argument.resolve(context))
                .collect();
            value = applied.filter.invoke(value, arguments)?;
        }
        Ok(value)
    }
}

impl Display for FilterExpression {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

/// Split `name:arg1,arg2` into the filter name and its argument variables.
fn parse_filter_components(bit: &str) -> (String, Vec<Variable>) {
    let mut parts = smart_split(bit, ':').into_iter();
    let name = parts.next().unwrap_or_default().trim().to_string();
    let rest: Vec<String> = parts.collect();
    if rest.is_empty() {
        return (name, Vec::new());
    }

    let arguments = smart_split(&rest.join(":"), ',')
        .iter()
        .map(|argument| Variable::new(argument.trim()))
        .collect();
    (name, arguments)
}

/// An inclusive integer range between two resolvable bounds.
///
/// Resolves to a sequence counting from the lower bound to the upper bound,
/// descending when the lower bound is larger.
#[derive(Debug, Clone)]
pub struct RangeVariable {
    from: FilterExpression,
    to: FilterExpression,
}

impl RangeVariable {
    /// Parse `lower...upper`.
    ///
    /// Returns `Ok(None)` when `token` is not a range at all, and an error
    /// when a bound is missing or fails to compile.
    pub fn new(token: &str, parser: &TokenParser<'_>) -> Result<Option<Self>, Error> {
        let parts: Vec<&str> = token.split("...").collect();
        let [from, to] = parts.as_slice() else {
            return Ok(None);
        };

        Ok(Some(Self {
            from: parser.compile_filter(from)?,
            to: parser.compile_filter(to)?,
        }))
    }

    /// Resolve both bounds, which must be integers.
    ///
    /// Fails with [`Error::RangeTooLarge`] when the range would hold more
    /// items than the environment's `max_range`.
    pub fn resolve(&self, context: &Context<'_>) -> Result<Value, Error> {
        let from = self.from.resolve(context)?;
        let Some(lower) = from.as_int() else {
            return Err(Error::syntax(format!(
                "'from' value is not an Integer ({})",
                describe(&from)
            )));
        };
        let to = self.to.resolve(context)?;
        let Some(upper) = to.as_int() else {
            return Err(Error::syntax(format!(
                "'to' value is not an Integer ({})",
                describe(&to)
            )));
        };

        let limit = context.environment().max_range();
        let length = lower.abs_diff(upper).checked_add(1);
        if length.is_none_or(|length| length > u64::try_from(limit).unwrap_or(u64::MAX)) {
            return Err(Error::RangeTooLarge {
                range: format!("{lower}...{upper}"),
                limit,
            });
        }

        let values: Vec<Value> = if lower > upper {
            (upper..=lower).rev().map(Value::Int).collect()
        } else {
            (lower..=upper).map(Value::Int).collect()
        };
        Ok(Value::Sequence(values))
    }
}

impl Display for RangeVariable {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}...{}", self.from, self.to)
    }
}

fn describe(value: &Value) -> String {
    if value.is_nil() {
        "nil".to_string()
    } else {
        value.to_string()
    }
}
