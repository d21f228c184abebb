//! Tests for parsing and evaluating boolean expressions.

use malline::parser::{TokenParser, parse_expression};
use malline::{Context, Environment, Expression, Map, Value, context};

fn parse(env: &Environment, source: &str) -> Expression {
    let parser = TokenParser::new(vec![], env);
    let components: Vec<String> = source.split(' ').map(str::to_string).collect();
    parse_expression(&components, &parser).unwrap()
}

fn evaluate(source: &str, data: Map) -> bool {
    let env = Environment::new();
    let expression = parse(&env, source);
    let ctx = Context::new(&env, data);
    expression.evaluate(&ctx).unwrap()
}

fn parse_error(source: &str) -> String {
    let env = Environment::new();
    let parser = TokenParser::new(vec![], &env);
    let components: Vec<String> = source.split(' ').map(str::to_string).collect();
    parse_expression(&components, &parser)
        .unwrap_err()
        .to_string()
}

// =============================================================================
// Truthiness
// =============================================================================

#[test]
fn variable_truthiness() {
    assert!(evaluate("value", context! { "value" => "known" }));
    assert!(!evaluate("value", context! {}));
    assert!(evaluate("value", context! { "value" => vec!["item"] }));
    assert!(!evaluate("value", context! { "value" => Vec::<Value>::new() }));
    assert!(!evaluate("value", context! { "value" => Map::new() }));
    assert!(evaluate("value", context! { "value" => 1 }));
    assert!(!evaluate("value", context! { "value" => 0 }));
    assert!(!evaluate("value", context! { "value" => -1 }));
    assert!(evaluate("value", context! { "value" => 0.5 }));
    assert!(!evaluate("value", context! { "value" => 0.0 }));
    assert!(evaluate("value", context! { "value" => "test" }));
    assert!(!evaluate("value", context! { "value" => "" }));
    assert!(!evaluate("value", context! { "value" => false }));
}

#[test]
fn static_expressions() {
    let env = Environment::new();
    let ctx = Context::new(&env, Map::new());
    assert!(Expression::Static(true).evaluate(&ctx).unwrap());
    assert!(
        !Expression::Not(Box::new(Expression::Static(true)))
            .evaluate(&ctx)
            .unwrap()
    );
}

#[test]
fn not_inverts() {
    assert!(evaluate("not value", context! {}));
    assert!(!evaluate("not value", context! { "value" => true }));
}

// =============================================================================
// Logical operators
// =============================================================================

#[test]
fn and_requires_both_sides() {
    let cases = [(false, true, false), (true, false, false), (false, false, false), (true, true, true)];
    for (lhs, rhs, expected) in cases {
        assert_eq!(
            evaluate("lhs and rhs", context! { "lhs" => lhs, "rhs" => rhs }),
            expected,
            "{lhs} and {rhs}"
        );
    }
}

#[test]
fn or_requires_either_side() {
    let cases = [(true, false, true), (false, true, true), (true, true, true), (false, false, false)];
    for (lhs, rhs, expected) in cases {
        assert_eq!(
            evaluate("lhs or rhs", context! { "lhs" => lhs, "rhs" => rhs }),
            expected,
            "{lhs} or {rhs}"
        );
    }
}

#[test]
fn and_binds_tighter_than_or_and_not_tighter_than_and() {
    let source = "one or two and not three";
    assert!(evaluate(source, context! { "one" => true }));
    assert!(evaluate(source, context! { "one" => true, "three" => true }));
    assert!(evaluate(source, context! { "two" => true }));
    assert!(!evaluate(source, context! { "two" => true, "three" => true }));
    assert!(!evaluate(source, context! {}));
}

// =============================================================================
// Comparisons
// =============================================================================

#[test]
fn equality() {
    assert!(evaluate("lhs == rhs", context! { "lhs" => "a", "rhs" => "a" }));
    assert!(!evaluate("lhs == rhs", context! { "lhs" => "a", "rhs" => "b" }));
    assert!(evaluate("lhs == rhs", context! {}));
    assert!(evaluate("lhs == rhs", context! { "lhs" => 1, "rhs" => 1.0 }));
    assert!(!evaluate("lhs == rhs", context! { "lhs" => 1, "rhs" => 1.1 }));
    assert!(evaluate("lhs == rhs", context! { "lhs" => true, "rhs" => true }));
    assert!(evaluate("lhs == rhs", context! { "lhs" => false, "rhs" => false }));
    assert!(!evaluate("lhs == rhs", context! { "lhs" => true, "rhs" => false }));
    assert!(!evaluate("lhs == rhs", context! { "lhs" => true, "rhs" => 1 }));
}

#[test]
fn equality_with_literals() {
    assert!(evaluate("name == 'Kyle'", context! { "name" => "Kyle" }));
    assert!(evaluate("count == 3", context! { "count" => 3 }));
}

#[test]
fn inequality() {
    assert!(evaluate("lhs != rhs", context! { "lhs" => "a", "rhs" => "b" }));
    assert!(!evaluate("lhs != rhs", context! { "lhs" => "b", "rhs" => "b" }));
}

#[test]
fn ordering() {
    assert!(evaluate("lhs > rhs", context! { "lhs" => 5.0, "rhs" => 4 }));
    assert!(!evaluate("lhs > rhs", context! { "lhs" => 5.0, "rhs" => 5.0 }));
    assert!(evaluate("lhs >= rhs", context! { "lhs" => 5.0, "rhs" => 5 }));
    assert!(!evaluate("lhs >= rhs", context! { "lhs" => 5.0, "rhs" => 5.1 }));
    assert!(evaluate("lhs < rhs", context! { "lhs" => 4, "rhs" => 4.5 }));
    assert!(!evaluate("lhs < rhs", context! { "lhs" => 5.0, "rhs" => 5.0 }));
    assert!(evaluate("lhs <= rhs", context! { "lhs" => 5.0, "rhs" => 5 }));
    assert!(!evaluate("lhs <= rhs", context! { "lhs" => 5.1, "rhs" => 5.0 }));
}

#[test]
fn ordering_of_strings_is_lexicographic() {
    assert!(evaluate("lhs < rhs", context! { "lhs" => "apple", "rhs" => "banana" }));
}

#[test]
fn incomparable_values_are_never_ordered() {
    assert!(!evaluate("lhs > rhs", context! { "lhs" => "a", "rhs" => 1 }));
    assert!(!evaluate("lhs < rhs", context! { "lhs" => "a", "rhs" => 1 }));
    assert!(!evaluate("lhs > rhs", context! {}));
}

#[test]
fn comparisons_bind_tighter_than_not() {
    assert!(!evaluate("not a == b", context! {}));
    assert!(evaluate("not a == b", context! { "a" => 1 }));
}

#[test]
fn comparing_a_comparison() {
    // `a == b == c` compares the result of `a == b`, which is not a variable.
    assert!(!evaluate("a == b == c", context! {}));
    assert!(evaluate("a == b != c", context! {}));
    assert!(!evaluate("a == b > c", context! {}));
}

#[test]
fn filters_apply_to_operands() {
    assert!(evaluate("name|lowercase == 'kyle'", context! { "name" => "KYLE" }));
}

// =============================================================================
// Errors
// =============================================================================

#[test]
fn infix_operator_without_left_hand_side() {
    assert_eq!(
        parse_error("and value"),
        "'if' expression error: infix operator 'and' doesn't have a left hand side"
    );
}

#[test]
fn missing_right_hand_side() {
    assert_eq!(parse_error("value or"), "'if' expression error: end");
}

#[test]
fn dangling_tokens() {
    assert_eq!(
        parse_error("value other"),
        "'if' expression error: dangling token"
    );
}

#[test]
fn empty_expression() {
    let env = Environment::new();
    let parser = TokenParser::new(vec![], &env);
    let err = parse_expression(&[], &parser).unwrap_err();
    assert_eq!(err.to_string(), "'if' expression error: end");
}

#[test]
fn unknown_filter_in_operand() {
    let message = parse_error("value|nope");
    assert!(message.starts_with("unknown filter `nope`"), "{message}");
}
