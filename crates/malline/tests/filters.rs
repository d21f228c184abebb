//! Tests for built-in filters, custom filters and the `filter` tag.

use malline::{Environment, Error, Extension, Map, Value, context};

fn render(source: &str, data: Map) -> String {
    Environment::new().render_str(source, data).unwrap()
}

fn render_with(extension: Extension, source: &str, data: Map) -> Result<String, Error> {
    Environment::builder()
        .extensions(vec![extension])
        .build()
        .render_str(source, data)
}

// =============================================================================
// Custom filters
// =============================================================================

#[test]
fn registers_custom_filter() {
    let mut extension = Extension::new();
    extension.register_filter("repeat", |value| {
        Ok(match value {
            Value::String(text) => Value::String(format!("{text} {text}")),
            _ => Value::Nil,
        })
    });

    let result = render_with(extension, "{{ name|repeat }}", context! { "name" => "Tauno" });
    assert_eq!(result.unwrap(), "Tauno Tauno");
}

#[test]
fn passes_a_single_quoted_argument() {
    let mut extension = Extension::new();
    extension.register_filter_with_args("repeat", |value, arguments| {
        Ok(Value::String(format!("{value} {value} with args {}", arguments[0])))
    });

    let result = render_with(
        extension,
        "{{ name|repeat:'value1, \"value2\"' }}",
        context! { "name" => "Tauno" },
    );
    assert_eq!(result.unwrap(), "Tauno Tauno with args value1, \"value2\"");
}

#[test]
fn passes_multiple_quoted_arguments() {
    let mut extension = Extension::new();
    extension.register_filter_with_args("repeat", |value, arguments| {
        Ok(Value::String(format!(
            "{value} {value} with args 0: {}, 1: {}, 2: {}",
            arguments[0], arguments[1], arguments[2]
        )))
    });

    let result = render_with(
        extension,
        "{{ name|repeat:'value\"1\"',\"value'2'\",'(key, value)' }}",
        context! { "name" => "Tauno" },
    );
    assert_eq!(
        result.unwrap(),
        "Tauno Tauno with args 0: value\"1\", 1: value'2', 2: (key, value)"
    );
}

#[test]
fn resolves_variable_arguments() {
    let mut extension = Extension::new();
    extension.register_filter_with_args("wrap", |value, arguments| {
        Ok(Value::String(format!("{}{value}{}", arguments[0], arguments[1])))
    });

    let result = render_with(
        extension,
        "{{ name|wrap:open,'>' }}",
        context! { "name" => "Tauno", "open" => "<" },
    );
    assert_eq!(result.unwrap(), "<Tauno>");
}

#[test]
fn propagates_filter_errors() {
    let mut extension = Extension::new();
    extension.register_filter("repeat", |_| Err(Error::syntax("No Repeat")));

    let err = render_with(extension, "{{ name|repeat }}", context! { "name" => "Tauno" })
        .unwrap_err();
    assert_eq!(err.to_string(), "No Repeat");
}

#[test]
fn custom_filter_overrides_builtin() {
    let mut extension = Extension::new();
    extension.register_filter("join", |_| Ok(Value::from("joined")));

    let result = render_with(extension, "{{ name|join }}", context! { "name" => "Tauno" });
    assert_eq!(result.unwrap(), "joined");
}

#[test]
fn simple_filter_rejects_arguments() {
    let err = Environment::new()
        .render_str("{{ name|uppercase:5 }}", context! { "name" => "tauno" })
        .unwrap_err();
    assert_eq!(err.to_string(), "cannot invoke filter with an argument");
}

#[test]
fn tolerates_whitespace_in_expression() {
    assert_eq!(
        render("{{ value | join : \", \" }}", context! { "value" => vec!["One", "Two"] }),
        "One, Two"
    );
}

// =============================================================================
// Unknown filters
// =============================================================================

#[test]
fn unknown_filter_suggests_close_names() {
    let err = Environment::new().parse("{{ name|uppercse }}").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown filter `uppercse`, did you mean: uppercase?");
}

#[test]
fn unknown_filter_without_close_names() {
    let err = Environment::new().parse("{{ name|frobnicate }}").unwrap_err();
    insta::assert_snapshot!(err.to_string(), @"unknown filter `frobnicate`");
}

#[test]
fn suggestions_include_user_filters() {
    let mut extension = Extension::new();
    extension.register_filter("shout", Ok);
    let err = Environment::builder()
        .extensions(vec![extension])
        .build()
        .parse("{{ name|shoot }}")
        .unwrap_err();
    assert!(matches!(
        err,
        Error::UnknownFilter { ref suggestions, .. } if suggestions == &["shout"]
    ));
}

// =============================================================================
// Text filters
// =============================================================================

#[test]
fn capitalize() {
    assert_eq!(render("{{ name|capitalize }}", context! { "name" => "tauno" }), "Tauno");
    assert_eq!(render("{{ name|capitalize }}", context! { "name" => "tAUNO" }), "Tauno");
    assert_eq!(render("{{ name|capitalize }}", context! { "name" => "" }), "");
    assert_eq!(render("{{ name|capitalize }}", context! { "name" => "élan" }), "Élan");
}

#[test]
fn uppercase_and_lowercase() {
    assert_eq!(render("{{ name|uppercase }}", context! { "name" => "tauno" }), "TAUNO");
    assert_eq!(render("{{ name|lowercase }}", context! { "name" => "Tauno" }), "tauno");
    assert_eq!(render("{{ missing|uppercase }}", context! {}), "");
}

// =============================================================================
// default
// =============================================================================

#[test]
fn default_keeps_present_values() {
    assert_eq!(
        render("Hello {{ name|default:\"World\" }}", context! { "name" => "Tauno" }),
        "Hello Tauno"
    );
}

#[test]
fn default_replaces_missing_values() {
    assert_eq!(render("Hello {{ name|default:\"World\" }}", context! {}), "Hello World");
}

#[test]
fn default_takes_first_present_argument() {
    assert_eq!(
        render("Hello {{ name|default:a,b,c,\"World\" }}", context! {}),
        "Hello World"
    );
    assert_eq!(
        render("Hello {{ name|default:a,b,\"World\" }}", context! { "b" => "Airi" }),
        "Hello Airi"
    );
}

#[test]
fn default_keeps_falsy_but_present_values() {
    assert_eq!(render("{{ n|default:5 }}", context! { "n" => 0 }), "0");
    assert_eq!(render("{{ s|default:'x' }}", context! { "s" => "" }), "");
}

// =============================================================================
// join and split
// =============================================================================

#[test]
fn join_strings() {
    assert_eq!(
        render("{{ value|join:\", \" }}", context! { "value" => vec!["One", "Two"] }),
        "One, Two"
    );
}

#[test]
fn join_mixed_values() {
    let value = vec![
        Value::from("One"),
        Value::from(2),
        Value::from(true),
        Value::from(10.5),
        Value::from("Five"),
    ];
    assert_eq!(
        render("{{ value|join:\", \" }}", context! { "value" => value }),
        "One, 2, true, 10.5, Five"
    );
}

#[test]
fn join_with_non_string_separator() {
    assert_eq!(
        render(
            "{{ value|join:separator }}",
            context! { "value" => vec!["One", "Two"], "separator" => true }
        ),
        "OnetrueTwo"
    );
}

#[test]
fn join_without_arguments() {
    assert_eq!(
        render("{{ value|join }}", context! { "value" => vec!["One", "Two"] }),
        "OneTwo"
    );
}

#[test]
fn join_passes_through_non_sequences() {
    assert_eq!(render("{{ value|join:',' }}", context! { "value" => "One" }), "One");
}

#[test]
fn join_rejects_extra_arguments() {
    let err = Environment::new()
        .render_str("{{ value|join:',',';' }}", context! { "value" => vec!["a"] })
        .unwrap_err();
    assert_eq!(err.to_string(), "'join' filter takes a single argument");
}

#[test]
fn split_on_spaces_by_default() {
    assert_eq!(
        render("{{ value|split }}", context! { "value" => "One Two" }),
        "[\"One\", \"Two\"]"
    );
}

#[test]
fn split_on_separator() {
    assert_eq!(
        render("{{ value|split:\",\"|join:\";\" }}", context! { "value" => "1,2,3" }),
        "1;2;3"
    );
    assert_eq!(
        render("{{ value|split:''|join:';' }}", context! { "value" => "a b" }),
        "a b"
    );
}

// =============================================================================
// indent
// =============================================================================

#[test]
fn indent_defaults_to_four_spaces() {
    assert_eq!(
        render("{{ value|indent }}", context! { "value" => "One\nTwo" }),
        "One\n    Two"
    );
}

#[test]
fn indent_with_width_and_unit() {
    assert_eq!(
        render("{{ value|indent:2 }}", context! { "value" => "One\nTwo" }),
        "One\n  Two"
    );
    assert_eq!(
        render("{{ value|indent:2,\"\t\" }}", context! { "value" => "One\nTwo" }),
        "One\n\t\tTwo"
    );
}

#[test]
fn indent_first_line() {
    assert_eq!(
        render("{{ value|indent:2,\" \",true }}", context! { "value" => "One\nTwo" }),
        "  One\n  Two"
    );
}

#[test]
fn indent_skips_empty_lines() {
    assert_eq!(
        render("{{ value|indent:2 }}", context! { "value" => "One\n\nTwo" }),
        "One\n\n  Two"
    );
}

#[test]
fn indent_rejects_wrong_argument_types() {
    let env = Environment::new();
    let data = || context! { "value" => "One" };

    let err = env.render_str("{{ value|indent:'2' }}", data()).unwrap_err();
    assert_eq!(err.to_string(), "'indent' filter width argument must be an Integer (2)");

    let err = env.render_str("{{ value|indent:2,3 }}", data()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "'indent' filter indentation argument must be a String (3)"
    );

    let err = env.render_str("{{ value|indent:2,' ',1 }}", data()).unwrap_err();
    assert_eq!(
        err.to_string(),
        "'indent' filter indentFirst argument must be a Bool (1)"
    );

    let err = env
        .render_str("{{ value|indent:2,' ',true,4 }}", data())
        .unwrap_err();
    assert_eq!(err.to_string(), "'indent' filter can take at most 3 arguments");
}

// =============================================================================
// The filter tag
// =============================================================================

#[test]
fn filter_tag_applies_filter() {
    assert_eq!(render("{% filter uppercase %}Test{% endfilter %}", context! {}), "TEST");
}

#[test]
fn filter_tag_applies_chain() {
    assert_eq!(
        render("{% filter lowercase|capitalize %}TEST{% endfilter %}", context! {}),
        "Test"
    );
}

#[test]
fn filter_tag_requires_expression() {
    let err = Environment::new()
        .parse("{% filter %}Test{% endfilter %}")
        .unwrap_err();
    assert_eq!(err.to_string(), "'filter' tag takes one argument, the filter expression");
}

#[test]
fn filter_tag_requires_end() {
    let err = Environment::new().parse("{% filter uppercase %}Test").unwrap_err();
    assert_eq!(err.to_string(), "`endfilter` was not found.");
}

#[test]
fn filter_tag_with_arguments() {
    assert_eq!(
        render(
            "{% filter split:\",\"|join:\";\"  %}{{ items|join:\",\" }}{% endfilter %}",
            context! { "items" => vec![1, 2] }
        ),
        "1;2"
    );
}

#[test]
fn filter_tag_with_quote_argument() {
    let mut extension = Extension::new();
    extension.register_filter_with_args("replace", |value, arguments| {
        let [from, to] = arguments.as_slice() else {
            return Err(Error::syntax("'replace' filter takes two arguments"));
        };
        Ok(Value::String(
            value.to_string().replace(&from.to_string(), &to.to_string()),
        ))
    });

    let result = render_with(
        extension,
        "{% filter replace:'\"',\"\" %}{{ items|join:\",\" }}{% endfilter %}",
        context! { "items" => vec!["\"1\"", "\"2\""] },
    );
    assert_eq!(result.unwrap(), "1,2");
}
