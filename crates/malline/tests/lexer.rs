//! Tests for tokenizing template source.

use malline::parser::{Token, tokenize};

#[test]
fn tokenizes_text() {
    assert_eq!(
        tokenize("Hello World"),
        vec![Token::Text("Hello World".into())]
    );
}

#[test]
fn tokenizes_comment() {
    assert_eq!(
        tokenize("{# Comment #}"),
        vec![Token::Comment("Comment".into())]
    );
}

#[test]
fn tokenizes_variable() {
    assert_eq!(
        tokenize("{{ Variable }}"),
        vec![Token::Variable("Variable".into())]
    );
}

#[test]
fn tokenizes_block() {
    assert_eq!(
        tokenize("{%   if value   %}"),
        vec![Token::Block("if value".into())]
    );
}

#[test]
fn unclosed_tag_becomes_empty_text() {
    assert_eq!(tokenize("{{ thing"), vec![Token::Text(String::new())]);
}

#[test]
fn unclosed_tag_after_text_keeps_the_text() {
    assert_eq!(
        tokenize("Hello {% if"),
        vec![Token::Text("Hello ".into()), Token::Text(String::new())]
    );
}

#[test]
fn tokenizes_mixed_content() {
    assert_eq!(
        tokenize("My name is {{ name }}."),
        vec![
            Token::Text("My name is ".into()),
            Token::Variable("name".into()),
            Token::Text(".".into()),
        ]
    );
}

#[test]
fn tokenizes_adjacent_variables() {
    assert_eq!(
        tokenize("{{ thing }}{{ name }}"),
        vec![
            Token::Variable("thing".into()),
            Token::Variable("name".into()),
        ]
    );
}

#[test]
fn lone_braces_are_text() {
    assert_eq!(
        tokenize("fn main() { x } %}"),
        vec![Token::Text("fn main() { x } %}".into())]
    );
}

#[test]
fn empty_source_has_no_tokens() {
    assert!(tokenize("").is_empty());
}

#[test]
fn tokenizes_multiline_template() {
    let tokens = tokenize("{% for item in items %}\n  {{ item }}\n{% endfor %}");
    assert_eq!(
        tokens,
        vec![
            Token::Block("for item in items".into()),
            Token::Text("\n  ".into()),
            Token::Variable("item".into()),
            Token::Text("\n".into()),
            Token::Block("endfor".into()),
        ]
    );
}

#[test]
fn token_components_split_on_whitespace() {
    let token = Token::Block("hello world".into());
    assert_eq!(token.components(), vec!["hello", "world"]);
    assert_eq!(token.name().as_deref(), Some("hello"));
}

#[test]
fn token_components_keep_quoted_strings() {
    let token = Token::Block("hello 'kyle fuller'".into());
    assert_eq!(token.components(), vec!["hello", "'kyle fuller'"]);
}

#[test]
fn token_components_glue_filter_arguments() {
    let token = Token::Variable("name | join : \", \" | uppercase".into());
    assert_eq!(token.components(), vec!["name|join:\", \"|uppercase"]);
}
