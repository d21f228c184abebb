//! Lexical tokens and the quote-aware component split.

use std::mem;

/// Characters that glue to a neighbouring word when split apart by spaces,
/// so `name | join : ", "` yields a single `name|join:", "` component.
const GLUE_CHARS: &str = ",|:";

/// A segment of template source, delimiters stripped.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal text outside any delimiter.
    Text(String),
    /// A `{{ ... }}` output expression.
    Variable(String),
    /// A `{# ... #}` comment.
    Comment(String),
    /// A `{% ... %}` tag.
    Block(String),
}

impl Token {
    /// The inner text of the token.
    pub fn contents(&self) -> &str {
        match self {
            Token::Text(value)
            | Token::Variable(value)
            | Token::Comment(value)
            | Token::Block(value) => value,
        }
    }

    /// Split the contents on spaces, keeping quoted phrases together.
    ///
    /// ```
    /// use malline::parser::Token;
    ///
    /// let token = Token::Block("for item in items|default:'a b'".into());
    /// assert_eq!(
    ///     token.components(),
    ///     vec!["for", "item", "in", "items|default:'a b'"]
    /// );
    /// ```
    pub fn components(&self) -> Vec<String> {
        smart_split(self.contents(), ' ')
    }

    /// The first component, which names the tag of a block token.
    pub fn name(&self) -> Option<String> {
        self.components().into_iter().next()
    }
}

/// Split `input` on `separator`, leaving quoted phrases intact.
///
/// A quote character opens a phrase that runs to the next occurrence of the
/// same quote; separators inside it are kept. Words consisting only of `,`,
/// `|` or `:` characters, and words following a component that ends in one,
/// are appended to the previous component.
pub fn smart_split(input: &str, separator: char) -> Vec<String> {
    let mut components: Vec<String> = Vec::new();
    let mut word = String::new();
    let mut closing = separator;
    let mut single_quotes = 0usize;
    let mut double_quotes = 0usize;

    for c in input.chars() {
        match c {
            '\'' => single_quotes += 1,
            '"' => double_quotes += 1,
            _ => {}
        }

        if c == closing {
            if closing != separator {
                word.push(closing);
            } else if (single_quotes % 2 == 0 || double_quotes % 2 == 0) && !word.is_empty() {
                append_word(&mut components, mem::take(&mut word));
            }
            closing = separator;
        } else {
            if closing == separator && matches!(c, '\'' | '"') {
                closing = c;
            }
            word.push(c);
        }
    }

    if !word.is_empty() {
        append_word(&mut components, word);
    }

    components
}

fn append_word(components: &mut Vec<String>, word: String) {
    match components.last_mut() {
        Some(last)
            if last.ends_with(|c: char| GLUE_CHARS.contains(c)) || GLUE_CHARS.contains(&*word) =>
        {
            last.push_str(&word);
        }
        _ => components.push(word),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn splits_on_spaces() {
        assert_eq!(smart_split("hello world", ' '), vec!["hello", "world"]);
    }

    #[test]
    fn keeps_quoted_phrases() {
        assert_eq!(
            smart_split("hello 'tauno lehtinen'", ' '),
            vec!["hello", "'tauno lehtinen'"]
        );
        assert_eq!(
            smart_split("hello \"tauno lehtinen\"", ' '),
            vec!["hello", "\"tauno lehtinen\""]
        );
    }

    #[test]
    fn glues_filter_punctuation() {
        assert_eq!(
            smart_split("value | join : \", \"", ' '),
            vec!["value|join:\", \""]
        );
        assert_eq!(
            smart_split("for key, value in dict", ' '),
            vec!["for", "key,value", "in", "dict"]
        );
    }

    #[test]
    fn splits_arguments_on_commas() {
        assert_eq!(
            smart_split("'value\"1\"',\"value'2'\",'(key, value)'", ','),
            vec!["'value\"1\"'", "\"value'2'\"", "'(key, value)'"]
        );
    }

    #[test]
    fn ignores_repeated_separators() {
        assert_eq!(smart_split("  if   value  ", ' '), vec!["if", "value"]);
        assert!(smart_split("", ' ').is_empty());
    }
}
