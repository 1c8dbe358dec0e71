//! Placeholder substitution for prompt templates.
//!
//! Profile configuration may override the built-in user template with a
//! string containing `{placeholder}` markers. This module parses such
//! strings into literal and placeholder pieces, renders them against a
//! variable map, and reports the placeholders a template references so the
//! config layer can validate overrides at load time.
//!
//! Syntax:
//! - `{name}` substitutes the variable `name`
//! - `{{` and `}}` render as literal braces
//!
//! Rendering is fail-safe: a placeholder with no matching variable is an
//! error rather than a silent empty substitution.

use std::collections::HashMap;
use thiserror::Error;

/// Error type for template parsing and rendering.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TemplateError {
    /// A placeholder was referenced but no variable with that name exists.
    #[error("unknown placeholder '{{{name}}}' in template")]
    UnknownPlaceholder {
        /// The placeholder name.
        name: String,
    },

    /// A `{` was opened but never closed.
    #[error("unterminated '{{' in template")]
    UnterminatedPlaceholder,

    /// An empty `{}` placeholder was found.
    #[error("empty placeholder '{{}}' in template")]
    EmptyPlaceholder,
}

/// One parsed piece of a template.
#[derive(Debug, Clone, PartialEq, Eq)]
enum Piece {
    Literal(String),
    Placeholder(String),
}

/// Parse a template into literal and placeholder pieces.
fn parse(template: &str) -> Result<Vec<Piece>, TemplateError> {
    let mut pieces = Vec::new();
    let mut literal = String::new();
    let mut chars = template.chars().peekable();

    while let Some(ch) = chars.next() {
        match ch {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                literal.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                literal.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some(c) => name.push(c),
                        None => return Err(TemplateError::UnterminatedPlaceholder),
                    }
                }
                let name = name.trim();
                if name.is_empty() {
                    return Err(TemplateError::EmptyPlaceholder);
                }
                if !literal.is_empty() {
                    pieces.push(Piece::Literal(std::mem::take(&mut literal)));
                }
                pieces.push(Piece::Placeholder(name.to_string()));
            }
            _ => literal.push(ch),
        }
    }

    if !literal.is_empty() {
        pieces.push(Piece::Literal(literal));
    }

    Ok(pieces)
}

/// Render a template by substituting variables.
///
/// # Arguments
///
/// * `template` - The template string containing `{placeholder}` markers
/// * `vars` - Variable names mapped to their substitution values
///
/// # Returns
///
/// * `Ok(String)` - The rendered string
/// * `Err(TemplateError)` - If the syntax is invalid or a placeholder is unknown
pub fn render(template: &str, vars: &HashMap<String, String>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    for piece in parse(template)? {
        match piece {
            Piece::Literal(text) => out.push_str(&text),
            Piece::Placeholder(name) => match vars.get(&name) {
                Some(value) => out.push_str(value),
                None => return Err(TemplateError::UnknownPlaceholder { name }),
            },
        }
    }
    Ok(out)
}

/// List the distinct placeholder names a template references, in order of
/// first appearance.
///
/// Used by config validation to reject template overrides that reference
/// placeholders the prompt builder never provides.
pub fn placeholders(template: &str) -> Result<Vec<String>, TemplateError> {
    let mut names = Vec::new();
    for piece in parse(template)? {
        if let Piece::Placeholder(name) = piece
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    Ok(names)
}

/// Helper to build a variable map from key-value pairs.
pub fn vars<I, K, V>(pairs: I) -> HashMap<String, String>
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<String>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn substitutes_variables() {
        let vars = vars([("topic", "rust"), ("tone", "casual")]);
        let out = render("A {tone} post about {topic}.", &vars).unwrap();
        assert_eq!(out, "A casual post about rust.");
    }

    #[test]
    fn plain_text_passes_through() {
        let out = render("no markers here", &HashMap::new()).unwrap();
        assert_eq!(out, "no markers here");
    }

    #[test]
    fn empty_template_renders_empty() {
        assert_eq!(render("", &HashMap::new()).unwrap(), "");
    }

    #[test]
    fn escaped_braces_render_literally() {
        let out = render("use {{name}} syntax", &HashMap::new()).unwrap();
        assert_eq!(out, "use {name} syntax");

        let out = render("a }} b", &HashMap::new()).unwrap();
        assert_eq!(out, "a } b");
    }

    #[test]
    fn whitespace_in_placeholder_is_trimmed() {
        let vars = vars([("topic", "ai")]);
        assert_eq!(render("{ topic }", &vars).unwrap(), "ai");
    }

    #[test]
    fn repeated_placeholder_substitutes_each_time() {
        let vars = vars([("x", "X")]);
        assert_eq!(render("{x}-{x}-{x}", &vars).unwrap(), "X-X-X");
    }

    #[test]
    fn unknown_placeholder_is_an_error() {
        let err = render("hello {name}", &HashMap::new()).unwrap_err();
        assert_eq!(
            err,
            TemplateError::UnknownPlaceholder {
                name: "name".to_string()
            }
        );
    }

    #[test]
    fn unterminated_placeholder_is_an_error() {
        let err = render("hello {name", &HashMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::UnterminatedPlaceholder);
    }

    #[test]
    fn empty_placeholder_is_an_error() {
        let err = render("hello {}", &HashMap::new()).unwrap_err();
        assert_eq!(err, TemplateError::EmptyPlaceholder);
    }

    #[test]
    fn braces_in_values_are_preserved() {
        let vars = vars([("code", "if (x) { y(); }")]);
        let out = render("Code: {code}", &vars).unwrap();
        assert_eq!(out, "Code: if (x) { y(); }");
    }

    #[test]
    fn multiline_values_are_preserved() {
        let vars = vars([("body", "line1\nline2")]);
        let out = render("Post:\n{body}", &vars).unwrap();
        assert_eq!(out, "Post:\nline1\nline2");
    }

    #[test]
    fn unicode_in_template_and_values() {
        let vars = vars([("emoji", "🥄")]);
        let out = render("{emoji} title", &vars).unwrap();
        assert_eq!(out, "🥄 title");
    }

    #[test]
    fn placeholders_lists_names_in_order_without_duplicates() {
        let names = placeholders("{topic} then {tone} then {topic}").unwrap();
        assert_eq!(names, vec!["topic", "tone"]);
    }

    #[test]
    fn placeholders_ignores_escapes_and_literals() {
        let names = placeholders("{{literal}} and {real}").unwrap();
        assert_eq!(names, vec!["real"]);
    }

    #[test]
    fn placeholders_reports_syntax_errors() {
        assert_eq!(
            placeholders("broken {").unwrap_err(),
            TemplateError::UnterminatedPlaceholder
        );
    }

    #[test]
    fn error_display_is_readable() {
        let err = TemplateError::UnknownPlaceholder {
            name: "foo".to_string(),
        };
        assert_eq!(err.to_string(), "unknown placeholder '{foo}' in template");
    }
}
