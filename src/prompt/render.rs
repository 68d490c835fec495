//! Placeholder substitution for prompt templates
//!
//! Placeholders are `$name` or `${name}`, where `name` is an identifier
//! (`[_A-Za-z][_A-Za-z0-9]*`). `$$` renders a single literal `$`, and any
//! other `$` is copied through unchanged. Placeholders without a provided
//! value stay in the output exactly as written.

use lazy_static::lazy_static;
use regex::{Captures, Regex};

use super::types::{RenderError, RenderResult, Rendered};

lazy_static! {
    static ref PLACEHOLDER: Regex = Regex::new(
        r"\$(?:(?P<escaped>\$)|(?P<named>[_A-Za-z][_A-Za-z0-9]*)|\{(?P<braced>[_A-Za-z][_A-Za-z0-9]*)\}|(?P<invalid>))"
    )
    .unwrap();
}

/// Render `content` against a JSON object of variables
pub fn render(content: &str, variables: &serde_json::Value) -> RenderResult<Rendered> {
    let vars = match variables {
        serde_json::Value::Object(map) => map,
        _ => return Err(RenderError::InvalidVariables),
    };

    let template_variables = placeholder_names(content);
    let missing = template_variables
        .iter()
        .filter(|name| !vars.contains_key(name.as_str()))
        .cloned()
        .collect();

    let rendered_text = PLACEHOLDER
        .replace_all(content, |caps: &Captures| -> String {
            if caps.name("escaped").is_some() {
                return "$".to_string();
            }

            match caps.name("named").or_else(|| caps.name("braced")) {
                Some(name) => match vars.get(name.as_str()) {
                    Some(value) => value_to_string(value),
                    None => caps[0].to_string(),
                },
                // Lone dollar sign
                None => caps[0].to_string(),
            }
        })
        .into_owned();

    let mut provided_variables: Vec<String> = vars.keys().cloned().collect();
    provided_variables.sort();

    Ok(Rendered {
        rendered_text,
        missing,
        template_variables,
        provided_variables,
    })
}

/// Distinct placeholder names in order of first appearance
pub fn placeholder_names(content: &str) -> Vec<String> {
    let mut names: Vec<String> = Vec::new();

    for caps in PLACEHOLDER.captures_iter(content) {
        if let Some(name) = caps.name("named").or_else(|| caps.name("braced")) {
            if !names.iter().any(|n| n == name.as_str()) {
                names.push(name.as_str().to_string());
            }
        }
    }

    names
}

fn value_to_string(value: &serde_json::Value) -> String {
    match value {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Number(n) => n.to_string(),
        serde_json::Value::Bool(b) => b.to_string(),
        // Null, arrays and objects use their JSON representation
        _ => value.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_variable_left_as_written() {
        let result = render("Hello $name, you are ${age}", &json!({"name": "Ada"})).unwrap();

        assert_eq!(result.rendered_text, "Hello Ada, you are ${age}");
        assert_eq!(result.missing, vec!["age"]);
        assert_eq!(result.template_variables, vec!["name", "age"]);
        assert_eq!(result.provided_variables, vec!["name"]);
    }

    #[test]
    fn test_escaped_dollar() {
        let result = render("Cost: $$5 for $item", &json!({"item": "widget"})).unwrap();

        assert_eq!(result.rendered_text, "Cost: $5 for widget");
        assert!(result.missing.is_empty());
    }

    #[test]
    fn test_lone_dollar_passes_through() {
        let result = render("Price: $ 10, ${1abc} and $9", &json!({})).unwrap();

        assert_eq!(result.rendered_text, "Price: $ 10, ${1abc} and $9");
        assert!(result.template_variables.is_empty());
    }

    #[test]
    fn test_trailing_dollar() {
        let result = render("ends with $", &json!({})).unwrap();
        assert_eq!(result.rendered_text, "ends with $");
    }

    #[test]
    fn test_braced_adjacent_text() {
        let result = render("${noun}s and $nouns", &json!({"noun": "cat"})).unwrap();

        assert_eq!(result.rendered_text, "cats and $nouns");
        assert_eq!(result.missing, vec!["nouns"]);
    }

    #[test]
    fn test_repeated_placeholder_reported_once() {
        let result = render("$a $b $a ${a}", &json!({"b": 2})).unwrap();

        assert_eq!(result.rendered_text, "$a 2 $a ${a}");
        assert_eq!(result.template_variables, vec!["a", "b"]);
        assert_eq!(result.missing, vec!["a"]);
    }

    #[test]
    fn test_non_string_values() {
        let result = render(
            "$count $flag [$nothing] $list",
            &json!({"count": 42, "flag": true, "nothing": null, "list": [1, 2]}),
        )
        .unwrap();

        assert_eq!(result.rendered_text, "42 true [null] [1,2]");
    }

    #[test]
    fn test_extra_variables_are_ignored() {
        let result = render("Hi $name", &json!({"name": "Bo", "zeta": 1, "alpha": 2})).unwrap();

        assert_eq!(result.rendered_text, "Hi Bo");
        assert_eq!(result.provided_variables, vec!["alpha", "name", "zeta"]);
    }

    #[test]
    fn test_non_ascii_content() {
        let result = render("Bonjour $nom, ça va? 🎉", &json!({"nom": "Zoë"})).unwrap();
        assert_eq!(result.rendered_text, "Bonjour Zoë, ça va? 🎉");
    }

    #[test]
    fn test_render_is_deterministic() {
        let vars = json!({"x": "1"});
        let first = render("$x $y $$ ${x}", &vars).unwrap();
        let second = render("$x $y $$ ${x}", &vars).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_variables_must_be_object() {
        assert!(matches!(
            render("$x", &json!(["x"])),
            Err(RenderError::InvalidVariables)
        ));
    }
}
