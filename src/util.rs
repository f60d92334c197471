use serde_json::Value;

/// Join items as `"a" | "b" | "c"`.
pub fn quoted_list<S: AsRef<str>>(items: &[S]) -> String {
    items
        .iter()
        .map(|item| format!("\"{}\"", item.as_ref()))
        .collect::<Vec<_>>()
        .join(" | ")
}

/// Render user text in a message, spelling out the empty string as `""`.
pub fn or_quoted_empty(text: &str) -> &str {
    if text.is_empty() { "\"\"" } else { text }
}

/// Replace the first `{{name}}` placeholder for every entry of `values`.
///
/// Strings are inserted verbatim, other JSON values in their JSON form.
pub fn interpolate(template: &str, values: &serde_json::Map<String, Value>) -> String {
    values
        .iter()
        .fold(template.to_string(), |text, (name, value)| {
            let placeholder = format!("{{{{{}}}}}", name);
            if !text.contains(&placeholder) {
                return text;
            }
            let replacement = match value {
                Value::String(s) => s.clone(),
                other => other.to_string(),
            };
            text.replacen(&placeholder, &replacement, 1)
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn quoted_list_joins_with_pipes() {
        assert_eq!(quoted_list(&["common", "greetings"]), r#""common" | "greetings""#);
        assert_eq!(quoted_list::<&str>(&[]), "");
    }

    #[test]
    fn empty_text_is_spelled_out() {
        assert_eq!(or_quoted_empty(""), "\"\"");
        assert_eq!(or_quoted_empty("key"), "key");
    }

    #[test]
    fn interpolate_replaces_first_occurrence_only() {
        let values = json!({ "name": "Ada", "count": 3 });
        let text = interpolate(
            "Hi {{name}}, {{count}} new, bye {{name}}",
            values.as_object().expect("object"),
        );
        assert_eq!(text, "Hi Ada, 3 new, bye {{name}}");
    }

    #[test]
    fn interpolate_ignores_unknown_placeholders() {
        let values = json!({ "other": "x" });
        let text = interpolate("Hello {{name}}", values.as_object().expect("object"));
        assert_eq!(text, "Hello {{name}}");
    }
}
