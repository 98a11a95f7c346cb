//! Python literal rendering for generated module sources

use serde_json::Value;

/// Render a JSON value as a Python literal
///
/// # Examples
/// ```
/// use collection_generator_generator::python::literal;
/// use serde_json::json;
///
/// assert_eq!(literal(&json!({"required": true, "default": null})),
///            "{'required': True, 'default': None}");
/// assert_eq!(literal(&json!(["it's"])), r#"['it\'s']"#);
/// ```
pub fn literal(value: &Value) -> String {
    match value {
        Value::Null => "None".to_string(),
        Value::Bool(true) => "True".to_string(),
        Value::Bool(false) => "False".to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => string(s),
        Value::Array(items) => {
            let items: Vec<String> = items.iter().map(literal).collect();
            format!("[{}]", items.join(", "))
        }
        Value::Object(map) => {
            let entries: Vec<String> = map
                .iter()
                .map(|(k, v)| format!("{}: {}", string(k), literal(v)))
                .collect();
            format!("{{{}}}", entries.join(", "))
        }
    }
}

/// Single-quoted Python string literal
pub fn string(s: &str) -> String {
    let mut out = String::with_capacity(s.len() + 2);
    out.push('\'');
    for ch in s.chars() {
        match ch {
            '\\' => out.push_str("\\\\"),
            '\'' => out.push_str("\\'"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\t' => out.push_str("\\t"),
            c => out.push(c),
        }
    }
    out.push('\'');
    out
}
