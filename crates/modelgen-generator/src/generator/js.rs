//! Minimal JavaScript value tree used to lay out generated modules

use super::naming::is_js_identifier;
use super::types::quote_js;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum JsValue {
    /// Emitted verbatim
    Raw(String),
    /// Multi-line object literal
    Object(Vec<(String, JsValue)>),
    /// Single-line object literal
    Inline(Vec<(String, JsValue)>),
    /// Multi-line array literal
    Array(Vec<JsValue>),
    /// `{ key }` shorthand; only valid as an object entry
    Shorthand,
}

impl JsValue {
    pub(crate) fn raw(value: impl Into<String>) -> Self {
        JsValue::Raw(value.into())
    }

    pub(crate) fn string(value: &str) -> Self {
        JsValue::Raw(quote_js(value))
    }

    pub(crate) fn bool(value: bool) -> Self {
        JsValue::Raw(value.to_string())
    }

    /// Render with `unit` as one indentation level, starting at `level`
    pub(crate) fn render(&self, unit: &str, level: usize) -> String {
        match self {
            JsValue::Raw(text) => text.clone(),
            JsValue::Shorthand => String::new(),
            JsValue::Inline(entries) => {
                if entries.is_empty() {
                    return "{}".to_string();
                }
                let body: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| render_entry(key, value, unit, level))
                    .collect();
                format!("{{ {} }}", body.join(", "))
            }
            JsValue::Object(entries) => {
                if entries.is_empty() {
                    return "{}".to_string();
                }
                let inner = unit.repeat(level + 1);
                let body: Vec<String> = entries
                    .iter()
                    .map(|(key, value)| format!("{}{}", inner, render_entry(key, value, unit, level + 1)))
                    .collect();
                format!("{{\n{}\n{}}}", body.join(",\n"), unit.repeat(level))
            }
            JsValue::Array(items) => {
                if items.is_empty() {
                    return "[]".to_string();
                }
                let inner = unit.repeat(level + 1);
                let body: Vec<String> = items
                    .iter()
                    .map(|item| format!("{}{}", inner, item.render(unit, level + 1)))
                    .collect();
                format!("[\n{}\n{}]", body.join(",\n"), unit.repeat(level))
            }
        }
    }
}

fn render_entry(key: &str, value: &JsValue, unit: &str, level: usize) -> String {
    match value {
        JsValue::Shorthand => key.to_string(),
        _ => format!("{}: {}", property_key(key), value.render(unit, level)),
    }
}

/// Quote an object key unless it is a plain identifier
pub(crate) fn property_key(key: &str) -> String {
    if is_js_identifier(key) {
        key.to_string()
    } else {
        quote_js(key)
    }
}

/// `object.name`, or `object["name"]` when `name` is not an identifier
pub(crate) fn member(object: &str, name: &str) -> String {
    if is_js_identifier(name) {
        format!("{}.{}", object, name)
    } else {
        format!("{}[{}]", object, quote_js(name))
    }
}
