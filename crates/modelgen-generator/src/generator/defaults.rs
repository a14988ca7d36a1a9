//! Column default rendering

use std::sync::LazyLock;

use modelgen_core::DialectOptions;
use regex::Regex;

use super::types::{map_data_type, quote_js, unquote};

static NUMBER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^-?\d+(\.\d+)?([eE][-+]?\d+)?$").expect("valid regex"));

const SQL_KEYWORD_DEFAULTS: &[&str] = &[
    "CURRENT_TIMESTAMP",
    "CURRENT_DATE",
    "CURRENT_TIME",
    "LOCALTIMESTAMP",
    "LOCALTIME",
    "CURRENT_USER",
    "SESSION_USER",
];

/// Render a column default as a JavaScript expression
///
/// Returns `None` for defaults that must not be emitted: `NULL` and sequence
/// defaults, which are covered by `autoIncrement`.
pub fn render_default_value(
    default_value: &str,
    declared_type: &str,
    dialect: &dyn DialectOptions,
) -> Option<String> {
    let value = strip_cast(strip_outer_parens(default_value.trim()));
    let lower = value.to_lowercase();

    if value.is_empty() || lower == "null" || lower.starts_with("nextval(") {
        return None;
    }

    let mapped = map_data_type(declared_type);
    let is_boolean = mapped.as_deref() == Some("DataTypes.BOOLEAN");
    match lower.as_str() {
        "true" | "b'1'" => return Some("true".to_string()),
        "false" | "b'0'" => return Some("false".to_string()),
        "1" | "'1'" if is_boolean => return Some("true".to_string()),
        "0" | "'0'" if is_boolean => return Some("false".to_string()),
        _ => {}
    }

    if NUMBER_REGEX.is_match(value) {
        return Some(value.to_string());
    }

    if let Some(text) = unquote(value) {
        return Some(quote_js(&text));
    }

    let is_string_column = dialect.string_bounds(declared_type).is_some()
        || mapped.is_some_and(|t| t.starts_with("DataTypes.ENUM"));
    let is_expression =
        value.contains('(') || SQL_KEYWORD_DEFAULTS.iter().any(|k| k.eq_ignore_ascii_case(value));
    if is_string_column && !is_expression {
        // MySQL reports string defaults without quotes
        return Some(quote_js(value));
    }

    Some(format!("Sequelize.Sequelize.literal({})", quote_js(value)))
}

/// `((0))` becomes `0`; `(a) + (b)` is left alone
fn strip_outer_parens(mut value: &str) -> &str {
    while value.starts_with('(') && value.ends_with(')') && outer_parens_match(value) {
        value = value[1..value.len() - 1].trim();
    }
    value
}

fn outer_parens_match(value: &str) -> bool {
    let mut depth = 0usize;
    for (i, c) in value.char_indices() {
        match c {
            '(' => depth += 1,
            ')' => {
                depth = depth.saturating_sub(1);
                if depth == 0 && i != value.len() - 1 {
                    return false;
                }
            }
            _ => {}
        }
    }
    depth == 0
}

/// Drop a trailing `::type` cast from a literal
fn strip_cast(value: &str) -> &str {
    match value.rfind("::") {
        Some(idx) => {
            let literal = value[..idx].trim();
            if unquote(literal).is_some() || NUMBER_REGEX.is_match(literal) {
                literal
            } else {
                value
            }
        }
        None => value,
    }
}
