//! Name transforms for models, properties and aliases

use std::sync::LazyLock;

use convert_case::{Case, Casing};
use regex::Regex;

use crate::config::CaseOption;

static IDENTIFIER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-zA-Z_$][a-zA-Z0-9_$]*$").expect("valid regex"));

const UNCOUNTABLE: &[&str] = &[
    "data", "equipment", "information", "media", "metadata", "money", "news", "rice", "series",
    "sheep", "species", "fish",
];

const IRREGULAR: &[(&str, &str)] = &[
    ("people", "person"),
    ("children", "child"),
    ("men", "man"),
    ("women", "woman"),
    ("mice", "mouse"),
    ("geese", "goose"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("indices", "index"),
    ("matrices", "matrix"),
    ("vertices", "vertex"),
    ("statuses", "status"),
    ("buses", "bus"),
    ("aliases", "alias"),
    ("analyses", "analysis"),
    ("movies", "movie"),
    ("cookies", "cookie"),
    ("caches", "cache"),
    ("lives", "life"),
    ("knives", "knife"),
    ("wives", "wife"),
    ("leaves", "leaf"),
    ("shelves", "shelf"),
    ("halves", "half"),
];

/// Suffix rewrites, first match wins
const SUFFIX_RULES: &[(&str, &str)] = &[
    ("ies", "y"),
    ("sses", "ss"),
    ("shes", "sh"),
    ("ches", "ch"),
    ("xes", "x"),
    ("zzes", "zz"),
    ("ss", "ss"),
    ("us", "us"),
    ("is", "is"),
    ("s", ""),
];

pub fn apply_case(name: &str, case: CaseOption) -> String {
    match case {
        CaseOption::Camel => name.to_case(Case::Camel),
        CaseOption::Pascal => name.to_case(Case::Pascal),
        CaseOption::Lower => name.to_lowercase(),
        CaseOption::Upper => name.to_uppercase(),
        CaseOption::Original => name.to_string(),
    }
}

/// Singularize the last word of a name, keeping its case
///
/// `order_items` becomes `order_item` and `CATEGORIES` becomes `CATEGORY`.
pub fn singularize(name: &str) -> String {
    let split = name
        .rfind(|c: char| c == '_' || c == '-' || c == ' ' || c == '.')
        .map(|i| i + 1)
        .unwrap_or(0);
    let (prefix, word) = name.split_at(split);
    let lower = word.to_lowercase();

    if lower.is_empty() || UNCOUNTABLE.contains(&lower.as_str()) {
        return name.to_string();
    }

    let upper = word.chars().all(|c| !c.is_lowercase());

    if let Some((_, singular)) = IRREGULAR.iter().find(|(plural, _)| *plural == lower) {
        let singular = if upper {
            singular.to_uppercase()
        } else if word.starts_with(|c: char| c.is_uppercase()) {
            singular.to_case(Case::Pascal)
        } else {
            singular.to_string()
        };
        return format!("{}{}", prefix, singular);
    }

    for (suffix, replacement) in SUFFIX_RULES {
        if word.len() <= suffix.len() {
            continue;
        }
        let split = word.len() - suffix.len();
        let matches = word
            .get(split..)
            .is_some_and(|tail| tail.eq_ignore_ascii_case(suffix));
        if matches {
            let stem = &word[..split];
            let replacement = if upper {
                replacement.to_uppercase()
            } else {
                replacement.to_string()
            };
            return format!("{}{}{}", prefix, stem, replacement);
        }
    }

    name.to_string()
}

/// Make a name usable as a JavaScript identifier
pub fn js_identifier(name: &str) -> String {
    if IDENTIFIER_REGEX.is_match(name) {
        return name.to_string();
    }

    let mut ident: String = name
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || c == '_' || c == '$' { c } else { '_' })
        .collect();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    ident
}

pub(crate) fn is_js_identifier(name: &str) -> bool {
    IDENTIFIER_REGEX.is_match(name)
}

/// Strip a trailing `_id` or `Id` from a foreign key column
pub(crate) fn strip_id_suffix(column: &str) -> &str {
    for suffix in ["_id", "_ID", "Id", "ID"] {
        if let Some(stem) = column.strip_suffix(suffix) {
            if !stem.is_empty() {
                return stem;
            }
        }
    }
    column
}
