//! Dialect contract
//!
//! Each supported engine implements [`DialectOptions`]. The generator and the
//! validation resolver only ever talk to this trait, never to a concrete engine.
//! Implementations are stateless: query builders return query text and leave
//! execution to the introspection driver.

use std::fmt;

use crate::{ForeignKeyRow, RawRow, Result};

/// Character length bounds derived from a declared column type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StringBounds {
    pub min: u64,
    /// `None` means the type has no maximum length
    pub max: Option<u64>,
}

impl StringBounds {
    pub const fn bounded(max: u64) -> Self {
        Self { min: 0, max: Some(max) }
    }

    pub const fn unbounded() -> Self {
        Self { min: 0, max: None }
    }

    pub fn is_bounded(&self) -> bool {
        self.max.is_some()
    }
}

/// Engine-specific introspection syntax and type semantics
pub trait DialectOptions: Send + Sync + fmt::Debug {
    /// Engine identifier, e.g. `postgres`
    fn name(&self) -> &'static str;

    /// Whether tables are namespaced in schemas
    fn has_schema(&self) -> bool;

    /// Query listing key usage for a table (foreign keys and, where the engine
    /// reports them together, primary and unique keys)
    fn foreign_keys_query(&self, table: &str, schema: Option<&str>) -> String;

    /// Query returning the number of triggers defined on a table
    fn count_triggers_query(&self, table: &str, schema: Option<&str>) -> String;

    /// Query listing view names
    fn show_views_query(&self, schema: Option<&str>) -> String;

    fn is_primary_key(&self, row: &ForeignKeyRow) -> bool;

    /// Must only hold for rows that are already primary keys
    fn is_serial_key(&self, row: &ForeignKeyRow) -> bool;

    /// Normalize a row returned by [`foreign_keys_query`](Self::foreign_keys_query)
    fn remap_foreign_key_row(&self, table: &str, row: &RawRow) -> Result<ForeignKeyRow>;

    /// Character bounds for a declared type, `None` when it is not a string type
    fn string_bounds(&self, declared_type: &str) -> Option<StringBounds>;
}

/// A declared column type split into its components
///
/// `character varying(100)` parses to base `CHARACTER VARYING` with params
/// `["100"]`; `timestamp(3) with time zone` keeps `WITH TIME ZONE` as a modifier.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeclaredType {
    /// Upper-cased base name with whitespace collapsed
    pub base_type: String,
    pub params: Vec<String>,
    /// Upper-cased text following the parameter list (`UNSIGNED`, `WITH TIME ZONE`)
    pub modifiers: String,
    pub is_array: bool,
}

impl DeclaredType {
    /// Parse a declared type, `None` for empty or unbalanced input
    pub fn parse(type_str: &str) -> Option<Self> {
        let type_str = type_str.trim();
        if type_str.is_empty() {
            return None;
        }

        let is_array = type_str.ends_with("[]");
        let type_str = type_str.trim_end_matches("[]").trim();

        match type_str.find('(') {
            Some(paren_start) => {
                let paren_end = type_str.rfind(')')?;
                if paren_end < paren_start {
                    return None;
                }
                let params = split_params(&type_str[paren_start + 1..paren_end]);

                Some(Self {
                    base_type: normalize_words(&type_str[..paren_start]),
                    params,
                    modifiers: normalize_words(&type_str[paren_end + 1..]),
                    is_array,
                })
            }
            None if type_str.contains(')') => None,
            None => Some(Self {
                base_type: normalize_words(type_str),
                params: Vec::new(),
                modifiers: String::new(),
                is_array,
            }),
        }
    }

    /// The first parameter as a length, if it is numeric
    pub fn length(&self) -> Option<u64> {
        self.params.first().and_then(|p| p.parse().ok())
    }

    /// Base name followed by modifiers, e.g. `TIMESTAMP WITH TIME ZONE`
    pub fn full_name(&self) -> String {
        if self.modifiers.is_empty() {
            self.base_type.clone()
        } else {
            format!("{} {}", self.base_type, self.modifiers)
        }
    }
}

/// Split a parameter list on commas outside single-quoted literals
///
/// `'a,b', 'it''s'` yields `'a,b'` and `'it''s'`; quotes are kept so enum
/// values can be unquoted by the caller.
fn split_params(list: &str) -> Vec<String> {
    let mut params = Vec::new();
    let mut current = String::new();
    let mut in_quote = false;

    for c in list.chars() {
        match c {
            '\'' => {
                in_quote = !in_quote;
                current.push(c);
            }
            ',' if !in_quote => params.push(std::mem::take(&mut current)),
            _ => current.push(c),
        }
    }
    params.push(current);

    params
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn normalize_words(s: &str) -> String {
    s.split_whitespace()
        .map(str::to_uppercase)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Bounds for a character type given its parameter list
///
/// No parameter means unbounded; a numeric parameter is the maximum length.
/// `max` and `-1` are treated as unbounded. Anything else is unparseable.
pub fn character_bounds(declared: &DeclaredType) -> Option<StringBounds> {
    let Some(param) = declared.params.first() else {
        return Some(StringBounds::unbounded());
    };

    if param.eq_ignore_ascii_case("max") || param == "-1" {
        return Some(StringBounds::unbounded());
    }

    param.parse::<u64>().ok().map(StringBounds::bounded)
}

/// Bounds for a fixed-length character type
///
/// Engines that pad fixed-length strings read a missing length as 1.
pub fn fixed_character_bounds(declared: &DeclaredType) -> Option<StringBounds> {
    if declared.params.is_empty() {
        return Some(StringBounds::bounded(1));
    }
    character_bounds(declared)
}

#[cfg(test)]
mod tests;
