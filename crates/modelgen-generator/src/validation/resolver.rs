use std::sync::LazyLock;

use modelgen_core::DialectOptions;
use regex::{Captures, Regex};

use crate::validation::ValidationRule;

/// Message used when a string length rule has no template
pub const DEFAULT_LENGTH_MESSAGE: &str =
    "Field {tableName}.{fieldName} may not exceed {maxBound} characters. Original DataType: {declaredType}.";

static PLACEHOLDER_REGEX: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\{([a-zA-Z_][a-zA-Z0-9_]*)\}").expect("valid regex"));

/// The column a rule is being resolved for
#[derive(Debug, Clone, Copy)]
pub struct FieldContext<'a> {
    /// Table key, schema-qualified where the snapshot qualifies it
    pub table_name: &'a str,
    /// Bare column name
    pub field_name: &'a str,
    /// Declared type exactly as introspected
    pub declared_type: &'a str,
}

/// A constraint to attach to a field
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldConstraint {
    Length { min: u64, max: u64, message: String },
}

impl FieldConstraint {
    /// Validator key in the rendered `validate` block
    pub fn validator_name(&self) -> &'static str {
        match self {
            FieldConstraint::Length { .. } => "len",
        }
    }
}

/// Outcome of applying one rule to one column
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    Skipped,
    Emitted {
        constraint: FieldConstraint,
        /// Placeholders in the template that were left as literal text
        unknown_placeholders: Vec<String>,
    },
}

/// Result of substituting placeholders in a message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedMessage {
    pub text: String,
    pub unknown_placeholders: Vec<String>,
}

/// Substitute `{name}` placeholders from `values`
///
/// Unknown placeholders are left in place and reported. Substituted values are
/// never rescanned.
pub fn render_template(template: &str, values: &[(&str, String)]) -> RenderedMessage {
    let mut unknown_placeholders = Vec::new();
    let text = PLACEHOLDER_REGEX
        .replace_all(template, |caps: &Captures| {
            let name = &caps[1];
            match values.iter().find(|(key, _)| *key == name) {
                Some((_, value)) => value.clone(),
                None => {
                    if !unknown_placeholders.iter().any(|p| p == name) {
                        unknown_placeholders.push(name.to_string());
                    }
                    caps[0].to_string()
                }
            }
        })
        .into_owned();

    RenderedMessage {
        text,
        unknown_placeholders,
    }
}

/// Applies configured rules to columns using the active dialect's bounds
#[derive(Debug, Clone, Copy)]
pub struct ValidationResolver<'a> {
    rules: &'a [ValidationRule],
    dialect: &'a dyn DialectOptions,
}

impl<'a> ValidationResolver<'a> {
    pub fn new(rules: &'a [ValidationRule], dialect: &'a dyn DialectOptions) -> Self {
        Self { rules, dialect }
    }

    pub fn is_enabled(&self) -> bool {
        !self.rules.is_empty()
    }

    /// Resolve every configured rule for a column, in configured order
    pub fn resolve(&self, field: &FieldContext<'_>) -> Vec<Resolution> {
        if !self.is_enabled() {
            return vec![Resolution::Skipped];
        }
        self.rules
            .iter()
            .map(|rule| self.resolve_rule(rule, field))
            .collect()
    }

    pub fn resolve_rule(&self, rule: &ValidationRule, field: &FieldContext<'_>) -> Resolution {
        match rule {
            ValidationRule::StringLengthCheck { message } => {
                let Some(bounds) = self.dialect.string_bounds(field.declared_type) else {
                    return Resolution::Skipped;
                };
                let Some(max) = bounds.max else {
                    return Resolution::Skipped;
                };

                let mut values = vec![
                    ("fieldName", field.field_name.to_string()),
                    ("tableName", field.table_name.to_string()),
                    ("minBound", bounds.min.to_string()),
                    ("maxBound", max.to_string()),
                ];
                // `{declaredType}` belongs to the default message only
                let template = match message.as_deref() {
                    Some(template) => template,
                    None => {
                        values.push(("declaredType", field.declared_type.to_string()));
                        DEFAULT_LENGTH_MESSAGE
                    }
                };
                let rendered = render_template(template, &values);

                Resolution::Emitted {
                    constraint: FieldConstraint::Length {
                        min: bounds.min,
                        max,
                        message: rendered.text,
                    },
                    unknown_placeholders: rendered.unknown_placeholders,
                }
            }
        }
    }
}
