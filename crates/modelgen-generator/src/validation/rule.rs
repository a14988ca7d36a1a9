use modelgen_core::{ModelgenError, Result};
use serde::{Deserialize, Serialize};

/// A configured validation rule, tagged by `type`
///
/// ```toml
/// [[validationRules]]
/// type = "string-length-check"
/// message = "{fieldName} is too long"
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "kebab-case")]
pub enum ValidationRule {
    /// Emit a `len` constraint for bounded string columns
    StringLengthCheck {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        message: Option<String>,
    },
}

impl ValidationRule {
    pub fn string_length_check() -> Self {
        ValidationRule::StringLengthCheck { message: None }
    }

    pub fn with_message(self, template: impl Into<String>) -> Self {
        match self {
            ValidationRule::StringLengthCheck { .. } => ValidationRule::StringLengthCheck {
                message: Some(template.into()),
            },
        }
    }

    /// The `type` tag of this rule
    pub fn kind(&self) -> &'static str {
        match self {
            ValidationRule::StringLengthCheck { .. } => "string-length-check",
        }
    }

    pub fn message(&self) -> Option<&str> {
        match self {
            ValidationRule::StringLengthCheck { message } => message.as_deref(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.message().is_some_and(|m| m.trim().is_empty()) {
            return Err(ModelgenError::InvalidValidationRule(format!(
                "rule `{}` has an empty message template",
                self.kind()
            )));
        }
        Ok(())
    }
}
