use std::path::Path;
use std::str::FromStr;

use indexmap::IndexMap;
use modelgen_core::{DialectOptions, ModelgenError, Result};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationRule;

/// Model option keys the generator always renders itself
pub const RESERVED_MODEL_OPTIONS: &[&str] =
    &["sequelize", "tableName", "schema", "hasTrigger", "timestamps", "indexes"];

/// Casing applied to model or property names
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CaseOption {
    #[serde(rename = "c", alias = "camel")]
    Camel,
    #[serde(rename = "l", alias = "lower")]
    Lower,
    #[default]
    #[serde(rename = "o", alias = "original")]
    Original,
    #[serde(rename = "p", alias = "pascal")]
    Pascal,
    #[serde(rename = "u", alias = "upper")]
    Upper,
}

impl FromStr for CaseOption {
    type Err = ModelgenError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "c" | "camel" => Ok(CaseOption::Camel),
            "l" | "lower" => Ok(CaseOption::Lower),
            "o" | "original" => Ok(CaseOption::Original),
            "p" | "pascal" => Ok(CaseOption::Pascal),
            "u" | "upper" => Ok(CaseOption::Upper),
            other => Err(ModelgenError::Configuration(format!(
                "unknown case option: {}",
                other
            ))),
        }
    }
}

/// Configuration for a generation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct GeneratorOptions {
    /// Engine name, resolved through the dialect registry
    pub dialect: Option<String>,
    /// Absent or empty disables validation injection
    pub validation_rules: Vec<ValidationRule>,
    /// Singularize table names when deriving model names
    pub singularize: bool,
    pub case_model: CaseOption,
    pub case_prop: CaseOption,
    /// Value of the `timestamps` model option
    pub timestamps: bool,
    /// Spaces per indentation level in the generated text
    pub indentation: usize,
    /// Extra model options rendered verbatim after the built-in ones
    pub additional: IndexMap<String, serde_json::Value>,
}

impl Default for GeneratorOptions {
    fn default() -> Self {
        Self {
            dialect: None,
            validation_rules: Vec::new(),
            singularize: false,
            case_model: CaseOption::Original,
            case_prop: CaseOption::Original,
            timestamps: false,
            indentation: 2,
            additional: IndexMap::new(),
        }
    }
}

impl GeneratorOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse options from TOML and validate them
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let options: GeneratorOptions = toml::from_str(content)?;
        options.validate()?;
        Ok(options)
    }

    /// Parse options from JSON and validate them
    pub fn from_json_str(content: &str) -> Result<Self> {
        let options: GeneratorOptions = serde_json::from_str(content)
            .map_err(|e| ModelgenError::Configuration(e.to_string()))?;
        options.validate()?;
        Ok(options)
    }

    /// Load options from a `.toml` or `.json` file
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)?;
        tracing::debug!(path = %path.display(), "loading generator options");

        match path.extension().and_then(|e| e.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Self::from_json_str(&content),
            _ => Self::from_toml_str(&content),
        }
    }

    pub fn with_dialect(mut self, dialect: impl Into<String>) -> Self {
        self.dialect = Some(dialect.into());
        self
    }

    pub fn with_validation_rule(mut self, rule: ValidationRule) -> Self {
        self.validation_rules.push(rule);
        self
    }

    pub fn with_singularize(mut self, singularize: bool) -> Self {
        self.singularize = singularize;
        self
    }

    pub fn with_case_model(mut self, case: CaseOption) -> Self {
        self.case_model = case;
        self
    }

    pub fn with_case_prop(mut self, case: CaseOption) -> Self {
        self.case_prop = case;
        self
    }

    pub fn with_timestamps(mut self, timestamps: bool) -> Self {
        self.timestamps = timestamps;
        self
    }

    pub fn with_indentation(mut self, indentation: usize) -> Self {
        self.indentation = indentation;
        self
    }

    pub fn with_additional(mut self, key: impl Into<String>, value: serde_json::Value) -> Self {
        self.additional.insert(key.into(), value);
        self
    }

    /// Whether any validation rule is configured
    pub fn validation_enabled(&self) -> bool {
        !self.validation_rules.is_empty()
    }

    /// Check for configuration-class problems
    pub fn validate(&self) -> Result<()> {
        if self.indentation == 0 {
            return Err(ModelgenError::Configuration(
                "indentation must be at least 1".to_string(),
            ));
        }

        let mut seen = Vec::new();
        for rule in &self.validation_rules {
            rule.validate()?;
            if seen.contains(&rule.kind()) {
                return Err(ModelgenError::InvalidValidationRule(format!(
                    "rule `{}` is configured more than once",
                    rule.kind()
                )));
            }
            seen.push(rule.kind());
        }

        if let Some(key) = self
            .additional
            .keys()
            .find(|k| RESERVED_MODEL_OPTIONS.contains(&k.as_str()))
        {
            return Err(ModelgenError::Configuration(format!(
                "`{}` cannot be set through additional options",
                key
            )));
        }

        Ok(())
    }

    /// Resolve the configured dialect through the registry
    pub fn resolve_dialect(&self) -> Result<&'static dyn DialectOptions> {
        let name = self
            .dialect
            .as_deref()
            .ok_or_else(|| ModelgenError::Configuration("no dialect configured".to_string()))?;
        modelgen_dialects::require_dialect_options(name)
    }

    /// One indentation level
    pub fn indent_unit(&self) -> String {
        " ".repeat(self.indentation)
    }
}
