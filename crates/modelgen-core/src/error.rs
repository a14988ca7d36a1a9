//! Error types for modelgen

use thiserror::Error;

/// Core error type for modelgen operations
#[derive(Error, Debug)]
pub enum ModelgenError {
    #[error("Configuration error: {0}")]
    Configuration(String),

    #[error("Unsupported dialect: {0}")]
    UnsupportedDialect(String),

    #[error("Invalid validation rule: {0}")]
    InvalidValidationRule(String),

    #[error("Schema error: {0}")]
    Schema(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("TOML error: {0}")]
    Toml(#[from] toml::de::Error),
}

impl ModelgenError {
    /// Returns true for errors that must abort a run before synthesis starts
    pub fn is_configuration(&self) -> bool {
        matches!(
            self,
            ModelgenError::Configuration(_)
                | ModelgenError::UnsupportedDialect(_)
                | ModelgenError::InvalidValidationRule(_)
                | ModelgenError::Toml(_)
        )
    }
}

/// Result type alias for modelgen operations
pub type Result<T> = std::result::Result<T, ModelgenError>;
