//! modelgen dialects - Dialect providers for the supported engines
//!
//! Every engine is a stateless unit struct implementing
//! [`DialectOptions`](modelgen_core::DialectOptions). The registry maps
//! configuration names (and their common aliases) to those providers.

mod mssql;
mod mysql;
mod postgres;
mod sqlite;

#[cfg(test)]
mod dialect_tests;

pub use mssql::MssqlDialect;
pub use mysql::MySqlDialect;
pub use postgres::PostgresDialect;
pub use sqlite::SqliteDialect;

use std::collections::HashMap;
use std::sync::LazyLock;

use modelgen_core::{DialectOptions, ModelgenError, Result};

static POSTGRES: PostgresDialect = PostgresDialect;
static MYSQL: MySqlDialect = MySqlDialect;
static SQLITE: SqliteDialect = SqliteDialect;
static MSSQL: MssqlDialect = MssqlDialect;

/// Maps dialect names to their providers
pub struct DialectRegistry {
    dialects: HashMap<&'static str, &'static dyn DialectOptions>,
}

impl DialectRegistry {
    /// Create a new empty registry
    pub fn new() -> Self {
        Self {
            dialects: HashMap::new(),
        }
    }

    /// Register a provider under a lower-case name
    pub fn register(&mut self, name: &'static str, dialect: &'static dyn DialectOptions) {
        self.dialects.insert(name, dialect);
    }

    /// Look up a provider by name (case-insensitive)
    pub fn get(&self, name: &str) -> Option<&'static dyn DialectOptions> {
        self.dialects
            .get(name.trim().to_lowercase().as_str())
            .copied()
    }

    /// All registered names, sorted
    pub fn names(&self) -> Vec<&'static str> {
        let mut names: Vec<_> = self.dialects.keys().copied().collect();
        names.sort_unstable();
        names
    }
}

impl Default for DialectRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Registry of the built-in dialects
pub static DIALECT_REGISTRY: LazyLock<DialectRegistry> = LazyLock::new(|| {
    let mut registry = DialectRegistry::new();

    registry.register("postgres", &POSTGRES);
    registry.register("postgresql", &POSTGRES);

    registry.register("mysql", &MYSQL);
    registry.register("mariadb", &MYSQL);

    registry.register("sqlite", &SQLITE);
    registry.register("sqlite3", &SQLITE);

    registry.register("mssql", &MSSQL);
    registry.register("sqlserver", &MSSQL);

    registry
});

/// Get the dialect provider for a configured engine name
///
/// `None` means the engine is not supported; callers must treat that as a
/// configuration error rather than continue with partial support.
pub fn get_dialect_options(name: &str) -> Option<&'static dyn DialectOptions> {
    let dialect = DIALECT_REGISTRY.get(name);
    if dialect.is_none() {
        tracing::warn!(dialect = %name, "dialect not found in registry");
    }
    dialect
}

/// Like [`get_dialect_options`] but returns an error for unknown engines
pub fn require_dialect_options(name: &str) -> Result<&'static dyn DialectOptions> {
    get_dialect_options(name).ok_or_else(|| {
        ModelgenError::UnsupportedDialect(format!(
            "{} (supported: {})",
            name,
            DIALECT_REGISTRY.names().join(", ")
        ))
    })
}

/// Quote a value as a SQL string literal
pub(crate) fn sql_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Read a string-ish column from a raw row, rendering numbers as text
pub(crate) fn raw_str(row: &modelgen_core::RawRow, key: &str) -> Option<String> {
    match row.get(key)? {
        serde_json::Value::String(s) => Some(s.clone()),
        serde_json::Value::Number(n) => Some(n.to_string()),
        serde_json::Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
