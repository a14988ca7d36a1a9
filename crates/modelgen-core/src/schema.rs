//! Normalized schema metadata
//!
//! `TableData` is the snapshot an introspection driver builds before any model
//! text is produced. Every map is insertion-ordered so that regenerating from
//! the same snapshot yields byte-identical output.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::relations::Relation;
use crate::{ModelgenError, Result};

/// A single result row as returned by the driver, keyed by column alias
pub type RawRow = serde_json::Map<String, serde_json::Value>;

/// Ordered column map for one table
pub type ColumnMap = IndexMap<String, ColumnDescriptor>;

/// Column information as reported by the engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ColumnDescriptor {
    /// Declared engine type, e.g. `character varying(100)`
    pub data_type: String,
    pub allow_null: bool,
    pub primary_key: bool,
    /// Whether the column participates in a foreign key
    pub foreign_key: bool,
    pub default_value: Option<String>,
    pub comment: Option<String>,
    /// Engine-specific marker such as `auto_increment`
    pub extra: Option<String>,
}

impl Default for ColumnDescriptor {
    fn default() -> Self {
        Self {
            data_type: String::new(),
            allow_null: true,
            primary_key: false,
            foreign_key: false,
            default_value: None,
            comment: None,
            extra: None,
        }
    }
}

impl ColumnDescriptor {
    /// Create a nullable column of the given declared type
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            ..Default::default()
        }
    }

    pub fn not_null(mut self) -> Self {
        self.allow_null = false;
        self
    }

    /// Mark as primary key (implies NOT NULL)
    pub fn as_primary_key(mut self) -> Self {
        self.primary_key = true;
        self.allow_null = false;
        self
    }

    pub fn as_foreign_key(mut self) -> Self {
        self.foreign_key = true;
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }
}

/// Index information
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct IndexDescriptor {
    pub name: String,
    pub fields: Vec<String>,
    pub unique: bool,
    pub primary: bool,
}

impl IndexDescriptor {
    pub fn new(name: impl Into<String>, fields: impl IntoIterator<Item = impl Into<String>>) -> Self {
        Self {
            name: name.into(),
            fields: fields.into_iter().map(Into::into).collect(),
            unique: false,
            primary: false,
        }
    }

    pub fn unique(mut self) -> Self {
        self.unique = true;
        self
    }

    /// Mark as the primary key index (implies unique)
    pub fn primary(mut self) -> Self {
        self.primary = true;
        self.unique = true;
        self
    }
}

/// Canonical key usage row
///
/// Every dialect remaps its own foreign-key query result into this shape. Rows
/// describing primary or unique keys carry no target table.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ForeignKeyRow {
    pub constraint_name: String,
    pub source_schema: Option<String>,
    pub source_table: String,
    pub source_column: String,
    pub target_schema: Option<String>,
    pub target_table: Option<String>,
    pub target_column: Option<String>,
    /// `PRIMARY KEY`, `FOREIGN KEY` or `UNIQUE` where the engine reports it
    pub constraint_type: Option<String>,
    /// Auto-increment marker (`auto_increment`, `identity`, a `nextval(` default)
    pub extra: Option<String>,
    /// Declared column type, for engines whose serial convention depends on it
    pub column_type: Option<String>,
}

impl ForeignKeyRow {
    /// Build a foreign key row pointing at `target_table.target_column`
    pub fn new(
        constraint_name: impl Into<String>,
        source_table: impl Into<String>,
        source_column: impl Into<String>,
        target_table: impl Into<String>,
        target_column: impl Into<String>,
    ) -> Self {
        Self {
            constraint_name: constraint_name.into(),
            source_table: source_table.into(),
            source_column: source_column.into(),
            target_table: Some(target_table.into()),
            target_column: Some(target_column.into()),
            constraint_type: Some("FOREIGN KEY".to_string()),
            ..Default::default()
        }
    }

    /// Synthesize a key row from column metadata so the dialect predicates can
    /// be applied to columns that appear in no key listing.
    pub fn from_column(table: &str, column_name: &str, column: &ColumnDescriptor) -> Self {
        Self {
            constraint_name: String::new(),
            source_table: table.to_string(),
            source_column: column_name.to_string(),
            constraint_type: column.primary_key.then(|| "PRIMARY KEY".to_string()),
            extra: column.extra.clone().or_else(|| {
                column
                    .default_value
                    .as_ref()
                    .filter(|d| d.trim_start().to_lowercase().starts_with("nextval("))
                    .cloned()
            }),
            column_type: Some(column.data_type.clone()),
            ..Default::default()
        }
    }

    /// Deserialize a row whose aliases already match the canonical names
    pub fn from_raw(row: &RawRow) -> Result<Self> {
        let parsed: ForeignKeyRow = serde_json::from_value(serde_json::Value::Object(row.clone()))?;
        if parsed.source_table.is_empty() || parsed.source_column.is_empty() {
            return Err(ModelgenError::Schema(format!(
                "key row is missing source_table/source_column: {}",
                serde_json::Value::Object(row.clone())
            )));
        }
        Ok(parsed)
    }

    pub fn with_schemas(mut self, source: Option<&str>, target: Option<&str>) -> Self {
        self.source_schema = source.map(str::to_string);
        self.target_schema = target.map(str::to_string);
        self
    }

    pub fn with_constraint_type(mut self, constraint_type: impl Into<String>) -> Self {
        self.constraint_type = Some(constraint_type.into());
        self
    }

    pub fn with_extra(mut self, extra: impl Into<String>) -> Self {
        self.extra = Some(extra.into());
        self
    }

    /// Case-insensitive comparison against the reported constraint type
    pub fn constraint_type_is(&self, constraint_type: &str) -> bool {
        self.constraint_type
            .as_deref()
            .is_some_and(|t| t.eq_ignore_ascii_case(constraint_type))
    }

    /// True when this row references another table
    pub fn is_foreign_key(&self) -> bool {
        self.target_table.as_deref().is_some_and(|t| !t.is_empty())
            && !self.constraint_type_is("PRIMARY KEY")
            && !self.constraint_type_is("UNIQUE")
    }
}

/// Join a schema and table name into a table key
pub fn qualify_table_name(schema: Option<&str>, table: &str) -> String {
    match schema {
        Some(s) if !s.is_empty() => format!("{}.{}", s, table),
        _ => table.to_string(),
    }
}

/// Split a table key into its schema and bare table name
///
/// Keys are only split for engines that namespace tables; elsewhere a dot is
/// part of the table name.
pub fn split_table_key(key: &str, has_schema: bool) -> (Option<&str>, &str) {
    if has_schema {
        if let Some((schema, table)) = key.split_once('.') {
            return (Some(schema), table);
        }
    }
    (None, key)
}

/// Normalized schema snapshot handed to the generator
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TableData {
    /// Table key -> ordered columns
    pub tables: IndexMap<String, ColumnMap>,
    /// Table key -> remapped key rows
    pub foreign_keys: IndexMap<String, Vec<ForeignKeyRow>>,
    pub has_triggers: IndexMap<String, bool>,
    pub indexes: IndexMap<String, Vec<IndexDescriptor>>,
    /// Association edges in discovery order
    pub relations: Vec<Relation>,
}

impl TableData {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a table and its columns in declared order
    pub fn add_table<I, N>(&mut self, key: impl Into<String>, columns: I) -> Result<()>
    where
        I: IntoIterator<Item = (N, ColumnDescriptor)>,
        N: Into<String>,
    {
        let key = key.into();
        if self.tables.contains_key(&key) {
            return Err(ModelgenError::Schema(format!("duplicate table key: {}", key)));
        }

        let mut map = ColumnMap::new();
        for (name, column) in columns {
            let name = name.into();
            if map.contains_key(&name) {
                return Err(ModelgenError::Schema(format!(
                    "duplicate column {} in table {}",
                    name, key
                )));
            }
            map.insert(name, column);
        }

        tracing::debug!(table = %key, columns = map.len(), "registered table");
        self.tables.insert(key, map);
        Ok(())
    }

    /// Attach a remapped key row to a registered table
    pub fn add_foreign_key(&mut self, table: &str, row: ForeignKeyRow) -> Result<()> {
        self.require_table(table)?;
        self.foreign_keys.entry(table.to_string()).or_default().push(row);
        Ok(())
    }

    pub fn set_has_triggers(&mut self, table: &str, has_triggers: bool) -> Result<()> {
        self.require_table(table)?;
        self.has_triggers.insert(table.to_string(), has_triggers);
        Ok(())
    }

    pub fn add_index(&mut self, table: &str, index: IndexDescriptor) -> Result<()> {
        self.require_table(table)?;
        self.indexes.entry(table.to_string()).or_default().push(index);
        Ok(())
    }

    /// Table keys in insertion order
    pub fn table_keys(&self) -> impl Iterator<Item = &str> {
        self.tables.keys().map(String::as_str)
    }

    pub fn contains_table(&self, key: &str) -> bool {
        self.tables.contains_key(key)
    }

    pub fn columns(&self, table: &str) -> Option<&ColumnMap> {
        self.tables.get(table)
    }

    pub fn foreign_keys_for(&self, table: &str) -> &[ForeignKeyRow] {
        self.foreign_keys.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn has_triggers(&self, table: &str) -> bool {
        self.has_triggers.get(table).copied().unwrap_or(false)
    }

    pub fn indexes_for(&self, table: &str) -> &[IndexDescriptor] {
        self.indexes.get(table).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Find the table key for a (schema, table) reference
    ///
    /// Tries the qualified key first and falls back to the bare table name.
    pub fn resolve_table_key(&self, schema: Option<&str>, table: &str, has_schema: bool) -> Option<String> {
        if has_schema {
            let qualified = qualify_table_name(schema, table);
            if self.tables.contains_key(&qualified) {
                return Some(qualified);
            }
        }
        self.tables.contains_key(table).then(|| table.to_string())
    }

    fn require_table(&self, table: &str) -> Result<()> {
        if self.tables.contains_key(table) {
            Ok(())
        } else {
            Err(ModelgenError::Schema(format!("unknown table: {}", table)))
        }
    }
}
