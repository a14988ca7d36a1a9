//! SQLite dialect
//!
//! Foreign keys come from `PRAGMA foreign_key_list`, whose rows carry
//! `id`, `seq`, `table`, `from` and `to` rather than the canonical names.
//! Declared lengths are reported as bounds even though SQLite does not enforce
//! them at storage time.

use modelgen_core::{
    DeclaredType, DialectOptions, ForeignKeyRow, ModelgenError, RawRow, Result, StringBounds,
    character_bounds,
};

use crate::{raw_str, sql_literal};

#[derive(Debug, Clone, Copy, Default)]
pub struct SqliteDialect;

fn quote_identifier(name: &str) -> String {
    format!("`{}`", name.replace('`', "``"))
}

impl DialectOptions for SqliteDialect {
    fn name(&self) -> &'static str {
        "sqlite"
    }

    fn has_schema(&self) -> bool {
        false
    }

    fn foreign_keys_query(&self, table: &str, _schema: Option<&str>) -> String {
        format!("PRAGMA foreign_key_list({});", quote_identifier(table))
    }

    fn count_triggers_query(&self, table: &str, _schema: Option<&str>) -> String {
        format!(
            "SELECT COUNT(0) AS trigger_count FROM sqlite_master WHERE type = 'trigger' AND tbl_name = {}",
            sql_literal(table)
        )
    }

    fn show_views_query(&self, _schema: Option<&str>) -> String {
        "SELECT name AS table_name FROM sqlite_master WHERE type = 'view' ORDER BY name".to_string()
    }

    fn is_primary_key(&self, row: &ForeignKeyRow) -> bool {
        row.constraint_type_is("PRIMARY KEY")
    }

    /// Only an `INTEGER PRIMARY KEY` aliases the rowid
    fn is_serial_key(&self, row: &ForeignKeyRow) -> bool {
        self.is_primary_key(row)
            && row
                .column_type
                .as_deref()
                .and_then(DeclaredType::parse)
                .is_some_and(|t| t.base_type == "INTEGER")
    }

    fn remap_foreign_key_row(&self, table: &str, row: &RawRow) -> Result<ForeignKeyRow> {
        if row.contains_key("source_column") {
            return ForeignKeyRow::from_raw(row);
        }

        let source_column = raw_str(row, "from").ok_or_else(|| {
            ModelgenError::Schema(format!(
                "foreign_key_list row for {} has no `from` column",
                table
            ))
        })?;
        let target_table = raw_str(row, "table").ok_or_else(|| {
            ModelgenError::Schema(format!(
                "foreign_key_list row for {} has no `table` column",
                table
            ))
        })?;
        let id = raw_str(row, "id").unwrap_or_else(|| "0".to_string());

        Ok(ForeignKeyRow::new(
            format!("{}_{}", table, id),
            table,
            source_column,
            target_table,
            // A NULL `to` references the parent's primary key
            raw_str(row, "to").unwrap_or_else(|| "id".to_string()),
        ))
    }

    fn string_bounds(&self, declared_type: &str) -> Option<StringBounds> {
        let parsed = DeclaredType::parse(declared_type)?;
        let base = parsed.base_type.as_str();

        if base.contains("CHAR") || base.contains("CLOB") || base.contains("TEXT") {
            character_bounds(&parsed)
        } else {
            None
        }
    }
}
