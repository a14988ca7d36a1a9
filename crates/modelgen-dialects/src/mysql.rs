//! MySQL / MariaDB dialect
//!
//! MySQL has no schemas separate from databases, so table keys are bare names
//! and the `schema` argument of the query builders is the database name.

use modelgen_core::{
    DeclaredType, DialectOptions, ForeignKeyRow, RawRow, Result, StringBounds, character_bounds,
    fixed_character_bounds,
};

use crate::sql_literal;

#[derive(Debug, Clone, Copy, Default)]
pub struct MySqlDialect;

fn database_filter(column: &str, schema: Option<&str>) -> String {
    match schema {
        Some(db) => format!("{} = {}", column, sql_literal(db)),
        None => format!("{} = DATABASE()", column),
    }
}

impl DialectOptions for MySqlDialect {
    fn name(&self) -> &'static str {
        "mysql"
    }

    fn has_schema(&self) -> bool {
        false
    }

    fn foreign_keys_query(&self, table: &str, schema: Option<&str>) -> String {
        format!(
            r#"
            SELECT
                K.CONSTRAINT_NAME AS constraint_name,
                C.CONSTRAINT_TYPE AS constraint_type,
                K.TABLE_SCHEMA AS source_schema,
                K.TABLE_NAME AS source_table,
                K.COLUMN_NAME AS source_column,
                K.REFERENCED_TABLE_SCHEMA AS target_schema,
                K.REFERENCED_TABLE_NAME AS target_table,
                K.REFERENCED_COLUMN_NAME AS target_column,
                COL.EXTRA AS extra,
                COL.COLUMN_TYPE AS column_type
            FROM information_schema.KEY_COLUMN_USAGE AS K
            LEFT JOIN information_schema.TABLE_CONSTRAINTS AS C
                ON C.TABLE_NAME = K.TABLE_NAME
                AND C.CONSTRAINT_NAME = K.CONSTRAINT_NAME
                AND C.CONSTRAINT_SCHEMA = K.CONSTRAINT_SCHEMA
            LEFT JOIN information_schema.COLUMNS AS COL
                ON COL.TABLE_SCHEMA = K.TABLE_SCHEMA
                AND COL.TABLE_NAME = K.TABLE_NAME
                AND COL.COLUMN_NAME = K.COLUMN_NAME
            WHERE K.TABLE_NAME = {}
                AND {}
            ORDER BY K.CONSTRAINT_NAME, K.ORDINAL_POSITION
            "#,
            sql_literal(table),
            database_filter("K.TABLE_SCHEMA", schema)
        )
    }

    fn count_triggers_query(&self, table: &str, schema: Option<&str>) -> String {
        format!(
            r#"
            SELECT COUNT(0) AS trigger_count
            FROM information_schema.TRIGGERS AS t
            WHERE t.EVENT_OBJECT_TABLE = {}
                AND {}
            "#,
            sql_literal(table),
            database_filter("t.EVENT_OBJECT_SCHEMA", schema)
        )
    }

    fn show_views_query(&self, schema: Option<&str>) -> String {
        format!(
            r#"
            SELECT TABLE_NAME AS table_name
            FROM information_schema.VIEWS
            WHERE {}
            ORDER BY TABLE_NAME
            "#,
            database_filter("TABLE_SCHEMA", schema)
        )
    }

    fn is_primary_key(&self, row: &ForeignKeyRow) -> bool {
        row.constraint_type_is("PRIMARY KEY") || row.constraint_name == "PRIMARY"
    }

    fn is_serial_key(&self, row: &ForeignKeyRow) -> bool {
        self.is_primary_key(row)
            && row
                .extra
                .as_deref()
                .is_some_and(|extra| extra.to_lowercase().contains("auto_increment"))
    }

    fn remap_foreign_key_row(&self, _table: &str, row: &RawRow) -> Result<ForeignKeyRow> {
        let mut remapped = ForeignKeyRow::from_raw(row)?;
        // Schema columns hold the database name, which never qualifies a table key
        remapped.source_schema = None;
        remapped.target_schema = None;
        Ok(remapped)
    }

    fn string_bounds(&self, declared_type: &str) -> Option<StringBounds> {
        let parsed = DeclaredType::parse(declared_type)?;

        match parsed.base_type.as_str() {
            "VARCHAR" | "NVARCHAR" | "CHARACTER VARYING" | "NATIONAL VARCHAR" => {
                character_bounds(&parsed)
            }
            "CHAR" | "NCHAR" | "CHARACTER" | "NATIONAL CHAR" => fixed_character_bounds(&parsed),
            "TINYTEXT" | "TEXT" | "MEDIUMTEXT" | "LONGTEXT" => Some(StringBounds::unbounded()),
            _ => None,
        }
    }
}
