//! PostgreSQL dialect

use modelgen_core::{
    DeclaredType, DialectOptions, ForeignKeyRow, RawRow, Result, StringBounds, character_bounds,
    fixed_character_bounds,
};

use crate::sql_literal;

const DEFAULT_SCHEMA: &str = "public";

const SERIAL_TYPES: &[&str] = &["SERIAL", "SERIAL4", "BIGSERIAL", "SERIAL8", "SMALLSERIAL", "SERIAL2"];

#[derive(Debug, Clone, Copy, Default)]
pub struct PostgresDialect;

impl DialectOptions for PostgresDialect {
    fn name(&self) -> &'static str {
        "postgres"
    }

    fn has_schema(&self) -> bool {
        true
    }

    fn foreign_keys_query(&self, table: &str, schema: Option<&str>) -> String {
        let schema = schema.unwrap_or(DEFAULT_SCHEMA);
        format!(
            r#"
            SELECT
                tc.constraint_name AS constraint_name,
                tc.constraint_type AS constraint_type,
                tc.table_schema AS source_schema,
                tc.table_name AS source_table,
                kcu.column_name AS source_column,
                ref.table_schema AS target_schema,
                ref.table_name AS target_table,
                ref.column_name AS target_column,
                CASE
                    WHEN co.column_default LIKE 'nextval(%' THEN 'auto_increment'
                    WHEN co.is_identity = 'YES' THEN 'auto_increment'
                    ELSE NULL
                END AS extra,
                co.udt_name AS column_type
            FROM information_schema.table_constraints AS tc
            JOIN information_schema.key_column_usage AS kcu
                ON tc.constraint_name = kcu.constraint_name
                AND tc.table_schema = kcu.table_schema
                AND tc.table_name = kcu.table_name
            LEFT JOIN information_schema.referential_constraints AS rc
                ON rc.constraint_name = tc.constraint_name
                AND rc.constraint_schema = tc.constraint_schema
            LEFT JOIN information_schema.key_column_usage AS ref
                ON ref.constraint_name = rc.unique_constraint_name
                AND ref.constraint_schema = rc.unique_constraint_schema
                AND ref.ordinal_position = kcu.position_in_unique_constraint
            JOIN information_schema.columns AS co
                ON co.table_schema = kcu.table_schema
                AND co.table_name = kcu.table_name
                AND co.column_name = kcu.column_name
            WHERE tc.table_name = {}
                AND tc.table_schema = {}
                AND tc.constraint_type IN ('PRIMARY KEY', 'FOREIGN KEY', 'UNIQUE')
            ORDER BY tc.constraint_name, kcu.ordinal_position
            "#,
            sql_literal(table),
            sql_literal(schema)
        )
    }

    fn count_triggers_query(&self, table: &str, schema: Option<&str>) -> String {
        let schema = schema.unwrap_or(DEFAULT_SCHEMA);
        format!(
            r#"
            SELECT COUNT(0) AS trigger_count
            FROM pg_trigger t
            JOIN pg_class c ON c.oid = t.tgrelid
            JOIN pg_namespace n ON n.oid = c.relnamespace
            WHERE NOT t.tgisinternal
                AND c.relname = {}
                AND n.nspname = {}
            "#,
            sql_literal(table),
            sql_literal(schema)
        )
    }

    fn show_views_query(&self, schema: Option<&str>) -> String {
        let filter = match schema {
            Some(schema) => format!("table_schema = {}", sql_literal(schema)),
            None => "table_schema NOT IN ('pg_catalog', 'information_schema')".to_string(),
        };
        format!(
            r#"
            SELECT table_name AS table_name, table_schema AS table_schema
            FROM information_schema.views
            WHERE {}
            ORDER BY table_schema, table_name
            "#,
            filter
        )
    }

    fn is_primary_key(&self, row: &ForeignKeyRow) -> bool {
        row.constraint_type_is("PRIMARY KEY")
    }

    fn is_serial_key(&self, row: &ForeignKeyRow) -> bool {
        if !self.is_primary_key(row) {
            return false;
        }

        let extra = row.extra.as_deref().unwrap_or_default().trim().to_lowercase();
        if extra == "auto_increment" || extra.starts_with("nextval(") {
            return true;
        }

        row.column_type
            .as_deref()
            .and_then(DeclaredType::parse)
            .is_some_and(|t| SERIAL_TYPES.contains(&t.base_type.as_str()))
    }

    fn remap_foreign_key_row(&self, _table: &str, row: &RawRow) -> Result<ForeignKeyRow> {
        ForeignKeyRow::from_raw(row)
    }

    fn string_bounds(&self, declared_type: &str) -> Option<StringBounds> {
        let parsed = DeclaredType::parse(declared_type)?;
        if parsed.is_array {
            return None;
        }

        match parsed.base_type.as_str() {
            "CHARACTER VARYING" | "VARCHAR" => character_bounds(&parsed),
            "CHARACTER" | "CHAR" | "BPCHAR" => fixed_character_bounds(&parsed),
            "TEXT" | "CITEXT" => Some(StringBounds::unbounded()),
            _ => None,
        }
    }
}
