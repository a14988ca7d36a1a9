//! SQL Server dialect

use modelgen_core::{
    DeclaredType, DialectOptions, ForeignKeyRow, RawRow, Result, StringBounds, character_bounds,
    fixed_character_bounds,
};

const DEFAULT_SCHEMA: &str = "dbo";

#[derive(Debug, Clone, Copy, Default)]
pub struct MssqlDialect;

fn nvarchar_literal(value: &str) -> String {
    format!("N'{}'", value.replace('\'', "''"))
}

impl DialectOptions for MssqlDialect {
    fn name(&self) -> &'static str {
        "mssql"
    }

    fn has_schema(&self) -> bool {
        true
    }

    fn foreign_keys_query(&self, table: &str, schema: Option<&str>) -> String {
        let schema = schema.unwrap_or(DEFAULT_SCHEMA);
        format!(
            r#"
            SELECT
                ccu.CONSTRAINT_NAME AS constraint_name,
                tc.CONSTRAINT_TYPE AS constraint_type,
                ccu.TABLE_SCHEMA AS source_schema,
                ccu.TABLE_NAME AS source_table,
                ccu.COLUMN_NAME AS source_column,
                OBJECT_SCHEMA_NAME(fk.referenced_object_id) AS target_schema,
                OBJECT_NAME(fk.referenced_object_id) AS target_table,
                COL_NAME(fkc.referenced_object_id, fkc.referenced_column_id) AS target_column,
                CASE
                    WHEN COLUMNPROPERTY(OBJECT_ID(QUOTENAME(ccu.TABLE_SCHEMA) + '.' + QUOTENAME(ccu.TABLE_NAME)), ccu.COLUMN_NAME, 'IsIdentity') = 1
                    THEN 'identity'
                    ELSE NULL
                END AS extra,
                col.DATA_TYPE AS column_type
            FROM INFORMATION_SCHEMA.CONSTRAINT_COLUMN_USAGE ccu
            INNER JOIN INFORMATION_SCHEMA.TABLE_CONSTRAINTS tc
                ON tc.CONSTRAINT_NAME = ccu.CONSTRAINT_NAME
                AND tc.TABLE_SCHEMA = ccu.TABLE_SCHEMA
            INNER JOIN INFORMATION_SCHEMA.COLUMNS col
                ON col.TABLE_SCHEMA = ccu.TABLE_SCHEMA
                AND col.TABLE_NAME = ccu.TABLE_NAME
                AND col.COLUMN_NAME = ccu.COLUMN_NAME
            LEFT JOIN sys.foreign_keys fk
                ON fk.name = ccu.CONSTRAINT_NAME
                AND SCHEMA_NAME(fk.schema_id) = ccu.TABLE_SCHEMA
            LEFT JOIN sys.foreign_key_columns fkc
                ON fkc.constraint_object_id = fk.object_id
                AND COL_NAME(fkc.parent_object_id, fkc.parent_column_id) = ccu.COLUMN_NAME
            WHERE ccu.TABLE_NAME = {}
                AND ccu.TABLE_SCHEMA = {}
            ORDER BY ccu.CONSTRAINT_NAME
            "#,
            nvarchar_literal(table),
            nvarchar_literal(schema)
        )
    }

    fn count_triggers_query(&self, table: &str, schema: Option<&str>) -> String {
        let schema = schema.unwrap_or(DEFAULT_SCHEMA);
        format!(
            r#"
            SELECT COUNT(0) AS trigger_count
            FROM sys.triggers tr
            INNER JOIN sys.tables t ON tr.parent_id = t.object_id
            INNER JOIN sys.schemas s ON t.schema_id = s.schema_id
            WHERE t.name = {}
                AND s.name = {}
            "#,
            nvarchar_literal(table),
            nvarchar_literal(schema)
        )
    }

    fn show_views_query(&self, schema: Option<&str>) -> String {
        let filter = schema
            .map(|s| format!("WHERE TABLE_SCHEMA = {}", nvarchar_literal(s)))
            .unwrap_or_default();
        format!(
            r#"
            SELECT TABLE_NAME AS table_name, TABLE_SCHEMA AS table_schema
            FROM INFORMATION_SCHEMA.VIEWS
            {}
            ORDER BY TABLE_SCHEMA, TABLE_NAME
            "#,
            filter
        )
    }

    fn is_primary_key(&self, row: &ForeignKeyRow) -> bool {
        row.constraint_type_is("PRIMARY KEY")
    }

    fn is_serial_key(&self, row: &ForeignKeyRow) -> bool {
        self.is_primary_key(row)
            && row.extra.as_deref().is_some_and(|extra| {
                extra.eq_ignore_ascii_case("auto_increment") || extra.eq_ignore_ascii_case("identity")
            })
    }

    fn remap_foreign_key_row(&self, _table: &str, row: &RawRow) -> Result<ForeignKeyRow> {
        ForeignKeyRow::from_raw(row)
    }

    fn string_bounds(&self, declared_type: &str) -> Option<StringBounds> {
        let parsed = DeclaredType::parse(declared_type)?;

        match parsed.base_type.as_str() {
            "VARCHAR" | "NVARCHAR" => character_bounds(&parsed),
            "CHAR" | "NCHAR" => fixed_character_bounds(&parsed),
            "TEXT" | "NTEXT" => Some(StringBounds::unbounded()),
            // sysname is a built-in alias for nvarchar(128)
            "SYSNAME" => Some(StringBounds::bounded(128)),
            _ => None,
        }
    }
}
