use modelgen_core::{ForeignKeyRow, ModelgenError, RawRow, StringBounds};
use pretty_assertions::assert_eq;
use serde_json::json;

use super::*;

fn raw(value: serde_json::Value) -> RawRow {
    value.as_object().cloned().expect("object literal")
}

fn pk_row(column_type: &str) -> ForeignKeyRow {
    let mut row = ForeignKeyRow::default();
    row.constraint_name = "pk".to_string();
    row.source_table = "t".to_string();
    row.source_column = "id".to_string();
    row.constraint_type = Some("PRIMARY KEY".to_string());
    row.column_type = Some(column_type.to_string());
    row
}

#[test]
fn test_registry_lookup() {
    assert_eq!(get_dialect_options("postgres").map(|d| d.name()), Some("postgres"));
    assert_eq!(get_dialect_options("mysql").map(|d| d.name()), Some("mysql"));
    assert_eq!(get_dialect_options("sqlite").map(|d| d.name()), Some("sqlite"));
    assert_eq!(get_dialect_options("mssql").map(|d| d.name()), Some("mssql"));
}

#[test]
fn test_registry_aliases_and_case() {
    assert_eq!(get_dialect_options("PostgreSQL").map(|d| d.name()), Some("postgres"));
    assert_eq!(get_dialect_options("mariadb").map(|d| d.name()), Some("mysql"));
    assert_eq!(get_dialect_options("sqlite3").map(|d| d.name()), Some("sqlite"));
    assert_eq!(get_dialect_options(" SqlServer ").map(|d| d.name()), Some("mssql"));
}

#[test]
fn test_unknown_dialect() {
    assert!(get_dialect_options("oracle").is_none());
    assert!(get_dialect_options("").is_none());

    let err = require_dialect_options("oracle").unwrap_err();
    assert!(matches!(err, ModelgenError::UnsupportedDialect(ref msg) if msg.starts_with("oracle")));
    assert!(err.is_configuration());
}

#[test]
fn test_registry_names() {
    assert_eq!(
        DIALECT_REGISTRY.names(),
        vec!["mariadb", "mssql", "mysql", "postgres", "postgresql", "sqlite", "sqlite3", "sqlserver"]
    );
}

#[test]
fn test_postgres_string_bounds() {
    let pg = PostgresDialect;
    assert_eq!(pg.string_bounds("character varying(100)"), Some(StringBounds::bounded(100)));
    assert_eq!(pg.string_bounds("VARCHAR(255)"), Some(StringBounds::bounded(255)));
    assert_eq!(pg.string_bounds("character(2)"), Some(StringBounds::bounded(2)));
    assert_eq!(pg.string_bounds("bpchar(8)"), Some(StringBounds::bounded(8)));
    assert_eq!(pg.string_bounds("character"), Some(StringBounds::bounded(1)));
    assert_eq!(pg.string_bounds("bpchar"), Some(StringBounds::bounded(1)));
    assert_eq!(pg.string_bounds("character varying"), Some(StringBounds::unbounded()));
    assert_eq!(pg.string_bounds("text"), Some(StringBounds::unbounded()));
    assert_eq!(pg.string_bounds("citext"), Some(StringBounds::unbounded()));
    assert_eq!(pg.string_bounds("integer"), None);
    assert_eq!(pg.string_bounds("varchar(10)[]"), None);
    assert_eq!(pg.string_bounds("varchar(abc)"), None);
    assert_eq!(pg.string_bounds("varchar(10"), None);
}

#[test]
fn test_mysql_string_bounds() {
    let my = MySqlDialect;
    assert_eq!(my.string_bounds("varchar(64)"), Some(StringBounds::bounded(64)));
    assert_eq!(my.string_bounds("char(3)"), Some(StringBounds::bounded(3)));
    assert_eq!(my.string_bounds("char"), Some(StringBounds::bounded(1)));
    assert_eq!(my.string_bounds("varchar"), Some(StringBounds::unbounded()));
    for text in ["tinytext", "text", "mediumtext", "longtext"] {
        assert_eq!(my.string_bounds(text), Some(StringBounds::unbounded()), "{}", text);
    }
    assert_eq!(my.string_bounds("int(11)"), None);
    assert_eq!(my.string_bounds("enum('a','b')"), None);
}

#[test]
fn test_sqlite_string_bounds() {
    let lite = SqliteDialect;
    assert_eq!(lite.string_bounds("VARCHAR(40)"), Some(StringBounds::bounded(40)));
    assert_eq!(lite.string_bounds("NVARCHAR(120)"), Some(StringBounds::bounded(120)));
    assert_eq!(lite.string_bounds("TEXT"), Some(StringBounds::unbounded()));
    assert_eq!(lite.string_bounds("CLOB"), Some(StringBounds::unbounded()));
    assert_eq!(lite.string_bounds("INTEGER"), None);
    assert_eq!(lite.string_bounds("REAL"), None);
}

#[test]
fn test_mssql_string_bounds() {
    let ms = MssqlDialect;
    assert_eq!(ms.string_bounds("nvarchar(50)"), Some(StringBounds::bounded(50)));
    assert_eq!(ms.string_bounds("varchar(max)"), Some(StringBounds::unbounded()));
    assert_eq!(ms.string_bounds("nvarchar(-1)"), Some(StringBounds::unbounded()));
    assert_eq!(ms.string_bounds("ntext"), Some(StringBounds::unbounded()));
    assert_eq!(ms.string_bounds("sysname"), Some(StringBounds::bounded(128)));
    assert_eq!(ms.string_bounds("nchar"), Some(StringBounds::bounded(1)));
    assert_eq!(ms.string_bounds("uniqueidentifier"), None);
}

#[test]
fn test_serial_requires_primary_key() {
    let dialects: [&dyn DialectOptions; 4] = [&PostgresDialect, &MySqlDialect, &SqliteDialect, &MssqlDialect];

    for dialect in dialects {
        let mut row = ForeignKeyRow::new("fk", "t", "id", "other", "id")
            .with_extra("auto_increment");
        row.column_type = Some("INTEGER".to_string());
        assert!(!dialect.is_primary_key(&row), "{}", dialect.name());
        assert!(!dialect.is_serial_key(&row), "{}", dialect.name());
    }
}

#[test]
fn test_postgres_serial_key() {
    let pg = PostgresDialect;
    assert!(pg.is_serial_key(&pk_row("integer").with_extra("auto_increment")));
    assert!(pg.is_serial_key(&pk_row("integer").with_extra("nextval('t_id_seq'::regclass)")));
    assert!(pg.is_serial_key(&pk_row("bigserial")));
    assert!(!pg.is_serial_key(&pk_row("uuid")));
}

#[test]
fn test_mysql_serial_key() {
    let my = MySqlDialect;
    assert!(my.is_serial_key(&pk_row("int(11)").with_extra("auto_increment")));
    assert!(!my.is_serial_key(&pk_row("int(11)")));

    let mut named_primary = pk_row("int").with_extra("auto_increment");
    named_primary.constraint_type = None;
    named_primary.constraint_name = "PRIMARY".to_string();
    assert!(my.is_primary_key(&named_primary));
    assert!(my.is_serial_key(&named_primary));
}

#[test]
fn test_sqlite_serial_key() {
    let lite = SqliteDialect;
    assert!(lite.is_serial_key(&pk_row("INTEGER")));
    assert!(lite.is_serial_key(&pk_row("integer")));
    assert!(!lite.is_serial_key(&pk_row("INT")));
    assert!(!lite.is_serial_key(&pk_row("TEXT")));
}

#[test]
fn test_mssql_serial_key() {
    let ms = MssqlDialect;
    assert!(ms.is_serial_key(&pk_row("int").with_extra("identity")));
    assert!(ms.is_serial_key(&pk_row("int").with_extra("auto_increment")));
    assert!(!ms.is_serial_key(&pk_row("int")));
}

#[test]
fn test_sqlite_remap_pragma_row() {
    let row = raw(json!({
        "id": 0,
        "seq": 0,
        "table": "artists",
        "from": "artist_id",
        "to": "id",
        "on_update": "NO ACTION",
        "on_delete": "CASCADE",
        "match": "NONE"
    }));

    let remapped = SqliteDialect.remap_foreign_key_row("albums", &row).unwrap();
    assert_eq!(remapped.constraint_name, "albums_0");
    assert_eq!(remapped.source_table, "albums");
    assert_eq!(remapped.source_column, "artist_id");
    assert_eq!(remapped.target_table.as_deref(), Some("artists"));
    assert_eq!(remapped.target_column.as_deref(), Some("id"));
    assert_eq!(remapped.source_schema, None);
    assert!(remapped.is_foreign_key());
}

#[test]
fn test_sqlite_remap_null_target_column() {
    let row = raw(json!({"id": 1, "table": "artists", "from": "artist_id", "to": null}));
    let remapped = SqliteDialect.remap_foreign_key_row("albums", &row).unwrap();
    assert_eq!(remapped.target_column.as_deref(), Some("id"));
}

#[test]
fn test_sqlite_remap_missing_column() {
    let row = raw(json!({"id": 1, "table": "artists"}));
    let err = SqliteDialect.remap_foreign_key_row("albums", &row).unwrap_err();
    assert!(matches!(err, ModelgenError::Schema(_)));
}

#[test]
fn test_postgres_remap_canonical_row() {
    let row = raw(json!({
        "constraint_name": "orders_customer_id_fkey",
        "constraint_type": "FOREIGN KEY",
        "source_schema": "sales",
        "source_table": "orders",
        "source_column": "customer_id",
        "target_schema": "sales",
        "target_table": "customers",
        "target_column": "id",
        "extra": null,
        "column_type": "int4"
    }));

    let remapped = PostgresDialect.remap_foreign_key_row("sales.orders", &row).unwrap();
    assert_eq!(remapped.source_schema.as_deref(), Some("sales"));
    assert_eq!(remapped.target_table.as_deref(), Some("customers"));
    assert!(remapped.is_foreign_key());
}

#[test]
fn test_mysql_remap_drops_database_name() {
    let row = raw(json!({
        "constraint_name": "fk_orders_customer",
        "constraint_type": "FOREIGN KEY",
        "source_schema": "shop",
        "source_table": "orders",
        "source_column": "customer_id",
        "target_schema": "shop",
        "target_table": "customers",
        "target_column": "id"
    }));

    let remapped = MySqlDialect.remap_foreign_key_row("orders", &row).unwrap();
    assert_eq!(remapped.source_schema, None);
    assert_eq!(remapped.target_schema, None);
    assert_eq!(remapped.target_table.as_deref(), Some("customers"));
}

#[test]
fn test_schema_support() {
    assert!(PostgresDialect.has_schema());
    assert!(MssqlDialect.has_schema());
    assert!(!MySqlDialect.has_schema());
    assert!(!SqliteDialect.has_schema());
}

#[test]
fn test_postgres_key_query_pairs_composite_columns() {
    let pg = PostgresDialect.foreign_keys_query("order_lines", None);

    assert!(!pg.contains("constraint_column_usage"));
    assert!(pg.contains("ref.ordinal_position = kcu.position_in_unique_constraint"));
    assert!(pg.contains("ref.constraint_name = rc.unique_constraint_name"));
    assert!(pg.contains("ORDER BY tc.constraint_name, kcu.ordinal_position"));
}

#[test]
fn test_queries_quote_names() {
    let pg = PostgresDialect.foreign_keys_query("o'brien", Some("sales"));
    assert!(pg.contains("tc.table_name = 'o''brien'"));
    assert!(pg.contains("tc.table_schema = 'sales'"));

    let pg_default = PostgresDialect.count_triggers_query("orders", None);
    assert!(pg_default.contains("n.nspname = 'public'"));

    let my = MySqlDialect.foreign_keys_query("orders", None);
    assert!(my.contains("K.TABLE_SCHEMA = DATABASE()"));

    let lite = SqliteDialect.foreign_keys_query("odd`name", None);
    assert_eq!(lite, "PRAGMA foreign_key_list(`odd``name`);");

    let ms = MssqlDialect.count_triggers_query("orders", None);
    assert!(ms.contains("t.name = N'orders'"));
    assert!(ms.contains("s.name = N'dbo'"));
}

#[test]
fn test_show_views_queries() {
    assert!(PostgresDialect.show_views_query(None).contains("information_schema.views"));
    assert!(PostgresDialect.show_views_query(Some("app")).contains("table_schema = 'app'"));
    assert!(MySqlDialect.show_views_query(Some("shop")).contains("TABLE_SCHEMA = 'shop'"));
    assert!(SqliteDialect.show_views_query(None).contains("type = 'view'"));
    assert!(!MssqlDialect.show_views_query(None).contains("WHERE"));
}

#[test]
fn test_trigger_queries_alias_count() {
    let dialects: [&dyn DialectOptions; 4] = [&PostgresDialect, &MySqlDialect, &SqliteDialect, &MssqlDialect];
    for dialect in dialects {
        assert!(
            dialect.count_triggers_query("t", None).contains("AS trigger_count"),
            "{}",
            dialect.name()
        );
    }
}
