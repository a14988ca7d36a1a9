//! Declared type to `DataTypes` mapping

use modelgen_core::DeclaredType;

/// Map a declared engine type to a `DataTypes.*` expression
///
/// Returns `None` when no rule classifies the type; the caller decides the
/// fallback.
pub fn map_data_type(declared_type: &str) -> Option<String> {
    let parsed = DeclaredType::parse(declared_type)?;

    if parsed.is_array {
        let element = DeclaredType {
            is_array: false,
            ..parsed
        };
        return map_scalar(&element).map(|inner| format!("DataTypes.ARRAY({})", inner));
    }

    map_scalar(&parsed)
}

fn map_scalar(parsed: &DeclaredType) -> Option<String> {
    // `int unsigned` without a parameter list keeps its modifiers in the base
    let mut base = parsed.base_type.as_str();
    let mut modifiers = parsed.modifiers.clone();
    loop {
        match base.rsplit_once(' ') {
            Some((rest, word @ ("UNSIGNED" | "SIGNED" | "ZEROFILL"))) => {
                modifiers = format!("{} {}", word, modifiers);
                base = rest;
            }
            _ => break,
        }
    }
    let numeric_params: Vec<u64> = parsed.params.iter().filter_map(|p| p.parse().ok()).collect();

    let mapped = match base {
        "BOOLEAN" | "BOOL" => "DataTypes.BOOLEAN".to_string(),
        "BIT" if parsed.length().is_none_or(|n| n == 1) => "DataTypes.BOOLEAN".to_string(),
        "TINYINT" if parsed.length() == Some(1) => "DataTypes.BOOLEAN".to_string(),

        "VARCHAR" | "CHARACTER VARYING" | "NVARCHAR" | "VARCHAR2" | "NVARCHAR2"
        | "NATIONAL VARCHAR" => match parsed.params.first() {
            Some(p) if p.eq_ignore_ascii_case("max") || p == "-1" => "DataTypes.TEXT".to_string(),
            Some(_) => with_length("DataTypes.STRING", &numeric_params),
            None => "DataTypes.STRING".to_string(),
        },
        "CHAR" | "CHARACTER" | "NCHAR" | "BPCHAR" | "NATIONAL CHAR" => {
            with_length("DataTypes.CHAR", &numeric_params)
        }
        "TEXT" | "NTEXT" | "CLOB" => "DataTypes.TEXT".to_string(),
        "TINYTEXT" => "DataTypes.TEXT('tiny')".to_string(),
        "MEDIUMTEXT" => "DataTypes.TEXT('medium')".to_string(),
        "LONGTEXT" => "DataTypes.TEXT('long')".to_string(),
        "CITEXT" => "DataTypes.CITEXT".to_string(),

        "TINYINT" => "DataTypes.TINYINT".to_string(),
        "SMALLINT" | "INT2" | "SMALLSERIAL" | "SERIAL2" => "DataTypes.SMALLINT".to_string(),
        "MEDIUMINT" => "DataTypes.MEDIUMINT".to_string(),
        "INTEGER" | "INT" | "INT4" | "SERIAL" | "SERIAL4" => "DataTypes.INTEGER".to_string(),
        "BIGINT" | "INT8" | "BIGSERIAL" | "SERIAL8" => "DataTypes.BIGINT".to_string(),

        "DECIMAL" | "NUMERIC" | "DEC" => match numeric_params.as_slice() {
            [] => "DataTypes.DECIMAL".to_string(),
            [precision] => format!("DataTypes.DECIMAL({})", precision),
            [precision, scale, ..] => format!("DataTypes.DECIMAL({}, {})", precision, scale),
        },
        "MONEY" | "SMALLMONEY" => "DataTypes.DECIMAL(19, 4)".to_string(),
        "REAL" | "FLOAT4" => "DataTypes.REAL".to_string(),
        "FLOAT" => "DataTypes.FLOAT".to_string(),
        "DOUBLE" | "DOUBLE PRECISION" | "FLOAT8" => "DataTypes.DOUBLE".to_string(),

        "DATE" => "DataTypes.DATEONLY".to_string(),
        "TIME" | "TIMETZ" | "TIME WITH TIME ZONE" | "TIME WITHOUT TIME ZONE" => {
            "DataTypes.TIME".to_string()
        }
        "TIMESTAMP" | "TIMESTAMPTZ" | "TIMESTAMP WITH TIME ZONE" | "TIMESTAMP WITHOUT TIME ZONE"
        | "DATETIME" | "DATETIME2" | "SMALLDATETIME" | "DATETIMEOFFSET" => {
            "DataTypes.DATE".to_string()
        }
        "YEAR" => "DataTypes.INTEGER".to_string(),

        "UUID" | "UNIQUEIDENTIFIER" => "DataTypes.UUID".to_string(),
        "JSON" => "DataTypes.JSON".to_string(),
        "JSONB" => "DataTypes.JSONB".to_string(),
        "BYTEA" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" | "BINARY" | "VARBINARY"
        | "IMAGE" => "DataTypes.BLOB".to_string(),

        "ENUM" => {
            let values: Vec<String> = parsed
                .params
                .iter()
                .map(|p| quote_js(&unquote(p).unwrap_or_else(|| p.trim_matches('\'').to_string())))
                .collect();
            format!("DataTypes.ENUM({})", values.join(", "))
        }

        "GEOMETRY" | "POINT" | "LINESTRING" | "POLYGON" | "MULTIPOINT" | "MULTILINESTRING"
        | "MULTIPOLYGON" => "DataTypes.GEOMETRY".to_string(),
        "GEOGRAPHY" => "DataTypes.GEOGRAPHY".to_string(),
        "INET" => "DataTypes.INET".to_string(),
        "CIDR" => "DataTypes.CIDR".to_string(),
        "MACADDR" => "DataTypes.MACADDR".to_string(),
        "TSVECTOR" => "DataTypes.TSVECTOR".to_string(),
        _ => return None,
    };

    Some(with_modifiers(mapped, &modifiers))
}

fn with_length(base: &str, numeric_params: &[u64]) -> String {
    match numeric_params.first() {
        Some(n) => format!("{}({})", base, n),
        None => base.to_string(),
    }
}

fn with_modifiers(mut mapped: String, modifiers: &str) -> String {
    for modifier in modifiers.split_whitespace() {
        match modifier {
            "UNSIGNED" => mapped.push_str(".UNSIGNED"),
            "ZEROFILL" => mapped.push_str(".ZEROFILL"),
            _ => {}
        }
    }
    mapped
}

pub(crate) fn quote_js(value: &str) -> String {
    serde_json::Value::from(value).to_string()
}

/// Contents of a `'...'` or `N'...'` literal with doubled quotes collapsed
pub(crate) fn unquote(value: &str) -> Option<String> {
    let value = value
        .strip_prefix('N')
        .filter(|rest| rest.starts_with('\''))
        .unwrap_or(value);
    let inner = value.strip_prefix('\'')?.strip_suffix('\'')?;
    Some(inner.replace("''", "'"))
}
