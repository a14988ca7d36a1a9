//! Tests for declared type parsing and bounds helpers

use super::*;

#[test]
fn test_parse_simple_type() {
    let parsed = DeclaredType::parse("integer").unwrap();
    assert_eq!(parsed.base_type, "INTEGER");
    assert!(parsed.params.is_empty());
    assert!(!parsed.is_array);
}

#[test]
fn test_parse_parameterized_type() {
    let parsed = DeclaredType::parse("character   varying(100)").unwrap();
    assert_eq!(parsed.base_type, "CHARACTER VARYING");
    assert_eq!(parsed.params, vec!["100"]);
    assert_eq!(parsed.length(), Some(100));
}

#[test]
fn test_parse_keeps_modifiers() {
    let parsed = DeclaredType::parse("timestamp(3) with time zone").unwrap();
    assert_eq!(parsed.base_type, "TIMESTAMP");
    assert_eq!(parsed.modifiers, "WITH TIME ZONE");
    assert_eq!(parsed.full_name(), "TIMESTAMP WITH TIME ZONE");

    let parsed = DeclaredType::parse("int(11) unsigned").unwrap();
    assert_eq!(parsed.full_name(), "INT UNSIGNED");
}

#[test]
fn test_parse_decimal_params() {
    let parsed = DeclaredType::parse("DECIMAL(10, 2)").unwrap();
    assert_eq!(parsed.params, vec!["10", "2"]);
}

#[test]
fn test_parse_quoted_params() {
    let parsed = DeclaredType::parse("enum('a,b','c', 'it''s')").unwrap();
    assert_eq!(parsed.base_type, "ENUM");
    assert_eq!(parsed.params, vec!["'a,b'", "'c'", "'it''s'"]);
}

#[test]
fn test_parse_array() {
    let parsed = DeclaredType::parse("varchar(20)[]").unwrap();
    assert!(parsed.is_array);
    assert_eq!(parsed.base_type, "VARCHAR");
}

#[test]
fn test_parse_rejects_malformed() {
    assert_eq!(DeclaredType::parse(""), None);
    assert_eq!(DeclaredType::parse("   "), None);
    assert_eq!(DeclaredType::parse("varchar(10"), None);
    assert_eq!(DeclaredType::parse("varchar)10("), None);
    assert_eq!(DeclaredType::parse("varchar 10)"), None);
}

#[test]
fn test_character_bounds() {
    let bounds = |s: &str| character_bounds(&DeclaredType::parse(s).unwrap());

    assert_eq!(bounds("varchar(100)"), Some(StringBounds::bounded(100)));
    assert_eq!(bounds("varchar"), Some(StringBounds::unbounded()));
    assert_eq!(bounds("nvarchar(max)"), Some(StringBounds::unbounded()));
    assert_eq!(bounds("nvarchar(-1)"), Some(StringBounds::unbounded()));
    assert_eq!(bounds("varchar(abc)"), None);
}

#[test]
fn test_fixed_character_bounds() {
    let bounds = |s: &str| fixed_character_bounds(&DeclaredType::parse(s).unwrap());

    assert_eq!(bounds("char"), Some(StringBounds::bounded(1)));
    assert_eq!(bounds("character(4)"), Some(StringBounds::bounded(4)));
    assert_eq!(bounds("char(x)"), None);
}

#[test]
fn test_string_bounds_constructors() {
    let bounded = StringBounds::bounded(2);
    assert_eq!(bounded.min, 0);
    assert_eq!(bounded.max, Some(2));
    assert!(bounded.is_bounded());
    assert!(!StringBounds::unbounded().is_bounded());
}
