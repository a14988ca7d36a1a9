//! Tests for generator options

use super::*;
use crate::validation::ValidationRule;
use indoc::indoc;
use modelgen_core::ModelgenError;
use pretty_assertions::assert_eq;
use std::io::Write;

#[test]
fn test_defaults() {
    let options = GeneratorOptions::default();
    assert_eq!(options.indentation, 2);
    assert_eq!(options.case_model, CaseOption::Original);
    assert!(!options.validation_enabled());
    assert!(options.validate().is_ok());
}

#[test]
fn test_from_toml() {
    let options = GeneratorOptions::from_toml_str(indoc! {r#"
        dialect = "postgres"
        singularize = true
        caseModel = "p"
        caseProp = "c"
        timestamps = true

        [additional]
        paranoid = true

        [[validationRules]]
        type = "string-length-check"
        message = "{fieldName} is too long"
    "#})
    .unwrap();

    assert_eq!(options.dialect.as_deref(), Some("postgres"));
    assert!(options.singularize);
    assert_eq!(options.case_model, CaseOption::Pascal);
    assert_eq!(options.case_prop, CaseOption::Camel);
    assert!(options.timestamps);
    assert_eq!(options.additional.get("paranoid"), Some(&serde_json::Value::Bool(true)));
    assert_eq!(
        options.validation_rules,
        vec![ValidationRule::string_length_check().with_message("{fieldName} is too long")]
    );
}

#[test]
fn test_from_json() {
    let options = GeneratorOptions::from_json_str(
        r#"{"dialect": "mysql", "validationRules": [{"type": "string-length-check"}], "caseModel": "camel"}"#,
    )
    .unwrap();
    assert_eq!(options.validation_rules.len(), 1);
    assert_eq!(options.case_model, CaseOption::Camel);
}

#[test]
fn test_malformed_rule_rejected() {
    let err = GeneratorOptions::from_toml_str(indoc! {r#"
        [[validationRules]]
        type = "not-a-rule"
    "#})
    .unwrap_err();
    assert!(matches!(err, ModelgenError::Toml(_)));
    assert!(err.is_configuration());

    let err = GeneratorOptions::from_json_str(r#"{"validationRules": [{"message": "x"}]}"#).unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_duplicate_rule_kind_rejected() {
    let options = GeneratorOptions::new()
        .with_validation_rule(ValidationRule::string_length_check())
        .with_validation_rule(ValidationRule::string_length_check().with_message("x"));

    let err = options.validate().unwrap_err();
    assert!(matches!(err, ModelgenError::InvalidValidationRule(_)));
}

#[test]
fn test_zero_indentation_rejected() {
    let err = GeneratorOptions::new().with_indentation(0).validate().unwrap_err();
    assert!(matches!(err, ModelgenError::Configuration(_)));
}

#[test]
fn test_reserved_additional_key_rejected() {
    let err = GeneratorOptions::new()
        .with_additional("tableName", serde_json::json!("x"))
        .validate()
        .unwrap_err();
    assert!(err.is_configuration());
}

#[test]
fn test_load_from_file() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "dialect = \"sqlite\"\nindentation = 4").unwrap();

    let options = GeneratorOptions::load(file.path()).unwrap();
    assert_eq!(options.dialect.as_deref(), Some("sqlite"));
    assert_eq!(options.indent_unit(), "    ");
}

#[test]
fn test_load_json_file() {
    let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(file, r#"{{"dialect": "mssql", "singularize": true}}"#).unwrap();

    let options = GeneratorOptions::load(file.path()).unwrap();
    assert!(options.singularize);
}

#[test]
fn test_load_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = GeneratorOptions::load(dir.path().join("missing.toml")).unwrap_err();
    assert!(matches!(err, ModelgenError::Io(_)));
}

#[test]
fn test_resolve_dialect() {
    let options = GeneratorOptions::new().with_dialect("PostgreSQL");
    assert_eq!(options.resolve_dialect().unwrap().name(), "postgres");

    let err = GeneratorOptions::new().with_dialect("oracle").resolve_dialect().unwrap_err();
    assert!(matches!(err, ModelgenError::UnsupportedDialect(_)));

    let err = GeneratorOptions::new().resolve_dialect().unwrap_err();
    assert!(matches!(err, ModelgenError::Configuration(_)));
}

#[test]
fn test_case_option_from_str() {
    assert_eq!("p".parse::<CaseOption>().unwrap(), CaseOption::Pascal);
    assert_eq!("Upper".parse::<CaseOption>().unwrap(), CaseOption::Upper);
    assert!("kebab".parse::<CaseOption>().is_err());
}
