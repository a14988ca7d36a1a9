//! Common test fixtures and a fake introspection driver

#![allow(dead_code)]

use std::cell::RefCell;

use modelgen_core::{ColumnDescriptor, DialectOptions, RawRow, Result, TableData, split_table_key};
use modelgen_generator::{GeneratorOptions, ValidationRule};

/// Stands in for a live connection: returns canned rows for any query that
/// contains a registered pattern and records every query it is asked to run.
#[derive(Default)]
pub struct FakeDriver {
    responses: Vec<(String, Vec<RawRow>)>,
    pub query_log: RefCell<Vec<String>>,
}

impl FakeDriver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn respond(mut self, pattern: impl Into<String>, rows: Vec<serde_json::Value>) -> Self {
        let rows = rows
            .into_iter()
            .map(|row| row.as_object().cloned().expect("row must be a JSON object"))
            .collect();
        self.responses.push((pattern.into(), rows));
        self
    }

    pub fn query(&self, sql: &str) -> Vec<RawRow> {
        self.query_log.borrow_mut().push(sql.to_string());
        self.responses
            .iter()
            .find(|(pattern, _)| sql.contains(pattern.as_str()))
            .map(|(_, rows)| rows.clone())
            .unwrap_or_default()
    }

    /// Run the dialect's key query for a table and record the remapped rows
    pub fn load_foreign_keys(
        &self,
        data: &mut TableData,
        dialect: &dyn DialectOptions,
        table_key: &str,
    ) -> Result<()> {
        let (schema, table) = split_table_key(table_key, dialect.has_schema());
        let sql = dialect.foreign_keys_query(table, schema);
        for raw in self.query(&sql) {
            let row = dialect.remap_foreign_key_row(table, &raw)?;
            data.add_foreign_key(table_key, row)?;
        }
        Ok(())
    }
}

/// Options with a single string length rule
pub fn length_check_options(message: Option<&str>) -> GeneratorOptions {
    let rule = match message {
        Some(template) => ValidationRule::string_length_check().with_message(template),
        None => ValidationRule::string_length_check(),
    };
    GeneratorOptions::new().with_validation_rule(rule)
}

/// A snapshot holding one table with the given columns
pub fn single_table(key: &str, columns: Vec<(&str, ColumnDescriptor)>) -> TableData {
    let mut data = TableData::new();
    data.add_table(key, columns).expect("fixture table");
    data
}

/// A field definition, dedented to its own indentation
pub fn field_block(model: &str, property: &str) -> String {
    let header = format!("{}: {{", property);
    block(model, |line| line == header)
        .unwrap_or_else(|| panic!("field {} not found in:\n{}", property, model))
}

/// The model options object, from `}, {` to `});`
pub fn options_block(model: &str) -> String {
    block(model, |line| line == "}, {")
        .unwrap_or_else(|| panic!("model options not found in:\n{}", model))
}

/// The `associate` function, if the model declares one
pub fn associate_block(model: &str) -> Option<String> {
    block(model, |line| line.ends_with(".associate = function(models) {"))
}

/// Lines from the first one matching `start` (compared without indentation)
/// to the next line at the same depth that closes a brace, dedented
fn block(model: &str, start: impl Fn(&str) -> bool) -> Option<String> {
    let lines: Vec<&str> = model.lines().collect();
    let first = lines.iter().position(|line| start(line.trim_start()))?;
    let indent = lines[first].len() - lines[first].trim_start().len();

    let last = lines[first + 1..]
        .iter()
        .position(|line| {
            let trimmed = line.trim_start();
            line.len() - trimmed.len() == indent && trimmed.starts_with('}')
        })
        .map(|i| first + 1 + i)?;

    Some(
        lines[first..=last]
            .iter()
            .map(|line| line.get(indent..).unwrap_or_default())
            .collect::<Vec<_>>()
            .join("\n"),
    )
}
