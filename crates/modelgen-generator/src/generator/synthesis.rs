//! Model definition synthesis
//!
//! Each table becomes a self-contained module exporting a
//! `sequelize.define(...)` call, keyed by the raw table key.

use std::collections::HashSet;
use std::fmt;

use indexmap::IndexMap;
use modelgen_core::{
    Cardinality, ColumnDescriptor, DialectOptions, ForeignKeyRow, IndexDescriptor, Relation,
    Result, TableData, split_table_key,
};

use crate::config::GeneratorOptions;
use crate::validation::{FieldConstraint, FieldContext, Resolution, ValidationResolver};

use super::defaults::render_default_value;
use super::js::{JsValue, member};
use super::naming::{apply_case, js_identifier, singularize, strip_id_suffix};
use super::types::{map_data_type, quote_js};

/// Type rendered for columns no mapping rule classifies
pub const FALLBACK_DATA_TYPE: &str = "DataTypes.STRING";

/// A recoverable problem found while generating
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerateWarning {
    /// Rendered with [`FALLBACK_DATA_TYPE`]
    UnclassifiedType {
        table: String,
        column: String,
        declared_type: String,
    },
    /// Relation skipped because a table it references is not in the snapshot
    DanglingRelation {
        table: String,
        relation: Relation,
        missing_table: String,
    },
    /// Relation skipped because it lacks data its cardinality requires
    MalformedRelation {
        table: String,
        relation: Relation,
        reason: String,
    },
    /// Placeholder left as literal text in a validation message
    UnknownPlaceholder {
        table: String,
        column: String,
        placeholder: String,
    },
}

impl GenerateWarning {
    /// Table key the warning was raised for
    pub fn table(&self) -> &str {
        match self {
            GenerateWarning::UnclassifiedType { table, .. }
            | GenerateWarning::DanglingRelation { table, .. }
            | GenerateWarning::MalformedRelation { table, .. }
            | GenerateWarning::UnknownPlaceholder { table, .. } => table,
        }
    }
}

impl fmt::Display for GenerateWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GenerateWarning::UnclassifiedType {
                table,
                column,
                declared_type,
            } => write!(
                f,
                "{}.{}: unclassified type `{}`, rendered as {}",
                table, column, declared_type, FALLBACK_DATA_TYPE
            ),
            GenerateWarning::DanglingRelation {
                table,
                relation,
                missing_table,
            } => write!(
                f,
                "{}: skipped {:?} relation to {}, table `{}` not found",
                table, relation.cardinality, relation.target_table, missing_table
            ),
            GenerateWarning::MalformedRelation {
                table,
                relation,
                reason,
            } => write!(
                f,
                "{}: skipped {:?} relation to {}, {}",
                table, relation.cardinality, relation.target_table, reason
            ),
            GenerateWarning::UnknownPlaceholder {
                table,
                column,
                placeholder,
            } => write!(
                f,
                "{}.{}: unknown placeholder `{{{}}}` left in validation message",
                table, column, placeholder
            ),
        }
    }
}

/// Output of a generation run
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GeneratedModels {
    /// Table key -> module text, in snapshot order
    pub models: IndexMap<String, String>,
    pub warnings: Vec<GenerateWarning>,
}

impl GeneratedModels {
    pub fn get(&self, table: &str) -> Option<&str> {
        self.models.get(table).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }

    /// Warnings raised for one table
    pub fn warnings_for<'a>(&'a self, table: &'a str) -> impl Iterator<Item = &'a GenerateWarning> {
        self.warnings.iter().filter(move |w| w.table() == table)
    }
}

/// Generate one model definition per table in `data`
///
/// Options are validated first; configuration problems abort before any text
/// is produced. Everything else degrades to a warning.
#[tracing::instrument(skip_all, fields(dialect = dialect.name(), tables = data.tables.len()))]
pub fn generate(
    data: &TableData,
    dialect: &dyn DialectOptions,
    options: &GeneratorOptions,
) -> Result<GeneratedModels> {
    options.validate()?;
    Ok(ModelGenerator::new(dialect, options).generate(data))
}

/// Renders models for one dialect and configuration
pub struct ModelGenerator<'a> {
    dialect: &'a dyn DialectOptions,
    options: &'a GeneratorOptions,
    resolver: ValidationResolver<'a>,
    indent: String,
}

impl<'a> ModelGenerator<'a> {
    /// Options are assumed to be valid; see [`GeneratorOptions::validate`]
    pub fn new(dialect: &'a dyn DialectOptions, options: &'a GeneratorOptions) -> Self {
        Self {
            dialect,
            options,
            resolver: ValidationResolver::new(&options.validation_rules, dialect),
            indent: options.indent_unit(),
        }
    }

    pub fn generate(&self, data: &TableData) -> GeneratedModels {
        let mut result = GeneratedModels::default();

        for table in data.tables.keys() {
            let text = self.generate_table(data, table, &mut result.warnings);
            result.models.insert(table.clone(), text);
        }

        tracing::debug!(
            models = result.models.len(),
            warnings = result.warnings.len(),
            "generation finished"
        );
        result
    }

    /// Model name for a table key: schema dropped, optionally singularized, cased
    pub fn model_name(&self, table: &str) -> String {
        let (_, bare) = split_table_key(table, self.dialect.has_schema());
        let name = if self.options.singularize {
            singularize(bare)
        } else {
            bare.to_string()
        };
        apply_case(&name, self.options.case_model)
    }

    pub fn property_name(&self, column: &str) -> String {
        apply_case(column, self.options.case_prop)
    }

    /// Render the module for a single table
    pub fn generate_table(&self, data: &TableData, table: &str, warnings: &mut Vec<GenerateWarning>) -> String {
        let model = self.model_name(table);
        let var = js_identifier(&model);
        let unit = self.indent.as_str();

        let fields: Vec<(String, JsValue)> = data
            .columns(table)
            .into_iter()
            .flatten()
            .map(|(name, column)| {
                (
                    self.property_name(name),
                    self.field_definition(data, table, name, column, warnings),
                )
            })
            .collect();

        let mut out = String::new();
        out.push_str("const Sequelize = require('sequelize');\n");
        out.push_str("module.exports = function(sequelize, DataTypes) {\n");
        out.push_str(&format!(
            "{}const {} = sequelize.define({}, {}, {});\n",
            unit,
            var,
            quote_js(&model),
            JsValue::Object(fields).render(unit, 1),
            self.model_options(data, table).render(unit, 1)
        ));

        let associations = self.associations(data, table, &var, warnings);
        if !associations.is_empty() {
            out.push_str(&format!("{}{}.associate = function(models) {{\n", unit, var));
            for line in &associations {
                out.push_str(&format!("{}{};\n", unit.repeat(2), line));
            }
            out.push_str(&format!("{}}};\n", unit));
        }

        out.push_str(&format!("{}return {};\n", unit, var));
        out.push_str("};\n");

        tracing::debug!(table = %table, model = %model, associations = associations.len(), "generated model");
        out
    }

    fn field_definition(
        &self,
        data: &TableData,
        table: &str,
        column_name: &str,
        column: &ColumnDescriptor,
        warnings: &mut Vec<GenerateWarning>,
    ) -> JsValue {
        let key_rows: Vec<&ForeignKeyRow> = data
            .foreign_keys_for(table)
            .iter()
            .filter(|row| row.source_column == column_name)
            .collect();

        let primary = column.primary_key || key_rows.iter().any(|row| self.dialect.is_primary_key(row));
        let mut column_row = ForeignKeyRow::from_column(table, column_name, column);
        if primary {
            column_row.constraint_type = Some("PRIMARY KEY".to_string());
        }
        let serial = self.dialect.is_serial_key(&column_row)
            || key_rows.iter().any(|row| self.dialect.is_serial_key(row));

        let mut entries: Vec<(String, JsValue)> = Vec::new();
        if serial {
            entries.push(("autoIncrement".to_string(), JsValue::bool(true)));
        }

        let data_type = map_data_type(&column.data_type).unwrap_or_else(|| {
            push_warning(
                warnings,
                GenerateWarning::UnclassifiedType {
                    table: table.to_string(),
                    column: column_name.to_string(),
                    declared_type: column.data_type.clone(),
                },
            );
            FALLBACK_DATA_TYPE.to_string()
        });
        entries.push(("type".to_string(), JsValue::raw(data_type)));
        entries.push((
            "allowNull".to_string(),
            JsValue::bool(column.allow_null && !primary),
        ));

        if let Some(default) = column
            .default_value
            .as_deref()
            .and_then(|d| render_default_value(d, &column.data_type, self.dialect))
        {
            entries.push(("defaultValue".to_string(), JsValue::raw(default)));
        }

        if primary {
            entries.push(("primaryKey".to_string(), JsValue::bool(true)));
        }

        if let Some(row) = key_rows.iter().find(|row| row.is_foreign_key()) {
            entries.push(("references".to_string(), self.references(row)));
        }

        if let Some(comment) = column.comment.as_deref().filter(|c| !c.is_empty()) {
            entries.push(("comment".to_string(), JsValue::string(comment)));
        }

        if self.property_name(column_name) != column_name {
            entries.push(("field".to_string(), JsValue::string(column_name)));
        }

        if let Some(validate) = self.validators(table, column_name, column, warnings) {
            entries.push(("validate".to_string(), validate));
        }

        JsValue::Object(entries)
    }

    fn references(&self, row: &ForeignKeyRow) -> JsValue {
        let target = row.target_table.as_deref().unwrap_or_default();
        let model = match row.target_schema.as_deref().filter(|_| self.dialect.has_schema()) {
            Some(schema) => JsValue::Inline(vec![
                ("tableName".to_string(), JsValue::string(target)),
                ("schema".to_string(), JsValue::string(schema)),
            ]),
            None => JsValue::string(target),
        };

        JsValue::Inline(vec![
            ("model".to_string(), model),
            (
                "key".to_string(),
                JsValue::string(row.target_column.as_deref().unwrap_or("id")),
            ),
        ])
    }

    fn validators(
        &self,
        table: &str,
        column_name: &str,
        column: &ColumnDescriptor,
        warnings: &mut Vec<GenerateWarning>,
    ) -> Option<JsValue> {
        if !self.resolver.is_enabled() {
            return None;
        }

        let field = FieldContext {
            table_name: table,
            field_name: column_name,
            declared_type: &column.data_type,
        };

        let mut validators = Vec::new();
        for resolution in self.resolver.resolve(&field) {
            let Resolution::Emitted {
                constraint,
                unknown_placeholders,
            } = resolution
            else {
                continue;
            };

            for placeholder in unknown_placeholders {
                push_warning(
                    warnings,
                    GenerateWarning::UnknownPlaceholder {
                        table: table.to_string(),
                        column: column_name.to_string(),
                        placeholder,
                    },
                );
            }
            validators.push((constraint.validator_name().to_string(), constraint_value(&constraint)));
        }

        (!validators.is_empty()).then_some(JsValue::Object(validators))
    }

    fn model_options(&self, data: &TableData, table: &str) -> JsValue {
        let (schema, bare) = split_table_key(table, self.dialect.has_schema());

        let mut entries = vec![
            ("sequelize".to_string(), JsValue::Shorthand),
            ("tableName".to_string(), JsValue::string(bare)),
        ];
        if let Some(schema) = schema {
            entries.push(("schema".to_string(), JsValue::string(schema)));
        }
        if data.has_triggers(table) {
            entries.push(("hasTrigger".to_string(), JsValue::bool(true)));
        }
        entries.push(("timestamps".to_string(), JsValue::bool(self.options.timestamps)));

        for (key, value) in &self.options.additional {
            entries.push((key.clone(), JsValue::raw(value.to_string())));
        }

        let indexes = data.indexes_for(table);
        if !indexes.is_empty() {
            entries.push((
                "indexes".to_string(),
                JsValue::Array(indexes.iter().map(index_value).collect()),
            ));
        }

        JsValue::Object(entries)
    }

    fn associations(
        &self,
        data: &TableData,
        table: &str,
        var: &str,
        warnings: &mut Vec<GenerateWarning>,
    ) -> Vec<String> {
        // Association names may not shadow attribute names
        let mut aliases: HashSet<String> = data
            .columns(table)
            .into_iter()
            .flatten()
            .map(|(name, _)| self.property_name(name))
            .collect();
        let mut lines = Vec::new();

        for relation in data.relations.iter().filter(|r| r.source_table == table) {
            if let Some(missing) = relation.referenced_tables().find(|t| !data.contains_table(t)) {
                push_warning(
                    warnings,
                    GenerateWarning::DanglingRelation {
                        table: table.to_string(),
                        relation: relation.clone(),
                        missing_table: missing.to_string(),
                    },
                );
                continue;
            }

            match self.association(relation, var, &mut aliases) {
                Ok(line) => lines.push(line),
                Err(reason) => push_warning(
                    warnings,
                    GenerateWarning::MalformedRelation {
                        table: table.to_string(),
                        relation: relation.clone(),
                        reason,
                    },
                ),
            }
        }

        lines
    }

    fn association(
        &self,
        relation: &Relation,
        var: &str,
        aliases: &mut HashSet<String>,
    ) -> std::result::Result<String, String> {
        let unit = self.indent.as_str();
        let target = member("models", &js_identifier(&self.model_name(&relation.target_table)));
        let (_, target_bare) = split_table_key(&relation.target_table, self.dialect.has_schema());
        let foreign_key = JsValue::string(&self.property_name(&relation.foreign_key));

        let (method, alias_base, mut entries) = match relation.cardinality {
            Cardinality::BelongsTo => {
                let stem = strip_id_suffix(&relation.foreign_key);
                let base = if stem == relation.foreign_key {
                    singularize(target_bare)
                } else {
                    stem.to_string()
                };
                let mut entries = vec![("foreignKey".to_string(), foreign_key)];
                if relation.target_key != "id" {
                    entries.push((
                        "targetKey".to_string(),
                        JsValue::string(&self.property_name(&relation.target_key)),
                    ));
                }
                ("belongsTo", base, entries)
            }
            Cardinality::HasOne | Cardinality::HasMany => {
                let (method, base) = if relation.cardinality == Cardinality::HasOne {
                    ("hasOne", singularize(target_bare))
                } else {
                    ("hasMany", target_bare.to_string())
                };
                let mut entries = vec![("foreignKey".to_string(), foreign_key)];
                if relation.target_key != "id" {
                    entries.push((
                        "sourceKey".to_string(),
                        JsValue::string(&self.property_name(&relation.target_key)),
                    ));
                }
                (method, base, entries)
            }
            Cardinality::BelongsToMany => {
                let through = relation
                    .through
                    .as_deref()
                    .ok_or_else(|| "belongsToMany relation has no join table".to_string())?;
                let through_model = member("models", &js_identifier(&self.model_name(through)));
                (
                    "belongsToMany",
                    target_bare.to_string(),
                    vec![
                        ("through".to_string(), JsValue::raw(through_model)),
                        ("foreignKey".to_string(), foreign_key),
                        (
                            "otherKey".to_string(),
                            JsValue::string(&self.property_name(&relation.target_key)),
                        ),
                    ],
                )
            }
        };

        let fallback = if alias_base == relation.foreign_key {
            format!("{}_{}", relation.foreign_key, target_bare)
        } else {
            format!("{}_{}", alias_base, relation.foreign_key)
        };
        let alias = self.unique_alias(&alias_base, &fallback, aliases);
        entries.insert(0, ("as".to_string(), JsValue::string(&alias)));

        Ok(format!(
            "{}.{}({}, {})",
            var,
            method,
            target,
            JsValue::Inline(entries).render(unit, 0)
        ))
    }

    /// Aliases must be unique per model and distinct from its attributes;
    /// collisions fall back to a foreign-key-qualified name, then a numeric suffix
    fn unique_alias(&self, base: &str, fallback: &str, aliases: &mut HashSet<String>) -> String {
        let mut alias = self.property_name(base);
        if aliases.contains(&alias) {
            alias = self.property_name(fallback);
        }

        let candidate = alias.clone();
        let mut n = 2;
        while aliases.contains(&alias) {
            alias = format!("{}{}", candidate, n);
            n += 1;
        }

        aliases.insert(alias.clone());
        alias
    }
}

fn constraint_value(constraint: &FieldConstraint) -> JsValue {
    match constraint {
        FieldConstraint::Length { min, max, message } => JsValue::Object(vec![
            ("args".to_string(), JsValue::raw(format!("[{}, {}]", min, max))),
            ("msg".to_string(), JsValue::string(message)),
        ]),
    }
}

fn index_value(index: &IndexDescriptor) -> JsValue {
    let mut entries = vec![("name".to_string(), JsValue::string(&index.name))];
    if index.unique {
        entries.push(("unique".to_string(), JsValue::bool(true)));
    }
    entries.push((
        "fields".to_string(),
        JsValue::Array(
            index
                .fields
                .iter()
                .map(|field| JsValue::Inline(vec![("name".to_string(), JsValue::string(field))]))
                .collect(),
        ),
    ));
    JsValue::Object(entries)
}

fn push_warning(warnings: &mut Vec<GenerateWarning>, warning: GenerateWarning) {
    tracing::warn!(table = %warning.table(), "{}", warning);
    warnings.push(warning);
}
