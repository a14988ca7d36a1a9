//! Association edges derived from foreign keys

use serde::{Deserialize, Serialize};

use crate::{ColumnMap, DialectOptions, ForeignKeyRow, TableData, qualify_table_name, split_table_key};

/// Cardinality hint for an association
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Cardinality {
    /// The source table holds the foreign key
    BelongsTo,
    /// The target table holds a unique foreign key to the source
    HasOne,
    /// The target table holds a foreign key to the source
    HasMany,
    /// Source and target are linked through a join table
    BelongsToMany,
}

/// An association declared on `source_table`
///
/// For `BelongsTo` the foreign key lives on the source table and `target_key`
/// is the referenced column. For `HasOne`/`HasMany` the foreign key lives on
/// the target table and `target_key` is the referenced column on the source.
/// For `BelongsToMany`, `foreign_key` and `target_key` are both columns of the
/// `through` table, referencing source and target respectively.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Relation {
    pub cardinality: Cardinality,
    pub source_table: String,
    pub target_table: String,
    pub foreign_key: String,
    pub target_key: String,
    #[serde(default)]
    pub through: Option<String>,
}

impl Relation {
    pub fn new(
        cardinality: Cardinality,
        source_table: impl Into<String>,
        target_table: impl Into<String>,
        foreign_key: impl Into<String>,
        target_key: impl Into<String>,
    ) -> Self {
        Self {
            cardinality,
            source_table: source_table.into(),
            target_table: target_table.into(),
            foreign_key: foreign_key.into(),
            target_key: target_key.into(),
            through: None,
        }
    }

    pub fn through(mut self, join_table: impl Into<String>) -> Self {
        self.through = Some(join_table.into());
        self
    }

    /// Every table key this relation depends on
    pub fn referenced_tables(&self) -> impl Iterator<Item = &str> {
        [Some(self.source_table.as_str()), Some(self.target_table.as_str()), self.through.as_deref()]
            .into_iter()
            .flatten()
    }
}

impl TableData {
    /// Replace `relations` with the edges derived from the foreign keys
    pub fn derive_relations(&mut self, dialect: &dyn DialectOptions) {
        self.relations = build_relations(self, dialect);
    }
}

/// Derive association edges from the foreign keys in `data`
///
/// Tables are visited in insertion order and key rows in the order they were
/// recorded. Each foreign key yields a `BelongsTo` on the child and a `HasOne`
/// or `HasMany` on the parent. A table whose primary key is made of exactly two
/// foreign keys to distinct tables is treated as a join table and also yields a
/// `BelongsToMany` pair.
pub fn build_relations(data: &TableData, dialect: &dyn DialectOptions) -> Vec<Relation> {
    let has_schema = dialect.has_schema();
    let mut relations = Vec::new();

    for (table, columns) in &data.tables {
        let (table_schema, _) = split_table_key(table, has_schema);
        let foreign_keys: Vec<(&ForeignKeyRow, String)> = data
            .foreign_keys_for(table)
            .iter()
            .filter(|row| row.is_foreign_key())
            .map(|row| (row, parent_table_key(data, row, table_schema, has_schema)))
            .collect();

        for (row, parent) in &foreign_keys {
            let target_key = row.target_column.clone().unwrap_or_else(|| "id".to_string());

            relations.push(Relation::new(
                Cardinality::BelongsTo,
                table.as_str(),
                parent.as_str(),
                row.source_column.as_str(),
                target_key.as_str(),
            ));

            let cardinality = if is_unique_column(data, dialect, table, columns, &row.source_column) {
                Cardinality::HasOne
            } else {
                Cardinality::HasMany
            };
            relations.push(Relation::new(
                cardinality,
                parent.as_str(),
                table.as_str(),
                row.source_column.as_str(),
                target_key,
            ));
        }

        if let [(left, left_parent), (right, right_parent)] = foreign_keys.as_slice() {
            let junction = left_parent != right_parent
                && is_primary_column(data, dialect, table, columns, &left.source_column)
                && is_primary_column(data, dialect, table, columns, &right.source_column);

            if junction {
                tracing::debug!(table = %table, "detected join table");
                relations.push(
                    Relation::new(
                        Cardinality::BelongsToMany,
                        left_parent.as_str(),
                        right_parent.as_str(),
                        left.source_column.as_str(),
                        right.source_column.as_str(),
                    )
                    .through(table.as_str()),
                );
                relations.push(
                    Relation::new(
                        Cardinality::BelongsToMany,
                        right_parent.as_str(),
                        left_parent.as_str(),
                        right.source_column.as_str(),
                        left.source_column.as_str(),
                    )
                    .through(table.as_str()),
                );
            }
        }
    }

    relations
}

/// Resolve the referenced table to a `TableData` key
///
/// An unqualified reference inherits the child's schema. Unknown targets keep
/// their qualified name so the generator can report them as dangling.
fn parent_table_key(
    data: &TableData,
    row: &ForeignKeyRow,
    child_schema: Option<&str>,
    has_schema: bool,
) -> String {
    let target = row.target_table.as_deref().unwrap_or_default();
    let schema = row.target_schema.as_deref().or(child_schema);

    data.resolve_table_key(schema, target, has_schema)
        .unwrap_or_else(|| {
            if has_schema {
                qualify_table_name(schema, target)
            } else {
                target.to_string()
            }
        })
}

fn primary_columns<'a>(
    data: &'a TableData,
    dialect: &dyn DialectOptions,
    table: &str,
    columns: &'a ColumnMap,
) -> Vec<&'a str> {
    let mut primary: Vec<&str> = columns
        .iter()
        .filter(|(_, c)| c.primary_key)
        .map(|(name, _)| name.as_str())
        .collect();

    for row in data.foreign_keys_for(table) {
        if dialect.is_primary_key(row) && !primary.contains(&row.source_column.as_str()) {
            primary.push(row.source_column.as_str());
        }
    }

    primary
}

fn is_primary_column(
    data: &TableData,
    dialect: &dyn DialectOptions,
    table: &str,
    columns: &ColumnMap,
    column: &str,
) -> bool {
    primary_columns(data, dialect, table, columns).contains(&column)
}

fn is_unique_column(
    data: &TableData,
    dialect: &dyn DialectOptions,
    table: &str,
    columns: &ColumnMap,
    column: &str,
) -> bool {
    if primary_columns(data, dialect, table, columns) == [column] {
        return true;
    }

    let key_rows = data.foreign_keys_for(table);
    let unique_key = key_rows
        .iter()
        .filter(|row| row.constraint_type_is("UNIQUE") && row.source_column == column)
        .any(|row| {
            key_rows
                .iter()
                .filter(|other| other.constraint_name == row.constraint_name)
                .count()
                == 1
        });

    unique_key
        || data
            .indexes_for(table)
            .iter()
            .any(|idx| idx.unique && idx.fields.len() == 1 && idx.fields[0] == column)
}
