//! Table definitions produced by migrations

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;

use crate::model::Model;

use super::errors::{DbError, DbResult};

/// Column storage types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    PrimaryKey,
    String,
    Text,
    Integer,
    DateTime,
    /// Foreign key to another table's primary key
    References,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ColumnDef {
    pub name: String,
    #[serde(rename = "type")]
    pub column_type: ColumnType,
    pub null: bool,
}

/// A table and its columns, in declaration order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TableDef {
    pub name: String,
    pub columns: Vec<ColumnDef>,
}

impl TableDef {
    /// New table with an `id` primary key
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: vec![ColumnDef {
                name: "id".into(),
                column_type: ColumnType::PrimaryKey,
                null: false,
            }],
        }
    }

    fn column(mut self, name: impl Into<String>, column_type: ColumnType, null: bool) -> Self {
        self.columns.push(ColumnDef {
            name: name.into(),
            column_type,
            null,
        });
        self
    }

    pub fn string(self, name: &str) -> Self {
        self.column(name, ColumnType::String, true)
    }

    pub fn text(self, name: &str) -> Self {
        self.column(name, ColumnType::Text, true)
    }

    pub fn integer(self, name: &str) -> Self {
        self.column(name, ColumnType::Integer, true)
    }

    /// Nullable `<association>_id` foreign key
    pub fn references(self, association: &str) -> Self {
        self.column(format!("{}_id", association), ColumnType::References, true)
    }

    /// `created_at` / `updated_at`
    pub fn timestamps(self) -> Self {
        self.column("created_at", ColumnType::DateTime, false)
            .column("updated_at", ColumnType::DateTime, false)
    }

    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.columns.iter().any(|c| c.name == name)
    }
}

/// Migrated tables plus the versions applied to reach them
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Schema {
    tables: BTreeMap<String, TableDef>,
    #[serde(rename = "schema_migrations")]
    versions: BTreeSet<u64>,
}

impl Schema {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a table; fails if the name is taken
    pub fn create_table(&mut self, table: TableDef) -> Result<(), String> {
        if self.tables.contains_key(&table.name) {
            return Err(format!("table '{}' already exists", table.name));
        }
        self.tables.insert(table.name.clone(), table);
        Ok(())
    }

    pub fn table(&self, name: &str) -> Option<&TableDef> {
        self.tables.get(name)
    }

    pub fn tables(&self) -> impl Iterator<Item = &TableDef> {
        self.tables.values()
    }

    pub fn versions(&self) -> impl Iterator<Item = u64> + '_ {
        self.versions.iter().copied()
    }

    pub fn is_applied(&self, version: u64) -> bool {
        self.versions.contains(&version)
    }

    pub(crate) fn mark_applied(&mut self, version: u64) {
        self.versions.insert(version);
    }

    /// Check that `M`'s declared attributes are exactly its table's columns
    pub fn verify_model<M: Model>(&self) -> DbResult<()> {
        let table = self.table(M::TABLE_NAME).ok_or_else(|| DbError::SchemaMismatch {
            table: M::TABLE_NAME.to_string(),
            reason: "table does not exist".into(),
        })?;

        let columns: BTreeSet<&str> = table.column_names().into_iter().collect();
        let attributes: BTreeSet<&str> = M::attribute_names().into_iter().collect();

        if let Some(missing) = attributes.difference(&columns).next() {
            return Err(DbError::SchemaMismatch {
                table: M::TABLE_NAME.to_string(),
                reason: format!("{} declares '{}' but no such column", M::MODEL_NAME, missing),
            });
        }
        if let Some(extra) = columns.difference(&attributes).next() {
            return Err(DbError::SchemaMismatch {
                table: M::TABLE_NAME.to_string(),
                reason: format!("column '{}' has no {} attribute", extra, M::MODEL_NAME),
            });
        }

        Ok(())
    }
}
