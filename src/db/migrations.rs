//! Versioned schema migrations
//!
//! Applied in version order; each version runs at most once per schema.

use std::fmt;

use super::errors::{DbError, DbResult};
use super::schema::{Schema, TableDef};

/// A single forward migration
#[derive(Clone, Copy)]
pub struct Migration {
    pub version: u64,
    pub name: &'static str,
    pub up: fn(&mut Schema) -> Result<(), String>,
}

impl fmt::Debug for Migration {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Migration")
            .field("version", &self.version)
            .field("name", &self.name)
            .finish_non_exhaustive()
    }
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: 20150104000001,
        name: "CreateArticles",
        up: create_articles,
    },
    Migration {
        version: 20150104000002,
        name: "CreateComments",
        up: create_comments,
    },
];

fn create_articles(schema: &mut Schema) -> Result<(), String> {
    schema.create_table(
        TableDef::new("articles")
            .string("title")
            .integer("rank")
            .text("body")
            .timestamps(),
    )
}

fn create_comments(schema: &mut Schema) -> Result<(), String> {
    schema.create_table(
        TableDef::new("comments")
            .string("author")
            .text("content")
            .references("article")
            .timestamps(),
    )
}

/// Every known migration, in version order
pub fn all() -> &'static [Migration] {
    MIGRATIONS
}

/// Apply pending `migrations` to `schema`; returns the applied ones
pub fn migrate(schema: &mut Schema, migrations: &[Migration]) -> DbResult<Vec<Migration>> {
    let mut pending: Vec<Migration> = migrations
        .iter()
        .filter(|m| !schema.is_applied(m.version))
        .copied()
        .collect();
    pending.sort_by_key(|m| m.version);

    for migration in &pending {
        (migration.up)(schema).map_err(|reason| DbError::MigrationFailed {
            version: migration.version,
            reason,
        })?;
        schema.mark_applied(migration.version);
    }

    Ok(pending)
}
