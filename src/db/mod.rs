//! Persistence layer
//!
//! An in-memory stand-in for the object-relational mapper:
//!
//! - `schema` / `migrations`: the `articles` and `comments` tables
//! - `Database`: guarded create/update, nested attributes, transactions
//!
//! # Nested attributes
//!
//! - `Article` accepts `comments_attributes` (one-to-many)
//! - `Comment` accepts `article_attributes` (belongs-to)
//!
//! An entry with an `id` updates the matching associated record; without
//! one, a new record is created and associated.

mod database;
mod errors;
pub mod migrations;
mod nested;
mod schema;
mod table;

pub use database::Database;
pub use errors::{DbError, DbResult};
pub use migrations::Migration;
pub use schema::{ColumnDef, ColumnType, Schema, TableDef};
