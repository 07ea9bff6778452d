//! Models and mass assignment
//!
//! `Article` and `Comment` accept attribute trees only through
//! `assign_attributes`, which enforces the permitted flag before looking
//! at any key.

mod article;
mod attributes;
pub mod cast;
mod comment;
mod errors;

pub use article::Article;
pub use attributes::{assign_attributes, Model, Setter};
pub use comment::Comment;
pub use errors::{ModelError, ModelResult};
