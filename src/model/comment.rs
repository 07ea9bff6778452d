//! Comment model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::params::Parameters;

use super::attributes::{assign_attributes, Model, Setter};
use super::cast;
use super::errors::ModelResult;

/// A comment on an article. `article_id` stays `None` until associated.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Comment {
    pub id: Option<i64>,
    pub author: Option<String>,
    pub content: Option<String>,
    pub article_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

const SETTERS: &[(&str, Setter<Comment>)] = &[
    ("id", Comment::assign_id),
    ("author", Comment::assign_author),
    ("content", Comment::assign_content),
    ("article_id", Comment::assign_article_id),
    ("created_at", Comment::assign_created_at),
    ("updated_at", Comment::assign_updated_at),
];

impl Comment {
    /// Build an unsaved comment from permitted parameters.
    ///
    /// `article_attributes` is accepted but not applied; use `Database::create_comment`.
    pub fn new(params: &Parameters) -> ModelResult<Self> {
        let mut comment = Self::default();
        comment.assign(params)?;
        Ok(comment)
    }

    pub fn assign(&mut self, params: &Parameters) -> ModelResult<()> {
        assign_attributes(self, params)
    }

    fn assign_id(&mut self, value: &Value) -> ModelResult<()> {
        self.id = cast::integer("id", value)?;
        Ok(())
    }

    fn assign_author(&mut self, value: &Value) -> ModelResult<()> {
        self.author = cast::string("author", value)?;
        Ok(())
    }

    fn assign_content(&mut self, value: &Value) -> ModelResult<()> {
        self.content = cast::string("content", value)?;
        Ok(())
    }

    fn assign_article_id(&mut self, value: &Value) -> ModelResult<()> {
        self.article_id = cast::integer("article_id", value)?;
        Ok(())
    }

    fn assign_created_at(&mut self, value: &Value) -> ModelResult<()> {
        self.created_at = cast::datetime("created_at", value)?;
        Ok(())
    }

    fn assign_updated_at(&mut self, value: &Value) -> ModelResult<()> {
        self.updated_at = cast::datetime("updated_at", value)?;
        Ok(())
    }
}

impl Model for Comment {
    const MODEL_NAME: &'static str = "Comment";
    const TABLE_NAME: &'static str = "comments";

    fn attribute_setters() -> &'static [(&'static str, Setter<Self>)] {
        SETTERS
    }

    fn nested_attribute_keys() -> &'static [&'static str] {
        &["article_attributes"]
    }

    fn id(&self) -> Option<i64> {
        self.id
    }

    fn set_id(&mut self, id: i64) {
        self.id = Some(id);
    }

    fn touch(&mut self, now: DateTime<Utc>, creating: bool) {
        if creating {
            self.created_at.get_or_insert(now);
            self.updated_at.get_or_insert(now);
        } else {
            self.created_at.get_or_insert(now);
            self.updated_at = Some(now);
        }
    }
}
