//! Article model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::params::Parameters;

use super::attributes::{assign_attributes, Model, Setter};
use super::cast;
use super::errors::ModelResult;

/// A blog article. Owns zero or more comments through `comments.article_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Article {
    pub id: Option<i64>,
    pub title: Option<String>,
    pub rank: Option<i64>,
    pub body: Option<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

const SETTERS: &[(&str, Setter<Article>)] = &[
    ("id", Article::assign_id),
    ("title", Article::assign_title),
    ("rank", Article::assign_rank),
    ("body", Article::assign_body),
    ("created_at", Article::assign_created_at),
    ("updated_at", Article::assign_updated_at),
];

impl Article {
    /// Build an unsaved article from permitted parameters.
    ///
    /// `comments_attributes` is accepted but not applied; use `Database::create_article`.
    pub fn new(params: &Parameters) -> ModelResult<Self> {
        let mut article = Self::default();
        article.assign(params)?;
        Ok(article)
    }

    pub fn assign(&mut self, params: &Parameters) -> ModelResult<()> {
        assign_attributes(self, params)
    }

    pub fn is_persisted(&self) -> bool {
        self.id.is_some()
    }

    fn assign_id(&mut self, value: &Value) -> ModelResult<()> {
        self.id = cast::integer("id", value)?;
        Ok(())
    }

    fn assign_title(&mut self, value: &Value) -> ModelResult<()> {
        self.title = cast::string("title", value)?;
        Ok(())
    }

    fn assign_rank(&mut self, value: &Value) -> ModelResult<()> {
        self.rank = cast::integer("rank", value)?;
        Ok(())
    }

    fn assign_body(&mut self, value: &Value) -> ModelResult<()> {
        self.body = cast::string("body", value)?;
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

impl Model for Article {
    const MODEL_NAME: &'static str = "Article";
    const TABLE_NAME: &'static str = "articles";

    fn attribute_setters() -> &'static [(&'static str, Setter<Self>)] {
        SETTERS
    }

    fn nested_attribute_keys() -> &'static [&'static str] {
        &["comments_attributes"]
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
