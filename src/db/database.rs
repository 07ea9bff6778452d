//! In-memory database for articles and comments
//!
//! Every write goes through the mass-assignment guards and runs in a
//! transaction: on error both tables are restored and no events from the
//! failed write are emitted.

use std::sync::Arc;

use chrono::Utc;

use crate::model::{Article, Comment, Model, ModelError};
use crate::observability::{default_sink, Event, EventRecord, EventSink};
use crate::params::Parameters;

use super::errors::{DbError, DbResult};
use super::migrations::{self, Migration};
use super::nested::{collection_entries, single_entry, NestedEntry};
use super::schema::Schema;
use super::table::Table;

const COMMENTS_ATTRIBUTES: &str = "comments_attributes";
const ARTICLE_ATTRIBUTES: &str = "article_attributes";

/// Migrated schema plus the article and comment tables
#[derive(Debug)]
pub struct Database {
    schema: Schema,
    articles: Table<Article>,
    comments: Table<Comment>,
    sink: Arc<dyn EventSink>,
    pending_events: Vec<EventRecord>,
}

impl Database {
    /// Fully migrated database logging to the default sink
    pub fn new() -> DbResult<Self> {
        Self::with_sink(default_sink())
    }

    /// Fully migrated database emitting events to `sink`
    pub fn with_sink(sink: Arc<dyn EventSink>) -> DbResult<Self> {
        Self::with_migrations(migrations::all(), sink)
    }

    /// Database migrated with an explicit migration set.
    ///
    /// # Errors
    ///
    /// `MigrationFailed` if a migration cannot apply, `SchemaMismatch` if
    /// the resulting tables disagree with the models.
    pub fn with_migrations(migrations: &[Migration], sink: Arc<dyn EventSink>) -> DbResult<Self> {
        let mut schema = Schema::new();

        for migration in migrations::migrate(&mut schema, migrations)? {
            sink.emit(
                EventRecord::new(Event::MigrationApplied)
                    .with_field("name", migration.name)
                    .with_field("version", migration.version.to_string()),
            );
        }

        schema.verify_model::<Article>()?;
        schema.verify_model::<Comment>()?;

        Ok(Self {
            schema,
            articles: Table::default(),
            comments: Table::default(),
            sink,
            pending_events: Vec::new(),
        })
    }

    pub fn schema(&self) -> &Schema {
        &self.schema
    }

    // ==================
    // Reads
    // ==================

    pub fn find_article(&self, id: i64) -> DbResult<&Article> {
        self.articles.find(id)
    }

    pub fn find_comment(&self, id: i64) -> DbResult<&Comment> {
        self.comments.find(id)
    }

    /// All articles, ordered by id
    pub fn articles(&self) -> impl Iterator<Item = &Article> {
        self.articles.values()
    }

    /// Comments whose `article_id` is `article_id`, ordered by id
    pub fn comments_for_article(&self, article_id: i64) -> Vec<&Comment> {
        self.comments
            .values()
            .filter(|c| c.article_id == Some(article_id))
            .collect()
    }

    pub fn article_count(&self) -> usize {
        self.articles.len()
    }

    pub fn comment_count(&self) -> usize {
        self.comments.len()
    }

    // ==================
    // Writes
    // ==================

    /// Create an article, plus any `comments_attributes`
    pub fn create_article(&mut self, params: &Parameters) -> DbResult<Article> {
        self.transaction(|db| db.insert_article(params))
    }

    /// Update article `id`, creating or updating any `comments_attributes`
    pub fn update_article(&mut self, id: i64, params: &Parameters) -> DbResult<Article> {
        self.transaction(|db| db.modify_article(id, params))
    }

    /// Create a comment, plus any `article_attributes`
    pub fn create_comment(&mut self, params: &Parameters) -> DbResult<Comment> {
        self.transaction(|db| db.insert_comment(params))
    }

    /// Update comment `id`, creating or updating any `article_attributes`
    pub fn update_comment(&mut self, id: i64, params: &Parameters) -> DbResult<Comment> {
        self.transaction(|db| db.modify_comment(id, params))
    }

    fn transaction<T>(&mut self, op: impl FnOnce(&mut Self) -> DbResult<T>) -> DbResult<T> {
        let articles = self.articles.clone();
        let comments = self.comments.clone();

        match op(self) {
            Ok(value) => {
                for record in self.pending_events.drain(..) {
                    self.sink.emit(record);
                }
                Ok(value)
            }
            Err(err) => {
                self.articles = articles;
                self.comments = comments;
                self.pending_events.clear();
                self.sink.emit(
                    EventRecord::new(Event::RecordRejected)
                        .with_field("code", err.code())
                        .with_field("error", err.to_string()),
                );
                Err(err)
            }
        }
    }

    fn record_event<M: Model>(&mut self, event: Event, record: &M) {
        let id = record.id().map(|id| id.to_string()).unwrap_or_default();
        self.pending_events.push(
            EventRecord::new(event)
                .with_field("id", id)
                .with_field("model", M::MODEL_NAME),
        );
    }

    fn insert_article(&mut self, params: &Parameters) -> DbResult<Article> {
        ensure_permitted(params)?;

        let mut article = Article::new(&params.except(Article::nested_attribute_keys()))?;
        article.touch(Utc::now(), true);
        let article = self.articles.insert(article)?;
        self.record_event(Event::RecordCreated, &article);

        self.assign_comments(&article, params)?;
        Ok(article)
    }

    fn modify_article(&mut self, id: i64, params: &Parameters) -> DbResult<Article> {
        ensure_permitted(params)?;

        let mut article = self.articles.find(id)?.clone();
        article.assign(&params.except(Article::nested_attribute_keys()))?;
        article.touch(Utc::now(), false);
        let article = self.articles.replace(id, article)?;
        self.record_event(Event::RecordUpdated, &article);

        self.assign_comments(&article, params)?;
        Ok(article)
    }

    fn insert_comment(&mut self, params: &Parameters) -> DbResult<Comment> {
        ensure_permitted(params)?;

        let mut comment = Comment::new(&params.except(Comment::nested_attribute_keys()))?;
        self.assign_article(&mut comment, params)?;
        comment.touch(Utc::now(), true);
        let comment = self.comments.insert(comment)?;
        self.record_event(Event::RecordCreated, &comment);

        Ok(comment)
    }

    fn modify_comment(&mut self, id: i64, params: &Parameters) -> DbResult<Comment> {
        ensure_permitted(params)?;

        let mut comment = self.comments.find(id)?.clone();
        comment.assign(&params.except(Comment::nested_attribute_keys()))?;
        self.assign_article(&mut comment, params)?;
        comment.touch(Utc::now(), false);
        let comment = self.comments.replace(id, comment)?;
        self.record_event(Event::RecordUpdated, &comment);

        Ok(comment)
    }

    /// Create or update comments from `comments_attributes`
    fn assign_comments(&mut self, article: &Article, params: &Parameters) -> DbResult<()> {
        let Some(value) = params.get(COMMENTS_ATTRIBUTES) else {
            return Ok(());
        };
        let article_id = article
            .id
            .ok_or_else(|| DbError::not_found(Article::MODEL_NAME, ""))?;

        for entry in collection_entries(params, COMMENTS_ATTRIBUTES, value)? {
            match &entry.id {
                Some(_) => self.update_nested_comment(article_id, &entry)?,
                None => self.create_nested_comment(article_id, &entry)?,
            }
        }

        Ok(())
    }

    fn update_nested_comment(&mut self, article_id: i64, entry: &NestedEntry) -> DbResult<()> {
        let not_found = || {
            DbError::not_found_for(
                Comment::MODEL_NAME,
                entry.id_label(),
                Article::MODEL_NAME,
                Some(article_id),
            )
        };

        let id = entry.integer_id().ok_or_else(not_found)?;
        let mut comment = match self.comments.get(id) {
            Some(c) if c.article_id == Some(article_id) => c.clone(),
            _ => return Err(not_found()),
        };

        comment.assign(&entry.attributes)?;
        comment.touch(Utc::now(), false);
        let comment = self.comments.replace(id, comment)?;
        self.record_event(Event::RecordUpdated, &comment);
        Ok(())
    }

    fn create_nested_comment(&mut self, article_id: i64, entry: &NestedEntry) -> DbResult<()> {
        let mut comment = Comment::new(&entry.attributes)?;
        comment.article_id = Some(article_id);
        comment.touch(Utc::now(), true);
        let comment = self.comments.insert(comment)?;
        self.record_event(Event::RecordCreated, &comment);
        Ok(())
    }

    /// Create or update the comment's article from `article_attributes`
    fn assign_article(&mut self, comment: &mut Comment, params: &Parameters) -> DbResult<()> {
        let Some(value) = params.get(ARTICLE_ATTRIBUTES) else {
            return Ok(());
        };
        let entry = single_entry(params, ARTICLE_ATTRIBUTES, value)?;

        let existing = comment
            .article_id
            .and_then(|id| self.articles.get(id))
            .cloned();

        match (&entry.id, existing) {
            (Some(_), Some(mut article)) if article.id.is_some() && article.id == entry.integer_id() => {
                let id = article.id.unwrap_or_default();
                article.assign(&entry.attributes)?;
                article.touch(Utc::now(), false);
                let article = self.articles.replace(id, article)?;
                comment.article_id = article.id;
                self.record_event(Event::RecordUpdated, &article);
            }
            (Some(_), _) => {
                return Err(DbError::not_found_for(
                    Article::MODEL_NAME,
                    entry.id_label(),
                    Comment::MODEL_NAME,
                    comment.id,
                ));
            }
            (None, _) => {
                let mut article = Article::new(&entry.attributes)?;
                article.touch(Utc::now(), true);
                let article = self.articles.insert(article)?;
                comment.article_id = article.id;
                self.record_event(Event::RecordCreated, &article);
            }
        }

        Ok(())
    }
}

fn ensure_permitted(params: &Parameters) -> DbResult<()> {
    if params.permitted() {
        Ok(())
    } else {
        Err(ModelError::ForbiddenAttributes.into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observability::MemorySink;
    use serde_json::json;

    fn database() -> (Database, MemorySink) {
        let sink = MemorySink::new();
        let db = Database::with_sink(Arc::new(sink.clone())).unwrap();
        (db, sink)
    }

    fn permitted(value: serde_json::Value) -> Parameters {
        Parameters::from_value(value).permit_all()
    }

    #[test]
    fn test_new_database_is_migrated() {
        let (db, sink) = database();
        assert_eq!(db.schema().versions().count(), 2);
        assert_eq!(sink.of(Event::MigrationApplied).len(), 2);
    }

    #[test]
    fn test_bad_migration_set_fails_verification() {
        let only_articles = &migrations::all()[..1];
        let err = Database::with_migrations(only_articles, Arc::new(MemorySink::new())).unwrap_err();
        assert!(matches!(err, DbError::SchemaMismatch { ref table, .. } if table == "comments"));
    }

    #[test]
    fn test_create_article_sets_id_and_timestamps() {
        let (mut db, sink) = database();
        let article = db
            .create_article(&permitted(json!({"title": "Test", "body": "test body"})))
            .unwrap();

        assert_eq!(article.id, Some(1));
        assert!(article.created_at.is_some());
        assert_eq!(article.created_at, article.updated_at);
        assert_eq!(db.find_article(1).unwrap(), &article);

        let created = sink.of(Event::RecordCreated);
        assert_eq!(created.len(), 1);
        assert_eq!(created[0].field("model"), Some("Article"));
    }

    #[test]
    fn test_unpermitted_write_is_forbidden() {
        let (mut db, sink) = database();
        let raw = Parameters::from_value(json!({"title": "Test"}));

        assert_eq!(
            db.create_article(&raw),
            Err(DbError::Model(ModelError::ForbiddenAttributes))
        );
        assert_eq!(db.article_count(), 0);
        assert_eq!(sink.of(Event::RecordRejected).len(), 1);
    }

    #[test]
    fn test_update_article() {
        let (mut db, _) = database();
        db.create_article(&permitted(json!({"title": "Old"}))).unwrap();

        let updated = db
            .update_article(1, &permitted(json!({"title": "New", "rank": 2})))
            .unwrap();

        assert_eq!(updated.title.as_deref(), Some("New"));
        assert_eq!(updated.rank, Some(2));
        assert!(updated.updated_at >= updated.created_at);
        assert!(matches!(
            db.update_article(9, &permitted(json!({"title": "x"}))),
            Err(DbError::RecordNotFound { .. })
        ));
    }

    #[test]
    fn test_failed_nested_write_rolls_back() {
        let (mut db, sink) = database();
        let params = permitted(json!({
            "title": "Test",
            "comments_attributes": {
                "0": {"author": "ok"},
                "1": {"author": "bad", "rating": 5}
            }
        }));

        let err = db.create_article(&params).unwrap_err();

        assert_eq!(err.to_string(), "unknown attribute: rating");
        assert_eq!(db.article_count(), 0);
        assert_eq!(db.comment_count(), 0);
        assert!(sink.of(Event::RecordCreated).is_empty());
    }

    #[test]
    fn test_update_cannot_clear_created_at() {
        let (mut db, _) = database();
        let created = db.create_article(&permitted(json!({"title": "Test"}))).unwrap();

        let updated = db
            .update_article(1, &permitted(json!({"created_at": null})))
            .unwrap();

        assert!(updated.created_at.is_some());
        assert!(updated.created_at >= created.created_at);
        assert!(db.find_article(1).unwrap().created_at.is_some());
    }

    #[test]
    fn test_create_after_max_id_is_rejected() {
        let (mut db, sink) = database();
        db.create_article(&permitted(json!({"id": i64::MAX, "title": "a"})))
            .unwrap();

        let err = db.create_article(&permitted(json!({"title": "b"}))).unwrap_err();

        assert_eq!(err, DbError::IdSequenceExhausted { model: "Article" });
        assert_eq!(db.article_count(), 1);
        assert_eq!(sink.of(Event::RecordRejected).len(), 1);
    }

    #[test]
    fn test_comment_article_attributes_with_foreign_id_not_found() {
        let (mut db, _) = database();
        db.create_article(&permitted(json!({"title": "Other"}))).unwrap();

        let err = db
            .create_comment(&permitted(json!({
                "author": "A",
                "article_attributes": {"id": 1, "title": "hijack"}
            })))
            .unwrap_err();

        assert_eq!(err.to_string(), "Couldn't find Article with ID=1 for Comment with ID=");
        assert_eq!(db.find_article(1).unwrap().title.as_deref(), Some("Other"));
    }
}
