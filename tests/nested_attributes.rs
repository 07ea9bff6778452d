//! Nested Attribute Tests
//!
//! Create-or-update of associated records from permitted nested trees:
//! - Entries without an id create and associate a record
//! - Entries with a matching id update in place
//! - Entries with a foreign id fail without partial writes

use std::sync::Arc;

use serde_json::{json, Value};
use strongparams::db::{Database, DbError};
use strongparams::observability::{Event, MemorySink};
use strongparams::params::Parameters;
use strongparams::resources::{article_params, comment_params};

// =============================================================================
// Helper Functions
// =============================================================================

fn database() -> (Database, MemorySink) {
    let sink = MemorySink::new();
    let db = Database::with_sink(Arc::new(sink.clone())).unwrap();
    (db, sink)
}

fn article_body(value: Value) -> Parameters {
    article_params(&Parameters::from_value(json!({ "article": value }))).unwrap()
}

fn comment_body(value: Value) -> Parameters {
    comment_params(&Parameters::from_value(json!({ "comment": value }))).unwrap()
}

// =============================================================================
// One-to-many: Article.comments_attributes
// =============================================================================

/// Indexed entries each create a comment on the new article.
#[test]
fn test_article_creates_indexed_comments() {
    let (mut db, _) = database();

    let article = db
        .create_article(&article_body(json!({
            "title": "Test",
            "comments_attributes": {
                "0": {"author": "John Smith", "content": "Great writing!"},
                "1": {"author": "Jane Doe", "content": "Agreed."}
            }
        })))
        .unwrap();

    let comments = db.comments_for_article(article.id.unwrap());
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].author.as_deref(), Some("John Smith"));
    assert_eq!(comments[1].content.as_deref(), Some("Agreed."));
}

/// Array form behaves like indexed form.
#[test]
fn test_article_creates_comments_from_array() {
    let (mut db, _) = database();

    let article = db
        .create_article(&article_body(json!({
            "title": "Test",
            "comments_attributes": [{"author": "A"}, {"author": "B"}]
        })))
        .unwrap();

    assert_eq!(db.comments_for_article(article.id.unwrap()).len(), 2);
}

/// An entry with the id of an owned comment updates it in place.
#[test]
fn test_article_update_modifies_existing_comment() {
    let (mut db, _) = database();
    let article = db
        .create_article(&article_body(json!({
            "title": "Test",
            "comments_attributes": {"0": {"author": "A", "content": "first"}}
        })))
        .unwrap();
    let article_id = article.id.unwrap();
    let comment_id = db.comments_for_article(article_id)[0].id.unwrap();

    db.update_article(
        article_id,
        &article_body(json!({
            "comments_attributes": {
                "0": {"id": comment_id.to_string(), "content": "edited"},
                "1": {"author": "B"}
            }
        })),
    )
    .unwrap();

    let comments = db.comments_for_article(article_id);
    assert_eq!(comments.len(), 2);
    assert_eq!(comments[0].content.as_deref(), Some("edited"));
    assert_eq!(comments[0].author.as_deref(), Some("A"));
    assert_eq!(db.find_article(article_id).unwrap().title.as_deref(), Some("Test"));
}

/// A comment id belonging to another article is not found; nothing changes.
#[test]
fn test_article_update_rejects_foreign_comment() {
    let (mut db, sink) = database();
    db.create_article(&article_body(json!({
        "title": "One",
        "comments_attributes": {"0": {"author": "owner"}}
    })))
    .unwrap();
    let other = db
        .create_article(&article_body(json!({"title": "Two"})))
        .unwrap();
    sink.clear();

    let err = db
        .update_article(
            other.id.unwrap(),
            &article_body(json!({
                "title": "Renamed",
                "comments_attributes": {"0": {"id": 1, "author": "hijack"}}
            })),
        )
        .unwrap_err();

    assert_eq!(
        err,
        DbError::RecordNotFound {
            model: "Comment",
            id: "1".into(),
            scope: " for Article with ID=2".into(),
        }
    );
    assert_eq!(db.find_comment(1).unwrap().author.as_deref(), Some("owner"));
    assert_eq!(db.find_article(2).unwrap().title.as_deref(), Some("Two"));
    assert!(sink.of(Event::RecordUpdated).is_empty());
    assert_eq!(sink.of(Event::RecordRejected).len(), 1);
}

/// `_destroy` is permitted but ignored.
#[test]
fn test_destroy_flag_ignored() {
    let (mut db, _) = database();

    let article = db
        .create_article(&article_body(json!({
            "title": "Test",
            "comments_attributes": {"0": {"author": "A", "_destroy": "1"}}
        })))
        .unwrap();

    assert_eq!(db.comments_for_article(article.id.unwrap()).len(), 1);
}

// =============================================================================
// Belongs-to: Comment.article_attributes
// =============================================================================

/// A comment with article attributes creates and associates the article.
#[test]
fn test_comment_creates_article() {
    let (mut db, sink) = database();

    let comment = db
        .create_comment(&comment_body(json!({
            "author": "John Smith",
            "content": "Great writing!",
            "article_attributes": {"title": "Test", "body": "test body"}
        })))
        .unwrap();

    let article = db.find_article(comment.article_id.unwrap()).unwrap();
    assert_eq!(article.title.as_deref(), Some("Test"));
    assert_eq!(article.body.as_deref(), Some("test body"));
    assert_eq!(sink.of(Event::RecordCreated).len(), 2);
}

/// Matching id on the associated article updates it.
#[test]
fn test_comment_update_modifies_its_article() {
    let (mut db, _) = database();
    let comment = db
        .create_comment(&comment_body(json!({
            "author": "A",
            "article_attributes": {"title": "Old"}
        })))
        .unwrap();
    let article_id = comment.article_id.unwrap();

    db.update_comment(
        comment.id.unwrap(),
        &comment_body(json!({
            "content": "now with content",
            "article_attributes": {"id": article_id, "title": "New"}
        })),
    )
    .unwrap();

    assert_eq!(db.article_count(), 1);
    assert_eq!(db.find_article(article_id).unwrap().title.as_deref(), Some("New"));
    assert_eq!(
        db.find_comment(comment.id.unwrap()).unwrap().content.as_deref(),
        Some("now with content")
    );
}

/// Nested trees still pass through the unknown-attribute guard.
#[test]
fn test_nested_unknown_attribute_rolls_back() {
    let (mut db, _) = database();
    let params = Parameters::from_value(json!({
        "author": "A",
        "article_attributes": {"title": "T", "published": true}
    }))
    .permit_all();

    let err = db.create_comment(&params).unwrap_err();

    assert_eq!(err.to_string(), "unknown attribute: published");
    assert_eq!(db.article_count(), 0);
    assert_eq!(db.comment_count(), 0);
}
