//! Strong Parameters Tests
//!
//! Permission and rejection semantics at the boundary between request
//! input and the models:
//! - Unpermitted trees never reach mass assignment
//! - `require` reports missing or blank keys by name
//! - `permit` keeps only listed keys, recursing into nested trees
//! - Unknown attributes are caught after filtering

use std::sync::Arc;

use serde_json::json;
use strongparams::db::{Database, DbError};
use strongparams::model::{Article, Comment, ModelError};
use strongparams::observability::{Event, MemorySink};
use strongparams::params::{ParamError, Parameters, ParamsConfig, PermitSpec};
use strongparams::resources::{article_params, comment_params};

// =============================================================================
// Helper Functions
// =============================================================================

fn params_with_sink(value: serde_json::Value) -> (Parameters, MemorySink) {
    let sink = MemorySink::new();
    let config = ParamsConfig::with_sink(Arc::new(sink.clone()));
    (Parameters::from_value_with_config(value, config), sink)
}

fn database() -> Database {
    Database::with_sink(Arc::new(MemorySink::new())).unwrap()
}

// =============================================================================
// Forbidden Attributes
// =============================================================================

/// Raw input is rejected even when every key is a real attribute.
#[test]
fn test_unpermitted_params_raise_forbidden_attributes() {
    let params = Parameters::from_value(json!({"title": "Test", "body": "test body"}));

    assert_eq!(Article::new(&params), Err(ModelError::ForbiddenAttributes));
}

/// The persistence layer applies the same guard.
#[test]
fn test_database_rejects_unpermitted_params() {
    let mut db = database();
    let params = Parameters::from_value(json!({"author": "John Smith"}));

    assert_eq!(
        db.create_comment(&params),
        Err(DbError::Model(ModelError::ForbiddenAttributes))
    );
    assert_eq!(db.comment_count(), 0);
}

/// A required sub-tree is still unpermitted.
#[test]
fn test_required_subtree_is_still_forbidden() {
    let params = Parameters::from_value(json!({"article": {"title": "Test"}}));
    let article = params.require("article").unwrap();

    assert!(!article.permitted());
    assert_eq!(Article::new(&article), Err(ModelError::ForbiddenAttributes));
}

// =============================================================================
// Require
// =============================================================================

/// Missing key error names the key in the exact message format.
#[test]
fn test_require_missing_key_message() {
    let params = Parameters::from_value(json!({"title": "Test"}));

    let err = params.require("category_attributes").unwrap_err();

    assert_eq!(
        err,
        ParamError::ParameterMissing {
            param: "category_attributes".into()
        }
    );
    assert_eq!(
        err.to_string(),
        "param is missing or the value is empty: category_attributes"
    );
}

/// Empty values count as missing.
#[test]
fn test_require_empty_value() {
    let params = Parameters::from_value(json!({"article": {}}));

    assert_eq!(
        params.require("article").unwrap_err().to_string(),
        "param is missing or the value is empty: article"
    );
}

// =============================================================================
// Permit
// =============================================================================

/// Permitted scalars reach the model unchanged.
#[test]
fn test_permitted_params_build_article() {
    let params = Parameters::from_value(json!({"title": "Test", "body": "test body"}));
    let permitted = params.permit(&PermitSpec::keys(["title", "body"]));

    let article = Article::new(&permitted).unwrap();

    assert_eq!(article.title.as_deref(), Some("Test"));
    assert_eq!(article.body.as_deref(), Some("test body"));
}

/// Unlisted keys are dropped and reported once.
#[test]
fn test_unlisted_keys_dropped_and_reported() {
    let (params, sink) = params_with_sink(json!({
        "author": "John Smith",
        "content": "Great writing!",
        "article_id": 99
    }));

    let permitted = params.permit(&PermitSpec::keys(["author", "content"]));
    let comment = Comment::new(&permitted).unwrap();

    assert_eq!(comment.article_id, None);
    let events = sink.of(Event::UnpermittedParameters);
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].field("keys"), Some("article_id"));
}

/// Nested spec filters the sub-tree and drops unlisted siblings.
#[test]
fn test_nested_attributes_permit() {
    let (params, sink) = params_with_sink(json!({
        "author": "John Smith",
        "content": "Great writing!",
        "article_attributes": {"title": "Test", "body": "test body"}
    }));

    let permitted = params.permit(
        &PermitSpec::keys(["author"])
            .nested("article_attributes", PermitSpec::keys(["id", "title", "body"])),
    );

    assert_eq!(
        permitted.to_value(),
        json!({
            "author": "John Smith",
            "article_attributes": {"title": "Test", "body": "test body"}
        })
    );
    assert_eq!(
        sink.of(Event::UnpermittedParameters)[0].field("keys"),
        Some("content")
    );
}

/// Indexed one-to-many trees pass through unchanged when fully listed.
#[test]
fn test_indexed_nested_attributes_permit() {
    let input = json!({
        "title": "Test",
        "comments_attributes": {
            "0": {"author": "John Smith", "content": "Great writing!"},
            "1": {"author": "Jane Doe", "content": "Agreed."}
        }
    });
    let (params, sink) = params_with_sink(input.clone());

    let permitted = params.permit(
        &PermitSpec::keys(["title"])
            .nested("comments_attributes", PermitSpec::keys(["author", "content"])),
    );

    assert_eq!(permitted.get("comments_attributes"), input.get("comments_attributes"));
    assert!(sink.records().is_empty());
}

/// A scalar rule never lets a tree through.
#[test]
fn test_scalar_key_with_tree_value_dropped() {
    let params = Parameters::from_value(json!({"title": {"$ne": null}}));

    let permitted = params.permit(&PermitSpec::keys(["title"]));

    assert!(!permitted.contains_key("title"));
}

// =============================================================================
// Unknown Attributes
// =============================================================================

/// A permitted key with no model attribute fails after filtering.
#[test]
fn test_unknown_attribute_after_permit() {
    let params = Parameters::from_value(json!({"title": "Test", "category_id": 3}));
    let permitted = params.permit(&PermitSpec::keys(["title", "category_id"]));

    let err = Article::new(&permitted).unwrap_err();

    assert_eq!(err.to_string(), "unknown attribute: category_id");
}

/// Filtering first means unlisted unknown keys never reach the mapper.
#[test]
fn test_unknown_key_filtered_before_mapper() {
    let params = Parameters::from_value(json!({"title": "Test", "category_id": 3}));
    let permitted = params.permit(&PermitSpec::keys(["title"]));

    assert!(Article::new(&permitted).is_ok());
}

/// Nested-attributes keys from the resource specs are not unknown attributes.
#[test]
fn test_nested_keys_accepted_by_model_constructors() {
    let params = Parameters::from_value(json!({
        "article": {
            "title": "Test",
            "comments_attributes": {"0": {"author": "John Smith"}}
        },
        "comment": {
            "author": "John Smith",
            "article_attributes": {"title": "Test"}
        }
    }));

    let article = Article::new(&article_params(&params).unwrap()).unwrap();
    let comment = Comment::new(&comment_params(&params).unwrap()).unwrap();

    assert_eq!(article.title.as_deref(), Some("Test"));
    assert_eq!(comment.author.as_deref(), Some("John Smith"));
    assert_eq!(comment.article_id, None);
}

/// Unknown attributes surface unchanged through the database.
#[test]
fn test_database_unknown_attribute_message() {
    let mut db = database();
    let params = Parameters::from_value(json!({"author": "A", "rating": 5}))
        .permit(&PermitSpec::keys(["author", "rating"]));

    let err = db.create_comment(&params).unwrap_err();

    assert_eq!(err.to_string(), "unknown attribute: rating");
}
