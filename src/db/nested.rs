//! Nested-attribute entry extraction
//!
//! A nested value arrives in one of three shapes:
//!
//! - a single tree (`{"id": 1, "title": ".."}`)
//! - an indexed tree (`{"0": {..}, "1": {..}}`), keys only order the entries
//! - an array of trees
//!
//! Entries inherit the permission state of the tree they came from.

use serde_json::{Map, Value};

use crate::model::ModelError;
use crate::params::{is_blank, json_type_name, Parameters};

use super::errors::{DbError, DbResult};

/// Keys consumed by nested assignment rather than assigned as attributes
const UNASSIGNABLE_KEYS: &[&str] = &["id", "_destroy"];

/// One create-or-update request for an associated record
#[derive(Debug, Clone)]
pub(crate) struct NestedEntry {
    /// Raw `id` value when present and not blank
    pub id: Option<Value>,
    /// Remaining attributes for mass assignment
    pub attributes: Parameters,
}

impl NestedEntry {
    fn from_tree(owner: &Parameters, map: &Map<String, Value>) -> Self {
        let id = map.get("id").filter(|v| !is_blank(v)).cloned();
        let attributes = owner.derive(map.clone()).except(UNASSIGNABLE_KEYS);
        Self { id, attributes }
    }

    /// The id as an integer, if it is exactly one
    pub fn integer_id(&self) -> Option<i64> {
        match self.id.as_ref()? {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// The id rendered for error messages
    pub fn id_label(&self) -> String {
        match &self.id {
            Some(Value::String(s)) => s.clone(),
            Some(other) => other.to_string(),
            None => String::new(),
        }
    }
}

fn shape_error(key: &str, expected: &'static str, value: &Value) -> ModelError {
    ModelError::TypeMismatch {
        attribute: key.to_string(),
        expected,
        actual: json_type_name(value),
    }
}

/// Entry for a one-to-one association
pub(crate) fn single_entry(owner: &Parameters, key: &str, value: &Value) -> DbResult<NestedEntry> {
    match value {
        Value::Object(map) => Ok(NestedEntry::from_tree(owner, map)),
        other => Err(DbError::from(shape_error(key, "object", other))),
    }
}

/// Entries for a one-to-many association
pub(crate) fn collection_entries(
    owner: &Parameters,
    key: &str,
    value: &Value,
) -> DbResult<Vec<NestedEntry>> {
    match value {
        Value::Object(map) if map.contains_key("id") => {
            Ok(vec![NestedEntry::from_tree(owner, map)])
        }
        Value::Object(map) => {
            let mut indexed: Vec<(&String, &Value)> = map.iter().collect();
            indexed.sort_by_key(|(index, _)| index.parse::<i64>().unwrap_or(i64::MAX));

            indexed
                .into_iter()
                .map(|(_, entry)| match entry {
                    Value::Object(tree) => Ok(NestedEntry::from_tree(owner, tree)),
                    other => Err(DbError::from(shape_error(key, "object", other))),
                })
                .collect()
        }
        Value::Array(items) => items
            .iter()
            .map(|entry| match entry {
                Value::Object(tree) => Ok(NestedEntry::from_tree(owner, tree)),
                other => Err(DbError::from(shape_error(key, "object", other))),
            })
            .collect(),
        other => Err(DbError::from(shape_error(key, "object or array", other))),
    }
}
