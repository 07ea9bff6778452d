//! Row storage for one model

use std::collections::BTreeMap;

use crate::model::Model;

use super::errors::{DbError, DbResult};

/// Rows keyed by primary key, plus the id sequence
#[derive(Debug, Clone)]
pub(crate) struct Table<M> {
    rows: BTreeMap<i64, M>,
    last_id: i64,
}

impl<M> Default for Table<M> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
            last_id: 0,
        }
    }
}

impl<M: Model> Table<M> {
    pub fn get(&self, id: i64) -> Option<&M> {
        self.rows.get(&id)
    }

    pub fn find(&self, id: i64) -> DbResult<&M> {
        self.get(id).ok_or_else(|| DbError::not_found(M::MODEL_NAME, id))
    }

    pub fn values(&self) -> impl Iterator<Item = &M> {
        self.rows.values()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Insert a new row. An explicit id is kept; otherwise the next id is used.
    pub fn insert(&mut self, mut record: M) -> DbResult<M> {
        let id = match record.id() {
            Some(id) if self.rows.contains_key(&id) => {
                return Err(DbError::RecordNotUnique {
                    model: M::MODEL_NAME,
                    id,
                })
            }
            Some(id) => id,
            None => self
                .last_id
                .checked_add(1)
                .ok_or(DbError::IdSequenceExhausted {
                    model: M::MODEL_NAME,
                })?,
        };

        record.set_id(id);
        self.last_id = self.last_id.max(id);
        self.rows.insert(id, record.clone());
        Ok(record)
    }

    /// Store `record` in place of the row at `original_id`, following an id change
    pub fn replace(&mut self, original_id: i64, mut record: M) -> DbResult<M> {
        if !self.rows.contains_key(&original_id) {
            return Err(DbError::not_found(M::MODEL_NAME, original_id));
        }

        let id = record.id().unwrap_or(original_id);
        if id != original_id && self.rows.contains_key(&id) {
            return Err(DbError::RecordNotUnique {
                model: M::MODEL_NAME,
                id,
            });
        }

        self.rows.remove(&original_id);
        record.set_id(id);
        self.last_id = self.last_id.max(id);
        self.rows.insert(id, record.clone());
        Ok(record)
    }
}
