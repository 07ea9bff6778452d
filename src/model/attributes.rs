//! Mass assignment
//!
//! Each model exposes a static table of setters keyed by attribute name.
//! Assignment runs two guards in order:
//!
//! 1. the tree must be permitted (`ForbiddenAttributes`)
//! 2. every key must name a declared attribute (`UnknownAttribute`)
//!
//! Nothing is written to the record unless every key passes. Keys listed in
//! `nested_attribute_keys` are recognized but left for the persistence layer.

use chrono::{DateTime, Utc};
use serde_json::Value;

use crate::params::Parameters;

use super::errors::{ModelError, ModelResult};

/// Typed setter invoked with the raw value for one attribute
pub type Setter<M> = fn(&mut M, &Value) -> ModelResult<()>;

/// A persisted entity with mass-assignable attributes
pub trait Model: Clone + Default + 'static {
    /// Name used in messages, e.g. "Article"
    const MODEL_NAME: &'static str;
    /// Backing table, e.g. "articles"
    const TABLE_NAME: &'static str;

    /// Setter lookup table; its keys are the declared attributes
    fn attribute_setters() -> &'static [(&'static str, Setter<Self>)];

    /// Keys handled by nested-attribute assignment instead of a setter
    fn nested_attribute_keys() -> &'static [&'static str] {
        &[]
    }

    fn id(&self) -> Option<i64>;

    fn set_id(&mut self, id: i64);

    /// Fill unset timestamps; on update also refresh `updated_at`
    fn touch(&mut self, now: DateTime<Utc>, creating: bool);

    fn attribute_names() -> Vec<&'static str> {
        Self::attribute_setters().iter().map(|(name, _)| *name).collect()
    }

    fn has_attribute(name: &str) -> bool {
        setter_for::<Self>(name).is_some()
    }
}

fn setter_for<M: Model>(name: &str) -> Option<Setter<M>> {
    M::attribute_setters()
        .iter()
        .find(|(attr, _)| *attr == name)
        .map(|(_, setter)| *setter)
}

/// Assign every key of `params` onto `record`.
///
/// # Errors
///
/// - `ForbiddenAttributes` if `params` is not permitted, regardless of its keys
/// - `UnknownAttribute` for the first key with no setter that is not a
///   nested-attributes key
/// - `TypeMismatch` if a value cannot be cast
pub fn assign_attributes<M: Model>(record: &mut M, params: &Parameters) -> ModelResult<()> {
    if !params.permitted() {
        return Err(ModelError::ForbiddenAttributes);
    }

    let mut assignments = Vec::with_capacity(params.len());
    for (key, value) in params.iter() {
        if M::nested_attribute_keys().contains(&key) {
            continue;
        }
        let setter = setter_for::<M>(key)
            .ok_or_else(|| ModelError::unknown_attribute(M::MODEL_NAME, key))?;
        assignments.push((setter, value));
    }

    let mut staged = record.clone();
    for (setter, value) in assignments {
        setter(&mut staged, value)?;
    }
    *record = staged;

    Ok(())
}
