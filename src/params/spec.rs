//! # Permit Specs
//!
//! A `PermitSpec` is the allow-list handed to `Parameters::permit`.
//!
//! The JSON form mirrors the usual permit-list notation:
//!
//! ```text
//! ["title", "body", {"comments_attributes": ["author", "content"]}, {"tags": []}]
//! ```
//!
//! - a string is a scalar key
//! - `{"key": []}` is an array of scalars
//! - `{"key": [...]}` or `{"key": {...}}` is a nested spec

use std::collections::BTreeMap;
use std::str::FromStr;

use serde_json::{Map, Value};

use super::errors::{ParamError, ParamResult};

/// How a single key may pass through the filter
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Rule {
    /// A permitted scalar: string, number, bool or null
    Scalar,
    /// An array whose elements are all permitted scalars
    ScalarArray,
    /// A nested tree (or indexed trees / array of trees) filtered with its own spec
    Nested(PermitSpec),
}

/// Allow-list of keys and the shape each key may take
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PermitSpec {
    rules: BTreeMap<String, Rule>,
}

impl PermitSpec {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spec permitting only the given scalar keys
    pub fn keys<I, S>(keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new().scalars(keys)
    }

    /// Permit a scalar key
    pub fn scalar(mut self, key: impl Into<String>) -> Self {
        self.rules.insert(key.into(), Rule::Scalar);
        self
    }

    /// Permit several scalar keys
    pub fn scalars<I, S>(mut self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        for key in keys {
            self.rules.insert(key.into(), Rule::Scalar);
        }
        self
    }

    /// Permit an array of scalars under `key`
    pub fn array(mut self, key: impl Into<String>) -> Self {
        self.rules.insert(key.into(), Rule::ScalarArray);
        self
    }

    /// Permit a nested tree under `key`, filtered by `spec`
    pub fn nested(mut self, key: impl Into<String>, spec: PermitSpec) -> Self {
        self.rules.insert(key.into(), Rule::Nested(spec));
        self
    }

    pub fn rule(&self, key: &str) -> Option<&Rule> {
        self.rules.get(key)
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Rule)> {
        self.rules.iter().map(|(k, r)| (k.as_str(), r))
    }

    /// Parse the JSON permit-list form
    pub fn from_json(value: &Value) -> ParamResult<Self> {
        match value {
            Value::Array(items) => {
                let mut spec = Self::new();
                for item in items {
                    spec.extend_from_item(item)?;
                }
                Ok(spec)
            }
            Value::Object(map) => {
                let mut spec = Self::new();
                spec.extend_from_object(map)?;
                Ok(spec)
            }
            Value::String(key) => Ok(Self::new().scalar(key.clone())),
            other => Err(ParamError::InvalidSpec(format!(
                "expected array, object or string, got {}",
                json_type_name(other)
            ))),
        }
    }

    fn extend_from_item(&mut self, item: &Value) -> ParamResult<()> {
        match item {
            Value::String(key) => {
                self.rules.insert(key.clone(), Rule::Scalar);
                Ok(())
            }
            Value::Object(map) => self.extend_from_object(map),
            other => Err(ParamError::InvalidSpec(format!(
                "permit-list entries must be strings or objects, got {}",
                json_type_name(other)
            ))),
        }
    }

    fn extend_from_object(&mut self, map: &Map<String, Value>) -> ParamResult<()> {
        for (key, value) in map {
            let rule = match value {
                Value::Array(items) if items.is_empty() => Rule::ScalarArray,
                Value::Array(_) | Value::Object(_) => Rule::Nested(Self::from_json(value)?),
                other => {
                    return Err(ParamError::InvalidSpec(format!(
                        "nested spec for '{}' must be an array or object, got {}",
                        key,
                        json_type_name(other)
                    )))
                }
            };
            self.rules.insert(key.clone(), rule);
        }
        Ok(())
    }

    /// Render back to the JSON permit-list form
    pub fn to_json(&self) -> Value {
        let mut items = Vec::new();
        let mut nested = Map::new();

        for (key, rule) in &self.rules {
            match rule {
                Rule::Scalar => items.push(Value::String(key.clone())),
                Rule::ScalarArray => {
                    nested.insert(key.clone(), Value::Array(Vec::new()));
                }
                Rule::Nested(spec) => {
                    nested.insert(key.clone(), spec.to_json());
                }
            }
        }

        if !nested.is_empty() {
            items.push(Value::Object(nested));
        }
        Value::Array(items)
    }
}

impl FromStr for PermitSpec {
    type Err = ParamError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let value: Value =
            serde_json::from_str(s).map_err(|e| ParamError::InvalidSpec(e.to_string()))?;
        Self::from_json(&value)
    }
}

pub(crate) fn json_type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
