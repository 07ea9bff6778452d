//! # Parameters
//!
//! Request input wrapped with a `permitted` flag.
//!
//! Trees built from input start unpermitted. `permit` returns a fresh,
//! permitted tree holding only what the spec allows; the input is never
//! mutated. Mass assignment refuses anything that is not permitted.

use std::sync::Arc;

use serde::{Serialize, Serializer};
use serde_json::{Map, Value};

use crate::observability::{Event, EventRecord};

use super::config::ParamsConfig;
use super::errors::{ParamError, ParamResult};
use super::spec::{json_type_name, PermitSpec, Rule};

/// A parameter tree and its permission state
#[derive(Debug, Clone)]
pub struct Parameters {
    map: Map<String, Value>,
    permitted: bool,
    config: Arc<ParamsConfig>,
}

impl Parameters {
    /// Wrap untrusted input using default settings
    pub fn new(map: Map<String, Value>) -> Self {
        Self::with_config(map, ParamsConfig::default())
    }

    /// Wrap untrusted input with explicit settings
    pub fn with_config(map: Map<String, Value>, config: ParamsConfig) -> Self {
        Self {
            map,
            permitted: false,
            config: Arc::new(config),
        }
    }

    /// Wrap a JSON value. A non-object root is an empty tree.
    pub fn from_value(value: Value) -> Self {
        Self::from_value_with_config(value, ParamsConfig::default())
    }

    pub fn from_value_with_config(value: Value, config: ParamsConfig) -> Self {
        match value {
            Value::Object(map) => Self::with_config(map, config),
            _ => Self::with_config(Map::new(), config),
        }
    }

    /// A tree that shares this tree's settings and permission state
    pub(crate) fn derive(&self, map: Map<String, Value>) -> Self {
        Self {
            map,
            permitted: self.permitted,
            config: Arc::clone(&self.config),
        }
    }

    pub fn permitted(&self) -> bool {
        self.permitted
    }

    pub fn config(&self) -> &ParamsConfig {
        &self.config
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.map.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.map.keys().map(String::as_str)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.map.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    pub fn as_map(&self) -> &Map<String, Value> {
        &self.map
    }

    pub fn to_value(&self) -> Value {
        Value::Object(self.map.clone())
    }

    /// Object value under `key` as a tree with the same permission state
    pub fn nested(&self, key: &str) -> Option<Parameters> {
        match self.map.get(key) {
            Some(Value::Object(map)) => Some(self.derive(map.clone())),
            _ => None,
        }
    }

    /// Fetch the parameter tree stored under `key`.
    ///
    /// # Errors
    ///
    /// - `ParameterMissing` when the key is absent or its value is blank
    /// - `NotATree` when the value is present but not an object
    pub fn require(&self, key: &str) -> ParamResult<Parameters> {
        match self.map.get(key) {
            Some(Value::Object(map)) if !map.is_empty() => Ok(self.derive(map.clone())),
            Some(value) if !is_blank(value) => Err(ParamError::NotATree {
                param: key.to_string(),
                actual: json_type_name(value),
            }),
            _ => {
                self.config.sink.emit(
                    EventRecord::new(Event::ParameterMissing).with_field("param", key),
                );
                Err(ParamError::missing(key))
            }
        }
    }

    /// Require several keys, failing on the first one missing
    pub fn require_all<I, S>(&self, keys: I) -> ParamResult<Vec<Parameters>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        keys.into_iter().map(|k| self.require(k.as_ref())).collect()
    }

    /// Filter the tree through `spec`.
    ///
    /// Returns a new permitted tree. Keys outside the spec, or whose value
    /// has the wrong shape for their rule, are dropped; when any are,
    /// a single `UNPERMITTED_PARAMETERS` event lists their dotted paths.
    pub fn permit(&self, spec: &PermitSpec) -> Parameters {
        let mut dropped = Vec::new();
        let map = filter_tree(&self.map, spec, "", &self.config, &mut dropped);

        if !dropped.is_empty() && self.config.log_unpermitted {
            self.config.sink.emit(
                EventRecord::new(Event::UnpermittedParameters)
                    .with_field("count", dropped.len().to_string())
                    .with_field("keys", dropped.join(",")),
            );
        }

        Parameters {
            map,
            permitted: true,
            config: Arc::clone(&self.config),
        }
    }

    /// Mark the whole tree permitted without filtering
    pub fn permit_all(&self) -> Parameters {
        Parameters {
            map: self.map.clone(),
            permitted: true,
            config: Arc::clone(&self.config),
        }
    }

    /// Copy of the tree without `keys`; permission state is kept
    pub fn except(&self, keys: &[&str]) -> Parameters {
        let map = self
            .map
            .iter()
            .filter(|(k, _)| !keys.contains(&k.as_str()))
            .map(|(k, v)| (k.clone(), v.clone()))
            .collect();
        self.derive(map)
    }
}

impl PartialEq for Parameters {
    fn eq(&self, other: &Self) -> bool {
        self.permitted == other.permitted && self.map == other.map
    }
}

impl From<Map<String, Value>> for Parameters {
    fn from(map: Map<String, Value>) -> Self {
        Self::new(map)
    }
}

impl Serialize for Parameters {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.map.serialize(serializer)
    }
}

/// Null, whitespace-only strings, empty arrays and empty objects
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.trim().is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
        Value::Bool(_) | Value::Number(_) => false,
    }
}

fn is_permitted_scalar(value: &Value) -> bool {
    !matches!(value, Value::Array(_) | Value::Object(_))
}

/// Keys like "0", "1", "-3" used for indexed nested records
pub(crate) fn is_index_key(key: &str) -> bool {
    let digits = key.strip_prefix('-').unwrap_or(key);
    !digits.is_empty() && digits.bytes().all(|b| b.is_ascii_digit())
}

/// Every key is an index and every value a tree
pub(crate) fn is_indexed(map: &Map<String, Value>) -> bool {
    map.iter().all(|(k, v)| is_index_key(k) && v.is_object())
}

fn join_path(prefix: &str, key: &str) -> String {
    if prefix.is_empty() {
        key.to_string()
    } else {
        format!("{}.{}", prefix, key)
    }
}

fn filter_tree(
    input: &Map<String, Value>,
    spec: &PermitSpec,
    path: &str,
    config: &ParamsConfig,
    dropped: &mut Vec<String>,
) -> Map<String, Value> {
    let mut output = Map::new();

    for (key, value) in input {
        let key_path = join_path(path, key);

        let kept = match spec.rule(key) {
            Some(Rule::Scalar) if is_permitted_scalar(value) => Some(value.clone()),
            Some(Rule::ScalarArray) => match value {
                Value::Array(items) if items.iter().all(is_permitted_scalar) => {
                    Some(value.clone())
                }
                _ => None,
            },
            Some(Rule::Nested(nested)) => filter_nested(value, nested, &key_path, config, dropped),
            _ => None,
        };

        match kept {
            Some(v) => {
                output.insert(key.clone(), v);
            }
            None if config.is_always_permitted(key) => {}
            None => dropped.push(key_path),
        }
    }

    output
}

fn filter_nested(
    value: &Value,
    spec: &PermitSpec,
    path: &str,
    config: &ParamsConfig,
    dropped: &mut Vec<String>,
) -> Option<Value> {
    match value {
        Value::Object(map) if is_indexed(map) => {
            let mut output = Map::new();
            for (index, entry) in map {
                if let Value::Object(entry) = entry {
                    let entry_path = join_path(path, index);
                    let filtered = filter_tree(entry, spec, &entry_path, config, dropped);
                    output.insert(index.clone(), Value::Object(filtered));
                }
            }
            Some(Value::Object(output))
        }
        Value::Object(map) => Some(Value::Object(filter_tree(map, spec, path, config, dropped))),
        Value::Array(items) => {
            let filtered = items
                .iter()
                .enumerate()
                .filter_map(|(i, item)| {
                    let entry_path = join_path(path, &i.to_string());
                    match item {
                        Value::Object(entry) => Some(Value::Object(filter_tree(
                            entry,
                            spec,
                            &entry_path,
                            config,
                            dropped,
                        ))),
                        _ => {
                            dropped.push(entry_path);
                            None
                        }
                    }
                })
                .collect();
            Some(Value::Array(filtered))
        }
        _ => None,
    }
}
