//! Filter settings shared by a request's parameter trees

use std::sync::Arc;

use crate::observability::{default_sink, EventSink};

/// Keys that are dropped without being reported
pub const DEFAULT_ALWAYS_PERMITTED: &[&str] = &["controller", "action"];

/// Settings shared by every `Parameters` derived from the same input
#[derive(Debug, Clone)]
pub struct ParamsConfig {
    /// Keys never reported as unpermitted (still dropped unless permitted)
    pub always_permitted: Vec<String>,
    /// Emit `UNPERMITTED_PARAMETERS` when `permit` drops keys
    pub log_unpermitted: bool,
    /// Where events go
    pub sink: Arc<dyn EventSink>,
}

impl Default for ParamsConfig {
    fn default() -> Self {
        Self {
            always_permitted: DEFAULT_ALWAYS_PERMITTED
                .iter()
                .map(|s| s.to_string())
                .collect(),
            log_unpermitted: true,
            sink: default_sink(),
        }
    }
}

impl ParamsConfig {
    /// Default settings with a custom sink
    pub fn with_sink(sink: Arc<dyn EventSink>) -> Self {
        Self {
            sink,
            ..Default::default()
        }
    }

    pub(crate) fn is_always_permitted(&self, key: &str) -> bool {
        self.always_permitted.iter().any(|k| k == key)
    }
}
