//! Application configuration
//!
//! Loaded from a JSON file. Every field has a default, so an empty object
//! (or no file at all) is a valid configuration.

use std::fs;
use std::path::Path;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::EventSink;
use crate::params::{ParamsConfig, DEFAULT_ALWAYS_PERMITTED};

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config '{path}': {source}")]
    Read {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Top-level configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AppConfig {
    /// Base for generated URLs (default: "http://localhost:3000")
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Parameter filter settings
    #[serde(default)]
    pub params: ParamsSettings,
}

/// Parameter filter settings as they appear in the file
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParamsSettings {
    /// Keys dropped without being reported (default: ["controller", "action"])
    #[serde(default = "default_always_permitted")]
    pub always_permitted_parameters: Vec<String>,

    /// Report keys dropped by `permit` (default: true)
    #[serde(default = "default_true")]
    pub log_unpermitted_parameters: bool,
}

fn default_base_url() -> String {
    "http://localhost:3000".to_string()
}

fn default_always_permitted() -> Vec<String> {
    DEFAULT_ALWAYS_PERMITTED
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_true() -> bool {
    true
}

impl Default for ParamsSettings {
    fn default() -> Self {
        Self {
            always_permitted_parameters: default_always_permitted(),
            log_unpermitted_parameters: true,
        }
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            params: ParamsSettings::default(),
        }
    }
}

impl AppConfig {
    /// Load and validate configuration from a file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json_str(&content)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: AppConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load from `path` if given, otherwise use defaults
    pub fn load_or_default(path: Option<&Path>) -> ConfigResult<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }

    fn validate(&self) -> ConfigResult<()> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ConfigError::Invalid(format!(
                "base_url must start with http:// or https://, got '{}'",
                self.base_url
            )));
        }

        if self
            .params
            .always_permitted_parameters
            .iter()
            .any(|k| k.trim().is_empty())
        {
            return Err(ConfigError::Invalid(
                "always_permitted_parameters must not contain blank keys".into(),
            ));
        }

        Ok(())
    }

    /// Filter settings wired to `sink`
    pub fn params_config(&self, sink: Arc<dyn EventSink>) -> ParamsConfig {
        ParamsConfig {
            always_permitted: self.params.always_permitted_parameters.clone(),
            log_unpermitted: self.params.log_unpermitted_parameters,
            sink,
        }
    }
}
