//! Typed tool settings
//!
//! Settings are read from `LAMBDA_*` keys of a [`ConfigSource`]. Integer
//! values are coerced from their string form; anything that fails to coerce
//! is reported as a configuration error.

use serde::{Deserialize, Deserializer};
use std::path::PathBuf;

use crate::error::ConfigError;
use crate::source::ConfigSource;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    /// IAM role ARN the function assumes. Required for deploys.
    #[serde(default)]
    pub role: Option<String>,

    #[serde(default = "default_runtime")]
    pub runtime: String,

    #[serde(default = "default_handler")]
    pub handler: String,

    /// Falls back to `Lambda code for <name>` per target
    #[serde(default)]
    pub description: Option<String>,

    #[serde(default = "default_timeout")]
    pub timeout: i32,

    #[serde(default = "default_memory_size")]
    pub memory_size: i32,

    /// Root directory holding one sub-directory per lambda
    #[serde(default)]
    pub directory: Option<PathBuf>,

    /// Names of variables written into the archive's `.env`
    #[serde(default, deserialize_with = "comma_list")]
    pub env_vars: Vec<String>,

    /// Dependency installer program
    #[serde(default = "default_installer")]
    pub installer: String,

    /// Override for the Lambda API endpoint
    #[serde(default)]
    pub endpoint_url: Option<String>,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            role: None,
            runtime: default_runtime(),
            handler: default_handler(),
            description: None,
            timeout: default_timeout(),
            memory_size: default_memory_size(),
            directory: None,
            env_vars: Vec::new(),
            installer: default_installer(),
            endpoint_url: None,
        }
    }
}

fn default_runtime() -> String {
    "python3.12".to_string()
}

fn default_handler() -> String {
    "lambda_function.lambda_handler".to_string()
}

fn default_timeout() -> i32 {
    3
}

fn default_memory_size() -> i32 {
    128
}

fn default_installer() -> String {
    "pip".to_string()
}

fn comma_list<'de, D>(deserializer: D) -> Result<Vec<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let raw = String::deserialize(deserializer)?;
    Ok(split_names(&raw))
}

/// Split a comma-separated list of names, dropping empty items
pub fn split_names(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(str::to_string)
        .collect()
}

impl Settings {
    /// Load settings from the `LAMBDA_*` keys of a source
    pub fn from_source(source: &ConfigSource) -> Result<Self, ConfigError> {
        let config = config::Config::builder()
            .add_source(
                config::Environment::with_prefix("LAMBDA")
                    .try_parsing(true)
                    .source(Some(source.vars())),
            )
            .build()?;

        Ok(config.try_deserialize::<Settings>()?)
    }

    /// The configured role, treating an empty value as unset
    pub fn role(&self) -> Option<&str> {
        self.role.as_deref().filter(|role| !role.trim().is_empty())
    }
}
