//! Layered lookup over the process environment and an env file

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, error};

use crate::error::ConfigError;
use crate::settings::Settings;
use crate::{env_file, DEFAULT_ENV_FILE};

/// Immutable snapshot of the configuration visible to one run.
///
/// Values set in the process environment take precedence over values read
/// from the env file. The env file is never written back into the process
/// environment.
#[derive(Debug, Clone, Default)]
pub struct ConfigSource {
    process: HashMap<String, String>,
    file: HashMap<String, String>,
}

impl ConfigSource {
    pub fn new(process: HashMap<String, String>, file: HashMap<String, String>) -> Self {
        Self { process, file }
    }

    /// Snapshot the process environment and load the env file.
    ///
    /// `env_file` is the path given on the command line, if any. When it is
    /// absent or names the default `.env`, the path is taken from
    /// `LAMBDA_ENV_FILE` and only loaded if it exists. An explicitly named
    /// file that does not exist is an arguments error.
    pub fn from_env(env_file: Option<&Path>) -> Result<Self, ConfigError> {
        let process: HashMap<String, String> = std::env::vars_os()
            .filter_map(|(k, v)| Some((k.into_string().ok()?, v.into_string().ok()?)))
            .collect();

        let file = match resolve_env_file(env_file, &process)? {
            Some(path) => env_file::load(&path)?,
            None => HashMap::new(),
        };

        Ok(Self::new(process, file))
    }

    /// Look up a single value
    pub fn get(&self, key: &str) -> Option<&str> {
        self.process
            .get(key)
            .or_else(|| self.file.get(key))
            .map(String::as_str)
    }

    /// All visible values, with process values overriding the env file
    pub fn vars(&self) -> HashMap<String, String> {
        let mut vars = self.file.clone();
        vars.extend(self.process.iter().map(|(k, v)| (k.clone(), v.clone())));
        vars
    }

    /// Typed tool settings derived from this source
    pub fn settings(&self) -> Result<Settings, ConfigError> {
        Settings::from_source(self)
    }
}

fn resolve_env_file(
    explicit: Option<&Path>,
    process: &HashMap<String, String>,
) -> Result<Option<PathBuf>, ConfigError> {
    match explicit {
        Some(path) if path != Path::new(DEFAULT_ENV_FILE) => {
            if !path.exists() {
                error!(path = %path.display(), "Can't find Lambda env file");
                return Err(ConfigError::Arguments(format!(
                    "Cannot find env file {}",
                    path.display()
                )));
            }
            Ok(Some(path.to_path_buf()))
        }
        _ => {
            let path = PathBuf::from(
                process
                    .get("LAMBDA_ENV_FILE")
                    .map(String::as_str)
                    .unwrap_or(DEFAULT_ENV_FILE),
            );
            if path.exists() {
                Ok(Some(path))
            } else {
                debug!(path = %path.display(), "No env file found");
                Ok(None)
            }
        }
    }
}
