//! Configuration errors

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// Missing or invalid required input
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    #[error("Failed to read env file {}: {source}", path.display())]
    EnvFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid settings: {0}")]
    Settings(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn is_arguments(&self) -> bool {
        matches!(self, Self::Arguments(_))
    }
}
