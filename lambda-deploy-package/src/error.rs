//! Packaging errors

use std::path::PathBuf;
use thiserror::Error;

/// Failure reported by a dependency installer
#[derive(Debug, Error)]
pub enum InstallError {
    #[error("Failed to run {program}: {source}")]
    Spawn {
        program: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Installer exited with status {}", code.map_or_else(|| "unknown".to_string(), |c| c.to_string()))]
    Failed { code: Option<i32> },
}

#[derive(Debug, Error)]
pub enum PackageError {
    #[error("Failed to install dependencies of {name}: {source}")]
    DependencyInstallation {
        name: String,
        #[source]
        source: InstallError,
    },

    #[error("Failed to read {}: {source}", path.display())]
    Walk {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Zip error: {0}")]
    Zip(#[from] zip::result::ZipError),
}
