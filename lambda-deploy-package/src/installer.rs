//! Dependency installers

use std::path::Path;
use std::process::Command;
use tracing::info;

use crate::error::InstallError;

/// Installs the packages listed in a manifest into a directory
pub trait Installer: Send + Sync {
    fn install(&self, manifest: &Path, target_dir: &Path) -> Result<(), InstallError>;
}

/// Runs `<program> install -r <manifest> -t <dir>`
#[derive(Debug, Clone)]
pub struct PipInstaller {
    program: String,
}

impl PipInstaller {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }
}

impl Default for PipInstaller {
    fn default() -> Self {
        Self::new("pip")
    }
}

impl Installer for PipInstaller {
    fn install(&self, manifest: &Path, target_dir: &Path) -> Result<(), InstallError> {
        info!(
            program = %self.program,
            manifest = %manifest.display(),
            "Installing dependencies"
        );

        let status = Command::new(&self.program)
            .arg("install")
            .arg("-r")
            .arg(manifest)
            .arg("-t")
            .arg(target_dir)
            .status()
            .map_err(|source| InstallError::Spawn {
                program: self.program.clone(),
                source,
            })?;

        if status.success() {
            Ok(())
        } else {
            Err(InstallError::Failed {
                code: status.code(),
            })
        }
    }
}
