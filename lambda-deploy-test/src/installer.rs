//! Scriptable dependency installer

use lambda_deploy_package::{InstallError, Installer};
use parking_lot::Mutex;
use std::path::{Path, PathBuf};

/// Installer that writes canned files into the staging directory, or fails
#[derive(Default)]
pub struct FakeInstaller {
    files: Vec<(String, String)>,
    fail: bool,
    staging_dirs: Mutex<Vec<PathBuf>>,
}

impl FakeInstaller {
    pub fn new() -> Self {
        Self::default()
    }

    /// Write `contents` at `path` inside the staging directory on install
    pub fn file(mut self, path: &str, contents: &str) -> Self {
        self.files.push((path.to_string(), contents.to_string()));
        self
    }

    /// Exit with a non-zero status on install
    pub fn failing() -> Self {
        Self {
            fail: true,
            ..Self::default()
        }
    }

    /// Staging directories the installer was asked to install into
    pub fn staging_dirs(&self) -> Vec<PathBuf> {
        self.staging_dirs.lock().clone()
    }
}

impl Installer for FakeInstaller {
    fn install(&self, _manifest: &Path, target_dir: &Path) -> Result<(), InstallError> {
        self.staging_dirs.lock().push(target_dir.to_path_buf());

        if self.fail {
            return Err(InstallError::Failed { code: Some(1) });
        }

        for (path, contents) in &self.files {
            let path = target_dir.join(path);
            if let Some(parent) = path.parent() {
                std::fs::create_dir_all(parent).map_err(|source| InstallError::Spawn {
                    program: "fake-installer".to_string(),
                    source,
                })?;
            }
            std::fs::write(&path, contents).map_err(|source| InstallError::Spawn {
                program: "fake-installer".to_string(),
                source,
            })?;
        }

        Ok(())
    }
}
