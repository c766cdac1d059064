//! Lambda packaging pipeline

use bytes::Bytes;
use std::borrow::Cow;
use lambda_deploy_core::{ConfigSource, DeploymentTarget, DEFAULT_ENV_FILE};
use std::path::Path;
use std::sync::Arc;
use tracing::{debug, error, info, warn};

use crate::archive::{Archive, DEFAULT_MODE};
use crate::error::PackageError;
use crate::installer::Installer;

/// Suffix of byte-compiled files left out of every archive
pub const BYTECODE_SUFFIX: &str = ".pyc";

/// Builds deployment archives for targets
pub struct Packager {
    installer: Arc<dyn Installer>,
    source: Arc<ConfigSource>,
}

impl Packager {
    /// `source` resolves the values of each target's env vars
    pub fn new(installer: Arc<dyn Installer>, source: Arc<ConfigSource>) -> Self {
        Self { installer, source }
    }

    /// Package a target into zip bytes ready for upload
    pub fn package(&self, target: &DeploymentTarget) -> Result<Bytes, PackageError> {
        self.build_archive(target)?.to_zip()
    }

    /// Collect the archive contents for a target.
    ///
    /// Source files go in first, then the synthesized `.env`, then any
    /// vendored dependencies. A later entry with the same path replaces an
    /// earlier one.
    pub fn build_archive(&self, target: &DeploymentTarget) -> Result<Archive, PackageError> {
        info!(function_name = %target.name, "Packaging lambda");

        if target.source_dir.join(DEFAULT_ENV_FILE).exists() {
            warn!(
                function_name = %target.name,
                "A .env file exists in your Lambda directory - it is not uploaded, \
                 use LAMBDA_ENV_VARS to choose what goes into the packaged .env"
            );
        }

        let mut archive = Archive::new();
        archive.add_directory(&target.source_dir, include_file)?;

        archive.insert(DEFAULT_ENV_FILE, self.env_file_contents(target), DEFAULT_MODE);

        if let Some(manifest) = target.manifest() {
            self.vendor_dependencies(target, &manifest, &mut archive)?;
        }

        debug!(function_name = %target.name, entries = archive.len(), "Packaged lambda");
        Ok(archive)
    }

    /// `NAME = VALUE` lines for the target's env vars
    pub fn env_file_contents(&self, target: &DeploymentTarget) -> String {
        target
            .env_vars
            .iter()
            .map(|key| {
                let value = self.source.get(key).unwrap_or_else(|| {
                    warn!(function_name = %target.name, key = %key, "Env var has no value");
                    ""
                });
                let escaped = escape_line_breaks(value);
                if let Cow::Owned(_) = escaped {
                    warn!(
                        function_name = %target.name,
                        key = %key,
                        "Env var value spans several lines, writing line breaks as \\n"
                    );
                }
                format!("{} = {}", key, escaped)
            })
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn vendor_dependencies(
        &self,
        target: &DeploymentTarget,
        manifest: &Path,
        archive: &mut Archive,
    ) -> Result<(), PackageError> {
        // Removed when dropped, on success and on every error path below
        let staging = tempfile::Builder::new()
            .prefix("lambda-deploy-")
            .tempdir()?;

        debug!(
            function_name = %target.name,
            staging = %staging.path().display(),
            "Created dependency staging directory"
        );

        if let Err(source) = self.installer.install(manifest, staging.path()) {
            if cfg!(target_os = "macos") {
                error!(
                    "A DistutilsOptionError about the prefix can occur when you are on \
                     macOS and installed Python via Homebrew. See \
                     https://docs.brew.sh/Homebrew-and-Python for details."
                );
            }
            return Err(PackageError::DependencyInstallation {
                name: target.name.clone(),
                source,
            });
        }

        let added = archive.add_directory(staging.path(), include_file)?;
        info!(function_name = %target.name, files = added, "Vendored dependencies");

        Ok(())
    }
}

/// Keep each env var on one line of the `.env` entry
fn escape_line_breaks(value: &str) -> Cow<'_, str> {
    if value.contains(['\n', '\r']) {
        Cow::Owned(value.replace('\r', "\\r").replace('\n', "\\n"))
    } else {
        Cow::Borrowed(value)
    }
}

/// Source and staging files that belong in an archive
fn include_file(path: &Path) -> bool {
    let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
        return true;
    };

    if name == DEFAULT_ENV_FILE {
        debug!(path = %path.display(), "Skipping .env file");
        return false;
    }

    !name.ends_with(BYTECODE_SUFFIX)
}
