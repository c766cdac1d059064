//! Deployment target model

use std::path::{Path, PathBuf};

use crate::settings::Settings;

/// One deployable unit of code, mapped to one remote function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeploymentTarget {
    /// Function name, taken from the source directory name
    pub name: String,
    pub source_dir: PathBuf,
    pub env_vars: Vec<String>,
    pub role: Option<String>,
    pub runtime: String,
    pub handler: String,
    pub memory_size: i32,
    pub timeout: i32,
    pub description: String,
}

impl DeploymentTarget {
    /// Build a target for `source_dir` with metadata defaulted from settings
    pub fn new(source_dir: impl Into<PathBuf>, settings: &Settings) -> Self {
        let source_dir = source_dir.into();
        let name = target_name(&source_dir);
        let description = settings
            .description
            .clone()
            .unwrap_or_else(|| format!("Lambda code for {}", name));

        Self {
            name,
            source_dir,
            env_vars: settings.env_vars.clone(),
            role: settings.role().map(str::to_string),
            runtime: settings.runtime.clone(),
            handler: settings.handler.clone(),
            memory_size: settings.memory_size,
            timeout: settings.timeout,
            description,
        }
    }

    /// Path of the dependency manifest, if the target has one
    pub fn manifest(&self) -> Option<PathBuf> {
        let path = self.source_dir.join(MANIFEST_FILE);
        path.is_file().then_some(path)
    }
}

/// Dependency manifest looked for directly under a source directory
pub const MANIFEST_FILE: &str = "requirements.txt";

fn target_name(source_dir: &Path) -> String {
    source_dir
        .components()
        .filter_map(|c| match c {
            std::path::Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .last()
        .unwrap_or_default()
}
