//! Deploy and list lambdas

use lambda_deploy_core::{DeploymentTarget, Settings};
use lambda_deploy_package::{PackageError, Packager};
use std::path::PathBuf;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, error, info, warn};

use crate::function::{CreateFunctionRequest, FunctionRecord};
use crate::registry::{FunctionRegistry, RegistryError};

#[derive(Debug, Error)]
pub enum DeployError {
    /// Missing or invalid required input
    #[error("Invalid arguments: {0}")]
    Arguments(String),

    #[error(transparent)]
    Package(#[from] PackageError),

    #[error(transparent)]
    Registry(#[from] RegistryError),

    #[error("Failed to read lambda directory {}: {source}", path.display())]
    LambdaDirectory {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Packaging task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

impl DeployError {
    pub fn is_arguments(&self) -> bool {
        matches!(self, Self::Arguments(_))
    }
}

/// What happened to each requested lambda
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DeployReport {
    /// Function name and the version the registry reported
    pub deployed: Vec<(String, Option<String>)>,
    /// Targets the registry did not accept
    pub failed: Vec<String>,
    /// Requested names with no directory under the lambda root
    pub missing: Vec<String>,
}

enum TargetOutcome {
    Deployed(Option<String>),
    Failed,
}

/// Deploys the lambdas found under one root directory
pub struct DeployService {
    registry: Arc<dyn FunctionRegistry>,
    packager: Arc<Packager>,
    lambda_dir: PathBuf,
    settings: Settings,
}

impl DeployService {
    pub fn new(
        registry: Arc<dyn FunctionRegistry>,
        packager: Arc<Packager>,
        lambda_dir: impl Into<PathBuf>,
        settings: Settings,
    ) -> Self {
        Self {
            registry,
            packager,
            lambda_dir: lambda_dir.into(),
            settings,
        }
    }

    /// Deploy the named lambdas, or every lambda when `names` is empty.
    ///
    /// A missing role or a failed dependency installation stops the run.
    /// A target the registry rejects is logged and the remaining targets
    /// are still deployed.
    pub async fn deploy(&self, names: &[String]) -> Result<DeployReport, DeployError> {
        let Some(role) = self.settings.role() else {
            error!("Missing AWS Role");
            return Err(DeployError::Arguments("Role required".to_string()));
        };
        let role = role.to_string();

        let mut report = DeployReport::default();
        let available = self.lambda_names()?;

        let selected: Vec<String> = if names.is_empty() {
            available
        } else {
            let mut selected: Vec<String> = Vec::new();
            for name in names {
                if selected.contains(name) || report.missing.contains(name) {
                    debug!(function_name = %name, "Lambda named more than once, deploying it once");
                    continue;
                }
                if available.contains(name) {
                    selected.push(name.clone());
                } else {
                    warn!(
                        function_name = %name,
                        lambda_dir = %self.lambda_dir.display(),
                        "Lambda not found, skipping"
                    );
                    report.missing.push(name.clone());
                }
            }
            selected
        };

        for name in selected {
            let target = DeploymentTarget::new(self.lambda_dir.join(&name), &self.settings);
            match self.deploy_target(&target, &role).await? {
                TargetOutcome::Deployed(version) => report.deployed.push((target.name, version)),
                TargetOutcome::Failed => report.failed.push(target.name),
            }
        }

        Ok(report)
    }

    /// Package and upload one target. Packaging errors are returned,
    /// registry failures are logged.
    async fn deploy_target(
        &self,
        target: &DeploymentTarget,
        role: &str,
    ) -> Result<TargetOutcome, DeployError> {
        debug!(function_name = %target.name, "Deploying lambda");

        let packager = self.packager.clone();
        let packaged = target.clone();
        let zip_file = tokio::task::spawn_blocking(move || packager.package(&packaged)).await??;

        let existing = match self.registry.function_names().await {
            Ok(names) => names,
            Err(e) => {
                error!(function_name = %target.name, error = %e, "Error deploying");
                return Ok(TargetOutcome::Failed);
            }
        };

        let result = if existing.contains(&target.name) {
            info!(function_name = %target.name, "Updating lambda");
            self.registry
                .update_function_code(&target.name, zip_file, true)
                .await
        } else {
            info!(function_name = %target.name, "Adding new lambda");
            self.registry
                .create_function(CreateFunctionRequest {
                    function_name: target.name.clone(),
                    runtime: target.runtime.clone(),
                    role: role.to_string(),
                    handler: target.handler.clone(),
                    zip_file,
                    description: target.description.clone(),
                    timeout: target.timeout,
                    memory_size: target.memory_size,
                    publish: true,
                })
                .await
        };

        match result {
            Ok(response) if response.is_success() => {
                info!(
                    function_name = %target.name,
                    version = %response.version.as_deref().unwrap_or("Unknown"),
                    "Successfully deployed"
                );
                Ok(TargetOutcome::Deployed(response.version))
            }
            Ok(response) => {
                error!(
                    function_name = %target.name,
                    status_code = response.status_code,
                    message = %response.message.as_deref().unwrap_or_default(),
                    "Error deploying"
                );
                Ok(TargetOutcome::Failed)
            }
            Err(e) => {
                error!(function_name = %target.name, error = %e, "Error deploying");
                Ok(TargetOutcome::Failed)
            }
        }
    }

    /// Log every deployed function's metadata and return it
    pub async fn list(&self) -> Result<Vec<FunctionRecord>, DeployError> {
        let functions = self.registry.list_functions().await?;

        for function in &functions {
            for line in function.to_pretty_json().lines() {
                info!("{}", line);
            }
        }

        Ok(functions)
    }

    /// Directory names directly under the lambda root, sorted
    fn lambda_names(&self) -> Result<Vec<String>, DeployError> {
        let read_err = |source| DeployError::LambdaDirectory {
            path: self.lambda_dir.clone(),
            source,
        };

        let mut names = Vec::new();
        for entry in std::fs::read_dir(&self.lambda_dir).map_err(read_err)? {
            let entry = entry.map_err(read_err)?;
            if entry.path().is_dir() {
                names.push(entry.file_name().to_string_lossy().into_owned());
            }
        }
        names.sort();

        Ok(names)
    }
}
