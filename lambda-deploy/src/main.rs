//! lambda-deploy - package directories of code and deploy them to AWS Lambda
//!
//! Every sub-directory of the lambda root is one function. `deploy` zips
//! each one (vendoring `requirements.txt` dependencies and writing a `.env`
//! of selected variables) and creates or updates the function; `list`
//! prints the metadata of every deployed function.

mod cli;
mod logging;

use std::process::ExitCode;
use std::sync::Arc;

use clap::{CommandFactory, Parser};
use lambda_deploy_core::{ConfigError, ConfigSource};
use lambda_deploy_lambda::{AwsRegistry, DeployError, DeployService};
use lambda_deploy_package::{Packager, PipInstaller};
use tracing::{debug, error, info, warn};

use cli::{Cli, Command};

#[tokio::main]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if e.use_stderr() => {
            let _ = e.print();
            return ExitCode::FAILURE;
        }
        Err(e) => e.exit(),
    };

    let level = match logging::resolve_level(cli.logging_level.as_deref(), cli.verbose) {
        Ok(level) => level,
        Err(message) => {
            eprintln!("Invalid arguments: {}", message);
            let _ = Cli::command().print_help();
            return ExitCode::FAILURE;
        }
    };
    logging::init(level);

    match run(&cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) if is_arguments(&e) => {
            error!(error = %e, "Invalid arguments");
            let _ = Cli::command().print_help();
            ExitCode::FAILURE
        }
        Err(e) => {
            error!("lambda-deploy failed: {:#}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: &Cli) -> anyhow::Result<()> {
    let source = ConfigSource::from_env(Some(cli.env_file.as_path()))?;
    let mut settings = source.settings()?;
    cli.apply(&mut settings);

    let lambda_dir = match &settings.directory {
        Some(dir) => dir.clone(),
        None => std::env::current_dir()?,
    };
    debug!(lambda_dir = %lambda_dir.display(), "Using lambda directory");

    let registry = Arc::new(AwsRegistry::from_env(settings.endpoint_url.as_deref()).await);
    let installer = Arc::new(PipInstaller::new(settings.installer.clone()));
    let packager = Arc::new(Packager::new(installer, Arc::new(source)));
    let service = DeployService::new(registry, packager, lambda_dir, settings);

    match &cli.command {
        Command::Deploy { names } => {
            let report = service.deploy(names).await?;
            info!(
                deployed = report.deployed.len(),
                failed = report.failed.len(),
                missing = report.missing.len(),
                "Deploy finished"
            );
            if !report.failed.is_empty() {
                warn!(functions = ?report.failed, "Some lambdas were not deployed");
            }
        }
        Command::List => {
            service.list().await?;
        }
    }

    Ok(())
}

fn is_arguments(err: &anyhow::Error) -> bool {
    err.downcast_ref::<ConfigError>()
        .is_some_and(ConfigError::is_arguments)
        || err
            .downcast_ref::<DeployError>()
            .is_some_and(DeployError::is_arguments)
}
