//! Command line surface

use clap::{Parser, Subcommand};
use lambda_deploy_core::settings::split_names;
use lambda_deploy_core::{Settings, DEFAULT_ENV_FILE};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "lambda-deploy")]
#[command(about = "Package directories of code and deploy them as AWS Lambda functions")]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Directory holding one sub-directory per lambda
    #[arg(short, long, global = true)]
    pub directory: Option<PathBuf>,

    /// Env file to load before reading settings
    #[arg(short, long, global = true, default_value = DEFAULT_ENV_FILE)]
    pub env_file: PathBuf,

    /// Variable to write into each archive's .env (repeatable)
    #[arg(
        short = 'E',
        long = "environment-variable",
        global = true,
        value_name = "NAME"
    )]
    pub environment_variables: Vec<String>,

    /// IAM role ARN for newly created functions
    #[arg(short, long, global = true)]
    pub role: Option<String>,

    /// Log level (CRITICAL, ERROR, WARNING, INFO, DEBUG, NOTSET or a tracing level)
    #[arg(short, long, global = true, env = "LAMBDA_LOGGING_LEVEL")]
    pub logging_level: Option<String>,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Package and deploy lambdas, all of them when no names are given
    Deploy {
        /// Lambda directory names
        names: Vec<String>,
    },

    /// Print the metadata of every deployed function
    List,
}

impl Cli {
    /// Apply command line overrides on top of loaded settings
    pub fn apply(&self, settings: &mut Settings) {
        if let Some(directory) = &self.directory {
            settings.directory = Some(directory.clone());
        }

        if let Some(role) = &self.role {
            settings.role = Some(role.clone());
        }

        if !self.environment_variables.is_empty() {
            settings.env_vars = self
                .environment_variables
                .iter()
                .flat_map(|names| split_names(names))
                .collect();
        }
    }
}
