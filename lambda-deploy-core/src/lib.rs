//! Core types for lambda-deploy
//!
//! This crate provides the configuration layer and the deployment target
//! model shared by the packager and the deployer.

pub mod env_file;
pub mod error;
pub mod settings;
pub mod source;
pub mod target;

pub use error::ConfigError;
pub use settings::Settings;
pub use source::ConfigSource;
pub use target::DeploymentTarget;

/// Name of the env file read by default and synthesized into every archive
pub const DEFAULT_ENV_FILE: &str = ".env";
