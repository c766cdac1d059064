//! Lambda deployment for lambda-deploy
//!
//! Talks to the remote function registry and drives packaging and
//! create-or-update deployment of lambda targets.

pub mod client;
pub mod function;
pub mod registry;
pub mod service;

pub use client::AwsRegistry;
pub use function::{CreateFunctionRequest, DeployResponse, FunctionRecord};
pub use registry::{FunctionRegistry, RegistryError};
pub use service::{DeployError, DeployReport, DeployService};
