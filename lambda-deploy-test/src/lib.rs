//! Test utilities for lambda-deploy
//!
//! Provides fakes and fixtures for exercising deploys without AWS:
//! - A registry that records every call and answers from memory
//! - An installer that writes canned files or fails on demand
//! - A builder for lambda root directories
//!
//! ## Usage
//!
//! ```rust,no_run
//! use lambda_deploy_test::{FakeRegistry, LambdaTree};
//!
//! #[tokio::test]
//! async fn test_deploy() {
//!     let tree = LambdaTree::new().lambda("resize", &[("lambda_function.py", "")]);
//!     let registry = FakeRegistry::with_functions(&["resize"]);
//!
//!     // Build a DeployService over tree.path() and registry
//! }
//! ```

pub mod fixtures;
pub mod installer;
pub mod registry;

pub use fixtures::LambdaTree;
pub use installer::FakeInstaller;
pub use registry::{FakeRegistry, RegistryCall};

/// Role ARN used by test settings
pub const TEST_ROLE: &str = "arn:aws:iam::000000000000:role/lambda-role";

/// Route `tracing` output through the test harness, once per process
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "debug".into()),
        )
        .with_test_writer()
        .try_init();
}
