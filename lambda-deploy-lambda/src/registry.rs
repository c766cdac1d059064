//! Remote function registry seam

use async_trait::async_trait;
use bytes::Bytes;
use thiserror::Error;

use crate::function::{CreateFunctionRequest, DeployResponse, FunctionRecord};

/// Failure to get any response out of the registry
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("Failed to list functions: {0}")]
    List(String),

    #[error("Request for {function_name} failed without a response: {message}")]
    Transport {
        function_name: String,
        message: String,
    },
}

/// Control plane operations of a function-as-a-service platform.
///
/// `create_function` and `update_function_code` report unsuccessful HTTP
/// responses through [`DeployResponse`] instead of an error, so callers can
/// decide whether to keep going.
#[async_trait]
pub trait FunctionRegistry: Send + Sync {
    async fn list_functions(&self) -> Result<Vec<FunctionRecord>, RegistryError>;

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<DeployResponse, RegistryError>;

    async fn update_function_code(
        &self,
        function_name: &str,
        zip_file: Bytes,
        publish: bool,
    ) -> Result<DeployResponse, RegistryError>;

    /// Names of all registered functions
    async fn function_names(&self) -> Result<Vec<String>, RegistryError> {
        Ok(self
            .list_functions()
            .await?
            .into_iter()
            .map(|f| f.function_name)
            .collect())
    }
}
