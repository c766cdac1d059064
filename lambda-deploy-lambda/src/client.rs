//! AWS Lambda backed function registry

use async_trait::async_trait;
use aws_config::{retry::RetryConfig, BehaviorVersion, SdkConfig};
use aws_sdk_lambda::{
    error::{DisplayErrorContext, SdkError},
    primitives::Blob,
    types::{FunctionCode, FunctionConfiguration, Runtime},
    Client,
};
use bytes::Bytes;
use tracing::debug;

use crate::function::{CreateFunctionRequest, DeployResponse, FunctionRecord};
use crate::registry::{FunctionRegistry, RegistryError};

/// Status returned by a successful CreateFunction call
const CREATED: u16 = 201;

/// Status returned by a successful UpdateFunctionCode call
const OK: u16 = 200;

/// Function registry backed by the AWS Lambda API
#[derive(Debug, Clone)]
pub struct AwsRegistry {
    client: Client,
}

impl AwsRegistry {
    pub fn new(config: &SdkConfig) -> Self {
        Self {
            client: Client::new(config),
        }
    }

    /// Load AWS configuration from the environment.
    ///
    /// Retries are disabled. `endpoint_url` points the client at a
    /// Lambda-compatible endpoint other than AWS, such as a local emulator.
    pub async fn from_env(endpoint_url: Option<&str>) -> Self {
        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).retry_config(RetryConfig::disabled());

        if let Some(url) = endpoint_url {
            debug!(endpoint_url = %url, "Using custom Lambda endpoint");
            loader = loader.endpoint_url(url);
        }

        Self::new(&loader.load().await)
    }
}

#[async_trait]
impl FunctionRegistry for AwsRegistry {
    async fn list_functions(&self) -> Result<Vec<FunctionRecord>, RegistryError> {
        let functions: Vec<FunctionConfiguration> = self
            .client
            .list_functions()
            .into_paginator()
            .items()
            .send()
            .try_collect()
            .await
            .map_err(|e| RegistryError::List(DisplayErrorContext(&e).to_string()))?;

        debug!(count = functions.len(), "ListFunctions");
        Ok(functions.iter().map(record).collect())
    }

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<DeployResponse, RegistryError> {
        let result = self
            .client
            .create_function()
            .function_name(&request.function_name)
            .runtime(Runtime::from(request.runtime.as_str()))
            .role(&request.role)
            .handler(&request.handler)
            .code(
                FunctionCode::builder()
                    .zip_file(Blob::new(request.zip_file.to_vec()))
                    .build(),
            )
            .description(&request.description)
            .timeout(request.timeout)
            .memory_size(request.memory_size)
            .publish(request.publish)
            .send()
            .await;

        match result {
            Ok(output) => Ok(DeployResponse::success(
                CREATED,
                output.version().map(str::to_string),
            )),
            Err(err) => failure_response(&request.function_name, err),
        }
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        zip_file: Bytes,
        publish: bool,
    ) -> Result<DeployResponse, RegistryError> {
        let result = self
            .client
            .update_function_code()
            .function_name(function_name)
            .zip_file(Blob::new(zip_file.to_vec()))
            .publish(publish)
            .send()
            .await;

        match result {
            Ok(output) => Ok(DeployResponse::success(
                OK,
                output.version().map(str::to_string),
            )),
            Err(err) => failure_response(function_name, err),
        }
    }
}

/// Turn an SDK error into a response when the service answered at all
fn failure_response<E>(
    function_name: &str,
    err: SdkError<E>,
) -> Result<DeployResponse, RegistryError>
where
    E: std::error::Error + Send + Sync + 'static,
{
    let message = DisplayErrorContext(&err).to_string();

    match err.raw_response() {
        Some(raw) => Ok(DeployResponse::failure(raw.status().as_u16(), message)),
        None => Err(RegistryError::Transport {
            function_name: function_name.to_string(),
            message,
        }),
    }
}

fn record(f: &FunctionConfiguration) -> FunctionRecord {
    FunctionRecord {
        function_name: f.function_name().unwrap_or_default().to_string(),
        function_arn: f.function_arn().map(str::to_string),
        runtime: f.runtime().map(|r| r.as_str().to_string()),
        role: f.role().map(str::to_string),
        handler: f.handler().map(str::to_string),
        code_size: f.code_size(),
        description: f.description().map(str::to_string),
        timeout: f.timeout(),
        memory_size: f.memory_size(),
        last_modified: f.last_modified().map(str::to_string),
        code_sha256: f.code_sha256().map(str::to_string),
        version: f.version().map(str::to_string),
        state: f.state().map(|s| s.as_str().to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_record_from_configuration() {
        let config = FunctionConfiguration::builder()
            .function_name("thumbnailer")
            .runtime(Runtime::Python312)
            .memory_size(256)
            .timeout(10)
            .version("$LATEST")
            .build();

        let record = record(&config);
        assert_eq!(record.function_name, "thumbnailer");
        assert_eq!(record.runtime.as_deref(), Some("python3.12"));
        assert_eq!(record.memory_size, Some(256));
        assert_eq!(record.timeout, Some(10));
        assert_eq!(record.version.as_deref(), Some("$LATEST"));
        assert_eq!(record.role, None);
    }
}
