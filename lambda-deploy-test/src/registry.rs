//! In-memory function registry

use async_trait::async_trait;
use bytes::Bytes;
use lambda_deploy_lambda::{
    CreateFunctionRequest, DeployResponse, FunctionRecord, FunctionRegistry, RegistryError,
};
use parking_lot::Mutex;
use std::collections::{BTreeMap, HashSet};

/// A call received by [`FakeRegistry`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryCall {
    List,
    Create {
        function_name: String,
        runtime: String,
        role: String,
        handler: String,
        description: String,
        timeout: i32,
        memory_size: i32,
        publish: bool,
        zip_file: Bytes,
    },
    Update {
        function_name: String,
        publish: bool,
        zip_file: Bytes,
    },
}

impl RegistryCall {
    pub fn function_name(&self) -> Option<&str> {
        match self {
            Self::List => None,
            Self::Create { function_name, .. } | Self::Update { function_name, .. } => {
                Some(function_name)
            }
        }
    }
}

/// Registry that answers from memory and records every call.
///
/// Functions named with [`FakeRegistry::reject`] get a 500 response;
/// [`FakeRegistry::unreachable`] makes every call fail without a response.
#[derive(Default)]
pub struct FakeRegistry {
    functions: Mutex<BTreeMap<String, u32>>,
    rejected: Mutex<HashSet<String>>,
    unreachable: Mutex<bool>,
    calls: Mutex<Vec<RegistryCall>>,
}

impl FakeRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry that already holds the given functions at version 1
    pub fn with_functions(names: &[&str]) -> Self {
        let registry = Self::new();
        registry
            .functions
            .lock()
            .extend(names.iter().map(|name| (name.to_string(), 1)));
        registry
    }

    /// Answer create and update calls for `name` with a server error
    pub fn reject(self, name: &str) -> Self {
        self.rejected.lock().insert(name.to_string());
        self
    }

    pub fn unreachable(self) -> Self {
        *self.unreachable.lock() = true;
        self
    }

    pub fn calls(&self) -> Vec<RegistryCall> {
        self.calls.lock().clone()
    }

    /// Create and update calls, without list calls
    pub fn uploads(&self) -> Vec<RegistryCall> {
        self.calls()
            .into_iter()
            .filter(|call| *call != RegistryCall::List)
            .collect()
    }

    pub fn function_names_now(&self) -> Vec<String> {
        self.functions.lock().keys().cloned().collect()
    }

    fn check_reachable(&self, function_name: &str) -> Result<(), RegistryError> {
        if *self.unreachable.lock() {
            return Err(RegistryError::Transport {
                function_name: function_name.to_string(),
                message: "connection refused".to_string(),
            });
        }
        Ok(())
    }

    fn publish(&self, function_name: &str, status_code: u16) -> DeployResponse {
        if self.rejected.lock().contains(function_name) {
            return DeployResponse::failure(500, "ServiceException: injected failure");
        }

        let mut functions = self.functions.lock();
        let version = functions.entry(function_name.to_string()).or_insert(0);
        *version += 1;
        DeployResponse::success(status_code, Some(version.to_string()))
    }
}

#[async_trait]
impl FunctionRegistry for FakeRegistry {
    async fn list_functions(&self) -> Result<Vec<FunctionRecord>, RegistryError> {
        self.calls.lock().push(RegistryCall::List);
        if *self.unreachable.lock() {
            return Err(RegistryError::List("connection refused".to_string()));
        }

        Ok(self
            .functions
            .lock()
            .iter()
            .map(|(name, version)| FunctionRecord {
                version: Some(version.to_string()),
                runtime: Some("python3.12".to_string()),
                ..FunctionRecord::named(name.clone())
            })
            .collect())
    }

    async fn create_function(
        &self,
        request: CreateFunctionRequest,
    ) -> Result<DeployResponse, RegistryError> {
        self.calls.lock().push(RegistryCall::Create {
            function_name: request.function_name.clone(),
            runtime: request.runtime.clone(),
            role: request.role.clone(),
            handler: request.handler.clone(),
            description: request.description.clone(),
            timeout: request.timeout,
            memory_size: request.memory_size,
            publish: request.publish,
            zip_file: request.zip_file.clone(),
        });
        self.check_reachable(&request.function_name)?;

        if self.functions.lock().contains_key(&request.function_name) {
            return Ok(DeployResponse::failure(
                409,
                format!("Function already exist: {}", request.function_name),
            ));
        }

        Ok(self.publish(&request.function_name, 201))
    }

    async fn update_function_code(
        &self,
        function_name: &str,
        zip_file: Bytes,
        publish: bool,
    ) -> Result<DeployResponse, RegistryError> {
        self.calls.lock().push(RegistryCall::Update {
            function_name: function_name.to_string(),
            publish,
            zip_file,
        });
        self.check_reachable(function_name)?;

        if !self.functions.lock().contains_key(function_name) {
            return Ok(DeployResponse::failure(
                404,
                format!("Function not found: {}", function_name),
            ));
        }

        Ok(self.publish(function_name, 200))
    }
}
