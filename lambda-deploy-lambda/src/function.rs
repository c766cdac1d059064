//! Lambda function models

use bytes::Bytes;
use serde::{Deserialize, Serialize};

/// Metadata of a function known to the remote registry
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "PascalCase")]
pub struct FunctionRecord {
    pub function_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub function_arn: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub runtime: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handler: Option<String>,
    pub code_size: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub memory_size: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_modified: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub code_sha256: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub version: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
}

impl FunctionRecord {
    pub fn named(function_name: impl Into<String>) -> Self {
        Self {
            function_name: function_name.into(),
            ..Default::default()
        }
    }

    /// Sorted-key, pretty-printed JSON
    pub fn to_pretty_json(&self) -> String {
        // Value maps are ordered by key
        serde_json::to_value(self)
            .and_then(|value| serde_json::to_string_pretty(&value))
            .unwrap_or_else(|_| format!("{:?}", self))
    }
}

/// Everything needed to create a function
#[derive(Debug, Clone)]
pub struct CreateFunctionRequest {
    pub function_name: String,
    pub runtime: String,
    pub role: String,
    pub handler: String,
    pub zip_file: Bytes,
    pub description: String,
    pub timeout: i32,
    pub memory_size: i32,
    pub publish: bool,
}

/// Outcome of a create or update call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeployResponse {
    /// HTTP status of the response
    pub status_code: u16,
    /// Published version, when the call succeeded
    pub version: Option<String>,
    /// Error detail for unsuccessful responses
    pub message: Option<String>,
}

impl DeployResponse {
    pub fn success(status_code: u16, version: Option<String>) -> Self {
        Self {
            status_code,
            version,
            message: None,
        }
    }

    pub fn failure(status_code: u16, message: impl Into<String>) -> Self {
        Self {
            status_code,
            version: None,
            message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self.status_code, 200 | 201)
    }
}
