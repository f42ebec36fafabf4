mod http;

#[cfg(test)]
pub mod fake;

pub use http::TfeClient;

use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const DEFAULT_ADDRESS: &str = "https://app.terraform.io";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    pub id: String,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Variable {
    pub id: String,
    pub key: String,
    /// Empty for sensitive variables; the platform never returns their value.
    pub value: String,
    pub category: VariableCategory,
    pub hcl: bool,
    pub sensitive: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VariableCategory {
    #[default]
    Terraform,
    Env,
    #[serde(other)]
    Other,
}

/// Attributes sent on a variable update. Unset fields are left untouched remotely.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct VariableUpdateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("unauthorized")]
    Unauthorized,
    #[error("resource not found")]
    NotFound,
    #[error("unexpected status {status}: {detail}")]
    Status { status: u16, detail: String },
    #[error("invalid address {0:?}")]
    Address(String),
    #[error("token contains characters not allowed in an HTTP header")]
    InvalidToken,
    #[error("request failed: {}", with_causes(.0))]
    Transport(#[from] reqwest::Error),
    #[error("invalid response body: {0}")]
    Decode(#[from] serde_json::Error),
    #[error("encoding request body: {0}")]
    Encode(serde_json::Error),
}

/// `err` followed by each distinct message in its source chain.
fn with_causes(err: &dyn std::error::Error) -> String {
    let mut msg = err.to_string();
    let mut source = err.source();
    while let Some(cause) = source {
        let text = cause.to_string();
        if !msg.contains(&text) {
            msg.push_str(": ");
            msg.push_str(&text);
        }
        source = cause.source();
    }
    msg
}

impl ApiError {
    pub fn code(&self) -> &'static str {
        match self {
            ApiError::Unauthorized => "UNAUTHORIZED",
            ApiError::NotFound => "NOT_FOUND",
            ApiError::Address(_) | ApiError::InvalidToken => "INVALID_ARGS",
            ApiError::Status { .. } | ApiError::Transport(_) | ApiError::Decode(_) => "API_ERROR",
            ApiError::Encode(_) => "INTERNAL",
        }
    }
}

/// The three remote operations the commands need.
pub trait WorkspaceApi {
    fn read_workspace(&self, organization: &str, name: &str) -> Result<Workspace, ApiError>;
    fn list_variables(&self, workspace_id: &str) -> Result<Vec<Variable>, ApiError>;
    /// `Ok(None)` means the platform answered successfully but sent no variable back.
    fn update_variable(
        &self,
        workspace_id: &str,
        variable_id: &str,
        options: &VariableUpdateOptions,
    ) -> Result<Option<Variable>, ApiError>;
}
