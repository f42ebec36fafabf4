use crate::api::ApiError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CommandError {
    #[error("{0}")]
    InvalidArgs(String),

    #[error("variable {0} not found")]
    VariableNotFound(String),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error("{0}")]
    Internal(String),
}

impl CommandError {
    pub fn code(&self) -> &'static str {
        match self {
            CommandError::InvalidArgs(_) => "INVALID_ARGS",
            CommandError::VariableNotFound(_) => "NOT_FOUND",
            CommandError::Api(e) => e.code(),
            CommandError::Internal(_) => "INTERNAL",
        }
    }

    pub fn invalid_args(msg: impl Into<String>) -> Self {
        CommandError::InvalidArgs(msg.into())
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        CommandError::Internal(msg.into())
    }
}
