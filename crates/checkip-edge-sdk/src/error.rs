//! Error types for checkip-edge handlers

use serde::Serialize;
use thiserror::Error;

/// Errors that can occur in a handler
#[derive(Error, Debug)]
pub enum HandlerError {
    #[error("IPC error: {0}")]
    IpcError(String),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    #[error("Internal error: {0}")]
    Internal(String),
}

/// JSON body used for every error response.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ErrorBody<'a> {
    pub message: &'a str,
    pub error: &'a str,
}

impl HandlerError {
    /// Convert the error to an HTTP status code
    pub fn status_code(&self) -> u16 {
        match self {
            HandlerError::ServiceUnavailable(_) => 503,
            _ => 500,
        }
    }

    /// Short, client-facing summary of the status.
    pub fn message(&self) -> &'static str {
        match self {
            HandlerError::ServiceUnavailable(_) => "Service unavailable",
            _ => "Internal server error",
        }
    }

    /// Detail shown to clients in the `error` field.
    pub fn detail(&self) -> String {
        match self {
            HandlerError::ServiceUnavailable(msg) | HandlerError::Internal(msg) => msg.clone(),
            other => other.to_string(),
        }
    }

    /// Convert to a Response
    pub fn to_response(&self) -> crate::Response {
        let detail = self.detail();
        crate::Response::json(
            self.status_code(),
            ErrorBody {
                message: self.message(),
                error: &detail,
            },
        )
    }
}

impl From<HandlerError> for crate::Response {
    fn from(err: HandlerError) -> Self {
        err.to_response()
    }
}
