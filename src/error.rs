//! Error handling for the model console

use std::fmt;
use thiserror::Error;

use model_console_api::AdminApiError;

/// Unified error type for the model console
#[derive(Error, Debug)]
pub enum Error {
    /// No admin token is stored; data calls are suppressed
    #[error("Not signed in")]
    Unauthenticated,

    /// The admin endpoint answered with a non-success status
    #[error("{message}")]
    RequestFailed {
        status: Option<u16>,
        message: String,
    },

    /// Network, URL or decoding failure talking to the admin endpoints
    #[error("API error: {0}")]
    Api(AdminApiError),

    /// JSON serialization or deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// Reading or writing the persisted token failed
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Caller-supplied arguments violate an operation's preconditions
    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),

    /// A save is already pending for the current draft
    #[error("A save is already in progress")]
    SaveInProgress,

    /// Configuration errors
    #[error("Configuration error: {0}")]
    Config(String),
}

impl From<AdminApiError> for Error {
    fn from(err: AdminApiError) -> Self {
        match err {
            AdminApiError::RequestFailed { status, message } => Error::RequestFailed {
                status: Some(status.as_u16()),
                message,
            },
            other => Error::Api(other),
        }
    }
}

impl Error {
    /// Create a new invalid-parameters error
    pub fn invalid<T: fmt::Display>(msg: T) -> Self {
        Error::InvalidParameters(msg.to_string())
    }

    /// Create a new configuration error
    pub fn config<T: fmt::Display>(msg: T) -> Self {
        Error::Config(msg.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;
    use reqwest::StatusCode;

    #[test]
    fn test_request_failed_keeps_server_message() {
        let api = AdminApiError::RequestFailed {
            status: StatusCode::FORBIDDEN,
            message: "Bad token".to_string(),
        };
        let err = Error::from(api);
        assert_eq!(err.to_string(), "Bad token");
        assert!(matches!(err, Error::RequestFailed { status: Some(403), .. }));
    }

    #[test]
    fn test_other_api_errors_are_wrapped() {
        let err = Error::from(AdminApiError::InvalidParameters("take".to_string()));
        assert!(matches!(err, Error::Api(_)));
    }
}
