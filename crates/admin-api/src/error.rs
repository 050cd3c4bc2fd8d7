//! Error type for the admin API client

use reqwest::StatusCode;
use serde::Deserialize;
use thiserror::Error;

/// Error body returned by the admin endpoints on failure
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ApiErrorBody {
    pub error: Option<String>,
}

#[derive(Error, Debug)]
pub enum AdminApiError {
    /// Non-success HTTP status. The message comes from the body's `error`
    /// field when present.
    #[error("{message}")]
    RequestFailed { status: StatusCode, message: String },

    #[error("Network error: {0}")]
    NetworkError(#[from] reqwest::Error),

    #[error("URL parse error: {0}")]
    UrlParseError(#[from] url::ParseError),

    #[error("JSON error: {0}")]
    SerializationError(#[from] serde_json::Error),

    #[error("Invalid parameters: {0}")]
    InvalidParameters(String),
}

impl AdminApiError {
    /// Build a `RequestFailed` from a status and the raw response body
    pub fn from_response(status: StatusCode, body: &str) -> Self {
        let message = serde_json::from_str::<ApiErrorBody>(body)
            .ok()
            .and_then(|b| b.error)
            .filter(|m| !m.is_empty())
            .unwrap_or_else(|| format!("Request failed ({})", status.as_u16()));

        AdminApiError::RequestFailed { status, message }
    }

    /// HTTP status, if the server answered at all
    pub fn status(&self) -> Option<StatusCode> {
        match self {
            AdminApiError::RequestFailed { status, .. } => Some(*status),
            AdminApiError::NetworkError(e) => e.status(),
            _ => None,
        }
    }
}

pub type Result<T> = std::result::Result<T, AdminApiError>;
