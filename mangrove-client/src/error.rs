//! Client error types

use shared::error::{AppError, ErrorCode};
use thiserror::Error;

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed (transport-level)
    #[error("HTTP error: {0}")]
    Network(#[from] reqwest::Error),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Login rejected by the backend
    #[error("Invalid username or password")]
    InvalidCredentials,

    /// Authentication required
    #[error("Authentication required")]
    Unauthorized,

    /// Bearer credential no longer accepted by the backend
    #[error("Session expired")]
    SessionExpired,

    /// Permission denied
    #[error("Permission denied: {0}")]
    Forbidden(String),

    /// Structured API error that maps to no dedicated variant
    #[error("API error {code}: {message}")]
    Api { code: ErrorCode, message: String },

    /// Credential store I/O failure
    #[error("Storage error: {0}")]
    Storage(#[from] std::io::Error),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Whether this error means the current session is no longer valid
    ///
    /// The session manager reacts to these by clearing the session, same
    /// as an explicit logout.
    pub fn invalidates_session(&self) -> bool {
        match self {
            ClientError::Unauthorized | ClientError::SessionExpired => true,
            ClientError::Api { code, .. } => code.invalidates_session(),
            _ => false,
        }
    }

    /// The wire error code this error corresponds to
    pub fn error_code(&self) -> ErrorCode {
        match self {
            ClientError::Network(_) => ErrorCode::NetworkError,
            ClientError::InvalidResponse(_) => ErrorCode::Unknown,
            ClientError::InvalidCredentials => ErrorCode::InvalidCredentials,
            ClientError::Unauthorized => ErrorCode::NotAuthenticated,
            ClientError::SessionExpired => ErrorCode::SessionExpired,
            ClientError::Forbidden(_) => ErrorCode::PermissionDenied,
            ClientError::Api { code, .. } => *code,
            ClientError::Storage(_) => ErrorCode::InternalError,
            ClientError::Serialization(_) => ErrorCode::Unknown,
        }
    }
}

impl From<AppError> for ClientError {
    fn from(err: AppError) -> Self {
        match err.code {
            ErrorCode::InvalidCredentials => ClientError::InvalidCredentials,
            ErrorCode::NotAuthenticated => ClientError::Unauthorized,
            code if code.invalidates_session() => ClientError::SessionExpired,
            ErrorCode::PermissionDenied | ErrorCode::RoleRequired | ErrorCode::AdminRequired => {
                ClientError::Forbidden(err.message)
            }
            code => ClientError::Api {
                code,
                message: err.message,
            },
        }
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
