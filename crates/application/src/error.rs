//! Application error types

use relay_domain::DomainError;
use thiserror::Error;

use crate::ports::HttpClientError;

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A placeholder names a variable the active environment does not define.
    #[error("variable not found: {0}")]
    VariableNotFound(String),

    /// A request template failed pre-flight checks.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// The HTTP exchange failed.
    #[error("request failed: {0}")]
    RequestFailed(#[from] HttpClientError),

    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// A storage operation failed.
    #[error("storage error: {0}")]
    Storage(String),

    /// A caller-supplied argument was rejected.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
