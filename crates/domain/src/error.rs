//! Domain error types

use thiserror::Error;

/// Domain-level errors that can occur during validation or processing.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// The provided URL is invalid or malformed.
    #[error("invalid URL: {0}")]
    InvalidUrl(String),

    /// A request template is missing a required field.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A collection has an invalid structure.
    #[error("invalid collection: {0}")]
    InvalidCollection(String),

    /// An environment has an invalid structure.
    #[error("invalid environment: {0}")]
    InvalidEnvironment(String),
}

/// Result type alias for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
