//! Application error types

use costcheck_domain::DomainError;
use thiserror::Error;

use crate::ports::{HttpClientError, ProbeSinkError};

/// Application-level errors.
#[derive(Debug, Error)]
pub enum ApplicationError {
    /// A domain validation error occurred.
    #[error("domain error: {0}")]
    Domain(#[from] DomainError),

    /// An HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] HttpClientError),

    /// The probe log could not be written.
    #[error("probe output error: {0}")]
    ProbeSink(#[from] ProbeSinkError),
}

/// Result type alias for application operations.
pub type ApplicationResult<T> = Result<T, ApplicationError>;
