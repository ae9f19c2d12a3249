//! Edge error type.
//!
//! The edge only produces its own errors before delegating or when the
//! resolver cannot be reached; resolver answers are relayed untouched.

use serde::Serialize;

/// Failure category, mapped to an HTTP status by the inbound adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The request body could not be decoded.
    InvalidRequest,
    /// The CEP is not eight ASCII digits.
    InvalidPostalCode,
    /// The endpoint only accepts `POST`.
    MethodNotAllowed,
    /// The resolver could not be reached.
    InternalError,
}

/// Error answered by the edge as `{"message": "..."}`.
///
/// # Examples
/// ```
/// use edge::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::invalid_postal_code();
/// assert_eq!(err.code(), ErrorCode::InvalidPostalCode);
/// assert_eq!(err.message(), "invalid zipcode");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct DomainError {
    #[serde(skip)]
    code: ErrorCode,
    message: &'static str,
}

impl DomainError {
    /// Failure category.
    #[must_use]
    pub const fn code(&self) -> ErrorCode {
        self.code
    }

    /// Client-facing message.
    #[must_use]
    pub const fn message(&self) -> &'static str {
        self.message
    }

    /// Body could not be decoded.
    #[must_use]
    pub const fn invalid_request() -> Self {
        Self {
            code: ErrorCode::InvalidRequest,
            message: "invalid request",
        }
    }

    /// CEP failed validation.
    #[must_use]
    pub const fn invalid_postal_code() -> Self {
        Self {
            code: ErrorCode::InvalidPostalCode,
            message: "invalid zipcode",
        }
    }

    /// Method other than `POST`.
    #[must_use]
    pub const fn method_not_allowed() -> Self {
        Self {
            code: ErrorCode::MethodNotAllowed,
            message: "method not allowed",
        }
    }

    /// Resolver unreachable. Causes are logged, never returned.
    #[must_use]
    pub const fn internal() -> Self {
        Self {
            code: ErrorCode::InternalError,
            message: "internal server error",
        }
    }
}
