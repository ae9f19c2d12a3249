//! Resolver error type.
//!
//! Each variant of [`ErrorCode`] carries one fixed client-facing message;
//! causes are logged where the error is raised and never serialised.

use serde::Serialize;

/// Message for bodies that are not a JSON object with a string `cep`.
pub const INVALID_REQUEST_MESSAGE: &str = "invalid request";
/// Message for codes that fail validation.
pub const INVALID_ZIPCODE_MESSAGE: &str = "invalid zipcode";
/// Message for codes the directory cannot resolve.
pub const ZIPCODE_NOT_FOUND_MESSAGE: &str = "can not find zipcode";
/// Message for weather lookups that fail for any reason.
pub const TEMPERATURE_UNAVAILABLE_MESSAGE: &str = "failed to get temperature";
/// Message for requests using a method other than `POST`.
pub const METHOD_NOT_ALLOWED_MESSAGE: &str = "method not allowed";

/// Failure category, mapped to an HTTP status by the inbound adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// The request body could not be decoded.
    InvalidRequest,
    /// The postal code has the wrong shape.
    InvalidPostalCode,
    /// The postal code does not resolve to a locality.
    NotFound,
    /// The endpoint only accepts `POST`.
    MethodNotAllowed,
    /// An upstream dependency failed.
    InternalError,
}

/// Error returned by the resolver use-case.
///
/// Only `message` reaches the wire, as `{"message": "..."}`.
///
/// # Examples
/// ```
/// use resolver::domain::{DomainError, ErrorCode};
///
/// let err = DomainError::not_found();
/// assert_eq!(err.code(), ErrorCode::NotFound);
/// assert_eq!(err.message(), "can not find zipcode");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{message}")]
pub struct DomainError {
    #[serde(skip)]
    code: ErrorCode,
    message: &'static str,
}

impl DomainError {
    const fn new(code: ErrorCode, message: &'static str) -> Self {
        Self { code, message }
    }

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
        Self::new(ErrorCode::InvalidRequest, INVALID_REQUEST_MESSAGE)
    }

    /// Postal code failed validation.
    #[must_use]
    pub const fn invalid_postal_code() -> Self {
        Self::new(ErrorCode::InvalidPostalCode, INVALID_ZIPCODE_MESSAGE)
    }

    /// Postal code is unknown to the directory.
    #[must_use]
    pub const fn not_found() -> Self {
        Self::new(ErrorCode::NotFound, ZIPCODE_NOT_FOUND_MESSAGE)
    }

    /// Temperature could not be fetched.
    #[must_use]
    pub const fn temperature_unavailable() -> Self {
        Self::new(ErrorCode::InternalError, TEMPERATURE_UNAVAILABLE_MESSAGE)
    }

    /// Method other than `POST`.
    #[must_use]
    pub const fn method_not_allowed() -> Self {
        Self::new(ErrorCode::MethodNotAllowed, METHOD_NOT_ALLOWED_MESSAGE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case::invalid_request(DomainError::invalid_request(), ErrorCode::InvalidRequest, "invalid request")]
    #[case::invalid_postal_code(
        DomainError::invalid_postal_code(),
        ErrorCode::InvalidPostalCode,
        "invalid zipcode"
    )]
    #[case::not_found(DomainError::not_found(), ErrorCode::NotFound, "can not find zipcode")]
    #[case::temperature(
        DomainError::temperature_unavailable(),
        ErrorCode::InternalError,
        "failed to get temperature"
    )]
    #[case::method(
        DomainError::method_not_allowed(),
        ErrorCode::MethodNotAllowed,
        "method not allowed"
    )]
    fn constructors_pair_code_and_message(
        #[case] error: DomainError,
        #[case] code: ErrorCode,
        #[case] message: &str,
    ) {
        assert_eq!(error.code(), code);
        assert_eq!(error.message(), message);
        assert_eq!(error.to_string(), message);
    }

    #[test]
    fn serialises_message_only() {
        let value = serde_json::to_value(DomainError::not_found()).expect("serialisable error");
        assert_eq!(value, serde_json::json!({"message": "can not find zipcode"}));
    }
}
