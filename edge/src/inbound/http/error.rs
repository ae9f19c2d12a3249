//! HTTP mapping for edge errors.

use actix_web::{HttpResponse, ResponseError, http::StatusCode};

use crate::domain::{DomainError, ErrorCode};

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, DomainError>;

impl ResponseError for DomainError {
    fn status_code(&self) -> StatusCode {
        match self.code() {
            ErrorCode::InvalidRequest => StatusCode::BAD_REQUEST,
            ErrorCode::InvalidPostalCode => StatusCode::UNPROCESSABLE_ENTITY,
            ErrorCode::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorCode::InternalError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        HttpResponse::build(self.status_code()).json(self)
    }
}
