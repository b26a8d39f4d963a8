// src/errors.rs
// DOCUMENTATION: Custom error types and HTTP responses
// PURPOSE: Centralized error handling for entire application

use actix_web::{error::ResponseError, http::StatusCode, HttpResponse};
use serde_json::json;
use thiserror::Error;

/// Application-specific error types
/// DOCUMENTATION: Error enum covering every failure class in this service
/// Each variant maps to an HTTP status code and a `{"error": ...}` body
#[derive(Error, Debug)]
pub enum AttractionsError {
    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Already exists: {0}")]
    AlreadyExists(String),

    #[error("Database error: {0}")]
    DatabaseError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Validation error: {0}")]
    ValidationError(String),

    #[error("External API error: {0}")]
    ExternalApiError(String),
}

/// Convert AttractionsError to HTTP response
/// DOCUMENTATION: Maps error types to HTTP status codes and JSON responses
/// Clients receive a flat `{"error": "<message>"}` body; duplicate
/// compilation items are a client error and stay 400
impl ResponseError for AttractionsError {
    fn error_response(&self) -> HttpResponse {
        let body = json!({ "error": self.to_string() });
        HttpResponse::build(self.status_code()).json(body)
    }

    fn status_code(&self) -> StatusCode {
        match self {
            AttractionsError::NotFound(_) => StatusCode::NOT_FOUND,
            AttractionsError::AlreadyExists(_) => StatusCode::BAD_REQUEST,
            AttractionsError::DatabaseError(_) => StatusCode::INTERNAL_SERVER_ERROR,
            AttractionsError::InvalidInput(_) => StatusCode::BAD_REQUEST,
            AttractionsError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AttractionsError::ExternalApiError(_) => StatusCode::BAD_GATEWAY,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(
            AttractionsError::NotFound("x".into()).status_code(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            AttractionsError::AlreadyExists("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttractionsError::ValidationError("x".into()).status_code(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            AttractionsError::DatabaseError("x".into()).status_code(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
    }
}
