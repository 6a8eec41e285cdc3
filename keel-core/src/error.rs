// Error types for the Keel framework

use crate::HttpResponse;
use crate::responses::ErrorResponse;
use thiserror::Error;

/// Error type returned by dependency providers.
pub type ProviderError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Error, Debug)]
pub enum Error {
    #[error("no provider registered for type {0}")]
    ProviderNotFound(String),

    #[error("provider for {expected} produced a value of a different type")]
    TypeMismatch { expected: String },

    #[error("error resolving dependency {type_name}: {source}")]
    Dependency {
        type_name: String,
        #[source]
        source: ProviderError,
    },

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Bad Request: {0}")]
    BadRequest(String),

    #[error("Not Found: {0}")]
    NotFound(String),

    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Internal server error: {0}")]
    Internal(String),
}

impl Error {
    /// Get the HTTP status code for this error
    pub fn status_code(&self) -> u16 {
        match self {
            Error::Validation(_) | Error::BadRequest(_) => 400,
            Error::NotFound(_) => 404,
            Error::ProviderNotFound(_)
            | Error::TypeMismatch { .. }
            | Error::Dependency { .. }
            | Error::Serialization(_)
            | Error::Config(_)
            | Error::Internal(_) => 500,
        }
    }

    /// Discriminator used in the `type` field of error envelopes
    pub fn error_type(&self) -> &'static str {
        match self {
            Error::Validation(_) => "validation_error",
            Error::BadRequest(_) => "bad_request",
            Error::NotFound(_) => "not_found",
            _ => "internal_error",
        }
    }

    /// Check if this is a client error (4xx)
    pub fn is_client_error(&self) -> bool {
        (400..500).contains(&self.status_code())
    }

    /// Check if this is a server error (5xx)
    pub fn is_server_error(&self) -> bool {
        self.status_code() >= 500
    }

    /// Render this error as a `{detail, type}` response.
    ///
    /// Server errors never leak their internal message; the detail is a
    /// generic "internal server error".
    pub fn to_response(&self) -> HttpResponse {
        let detail = if self.is_server_error() {
            "internal server error".to_string()
        } else {
            self.to_string()
        };
        let body = ErrorResponse::new(detail).with_type(self.error_type());
        HttpResponse::new(self.status_code())
            .with_json(&body)
            .unwrap_or_else(|_| HttpResponse::internal_server_error())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(Error::Validation("x".into()).status_code(), 400);
        assert_eq!(Error::BadRequest("x".into()).status_code(), 400);
        assert_eq!(Error::NotFound("x".into()).status_code(), 404);
        assert_eq!(Error::ProviderNotFound("Db".into()).status_code(), 500);
        assert_eq!(Error::Config("bad".into()).status_code(), 500);
    }

    #[test]
    fn test_dependency_error_keeps_source() {
        let err = Error::Dependency {
            type_name: "Db".into(),
            source: "connection refused".into(),
        };
        assert_eq!(
            err.to_string(),
            "error resolving dependency Db: connection refused"
        );
        assert!(std::error::Error::source(&err).is_some());
        assert!(err.is_server_error());
    }

    #[test]
    fn test_to_response_hides_server_detail() {
        let resp = Error::Internal("db password wrong".into()).to_response();
        assert_eq!(resp.status, 500);
        let body: serde_json::Value = resp.json().unwrap();
        assert_eq!(body["detail"], "internal server error");
        assert_eq!(body["type"], "internal_error");
    }

    #[test]
    fn test_to_response_client_error() {
        let resp = Error::NotFound("user 7".into()).to_response();
        assert_eq!(resp.status, 404);
        let body: serde_json::Value = resp.json().unwrap();
        assert_eq!(body["detail"], "Not Found: user 7");
        assert_eq!(body["type"], "not_found");
    }
}
