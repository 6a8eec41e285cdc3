//! Response envelopes
//!
//! Uniform JSON bodies for handler responses:
//!
//! - success: `{"data": ..., "message": ..., "success": true}`
//! - error: `{"detail": ..., "type": "not_found"}`
//! - paginated: a success envelope whose data is
//!   `{"items", "total", "page", "page_size", "total_pages"}`

use crate::{Error, HttpResponse};
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Standard envelope; `success` is true for 2xx statuses
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T = Value> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<Value>,
}

/// Error envelope
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: Value,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub error_type: Option<String>,
}

impl ErrorResponse {
    pub fn new(detail: impl Into<Value>) -> Self {
        Self {
            detail: detail.into(),
            error_type: None,
        }
    }

    pub fn with_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }
}

/// One page of a collection
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PaginatedResponse<T> {
    pub items: T,
    pub total: u64,
    pub page: u64,
    pub page_size: u64,
    pub total_pages: u64,
}

impl<T> PaginatedResponse<T> {
    /// `total_pages` is `total / page_size` rounded up; zero when
    /// `page_size` is zero.
    pub fn new(items: T, total: u64, page: u64, page_size: u64) -> Self {
        Self {
            items,
            total,
            page,
            page_size,
            total_pages: if page_size == 0 { 0 } else { total.div_ceil(page_size) },
        }
    }
}

/// Builder for [`ApiResponse`] envelopes
#[derive(Debug, Clone)]
pub struct ResponseBuilder<T = Value> {
    status: u16,
    data: Option<T>,
    message: Option<String>,
    errors: Option<Value>,
}

impl<T: Serialize> ResponseBuilder<T> {
    /// Starts at status 200
    pub fn new() -> Self {
        Self {
            status: 200,
            data: None,
            message: None,
            errors: None,
        }
    }

    pub fn status(mut self, status: u16) -> Self {
        self.status = status;
        self
    }

    pub fn data(mut self, data: T) -> Self {
        self.data = Some(data);
        self
    }

    pub fn message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn errors(mut self, errors: impl Into<Value>) -> Self {
        self.errors = Some(errors.into());
        self
    }

    pub fn build(self) -> Result<HttpResponse, Error> {
        let body = ApiResponse {
            data: self.data,
            message: self.message,
            success: (200..300).contains(&self.status),
            errors: self.errors,
        };
        HttpResponse::new(self.status).with_json(&body)
    }
}

impl<T: Serialize> Default for ResponseBuilder<T> {
    fn default() -> Self {
        Self::new()
    }
}

/// 200 with `data`
pub fn success<T: Serialize>(data: T) -> Result<HttpResponse, Error> {
    ResponseBuilder::new().data(data).build()
}

/// 201 with `data`
pub fn created<T: Serialize>(data: T) -> Result<HttpResponse, Error> {
    ResponseBuilder::new().status(201).data(data).build()
}

/// 200 with a [`PaginatedResponse`] as data
pub fn paginated<T: Serialize>(items: T, total: u64, page: u64, page_size: u64) -> Result<HttpResponse, Error> {
    success(PaginatedResponse::new(items, total, page, page_size))
}

fn error_response(status: u16, error_type: &str, detail: Value) -> HttpResponse {
    let body = ErrorResponse::new(detail).with_type(error_type);
    HttpResponse::new(status)
        .with_json(&body)
        .unwrap_or_else(|_| HttpResponse::new(status))
}

pub fn bad_request(detail: impl Into<Value>) -> HttpResponse {
    error_response(400, "bad_request", detail.into())
}

pub fn unauthorized(detail: impl Into<Value>) -> HttpResponse {
    error_response(401, "unauthorized", detail.into())
}

pub fn forbidden(detail: impl Into<Value>) -> HttpResponse {
    error_response(403, "forbidden", detail.into())
}

pub fn not_found(detail: impl Into<Value>) -> HttpResponse {
    error_response(404, "not_found", detail.into())
}

pub fn internal_server_error(detail: impl Into<Value>) -> HttpResponse {
    error_response(500, "internal_server_error", detail.into())
}
