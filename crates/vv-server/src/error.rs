//! Error-to-HTTP response conversion.
//!
//! Implements `IntoResponse` for [`vv_core::Error`] so that route handlers
//! can return `Result<T, AppError>` and use `?` on core results.

use axum::http::{header, HeaderValue, StatusCode};
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::middleware::request_id::current_request_id;

/// Wrapper so we can implement `IntoResponse` for an external type.
///
/// The request id defaults to the one set by the request-id middleware for
/// the request being handled.
pub struct AppError {
    inner: vv_core::Error,
    request_id: Option<String>,
}

impl AppError {
    pub fn new(inner: vv_core::Error) -> Self {
        Self {
            inner,
            request_id: current_request_id(),
        }
    }
}

impl From<vv_core::Error> for AppError {
    fn from(e: vv_core::Error) -> Self {
        Self::new(e)
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.inner.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        if status.is_server_error() {
            tracing::error!(
                status = %status,
                error = %self.inner,
                "Server error in API handler"
            );
        } else {
            tracing::debug!(status = %status, error = %self.inner, "Request rejected");
        }

        let code = match &self.inner {
            vv_core::Error::NotFound { .. } => "not_found",
            vv_core::Error::RangeNotSatisfiable { .. } => "range_not_satisfiable",
            vv_core::Error::Validation(_) => "validation_error",
            vv_core::Error::PayloadTooLarge(_) => "payload_too_large",
            vv_core::Error::Database { .. } => "database_error",
            vv_core::Error::Io { .. } => "io_error",
            vv_core::Error::Internal(_) => "internal_error",
        };

        // Paths and driver errors stay in the log.
        let message = match &self.inner {
            _ if status.is_server_error() => "Internal server error".to_string(),
            vv_core::Error::NotFound { .. } => "Video not found".to_string(),
            other => other.to_string(),
        };

        let body = json!({
            "error": message,
            "code": code,
            "request_id": self.request_id,
        });

        let mut response = (status, axum::Json(body)).into_response();

        if let vv_core::Error::RangeNotSatisfiable { file_size, .. } = &self.inner {
            if let Ok(val) = HeaderValue::from_str(&format!("bytes */{file_size}")) {
                response.headers_mut().insert(header::CONTENT_RANGE, val);
            }
        }

        response
    }
}
