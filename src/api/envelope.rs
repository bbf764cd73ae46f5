//! Response envelope shared by every `/api/v1` endpoint.
//!
//! Success bodies are `{ "data": T, "meta": { ... } }` ([`ApiResponse`]);
//! failures are `{ "error": { "code", "message", "details"? }, "meta": { ... } }`
//! ([`ApiErrorResponse`]).

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use chrono::Utc;
use serde::Serialize;

use crate::store::StoreError;

/// Metadata included in every response.
#[derive(Debug, Serialize)]
pub struct ResponseMeta {
    pub timestamp: String,
    pub version: &'static str,
}

impl Default for ResponseMeta {
    fn default() -> Self {
        Self {
            timestamp: Utc::now().to_rfc3339(),
            version: env!("CARGO_PKG_VERSION"),
        }
    }
}

#[derive(Debug, Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub data: T,
    pub meta: ResponseMeta,
}

impl<T: Serialize> ApiResponse<T> {
    fn build(status: StatusCode, data: T) -> Response {
        let body = Self {
            data,
            meta: ResponseMeta::default(),
        };
        (status, axum::Json(body)).into_response()
    }

    pub fn ok(data: T) -> Response {
        Self::build(StatusCode::OK, data)
    }

    pub fn created(data: T) -> Response {
        Self::build(StatusCode::CREATED, data)
    }
}

#[derive(Debug, Serialize)]
pub struct ErrorDetail {
    pub code: String,
    pub message: String,
    /// Individual messages, e.g. every failed validation rule
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub details: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct ApiErrorResponse {
    pub error: ErrorDetail,
    pub meta: ResponseMeta,
}

impl ApiErrorResponse {
    fn build(status: StatusCode, code: &str, msg: impl Into<String>, details: Vec<String>) -> Response {
        let body = Self {
            error: ErrorDetail {
                code: code.to_string(),
                message: msg.into(),
                details,
            },
            meta: ResponseMeta::default(),
        };
        (status, axum::Json(body)).into_response()
    }

    pub fn not_found(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::NOT_FOUND, "NOT_FOUND", msg, Vec::new())
    }

    pub fn bad_request(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::BAD_REQUEST, "BAD_REQUEST", msg, Vec::new())
    }

    /// 400 carrying every violation in `details`.
    pub fn validation_failed(violations: Vec<String>) -> Response {
        Self::build(
            StatusCode::BAD_REQUEST,
            "VALIDATION_FAILED",
            crate::session::FIX_ERRORS_MESSAGE,
            violations,
        )
    }

    pub fn bad_gateway(msg: impl Into<String>) -> Response {
        Self::build(StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", msg, Vec::new())
    }

    /// Map a repository failure onto the matching status.
    pub fn from_store(err: &StoreError) -> Response {
        match err {
            StoreError::NotFound(id) => Self::not_found(format!("Printer '{id}' not found")),
            StoreError::Validation(msg) => Self::bad_request(msg.clone()),
            StoreError::Backend(e) => Self::bad_gateway(format!("Printer backend error: {e}")),
        }
    }
}
