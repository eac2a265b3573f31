//! The uniform response envelope.
//!
//! Every endpoint, success or failure, returns this shape; handlers
//! never hand-construct a response body. The invariant: exactly one of
//! `data`/`error` is present, controlled by `success`.

use actix_web::http::StatusCode;
use actix_web::HttpResponse;
use chrono::{SecondsFormat, Utc};
use pagination::PageMeta;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Wire envelope for every endpoint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the request succeeded; governs which of `data`/`error`
    /// is present.
    pub success: bool,
    /// Payload, present iff `success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Human-readable failure message, present iff `!success`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Diagnostic detail; raw storage messages pass through unsanitised.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<String>,
    /// Pagination block, present on list responses only.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<PageMeta>,
    /// RFC 3339 construction time.
    pub timestamp: String,
}

impl<T: Serialize> ApiResponse<T> {
    /// A success envelope wrapping `data`.
    #[must_use]
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
            details: None,
            pagination: None,
            timestamp: timestamp(),
        }
    }

    /// A success envelope wrapping one page of rows.
    #[must_use]
    pub fn page(data: T, pagination: PageMeta) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }
}

impl ApiResponse<Value> {
    /// A failure envelope; `data` stays absent.
    #[must_use]
    pub fn failure(error: impl Into<String>, details: Option<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
            details,
            pagination: None,
            timestamp: timestamp(),
        }
    }
}

fn timestamp() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// 200 with a success envelope.
pub fn success<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::ok(data))
}

/// 201 with a success envelope.
pub fn created<T: Serialize>(data: T) -> HttpResponse {
    HttpResponse::Created().json(ApiResponse::ok(data))
}

/// 200 with a success envelope and pagination block.
pub fn paginated<T: Serialize>(data: Vec<T>, meta: PageMeta) -> HttpResponse {
    HttpResponse::Ok().json(ApiResponse::page(data, meta))
}

/// A failure envelope with an arbitrary status.
pub fn failure(
    message: impl Into<String>,
    status: StatusCode,
    details: Option<String>,
) -> HttpResponse {
    HttpResponse::build(status).json(ApiResponse::failure(message, details))
}

/// 400 failure envelope.
pub fn validation(message: impl Into<String>, details: Option<String>) -> HttpResponse {
    failure(message, StatusCode::BAD_REQUEST, details)
}

/// 401 failure envelope; pass `"Not authenticated"` for the default
/// wording.
pub fn unauthorized(message: impl Into<String>) -> HttpResponse {
    failure(message, StatusCode::UNAUTHORIZED, None)
}

/// 403 failure envelope.
pub fn forbidden(message: impl Into<String>) -> HttpResponse {
    failure(message, StatusCode::FORBIDDEN, None)
}

/// 404 failure envelope worded `"{resource} not found"`.
pub fn not_found(resource: &str) -> HttpResponse {
    failure(
        format!("{resource} not found"),
        StatusCode::NOT_FOUND,
        None,
    )
}

/// 409 failure envelope.
pub fn conflict(message: impl Into<String>) -> HttpResponse {
    failure(message, StatusCode::CONFLICT, None)
}
