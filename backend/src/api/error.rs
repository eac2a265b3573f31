//! Rendering domain failures as HTTP envelopes.
//!
//! Handlers return `ApiResult<HttpResponse>`; any [`DomainError`]
//! propagated with `?` becomes an [`ApiError`], and actix renders it
//! through the envelope builder. This is the outer boundary: no error
//! escapes un-enveloped.

use actix_web::http::StatusCode;
use actix_web::{HttpResponse, ResponseError};
use tracing::error;

use super::envelope;
use crate::domain::DomainError;

/// A domain failure at the HTTP boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiError(DomainError);

impl ApiError {
    /// The wrapped domain failure.
    #[must_use]
    pub fn inner(&self) -> &DomainError {
        &self.0
    }
}

impl From<DomainError> for ApiError {
    fn from(error: DomainError) -> Self {
        Self(error)
    }
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl std::error::Error for ApiError {}

impl ResponseError for ApiError {
    fn status_code(&self) -> StatusCode {
        StatusCode::from_u16(self.0.status_code()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
    }

    fn error_response(&self) -> HttpResponse {
        let status = self.status_code();
        if status.is_server_error() {
            error!(
                code = ?self.0.code(),
                message = self.0.message(),
                details = self.0.details().unwrap_or_default(),
                "request failed"
            );
        }
        envelope::failure(
            self.0.message(),
            status,
            self.0.details().map(str::to_owned),
        )
    }
}

/// Result alias for HTTP handlers.
pub type ApiResult<T> = Result<T, ApiError>;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::envelope::ApiResponse;
    use actix_web::body::to_bytes;
    use serde_json::Value;

    #[actix_rt::test]
    async fn renders_the_failure_envelope() {
        let api_error = ApiError::from(
            DomainError::database("Database error occurred").with_details("raw message"),
        );

        let response = api_error.error_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);

        let bytes = to_bytes(response.into_body()).await.expect("body bytes");
        let body: ApiResponse<Value> = serde_json::from_slice(&bytes).expect("envelope parses");
        assert!(!body.success);
        assert_eq!(body.error.as_deref(), Some("Database error occurred"));
        assert_eq!(body.details.as_deref(), Some("raw message"));
        assert!(body.data.is_none());
    }

    #[actix_rt::test]
    async fn status_follows_the_taxonomy() {
        let not_found = ApiError::from(DomainError::not_found("Order"));
        assert_eq!(not_found.status_code(), StatusCode::NOT_FOUND);

        let conflict = ApiError::from(DomainError::conflict("This record already exists"));
        assert_eq!(conflict.status_code(), StatusCode::CONFLICT);
    }
}
