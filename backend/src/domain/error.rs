//! The closed error taxonomy.
//!
//! Seven kinds, each pinning an HTTP status. A failure anywhere in the
//! system is one of these values; callers pattern-match on [`ErrorCode`]
//! rather than unwinding, and the HTTP adapter renders the value into the
//! failure envelope. No error reaches the wire un-enveloped.

use serde::{Deserialize, Serialize};

/// Stable category for a failure, fixing its HTTP status code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorCode {
    /// The request body or parameters fail validation.
    Validation,
    /// Authentication is missing or invalid.
    Unauthorized,
    /// Authenticated but not permitted.
    Forbidden,
    /// The requested resource does not exist.
    NotFound,
    /// A uniqueness constraint was violated.
    Conflict,
    /// A storage-layer failure not otherwise classified.
    Database,
    /// Anything uncaught.
    Internal,
}

impl ErrorCode {
    /// HTTP status fixed by this kind.
    #[must_use]
    pub fn status_code(self) -> u16 {
        match self {
            Self::Validation => 400,
            Self::Unauthorized => 401,
            Self::Forbidden => 403,
            Self::NotFound => 404,
            Self::Conflict => 409,
            Self::Database | Self::Internal => 500,
        }
    }
}

/// A classified failure carrying a human-readable message and optional
/// diagnostic detail (typically the raw storage message).
///
/// Created at the point of failure detection, consumed once by the
/// envelope builder, never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DomainError {
    code: ErrorCode,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl DomainError {
    /// Construct an error of the given kind; `message` is carried
    /// unchanged.
    #[must_use]
    pub fn new(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
            details: None,
        }
    }

    /// Attach diagnostic detail to the error.
    #[must_use]
    pub fn with_details(mut self, details: impl Into<String>) -> Self {
        self.details = Some(details.into());
        self
    }

    /// A 400 validation failure.
    #[must_use]
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Validation, message)
    }

    /// A 401 failure; pass `"Not authenticated"` for the default wording.
    #[must_use]
    pub fn unauthorized(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Unauthorized, message)
    }

    /// A 403 failure with the conventional wording.
    #[must_use]
    pub fn forbidden(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Forbidden, message)
    }

    /// A 404 for the named resource, worded `"{resource} not found"`.
    #[must_use]
    pub fn not_found(resource: &str) -> Self {
        Self::new(ErrorCode::NotFound, format!("{resource} not found"))
    }

    /// A 409 uniqueness conflict.
    #[must_use]
    pub fn conflict(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Conflict, message)
    }

    /// A 500 storage failure.
    #[must_use]
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Database, message)
    }

    /// A 500 for anything uncaught.
    #[must_use]
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorCode::Internal, message)
    }

    /// Re-label a generic `NotFound` with the resource the caller was
    /// actually fetching, so `GET /api/products/{id}` says "Product not
    /// found" rather than "Record not found". Other kinds pass through.
    #[must_use]
    pub fn for_resource(self, resource: &str) -> Self {
        if self.code == ErrorCode::NotFound {
            Self::not_found(resource)
        } else {
            self
        }
    }

    /// The failure kind.
    #[must_use]
    pub fn code(&self) -> ErrorCode {
        self.code
    }

    /// HTTP status fixed by the kind.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.code.status_code()
    }

    /// Human-readable message.
    #[must_use]
    pub fn message(&self) -> &str {
        &self.message
    }

    /// Diagnostic detail, when present.
    #[must_use]
    pub fn details(&self) -> Option<&str> {
        self.details.as_deref()
    }
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for DomainError {}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(ErrorCode::Validation, 400)]
    #[case(ErrorCode::Unauthorized, 401)]
    #[case(ErrorCode::Forbidden, 403)]
    #[case(ErrorCode::NotFound, 404)]
    #[case(ErrorCode::Conflict, 409)]
    #[case(ErrorCode::Database, 500)]
    #[case(ErrorCode::Internal, 500)]
    fn each_kind_fixes_its_status(#[case] code: ErrorCode, #[case] status: u16) {
        assert_eq!(code.status_code(), status);
        assert_eq!(DomainError::new(code, "x").status_code(), status);
    }

    #[test]
    fn message_and_details_carried_unchanged() {
        let err = DomainError::database("Database error occurred").with_details("raw pg message");
        assert_eq!(err.message(), "Database error occurred");
        assert_eq!(err.details(), Some("raw pg message"));
    }

    #[test]
    fn not_found_names_the_resource() {
        assert_eq!(DomainError::not_found("Product").message(), "Product not found");
    }

    #[test]
    fn for_resource_only_relabels_not_found() {
        let relabelled = DomainError::not_found("Record").for_resource("Order");
        assert_eq!(relabelled.message(), "Order not found");

        let conflict = DomainError::conflict("taken").for_resource("Order");
        assert_eq!(conflict.message(), "taken");
        assert_eq!(conflict.code(), ErrorCode::Conflict);
    }
}
