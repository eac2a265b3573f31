//! Storage failures and their translation into the error taxonomy.
//!
//! The store reports failures as JSON bodies carrying a string `code`
//! (Postgres SQLSTATE or a PostgREST `PGRST*` code) and a message.
//! [`StoreError::into_domain`] is the single place that classification
//! happens; handlers never inspect storage codes themselves.

use reqwest::StatusCode;
use serde_json::Value;
use thiserror::Error;

use crate::domain::DomainError;

/// Code reported when a single-row fetch matched zero rows.
pub const NO_ROWS_CODE: &str = "PGRST116";

/// An opaque failure from the storage layer: an optional machine code
/// plus whatever message the store produced.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message}")]
pub struct StoreError {
    /// Storage error code, when the body carried one.
    pub code: Option<String>,
    /// Raw storage message.
    pub message: String,
}

impl StoreError {
    /// Wrap a transport-level failure (connect, timeout, TLS).
    #[must_use]
    pub fn transport(error: &reqwest::Error) -> Self {
        Self {
            code: None,
            message: error.to_string(),
        }
    }

    /// Wrap a payload that did not decode into the expected shape.
    #[must_use]
    pub fn decode(error: &serde_json::Error) -> Self {
        Self {
            code: None,
            message: format!("invalid store payload: {error}"),
        }
    }

    /// Parse a non-success response body.
    ///
    /// PostgREST bodies look like `{code, message, details, hint}`;
    /// GoTrue bodies use `msg`, `error_description`, or `error`. A body
    /// that is not JSON at all falls back to the HTTP status.
    #[must_use]
    pub fn from_body(status: StatusCode, body: &[u8]) -> Self {
        let parsed: Option<Value> = serde_json::from_slice(body).ok();
        let code = parsed
            .as_ref()
            .and_then(|v| v.get("code"))
            .and_then(Value::as_str)
            .map(str::to_owned);
        let message = parsed
            .as_ref()
            .and_then(|v| {
                ["message", "msg", "error_description", "error"]
                    .iter()
                    .find_map(|key| v.get(*key).and_then(Value::as_str))
            })
            .map_or_else(
                || format!("store responded with status {}", status.as_u16()),
                str::to_owned,
            );
        Self { code, message }
    }

    /// Classify this failure into the closed taxonomy.
    ///
    /// Exact match on the code, with a generic database fallback. The
    /// one judgment call: [`NO_ROWS_CODE`] (zero rows on a single-row
    /// fetch) is a domain 404, not a system 500, and it is the only
    /// code that maps to `NotFound`.
    #[must_use]
    pub fn into_domain(self) -> DomainError {
        match self.code.as_deref() {
            // unique violation
            Some("23505") => DomainError::conflict("This record already exists"),
            // foreign key violation: the caller referenced a missing row
            Some("23503") => {
                DomainError::validation("Related records not found").with_details(self.message)
            }
            // undefined column
            Some("42703") => {
                DomainError::database("Invalid database query").with_details(self.message)
            }
            // insufficient privilege
            Some("42501") => DomainError::forbidden("Permission denied for this operation"),
            // undefined table
            Some("42P01") => {
                DomainError::database("Database table not found").with_details(self.message)
            }
            Some(NO_ROWS_CODE) => DomainError::not_found("Record"),
            _ => DomainError::database("Database error occurred").with_details(self.message),
        }
    }
}
