//! Total request validators.
//!
//! Every function here returns a verdict and never panics or errors;
//! endpoint handlers turn a negative verdict into a
//! [`DomainError::validation`](super::DomainError::validation).

use std::sync::LazyLock;

use regex::Regex;
use serde_json::Value;

static UUID_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$")
        .expect("UUID pattern is a valid regex")
});

static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is a valid regex")
});

/// Whether `candidate` is a canonical hyphenated UUID
/// (8-4-4-4-12 hex groups, case-insensitive).
///
/// Deliberately stricter than `Uuid::parse_str`, which also accepts
/// undelimited and braced forms that the API should reject.
#[must_use]
pub fn is_valid_uuid(candidate: &str) -> bool {
    UUID_RE.is_match(&candidate.to_ascii_lowercase())
}

/// Whether `candidate` looks like `local@domain.tld`.
///
/// Permissive by design; this is not an RFC 5322 validator and will
/// accept some addresses a mail server would bounce.
#[must_use]
pub fn is_valid_email(candidate: &str) -> bool {
    EMAIL_RE.is_match(candidate)
}

/// Names from `required` that are absent or empty in `body`.
///
/// A field counts as missing when it is absent, `null`, an empty string,
/// `false`, or the number 0. The falsy treatment of `false`/`0` is a
/// compatibility decision: create flows rely on empty strings being
/// rejected, and no required field in this API is legitimately zero.
#[must_use]
pub fn missing_fields(body: &Value, required: &[&str]) -> Vec<String> {
    required
        .iter()
        .filter(|name| is_missing(body.get(**name)))
        .map(|name| (*name).to_owned())
        .collect()
}

fn is_missing(value: Option<&Value>) -> bool {
    match value {
        None | Some(Value::Null) => true,
        Some(Value::String(s)) => s.is_empty(),
        Some(Value::Bool(b)) => !b,
        Some(Value::Number(n)) => n.as_f64() == Some(0.0),
        Some(_) => false,
    }
}
