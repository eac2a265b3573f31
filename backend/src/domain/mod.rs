//! Domain primitives: the error taxonomy, request validators, and the
//! order-persistence port used by the compensating checkout flow.
//!
//! Everything in here is transport agnostic. Inbound adapters map
//! [`DomainError`] onto the HTTP envelope; outbound adapters map storage
//! failures into it.

pub mod error;
pub mod orders;
pub mod ports;
pub mod validation;

pub use self::error::{DomainError, ErrorCode};

/// Result alias used by domain services and outbound adapters.
pub type DomainResult<T> = Result<T, DomainError>;
