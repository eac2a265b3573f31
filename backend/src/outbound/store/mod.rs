//! HTTP client for the hosted store.
//!
//! [`StoreClient`] is built once at startup from configuration and
//! shared immutably across request handlers; no handler constructs its
//! own client. Row access speaks PostgREST (`/rest/v1`), auth speaks
//! GoTrue (`/auth/v1`). Every failure is parsed into [`StoreError`] so
//! classification happens in exactly one place.

mod auth;
mod error;
mod rest;

pub use error::StoreError;
pub(crate) use rest::id_filter;
pub use rest::{ListQuery, StoreClient, StoreInitError};
