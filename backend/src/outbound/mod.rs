//! Outbound adapters for external infrastructure.
//!
//! The only collaborator is the hosted store, reached over HTTP: a
//! PostgREST surface for rows and a GoTrue surface for auth. Adapters
//! translate between domain types and wire payloads and contain no
//! business logic.

pub mod store;
