//! Ports describing how the domain expects to talk to the store.
//!
//! Only the order checkout flow needs a seam: creating an order is the
//! one multi-step mutation in the system, and its compensating-delete
//! behaviour has to be testable without a live store. Everything else
//! reads or writes a single row and calls the store client directly.

use async_trait::async_trait;
use uuid::Uuid;

use super::DomainResult;
use crate::models::{NewOrderItemRecord, NewOrderRecord, Order, OrderItem};

/// Order rows and their line items, as the checkout flow sees them.
///
/// Implemented by the PostgREST store client; mocked in tests to verify
/// the compensating delete.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait OrderPersistence: Send + Sync {
    /// Insert the order header and return the stored row.
    async fn insert_order(&self, order: &NewOrderRecord) -> DomainResult<Order>;

    /// Insert the line items for `order_id` and return the stored rows.
    async fn insert_order_items(
        &self,
        order_id: Uuid,
        items: &[NewOrderItemRecord],
    ) -> DomainResult<Vec<OrderItem>>;

    /// Delete the order header. Used both by the delete endpoint and as
    /// the compensating action when item insertion fails.
    async fn delete_order(&self, order_id: Uuid) -> DomainResult<()>;
}
