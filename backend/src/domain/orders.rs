//! Order checkout: the one multi-step mutation in the system.
//!
//! The store exposes no multi-statement transaction, so creating an
//! order is header-then-items with a manual compensating action: if the
//! item insert fails, the just-created header is deleted before the
//! error propagates. A failed compensation is logged and swallowed; the
//! caller still sees the original item-insert failure.

use tracing::warn;

use super::ports::OrderPersistence;
use super::DomainResult;
use crate::models::{NewOrderItemRecord, NewOrderRecord, OrderWithItems};

/// Create an order header and its line items sequentially.
///
/// # Errors
///
/// Returns the header-insert failure as-is, or the item-insert failure
/// after deleting the header.
pub async fn place_order<S: OrderPersistence + ?Sized>(
    store: &S,
    order: NewOrderRecord,
    items: Vec<NewOrderItemRecord>,
) -> DomainResult<OrderWithItems> {
    let header = store.insert_order(&order).await?;

    match store.insert_order_items(header.id, &items).await {
        Ok(stored_items) => Ok(OrderWithItems {
            order: header,
            order_items: stored_items,
        }),
        Err(items_error) => {
            if let Err(cleanup_error) = store.delete_order(header.id).await {
                warn!(
                    order_id = %header.id,
                    error = %cleanup_error,
                    "failed to delete order header after item insert failure"
                );
            }
            Err(items_error)
        }
    }
}
