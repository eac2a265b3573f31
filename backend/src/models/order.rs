//! Order rows, line items, and their enums.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use utoipa::ToSchema;
use uuid::Uuid;

/// Lifecycle state of an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    /// Placed, not yet picked up by the kitchen.
    Pending,
    /// Being prepared.
    Processing,
    /// Handed to the courier.
    Shipped,
    /// Received by the customer.
    Delivered,
    /// Cancelled before delivery.
    Cancelled,
}

impl OrderStatus {
    /// Wire/store spelling of the status.
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Processing => "processing",
            Self::Shipped => "shipped",
            Self::Delivered => "delivered",
            Self::Cancelled => "cancelled",
        }
    }
}

/// Error for an unrecognised order status keyword.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid status. Must be one of: pending, processing, shipped, delivered, cancelled")]
pub struct OrderStatusParseError;

impl std::str::FromStr for OrderStatus {
    type Err = OrderStatusParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "processing" => Ok(Self::Processing),
            "shipped" => Ok(Self::Shipped),
            "delivered" => Ok(Self::Delivered),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(OrderStatusParseError),
        }
    }
}

/// An order header row as stored.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Order {
    /// Row identifier.
    pub id: Uuid,
    /// Owning customer.
    pub user_id: Uuid,
    /// Order total; non-negative, enforced at the validation boundary.
    pub total_price: f64,
    /// Lifecycle state.
    pub status: OrderStatus,
    /// Row creation time.
    pub created_at: DateTime<Utc>,
    /// Last modification time.
    pub updated_at: DateTime<Utc>,
}

/// A line item row. Embedded selects return a subset of columns, so
/// everything beyond the core item fields is optional.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderItem {
    /// Row identifier.
    pub id: Uuid,
    /// Parent order; present on full rows, omitted by embedded selects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub order_id: Option<Uuid>,
    /// Product ordered.
    pub product_id: Uuid,
    /// Units ordered; at least 1, enforced at the validation boundary.
    pub quantity: i64,
    /// Unit price at the time of ordering.
    pub price: f64,
    /// Row creation time; omitted by embedded selects.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<DateTime<Utc>>,
    /// Embedded product columns, when the select asked for them.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub products: Option<super::ProductSummary>,
}

/// An order header together with its line items.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OrderWithItems {
    /// The header row.
    #[serde(flatten)]
    pub order: Order,
    /// The line items.
    pub order_items: Vec<OrderItem>,
}

/// Validated values for a new order header insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewOrderRecord {
    /// Owning customer.
    pub user_id: Uuid,
    /// Order total.
    pub total_price: f64,
    /// Initial lifecycle state.
    pub status: OrderStatus,
}

/// Validated values for one new line item insert.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct NewOrderItemRecord {
    /// Product ordered.
    pub product_id: Uuid,
    /// Units ordered.
    pub quantity: i64,
    /// Unit price at the time of ordering.
    pub price: f64,
}

/// Columns the orders list endpoint can sort by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderSortField {
    /// Row creation time; the default.
    CreatedAt,
    /// Order total.
    TotalPrice,
    /// Lifecycle state.
    Status,
}

impl OrderSortField {
    /// Store column backing this sort field.
    #[must_use]
    pub fn column(&self) -> &'static str {
        match self {
            Self::CreatedAt => "created_at",
            Self::TotalPrice => "total_price",
            Self::Status => "status",
        }
    }
}

impl Default for OrderSortField {
    fn default() -> Self {
        Self::CreatedAt
    }
}

/// Error for an unrecognised order sort field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Invalid sort field. Must be one of: created_at, total_price, status")]
pub struct OrderSortFieldParseError;

impl std::str::FromStr for OrderSortField {
    type Err = OrderSortFieldParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "created_at" => Ok(Self::CreatedAt),
            "total_price" => Ok(Self::TotalPrice),
            "status" => Ok(Self::Status),
            _ => Err(OrderSortFieldParseError),
        }
    }
}
