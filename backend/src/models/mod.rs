//! Passive records mirroring store rows.
//!
//! These types have no behaviour beyond serialisation and enum parsing;
//! all invariants are enforced at the validation boundary, and the rows
//! themselves are owned and mutated exclusively by the external store.

pub mod order;
pub mod product;
pub mod user;

pub use self::order::{
    NewOrderItemRecord, NewOrderRecord, Order, OrderItem, OrderSortField,
    OrderSortFieldParseError, OrderStatus, OrderStatusParseError, OrderWithItems,
};
pub use self::product::{
    Product, ProductSortField, ProductSortFieldParseError, ProductSummary, Rating, RatingsSummary,
};
pub use self::user::{AuthUser, Session, UserProfile};
