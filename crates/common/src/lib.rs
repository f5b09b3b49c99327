//! Shared types for the order-management backend.

mod types;

pub use types::{CustomerId, Money, OrderId, OrderItemId, ProductId};
