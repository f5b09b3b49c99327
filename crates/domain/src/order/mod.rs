//! Order placement and related types.

mod request;
mod service;

use std::time::Duration;

pub use request::{CreateOrderRequest, LineItem};
pub use service::OrderPlacementService;

use common::ProductId;
use store::StoreError;
use thiserror::Error;

/// Problems with the request itself, detected before any store interaction.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// Customer ID is required.
    #[error("Customer ID is required")]
    CustomerIdRequired,

    /// Order has no items.
    #[error("At least one item is required")]
    NoItems,

    /// A line item asks for zero units.
    #[error("Invalid quantity for item {index}: {quantity} (must be greater than 0)")]
    InvalidQuantity { index: usize, quantity: u32 },
}

/// Errors that can occur while placing an order.
///
/// Every variant other than `Validation` is raised inside a unit of work,
/// which is rolled back before the error reaches the caller.
#[derive(Debug, Error)]
pub enum OrderError {
    /// The request is malformed.
    #[error("Invalid order request: {0}")]
    Validation(#[from] ValidationError),

    /// A requested product does not exist.
    #[error("Product not found: {product_id}")]
    ProductNotFound { product_id: ProductId },

    /// A requested product does not have enough stock.
    #[error(
        "Insufficient stock for product {product_id}: requested {requested}, available {available}"
    )]
    InsufficientStock {
        product_id: ProductId,
        requested: u32,
        available: u32,
    },

    /// Placement did not finish before its deadline.
    #[error("Order placement cancelled after {timeout:?}")]
    Cancelled { timeout: Duration },

    /// The store failed or a commit did not go through. Safe to retry.
    #[error("Store error: {0}")]
    Store(StoreError),
}

impl OrderError {
    /// Short label for the error kind, used in metrics and logs.
    pub fn reason(&self) -> &'static str {
        match self {
            OrderError::Validation(_) => "validation",
            OrderError::ProductNotFound { .. } => "product_not_found",
            OrderError::InsufficientStock { .. } => "insufficient_stock",
            OrderError::Cancelled { .. } => "cancelled",
            OrderError::Store(_) => "store",
        }
    }
}

impl From<StoreError> for OrderError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::ProductNotFound(product_id) => OrderError::ProductNotFound { product_id },
            StoreError::InsufficientStock {
                product_id,
                requested,
                available,
            } => OrderError::InsufficientStock {
                product_id,
                requested,
                available,
            },
            other => OrderError::Store(other),
        }
    }
}
