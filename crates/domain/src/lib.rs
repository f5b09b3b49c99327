//! Domain layer for the order-management backend.
//!
//! This crate provides:
//! - `OrderPlacementService`, which validates a request and persists the
//!   order, its lines and the stock decrements as one unit of work
//! - `CatalogService` for listing products

pub mod catalog;
pub mod order;

pub use catalog::CatalogService;
pub use order::{
    CreateOrderRequest, LineItem, OrderError, OrderPlacementService, ValidationError,
};
