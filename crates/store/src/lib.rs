//! Persistence for products, orders and order lines.
//!
//! The order placement workflow talks to the store only through the narrow
//! [`InventoryStore`] and [`OrderStore`] contracts, always inside a
//! [`UnitOfWork`] opened by a [`TransactionCoordinator`].

pub mod error;
pub mod memory;
pub mod model;
pub mod postgres;
pub mod store;

pub use error::{Result, StoreError};
pub use memory::{InMemoryStore, InMemoryUnit, StoreSnapshot};
pub use model::{NewOrderItem, NewProduct, Order, OrderItem, Product};
pub use postgres::{PgUnit, PostgresStore};
pub use store::{InventoryStore, OrderStore, ProductCatalog, TransactionCoordinator, UnitOfWork};
