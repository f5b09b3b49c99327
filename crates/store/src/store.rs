use async_trait::async_trait;
use common::{CustomerId, ProductId};

use crate::{NewOrderItem, NewProduct, Order, OrderItem, Product, Result};

/// Point lookups and stock changes on products.
///
/// Methods take `&mut self` because they run inside a [`UnitOfWork`],
/// which owns a single store connection.
#[async_trait]
pub trait InventoryStore: Send {
    /// Looks up a product by ID.
    ///
    /// Returns None if the product doesn't exist.
    async fn find_product(&mut self, id: ProductId) -> Result<Option<Product>>;

    /// Decrements a product's available quantity by `amount`.
    ///
    /// Fails with `InsufficientStock` if the resulting quantity would be
    /// negative, and with `ProductNotFound` if the product doesn't exist.
    /// The check and the write are a single conditional operation, so two
    /// concurrent units can never both decrement past zero.
    async fn decrement_quantity(&mut self, id: ProductId, amount: u32) -> Result<()>;
}

/// Creation of orders and their lines.
#[async_trait]
pub trait OrderStore: Send {
    /// Creates an order header. Identity and timestamp are assigned by the store.
    async fn create_order(&mut self, customer_id: CustomerId) -> Result<Order>;

    /// Creates one order line. Identity is assigned by the store.
    async fn create_order_item(&mut self, item: NewOrderItem) -> Result<OrderItem>;
}

/// An open unit of work over both stores.
///
/// Writes made through the unit are visible to the unit itself and to no one
/// else until [`commit`](UnitOfWork::commit) succeeds. Dropping a unit without
/// committing discards every write, so an early return or a cancelled future
/// always leaves the store untouched.
#[async_trait]
pub trait UnitOfWork: InventoryStore + OrderStore {
    /// Makes all writes durable and visible atomically.
    ///
    /// If this fails, none of the writes are visible.
    async fn commit(self) -> Result<()>;

    /// Discards all writes.
    async fn rollback(self) -> Result<()>;
}

/// Opens units of work against the underlying store.
#[async_trait]
pub trait TransactionCoordinator: Send + Sync {
    /// The unit of work type handed out by [`begin`](TransactionCoordinator::begin).
    type Unit: UnitOfWork;

    /// Acquires a unit of work bound to a store connection.
    async fn begin(&self) -> Result<Self::Unit>;
}

/// Read access to the product catalog, plus product seeding.
#[async_trait]
pub trait ProductCatalog: Send + Sync {
    /// Returns every product ordered by ID.
    async fn list_products(&self) -> Result<Vec<Product>>;

    /// Inserts a product outside of any unit of work.
    async fn create_product(&self, product: NewProduct) -> Result<Product>;
}
