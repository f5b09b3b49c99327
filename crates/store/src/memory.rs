use std::collections::BTreeMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use chrono::Utc;
use common::{CustomerId, Money, OrderId, OrderItemId, ProductId};
use tokio::sync::{Mutex, OwnedMutexGuard};

use crate::{
    NewOrderItem, NewProduct, Order, OrderItem, Product, Result, StoreError,
    store::{InventoryStore, OrderStore, ProductCatalog, TransactionCoordinator, UnitOfWork},
};

#[derive(Debug, Clone, Default)]
struct Tables {
    products: BTreeMap<ProductId, Product>,
    orders: BTreeMap<OrderId, Order>,
    order_items: BTreeMap<OrderItemId, OrderItem>,
    last_product_id: i64,
    last_order_id: i64,
    last_order_item_id: i64,
}

impl Tables {
    fn insert_product(&mut self, product: NewProduct) -> Product {
        self.last_product_id += 1;
        let product = Product {
            id: ProductId::new(self.last_product_id),
            name: product.name,
            price: product.price,
            quantity: product.quantity,
            created_at: Utc::now(),
        };
        self.products.insert(product.id, product.clone());
        product
    }
}

/// Copy of every committed row, for comparing store state before and after a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreSnapshot {
    pub products: Vec<Product>,
    pub orders: Vec<Order>,
    pub order_items: Vec<OrderItem>,
}

/// In-memory store implementation for testing and local runs.
///
/// A unit of work holds the table lock from `begin` until it is committed or
/// dropped, so units execute one at a time and never observe each other's
/// uncommitted writes. Writes go to a staged copy of the tables which only
/// replaces the shared tables on commit.
#[derive(Clone, Default)]
pub struct InMemoryStore {
    tables: Arc<Mutex<Tables>>,
    fail_on_commit: Arc<AtomicBool>,
}

impl InMemoryStore {
    /// Creates a new empty in-memory store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a store pre-populated with the given products.
    pub async fn with_products(products: impl IntoIterator<Item = NewProduct>) -> Self {
        let store = Self::new();
        {
            let mut tables = store.tables.lock().await;
            for product in products {
                tables.insert_product(product);
            }
        }
        store
    }

    /// Configures the store to fail every commit until reset.
    pub fn set_fail_on_commit(&self, fail: bool) {
        self.fail_on_commit.store(fail, Ordering::SeqCst);
    }

    /// Returns the committed state of a product.
    pub async fn product(&self, id: ProductId) -> Option<Product> {
        self.tables.lock().await.products.get(&id).cloned()
    }

    /// Returns the number of committed orders.
    pub async fn order_count(&self) -> usize {
        self.tables.lock().await.orders.len()
    }

    /// Returns the committed lines of an order in creation order.
    pub async fn order_items_for(&self, order_id: OrderId) -> Vec<OrderItem> {
        self.tables
            .lock()
            .await
            .order_items
            .values()
            .filter(|item| item.order_id == order_id)
            .cloned()
            .collect()
    }

    /// Returns a copy of all committed rows.
    pub async fn snapshot(&self) -> StoreSnapshot {
        let tables = self.tables.lock().await;
        StoreSnapshot {
            products: tables.products.values().cloned().collect(),
            orders: tables.orders.values().cloned().collect(),
            order_items: tables.order_items.values().cloned().collect(),
        }
    }

    /// Overwrites a product's price, as an admin edit would.
    pub async fn set_price(&self, id: ProductId, price: Money) -> Result<()> {
        let mut tables = self.tables.lock().await;
        let product = tables
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;
        product.price = price;
        Ok(())
    }
}

/// A unit of work over an [`InMemoryStore`].
pub struct InMemoryUnit {
    guard: OwnedMutexGuard<Tables>,
    staged: Tables,
    fail_on_commit: Arc<AtomicBool>,
}

#[async_trait]
impl TransactionCoordinator for InMemoryStore {
    type Unit = InMemoryUnit;

    async fn begin(&self) -> Result<InMemoryUnit> {
        let guard = self.tables.clone().lock_owned().await;
        let staged = guard.clone();
        Ok(InMemoryUnit {
            guard,
            staged,
            fail_on_commit: self.fail_on_commit.clone(),
        })
    }
}

#[async_trait]
impl ProductCatalog for InMemoryStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        Ok(self.tables.lock().await.products.values().cloned().collect())
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        Ok(self.tables.lock().await.insert_product(product))
    }
}

#[async_trait]
impl InventoryStore for InMemoryUnit {
    #[tracing::instrument(skip(self))]
    async fn find_product(&mut self, id: ProductId) -> Result<Option<Product>> {
        Ok(self.staged.products.get(&id).cloned())
    }

    #[tracing::instrument(skip(self))]
    async fn decrement_quantity(&mut self, id: ProductId, amount: u32) -> Result<()> {
        let product = self
            .staged
            .products
            .get_mut(&id)
            .ok_or(StoreError::ProductNotFound(id))?;

        product.quantity = product.quantity.checked_sub(amount).ok_or(
            StoreError::InsufficientStock {
                product_id: id,
                requested: amount,
                available: product.quantity,
            },
        )?;
        Ok(())
    }
}

#[async_trait]
impl OrderStore for InMemoryUnit {
    #[tracing::instrument(skip(self))]
    async fn create_order(&mut self, customer_id: CustomerId) -> Result<Order> {
        self.staged.last_order_id += 1;
        let order = Order {
            id: OrderId::new(self.staged.last_order_id),
            customer_id,
            created_at: Utc::now(),
        };
        self.staged.orders.insert(order.id, order.clone());
        Ok(order)
    }

    #[tracing::instrument(
        skip(self, item),
        fields(order_id = %item.order_id, product_id = %item.product_id)
    )]
    async fn create_order_item(&mut self, item: NewOrderItem) -> Result<OrderItem> {
        if !self.staged.orders.contains_key(&item.order_id) {
            return Err(StoreError::InvalidRow(format!(
                "order {} does not exist",
                item.order_id
            )));
        }
        if !self.staged.products.contains_key(&item.product_id) {
            return Err(StoreError::ProductNotFound(item.product_id));
        }

        self.staged.last_order_item_id += 1;
        let item = OrderItem {
            id: OrderItemId::new(self.staged.last_order_item_id),
            order_id: item.order_id,
            product_id: item.product_id,
            quantity: item.quantity,
            unit_price: item.unit_price,
        };
        self.staged.order_items.insert(item.id, item.clone());
        Ok(item)
    }
}

#[async_trait]
impl UnitOfWork for InMemoryUnit {
    #[tracing::instrument(skip_all)]
    async fn commit(self) -> Result<()> {
        let InMemoryUnit {
            mut guard,
            staged,
            fail_on_commit,
        } = self;

        if fail_on_commit.load(Ordering::SeqCst) {
            tracing::warn!("commit rejected, staged writes discarded");
            return Err(StoreError::CommitFailed(
                "injected commit failure".to_string(),
            ));
        }

        *guard = staged;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn rollback(self) -> Result<()> {
        Ok(())
    }
}
