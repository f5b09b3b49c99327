use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{CustomerId, Money, OrderId, OrderItemId, ProductId};
use sqlx::{
    PgPool, Postgres, Row, Transaction,
    postgres::{PgPoolOptions, PgRow},
};

use crate::{
    NewOrderItem, NewProduct, Order, OrderItem, Product, Result, StoreError,
    store::{InventoryStore, OrderStore, ProductCatalog, TransactionCoordinator, UnitOfWork},
};

/// PostgreSQL-backed store implementation.
#[derive(Clone)]
pub struct PostgresStore {
    pool: PgPool,
}

impl PostgresStore {
    /// Creates a new PostgreSQL store.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Connects to the database with a pool of at most `max_connections`.
    pub async fn connect(database_url: &str, max_connections: u32) -> Result<Self> {
        let pool = PgPoolOptions::new()
            .max_connections(max_connections)
            .connect(database_url)
            .await?;
        Ok(Self::new(pool))
    }

    /// Gets a reference to the underlying connection pool.
    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Runs the database migrations.
    #[tracing::instrument(skip(self))]
    pub async fn run_migrations(&self) -> Result<()> {
        sqlx::migrate!("../../migrations").run(&self.pool).await?;
        tracing::info!("database migrations applied");
        Ok(())
    }

    fn row_to_product(row: PgRow) -> Result<Product> {
        Ok(Product {
            id: ProductId::new(row.try_get("id")?),
            name: row.try_get("name")?,
            price: Money::from_minor_units(row.try_get("price_in_minor_units")?),
            quantity: to_quantity(row.try_get("quantity")?)?,
            created_at: row.try_get::<DateTime<Utc>, _>("created_at")?,
        })
    }
}

fn to_quantity(raw: i32) -> Result<u32> {
    u32::try_from(raw).map_err(|_| StoreError::InvalidRow(format!("negative quantity {raw}")))
}

fn to_column(quantity: u32) -> Result<i32> {
    i32::try_from(quantity)
        .map_err(|_| StoreError::InvalidRow(format!("quantity {quantity} out of range")))
}

/// A unit of work backed by a PostgreSQL transaction.
///
/// Dropping the unit without committing rolls the transaction back.
pub struct PgUnit {
    tx: Transaction<'static, Postgres>,
}

#[async_trait]
impl TransactionCoordinator for PostgresStore {
    type Unit = PgUnit;

    async fn begin(&self) -> Result<PgUnit> {
        let tx = self.pool.begin().await?;
        Ok(PgUnit { tx })
    }
}

#[async_trait]
impl ProductCatalog for PostgresStore {
    async fn list_products(&self) -> Result<Vec<Product>> {
        let rows = sqlx::query(
            r#"
            SELECT id, name, price_in_minor_units, quantity, created_at
            FROM products
            ORDER BY id ASC
            "#,
        )
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Self::row_to_product).collect()
    }

    async fn create_product(&self, product: NewProduct) -> Result<Product> {
        let row = sqlx::query(
            r#"
            INSERT INTO products (name, price_in_minor_units, quantity)
            VALUES ($1, $2, $3)
            RETURNING id, name, price_in_minor_units, quantity, created_at
            "#,
        )
        .bind(&product.name)
        .bind(product.price.minor_units())
        .bind(to_column(product.quantity)?)
        .fetch_one(&self.pool)
        .await?;

        Self::row_to_product(row)
    }
}

#[async_trait]
impl InventoryStore for PgUnit {
    #[tracing::instrument(skip(self))]
    async fn find_product(&mut self, id: ProductId) -> Result<Option<Product>> {
        // Row lock held until the transaction ends keeps the price and stock
        // stable for the rest of this unit.
        let row: Option<PgRow> = sqlx::query(
            r#"
            SELECT id, name, price_in_minor_units, quantity, created_at
            FROM products
            WHERE id = $1
            FOR UPDATE
            "#,
        )
        .bind(id.as_i64())
        .fetch_optional(&mut *self.tx)
        .await?;

        row.map(PostgresStore::row_to_product).transpose()
    }

    #[tracing::instrument(skip(self))]
    async fn decrement_quantity(&mut self, id: ProductId, amount: u32) -> Result<()> {
        let amount_column = to_column(amount)?;
        let result = sqlx::query(
            r#"
            UPDATE products
            SET quantity = quantity - $2
            WHERE id = $1 AND quantity >= $2
            "#,
        )
        .bind(id.as_i64())
        .bind(amount_column)
        .execute(&mut *self.tx)
        .await?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        let available: Option<i32> =
            sqlx::query_scalar("SELECT quantity FROM products WHERE id = $1")
                .bind(id.as_i64())
                .fetch_optional(&mut *self.tx)
                .await?;

        tracing::debug!(
            product_id = %id,
            requested = amount,
            ?available,
            "conditional decrement matched no row"
        );
        match available {
            Some(available) => Err(StoreError::InsufficientStock {
                product_id: id,
                requested: amount,
                available: to_quantity(available)?,
            }),
            None => Err(StoreError::ProductNotFound(id)),
        }
    }
}

#[async_trait]
impl OrderStore for PgUnit {
    #[tracing::instrument(skip(self))]
    async fn create_order(&mut self, customer_id: CustomerId) -> Result<Order> {
        let row = sqlx::query(
            r#"
            INSERT INTO orders (customer_id)
            VALUES ($1)
            RETURNING id, customer_id, created_at
            "#,
        )
        .bind(customer_id.as_i64())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(Order {
            id: OrderId::new(row.try_get("id")?),
            customer_id: CustomerId::new(row.try_get("customer_id")?),
            created_at: row.try_get("created_at")?,
        })
    }

    #[tracing::instrument(
        skip(self, item),
        fields(order_id = %item.order_id, product_id = %item.product_id)
    )]
    async fn create_order_item(&mut self, item: NewOrderItem) -> Result<OrderItem> {
        let row = sqlx::query(
            r#"
            INSERT INTO order_items (order_id, product_id, quantity, price_in_minor_units)
            VALUES ($1, $2, $3, $4)
            RETURNING id, order_id, product_id, quantity, price_in_minor_units
            "#,
        )
        .bind(item.order_id.as_i64())
        .bind(item.product_id.as_i64())
        .bind(to_column(item.quantity)?)
        .bind(item.unit_price.minor_units())
        .fetch_one(&mut *self.tx)
        .await?;

        Ok(OrderItem {
            id: OrderItemId::new(row.try_get("id")?),
            order_id: OrderId::new(row.try_get("order_id")?),
            product_id: ProductId::new(row.try_get("product_id")?),
            quantity: to_quantity(row.try_get("quantity")?)?,
            unit_price: Money::from_minor_units(row.try_get("price_in_minor_units")?),
        })
    }
}

#[async_trait]
impl UnitOfWork for PgUnit {
    #[tracing::instrument(skip_all)]
    async fn commit(self) -> Result<()> {
        self.tx.commit().await?;
        Ok(())
    }

    #[tracing::instrument(skip_all)]
    async fn rollback(self) -> Result<()> {
        tracing::debug!("rolling back unit of work");
        self.tx.rollback().await?;
        Ok(())
    }
}
