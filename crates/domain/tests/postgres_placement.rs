//! Order placement against PostgreSQL.
//!
//! These tests use a shared PostgreSQL container for efficiency.
//! Run with:
//!
//! ```bash
//! cargo test -p domain --test postgres_placement
//! ```

use std::sync::Arc;

use common::{CustomerId, Money, ProductId};
use domain::{CreateOrderRequest, LineItem, OrderError, OrderPlacementService};
use serial_test::serial;
use sqlx::PgPool;
use store::{NewProduct, PostgresStore, ProductCatalog};
use testcontainers::{ContainerAsync, runners::AsyncRunner};
use testcontainers_modules::postgres::Postgres;
use tokio::sync::OnceCell;

/// Shared container info - container stays alive for all tests
struct ContainerInfo {
    #[allow(dead_code)] // Container must stay alive for tests
    container: ContainerAsync<Postgres>,
    connection_string: String,
}

static CONTAINER: OnceCell<Arc<ContainerInfo>> = OnceCell::const_new();

async fn get_container_info() -> Arc<ContainerInfo> {
    CONTAINER
        .get_or_init(|| async {
            let container = Postgres::default().start().await.unwrap();

            let host = container.get_host().await.unwrap();
            let port = container.get_host_port_ipv4(5432).await.unwrap();

            let connection_string =
                format!("postgres://postgres:postgres@{}:{}/postgres", host, port);

            let temp_pool = PgPool::connect(&connection_string).await.unwrap();
            PostgresStore::new(temp_pool.clone())
                .run_migrations()
                .await
                .unwrap();
            temp_pool.close().await;

            Arc::new(ContainerInfo {
                container,
                connection_string,
            })
        })
        .await
        .clone()
}

/// Get a fresh store with its own pool and cleared tables
async fn get_test_store() -> PostgresStore {
    let info = get_container_info().await;

    let store = PostgresStore::connect(&info.connection_string, 5)
        .await
        .unwrap();

    sqlx::query("TRUNCATE TABLE order_items, orders, products RESTART IDENTITY CASCADE")
        .execute(store.pool())
        .await
        .unwrap();

    store
}

async fn seed(store: &PostgresStore, name: &str, price: i64, quantity: u32) -> ProductId {
    store
        .create_product(NewProduct::new(
            name,
            Money::from_minor_units(price),
            quantity,
        ))
        .await
        .unwrap()
        .id
}

fn request(customer: i64, items: &[(ProductId, u32)]) -> CreateOrderRequest {
    CreateOrderRequest::new(
        CustomerId::new(customer),
        items
            .iter()
            .map(|&(product_id, quantity)| LineItem::new(product_id, quantity))
            .collect(),
    )
}

async fn quantity_of(store: &PostgresStore, id: ProductId) -> i32 {
    sqlx::query_scalar("SELECT quantity FROM products WHERE id = $1")
        .bind(id.as_i64())
        .fetch_one(store.pool())
        .await
        .unwrap()
}

async fn row_count(store: &PostgresStore, table: &str) -> i64 {
    let sql = format!("SELECT COUNT(*) FROM {table}");
    sqlx::query_scalar(&sql)
        .fetch_one(store.pool())
        .await
        .unwrap()
}

#[tokio::test]
#[serial]
async fn placed_order_persists_lines_and_decrements_stock() {
    let store = get_test_store().await;
    let laptop = seed(&store, "Laptop", 99999, 10).await;
    let service = OrderPlacementService::new(store.clone());

    let order = service
        .place_order(request(1, &[(laptop, 2)]))
        .await
        .unwrap();

    assert_eq!(order.customer_id, CustomerId::new(1));
    assert_eq!(quantity_of(&store, laptop).await, 8);

    let (quantity, price): (i32, i64) = sqlx::query_as(
        "SELECT quantity, price_in_minor_units FROM order_items WHERE order_id = $1",
    )
    .bind(order.id.as_i64())
    .fetch_one(store.pool())
    .await
    .unwrap();
    assert_eq!(quantity, 2);
    assert_eq!(price, 99999);
}

#[tokio::test]
#[serial]
async fn missing_product_on_second_line_rolls_back() {
    let store = get_test_store().await;
    let laptop = seed(&store, "Laptop", 99999, 10).await;
    let service = OrderPlacementService::new(store.clone());

    let err = service
        .place_order(request(1, &[(laptop, 2), (ProductId::new(999), 1)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrderError::ProductNotFound { product_id } if product_id == ProductId::new(999)
    ));
    assert_eq!(row_count(&store, "orders").await, 0);
    assert_eq!(row_count(&store, "order_items").await, 0);
    assert_eq!(quantity_of(&store, laptop).await, 10);
}

#[tokio::test]
#[serial]
async fn short_stock_on_second_line_rolls_back() {
    let store = get_test_store().await;
    let laptop = seed(&store, "Laptop", 99999, 5).await;
    let service = OrderPlacementService::new(store.clone());

    let err = service
        .place_order(request(1, &[(laptop, 3), (laptop, 3)]))
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        OrderError::InsufficientStock {
            requested: 3,
            available: 2,
            ..
        }
    ));
    assert_eq!(row_count(&store, "orders").await, 0);
    assert_eq!(row_count(&store, "order_items").await, 0);
    assert_eq!(quantity_of(&store, laptop).await, 5);
}

#[tokio::test(flavor = "multi_thread", worker_threads = 4)]
#[serial]
async fn concurrent_orders_never_overdraw_stock() {
    let store = get_test_store().await;
    let laptop = seed(&store, "Laptop", 99999, 10).await;
    let service = Arc::new(OrderPlacementService::new(store.clone()));

    let mut handles = Vec::new();
    for customer in 1..=10 {
        let service = service.clone();
        handles.push(tokio::spawn(async move {
            service.place_order(request(customer, &[(laptop, 3)])).await
        }));
    }

    let mut placed = 0;
    for handle in handles {
        match handle.await.unwrap() {
            Ok(_) => placed += 1,
            Err(err) => assert_eq!(err.reason(), "insufficient_stock"),
        }
    }

    assert_eq!(placed, 3);
    assert_eq!(quantity_of(&store, laptop).await, 1);
    assert_eq!(row_count(&store, "orders").await, 3);
    assert_eq!(row_count(&store, "order_items").await, 3);
}
