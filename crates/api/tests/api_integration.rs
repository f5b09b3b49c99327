//! Integration tests for the API server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::http::{Request, StatusCode};
use common::{Money, ProductId};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{InMemoryStore, NewProduct};
use tower::ServiceExt;

static METRICS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

fn get_metrics_handle() -> PrometheusHandle {
    METRICS_HANDLE
        .get_or_init(|| {
            let builder = metrics_exporter_prometheus::PrometheusBuilder::new();
            builder
                .install_recorder()
                .expect("failed to install Prometheus recorder")
        })
        .clone()
}

async fn setup() -> (axum::Router, InMemoryStore) {
    let store = InMemoryStore::with_products([
        NewProduct::new("Laptop", Money::from_minor_units(99999), 10),
        NewProduct::new("Mouse", Money::from_minor_units(2999), 2),
    ])
    .await;
    let config = api::config::Config::default();
    let state = api::create_state(store.clone(), &config);
    let app = api::create_app(state, get_metrics_handle(), &config);
    (app, store)
}

fn post_order(body: impl Into<Body>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri("/orders")
        .header("content-type", "application/json")
        .body(body.into())
        .unwrap()
}

fn order_json(value: serde_json::Value) -> Request<Body> {
    post_order(serde_json::to_string(&value).unwrap())
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn body_json(response: axum::response::Response) -> serde_json::Value {
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&body).unwrap()
}

#[tokio::test]
async fn test_health_check() {
    let (app, _) = setup().await;

    let response = app.oneshot(get("/health")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert_eq!(json["status"], "ok");
}

#[tokio::test]
async fn test_list_products() {
    let (app, _) = setup().await;

    let response = app.oneshot(get("/products")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    let products = json.as_array().unwrap();
    assert_eq!(products.len(), 2);
    assert_eq!(products[0]["id"], 1);
    assert_eq!(products[0]["name"], "Laptop");
    assert_eq!(products[0]["price_in_minor_units"], 99999);
    assert_eq!(products[0]["quantity"], 10);
    assert_eq!(products[1]["name"], "Mouse");
}

#[tokio::test]
async fn test_create_order() {
    let (app, store) = setup().await;

    let response = app
        .oneshot(order_json(serde_json::json!({
            "customer_id": 42,
            "items": [{ "product_id": 1, "quantity": 2 }]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CREATED);
    let json = body_json(response).await;
    assert_eq!(json["id"], 1);
    assert_eq!(json["customer_id"], 42);
    assert!(json["created_at"].is_string());

    let laptop = store.product(ProductId::new(1)).await.unwrap();
    assert_eq!(laptop.quantity, 8);
    assert_eq!(store.order_count().await, 1);
}

#[tokio::test]
async fn test_created_order_shows_in_product_listing() {
    let (app, _) = setup().await;

    let response = app
        .clone()
        .oneshot(order_json(serde_json::json!({
            "customer_id": 7,
            "items": [
                { "product_id": 1, "quantity": 1 },
                { "product_id": 2, "quantity": 2 }
            ]
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/products")).await.unwrap();
    let json = body_json(response).await;
    assert_eq!(json[0]["quantity"], 9);
    assert_eq!(json[1]["quantity"], 0);
}

#[tokio::test]
async fn test_create_order_empty_items() {
    let (app, store) = setup().await;

    let response = app
        .oneshot(order_json(serde_json::json!({
            "customer_id": 42,
            "items": []
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_create_order_missing_customer() {
    let (app, store) = setup().await;

    let response = app
        .oneshot(order_json(serde_json::json!({
            "items": [{ "product_id": 1, "quantity": 1 }]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_create_order_zero_quantity() {
    let (app, _) = setup().await;

    let response = app
        .oneshot(order_json(serde_json::json!({
            "customer_id": 42,
            "items": [{ "product_id": 1, "quantity": 0 }]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_create_order_malformed_json() {
    let (app, _) = setup().await;

    let response = app.oneshot(post_order("{ not json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    let json = body_json(response).await;
    assert!(json["error"].is_string());
}

#[tokio::test]
async fn test_create_order_unknown_product() {
    let (app, store) = setup().await;

    let response = app
        .oneshot(order_json(serde_json::json!({
            "customer_id": 42,
            "items": [
                { "product_id": 1, "quantity": 1 },
                { "product_id": 999, "quantity": 1 }
            ]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    let json = body_json(response).await;
    assert!(json["error"].as_str().unwrap().contains("999"));

    let laptop = store.product(ProductId::new(1)).await.unwrap();
    assert_eq!(laptop.quantity, 10);
    assert_eq!(store.order_count().await, 0);
}

#[tokio::test]
async fn test_create_order_insufficient_stock() {
    let (app, store) = setup().await;
    let before = store.snapshot().await;

    let response = app
        .oneshot(order_json(serde_json::json!({
            "customer_id": 42,
            "items": [
                { "product_id": 1, "quantity": 1 },
                { "product_id": 2, "quantity": 3 }
            ]
        })))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(store.snapshot().await, before);
}

#[tokio::test]
async fn test_openapi_document() {
    let (app, _) = setup().await;

    let response = app.oneshot(get("/docs/openapi.json")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let json = body_json(response).await;
    assert!(json["paths"]["/orders"]["post"].is_object());
    assert!(json["paths"]["/products"]["get"].is_object());
}

#[tokio::test]
async fn test_docs_page() {
    let (app, _) = setup().await;

    let response = app.oneshot(get("/docs")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let content_type = response.headers()["content-type"].to_str().unwrap();
    assert!(content_type.starts_with("text/html"));
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let html = String::from_utf8(body.to_vec()).unwrap();
    assert!(html.contains("<code>/orders</code>"));
}

#[tokio::test]
async fn test_metrics_endpoint() {
    let (app, _) = setup().await;

    let response = app
        .clone()
        .oneshot(order_json(serde_json::json!({
            "customer_id": 42,
            "items": [{ "product_id": 1, "quantity": 1 }]
        })))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);

    let response = app.oneshot(get("/metrics")).await.unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let text = String::from_utf8(body.to_vec()).unwrap();
    assert!(text.contains("orders_placed_total"));
    assert!(text.contains("order_placement_duration_seconds"));
}

#[tokio::test]
async fn test_unknown_route() {
    let (app, _) = setup().await;

    let response = app.oneshot(get("/nonexistent")).await.unwrap();

    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}
