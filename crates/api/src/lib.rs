//! HTTP API server for the order-management backend.
//!
//! Provides REST endpoints for listing products and placing orders,
//! with structured logging (tracing) and Prometheus metrics.

#![recursion_limit = "256"]

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use common::Money;
use domain::{CatalogService, OrderPlacementService};
use metrics_exporter_prometheus::PrometheusHandle;
use store::{NewProduct, ProductCatalog, TransactionCoordinator};
use tower_http::catch_panic::CatchPanicLayer;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use config::Config;

/// Shared application state accessible from all handlers.
pub struct AppState<S: TransactionCoordinator + ProductCatalog> {
    pub orders: OrderPlacementService<S>,
    pub catalog: CatalogService<S>,
}

/// Creates the application state over a single store.
pub fn create_state<S: TransactionCoordinator + ProductCatalog + Clone>(
    store: S,
    config: &Config,
) -> Arc<AppState<S>> {
    Arc::new(AppState {
        orders: OrderPlacementService::new(store.clone()).with_timeout(config.order_timeout),
        catalog: CatalogService::new(store),
    })
}

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: TransactionCoordinator + ProductCatalog + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
    config: &Config,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::products::list::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/docs", get(routes::docs::page))
        .route("/docs/openapi.json", get(routes::docs::openapi))
        .with_state(state)
        .merge(metrics_router)
        .layer(TimeoutLayer::new(config.request_timeout))
        .layer(CatchPanicLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Products the in-memory store starts with when no database is configured.
pub fn demo_products() -> Vec<NewProduct> {
    vec![
        NewProduct::new("Laptop", Money::from_minor_units(99999), 10),
        NewProduct::new("Mouse", Money::from_minor_units(2999), 50),
        NewProduct::new("Keyboard", Money::from_minor_units(7999), 25),
    ]
}
