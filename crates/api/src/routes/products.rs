//! Product listing endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use chrono::{DateTime, Utc};
use serde::Serialize;
use store::{Product, ProductCatalog, TransactionCoordinator};

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct ProductResponse {
    pub id: i64,
    pub name: String,
    pub price_in_minor_units: i64,
    pub quantity: u32,
    pub created_at: DateTime<Utc>,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        Self {
            id: product.id.as_i64(),
            name: product.name,
            price_in_minor_units: product.price.minor_units(),
            quantity: product.quantity,
            created_at: product.created_at,
        }
    }
}

/// GET /products: list every product with price and stock.
#[tracing::instrument(skip(state))]
pub async fn list<S: TransactionCoordinator + ProductCatalog + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Result<Json<Vec<ProductResponse>>, ApiError> {
    let products = state.catalog.list_products().await?;
    Ok(Json(products.into_iter().map(ProductResponse::from).collect()))
}
