//! Order placement endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use chrono::{DateTime, Utc};
use domain::CreateOrderRequest;
use serde::Serialize;
use store::{Order, ProductCatalog, TransactionCoordinator};

use crate::AppState;
use crate::error::ApiError;

#[derive(Serialize)]
pub struct OrderResponse {
    pub id: i64,
    pub customer_id: i64,
    pub created_at: DateTime<Utc>,
}

impl From<Order> for OrderResponse {
    fn from(order: Order) -> Self {
        Self {
            id: order.id.as_i64(),
            customer_id: order.customer_id.as_i64(),
            created_at: order.created_at,
        }
    }
}

/// POST /orders: place an order against current stock.
#[tracing::instrument(skip(state, payload))]
pub async fn create<S: TransactionCoordinator + ProductCatalog + 'static>(
    State(state): State<Arc<AppState<S>>>,
    payload: Result<Json<CreateOrderRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<OrderResponse>), ApiError> {
    let Json(request) = payload.map_err(|e| ApiError::BadRequest(e.body_text()))?;

    let order = state.orders.place_order(request).await?;

    Ok((StatusCode::CREATED, Json(OrderResponse::from(order))))
}
