//! Order placement service.

use std::future::Future;
use std::time::Duration;

use store::{NewOrderItem, Order, TransactionCoordinator, UnitOfWork};
use tokio::time::Instant;

use super::{CreateOrderRequest, OrderError};

/// Turns a [`CreateOrderRequest`] into a persisted order, or a definitive failure.
///
/// Each call opens exactly one unit of work. The order header, its lines and
/// the stock decrements all happen inside it, and any failure drops the unit
/// before returning, so no partial order is ever visible.
pub struct OrderPlacementService<C: TransactionCoordinator> {
    coordinator: C,
    timeout: Option<Duration>,
}

impl<C: TransactionCoordinator> OrderPlacementService<C> {
    /// Creates a new placement service with no deadline.
    pub fn new(coordinator: C) -> Self {
        Self {
            coordinator,
            timeout: None,
        }
    }

    /// Sets a deadline for each placement, measured from the first store call.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Returns a reference to the underlying coordinator.
    pub fn coordinator(&self) -> &C {
        &self.coordinator
    }

    /// Places an order.
    ///
    /// Validation failures return before any store interaction. Line items
    /// are processed strictly in request order, so two lines for the same
    /// product see each other's decrements.
    #[tracing::instrument(
        skip(self, request),
        fields(customer_id = %request.customer_id, items = request.items.len())
    )]
    pub async fn place_order(&self, request: CreateOrderRequest) -> Result<Order, OrderError> {
        let started = std::time::Instant::now();
        let result = self.try_place(&request).await;
        metrics::histogram!("order_placement_duration_seconds")
            .record(started.elapsed().as_secs_f64());

        match &result {
            Ok(order) => {
                metrics::counter!("orders_placed_total").increment(1);
                tracing::info!(order_id = %order.id, "order placed");
            }
            Err(err) => {
                metrics::counter!("orders_rejected_total", "reason" => err.reason()).increment(1);
                tracing::warn!(reason = err.reason(), error = %err, "order rejected");
            }
        }

        result
    }

    async fn try_place(&self, request: &CreateOrderRequest) -> Result<Order, OrderError> {
        request.validate()?;

        let deadline = self.timeout.map(|t| (Instant::now() + t, t));
        let mut unit = within(deadline, async {
            self.coordinator.begin().await.map_err(OrderError::from)
        })
        .await?;

        // Early returns drop `unit`, which rolls it back.
        let order = within(deadline, record_order(&mut unit, request)).await?;

        unit.commit().await?;
        Ok(order)
    }
}

/// Writes the order, its lines and the stock decrements into `unit`.
async fn record_order<U: UnitOfWork>(
    unit: &mut U,
    request: &CreateOrderRequest,
) -> Result<Order, OrderError> {
    let order = unit.create_order(request.customer_id).await?;

    for line in &request.items {
        let product = unit
            .find_product(line.product_id)
            .await?
            .ok_or(OrderError::ProductNotFound {
                product_id: line.product_id,
            })?;

        if product.quantity < line.quantity {
            return Err(OrderError::InsufficientStock {
                product_id: product.id,
                requested: line.quantity,
                available: product.quantity,
            });
        }

        unit.create_order_item(NewOrderItem {
            order_id: order.id,
            product_id: product.id,
            quantity: line.quantity,
            unit_price: product.price,
        })
        .await?;

        unit.decrement_quantity(product.id, line.quantity).await?;

        tracing::debug!(
            product_id = %product.id,
            quantity = line.quantity,
            remaining = product.quantity - line.quantity,
            "line item reserved"
        );
    }

    Ok(order)
}

async fn within<T>(
    deadline: Option<(Instant, Duration)>,
    fut: impl Future<Output = Result<T, OrderError>>,
) -> Result<T, OrderError> {
    match deadline {
        Some((at, timeout)) => tokio::time::timeout_at(at, fut)
            .await
            .map_err(|_| OrderError::Cancelled { timeout })?,
        None => fut.await,
    }
}
