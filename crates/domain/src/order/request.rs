//! Order placement input.

use common::{CustomerId, ProductId};
use serde::{Deserialize, Serialize};

use super::ValidationError;

/// One (product, quantity) pair within an order request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItem {
    pub product_id: ProductId,
    pub quantity: u32,
}

impl LineItem {
    /// Creates a new line item.
    pub fn new(product_id: ProductId, quantity: u32) -> Self {
        Self {
            product_id,
            quantity,
        }
    }
}

/// Request to place an order.
///
/// Items are processed in the order given. Missing fields deserialize to
/// their empty values so they surface as validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct CreateOrderRequest {
    #[serde(default)]
    pub customer_id: CustomerId,
    #[serde(default)]
    pub items: Vec<LineItem>,
}

impl CreateOrderRequest {
    /// Creates a new order request.
    pub fn new(customer_id: CustomerId, items: Vec<LineItem>) -> Self {
        Self {
            customer_id,
            items,
        }
    }

    /// Checks the request without touching any store.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.customer_id.is_unset() {
            return Err(ValidationError::CustomerIdRequired);
        }
        if self.items.is_empty() {
            return Err(ValidationError::NoItems);
        }
        if let Some((index, item)) = self
            .items
            .iter()
            .enumerate()
            .find(|(_, item)| item.quantity == 0)
        {
            return Err(ValidationError::InvalidQuantity {
                index,
                quantity: item.quantity,
            });
        }
        Ok(())
    }
}
