//! Domain error types.

use common::{Money, OrderId, ProductId};
use order_store::StoreError;
use thiserror::Error;

/// Errors that can occur during domain operations.
#[derive(Debug, Error)]
pub enum DomainError {
    /// The submitted cart had no items.
    #[error("Order must contain at least one item")]
    EmptyCart,

    /// A line had a non-positive quantity.
    #[error("Invalid quantity {quantity} for product {product_id}")]
    InvalidQuantity { product_id: ProductId, quantity: u32 },

    /// A line referenced a product the catalog does not carry.
    #[error("Unknown product: {0}")]
    UnknownProduct(ProductId),

    /// A line's unit price disagreed with the catalog.
    #[error("Unit price {submitted} for product {product_id} does not match catalog price {catalog}")]
    PriceMismatch {
        product_id: ProductId,
        submitted: Money,
        catalog: Money,
    },

    /// No order exists with the given id.
    #[error("Order not found: {0}")]
    NotFound(OrderId),

    /// The order store failed.
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
}

impl DomainError {
    /// Returns true if the error is the client's fault (a rejected cart).
    pub fn is_invalid_input(&self) -> bool {
        matches!(
            self,
            DomainError::EmptyCart
                | DomainError::InvalidQuantity { .. }
                | DomainError::UnknownProduct(_)
                | DomainError::PriceMismatch { .. }
        )
    }
}
