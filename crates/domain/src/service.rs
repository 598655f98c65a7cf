//! Order service providing creation and read access over the store.

use catalog::Catalog;
use chrono::Utc;
use common::OrderId;
use order_store::{Order, OrderItem, OrderStore};

use crate::cart::CartLine;
use crate::error::DomainError;

/// Service for creating and reading orders.
///
/// Owns the only write path into the order store besides webhook
/// reconciliation: a single durable insert per accepted cart.
pub struct OrderService<S: OrderStore> {
    store: S,
    catalog: Catalog,
}

impl<S: OrderStore> OrderService<S> {
    /// Creates a new order service over the given store and catalog.
    pub fn new(store: S, catalog: Catalog) -> Self {
        Self { store, catalog }
    }

    /// Creates an order from a client-submitted cart.
    ///
    /// Every line is validated and re-priced from the catalog; the order's
    /// total is fixed here and never recomputed, so later catalog price
    /// changes cannot alter it.
    #[tracing::instrument(skip(self, lines))]
    pub async fn create_order(&self, lines: Vec<CartLine>) -> Result<Order, DomainError> {
        if lines.is_empty() {
            return Err(DomainError::EmptyCart);
        }

        let mut items = Vec::with_capacity(lines.len());
        for line in lines {
            if line.quantity == 0 {
                return Err(DomainError::InvalidQuantity {
                    product_id: line.product_id,
                    quantity: line.quantity,
                });
            }

            let product = self
                .catalog
                .lookup_by_id(&line.product_id)
                .ok_or_else(|| DomainError::UnknownProduct(line.product_id.clone()))?;

            if line.unit_price_cents != product.unit_price {
                return Err(DomainError::PriceMismatch {
                    product_id: line.product_id,
                    submitted: line.unit_price_cents,
                    catalog: product.unit_price,
                });
            }

            items.push(OrderItem::new(
                line.product_id,
                line.quantity,
                product.unit_price,
            ));
        }

        let order = Order::new(OrderId::new(), items, Utc::now());
        self.store.insert_order(&order).await?;

        metrics::counter!("orders_created_total").increment(1);
        tracing::info!(order_id = %order.id, total = %order.total, "order created");

        Ok(order)
    }

    /// Loads an order by ID.
    #[tracing::instrument(skip(self))]
    pub async fn get_order(&self, id: OrderId) -> Result<Order, DomainError> {
        self.store
            .get_order(id)
            .await?
            .ok_or(DomainError::NotFound(id))
    }

    /// Lists all orders, newest first.
    #[tracing::instrument(skip(self))]
    pub async fn list_orders(&self) -> Result<Vec<Order>, DomainError> {
        Ok(self.store.list_orders().await?)
    }
}
