//! Order store abstraction.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, OrderStatus, PaymentOutcome};

use crate::{Order, Result};

/// The result of applying a payment outcome to a stored order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionOutcome {
    /// The order moved to the given terminal status.
    Applied(OrderStatus),

    /// The order was already in a terminal status; nothing changed.
    ///
    /// Duplicate and out-of-order webhook deliveries land here, which is
    /// what makes at-least-once delivery safe to acknowledge.
    AlreadySettled(OrderStatus),

    /// No order exists with the given id.
    NotFound,
}

/// Durable storage for orders and their items.
///
/// The store is the only shared resource in the system; every write is a
/// single transaction. Implementations must apply payment outcomes
/// atomically so that concurrent webhook deliveries for the same order
/// cannot both transition it.
#[async_trait]
pub trait OrderStore: Send + Sync {
    /// Persists a freshly created order together with its items.
    async fn insert_order(&self, order: &Order) -> Result<()>;

    /// Loads an order with its items, or `None` if absent.
    async fn get_order(&self, id: OrderId) -> Result<Option<Order>>;

    /// Lists all orders, newest first by creation time.
    async fn list_orders(&self) -> Result<Vec<Order>>;

    /// Records the payment intent id on an order. Repeated calls overwrite
    /// the previous value (last writer wins). Returns false if no such
    /// order exists.
    async fn set_payment_intent(&self, id: OrderId, intent_id: &str) -> Result<bool>;

    /// Applies a payment outcome, transitioning the order out of `Pending`.
    ///
    /// The transition only happens while the order is still `Pending`;
    /// orders already settled are left untouched. A `Succeeded` outcome
    /// also records `observed_at` as the order's `paid_at`.
    async fn apply_outcome(
        &self,
        id: OrderId,
        outcome: PaymentOutcome,
        observed_at: DateTime<Utc>,
    ) -> Result<TransitionOutcome>;
}
