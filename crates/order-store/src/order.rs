//! Order and order item records.

use chrono::{DateTime, Utc};
use common::{Money, OrderId, OrderStatus, ProductId};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A line item in an order.
///
/// Owned exclusively by its parent [`Order`]; the unit price is snapshotted
/// from the catalog at order-creation time and never recomputed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OrderItem {
    /// Row identifier.
    pub id: Uuid,

    /// The product this line refers to.
    pub product_id: ProductId,

    /// Number of boxes, always at least 1.
    pub quantity: u32,

    /// Price per box at the time the order was created.
    pub unit_price: Money,
}

impl OrderItem {
    /// Creates a new order item with a fresh row identifier.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, unit_price: Money) -> Self {
        Self {
            id: Uuid::new_v4(),
            product_id: product_id.into(),
            quantity,
            unit_price,
        }
    }

    /// Returns the total price for this line (quantity * unit_price).
    pub fn line_total(&self) -> Money {
        self.unit_price.multiply(self.quantity)
    }
}

/// A customer's order.
///
/// Immutable after creation except for `status`, `payment_intent_id`, and
/// `paid_at`. `total` is fixed at creation from the item snapshot, so later
/// catalog price changes never alter an existing order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Order {
    /// Opaque unique identifier.
    pub id: OrderId,

    /// Sum of `unit_price * quantity` over all items.
    pub total: Money,

    /// Current position in the payment state machine.
    pub status: OrderStatus,

    /// Intent identifier recorded by the payment bridge, once one exists.
    pub payment_intent_id: Option<String>,

    /// Creation time.
    pub created_at: DateTime<Utc>,

    /// Time the successful-payment notification was observed.
    pub paid_at: Option<DateTime<Utc>>,

    /// Line items in submission order.
    pub items: Vec<OrderItem>,
}

impl Order {
    /// Creates a new pending order from its items, computing the total.
    pub fn new(id: OrderId, items: Vec<OrderItem>, created_at: DateTime<Utc>) -> Self {
        let total = items.iter().map(OrderItem::line_total).sum();
        Self {
            id,
            total,
            status: OrderStatus::Pending,
            payment_intent_id: None,
            created_at,
            paid_at: None,
            items,
        }
    }
}
