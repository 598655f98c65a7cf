//! Order status state machine.

use serde::{Deserialize, Serialize};

/// The payment status of an order.
///
/// Status transitions, all driven by webhook notifications from the
/// payment processor:
/// ```text
/// Pending ──┬──► Paid       (payment_intent.succeeded)
///           ├──► Failed     (payment_intent.payment_failed)
///           └──► Cancelled  (payment_intent.canceled)
/// ```
/// `Paid`, `Failed`, and `Cancelled` are terminal. A notification for an
/// order already in a terminal state is a no-op, which makes at-least-once
/// webhook delivery idempotent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Order created, awaiting payment.
    #[default]
    Pending,

    /// Payment collected (terminal state).
    Paid,

    /// Payment attempt failed (terminal state).
    Failed,

    /// Payment was cancelled (terminal state).
    Cancelled,
}

impl OrderStatus {
    /// Returns true if a payment outcome can still be applied in this state.
    pub fn can_settle(&self) -> bool {
        matches!(self, OrderStatus::Pending)
    }

    /// Returns true if this is a terminal state (no further transitions possible).
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Paid | OrderStatus::Failed | OrderStatus::Cancelled
        )
    }

    /// Returns the status name as stored in the database.
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "PENDING",
            OrderStatus::Paid => "PAID",
            OrderStatus::Failed => "FAILED",
            OrderStatus::Cancelled => "CANCELLED",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for OrderStatus {
    type Err = UnknownStatus;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "PENDING" => Ok(OrderStatus::Pending),
            "PAID" => Ok(OrderStatus::Paid),
            "FAILED" => Ok(OrderStatus::Failed),
            "CANCELLED" => Ok(OrderStatus::Cancelled),
            other => Err(UnknownStatus(other.to_string())),
        }
    }
}

/// Error returned when parsing an unrecognized status string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownStatus(pub String);

impl std::fmt::Display for UnknownStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "unknown order status: {}", self.0)
    }
}

impl std::error::Error for UnknownStatus {}

/// A payment outcome reported by the processor for an order's intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PaymentOutcome {
    /// The payment was collected.
    Succeeded,
    /// The payment attempt failed.
    Failed,
    /// The payment intent was cancelled before collection.
    Canceled,
}

impl PaymentOutcome {
    /// Returns the terminal status this outcome drives the order to.
    pub fn target_status(&self) -> OrderStatus {
        match self {
            PaymentOutcome::Succeeded => OrderStatus::Paid,
            PaymentOutcome::Failed => OrderStatus::Failed,
            PaymentOutcome::Canceled => OrderStatus::Cancelled,
        }
    }

    /// Returns true if this outcome records a `paid_at` timestamp.
    pub fn sets_paid_at(&self) -> bool {
        matches!(self, PaymentOutcome::Succeeded)
    }
}
