//! Payment error types.

use common::OrderId;
use order_store::StoreError;
use thiserror::Error;

/// Errors that can occur in the payment bridge and webhook reconciler.
#[derive(Debug, Error)]
pub enum PaymentError {
    /// No order exists with the given id.
    #[error("Order not found: {0}")]
    OrderNotFound(OrderId),

    /// The order has already been paid; no further intent may be created.
    #[error("Order {0} is already paid")]
    AlreadyPaid(OrderId),

    /// The external processor refused to open an intent.
    #[error("Payment processor error: {0}")]
    Processor(String),

    /// The webhook payload's signature did not verify.
    ///
    /// This is the system's only authentication boundary. The delivery is
    /// rejected with a client error and must not be retried.
    #[error("Webhook signature verification failed")]
    SignatureVerification,

    /// The webhook payload was signed correctly but could not be decoded.
    #[error("Malformed webhook payload: {0}")]
    MalformedPayload(#[from] serde_json::Error),

    /// The order store failed while persisting a state change.
    ///
    /// Surfaced as a server error so the processor retries delivery.
    #[error("Order store error: {0}")]
    Store(#[from] StoreError),
}
