//! Payment intent bridge between orders and the external processor.

use std::sync::Arc;

use common::{OrderId, OrderStatus};
use order_store::OrderStore;

use crate::error::PaymentError;
use crate::processor::PaymentProcessor;

/// What a client needs to complete payment for an order.
#[derive(Debug, Clone)]
pub struct IntentHandle {
    /// Opaque client-side payment token.
    pub client_secret: String,

    /// The processor's intent identifier.
    pub payment_intent_id: String,
}

/// Opens payment intents for pending orders.
///
/// Safe to invoke repeatedly for the same order: each call opens a fresh
/// intent and overwrites the stored intent id (last writer wins, no dedup).
pub struct PaymentIntentBridge<S: OrderStore> {
    store: S,
    processor: Arc<dyn PaymentProcessor>,
}

impl<S: OrderStore> PaymentIntentBridge<S> {
    /// Creates a new bridge over the given store and processor.
    pub fn new(store: S, processor: Arc<dyn PaymentProcessor>) -> Self {
        Self { store, processor }
    }

    /// Opens a payment intent for an order's total.
    ///
    /// Fails with [`PaymentError::AlreadyPaid`] once the order is `Paid`;
    /// any other status may still (re)attempt payment. The order's status
    /// is not changed here; only the webhook reconciler settles orders.
    #[tracing::instrument(skip(self))]
    pub async fn create_payment_intent(
        &self,
        order_id: OrderId,
    ) -> Result<IntentHandle, PaymentError> {
        let order = self
            .store
            .get_order(order_id)
            .await?
            .ok_or(PaymentError::OrderNotFound(order_id))?;

        if order.status == OrderStatus::Paid {
            return Err(PaymentError::AlreadyPaid(order_id));
        }

        let intent = self.processor.create_intent(order.total, order_id).await?;
        self.store.set_payment_intent(order_id, &intent.id).await?;

        metrics::counter!("payment_intents_created_total").increment(1);
        tracing::info!(%order_id, intent_id = %intent.id, amount = %order.total, "payment intent created");

        Ok(IntentHandle {
            client_secret: intent.client_secret,
            payment_intent_id: intent.id,
        })
    }
}
