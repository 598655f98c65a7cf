//! Payment processor trait and simulated implementation.

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use async_trait::async_trait;
use common::{Money, OrderId};

use crate::error::PaymentError;

/// A payment intent opened with the external processor.
#[derive(Debug, Clone)]
pub struct PaymentIntent {
    /// The intent identifier assigned by the processor.
    pub id: String,

    /// Opaque token the customer's browser uses to complete payment.
    pub client_secret: String,
}

/// Contract for opening payment intents with the external processor.
///
/// The amount is in minor units and the order id travels as correlation
/// metadata, so webhook deliveries can be matched back to the order.
#[async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Opens a payment intent for the given amount.
    async fn create_intent(
        &self,
        amount: Money,
        order_id: OrderId,
    ) -> Result<PaymentIntent, PaymentError>;
}

#[derive(Debug, Default)]
struct SimulatedProcessorState {
    intents: HashMap<String, (OrderId, Money)>,
    next_id: u32,
    fail_on_create: bool,
}

/// In-memory payment processor for tests and local runs.
#[derive(Debug, Clone, Default)]
pub struct SimulatedProcessor {
    state: Arc<RwLock<SimulatedProcessorState>>,
}

impl SimulatedProcessor {
    /// Creates a new simulated processor.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configures the processor to fail on the next create call.
    pub fn set_fail_on_create(&self, fail: bool) {
        self.state.write().unwrap().fail_on_create = fail;
    }

    /// Returns the number of intents opened so far.
    pub fn intent_count(&self) -> usize {
        self.state.read().unwrap().intents.len()
    }

    /// Returns the order an intent was opened for, if it exists.
    pub fn order_for_intent(&self, intent_id: &str) -> Option<OrderId> {
        self.state
            .read()
            .unwrap()
            .intents
            .get(intent_id)
            .map(|(order_id, _)| *order_id)
    }
}

#[async_trait]
impl PaymentProcessor for SimulatedProcessor {
    async fn create_intent(
        &self,
        amount: Money,
        order_id: OrderId,
    ) -> Result<PaymentIntent, PaymentError> {
        let mut state = self.state.write().unwrap();

        if state.fail_on_create {
            return Err(PaymentError::Processor("intent declined".to_string()));
        }

        state.next_id += 1;
        let id = format!("pi_{:04}", state.next_id);
        let client_secret = format!("{id}_secret");
        state.intents.insert(id.clone(), (order_id, amount));

        Ok(PaymentIntent { id, client_secret })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_create_intent() {
        let processor = SimulatedProcessor::new();
        let order_id = OrderId::new();

        let intent = processor
            .create_intent(Money::from_cents(1500), order_id)
            .await
            .unwrap();
        assert!(intent.id.starts_with("pi_"));
        assert!(intent.client_secret.ends_with("_secret"));
        assert_eq!(processor.intent_count(), 1);
        assert_eq!(processor.order_for_intent(&intent.id), Some(order_id));
    }

    #[tokio::test]
    async fn test_fail_on_create() {
        let processor = SimulatedProcessor::new();
        processor.set_fail_on_create(true);

        let result = processor
            .create_intent(Money::from_cents(500), OrderId::new())
            .await;
        assert!(matches!(result, Err(PaymentError::Processor(_))));
        assert_eq!(processor.intent_count(), 0);
    }

    #[tokio::test]
    async fn test_sequential_intent_ids() {
        let processor = SimulatedProcessor::new();
        let order_id = OrderId::new();

        let i1 = processor
            .create_intent(Money::from_cents(500), order_id)
            .await
            .unwrap();
        let i2 = processor
            .create_intent(Money::from_cents(500), order_id)
            .await
            .unwrap();

        assert_eq!(i1.id, "pi_0001");
        assert_eq!(i2.id, "pi_0002");
    }
}
