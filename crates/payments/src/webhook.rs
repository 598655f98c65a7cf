//! Webhook event model and order reconciliation.

use chrono::Utc;
use common::{OrderId, PaymentOutcome};
use order_store::{OrderStore, TransitionOutcome};
use serde::Deserialize;
use uuid::Uuid;

use crate::error::PaymentError;
use crate::signature::SignatureVerifier;

/// The payment-intent object embedded in a webhook event.
#[derive(Debug, Clone, Deserialize)]
pub struct PaymentIntentObject {
    /// The processor's intent identifier.
    pub id: String,

    /// Correlation metadata attached when the intent was created.
    #[serde(default)]
    pub metadata: IntentMetadata,
}

/// Correlation metadata carried on a payment intent.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct IntentMetadata {
    /// The order this intent was opened for, as set by the bridge.
    #[serde(default)]
    pub order_id: Option<String>,
}

impl PaymentIntentObject {
    /// Returns the correlated order id, if present and well-formed.
    pub fn order_id(&self) -> Option<OrderId> {
        let raw = self.metadata.order_id.as_deref()?;
        match raw.parse::<Uuid>() {
            Ok(uuid) => Some(OrderId::from_uuid(uuid)),
            Err(_) => {
                tracing::warn!(intent_id = %self.id, "malformed order id in intent metadata");
                None
            }
        }
    }
}

/// A webhook event, decoded into the closed set of kinds this system
/// handles plus an explicit unhandled case.
#[derive(Debug, Clone)]
pub enum WebhookEvent {
    /// `payment_intent.succeeded`
    PaymentIntentSucceeded(PaymentIntentObject),

    /// `payment_intent.payment_failed`
    PaymentIntentFailed(PaymentIntentObject),

    /// `payment_intent.canceled`
    PaymentIntentCanceled(PaymentIntentObject),

    /// Any other event kind; logged and ignored.
    Unhandled { kind: String },
}

impl WebhookEvent {
    /// Decodes a raw (already verified) webhook payload.
    ///
    /// Only the three handled kinds have their embedded object decoded;
    /// other kinds carry arbitrary objects and collapse to `Unhandled`.
    pub fn parse(payload: &[u8]) -> Result<Self, serde_json::Error> {
        #[derive(Deserialize)]
        struct Envelope {
            #[serde(rename = "type")]
            kind: String,
            #[serde(default)]
            data: serde_json::Value,
        }

        let envelope: Envelope = serde_json::from_slice(payload)?;

        let outcome = match envelope.kind.as_str() {
            "payment_intent.succeeded" => Some(PaymentOutcome::Succeeded),
            "payment_intent.payment_failed" => Some(PaymentOutcome::Failed),
            "payment_intent.canceled" => Some(PaymentOutcome::Canceled),
            _ => None,
        };
        let Some(outcome) = outcome else {
            return Ok(Self::Unhandled {
                kind: envelope.kind,
            });
        };

        let intent: PaymentIntentObject =
            serde_json::from_value(envelope.data["object"].clone())?;
        Ok(match outcome {
            PaymentOutcome::Succeeded => Self::PaymentIntentSucceeded(intent),
            PaymentOutcome::Failed => Self::PaymentIntentFailed(intent),
            PaymentOutcome::Canceled => Self::PaymentIntentCanceled(intent),
        })
    }
}

/// Applies payment outcomes delivered by the processor to stored orders.
///
/// Signature verification happens before anything else; an unverifiable
/// delivery changes no state. Once verified, the delivery is always
/// acknowledged (the processor must not retry payloads this system cannot
/// act on further), with one exception: a store failure while persisting
/// the transition surfaces as a server error so the processor redelivers.
pub struct WebhookReconciler<S: OrderStore> {
    store: S,
    verifier: SignatureVerifier,
}

impl<S: OrderStore> WebhookReconciler<S> {
    /// Creates a new reconciler over the given store.
    pub fn new(store: S, verifier: SignatureVerifier) -> Self {
        Self { store, verifier }
    }

    /// Verifies and processes one webhook delivery.
    #[tracing::instrument(skip_all)]
    pub async fn process(
        &self,
        payload: &[u8],
        signature_header: &str,
    ) -> Result<(), PaymentError> {
        if let Err(err) = self.verifier.verify(payload, signature_header) {
            metrics::counter!("webhook_signature_failures_total").increment(1);
            return Err(err);
        }
        metrics::counter!("webhook_events_total").increment(1);

        let event = WebhookEvent::parse(payload)?;
        let (outcome, intent) = match event {
            WebhookEvent::PaymentIntentSucceeded(intent) => (PaymentOutcome::Succeeded, intent),
            WebhookEvent::PaymentIntentFailed(intent) => (PaymentOutcome::Failed, intent),
            WebhookEvent::PaymentIntentCanceled(intent) => (PaymentOutcome::Canceled, intent),
            WebhookEvent::Unhandled { kind } => {
                tracing::debug!(%kind, "unhandled webhook event kind");
                return Ok(());
            }
        };

        let Some(order_id) = intent.order_id() else {
            tracing::debug!(intent_id = %intent.id, "webhook event carries no order id");
            return Ok(());
        };

        match self.store.apply_outcome(order_id, outcome, Utc::now()).await? {
            TransitionOutcome::Applied(status) => {
                tracing::info!(%order_id, %status, "order settled from webhook");
            }
            TransitionOutcome::AlreadySettled(status) => {
                tracing::debug!(%order_id, %status, "duplicate webhook delivery ignored");
            }
            TransitionOutcome::NotFound => {
                tracing::warn!(%order_id, "webhook for unknown order acknowledged");
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, OrderStatus};
    use order_store::{InMemoryOrderStore, Order, OrderItem};

    use crate::signature::sign;

    const SECRET: &str = "whsec_test123secret456";

    fn event_payload(kind: &str, order_id: Option<&str>) -> Vec<u8> {
        let metadata = match order_id {
            Some(id) => serde_json::json!({ "order_id": id }),
            None => serde_json::json!({}),
        };
        serde_json::to_vec(&serde_json::json!({
            "id": "evt_0001",
            "type": kind,
            "data": { "object": { "id": "pi_0001", "metadata": metadata } }
        }))
        .unwrap()
    }

    fn signed(payload: &[u8]) -> String {
        sign(SECRET, Utc::now().timestamp(), payload)
    }

    async fn reconciler_with_order() -> (WebhookReconciler<InMemoryOrderStore>, InMemoryOrderStore, Order)
    {
        let store = InMemoryOrderStore::new();
        let order = Order::new(
            OrderId::new(),
            vec![OrderItem::new("samoas", 2, Money::from_cents(500))],
            Utc::now(),
        );
        store.insert_order(&order).await.unwrap();
        let reconciler = WebhookReconciler::new(store.clone(), SignatureVerifier::new(SECRET));
        (reconciler, store, order)
    }

    #[test]
    fn test_parse_known_kinds() {
        let payload = event_payload("payment_intent.succeeded", Some("not-a-uuid"));
        let event = WebhookEvent::parse(&payload).unwrap();
        assert!(matches!(event, WebhookEvent::PaymentIntentSucceeded(_)));

        let payload = event_payload("payment_intent.payment_failed", None);
        assert!(matches!(
            WebhookEvent::parse(&payload).unwrap(),
            WebhookEvent::PaymentIntentFailed(_)
        ));

        let payload = event_payload("payment_intent.canceled", None);
        assert!(matches!(
            WebhookEvent::parse(&payload).unwrap(),
            WebhookEvent::PaymentIntentCanceled(_)
        ));
    }

    #[test]
    fn test_parse_unhandled_kind_ignores_object_shape() {
        // Other event kinds embed objects with entirely different fields
        let payload = serde_json::to_vec(&serde_json::json!({
            "type": "charge.refunded",
            "data": { "object": { "amount": 500, "currency": "usd" } }
        }))
        .unwrap();
        let event = WebhookEvent::parse(&payload).unwrap();
        assert!(matches!(event, WebhookEvent::Unhandled { kind } if kind == "charge.refunded"));
    }

    #[test]
    fn test_parse_garbage_is_error() {
        assert!(WebhookEvent::parse(b"not json").is_err());
        assert!(WebhookEvent::parse(b"{\"no_type\":true}").is_err());
    }

    #[test]
    fn test_malformed_metadata_order_id_is_none() {
        let payload = event_payload("payment_intent.succeeded", Some("not-a-uuid"));
        let WebhookEvent::PaymentIntentSucceeded(intent) = WebhookEvent::parse(&payload).unwrap()
        else {
            panic!("wrong kind");
        };
        assert!(intent.order_id().is_none());
    }

    #[tokio::test]
    async fn test_succeeded_event_marks_order_paid() {
        let (reconciler, store, order) = reconciler_with_order().await;
        let payload = event_payload(
            "payment_intent.succeeded",
            Some(&order.id.to_string()),
        );

        reconciler.process(&payload, &signed(&payload)).await.unwrap();

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Paid);
        assert!(loaded.paid_at.is_some());
    }

    #[tokio::test]
    async fn test_failed_event_marks_order_failed() {
        let (reconciler, store, order) = reconciler_with_order().await;
        let payload = event_payload(
            "payment_intent.payment_failed",
            Some(&order.id.to_string()),
        );

        reconciler.process(&payload, &signed(&payload)).await.unwrap();

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Failed);
        assert!(loaded.paid_at.is_none());
    }

    #[tokio::test]
    async fn test_canceled_event_marks_order_cancelled() {
        let (reconciler, store, order) = reconciler_with_order().await;
        let payload = event_payload(
            "payment_intent.canceled",
            Some(&order.id.to_string()),
        );

        reconciler.process(&payload, &signed(&payload)).await.unwrap();

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Cancelled);
    }

    #[tokio::test]
    async fn test_duplicate_succeeded_is_acknowledged_once_applied() {
        let (reconciler, store, order) = reconciler_with_order().await;
        let payload = event_payload(
            "payment_intent.succeeded",
            Some(&order.id.to_string()),
        );

        reconciler.process(&payload, &signed(&payload)).await.unwrap();
        let paid_at = store.get_order(order.id).await.unwrap().unwrap().paid_at;

        // Redelivery acknowledges without touching the order
        reconciler.process(&payload, &signed(&payload)).await.unwrap();
        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Paid);
        assert_eq!(loaded.paid_at, paid_at);
    }

    #[tokio::test]
    async fn test_bad_signature_mutates_nothing() {
        let (reconciler, store, order) = reconciler_with_order().await;
        let payload = event_payload(
            "payment_intent.succeeded",
            Some(&order.id.to_string()),
        );
        let forged = sign("wrong_secret", Utc::now().timestamp(), &payload);

        let result = reconciler.process(&payload, &forged).await;
        assert!(matches!(result, Err(PaymentError::SignatureVerification)));

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_unknown_order_is_acknowledged() {
        let (reconciler, store, order) = reconciler_with_order().await;
        let payload = event_payload(
            "payment_intent.succeeded",
            Some(&OrderId::new().to_string()),
        );

        reconciler.process(&payload, &signed(&payload)).await.unwrap();

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_event_without_order_id_is_acknowledged() {
        let (reconciler, _, _) = reconciler_with_order().await;
        let payload = event_payload("payment_intent.succeeded", None);

        assert!(reconciler.process(&payload, &signed(&payload)).await.is_ok());
    }

    #[tokio::test]
    async fn test_unhandled_kind_is_acknowledged() {
        let (reconciler, store, order) = reconciler_with_order().await;
        let payload = serde_json::to_vec(&serde_json::json!({
            "type": "payment_intent.created",
            "data": { "object": { "id": "pi_0001" } }
        }))
        .unwrap();

        reconciler.process(&payload, &signed(&payload)).await.unwrap();

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn test_signed_but_malformed_payload_is_error() {
        let (reconciler, _, _) = reconciler_with_order().await;
        let payload = b"{\"data\": {}}";

        let result = reconciler.process(payload, &signed(payload)).await;
        assert!(matches!(result, Err(PaymentError::MalformedPayload(_))));
    }
}
