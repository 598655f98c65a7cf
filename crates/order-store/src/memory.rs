use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{OrderId, PaymentOutcome};
use tokio::sync::RwLock;

use crate::{
    Order, Result,
    store::{OrderStore, TransitionOutcome},
};

/// In-memory order store implementation.
///
/// Stores all orders in memory behind a single lock and provides the same
/// interface as the PostgreSQL implementation. Used for tests and for
/// running the service without a database.
#[derive(Clone, Default)]
pub struct InMemoryOrderStore {
    orders: Arc<RwLock<Vec<Order>>>,
}

impl InMemoryOrderStore {
    /// Creates a new empty in-memory order store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the total number of orders stored.
    pub async fn order_count(&self) -> usize {
        self.orders.read().await.len()
    }

    /// Clears all orders.
    pub async fn clear(&self) {
        self.orders.write().await.clear();
    }
}

#[async_trait]
impl OrderStore for InMemoryOrderStore {
    async fn insert_order(&self, order: &Order) -> Result<()> {
        self.orders.write().await.push(order.clone());
        Ok(())
    }

    async fn get_order(&self, id: OrderId) -> Result<Option<Order>> {
        let orders = self.orders.read().await;
        Ok(orders.iter().find(|o| o.id == id).cloned())
    }

    async fn list_orders(&self) -> Result<Vec<Order>> {
        let orders = self.orders.read().await;
        let mut all: Vec<_> = orders.clone();
        // Stable sort, then reverse: newest first, ties in reverse
        // insertion order.
        all.sort_by_key(|o| o.created_at);
        all.reverse();
        Ok(all)
    }

    async fn set_payment_intent(&self, id: OrderId, intent_id: &str) -> Result<bool> {
        let mut orders = self.orders.write().await;
        match orders.iter_mut().find(|o| o.id == id) {
            Some(order) => {
                order.payment_intent_id = Some(intent_id.to_string());
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn apply_outcome(
        &self,
        id: OrderId,
        outcome: PaymentOutcome,
        observed_at: DateTime<Utc>,
    ) -> Result<TransitionOutcome> {
        // Check-then-set under one write lock; concurrent deliveries for
        // the same order serialize here.
        let mut orders = self.orders.write().await;
        let Some(order) = orders.iter_mut().find(|o| o.id == id) else {
            return Ok(TransitionOutcome::NotFound);
        };

        if !order.status.can_settle() {
            return Ok(TransitionOutcome::AlreadySettled(order.status));
        }

        order.status = outcome.target_status();
        if outcome.sets_paid_at() {
            order.paid_at = Some(observed_at);
        }
        Ok(TransitionOutcome::Applied(order.status))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use common::{Money, OrderStatus};
    use crate::OrderItem;

    fn sample_order() -> Order {
        Order::new(
            OrderId::new(),
            vec![OrderItem::new("thin-mints", 2, Money::from_cents(500))],
            Utc::now(),
        )
    }

    #[tokio::test]
    async fn test_insert_and_get_order() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();

        store.insert_order(&order).await.unwrap();
        assert_eq!(store.order_count().await, 1);

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded, order);
    }

    #[tokio::test]
    async fn test_get_missing_order_is_none() {
        let store = InMemoryOrderStore::new();
        assert!(store.get_order(OrderId::new()).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_list_orders_newest_first() {
        let store = InMemoryOrderStore::new();

        let old = Order::new(
            OrderId::new(),
            vec![OrderItem::new("samoas", 1, Money::from_cents(500))],
            Utc::now() - chrono::Duration::minutes(5),
        );
        let recent = sample_order();

        store.insert_order(&old).await.unwrap();
        store.insert_order(&recent).await.unwrap();

        let listed = store.list_orders().await.unwrap();
        assert_eq!(listed.len(), 2);
        assert_eq!(listed[0].id, recent.id);
        assert_eq!(listed[1].id, old.id);
    }

    #[tokio::test]
    async fn test_set_payment_intent_overwrites() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        store.insert_order(&order).await.unwrap();

        assert!(store.set_payment_intent(order.id, "pi_0001").await.unwrap());
        assert!(store.set_payment_intent(order.id, "pi_0002").await.unwrap());

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.payment_intent_id.as_deref(), Some("pi_0002"));
    }

    #[tokio::test]
    async fn test_set_payment_intent_missing_order() {
        let store = InMemoryOrderStore::new();
        assert!(
            !store
                .set_payment_intent(OrderId::new(), "pi_0001")
                .await
                .unwrap()
        );
    }

    #[tokio::test]
    async fn test_apply_succeeded_outcome() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        store.insert_order(&order).await.unwrap();

        let observed = Utc::now();
        let result = store
            .apply_outcome(order.id, PaymentOutcome::Succeeded, observed)
            .await
            .unwrap();
        assert_eq!(result, TransitionOutcome::Applied(OrderStatus::Paid));

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Paid);
        assert_eq!(loaded.paid_at, Some(observed));
    }

    #[tokio::test]
    async fn test_apply_outcome_is_idempotent() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        store.insert_order(&order).await.unwrap();

        let first = Utc::now();
        store
            .apply_outcome(order.id, PaymentOutcome::Succeeded, first)
            .await
            .unwrap();

        let second = store
            .apply_outcome(order.id, PaymentOutcome::Succeeded, Utc::now())
            .await
            .unwrap();
        assert_eq!(second, TransitionOutcome::AlreadySettled(OrderStatus::Paid));

        // paid_at keeps the first observation
        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.paid_at, Some(first));
    }

    #[tokio::test]
    async fn test_paid_order_cannot_fail_or_cancel() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        store.insert_order(&order).await.unwrap();

        store
            .apply_outcome(order.id, PaymentOutcome::Succeeded, Utc::now())
            .await
            .unwrap();

        for outcome in [PaymentOutcome::Failed, PaymentOutcome::Canceled] {
            let result = store
                .apply_outcome(order.id, outcome, Utc::now())
                .await
                .unwrap();
            assert_eq!(result, TransitionOutcome::AlreadySettled(OrderStatus::Paid));
        }

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, OrderStatus::Paid);
    }

    #[tokio::test]
    async fn test_failed_outcome_sets_no_paid_at() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        store.insert_order(&order).await.unwrap();

        let result = store
            .apply_outcome(order.id, PaymentOutcome::Failed, Utc::now())
            .await
            .unwrap();
        assert_eq!(result, TransitionOutcome::Applied(OrderStatus::Failed));

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert!(loaded.paid_at.is_none());
    }

    #[tokio::test]
    async fn test_apply_outcome_unknown_order() {
        let store = InMemoryOrderStore::new();
        let result = store
            .apply_outcome(OrderId::new(), PaymentOutcome::Succeeded, Utc::now())
            .await
            .unwrap();
        assert_eq!(result, TransitionOutcome::NotFound);
    }

    #[tokio::test]
    async fn test_concurrent_succeeded_deliveries_single_paid_at() {
        let store = InMemoryOrderStore::new();
        let order = sample_order();
        store.insert_order(&order).await.unwrap();

        let mut handles = Vec::new();
        for _ in 0..8 {
            let store = store.clone();
            let id = order.id;
            handles.push(tokio::spawn(async move {
                store
                    .apply_outcome(id, PaymentOutcome::Succeeded, Utc::now())
                    .await
                    .unwrap()
            }));
        }

        let mut applied = 0;
        for handle in handles {
            if let TransitionOutcome::Applied(_) = handle.await.unwrap() {
                applied += 1;
            }
        }
        assert_eq!(applied, 1);

        let loaded = store.get_order(order.id).await.unwrap().unwrap();
        assert_eq!(loaded.status, common::OrderStatus::Paid);
        assert!(loaded.paid_at.is_some());
    }
}
