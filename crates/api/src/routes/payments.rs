//! Payment intent creation endpoint.

use std::sync::Arc;

use axum::Json;
use axum::extract::State;
use order_store::OrderStore;
use serde::{Deserialize, Serialize};

use crate::error::ApiError;
use crate::routes::orders::{AppState, parse_order_id};

#[derive(Deserialize)]
pub struct CreatePaymentIntentRequest {
    #[serde(default)]
    pub order_id: Option<String>,
}

#[derive(Serialize)]
pub struct PaymentIntentResponse {
    pub client_secret: String,
    pub payment_intent_id: String,
}

/// POST /payment-intents — open a payment intent for a pending order.
#[tracing::instrument(skip(state, req))]
pub async fn create<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Json(req): Json<CreatePaymentIntentRequest>,
) -> Result<Json<PaymentIntentResponse>, ApiError> {
    let Some(id) = req.order_id.as_deref() else {
        return Err(ApiError::BadRequest("order_id is required".to_string()));
    };
    let order_id = parse_order_id(id)?;

    let handle = state.payment_bridge.create_payment_intent(order_id).await?;

    Ok(Json(PaymentIntentResponse {
        client_secret: handle.client_secret,
        payment_intent_id: handle.payment_intent_id,
    }))
}
