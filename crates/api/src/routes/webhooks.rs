//! Payment webhook endpoint.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use order_store::OrderStore;

use crate::error::ApiError;
use crate::routes::orders::AppState;

/// POST /webhooks/payment — receive a signed payment event.
///
/// The raw body is handed to the reconciler untouched; signature
/// verification covers the exact bytes the processor sent.
#[tracing::instrument(skip_all)]
pub async fn receive<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<serde_json::Value>, ApiError> {
    let signature = headers
        .get("stripe-signature")
        .and_then(|value| value.to_str().ok())
        .unwrap_or_default();

    state.reconciler.process(&body, signature).await?;

    Ok(Json(serde_json::json!({ "received": true })))
}
