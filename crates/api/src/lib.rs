//! HTTP API server for the cookie booth service.
//!
//! Exposes order creation and lookup, payment-intent creation, the
//! payment webhook endpoint, and the product catalog, with structured
//! logging (tracing) and Prometheus metrics.

pub mod config;
pub mod error;
pub mod routes;

use std::sync::Arc;

use axum::Router;
use axum::routing::{get, post};
use catalog::Catalog;
use metrics_exporter_prometheus::PrometheusHandle;
use order_store::OrderStore;
use payments::{SignatureVerifier, SimulatedProcessor};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use routes::orders::AppState;

/// Creates the Axum application router with all routes and shared state.
pub fn create_app<S: OrderStore + Clone + 'static>(
    state: Arc<AppState<S>>,
    metrics_handle: PrometheusHandle,
) -> Router {
    let metrics_router = Router::new()
        .route("/metrics", get(routes::metrics::get))
        .with_state(metrics_handle);

    Router::new()
        .route("/health", get(routes::health::check))
        .route("/products", get(routes::products::list::<S>))
        .route("/products/upc/{upc}", get(routes::products::get_by_upc::<S>))
        .route("/orders", post(routes::orders::create::<S>))
        .route("/orders", get(routes::orders::list::<S>))
        .route("/orders/{id}", get(routes::orders::get::<S>))
        .route("/payment-intents", post(routes::payments::create::<S>))
        .route("/webhooks/payment", post(routes::webhooks::receive::<S>))
        .with_state(state)
        .merge(metrics_router)
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
}

/// Creates the default application state over the given store.
///
/// The store handle is cloned into each service; it is the only shared
/// resource. Also returns the simulated processor so tests can steer it.
pub fn create_default_state<S: OrderStore + Clone + 'static>(
    store: S,
    webhook_secret: &str,
) -> (Arc<AppState<S>>, SimulatedProcessor) {
    use domain::OrderService;
    use payments::{PaymentIntentBridge, WebhookReconciler};

    let catalog = Catalog::with_season_products();
    let processor = SimulatedProcessor::new();

    let order_service = OrderService::new(store.clone(), catalog.clone());
    let payment_bridge = PaymentIntentBridge::new(store.clone(), Arc::new(processor.clone()));
    let reconciler = WebhookReconciler::new(store, SignatureVerifier::new(webhook_secret));

    let state = Arc::new(AppState {
        order_service,
        payment_bridge,
        reconciler,
        catalog,
    });

    (state, processor)
}
