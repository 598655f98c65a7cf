//! Product catalog endpoints.
//!
//! The barcode scanner submits plain UPC strings; the UPC lookup is how a
//! scanned code becomes a cart line.

use std::sync::Arc;

use axum::Json;
use axum::extract::{Path, State};
use catalog::Product;
use order_store::OrderStore;

use crate::error::ApiError;
use crate::routes::orders::AppState;

/// GET /products — list the full catalog.
#[tracing::instrument(skip(state))]
pub async fn list<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
) -> Json<Vec<Product>> {
    Json(state.catalog.products().to_vec())
}

/// GET /products/upc/:upc — look up a product by barcode value.
#[tracing::instrument(skip(state))]
pub async fn get_by_upc<S: OrderStore + Clone + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(upc): Path<String>,
) -> Result<Json<Product>, ApiError> {
    state
        .catalog
        .lookup_by_upc(&upc)
        .cloned()
        .map(Json)
        .ok_or_else(|| ApiError::NotFound(format!("No product with UPC {upc}")))
}
