use common::{Money, ProductId};
use serde::Deserialize;

/// One line of a client-submitted cart.
///
/// The unit price is what the client believes the product costs; the
/// order service re-prices it against the catalog and rejects mismatches
/// before any order is created.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CartLine {
    /// Catalog identifier of the product.
    pub product_id: ProductId,

    /// Number of boxes requested.
    pub quantity: u32,

    /// Client-side unit price in cents.
    pub unit_price_cents: Money,
}

impl CartLine {
    /// Creates a new cart line.
    pub fn new(product_id: impl Into<ProductId>, quantity: u32, unit_price: Money) -> Self {
        Self {
            product_id: product_id.into(),
            quantity,
            unit_price_cents: unit_price,
        }
    }
}
