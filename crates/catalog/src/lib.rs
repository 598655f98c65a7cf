//! Static cookie product catalog.
//!
//! The catalog is a fixed in-memory table loaded at process start and never
//! mutated. Lookups are total: a missing product is `None`, not an error.
//! The barcode scanner collaborator submits plain UPC strings which resolve
//! through [`Catalog::lookup_by_upc`].

use common::{Money, ProductId};
use serde::{Deserialize, Serialize};

/// A cookie product as sold at the booth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    /// Catalog identifier (slug).
    pub id: ProductId,

    /// Display name.
    pub name: String,

    /// Price per box in cents.
    pub unit_price: Money,

    /// Barcode value printed on the box.
    pub upc: String,

    /// Short marketing description.
    pub description: String,
}

/// Fixed lookup table of cookie products.
#[derive(Debug, Clone)]
pub struct Catalog {
    products: Vec<Product>,
}

impl Catalog {
    /// Creates a catalog from an explicit product table.
    pub fn new(products: Vec<Product>) -> Self {
        Self { products }
    }

    /// Creates the catalog with the current cookie season's products.
    pub fn with_season_products() -> Self {
        Self::new(season_products())
    }

    /// Looks up a product by its barcode value.
    pub fn lookup_by_upc(&self, upc: &str) -> Option<&Product> {
        self.products.iter().find(|p| p.upc == upc)
    }

    /// Looks up a product by its catalog identifier.
    pub fn lookup_by_id(&self, id: &ProductId) -> Option<&Product> {
        self.products.iter().find(|p| &p.id == id)
    }

    /// Returns all products in catalog order.
    pub fn products(&self) -> &[Product] {
        &self.products
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::with_season_products()
    }
}

fn product(id: &str, name: &str, cents: i64, upc: &str, description: &str) -> Product {
    Product {
        id: ProductId::new(id),
        name: name.to_string(),
        unit_price: Money::from_cents(cents),
        upc: upc.to_string(),
        description: description.to_string(),
    }
}

/// The eight cookie varieties sold this season. Every box is $5.00.
fn season_products() -> Vec<Product> {
    vec![
        product(
            "thin-mints",
            "Thin Mints",
            500,
            "123456789012",
            "Crisp chocolate wafers dipped in a mint chocolaty coating",
        ),
        product(
            "samoas",
            "Samoas (Caramel deLites)",
            500,
            "123456789013",
            "Crispy cookies layered with caramel and covered with chocolate",
        ),
        product(
            "tagalongs",
            "Tagalongs (Peanut Butter Patties)",
            500,
            "123456789014",
            "Crispy cookies layered with peanut butter and covered with chocolate",
        ),
        product(
            "do-si-dos",
            "Do-si-dos (Peanut Butter Sandwich)",
            500,
            "123456789015",
            "Crunchy oatmeal sandwich cookies with peanut butter filling",
        ),
        product(
            "trefoils",
            "Trefoils (Shortbread)",
            500,
            "123456789016",
            "Classic shortbread cookies baked to a crispy perfection",
        ),
        product(
            "lemon-ups",
            "Lemon-Ups",
            500,
            "123456789017",
            "Crispy lemon cookies with inspiring messages",
        ),
        product(
            "girl-scout-smores",
            "Girl Scout S'mores",
            500,
            "123456789018",
            "Graham sandwich cookies with chocolate and marshmallow filling",
        ),
        product(
            "toffee-tastic",
            "Toffee-tastic",
            500,
            "123456789019",
            "Rich, buttery cookies with toffee bits (gluten-free)",
        ),
    ]
}
