//! Catalog records served by the product and stock endpoints.

use serde::{Deserialize, Serialize};

use super::{Price, ProductId};

/// A product as described by the catalog (`GET /products/{id}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Product {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
}

/// Available stock for a product (`GET /stock/{id}`).
///
/// The catalog is the source of truth for how many units may sit in a cart.
/// Some catalogs echo the product id, some don't.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Stock {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<ProductId>,
    pub amount: i64,
}

impl Stock {
    /// Whether `quantity` units fit within this stock.
    #[must_use]
    pub fn allows(&self, quantity: u32) -> bool {
        i64::from(quantity) <= self.amount
    }
}
