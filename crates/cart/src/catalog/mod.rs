//! Product catalog and stock lookups.
//!
//! # Endpoints
//!
//! - `GET /stock/{id}` - `{ "id": 1, "amount": 3 }`
//! - `GET /products/{id}` - `{ "id": 1, "title": "...", "price": 179.9, "image": "..." }`
//!
//! [`HttpCatalog`] talks to a real API; [`InMemoryCatalog`] serves fixtures.

mod http;
mod memory;

use std::future::Future;

use rocketshoes_core::{Product, ProductId, Stock};
use thiserror::Error;

pub use http::HttpCatalog;
pub use memory::InMemoryCatalog;

/// Errors that can occur when querying the catalog.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// HTTP request failed.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The catalog has no record for this product.
    #[error("Not found: {0}")]
    NotFound(String),

    /// API returned an error response.
    #[error("API error: {status} - {message}")]
    Api { status: u16, message: String },

    /// Failed to parse response.
    #[error("Parse error: {0}")]
    Parse(#[from] serde_json::Error),

    /// The configured base URL cannot be joined with a resource path.
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),
}

/// Source of product metadata and available stock.
///
/// Stock must be read fresh on every call; it is the only guard against
/// overselling.
pub trait Catalog: Send + Sync {
    /// Available stock for `id`.
    fn stock(&self, id: ProductId) -> impl Future<Output = Result<Stock, CatalogError>> + Send;

    /// Product metadata for `id`.
    fn product(&self, id: ProductId)
    -> impl Future<Output = Result<Product, CatalogError>> + Send;
}
