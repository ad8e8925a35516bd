//! In-memory catalog backed by fixtures.

use std::collections::HashMap;
use std::sync::{Arc, PoisonError, RwLock};

use rocketshoes_core::{Product, ProductId, Stock};

use super::{Catalog, CatalogError};

/// Catalog serving products and stock from memory.
///
/// Clones share the same data, so a test can keep a handle and change stock
/// while a [`crate::CartStore`] owns another.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCatalog {
    inner: Arc<RwLock<Inner>>,
}

#[derive(Debug, Default)]
struct Inner {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, i64>,
    unavailable: bool,
    stock_lookups: usize,
    product_lookups: usize,
}

impl InMemoryCatalog {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or replace a product together with its stock.
    #[must_use]
    pub fn with_product(self, product: Product, stock: i64) -> Self {
        self.insert(product, stock);
        self
    }

    /// Add or replace a product together with its stock.
    pub fn insert(&self, product: Product, stock: i64) {
        let mut inner = self.write();
        inner.stock.insert(product.id, stock);
        inner.products.insert(product.id, product);
    }

    /// Change the stock of a product. Stock may exist without metadata.
    pub fn set_stock(&self, id: ProductId, amount: i64) {
        self.write().stock.insert(id, amount);
    }

    /// Make every lookup fail with a 503 until switched back.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.write().unavailable = unavailable;
    }

    /// Number of stock lookups served so far.
    #[must_use]
    pub fn stock_lookups(&self) -> usize {
        self.read().stock_lookups
    }

    /// Number of product lookups served so far.
    #[must_use]
    pub fn product_lookups(&self) -> usize {
        self.read().product_lookups
    }

    fn lookup_stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        let mut inner = self.write();
        inner.stock_lookups += 1;
        inner.check_available()?;
        inner
            .stock
            .get(&id)
            .map(|&amount| Stock {
                id: Some(id),
                amount,
            })
            .ok_or_else(|| CatalogError::NotFound(format!("/stock/{id}")))
    }

    fn lookup_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        let mut inner = self.write();
        inner.product_lookups += 1;
        inner.check_available()?;
        inner
            .products
            .get(&id)
            .cloned()
            .ok_or_else(|| CatalogError::NotFound(format!("/products/{id}")))
    }

    fn read(&self) -> std::sync::RwLockReadGuard<'_, Inner> {
        self.inner.read().unwrap_or_else(PoisonError::into_inner)
    }

    fn write(&self) -> std::sync::RwLockWriteGuard<'_, Inner> {
        self.inner.write().unwrap_or_else(PoisonError::into_inner)
    }
}

impl Inner {
    fn check_available(&self) -> Result<(), CatalogError> {
        if self.unavailable {
            return Err(CatalogError::Api {
                status: 503,
                message: String::new(),
            });
        }
        Ok(())
    }
}

impl Catalog for InMemoryCatalog {
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.lookup_stock(id)
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.lookup_product(id)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use rocketshoes_core::Price;

    use super::*;

    fn sneaker() -> Product {
        Product {
            id: ProductId::new(1),
            title: "Tênis de Caminhada Leve Confortável".to_string(),
            price: Price::from_cents(17990),
            image: "https://example.com/1.jpg".to_string(),
        }
    }

    #[tokio::test]
    async fn test_lookups() {
        let catalog = InMemoryCatalog::new().with_product(sneaker(), 3);
        let stock = catalog.stock(ProductId::new(1)).await.unwrap();
        assert_eq!(stock.amount, 3);
        assert_eq!(catalog.product(ProductId::new(1)).await.unwrap(), sneaker());
        assert_eq!(catalog.stock_lookups(), 1);
        assert_eq!(catalog.product_lookups(), 1);
    }

    #[tokio::test]
    async fn test_unknown_product() {
        let catalog = InMemoryCatalog::new();
        assert!(matches!(
            catalog.stock(ProductId::new(9)).await,
            Err(CatalogError::NotFound(_))
        ));
        assert!(matches!(
            catalog.product(ProductId::new(9)).await,
            Err(CatalogError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let catalog = InMemoryCatalog::new().with_product(sneaker(), 3);
        let handle = catalog.clone();
        handle.set_stock(ProductId::new(1), 10);
        assert_eq!(catalog.stock(ProductId::new(1)).await.unwrap().amount, 10);
    }

    #[tokio::test]
    async fn test_unavailable() {
        let catalog = InMemoryCatalog::new().with_product(sneaker(), 3);
        catalog.set_unavailable(true);
        assert!(matches!(
            catalog.stock(ProductId::new(1)).await,
            Err(CatalogError::Api { status: 503, .. })
        ));
        catalog.set_unavailable(false);
        assert!(catalog.stock(ProductId::new(1)).await.is_ok());
    }
}
