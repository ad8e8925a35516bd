//! HTTP catalog client.
//!
//! Uses `reqwest` for HTTP. Caches product metadata using `moka`; stock is
//! always fetched fresh.

use std::sync::Arc;

use moka::future::Cache;
use rocketshoes_core::{Product, ProductId, Stock};
use serde::de::DeserializeOwned;
use tracing::{debug, instrument};
use url::Url;

use super::{Catalog, CatalogError};
use crate::config::CatalogConfig;

/// How much of an error body is kept in [`CatalogError::Api`].
const ERROR_BODY_LIMIT: usize = 200;

/// Client for the catalog HTTP API.
///
/// Cheap to clone; clones share the connection pool and product cache.
#[derive(Clone)]
pub struct HttpCatalog {
    inner: Arc<HttpCatalogInner>,
}

struct HttpCatalogInner {
    client: reqwest::Client,
    base_url: Url,
    products: Cache<ProductId, Product>,
}

impl HttpCatalog {
    /// Create a new catalog client.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client fails to build.
    pub fn new(config: &CatalogConfig) -> Result<Self, CatalogError> {
        let client = reqwest::Client::builder()
            .user_agent(concat!("rocketshoes-cart/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self::with_client(client, config))
    }

    /// Create a catalog client around an existing `reqwest::Client`.
    #[must_use]
    pub fn with_client(client: reqwest::Client, config: &CatalogConfig) -> Self {
        let products = Cache::builder()
            .max_capacity(1000)
            .time_to_live(config.product_cache_ttl)
            .build();

        // Url::join drops the last path segment unless it ends with a slash
        let mut base_url = config.base_url.clone();
        if !base_url.path().ends_with('/') {
            let path = format!("{}/", base_url.path());
            base_url.set_path(&path);
        }

        Self {
            inner: Arc::new(HttpCatalogInner {
                client,
                base_url,
                products,
            }),
        }
    }

    /// The base URL resource paths are resolved against.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.inner.base_url
    }

    /// Fetch the current stock for a product.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the product is unknown, or the
    /// body is not a stock record.
    #[instrument(skip(self))]
    pub async fn fetch_stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        let stock: Stock = self.get_json(&format!("stock/{id}")).await?;
        debug!(amount = stock.amount, "fetched stock");
        Ok(stock)
    }

    /// Fetch product metadata, served from cache when possible.
    ///
    /// # Errors
    ///
    /// Returns error if the request fails, the product is unknown, or the
    /// body is not a product record.
    #[instrument(skip(self))]
    pub async fn fetch_product(&self, id: ProductId) -> Result<Product, CatalogError> {
        if let Some(product) = self.inner.products.get(&id).await {
            debug!("product cache hit");
            return Ok(product);
        }

        let product: Product = self.get_json(&format!("products/{id}")).await?;
        self.inner.products.insert(id, product.clone()).await;
        debug!(title = %product.title, "fetched product");
        Ok(product)
    }

    /// GET a resource and decode its JSON body.
    async fn get_json<T: DeserializeOwned>(&self, path: &str) -> Result<T, CatalogError> {
        let url = self.inner.base_url.join(path)?;

        let response = self
            .inner
            .client
            .get(url.clone())
            .header("Accept", "application/json")
            .send()
            .await?;
        let status = response.status();

        if status == reqwest::StatusCode::NOT_FOUND {
            return Err(CatalogError::NotFound(url.path().to_string()));
        }

        // Get response body as text first for better error diagnostics
        let body = response.text().await?;

        if !status.is_success() {
            tracing::warn!(
                status = %status,
                url = %url,
                "Catalog API returned non-success status"
            );
            return Err(CatalogError::Api {
                status: status.as_u16(),
                message: body.chars().take(ERROR_BODY_LIMIT).collect(),
            });
        }

        serde_json::from_str(&body).map_err(|e| {
            tracing::warn!(
                error = %e,
                body = %body.chars().take(ERROR_BODY_LIMIT).collect::<String>(),
                "Failed to parse catalog response"
            );
            CatalogError::Parse(e)
        })
    }
}

impl Catalog for HttpCatalog {
    async fn stock(&self, id: ProductId) -> Result<Stock, CatalogError> {
        self.fetch_stock(id).await
    }

    async fn product(&self, id: ProductId) -> Result<Product, CatalogError> {
        self.fetch_product(id).await
    }
}
