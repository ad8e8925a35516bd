//! Integration tests for the RocketShoes cart.
//!
//! Tests drive `HttpCatalog`, `FileStore` and `CartStore` end to end against
//! a [`FakeCatalog`], an in-process HTTP server that speaks the catalog API.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p rocketshoes-integration-tests
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::collections::HashMap;
use std::net::{Ipv4Addr, SocketAddr};
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use rocketshoes_cart::config::CatalogConfig;
use rocketshoes_core::{Product, ProductId, Stock};
use tokio::net::TcpListener;
use url::Url;

type SharedState = Arc<Mutex<CatalogState>>;

#[derive(Default)]
struct CatalogState {
    products: HashMap<ProductId, Product>,
    stock: HashMap<ProductId, i64>,
    failure: Option<StatusCode>,
    stock_requests: usize,
    product_requests: usize,
}

/// Catalog API served from memory on a random local port.
///
/// Serves `GET /stock/{id}` and `GET /products/{id}`. Unknown ids get a 404
/// with an empty JSON object.
pub struct FakeCatalog {
    state: SharedState,
    base_url: Url,
}

impl FakeCatalog {
    /// Bind to `127.0.0.1:0` and serve in a background task.
    ///
    /// # Errors
    ///
    /// Returns error if the listener cannot be bound.
    pub async fn start() -> std::io::Result<Self> {
        let state = SharedState::default();

        let app = Router::new()
            .route("/stock/{id}", get(stock))
            .route("/products/{id}", get(product))
            .with_state(Arc::clone(&state));

        let listener = TcpListener::bind((Ipv4Addr::LOCALHOST, 0)).await?;
        let addr: SocketAddr = listener.local_addr()?;
        let base_url = Url::parse(&format!("http://{addr}"))
            .map_err(|e| std::io::Error::new(std::io::ErrorKind::InvalidInput, e))?;

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                log_serve_error(&e);
            }
        });

        Ok(Self { state, base_url })
    }

    /// Root URL of the fake API.
    #[must_use]
    pub const fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Catalog client settings pointing at this server.
    #[must_use]
    pub fn config(&self) -> CatalogConfig {
        CatalogConfig {
            base_url: self.base_url.clone(),
            product_cache_ttl: Duration::from_secs(300),
        }
    }

    /// Add or replace a product and its stock.
    pub fn insert(&self, product: Product, stock: i64) {
        let mut state = lock(&self.state);
        state.stock.insert(product.id, stock);
        state.products.insert(product.id, product);
    }

    /// Change the stock of a product.
    pub fn set_stock(&self, id: ProductId, amount: i64) {
        lock(&self.state).stock.insert(id, amount);
    }

    /// Answer every request with `status` until cleared with `None`.
    pub fn set_failure(&self, status: Option<StatusCode>) {
        lock(&self.state).failure = status;
    }

    /// Number of `/stock/{id}` requests served.
    #[must_use]
    pub fn stock_requests(&self) -> usize {
        lock(&self.state).stock_requests
    }

    /// Number of `/products/{id}` requests served.
    #[must_use]
    pub fn product_requests(&self) -> usize {
        lock(&self.state).product_requests
    }
}

fn lock(state: &SharedState) -> MutexGuard<'_, CatalogState> {
    state.lock().unwrap_or_else(PoisonError::into_inner)
}

#[allow(clippy::print_stderr)]
fn log_serve_error(e: &std::io::Error) {
    eprintln!("fake catalog stopped: {e}");
}

fn not_found() -> Response {
    (StatusCode::NOT_FOUND, Json(serde_json::json!({}))).into_response()
}

fn failure(status: StatusCode) -> Response {
    (status, "catalog unavailable").into_response()
}

async fn stock(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let id = ProductId::new(id);
    let mut state = lock(&state);
    state.stock_requests += 1;

    if let Some(status) = state.failure {
        return failure(status);
    }

    state.stock.get(&id).map_or_else(not_found, |&amount| {
        Json(Stock {
            id: Some(id),
            amount,
        })
        .into_response()
    })
}

async fn product(State(state): State<SharedState>, Path(id): Path<i64>) -> Response {
    let id = ProductId::new(id);
    let mut state = lock(&state);
    state.product_requests += 1;

    if let Some(status) = state.failure {
        return failure(status);
    }

    state
        .products
        .get(&id)
        .map_or_else(not_found, |product| Json(product.clone()).into_response())
}
