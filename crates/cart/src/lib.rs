//! RocketShoes cart library.
//!
//! A write-through shopping cart: every accepted mutation is persisted to a
//! key-value slot before the in-memory cart changes, and quantities are
//! checked against the catalog's stock on every add or update.
//!
//! # Architecture
//!
//! - [`store::CartStore`] owns the cart and talks to three collaborators:
//!   - [`catalog::Catalog`] - product metadata and stock (`HttpCatalog` via `reqwest`)
//!   - [`storage::KeyValueStore`] - the persistent slot (`FileStore` on disk)
//!   - [`notify::Notifier`] - user-facing notices for rejected mutations
//! - [`config::CartConfig`] loads everything from the environment
//!
//! # Example
//!
//! ```rust,ignore
//! use rocketshoes_cart::{CartConfig, CartStore, FileStore, HttpCatalog, TracingNotifier};
//!
//! let config = CartConfig::from_env()?;
//! let catalog = HttpCatalog::new(&config.catalog)?;
//! let storage = FileStore::new(&config.storage.dir);
//!
//! let mut store = CartStore::open(catalog, storage, TracingNotifier, config.store_options());
//! store.add_product(ProductId::new(1)).await?;
//! ```

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod catalog;
pub mod config;
pub mod error;
pub mod notify;
pub mod storage;
pub mod store;

pub use catalog::{Catalog, CatalogError, HttpCatalog, InMemoryCatalog};
pub use config::{AddStockGuard, CartConfig, ConfigError};
pub use error::{CartError, CartOperation};
pub use notify::{Notice, Notifier, RecordingNotifier, TracingNotifier};
pub use storage::{FileStore, KeyValueStore, MemoryStore, StorageError};
pub use store::{CartStore, StoreOptions, UpdateProductAmount};
