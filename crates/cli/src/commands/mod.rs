//! CLI command implementations.

mod cart;

pub use cart::{add, open_store, remove, set, show};

use thiserror::Error;

/// Errors that can end a CLI command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] rocketshoes_cart::ConfigError),

    /// The catalog client could not be created.
    #[error("Catalog error: {0}")]
    Catalog(#[from] rocketshoes_cart::CatalogError),

    /// The cart rejected the change.
    #[error("{0}")]
    Cart(#[from] rocketshoes_cart::CartError),

    /// The cart could not be rendered as JSON.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}
