//! Cart errors and the notices shown for them.
//!
//! Every rejected mutation is both returned as a [`CartError`] and reported to
//! the store's [`crate::Notifier`] as a [`Notice`]. The notice text is meant
//! for shoppers and deliberately vague; the error carries the details.

use rocketshoes_core::ProductId;
use thiserror::Error;

use crate::catalog::CatalogError;
use crate::notify::Notice;
use crate::storage::StorageError;

/// Notice for a catalog failure while adding.
pub const MSG_PRODUCT_NOT_FOUND: &str = "Product not found";
/// Notice when an add would go past the stock.
pub const MSG_STOCK_LIMIT: &str = "Product reached stock limit";
/// Notice when the requested quantity is not available.
pub const MSG_OUT_OF_STOCK: &str = "Requested quantity out of stock";
/// Generic add failure.
pub const MSG_ADD_FAILED: &str = "Error adding product";
/// Generic removal failure.
pub const MSG_REMOVE_FAILED: &str = "Error removing product";
/// Generic quantity change failure.
pub const MSG_UPDATE_FAILED: &str = "Error changing product quantity";

/// The cart mutation that failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CartOperation {
    Add,
    Remove,
    UpdateAmount,
}

impl CartOperation {
    /// Generic notice for this operation.
    #[must_use]
    pub const fn failure_message(self) -> &'static str {
        match self {
            Self::Add => MSG_ADD_FAILED,
            Self::Remove => MSG_REMOVE_FAILED,
            Self::UpdateAmount => MSG_UPDATE_FAILED,
        }
    }
}

impl std::fmt::Display for CartOperation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Add => write!(f, "add_product"),
            Self::Remove => write!(f, "remove_product"),
            Self::UpdateAmount => write!(f, "update_product_amount"),
        }
    }
}

/// Why a cart mutation was rejected. The cart and its slot are unchanged.
#[derive(Debug, Error)]
pub enum CartError {
    /// Stock or product lookup failed while adding.
    #[error("Product not found: {product_id}")]
    ProductNotFound {
        product_id: ProductId,
        #[source]
        source: CatalogError,
    },

    /// The product has no line in the cart.
    #[error("Product {product_id} is not in the cart")]
    LineNotFound {
        product_id: ProductId,
        operation: CartOperation,
    },

    /// Adding one more unit would exceed the stock.
    #[error("Product {product_id} reached its stock limit of {available}")]
    StockExceeded {
        product_id: ProductId,
        requested: u32,
        available: i64,
    },

    /// The stock does not cover the requested quantity.
    #[error(
        "Requested quantity {requested} of product {product_id} is out of stock ({available} available)"
    )]
    OutOfStock {
        operation: CartOperation,
        product_id: ProductId,
        requested: i64,
        available: i64,
    },

    /// A quantity of zero or less was requested.
    #[error("Amount for product {product_id} must be positive, got {amount}")]
    NonPositiveAmount { product_id: ProductId, amount: i64 },

    /// Stock lookup failed while changing a quantity.
    #[error("Catalog lookup for product {product_id} failed: {source}")]
    Upstream {
        product_id: ProductId,
        operation: CartOperation,
        #[source]
        source: CatalogError,
    },

    /// The new cart could not be written to its slot.
    #[error("Failed to persist cart: {source}")]
    Storage {
        operation: CartOperation,
        #[source]
        source: StorageError,
    },
}

impl CartError {
    /// The mutation that was rejected.
    #[must_use]
    pub const fn operation(&self) -> CartOperation {
        match self {
            Self::ProductNotFound { .. } | Self::StockExceeded { .. } => CartOperation::Add,
            Self::NonPositiveAmount { .. } => CartOperation::UpdateAmount,
            Self::LineNotFound { operation, .. }
            | Self::OutOfStock { operation, .. }
            | Self::Upstream { operation, .. }
            | Self::Storage { operation, .. } => *operation,
        }
    }

    /// The shopper-facing notice for this error.
    #[must_use]
    pub const fn notice(&self) -> Notice {
        let message = match self {
            Self::ProductNotFound { .. } => MSG_PRODUCT_NOT_FOUND,
            Self::StockExceeded { .. } => MSG_STOCK_LIMIT,
            Self::OutOfStock { .. } | Self::NonPositiveAmount { .. } => MSG_OUT_OF_STOCK,
            Self::LineNotFound { operation, .. }
            | Self::Upstream { operation, .. }
            | Self::Storage { operation, .. } => operation.failure_message(),
        };
        Notice {
            operation: self.operation(),
            message,
        }
    }
}

/// Result type alias for `CartError`.
pub type Result<T> = std::result::Result<T, CartError>;
