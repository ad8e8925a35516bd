//! The cart store.
//!
//! [`CartStore`] owns the shopper's cart for one session. It is opened from a
//! persisted slot and writes the whole cart back to that slot on every
//! accepted mutation, before the in-memory cart is replaced. A rejected
//! mutation changes nothing, sends one [`Notice`](crate::Notice) to the
//! notifier and returns the matching [`CartError`].

use std::collections::HashSet;

use rocketshoes_core::{Cart, CartLine, CartSummary, ProductId};
use tracing::{info, instrument, warn};

use crate::catalog::Catalog;
use crate::config::{AddStockGuard, DEFAULT_STORAGE_KEY};
use crate::error::{CartError, CartOperation, Result};
use crate::notify::Notifier;
use crate::storage::{KeyValueStore, StorageError};

/// Settings for a [`CartStore`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreOptions {
    /// Key of the slot holding the cart
    pub storage_key: String,
    /// Stock check applied when adding a product
    pub add_stock_guard: AddStockGuard,
}

impl Default for StoreOptions {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_string(),
            add_stock_guard: AddStockGuard::default(),
        }
    }
}

/// Request to set a product's quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpdateProductAmount {
    pub product_id: ProductId,
    /// Requested quantity; zero and below are rejected.
    pub amount: i64,
}

/// Shopping cart with write-through persistence and stock checks.
///
/// Mutations take `&mut self`, so one store never runs two of them at once.
pub struct CartStore<C, S, N> {
    catalog: C,
    storage: S,
    notifier: N,
    options: StoreOptions,
    cart: Cart,
}

impl<C, S, N> CartStore<C, S, N>
where
    C: Catalog,
    S: KeyValueStore,
    N: Notifier,
{
    /// Open a store, restoring the cart from its slot.
    ///
    /// A missing, unreadable or malformed slot gives an empty cart.
    pub fn open(catalog: C, storage: S, notifier: N, options: StoreOptions) -> Self {
        let cart = load_cart(&storage, &options.storage_key);
        info!(
            key = %options.storage_key,
            lines = cart.len(),
            "cart restored"
        );

        Self {
            catalog,
            storage,
            notifier,
            options,
            cart,
        }
    }

    /// Current cart.
    #[must_use]
    pub const fn cart(&self) -> &Cart {
        &self.cart
    }

    /// Line for `product_id`, if it is in the cart.
    #[must_use]
    pub fn line(&self, product_id: ProductId) -> Option<&CartLine> {
        self.cart.line(product_id)
    }

    /// Totals of the current cart.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        self.cart.summary()
    }

    /// Key of the slot the cart is persisted to.
    #[must_use]
    pub fn storage_key(&self) -> &str {
        &self.options.storage_key
    }

    /// Add one unit of a product.
    ///
    /// Checks the catalog's stock first. A product already in the cart gets
    /// its amount raised by one; a new product is looked up and appended
    /// with an amount of one.
    ///
    /// # Errors
    ///
    /// - [`CartError::ProductNotFound`] if the stock or product lookup fails
    /// - [`CartError::OutOfStock`] if the stock fails the [`AddStockGuard`]
    /// - [`CartError::StockExceeded`] if one more unit would pass the stock
    /// - [`CartError::Storage`] if the cart could not be persisted
    #[instrument(skip(self))]
    pub async fn add_product(&mut self, product_id: ProductId) -> Result<&Cart> {
        let current = self.cart.line(product_id).map(|line| line.amount);

        let stock = match self.catalog.stock(product_id).await {
            Ok(stock) => stock,
            Err(source) => {
                return Err(self.reject(CartError::ProductNotFound { product_id, source }));
            }
        };

        if !self.options.add_stock_guard.admits(stock.amount) {
            return Err(self.reject(CartError::OutOfStock {
                operation: CartOperation::Add,
                product_id,
                requested: i64::from(current.unwrap_or(0)) + 1,
                available: stock.amount,
            }));
        }

        let next = if let Some(amount) = current {
            let requested = amount.saturating_add(1);
            if !stock.allows(requested) {
                return Err(self.reject(CartError::StockExceeded {
                    product_id,
                    requested,
                    available: stock.amount,
                }));
            }
            self.cart.with_amount(product_id, requested)
        } else {
            let product = match self.catalog.product(product_id).await {
                Ok(product) => product,
                Err(source) => {
                    return Err(self.reject(CartError::ProductNotFound { product_id, source }));
                }
            };
            self.cart.with_line(CartLine {
                id: product_id,
                ..CartLine::first_unit(product)
            })
        };

        self.commit(next, CartOperation::Add)?;

        let amount = self.cart.line(product_id).map_or(0, |line| line.amount);
        info!(%product_id, amount, "product added to cart");
        Ok(&self.cart)
    }

    /// Remove a product's line entirely.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`] if the product is not in the cart
    /// - [`CartError::Storage`] if the cart could not be persisted
    #[instrument(skip(self))]
    pub fn remove_product(&mut self, product_id: ProductId) -> Result<&Cart> {
        if !self.cart.contains(product_id) {
            return Err(self.reject(CartError::LineNotFound {
                product_id,
                operation: CartOperation::Remove,
            }));
        }

        let next = self.cart.without(product_id);
        self.commit(next, CartOperation::Remove)?;

        info!(%product_id, "product removed from cart");
        Ok(&self.cart)
    }

    /// Set a product's amount, checked against the catalog's stock.
    ///
    /// # Errors
    ///
    /// - [`CartError::LineNotFound`] if the product is not in the cart
    /// - [`CartError::Upstream`] if the stock lookup fails
    /// - [`CartError::NonPositiveAmount`] if `amount` is zero or below
    /// - [`CartError::OutOfStock`] if `amount` is above the stock
    /// - [`CartError::Storage`] if the cart could not be persisted
    #[instrument(skip(self))]
    pub async fn update_product_amount(
        &mut self,
        UpdateProductAmount { product_id, amount }: UpdateProductAmount,
    ) -> Result<&Cart> {
        if !self.cart.contains(product_id) {
            return Err(self.reject(CartError::LineNotFound {
                product_id,
                operation: CartOperation::UpdateAmount,
            }));
        }

        let stock = match self.catalog.stock(product_id).await {
            Ok(stock) => stock,
            Err(source) => {
                return Err(self.reject(CartError::Upstream {
                    product_id,
                    operation: CartOperation::UpdateAmount,
                    source,
                }));
            }
        };

        let Some(new_amount) = u32::try_from(amount).ok().filter(|&a| a > 0) else {
            return Err(self.reject(if amount <= 0 {
                CartError::NonPositiveAmount { product_id, amount }
            } else {
                CartError::OutOfStock {
                    operation: CartOperation::UpdateAmount,
                    product_id,
                    requested: amount,
                    available: stock.amount,
                }
            }));
        };

        if !stock.allows(new_amount) {
            return Err(self.reject(CartError::OutOfStock {
                operation: CartOperation::UpdateAmount,
                product_id,
                requested: amount,
                available: stock.amount,
            }));
        }

        let next = self.cart.with_amount(product_id, new_amount);
        self.commit(next, CartOperation::UpdateAmount)?;

        info!(%product_id, amount = new_amount, "product amount updated");
        Ok(&self.cart)
    }

    /// Persist `next`, then make it the current cart.
    fn commit(&mut self, next: Cart, operation: CartOperation) -> Result<()> {
        let written = serde_json::to_string(&next)
            .map_err(StorageError::from)
            .and_then(|json| self.storage.set_item(&self.options.storage_key, &json));

        if let Err(source) = written {
            return Err(self.reject(CartError::Storage { operation, source }));
        }

        self.cart = next;
        Ok(())
    }

    /// Report a rejected mutation and hand the error back.
    fn reject(&self, error: CartError) -> CartError {
        warn!(operation = %error.operation(), error = %error, "cart mutation rejected");
        self.notifier.notify(&error.notice());
        error
    }
}

/// Read the cart from its slot, falling back to an empty cart.
fn load_cart<S: KeyValueStore>(storage: &S, key: &str) -> Cart {
    let raw = match storage.get_item(key) {
        Ok(Some(raw)) => raw,
        Ok(None) => return Cart::new(),
        Err(e) => {
            warn!(key, error = %e, "could not read persisted cart, starting empty");
            return Cart::new();
        }
    };

    match serde_json::from_str::<Cart>(&raw) {
        Ok(cart) => sanitize(cart),
        Err(e) => {
            warn!(key, error = %e, "persisted cart is malformed, starting empty");
            Cart::new()
        }
    }
}

/// Drop lines that break the cart's invariants: empty lines and repeated ids.
fn sanitize(cart: Cart) -> Cart {
    let mut seen = HashSet::new();
    let lines: Vec<CartLine> = cart
        .lines()
        .iter()
        .filter(|line| line.amount > 0 && seen.insert(line.id))
        .cloned()
        .collect();

    if lines.len() != cart.len() {
        warn!(
            dropped = cart.len() - lines.len(),
            "dropped invalid lines from persisted cart"
        );
        return Cart::from(lines);
    }
    cart
}
