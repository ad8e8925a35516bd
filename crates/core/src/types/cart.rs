//! Cart lines and the cart snapshot persisted to the key-value slot.
//!
//! The persisted form is a JSON array of
//! `{ "id", "title", "price", "image", "amount" }` objects.

use serde::{Deserialize, Serialize};

use super::{Price, Product, ProductId};

/// A product in the cart with its quantity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CartLine {
    pub id: ProductId,
    pub title: String,
    pub price: Price,
    pub image: String,
    /// Always at least 1; a line with nothing in it is removed instead.
    pub amount: u32,
}

impl CartLine {
    /// A new line holding one unit of `product`.
    #[must_use]
    pub fn first_unit(product: Product) -> Self {
        Self {
            id: product.id,
            title: product.title,
            price: product.price,
            image: product.image,
            amount: 1,
        }
    }

    /// `price * amount`.
    #[must_use]
    pub fn subtotal(&self) -> Price {
        self.price.times(self.amount)
    }
}

/// Ordered cart contents. Order only matters for display.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Cart {
    lines: Vec<CartLine>,
}

impl Cart {
    /// An empty cart.
    #[must_use]
    pub const fn new() -> Self {
        Self { lines: Vec::new() }
    }

    /// Lines in insertion order.
    #[must_use]
    pub fn lines(&self) -> &[CartLine] {
        &self.lines
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lines.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Find the line for `id`.
    #[must_use]
    pub fn line(&self, id: ProductId) -> Option<&CartLine> {
        self.lines.iter().find(|line| line.id == id)
    }

    #[must_use]
    pub fn contains(&self, id: ProductId) -> bool {
        self.line(id).is_some()
    }

    /// A copy of this cart with `line` appended.
    #[must_use]
    pub fn with_line(&self, line: CartLine) -> Self {
        let mut lines = self.lines.clone();
        lines.push(line);
        Self { lines }
    }

    /// A copy of this cart with the amount of `id` replaced.
    ///
    /// Lines for other products are untouched; an unknown `id` yields an
    /// identical cart.
    #[must_use]
    pub fn with_amount(&self, id: ProductId, amount: u32) -> Self {
        let lines = self
            .lines
            .iter()
            .map(|line| {
                if line.id == id {
                    CartLine {
                        amount,
                        ..line.clone()
                    }
                } else {
                    line.clone()
                }
            })
            .collect();
        Self { lines }
    }

    /// A copy of this cart without the line for `id`.
    #[must_use]
    pub fn without(&self, id: ProductId) -> Self {
        let lines = self
            .lines
            .iter()
            .filter(|line| line.id != id)
            .cloned()
            .collect();
        Self { lines }
    }

    /// Totals for display.
    #[must_use]
    pub fn summary(&self) -> CartSummary {
        CartSummary {
            item_count: self.lines.len(),
            total_quantity: self.lines.iter().map(|line| u64::from(line.amount)).sum(),
            subtotal: self.lines.iter().map(CartLine::subtotal).sum(),
        }
    }
}

impl From<Vec<CartLine>> for Cart {
    fn from(lines: Vec<CartLine>) -> Self {
        Self { lines }
    }
}

impl<'a> IntoIterator for &'a Cart {
    type Item = &'a CartLine;
    type IntoIter = std::slice::Iter<'a, CartLine>;

    fn into_iter(self) -> Self::IntoIter {
        self.lines.iter()
    }
}

/// Cart totals for display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct CartSummary {
    /// Number of distinct products.
    pub item_count: usize,
    /// Sum of all line amounts.
    pub total_quantity: u64,
    /// Sum of `price * amount` over all lines.
    pub subtotal: Price,
}
