//! Core types for RocketShoes.
//!
//! This module provides type-safe wrappers for the cart domain.

pub mod cart;
pub mod catalog;
pub mod id;
pub mod price;

pub use cart::{Cart, CartLine, CartSummary};
pub use catalog::{Product, Stock};
pub use id::*;
pub use price::{Price, PriceError};
