//! RocketShoes Core - Shared cart types.
//!
//! This crate provides the types shared by the cart store, the CLI and the
//! integration tests:
//! - `cart` - The cart store, catalog client and key-value persistence
//! - `cli` - Terminal driver for the cart store
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no storage access,
//! no HTTP clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Product IDs, prices, catalog records and cart lines

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
