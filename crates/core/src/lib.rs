//! Vintage Core - Shared types library.
//!
//! This crate provides common types used across all Vintage components:
//! - `storefront` - Client-side state layer (cart, wishlist, catalog, orders)
//! - `cli` - Command-line tools for seeding and driving the state layer
//!
//! # Architecture
//!
//! The core crate contains only types - no I/O, no document store access,
//! no identity provider. This keeps it lightweight and allows it to be used
//! anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices, ratings, timestamps and statuses

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
