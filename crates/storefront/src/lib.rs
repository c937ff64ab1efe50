//! Vintage storefront client state layer.
//!
//! Keeps a shopper's cart, wishlist, catalog view and session consistent with
//! a remote document store, an identity provider and a durable local slot.
//! Each component pairs a pure `*State` container with an action layer that
//! talks to those collaborators.

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod catalog;
pub mod config;
pub mod error;
pub mod identity;
pub mod models;
pub mod orders;
pub mod remote;
pub mod session;
pub mod slot;
pub mod state;
pub mod wishlist;

pub use error::{ErrorKind, Result, StoreError};
pub use state::{Collaborators, Storefront};
