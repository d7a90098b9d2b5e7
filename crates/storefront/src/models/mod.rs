//! Domain models for storefront.
//!
//! Entity types (products, carts, orders, users) belong to the marketplace
//! and live in [`crate::marketplace::types`]. This module only holds what the
//! storefront keeps in its own session.

pub mod session;

pub use session::{CurrentUser, Flash, FlashKind, keys as session_keys};
