//! KeyZone Core - Shared types library.
//!
//! This crate provides common types used across all KeyZone components:
//! - `storefront` - Server-rendered shop and admin panel over the marketplace API
//! - `cli` - Command-line tools for migrations and catalog management
//!
//! # Architecture
//!
//! The core crate contains only types, formatting and form validation - no
//! I/O, no database access, no HTTP clients. Every business rule (pricing,
//! stock, totals) belongs to the marketplace API; the rules here only decide
//! whether a form is worth submitting.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, prices, emails, tokens, and statuses
//! - [`validation`] - Field and form validators for user input

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
