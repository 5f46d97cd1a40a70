//! SafeHub Core - Shared domain types.
//!
//! The core crate contains only types - no I/O, no database access,
//! no HTTP. The storefront crate builds on top of it.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, prices and emails

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;

pub use types::*;
