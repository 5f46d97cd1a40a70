//! Business logic services for the storefront.
//!
//! - `auth` - Account registration and password login

pub mod auth;
