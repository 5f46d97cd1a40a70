//! Domain models for the storefront.
//!
//! - [`user`] - Persisted site accounts
//! - [`session`] - Keys used in the session
//! - [`flash`] - One-shot status messages
//! - [`product`] - Static product catalog

pub mod flash;
pub mod product;
pub mod session;
pub mod user;

pub use flash::{Flash, FlashLevel};
pub use product::Product;
pub use session::keys as session_keys;
pub use user::User;
