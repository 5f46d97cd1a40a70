//! HTTP route handlers for the storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                 - Landing page
//! GET  /products         - Static product listing
//! GET  /register         - Registration form
//! POST /register         - Create account, log in, redirect to /products
//! GET  /login            - Login form
//! POST /login            - Authenticate, redirect to /products
//! GET  /logout           - Clear session principal (requires auth), redirect to /
//!
//! GET  /health           - Liveness
//! GET  /health/ready     - Readiness (database reachable)
//! ```
//!
//! Form failures never render an error page: they queue a flash message and
//! redirect back to the form.

pub mod auth;
pub mod health;
pub mod home;
pub mod products;

use axum::{Router, http::Uri, routing::get};

use crate::error::AppError;
use crate::state::AppState;

/// Create all page routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::index))
        .route("/products", get(products::index))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/logout", get(auth::logout))
}

/// Create the health check routes.
pub fn health_routes() -> Router<AppState> {
    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::readiness))
}

/// Fallback for unknown paths.
pub async fn not_found(uri: Uri) -> AppError {
    AppError::NotFound(uri.path().to_string())
}
