//! Integration test harness for the SafeHub storefront.
//!
//! Each [`TestApp`] owns a fresh in-memory `SQLite` database and the full
//! storefront router, layers included. Requests are driven through
//! `tower::ServiceExt::oneshot`, so no port is bound. The harness keeps the
//! session cookie between requests like a browser would.
//!
//! # Running Tests
//!
//! ```bash
//! cargo test -p safehub-integration-tests
//! ```

#![allow(clippy::missing_panics_doc, clippy::expect_used)]

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{HeaderMap, Request, StatusCode, header},
};
use secrecy::SecretString;
use sqlx::{SqlitePool, sqlite::SqlitePoolOptions};
use tower::ServiceExt;

use safehub_storefront::config::StorefrontConfig;
use safehub_storefront::middleware::{SESSION_COOKIE_NAME, create_session_store};
use safehub_storefront::state::AppState;
use safehub_storefront::{app, db};

/// Upper bound on buffered response bodies.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// A storefront instance plus a one-user cookie jar.
pub struct TestApp {
    router: Router,
    pub pool: SqlitePool,
    cookie: Option<String>,
}

/// A fully buffered response.
pub struct TestResponse {
    pub status: StatusCode,
    pub headers: HeaderMap,
    pub body: String,
}

impl TestResponse {
    /// The `Location` header of a redirect.
    #[must_use]
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }
}

impl TestApp {
    /// Build the storefront on a fresh in-memory database.
    pub async fn spawn() -> Self {
        // One connection that never expires: each new in-memory connection
        // would otherwise see an empty database.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect("sqlite::memory:")
            .await
            .expect("open in-memory database");

        db::migrate(&pool).await.expect("apply migrations");
        let session_store = create_session_store(&pool)
            .await
            .expect("create session table");

        let config = StorefrontConfig {
            database_url: SecretString::from("sqlite::memory:"),
            ..StorefrontConfig::default()
        };
        let state = AppState::new(config, pool.clone());

        Self {
            router: app(state, session_store),
            pool,
            cookie: None,
        }
    }

    /// Whether the jar currently holds a session cookie.
    #[must_use]
    pub const fn has_session(&self) -> bool {
        self.cookie.is_some()
    }

    /// Forget the session cookie, as a different browser would.
    pub fn clear_cookies(&mut self) {
        self.cookie = None;
    }

    /// Send a GET request.
    pub async fn get(&mut self, uri: &str) -> TestResponse {
        let request = self.request("GET", uri).body(Body::empty());
        self.send(request.expect("build GET request")).await
    }

    /// Send an `application/x-www-form-urlencoded` POST.
    pub async fn post_form(&mut self, uri: &str, fields: &[(&str, &str)]) -> TestResponse {
        let body = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(fields)
            .finish();

        let request = self
            .request("POST", uri)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from(body));
        self.send(request.expect("build POST request")).await
    }

    /// Register an account through the form.
    pub async fn register(&mut self, name: &str, email: &str, password: &str) -> TestResponse {
        self.post_form(
            "/register",
            &[("name", name), ("email", email), ("password", password)],
        )
        .await
    }

    /// Log in through the form.
    pub async fn login(&mut self, email: &str, password: &str) -> TestResponse {
        self.post_form("/login", &[("email", email), ("password", password)])
            .await
    }

    /// Number of rows in the users table.
    pub async fn user_count(&self) -> i64 {
        sqlx::query_scalar::<_, i64>("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .expect("count users")
    }

    fn request(&self, method: &str, uri: &str) -> axum::http::request::Builder {
        let builder = Request::builder().method(method).uri(uri);
        match &self.cookie {
            Some(cookie) => builder.header(header::COOKIE, cookie),
            None => builder,
        }
    }

    async fn send(&mut self, request: Request<Body>) -> TestResponse {
        let response = self
            .router
            .clone()
            .oneshot(request)
            .await
            .expect("router is infallible");

        self.store_cookie(response.headers());

        let status = response.status();
        let headers = response.headers().clone();
        let bytes = to_bytes(response.into_body(), MAX_BODY_BYTES)
            .await
            .expect("read response body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&bytes).into_owned(),
        }
    }

    fn store_cookie(&mut self, headers: &HeaderMap) {
        let prefix = format!("{SESSION_COOKIE_NAME}=");
        for value in headers.get_all(header::SET_COOKIE) {
            let Ok(value) = value.to_str() else { continue };
            if !value.starts_with(&prefix) {
                continue;
            }

            let pair = value.split(';').next().unwrap_or_default().trim();
            let removed = pair.len() == prefix.len() || value.contains("Max-Age=0");
            self.cookie = if removed {
                None
            } else {
                Some(pair.to_string())
            };
        }
    }
}
