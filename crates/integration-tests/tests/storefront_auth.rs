//! Registration, login and logout driven through the HTTP surface.

use axum::http::StatusCode;
use safehub_integration_tests::TestApp;

const PASSWORD: &str = "pw123";

// =============================================================================
// Registration
// =============================================================================

#[tokio::test]
async fn test_register_logs_in_and_welcomes() {
    let mut app = TestApp::spawn().await;

    let resp = app.register("Ana", "ana@example.com", PASSWORD).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/products"));
    assert!(app.has_session());
    assert_eq!(app.user_count().await, 1);

    let page = app.get("/products").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Welcome to SafeHub, Ana!"));
    assert!(page.body.contains("Hi, Ana"));
    assert!(page.body.contains("href=\"/logout\""));

    // Authenticated callers are let through to logout.
    let resp = app.get("/logout").await;
    assert_eq!(resp.location(), Some("/"));
}

#[tokio::test]
async fn test_register_duplicate_email_is_case_insensitive() {
    let mut app = TestApp::spawn().await;
    app.register("Ana", "ana@example.com", PASSWORD).await;
    app.clear_cookies();

    let resp = app.register("Bob", "ANA@example.com", "other").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/register"));
    assert_eq!(app.user_count().await, 1);

    let page = app.get("/register").await;
    assert!(page.body.contains("Email already registered."));
    assert!(!page.body.contains("Hi, Bob"));
}

#[tokio::test]
async fn test_duplicate_in_same_session_keeps_first_login() {
    let mut app = TestApp::spawn().await;
    app.register("Ana", "ana@example.com", PASSWORD).await;

    let resp = app.register("Bob", "ANA@example.com", "x").await;
    assert_eq!(resp.location(), Some("/register"));
    assert_eq!(app.user_count().await, 1);

    let page = app.get("/register").await;
    assert!(page.body.contains("Email already registered."));
    assert!(page.body.contains("Hi, Ana"));
    assert!(!page.body.contains("Hi, Bob"));
}

#[tokio::test]
async fn test_register_requires_all_fields() {
    let mut app = TestApp::spawn().await;

    let resp = app.register("", "ana@example.com", PASSWORD).await;
    assert_eq!(resp.location(), Some("/register"));
    let page = app.get("/register").await;
    assert!(page.body.contains("All fields are required."));

    // Fields missing from the body entirely count as blank.
    let resp = app
        .post_form("/register", &[("email", "ana@example.com")])
        .await;
    assert_eq!(resp.location(), Some("/register"));
    let page = app.get("/register").await;
    assert!(page.body.contains("All fields are required."));

    assert_eq!(app.user_count().await, 0);
}

#[tokio::test]
async fn test_register_accepts_any_non_empty_email() {
    let mut app = TestApp::spawn().await;

    let resp = app.register("N", "bob", "pw").await;
    assert_eq!(resp.location(), Some("/products"));
    assert_eq!(app.user_count().await, 1);

    let page = app.get("/products").await;
    assert!(page.body.contains("Welcome to SafeHub, N!"));
}

#[tokio::test]
async fn test_register_blank_email_is_a_missing_field() {
    let mut app = TestApp::spawn().await;

    let resp = app.register("Ana", "   ", PASSWORD).await;
    assert_eq!(resp.location(), Some("/register"));
    let page = app.get("/register").await;
    assert!(page.body.contains("All fields are required."));
    assert_eq!(app.user_count().await, 0);
}

// =============================================================================
// Login
// =============================================================================

#[tokio::test]
async fn test_login_with_correct_password() {
    let mut app = TestApp::spawn().await;
    app.register("Ana", "ana@example.com", PASSWORD).await;
    app.clear_cookies();

    let resp = app.login("  ANA@Example.com ", PASSWORD).await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/products"));

    let page = app.get("/products").await;
    assert!(page.body.contains("Signed in."));
    assert!(page.body.contains("Hi, Ana"));
}

#[tokio::test]
async fn test_login_wrong_password_stays_anonymous() {
    let mut app = TestApp::spawn().await;
    app.register("Ana", "ana@example.com", PASSWORD).await;
    app.clear_cookies();

    let resp = app.login("ana@example.com", "nope").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/login"));

    let page = app.get("/login").await;
    assert!(page.body.contains("Invalid credentials."));
    assert!(!page.body.contains("Hi, Ana"));

    let resp = app.get("/logout").await;
    assert_eq!(resp.location(), Some("/login"));
}

#[tokio::test]
async fn test_login_unknown_email_gets_same_message() {
    let mut app = TestApp::spawn().await;

    let resp = app.login("ghost@example.com", PASSWORD).await;
    assert_eq!(resp.location(), Some("/login"));

    let page = app.get("/login").await;
    assert!(page.body.contains("Invalid credentials."));
}

// =============================================================================
// Logout and flash lifetime
// =============================================================================

#[tokio::test]
async fn test_logout_clears_login_and_flashes_once() {
    let mut app = TestApp::spawn().await;
    app.register("Ana", "ana@example.com", PASSWORD).await;
    app.get("/products").await;

    let resp = app.get("/logout").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/"));

    let home = app.get("/").await;
    assert!(home.body.contains("Signed out."));
    assert!(home.body.contains("href=\"/login\""));
    assert!(!home.body.contains("Hi, Ana"));

    let again = app.get("/").await;
    assert!(!again.body.contains("Signed out."));

    let resp = app.get("/logout").await;
    assert_eq!(resp.location(), Some("/login"));
}

#[tokio::test]
async fn test_deleted_account_is_logged_out() {
    let mut app = TestApp::spawn().await;
    app.register("Ana", "ana@example.com", PASSWORD).await;

    sqlx::query("DELETE FROM users")
        .execute(&app.pool)
        .await
        .expect("delete users");

    let page = app.get("/products").await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(!page.body.contains("Hi, Ana"));

    let resp = app.get("/logout").await;
    assert_eq!(resp.location(), Some("/login"));
}

#[tokio::test]
async fn test_anonymous_logout_redirects_to_login() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/logout").await;
    assert_eq!(resp.status, StatusCode::SEE_OTHER);
    assert_eq!(resp.location(), Some("/login"));
}
