//! Page rendering and operational endpoints.

use axum::http::StatusCode;
use safehub_integration_tests::TestApp;

#[tokio::test]
async fn test_public_pages_render() {
    let mut app = TestApp::spawn().await;

    for path in ["/", "/products", "/register", "/login"] {
        let page = app.get(path).await;
        assert_eq!(page.status, StatusCode::OK, "{path}");
        assert!(page.body.contains("SafeHub"), "{path}");
    }
}

#[tokio::test]
async fn test_products_lists_catalog() {
    let mut app = TestApp::spawn().await;

    let page = app.get("/products").await;
    for expected in [
        "Murmur Weighted Tee",
        "NZ$89.00",
        "NeuroGlow Tee",
        "NZ$49.00",
        "BodyHarmony Tee",
        "NZ$55.00",
        "flagship",
        "sensory",
        "unisex+",
    ] {
        assert!(page.body.contains(expected), "missing {expected}");
    }
}

#[tokio::test]
async fn test_anonymous_nav_offers_login_and_register() {
    let mut app = TestApp::spawn().await;

    let page = app.get("/").await;
    assert!(page.body.contains("href=\"/login\""));
    assert!(page.body.contains("href=\"/register\""));
    assert!(!page.body.contains("href=\"/logout\""));
}

#[tokio::test]
async fn test_health_endpoints() {
    let mut app = TestApp::spawn().await;

    let live = app.get("/health").await;
    assert_eq!(live.status, StatusCode::OK);
    assert_eq!(live.body, "ok");

    let ready = app.get("/health/ready").await;
    assert_eq!(ready.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_path_is_404() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/no-such-page").await;
    assert_eq!(resp.status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_responses_carry_request_id_and_security_headers() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/").await;
    let request_id = resp
        .headers
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default();
    assert!(!request_id.is_empty());
    assert_eq!(
        resp.headers
            .get("x-content-type-options")
            .and_then(|v| v.to_str().ok()),
        Some("nosniff")
    );
    assert_eq!(
        resp.headers.get("x-frame-options").and_then(|v| v.to_str().ok()),
        Some("DENY")
    );
}

#[tokio::test]
async fn test_stylesheet_is_served() {
    let mut app = TestApp::spawn().await;

    let resp = app.get("/static/css/main.css").await;
    assert_eq!(resp.status, StatusCode::OK);
    assert!(resp.body.contains(".flash-danger"));
}
