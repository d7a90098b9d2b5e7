//! Error pages keep the visitor's navigation.

use keyzone_integration_tests::{TestApp, body_text, failure};
use wiremock::matchers::{method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_unknown_page_keeps_signed_in_navigation() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    let response = app.get("/no-such-page", Some(&cookie)).await;
    assert_eq!(response.status(), 404);
    let html = body_text(response).await;
    assert!(html.contains("Page not found."));
    assert!(html.contains("nimal"));
    assert!(html.contains("/auth/logout"));
}

#[tokio::test]
async fn test_missing_product_keeps_signed_in_navigation() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("GET"))
        .and(path("/api/products/gone"))
        .respond_with(failure(404, "Product not found"))
        .mount(&app.api)
        .await;

    let response = app.get("/products/gone", Some(&cookie)).await;
    assert_eq!(response.status(), 404);
    let html = body_text(response).await;
    assert!(html.contains("Product not found."));
    assert!(html.contains("/auth/logout"));
}

#[tokio::test]
async fn test_api_outage_page_keeps_signed_in_navigation() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("GET"))
        .and(path("/api/products/p1"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.api)
        .await;

    let response = app.get("/products/p1", Some(&cookie)).await;
    assert_eq!(response.status(), 502);
    let html = body_text(response).await;
    assert!(html.contains("Server error. Please try again later."));
    assert!(html.contains("nimal"));
}

#[tokio::test]
async fn test_visitor_error_page_shows_login_links() {
    let app = TestApp::spawn().await;

    let html = body_text(app.get("/no-such-page", None).await).await;
    assert!(html.contains("/auth/login"));
    assert!(!html.contains("/auth/logout"));
}
