//! A token the marketplace rejects signs the user out.

use keyzone_integration_tests::{
    TestApp, USER_TOKEN, body_text, failure, header_value, location, session_cookie,
};
use wiremock::Mock;
use wiremock::matchers::{header, method, path};

#[tokio::test]
async fn test_rejected_token_clears_session_and_redirects() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .and(header("authorization", format!("Bearer {USER_TOKEN}").as_str()))
        .respond_with(failure(401, "Token expired"))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app.get("/cart", Some(&cookie)).await;
    assert_eq!(response.status(), 303);
    assert_eq!(
        location(&response),
        Some("/auth/login?expired=1&redirect=%2Fcart")
    );

    // Neither the old nor the reissued cookie carries the user any more,
    // and the API is not called again.
    let reissued = session_cookie(&response);
    for cookie in [Some(cookie), reissued].into_iter().flatten() {
        let response = app.get("/cart", Some(&cookie)).await;
        assert_eq!(location(&response), Some("/auth/login?redirect=%2Fcart"));
    }
}

#[tokio::test]
async fn test_expired_login_page_explains() {
    let app = TestApp::spawn().await;

    let html = body_text(app.get("/auth/login?expired=1", None).await).await;
    assert!(html.contains("Session expired. Please login again."));
}

#[tokio::test]
async fn test_htmx_request_with_rejected_token() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("DELETE"))
        .and(path("/api/cart/clear"))
        .respond_with(failure(401, "Token expired"))
        .mount(&app.api)
        .await;

    let response = app.htmx_post("/cart/clear", "", Some(&cookie)).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        header_value(&response, "hx-redirect"),
        Some("/auth/login?expired=1")
    );
}

#[tokio::test]
async fn test_cart_badge_with_rejected_token_signs_out() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(failure(401, "Token expired"))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app.get("/cart/count", Some(&cookie)).await;
    assert_eq!(response.status(), 303);
    assert!(
        location(&response).is_some_and(|to| to.starts_with("/auth/login?expired=1")),
        "{:?}",
        location(&response)
    );

    let response = app.get("/cart/count", Some(&cookie)).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_text(response).await.trim(), "");
}

#[tokio::test]
async fn test_htmx_badge_with_rejected_token_returns_to_current_page() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(failure(401, "Token expired"))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .htmx_get("/cart/count", "/products?search=halo", Some(&cookie))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        header_value(&response, "hx-redirect"),
        Some("/auth/login?expired=1&redirect=%2Fproducts%3Fsearch%3Dhalo")
    );

    // Signed out: the badge renders empty without calling the API again.
    let after = session_cookie(&response).unwrap_or(cookie);
    let response = app.htmx_get("/cart/count", "/products", Some(&after)).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_text(response).await.trim(), "");
}

#[tokio::test]
async fn test_protected_htmx_get_returns_to_current_page() {
    let app = TestApp::spawn().await;

    let response = app.htmx_get("/orders?page=2", "/orders", None).await;
    assert_eq!(response.status(), 200);
    assert_eq!(
        header_value(&response, "hx-redirect"),
        Some("/auth/login?redirect=%2Forders")
    );
}
