//! Cart pages render what the server returns and never send quantities
//! outside `1..=stock`.

use keyzone_integration_tests::{
    TestApp, body_text, cart_json, failure, header_value, location, ok, product_json,
};
use serde_json::json;
use wiremock::Mock;
use wiremock::matchers::{body_json, method, path};

#[tokio::test]
async fn test_cart_page_mirrors_server_cart() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    let halo = product_json("p1", "Halo Infinite", 1500, 4);
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ok(cart_json(&[(halo, 2)])))
        .mount(&app.api)
        .await;

    let response = app.get("/cart", Some(&cookie)).await;
    assert_eq!(response.status(), 200);
    let html = body_text(response).await;
    assert!(html.contains("Halo Infinite"));
    assert!(html.contains("Rs 3,000.00"));
}

#[tokio::test]
async fn test_empty_cart_page() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ok(json!({"items": [], "total": 0})))
        .mount(&app.api)
        .await;

    let html = body_text(app.get("/cart", Some(&cookie)).await).await;
    assert!(html.contains("Your cart is empty"));
}

#[tokio::test]
async fn test_add_to_cart_returns_count_badge() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    let office = product_json("p2", "Office 2021", 9000, 5);
    Mock::given(method("GET"))
        .and(path("/api/products/p2"))
        .respond_with(ok(office.clone()))
        .mount(&app.api)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .and(body_json(json!({"productId": "p2", "quantity": 2})))
        .respond_with(ok(cart_json(&[(office, 2)])))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .htmx_post("/cart/add", "product_id=p2&quantity=2", Some(&cookie))
        .await;
    assert_eq!(response.status(), 200);
    assert_eq!(header_value(&response, "hx-trigger"), Some("cart-updated"));
    assert!(body_text(response).await.contains(">2<"));
}

#[tokio::test]
async fn test_add_beyond_stock_is_refused_locally() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("GET"))
        .and(path("/api/products/p2"))
        .respond_with(ok(product_json("p2", "Office 2021", 9000, 5)))
        .mount(&app.api)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app
        .htmx_post("/cart/add", "product_id=p2&quantity=6", Some(&cookie))
        .await;
    assert_eq!(header_value(&response, "hx-retarget"), Some("#flash"));
    assert!(body_text(response).await.contains("Only 5 available in stock"));
}

#[tokio::test]
async fn test_plain_add_redirects_with_flash() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    let office = product_json("p2", "Office 2021", 9000, 5);
    Mock::given(method("GET"))
        .and(path("/api/products/p2"))
        .respond_with(ok(office.clone()))
        .mount(&app.api)
        .await;
    Mock::given(method("POST"))
        .and(path("/api/cart/add"))
        .respond_with(ok(cart_json(&[(office, 1)])))
        .mount(&app.api)
        .await;

    let response = app.post_form("/cart/add", "product_id=p2", Some(&cookie)).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), Some("/cart"));
}

#[tokio::test]
async fn test_update_out_of_range_sends_nothing() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    let halo = product_json("p1", "Halo Infinite", 1500, 2);
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ok(cart_json(&[(halo, 2)])))
        .mount(&app.api)
        .await;
    Mock::given(method("PUT"))
        .and(path("/api/cart/update"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&app.api)
        .await;

    for quantity in ["3", "0", "-1", "lots"] {
        let body = format!("product_id=p1&quantity={quantity}");
        let response = app.htmx_post("/cart/update", &body, Some(&cookie)).await;
        assert_eq!(header_value(&response, "hx-retarget"), Some("#flash"));
    }
}

#[tokio::test]
async fn test_update_renders_server_cart_not_request() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    let halo = product_json("p1", "Halo Infinite", 1500, 4);
    Mock::given(method("GET"))
        .and(path("/api/cart"))
        .respond_with(ok(cart_json(&[(halo.clone(), 1)])))
        .mount(&app.api)
        .await;
    // The server settles on 3 although 2 was asked for.
    Mock::given(method("PUT"))
        .and(path("/api/cart/update"))
        .and(body_json(json!({"productId": "p1", "quantity": 2})))
        .respond_with(ok(cart_json(&[(halo, 3)])))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .htmx_post("/cart/update", "product_id=p1&quantity=2", Some(&cookie))
        .await;
    assert_eq!(header_value(&response, "hx-trigger"), Some("cart-updated"));
    let html = body_text(response).await;
    assert!(html.contains("Rs 4,500.00"));
    assert!(html.contains("<span class=\"quantity\">3</span>"));
}

#[tokio::test]
async fn test_remove_shows_server_message_on_failure() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    Mock::given(method("DELETE"))
        .and(path("/api/cart/remove/p9"))
        .respond_with(failure(404, "Item not in cart"))
        .mount(&app.api)
        .await;

    let response = app
        .htmx_post("/cart/remove", "product_id=p9", Some(&cookie))
        .await;
    assert_eq!(header_value(&response, "hx-retarget"), Some("#flash"));
    assert!(body_text(response).await.contains("Item not in cart"));
}

#[tokio::test]
async fn test_cart_count_for_visitors_is_empty() {
    let app = TestApp::spawn().await;

    let response = app.get("/cart/count", None).await;
    assert_eq!(response.status(), 200);
    assert_eq!(body_text(response).await.trim(), "");
}
