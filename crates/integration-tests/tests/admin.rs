//! Admin-only pages.

use keyzone_integration_tests::{
    ADMIN_TOKEN, TestApp, body_text, location, ok, ok_page, product_json, session_cookie,
};
use serde_json::json;
use wiremock::matchers::{header, method, path, path_regex};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn test_customer_is_forbidden() {
    let app = TestApp::spawn().await;
    let cookie = app.login_customer().await;

    for page in ["/admin", "/admin/products", "/admin/orders", "/admin/users"] {
        let response = app.get(page, Some(&cookie)).await;
        assert_eq!(response.status(), 403, "{page}");
        assert!(body_text(response).await.contains("Access Denied"));
    }
}

#[tokio::test]
async fn test_visitor_is_sent_to_login() {
    let app = TestApp::spawn().await;

    let response = app.get("/admin", None).await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), Some("/auth/login?redirect=%2Fadmin"));
}

#[tokio::test]
async fn test_product_table_lists_api_products() {
    let app = TestApp::spawn().await;
    let cookie = app.login_admin().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ok_page(
            json!([
                product_json("p1", "Halo Infinite", 1500, 0),
                product_json("p2", "Office 2021", 9000, 40)
            ]),
            2,
        ))
        .mount(&app.api)
        .await;

    let response = app.get("/admin/products", Some(&cookie)).await;
    assert_eq!(response.status(), 200);
    let html = body_text(response).await;
    assert!(html.contains("Halo Infinite"));
    assert!(html.contains("Office 2021"));
    assert!(html.contains("badge-error"));
}

#[tokio::test]
async fn test_invalid_product_form_skips_api() {
    let app = TestApp::spawn().await;
    let cookie = app.login_admin().await;

    Mock::given(method("POST"))
        .and(path("/api/products"))
        .respond_with(ok(json!({})))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app
        .post_form(
            "/admin/products/new",
            "name=Halo&description=Key&price=-5&quantity=3&images=",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), 200);
    let html = body_text(response).await;
    assert!(html.contains("Price cannot be negative"));
    assert!(html.contains("Please select at least one category"));
}

#[tokio::test]
async fn test_create_product_posts_draft() {
    let app = TestApp::spawn().await;
    let cookie = app.login_admin().await;

    Mock::given(method("POST"))
        .and(path("/api/products"))
        .and(header("authorization", format!("Bearer {ADMIN_TOKEN}").as_str()))
        .respond_with(ok(product_json("p3", "Halo", 1500, 3)))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app
        .post_form(
            "/admin/products/new",
            "name=Halo&description=Key&price=1500&quantity=3&category_games=on\
             &images=https%3A%2F%2Fcdn.example%2Fhalo.png%0A%0A",
            Some(&cookie),
        )
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), Some("/admin/products"));
}

#[tokio::test]
async fn test_admin_cannot_delete_self() {
    let app = TestApp::spawn().await;
    let cookie = app.login_admin().await;

    Mock::given(method("DELETE"))
        .and(path_regex("^/api/users/.*$"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&app.api)
        .await;

    let response = app
        .post_form("/admin/users/admin-1/delete", "", Some(&cookie))
        .await;
    assert_eq!(response.status(), 303);
    assert_eq!(location(&response), Some("/admin/users"));

    let cookie = session_cookie(&response).unwrap_or(cookie);
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ok_page(json!([]), 0))
        .mount(&app.api)
        .await;
    let html = body_text(app.get("/admin/users", Some(&cookie)).await).await;
    assert!(html.contains("You cannot delete your own account"));
}

#[tokio::test]
async fn test_dashboard_degrades_per_section() {
    let app = TestApp::spawn().await;
    let cookie = app.login_admin().await;

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ok_page(json!([product_json("p1", "Halo Infinite", 1500, 4)]), 7))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .respond_with(ok_page(json!([]), 12))
        .mount(&app.api)
        .await;

    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(response.status(), 200);
    let html = body_text(response).await;
    assert!(html.contains("Halo Infinite"));
    assert!(html.contains(">7<"));
    assert!(html.contains(">12<"));
    assert!(html.contains("No orders."));
}

#[tokio::test]
async fn test_dashboard_shows_totals_and_recent_activity() {
    let app = TestApp::spawn().await;
    let cookie = app.login_admin().await;
    let bearer = format!("Bearer {ADMIN_TOKEN}");

    Mock::given(method("GET"))
        .and(path("/api/products"))
        .respond_with(ok_page(
            json!([
                product_json("p1", "Halo Infinite", 1500, 4),
                product_json("p2", "Office 2021 Pro", 9000, 25),
            ]),
            42,
        ))
        .expect(1)
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/orders"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ok_page(
            json!([
                {
                    "_id": "6650aa00bb11cc22dd33ee44",
                    "products": [],
                    "total_amount": 3000,
                    "createdAt": "2024-05-24T08:30:00Z",
                    "user": {"_id": "user-1", "username": "nimal", "email": "nimal@example.lk"},
                    "status": "pending"
                },
                {
                    "_id": "6650aa00bb11cc22dd33ff55",
                    "products": [],
                    "total_amount": 4500,
                    "createdAt": "2024-05-25T09:00:00Z",
                    "user": "user-2"
                }
            ]),
            9,
        ))
        .expect(1)
        .mount(&app.api)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users"))
        .and(header("authorization", bearer.as_str()))
        .respond_with(ok_page(json!([]), 31))
        .expect(1)
        .mount(&app.api)
        .await;

    let response = app.get("/admin", Some(&cookie)).await;
    assert_eq!(response.status(), 200);
    let html = body_text(response).await;

    assert!(html.contains(">42<"));
    assert!(html.contains(">9<"));
    assert!(html.contains(">31<"));
    assert!(html.contains("Rs 7,500.00"));
    assert!(html.contains("Halo Infinite"));
    assert!(html.contains("Office 2021 Pro"));
    assert!(html.contains("#dd33ee44"));
    assert!(html.contains("nimal"));
    assert!(html.contains("Pending"));
    assert!(!html.contains("No orders."));
    assert!(!html.contains("No products."));
}
