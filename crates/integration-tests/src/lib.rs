//! Integration tests for KeyZone.
//!
//! Each test drives the real storefront router in-process with
//! `tower::ServiceExt::oneshot`, backed by an in-memory session store, while
//! a `wiremock` server plays the marketplace API. Nothing else needs to be
//! running:
//!
//! ```bash
//! cargo test -p keyzone-integration-tests
//! ```
//!
//! # Test Categories
//!
//! - `health` - liveness, readiness and response headers
//! - `auth` - login, logout, registration and route protection
//! - `session_expiry` - a rejected token signs the user out
//! - `cart` - cart mutations mirror the server and respect stock
//! - `checkout` - placing orders
//! - `admin` - admin-only pages
//! - `error_pages` - error pages keep the visitor's navigation

use std::net::{IpAddr, Ipv4Addr};

use axum::{
    Router,
    body::Body,
    http::{Request, Response, header},
};
use keyzone_storefront::{
    app,
    config::{MarketplaceConfig, SentryConfig, StorefrontConfig},
    middleware::{SESSION_COOKIE_NAME, create_session_layer},
    state::AppState,
};
use secrecy::SecretString;
use serde_json::{Value, json};
use tower::ServiceExt;
use tower_sessions::MemoryStore;
use url::Url;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Token handed out by the mocked login endpoint.
pub const USER_TOKEN: &str = "tok-customer";
/// Token handed out to the mocked admin.
pub const ADMIN_TOKEN: &str = "tok-admin";

/// Host the storefront is addressed by in HTMX requests.
pub const STOREFRONT_HOST: &str = "localhost:3001";

/// A storefront wired to a mock marketplace.
pub struct TestApp {
    /// Stand-in for the marketplace API. Mount mocks on it per test.
    pub api: MockServer,
    router: Router,
}

impl TestApp {
    /// Start a mock API and build the storefront around it.
    pub async fn spawn() -> Self {
        let api = MockServer::start().await;
        let router = router_for(&api.uri());
        Self { api, router }
    }

    /// Send one request through the full middleware stack.
    pub async fn send(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("Router is infallible")
    }

    /// `GET uri`, optionally with a session cookie.
    pub async fn get(&self, uri: &str, cookie: Option<&str>) -> Response<Body> {
        self.send(build(request("GET", uri, cookie), Body::empty()))
            .await
    }

    /// Plain form post.
    pub async fn post_form(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let builder = request("POST", uri, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(build(builder, Body::from(body.to_owned()))).await
    }

    /// Form post as HTMX sends it.
    pub async fn htmx_post(&self, uri: &str, body: &str, cookie: Option<&str>) -> Response<Body> {
        let builder = request("POST", uri, cookie)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .header("hx-request", "true");
        self.send(build(builder, Body::from(body.to_owned()))).await
    }

    /// `GET uri` as HTMX issues it from the page at `current_page`.
    pub async fn htmx_get(
        &self,
        uri: &str,
        current_page: &str,
        cookie: Option<&str>,
    ) -> Response<Body> {
        let builder = request("GET", uri, cookie)
            .header(header::HOST, STOREFRONT_HOST)
            .header("hx-request", "true")
            .header("hx-current-url", format!("http://{STOREFRONT_HOST}{current_page}"));
        self.send(build(builder, Body::empty())).await
    }

    /// Sign in as a customer and return the session cookie.
    pub async fn login_customer(&self) -> String {
        self.login_as(&customer_json(), USER_TOKEN).await
    }

    /// Sign in as an administrator and return the session cookie.
    pub async fn login_admin(&self) -> String {
        self.login_as(&admin_json(), ADMIN_TOKEN).await
    }

    async fn login_as(&self, user: &Value, token: &str) -> String {
        let email = user["email"].as_str().unwrap_or_default().to_owned();
        let guard = Mock::given(method("POST"))
            .and(path("/api/users/login"))
            .respond_with(ok(json!({"user": user, "token": token})))
            .expect(1)
            .mount_as_scoped(&self.api)
            .await;

        let body = format!("email={}&password=hunter22", email.replace('@', "%40"));
        let response = self.post_form("/auth/login", &body, None).await;
        drop(guard);

        assert_eq!(response.status(), 303, "login should redirect");
        session_cookie(&response).expect("Login should set a session cookie")
    }
}

/// Router whose marketplace client points at `api_url`.
pub fn router_for(api_url: &str) -> Router {
    let config = StorefrontConfig {
        database_url: SecretString::from("postgres://unused@localhost/unused"),
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        base_url: "http://localhost:3001".to_owned(),
        session_secret: SecretString::from("unused-by-in-memory-sessions"),
        marketplace: MarketplaceConfig::new(Url::parse(api_url).expect("Invalid mock API URL")),
        sentry: SentryConfig::default(),
    };

    let state = AppState::new(config).expect("Failed to build application state");
    let session_layer = create_session_layer(MemoryStore::default(), state.config());
    app(state, session_layer)
}

fn request(method: &str, uri: &str, cookie: Option<&str>) -> axum::http::request::Builder {
    let builder = Request::builder().method(method).uri(uri);
    match cookie {
        Some(cookie) => builder.header(header::COOKIE, cookie),
        None => builder,
    }
}

fn build(builder: axum::http::request::Builder, body: Body) -> Request<Body> {
    builder.body(body).expect("Failed to build request")
}

// =============================================================================
// Response helpers
// =============================================================================

/// `kz_session=<id>` from a response's `Set-Cookie`, if it set one.
pub fn session_cookie(response: &Response<Body>) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .filter_map(|value| value.split(';').next())
        .find(|pair| pair.starts_with(&format!("{SESSION_COOKIE_NAME}=")))
        .map(ToOwned::to_owned)
}

/// Value of a response header as text.
pub fn header_value<'a>(response: &'a Response<Body>, name: &str) -> Option<&'a str> {
    response.headers().get(name).and_then(|v| v.to_str().ok())
}

/// `Location` of a redirect.
pub fn location(response: &Response<Body>) -> Option<&str> {
    header_value(response, "location")
}

/// Collect the body as UTF-8 text.
pub async fn body_text(response: Response<Body>) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("Failed to read body");
    String::from_utf8(bytes.to_vec()).expect("Body is not UTF-8")
}

// =============================================================================
// Marketplace payloads
// =============================================================================

/// `200 {"success": true, "data": data}`.
pub fn ok(data: Value) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({"success": true, "data": data}))
}

/// A list response with pagination.
pub fn ok_page(items: Value, total: u64) -> ResponseTemplate {
    ResponseTemplate::new(200).set_body_json(json!({
        "success": true,
        "data": items,
        "pagination": {"current": 1, "pages": 1, "total": total}
    }))
}

/// An error response carrying the API's message.
pub fn failure(status: u16, message: &str) -> ResponseTemplate {
    ResponseTemplate::new(status).set_body_json(json!({"success": false, "message": message}))
}

pub fn customer_json() -> Value {
    json!({
        "_id": "user-1",
        "username": "nimal",
        "email": "nimal@example.lk",
        "role": "user",
        "phone_number": "0771234567",
        "address": {
            "street": "12 Galle Rd",
            "city": "Colombo",
            "state": "Western",
            "postal_code": "00300",
            "country": "Sri Lanka"
        }
    })
}

pub fn admin_json() -> Value {
    json!({
        "_id": "admin-1",
        "username": "kasun",
        "email": "kasun@keyzone.lk",
        "role": "admin"
    })
}

pub fn product_json(id: &str, name: &str, price: u32, quantity: u32) -> Value {
    json!({
        "_id": id,
        "name": name,
        "description": format!("{name} activation key"),
        "price": price,
        "quantity": quantity,
        "categories": ["Games"],
        "productImgs": [],
        "createdAt": "2024-03-01T10:00:00Z"
    })
}

/// A cart whose lines are `(product, quantity)`; unit price comes from the product.
pub fn cart_json(lines: &[(Value, u32)]) -> Value {
    let mut total = 0;
    let items: Vec<Value> = lines
        .iter()
        .map(|(product, quantity)| {
            let price = product["price"].as_u64().unwrap_or_default();
            total += price * u64::from(*quantity);
            json!({"product": product, "quantity": quantity, "price": price})
        })
        .collect();
    json!({"items": items, "total": total})
}
