//! HTTP route handlers for storefront.
//!
//! # Route Structure
//!
//! ```text
//! GET  /                          - Home page
//! GET  /health                    - Liveness check
//! GET  /health/ready              - Readiness check (marketplace API reachable)
//!
//! # Products
//! GET  /products                  - Product listing (search, category, sort, page)
//! GET  /products/category/{cat}   - Products in one category
//! GET  /products/{id}             - Product detail
//!
//! # Cart (requires auth; HTMX fragments)
//! GET  /cart                      - Cart page
//! POST /cart/add                  - Add to cart (returns count badge, triggers cart-updated)
//! POST /cart/update               - Set line quantity (returns cart_items fragment)
//! POST /cart/remove               - Remove line (returns cart_items fragment)
//! POST /cart/clear                - Empty the cart (returns cart_items fragment)
//! GET  /cart/count                - Cart count badge (fragment, 0 when signed out)
//!
//! # Checkout & orders (requires auth)
//! GET  /checkout                  - Shipping details and order summary
//! POST /checkout                  - Place the order
//! GET  /orders                    - Order history
//! GET  /orders/{id}               - Order detail
//!
//! # Auth
//! GET  /auth/login                - Login page
//! POST /auth/login                - Login action
//! GET  /auth/register             - Register page
//! POST /auth/register             - Register action
//! POST /auth/logout               - Logout action
//!
//! # Account (requires auth)
//! GET  /account                   - Profile
//! POST /account                   - Update profile
//! POST /account/password          - Change password
//!
//! # Admin (requires admin role)
//! GET  /admin                     - Dashboard
//! GET  /admin/products            - Product table
//! GET  /admin/products/new        - New product form
//! POST /admin/products/new        - Create product
//! GET  /admin/products/{id}/edit  - Edit product form
//! POST /admin/products/{id}/edit  - Update product
//! POST /admin/products/{id}/delete - Delete product
//! GET  /admin/orders              - Orders with summary stats
//! GET  /admin/orders/{id}         - Order detail
//! GET  /admin/users               - User table
//! GET  /admin/users/{id}/edit     - Edit user form
//! POST /admin/users/{id}/edit     - Update user
//! POST /admin/users/{id}/delete   - Delete user
//! ```

pub mod account;
pub mod admin;
pub mod auth;
pub mod cart;
pub mod checkout;
pub mod home;
pub mod orders;
pub mod products;

use std::convert::Infallible;

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Router,
    extract::FromRequestParts,
    http::{HeaderMap, request::Parts},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
    routing::{get, post},
};
use serde::Deserialize;
use tower_sessions::Session;

use crate::marketplace::Pagination;
use crate::middleware::is_htmx;
use crate::models::{CurrentUser, Flash, session_keys};
use crate::state::AppState;

// =============================================================================
// Page Context
// =============================================================================

/// What every full page needs for its layout: the signed-in user (for the
/// navigation) and the pending flash message, if any.
///
/// Extracting this consumes the flash, so it shows exactly once.
#[derive(Debug, Clone, Default)]
pub struct PageContext {
    pub user: Option<CurrentUser>,
    pub flash: Option<Flash>,
}

impl PageContext {
    /// Context for a known user with no flash.
    #[must_use]
    pub const fn for_user(user: CurrentUser) -> Self {
        Self {
            user: Some(user),
            flash: None,
        }
    }

    /// Replace the flash with one produced by the current request.
    #[must_use]
    pub fn with_flash(mut self, flash: Flash) -> Self {
        self.flash = Some(flash);
        self
    }

    /// Load the signed-in user and take the pending flash from `session`.
    pub async fn load(session: &Session) -> Self {
        let user = session
            .get::<CurrentUser>(session_keys::CURRENT_USER)
            .await
            .ok()
            .flatten();
        let flash = take_flash(session).await;
        Self { user, flash }
    }

    #[must_use]
    pub fn is_admin(&self) -> bool {
        self.user.as_ref().is_some_and(CurrentUser::is_admin)
    }
}

impl<S> FromRequestParts<S> for PageContext
where
    S: Send + Sync,
{
    type Rejection = Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match parts.extensions.get::<Session>().cloned() {
            Some(session) => Ok(Self::load(&session).await),
            None => Ok(Self::default()),
        }
    }
}

/// Queue a message for the next rendered page.
pub async fn set_flash(session: &Session, flash: Flash) {
    if let Err(e) = session.insert(session_keys::FLASH, flash).await {
        tracing::warn!(error = %e, "Failed to store flash message");
    }
}

async fn take_flash(session: &Session) -> Option<Flash> {
    session
        .remove::<Flash>(session_keys::FLASH)
        .await
        .ok()
        .flatten()
}

/// Alert banner fragment.
#[derive(Template, WebTemplate)]
#[template(path = "partials/alert.html")]
pub struct AlertTemplate {
    pub flash: Flash,
}

/// Report the outcome of a form post.
///
/// HTMX requests get the banner swapped into `#flash` in place; plain form
/// posts get it as a flash message on the page at `fallback`.
pub async fn notify(
    headers: &HeaderMap,
    session: &Session,
    flash: Flash,
    fallback: &str,
) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Retarget", "#flash"), ("HX-Reswap", "innerHTML")]),
            AlertTemplate { flash },
        )
            .into_response()
    } else {
        set_flash(session, flash).await;
        Redirect::to(fallback).into_response()
    }
}

// =============================================================================
// Pagination
// =============================================================================

/// `?page=N` query parameter.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct PageParam {
    #[serde(default)]
    pub page: Option<u32>,
}

impl PageParam {
    #[must_use]
    pub fn page(&self) -> u32 {
        self.page.unwrap_or(1).max(1)
    }
}

/// Previous/next links for a paginated list.
#[derive(Debug, Clone)]
pub struct Pager {
    pub current: u32,
    pub pages: u32,
    pub total: u64,
    pub prev_url: Option<String>,
    pub next_url: Option<String>,
}

impl Pager {
    /// Build links by appending `page=N` to `base` (which may already carry
    /// a query string).
    #[must_use]
    pub fn new(pagination: &Pagination, base: &str) -> Self {
        let separator = if base.contains('?') { '&' } else { '?' };
        let link = |page: u32| format!("{base}{separator}page={page}");

        Self {
            current: pagination.current,
            pages: pagination.pages,
            total: pagination.total,
            prev_url: pagination
                .has_previous()
                .then(|| link(pagination.current - 1)),
            next_url: pagination.has_next().then(|| link(pagination.current + 1)),
        }
    }

    /// Whether there is more than one page to navigate.
    #[must_use]
    pub const fn is_paginated(&self) -> bool {
        self.pages > 1
    }
}

// =============================================================================
// Routers
// =============================================================================

/// Create the auth routes router.
pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/login", get(auth::login_page).post(auth::login))
        .route("/register", get(auth::register_page).post(auth::register))
        .route("/logout", post(auth::logout))
}

/// Create the product routes router.
pub fn product_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(products::index))
        .route("/category/{category}", get(products::category))
        .route("/{id}", get(products::show))
}

/// Create the cart routes router.
pub fn cart_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(cart::show))
        .route("/add", post(cart::add))
        .route("/update", post(cart::update))
        .route("/remove", post(cart::remove))
        .route("/clear", post(cart::clear))
        .route("/count", get(cart::count))
}

/// Create the order history routes router.
pub fn order_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(orders::index))
        .route("/{id}", get(orders::show))
}

/// Create the account routes router.
pub fn account_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(account::show).post(account::update_profile))
        .route("/password", post(account::change_password))
}

/// Create all routes for the storefront.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(home::home))
        .nest("/products", product_routes())
        .nest("/cart", cart_routes())
        .route("/checkout", get(checkout::show).post(checkout::place_order))
        .nest("/orders", order_routes())
        .nest("/account", account_routes())
        .nest("/auth", auth_routes())
        .nest("/admin", admin::routes())
}
