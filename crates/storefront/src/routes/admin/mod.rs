//! Admin route handlers.
//!
//! Every handler takes [`RequireAdmin`](crate::middleware::RequireAdmin);
//! the marketplace enforces the role again on its side.

pub mod dashboard;
pub mod orders;
pub mod products;
pub mod users;

use axum::{
    Router,
    routing::{get, post},
};

use crate::state::AppState;

/// Create the admin routes router.
pub fn routes() -> Router<AppState> {
    Router::new()
        .route("/", get(dashboard::index))
        .route("/products", get(products::index))
        .route("/products/new", get(products::new_form).post(products::create))
        .route(
            "/products/{id}/edit",
            get(products::edit_form).post(products::update),
        )
        .route("/products/{id}/delete", post(products::delete))
        .route("/orders", get(orders::index))
        .route("/orders/{id}", get(orders::show))
        .route("/users", get(users::index))
        .route("/users/{id}/edit", get(users::edit_form).post(users::update))
        .route("/users/{id}/delete", post(users::delete))
}
