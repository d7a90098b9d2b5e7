//! Checkout route handlers.
//!
//! Orders are created server-side from the server's cart; this page only
//! shows a summary and confirms.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use keyzone_core::Address;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::marketplace::{Cart, MarketplaceError};
use crate::middleware::RequireAuth;
use crate::models::{CurrentUser, Flash};
use crate::routes::PageContext;
use crate::routes::cart::CartView;
use crate::state::AppState;

/// Shipping details taken from the profile.
#[derive(Clone, Default)]
pub struct ShippingView {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub address: Address,
}

/// Checkout page template.
#[derive(Template, WebTemplate)]
#[template(path = "checkout.html")]
pub struct CheckoutTemplate {
    pub page: PageContext,
    pub shipping: ShippingView,
    pub cart: CartView,
}

/// Re-render checkout with an error banner.
fn refused(page: PageContext, user: &CurrentUser, cart: &Cart, message: String) -> Response {
    CheckoutTemplate {
        page: page.with_flash(Flash::error(message)),
        shipping: ShippingView {
            name: user.username.clone(),
            email: user.email.clone(),
            ..ShippingView::default()
        },
        cart: CartView::from(cart),
    }
    .into_response()
}

/// Display the checkout summary.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> Result<impl IntoResponse> {
    let marketplace = state.marketplace();
    let (cart, profile) = tokio::join!(
        marketplace.get_cart(&user.token),
        marketplace.profile(&user.token)
    );
    let cart = cart?;

    let shipping = match profile {
        Ok(profile) => ShippingView {
            name: profile.username,
            email: profile.email,
            phone: profile.phone_number,
            address: profile.address,
        },
        Err(e) if e.is_unauthorized() => return Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load profile for checkout");
            ShippingView {
                name: user.username.clone(),
                email: user.email.clone(),
                ..ShippingView::default()
            }
        }
    };

    Ok(CheckoutTemplate {
        page,
        shipping,
        cart: CartView::from(&cart),
    })
}

/// Place the order.
///
/// An empty cart is refused before calling the API. After a successful
/// checkout the cart is cleared and the user lands on their order history.
#[instrument(skip_all)]
pub async fn place_order(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> Result<Response> {
    let marketplace = state.marketplace();
    let cart = marketplace.get_cart(&user.token).await?;

    if cart.is_empty() {
        return Ok(refused(page, &user, &cart, "Your cart is empty".to_string()));
    }

    let order = match marketplace.checkout(&user.token).await {
        Ok(order) => order,
        Err(e) if e.is_unauthorized() => return Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Checkout failed");
            let message = match e {
                MarketplaceError::Api {
                    message: Some(m), ..
                }
                | MarketplaceError::Rejected { message: Some(m) } => m,
                _ => "Failed to place order".to_string(),
            };
            return Ok(refused(page, &user, &cart, message));
        }
    };

    if let Err(e) = marketplace.clear_cart(&user.token).await {
        tracing::warn!(error = %e, order_id = %order.id, "Failed to clear cart after checkout");
    }

    add_breadcrumb("checkout", "Order placed", Some(&[("order_id", order.id.as_str())]));
    tracing::info!(order_id = %order.id, user_id = %user.id, "Order placed");

    let location = format!("/orders?placed={}", urlencoding::encode(order.id.as_str()));
    Ok(Redirect::to(&location).into_response())
}
