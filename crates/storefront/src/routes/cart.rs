//! Cart route handlers.
//!
//! The cart lives on the marketplace server. Every mutation renders the cart
//! the server sent back, never a locally patched copy. Cart operations use
//! HTMX for in-place updates and fall back to redirects for plain posts.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    http::HeaderMap,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use keyzone_core::{Price, ProductId, validation::validate_quantity};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result, add_breadcrumb};
use crate::filters;
use crate::marketplace::{Cart, CartItem, MarketplaceError};
use crate::middleware::{OptionalAuth, RequireAuth, is_htmx};
use crate::models::{CurrentUser, Flash};
use crate::routes::{PageContext, notify, set_flash};
use crate::state::AppState;

/// Cart item display data for templates.
#[derive(Clone)]
pub struct CartItemView {
    pub product_id: String,
    pub name: String,
    pub image: Option<String>,
    pub quantity: u32,
    /// Units in stock; the quantity controls stay within `1..=stock`.
    pub stock: u32,
    pub price: String,
    pub line_price: String,
    pub can_increase: bool,
    pub can_decrease: bool,
}

impl CartItemView {
    /// Lines whose product was deleted arrive without a product and are skipped.
    fn from_item(item: &CartItem) -> Option<Self> {
        let product_ref = item.product.as_ref()?;
        let product = product_ref.product();
        let stock = product.map_or(item.quantity, |p| p.quantity);
        let unit = Price::lkr(item.price);

        Some(Self {
            product_id: product_ref.id().to_string(),
            name: product.map_or_else(|| "Unavailable product".to_string(), |p| p.name.clone()),
            image: product.and_then(|p| p.primary_image()).map(String::from),
            quantity: item.quantity,
            stock,
            price: unit.to_string(),
            line_price: unit.times(item.quantity).to_string(),
            can_increase: item.quantity < stock,
            can_decrease: item.quantity > 1,
        })
    }

    #[must_use]
    pub const fn increment(&self) -> u32 {
        self.quantity.saturating_add(1)
    }

    #[must_use]
    pub const fn decrement(&self) -> u32 {
        self.quantity.saturating_sub(1)
    }
}

/// Cart display data for templates.
#[derive(Clone)]
pub struct CartView {
    pub items: Vec<CartItemView>,
    pub total: String,
    pub item_count: u32,
}

impl CartView {
    /// Create an empty cart.
    #[must_use]
    pub fn empty() -> Self {
        Self::from(&Cart::default())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

impl From<&Cart> for CartView {
    fn from(cart: &Cart) -> Self {
        Self {
            items: cart.items.iter().filter_map(CartItemView::from_item).collect(),
            total: Price::lkr(cart.total).to_string(),
            item_count: cart.item_count(),
        }
    }
}

/// Add to cart form data.
#[derive(Debug, Deserialize)]
pub struct AddToCartForm {
    pub product_id: String,
    pub quantity: Option<String>,
}

/// Update cart form data.
#[derive(Debug, Deserialize)]
pub struct UpdateCartForm {
    pub product_id: String,
    pub quantity: String,
}

/// Remove from cart form data.
#[derive(Debug, Deserialize)]
pub struct RemoveFromCartForm {
    pub product_id: String,
}

/// Cart page template.
#[derive(Template, WebTemplate)]
#[template(path = "cart/show.html")]
pub struct CartShowTemplate {
    pub page: PageContext,
    pub cart: CartView,
}

/// Cart items fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_items.html")]
pub struct CartItemsTemplate {
    pub cart: CartView,
}

/// Cart count badge fragment template (for HTMX).
#[derive(Template, WebTemplate)]
#[template(path = "partials/cart_count.html")]
pub struct CartCountTemplate {
    pub count: u32,
}

/// Parse a posted quantity; anything unparseable counts as zero.
fn parse_quantity(raw: Option<&str>) -> i64 {
    raw.map_or(Ok(1), |q| q.trim().parse::<i64>()).unwrap_or(0)
}

/// Turn a marketplace failure into a banner, or bail out on an expired token.
fn banner(err: MarketplaceError) -> Result<Flash> {
    if err.is_unauthorized() {
        return Err(AppError::from(err));
    }
    tracing::warn!(error = %err, "Cart request failed");
    Ok(Flash::error(err.user_message()))
}

/// Respond to a successful cart mutation with the server's cart.
fn updated(headers: &HeaderMap, cart: &Cart) -> Response {
    if is_htmx(headers) {
        (
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartItemsTemplate {
                cart: CartView::from(cart),
            },
        )
            .into_response()
    } else {
        Redirect::to("/cart").into_response()
    }
}

/// Display cart page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> Result<impl IntoResponse> {
    let cart = state.marketplace().get_cart(&user.token).await?;

    Ok(CartShowTemplate {
        page,
        cart: CartView::from(&cart),
    })
}

/// Add item to cart.
///
/// The requested quantity is checked against the product's current stock
/// before anything is sent. HTMX callers get the new count badge.
#[instrument(skip(state, session, headers, user))]
pub async fn add(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<AddToCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);
    let back = format!("/products/{product_id}");

    let product = match state.marketplace().get_product(&product_id).await {
        Ok(product) => product,
        Err(e) => return Ok(notify(&headers, &session, banner(e)?, &back).await),
    };

    let quantity = match validate_quantity(parse_quantity(form.quantity.as_deref()), product.quantity)
    {
        Ok(quantity) => quantity,
        Err(e) => return Ok(notify(&headers, &session, Flash::error(e.to_string()), &back).await),
    };

    let cart = match state
        .marketplace()
        .add_to_cart(&user.token, &product_id, quantity)
        .await
    {
        Ok(cart) => cart,
        Err(e) => return Ok(notify(&headers, &session, banner(e)?, &back).await),
    };

    add_breadcrumb("cart", "Added to cart", Some(&[("product_id", product_id.as_str())]));
    tracing::info!(product_id = %product_id, quantity, "Added to cart");

    if is_htmx(&headers) {
        return Ok((
            AppendHeaders([("HX-Trigger", "cart-updated")]),
            CartCountTemplate {
                count: cart.item_count(),
            },
        )
            .into_response());
    }

    set_flash(&session, Flash::success(format!("{} added to cart", product.name))).await;
    Ok(Redirect::to("/cart").into_response())
}

/// Units in stock for a product, preferring the populated product on the
/// cart line and falling back to fetching it.
async fn stock_for(
    state: &AppState,
    user: &CurrentUser,
    product_id: &ProductId,
) -> std::result::Result<u32, MarketplaceError> {
    let cart = state.marketplace().get_cart(&user.token).await?;
    if let Some(product) = cart
        .line(product_id)
        .and_then(|line| line.product.as_ref())
        .and_then(|p| p.product())
    {
        return Ok(product.quantity);
    }
    Ok(state.marketplace().get_product(product_id).await?.quantity)
}

/// Set a line's quantity (HTMX).
///
/// Out-of-range quantities never reach the server.
#[instrument(skip(state, session, headers, user))]
pub async fn update(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<UpdateCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);

    let stock = match stock_for(&state, &user, &product_id).await {
        Ok(stock) => stock,
        Err(e) => return Ok(notify(&headers, &session, banner(e)?, "/cart").await),
    };

    let quantity = match validate_quantity(parse_quantity(Some(&form.quantity)), stock) {
        Ok(quantity) => quantity,
        Err(e) => {
            return Ok(notify(&headers, &session, Flash::error(e.to_string()), "/cart").await);
        }
    };

    match state
        .marketplace()
        .update_cart_item(&user.token, &product_id, quantity)
        .await
    {
        Ok(cart) => Ok(updated(&headers, &cart)),
        Err(e) => Ok(notify(&headers, &session, banner(e)?, "/cart").await),
    }
}

/// Remove a line (HTMX).
#[instrument(skip(state, session, headers, user))]
pub async fn remove(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    headers: HeaderMap,
    Form(form): Form<RemoveFromCartForm>,
) -> Result<Response> {
    let product_id = ProductId::new(form.product_id);

    match state
        .marketplace()
        .remove_from_cart(&user.token, &product_id)
        .await
    {
        Ok(cart) => {
            if !is_htmx(&headers) {
                set_flash(&session, Flash::info("Item removed from cart")).await;
            }
            Ok(updated(&headers, &cart))
        }
        Err(e) => Ok(notify(&headers, &session, banner(e)?, "/cart").await),
    }
}

/// Empty the cart (HTMX).
#[instrument(skip_all)]
pub async fn clear(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    headers: HeaderMap,
) -> Result<Response> {
    match state.marketplace().clear_cart(&user.token).await {
        Ok(cart) => Ok(updated(&headers, &cart)),
        Err(e) => Ok(notify(&headers, &session, banner(e)?, "/cart").await),
    }
}

/// Cart count badge (HTMX).
///
/// Loaded by the header on every page; signed-out visitors see nothing.
#[instrument(skip_all)]
pub async fn count(
    State(state): State<AppState>,
    OptionalAuth(user): OptionalAuth,
) -> Result<impl IntoResponse> {
    let Some(user) = user else {
        return Ok(CartCountTemplate { count: 0 });
    };

    let count = match state.marketplace().get_cart(&user.token).await {
        Ok(cart) => cart.item_count(),
        Err(e) if e.is_unauthorized() => return Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load cart count");
            0
        }
    };

    Ok(CartCountTemplate { count })
}
