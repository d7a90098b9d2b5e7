//! Order history route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use keyzone_core::{OrderId, Price};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::marketplace::{Order, OrderLine, PageQuery};
use crate::middleware::RequireAuth;
use crate::models::Flash;
use crate::routes::{PageContext, Pager};
use crate::state::AppState;

/// Orders shown per page.
pub const ORDERS_PER_PAGE: u32 = 10;

/// One order line for templates.
#[derive(Clone)]
pub struct OrderLineView {
    pub product_id: Option<String>,
    pub name: String,
    pub quantity: u32,
    pub price: String,
    pub line_price: String,
}

impl From<&OrderLine> for OrderLineView {
    fn from(line: &OrderLine) -> Self {
        let unit = Price::lkr(line.price);
        let product = line.product_id.as_ref();
        Self {
            product_id: product.map(|p| p.id().to_string()),
            name: product
                .and_then(|p| p.product())
                .map_or_else(|| "Product no longer available".to_string(), |p| p.name.clone()),
            quantity: line.quantity,
            price: unit.to_string(),
            line_price: unit.times(line.quantity).to_string(),
        }
    }
}

/// Order display data for templates.
#[derive(Clone)]
pub struct OrderView {
    pub id: String,
    pub short_id: String,
    pub date: String,
    pub time: String,
    pub status_label: &'static str,
    pub status_class: &'static str,
    pub customer: String,
    pub customer_email: Option<String>,
    pub lines: Vec<OrderLineView>,
    pub item_count: u32,
    pub total: String,
}

impl From<&Order> for OrderView {
    fn from(order: &Order) -> Self {
        let status = order.status();
        Self {
            id: order.id.to_string(),
            short_id: order.id.short().to_string(),
            date: order
                .created_at
                .map(|at| at.format("%B %-d, %Y").to_string())
                .unwrap_or_default(),
            time: order
                .created_at
                .map(|at| at.format("%H:%M").to_string())
                .unwrap_or_default(),
            status_label: status.label(),
            status_class: status.badge_class(),
            customer: order
                .user
                .as_ref()
                .map_or_else(|| "Unknown".to_string(), |u| u.label()),
            customer_email: order.user.as_ref().and_then(|u| u.email()).map(String::from),
            lines: order.products.iter().map(OrderLineView::from).collect(),
            item_count: order.item_count(),
            total: Price::lkr(order.total_amount).to_string(),
        }
    }
}

/// Order history query parameters.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct OrdersQuery {
    pub page: Option<u32>,
    /// Id of an order just placed at checkout.
    pub placed: Option<String>,
}

/// Order history page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/index.html")]
pub struct OrdersIndexTemplate {
    pub page: PageContext,
    pub orders: Vec<OrderView>,
    pub pager: Pager,
}

/// Order detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "orders/show.html")]
pub struct OrderShowTemplate {
    pub page: PageContext,
    pub order: OrderView,
    pub back_url: &'static str,
}

/// Display the signed-in user's orders.
#[instrument(skip(state, user, page))]
pub async fn index(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Query(query): Query<OrdersQuery>,
) -> Result<impl IntoResponse> {
    let page_query = PageQuery::new(query.page.unwrap_or(1), ORDERS_PER_PAGE);
    let orders = state
        .marketplace()
        .my_orders(&user.token, &page_query)
        .await?;

    let page = match query.placed.as_deref() {
        Some(id) if !id.is_empty() => page.with_flash(Flash::success(format!(
            "Order placed successfully! Order #{}",
            OrderId::new(id).short()
        ))),
        _ => page,
    };

    Ok(OrdersIndexTemplate {
        page,
        orders: orders.items.iter().map(OrderView::from).collect(),
        pager: Pager::new(&orders.pagination, "/orders"),
    })
}

/// Display one of the signed-in user's orders.
#[instrument(skip(state, user, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let order = state
        .marketplace()
        .get_order(&user.token, &OrderId::new(id))
        .await
        .map_err(|e| AppError::lookup(e, "Order"))?;

    Ok(OrderShowTemplate {
        page,
        order: OrderView::from(&order),
        back_url: "/orders",
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use keyzone_core::OrderStatus;

    #[test]
    fn test_order_view() {
        let order: Order = serde_json::from_value(serde_json::json!({
            "_id": "6660aa00bb11cc22dd33ee44",
            "products": [
                {
                    "product_id": {"_id": "p1", "name": "Cyberpunk 2077", "price": 4500, "quantity": 9},
                    "quantity": 2,
                    "price": 4500
                },
                {"product_id": null, "quantity": 1, "price": 1000}
            ],
            "total_amount": 10000,
            "createdAt": "2024-06-05T10:30:00Z",
            "user": {"_id": "u1", "username": "nimal", "email": "nimal@example.lk"}
        }))
        .unwrap();

        let view = OrderView::from(&order);
        assert_eq!(view.short_id, "dd33ee44");
        assert_eq!(view.date, "June 5, 2024");
        assert_eq!(view.status_label, OrderStatus::Completed.label());
        assert_eq!(view.customer, "nimal");
        assert_eq!(view.customer_email.as_deref(), Some("nimal@example.lk"));
        assert_eq!(view.item_count, 3);
        assert_eq!(view.total, "Rs 10,000.00");
        assert_eq!(view.lines[0].line_price, "Rs 9,000.00");
        assert_eq!(view.lines[1].name, "Product no longer available");
        assert_eq!(view.lines[1].product_id, None);
    }
}
