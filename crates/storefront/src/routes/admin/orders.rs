//! Admin order overview.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use chrono::{DateTime, NaiveDate, Utc};
use keyzone_core::{OrderId, Price};
use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::marketplace::{Order, PageQuery};
use crate::middleware::RequireAdmin;
use crate::routes::orders::{ORDERS_PER_PAGE, OrderShowTemplate, OrderView};
use crate::routes::{PageContext, PageParam, Pager};
use crate::state::AppState;

/// Summary figures above the order table.
///
/// `total` counts every order; the rest are computed from the orders on the
/// current page.
#[derive(Clone)]
pub struct OrderSummary {
    pub total: u64,
    pub today: usize,
    pub revenue: String,
    pub average: String,
}

impl OrderSummary {
    fn compute(orders: &[Order], total: u64, today: NaiveDate) -> Self {
        let revenue: Decimal = orders.iter().map(|o| o.total_amount).sum();
        let average = if orders.is_empty() {
            Decimal::ZERO
        } else {
            revenue / Decimal::from(orders.len())
        };
        let placed_today = orders
            .iter()
            .filter(|o| o.created_at.map(|at: DateTime<Utc>| at.date_naive()) == Some(today))
            .count();

        Self {
            total,
            today: placed_today,
            revenue: Price::lkr(revenue).to_string(),
            average: Price::lkr(average).to_string(),
        }
    }
}

/// Admin orders template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/orders.html")]
pub struct AdminOrdersTemplate {
    pub page: PageContext,
    pub summary: OrderSummary,
    pub orders: Vec<OrderView>,
    pub pager: Pager,
}

/// Display every customer's orders, newest first.
#[instrument(skip(state, admin, page))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
    Query(param): Query<PageParam>,
) -> Result<impl IntoResponse> {
    let orders = state
        .marketplace()
        .all_orders(&admin.token, &PageQuery::new(param.page(), ORDERS_PER_PAGE))
        .await?;

    Ok(AdminOrdersTemplate {
        page,
        summary: OrderSummary::compute(&orders.items, orders.total(), Utc::now().date_naive()),
        orders: orders.items.iter().map(OrderView::from).collect(),
        pager: Pager::new(&orders.pagination, "/admin/orders"),
    })
}

/// Display one order with its customer.
#[instrument(skip(state, admin, page))]
pub async fn show(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let order = state
        .marketplace()
        .get_order(&admin.token, &OrderId::new(id))
        .await
        .map_err(|e| AppError::lookup(e, "Order"))?;

    Ok(OrderShowTemplate {
        page,
        order: OrderView::from(&order),
        back_url: "/admin/orders",
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn order(id: &str, amount: u32, created: &str) -> Order {
        serde_json::from_value(serde_json::json!({
            "_id": id,
            "products": [],
            "total_amount": amount,
            "createdAt": created
        }))
        .unwrap()
    }

    #[test]
    fn test_summary() {
        let orders = vec![
            order("o1", 3000, "2024-06-05T09:00:00Z"),
            order("o2", 1000, "2024-06-05T23:59:00Z"),
            order("o3", 2000, "2024-06-04T12:00:00Z"),
        ];
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();

        let summary = OrderSummary::compute(&orders, 42, today);
        assert_eq!(summary.total, 42);
        assert_eq!(summary.today, 2);
        assert_eq!(summary.revenue, "Rs 6,000.00");
        assert_eq!(summary.average, "Rs 2,000.00");
    }

    #[test]
    fn test_summary_of_empty_page() {
        let today = NaiveDate::from_ymd_opt(2024, 6, 5).unwrap();
        let summary = OrderSummary::compute(&[], 0, today);
        assert_eq!(summary.today, 0);
        assert_eq!(summary.average, "Rs 0.00");
    }
}
