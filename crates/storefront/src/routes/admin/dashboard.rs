//! Admin dashboard.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use keyzone_core::Price;
use rust_decimal::Decimal;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::marketplace::{MarketplaceError, PageQuery, ProductQuery};
use crate::middleware::RequireAdmin;
use crate::routes::PageContext;
use crate::routes::orders::OrderView;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Rows shown in each "recent" list.
const RECENT_LIMIT: u32 = 5;

/// Headline numbers. `None` means that section could not be loaded.
#[derive(Clone, Default)]
pub struct DashboardStats {
    pub total_products: Option<u64>,
    pub total_orders: Option<u64>,
    pub total_users: Option<u64>,
    /// Revenue across the recent orders only.
    pub recent_revenue: Option<String>,
}

/// Dashboard template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/dashboard.html")]
pub struct DashboardTemplate {
    pub page: PageContext,
    pub stats: DashboardStats,
    pub recent_products: Vec<ProductView>,
    pub recent_orders: Vec<OrderView>,
}

/// Log a failed section; an expired token still signs the admin out.
fn degrade(section: &str, err: MarketplaceError) -> Result<()> {
    if err.is_unauthorized() {
        return Err(AppError::from(err));
    }
    tracing::warn!(section, error = %err, "Dashboard section unavailable");
    Ok(())
}

/// Display the dashboard.
///
/// Products, orders and users are fetched concurrently and each section
/// degrades on its own.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
) -> Result<impl IntoResponse> {
    let marketplace = state.marketplace();
    let latest = ProductQuery::latest(RECENT_LIMIT);
    let recent = PageQuery::new(1, RECENT_LIMIT);
    // Only the user total is needed
    let user_count = PageQuery::new(1, 1);
    let (products, orders, users) = tokio::join!(
        marketplace.list_products(&latest),
        marketplace.all_orders(&admin.token, &recent),
        marketplace.list_users(&admin.token, &user_count),
    );

    let mut stats = DashboardStats::default();
    let mut recent_products = Vec::new();
    let mut recent_orders = Vec::new();

    match products {
        Ok(page) => {
            stats.total_products = Some(page.total());
            recent_products = page.items.iter().map(ProductView::from).collect();
        }
        Err(e) => degrade("products", e)?,
    }

    match orders {
        Ok(page) => {
            stats.total_orders = Some(page.total());
            let revenue: Decimal = page.items.iter().map(|o| o.total_amount).sum();
            stats.recent_revenue = Some(Price::lkr(revenue).to_string());
            recent_orders = page.items.iter().map(OrderView::from).collect();
        }
        Err(e) => degrade("orders", e)?,
    }

    match users {
        Ok(page) => stats.total_users = Some(page.total()),
        Err(e) => degrade("users", e)?,
    }

    Ok(DashboardTemplate {
        page,
        stats,
        recent_products,
        recent_orders,
    })
}
