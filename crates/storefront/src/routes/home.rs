//! Home page route handler.

use askama::Template;
use askama_web::WebTemplate;
use axum::{extract::State, response::IntoResponse};
use keyzone_core::ProductCategory;
use tracing::instrument;

use crate::filters;
use crate::marketplace::ProductQuery;
use crate::routes::PageContext;
use crate::routes::products::ProductView;
use crate::state::AppState;

/// Number of newest products shown on the home page.
const FEATURED_PRODUCT_COUNT: u32 = 6;

/// A category tile linking to its listing.
#[derive(Clone)]
pub struct CategoryTile {
    pub url: String,
    pub title: &'static str,
    pub blurb: &'static str,
}

impl From<ProductCategory> for CategoryTile {
    fn from(category: ProductCategory) -> Self {
        Self {
            url: format!("/products/category/{}", category.as_str()),
            title: category.label(),
            blurb: match category {
                ProductCategory::Games => "Latest game keys and digital downloads",
                ProductCategory::Softwares => "Professional software and productivity tools",
            },
        }
    }
}

/// Home page template.
#[derive(Template, WebTemplate)]
#[template(path = "home.html")]
pub struct HomeTemplate {
    pub page: PageContext,
    pub categories: Vec<CategoryTile>,
    pub featured: Vec<ProductView>,
}

/// Display the home page.
///
/// The featured section is simply left empty if the API is down.
#[instrument(skip(state, page))]
pub async fn home(State(state): State<AppState>, page: PageContext) -> impl IntoResponse {
    let featured = match state
        .marketplace()
        .list_products(&ProductQuery::latest(FEATURED_PRODUCT_COUNT))
        .await
    {
        Ok(products) => products.items.iter().map(ProductView::from).collect(),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load featured products");
            Vec::new()
        }
    };

    HomeTemplate {
        page,
        categories: ProductCategory::ALL.into_iter().map(CategoryTile::from).collect(),
        featured,
    }
}
