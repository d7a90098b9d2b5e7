//! Product route handlers.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    extract::{Path, Query, State},
    response::IntoResponse,
};
use keyzone_core::{Price, ProductCategory, ProductId, StockStatus};
use serde::Deserialize;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::marketplace::{
    MarketplaceError, Page, Pagination, Product, ProductQuery, SortField, SortOrder,
};
use crate::routes::{PageContext, Pager};
use crate::state::AppState;

/// Card descriptions are cut to this many characters.
const CARD_DESCRIPTION_LEN: usize = 100;

/// Product display data for templates.
#[derive(Clone)]
pub struct ProductView {
    pub id: String,
    pub name: String,
    pub description: String,
    pub summary: String,
    pub price: String,
    pub quantity: u32,
    pub categories: Vec<&'static str>,
    pub image: Option<String>,
    pub images: Vec<String>,
    pub stock_label: &'static str,
    pub stock_class: &'static str,
    pub in_stock: bool,
    pub created: String,
}

impl From<&Product> for ProductView {
    fn from(product: &Product) -> Self {
        let stock = product.stock_status();
        Self {
            id: product.id.to_string(),
            name: product.name.clone(),
            description: product.description.clone(),
            summary: summarize(&product.description, CARD_DESCRIPTION_LEN),
            price: Price::lkr(product.price).to_string(),
            quantity: product.quantity,
            categories: product
                .known_categories()
                .iter()
                .map(ProductCategory::label)
                .collect(),
            image: product.primary_image().map(String::from),
            images: product
                .images
                .iter()
                .filter(|url| !url.trim().is_empty())
                .cloned()
                .collect(),
            stock_label: stock.label(),
            stock_class: stock.badge_class(),
            in_stock: stock != StockStatus::OutOfStock,
            created: product
                .created_at
                .map(|at| at.format("%b %-d, %Y").to_string())
                .unwrap_or_default(),
        }
    }
}

/// Cut `text` to `max` characters, marking the cut with an ellipsis.
fn summarize(text: &str, max: usize) -> String {
    if text.chars().count() <= max {
        text.to_string()
    } else {
        let cut: String = text.chars().take(max).collect();
        format!("{}...", cut.trim_end())
    }
}

/// Listing filters as they appear in the query string.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ProductFilters {
    pub search: Option<String>,
    pub category: Option<String>,
    #[serde(rename = "sortBy")]
    pub sort_by: Option<String>,
    #[serde(rename = "sortOrder")]
    pub sort_order: Option<String>,
    pub page: Option<u32>,
}

impl ProductFilters {
    fn search(&self) -> Option<String> {
        self.search
            .as_deref()
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(String::from)
    }

    fn category(&self) -> Option<ProductCategory> {
        self.category.as_deref().and_then(|c| c.parse().ok())
    }

    fn sort_by(&self) -> SortField {
        match self.sort_by.as_deref() {
            Some("price") => SortField::Price,
            Some("name") => SortField::Name,
            _ => SortField::CreatedAt,
        }
    }

    fn sort_order(&self) -> SortOrder {
        match self.sort_order.as_deref() {
            Some("asc") => SortOrder::Asc,
            _ => SortOrder::Desc,
        }
    }

    /// API query for these filters.
    #[must_use]
    pub fn to_query(&self) -> ProductQuery {
        ProductQuery {
            search: self.search(),
            category: self.category().map(|c| c.as_str().to_string()),
            sort_by: self.sort_by(),
            sort_order: self.sort_order(),
            page: self.page.unwrap_or(1).max(1),
            ..ProductQuery::default()
        }
    }

    /// Query string reproducing these filters, without the page.
    fn base_url(&self, path: &str, include_category: bool) -> String {
        let mut params = Vec::new();
        if let Some(search) = self.search() {
            params.push(format!("search={}", urlencoding::encode(&search)));
        }
        if include_category && let Some(category) = self.category() {
            params.push(format!("category={}", category.as_str()));
        }
        params.push(format!("sortBy={}", self.sort_by().as_str()));
        params.push(format!("sortOrder={}", self.sort_order().as_str()));
        format!("{path}?{}", params.join("&"))
    }
}

/// Echo of the current filters for the filter form.
#[derive(Clone)]
pub struct FilterView {
    pub search: String,
    pub category: String,
    pub sort_by: &'static str,
    pub sort_order: &'static str,
}

impl From<&ProductFilters> for FilterView {
    fn from(filters: &ProductFilters) -> Self {
        Self {
            search: filters.search().unwrap_or_default(),
            category: filters
                .category()
                .map(|c| c.as_str().to_string())
                .unwrap_or_default(),
            sort_by: filters.sort_by().as_str(),
            sort_order: filters.sort_order().as_str(),
        }
    }
}

/// Product listing page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/index.html")]
pub struct ProductsIndexTemplate {
    pub page: PageContext,
    pub heading: String,
    pub products: Vec<ProductView>,
    pub filters: FilterView,
    /// Set when listing one category; the category menu is hidden then.
    pub fixed_category: Option<&'static str>,
    pub pager: Pager,
    pub error: Option<String>,
}

/// Product detail page template.
#[derive(Template, WebTemplate)]
#[template(path = "products/show.html")]
pub struct ProductShowTemplate {
    pub page: PageContext,
    pub product: ProductView,
}

/// Products, pagination and an error banner for a listing call. A failed
/// call renders an empty list with the error instead of an error page.
fn listing(
    result: std::result::Result<Page<Product>, MarketplaceError>,
) -> (Vec<ProductView>, Pagination, Option<String>) {
    match result {
        Ok(page) => (
            page.items.iter().map(ProductView::from).collect(),
            page.pagination,
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products");
            (Vec::new(), Pagination::default(), Some(e.user_message()))
        }
    }
}

/// Display product listing page.
#[instrument(skip(state, page))]
pub async fn index(
    State(state): State<AppState>,
    page: PageContext,
    Query(filters): Query<ProductFilters>,
) -> impl IntoResponse {
    let result = state.marketplace().list_products(&filters.to_query()).await;
    let (products, pagination, error) = listing(result);

    ProductsIndexTemplate {
        page,
        heading: "All Products".to_string(),
        products,
        filters: FilterView::from(&filters),
        fixed_category: None,
        pager: Pager::new(&pagination, &filters.base_url("/products", true)),
        error,
    }
}

/// Display the products of one category.
#[instrument(skip(state, page))]
pub async fn category(
    State(state): State<AppState>,
    page: PageContext,
    Path(category): Path<String>,
    Query(filters): Query<ProductFilters>,
) -> Result<impl IntoResponse> {
    let category: ProductCategory = category
        .parse()
        .map_err(|_| AppError::NotFound("Category".to_string()))?;

    let result = state
        .marketplace()
        .products_by_category(category, &filters.to_query())
        .await;
    let (products, pagination, error) = listing(result);
    let path = format!("/products/category/{}", category.as_str());

    Ok(ProductsIndexTemplate {
        page,
        heading: category.label().to_string(),
        products,
        filters: FilterView::from(&filters),
        fixed_category: Some(category.as_str()),
        pager: Pager::new(&pagination, &filters.base_url(&path, false)),
        error,
    })
}

/// Display product detail page.
#[instrument(skip(state, page))]
pub async fn show(
    State(state): State<AppState>,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let product = state
        .marketplace()
        .get_product(&ProductId::new(id))
        .await
        .map_err(|e| AppError::lookup(e, "Product"))?;

    Ok(ProductShowTemplate {
        page,
        product: ProductView::from(&product),
    })
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    fn product(quantity: u32) -> Product {
        serde_json::from_value(serde_json::json!({
            "_id": "665f1c2ab7",
            "name": "Elden Ring",
            "description": "Steam key",
            "price": 12500,
            "quantity": quantity,
            "categories": ["Games", "Softwares", "Music"],
            "productImgs": ["", "https://img.example/elden.png"]
        }))
        .unwrap()
    }

    #[test]
    fn test_product_view_formats() {
        let view = ProductView::from(&product(3));
        assert_eq!(view.price, "Rs 12,500.00");
        assert_eq!(view.categories, vec!["Games", "Software"]);
        assert_eq!(view.image.as_deref(), Some("https://img.example/elden.png"));
        assert_eq!(view.images.len(), 1);
        assert_eq!(view.stock_label, StockStatus::LowStock.label());
        assert!(view.in_stock);
    }

    #[test]
    fn test_out_of_stock_view() {
        let view = ProductView::from(&product(0));
        assert!(!view.in_stock);
        assert_eq!(view.stock_label, StockStatus::OutOfStock.label());
    }

    #[test]
    fn test_summarize() {
        assert_eq!(summarize("short", 100), "short");
        let long = "a".repeat(150);
        let summary = summarize(&long, 100);
        assert_eq!(summary.len(), 103);
        assert!(summary.ends_with("..."));
    }

    #[test]
    fn test_filters_to_query() {
        let filters = ProductFilters {
            search: Some("  halo ".to_string()),
            category: Some("Games".to_string()),
            sort_by: Some("price".to_string()),
            sort_order: Some("asc".to_string()),
            page: Some(0),
        };
        let query = filters.to_query();
        assert_eq!(query.search.as_deref(), Some("halo"));
        assert_eq!(query.category.as_deref(), Some("Games"));
        assert_eq!(query.sort_by, SortField::Price);
        assert_eq!(query.sort_order, SortOrder::Asc);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, 12);
    }

    #[test]
    fn test_unknown_filters_fall_back() {
        let filters = ProductFilters {
            category: Some("Music".to_string()),
            sort_by: Some("rating".to_string()),
            ..ProductFilters::default()
        };
        let query = filters.to_query();
        assert_eq!(query.category, None);
        assert_eq!(query.sort_by, SortField::CreatedAt);
        assert_eq!(query.sort_order, SortOrder::Desc);
    }

    #[test]
    fn test_base_url() {
        let filters = ProductFilters {
            search: Some("far cry".to_string()),
            ..ProductFilters::default()
        };
        assert_eq!(
            filters.base_url("/products", true),
            "/products?search=far%20cry&sortBy=createdAt&sortOrder=desc"
        );
    }
}
