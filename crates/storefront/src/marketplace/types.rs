//! Wire types for the marketplace REST API.
//!
//! The API wraps every payload in an [`Envelope`] and uses Mongo-style `_id`
//! fields. References between documents arrive either populated (the full
//! object) or as a bare id, so those fields use untagged enums.

use chrono::{DateTime, Utc};
use keyzone_core::{
    Address, OrderId, OrderStatus, ProductCategory, ProductId, StockStatus, UserId, UserRole,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

// =============================================================================
// Envelope & pagination
// =============================================================================

/// Response wrapper used by every endpoint.
///
/// A 2xx body that omits `success` is taken as successful.
#[derive(Debug, Clone, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "succeeded")]
    pub success: bool,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default = "Option::default")]
    pub data: Option<T>,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Pagination block returned by list endpoints.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
pub struct Pagination {
    #[serde(default = "first_page")]
    pub current: u32,
    #[serde(default)]
    pub pages: u32,
    #[serde(default)]
    pub total: u64,
}

const fn succeeded() -> bool {
    true
}

const fn first_page() -> u32 {
    1
}

impl Default for Pagination {
    fn default() -> Self {
        Self {
            current: 1,
            pages: 0,
            total: 0,
        }
    }
}

impl Pagination {
    #[must_use]
    pub const fn has_previous(&self) -> bool {
        self.current > 1
    }

    #[must_use]
    pub const fn has_next(&self) -> bool {
        self.current < self.pages
    }
}

/// One page of a list endpoint.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

impl<T> Page<T> {
    /// Total across all pages, falling back to this page's length when the
    /// API omitted pagination.
    #[must_use]
    pub fn total(&self) -> u64 {
        if self.pagination.total > 0 {
            self.pagination.total
        } else {
            self.items.len() as u64
        }
    }
}

// =============================================================================
// Products
// =============================================================================

/// A product listing (game key or software license).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Product {
    #[serde(rename = "_id")]
    pub id: ProductId,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub price: Decimal,
    /// Units in stock.
    #[serde(default)]
    pub quantity: u32,
    /// Category names as sent by the API (`Games`, `Softwares`).
    #[serde(default)]
    pub categories: Vec<String>,
    #[serde(default, rename = "productImgs")]
    pub images: Vec<String>,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

impl Product {
    #[must_use]
    pub const fn stock_status(&self) -> StockStatus {
        StockStatus::from_quantity(self.quantity)
    }

    #[must_use]
    pub fn primary_image(&self) -> Option<&str> {
        self.images
            .iter()
            .map(String::as_str)
            .find(|url| !url.trim().is_empty())
    }

    /// Categories this client knows how to label; unknown names are skipped.
    #[must_use]
    pub fn known_categories(&self) -> Vec<ProductCategory> {
        self.categories
            .iter()
            .filter_map(|c| c.parse().ok())
            .collect()
    }
}

/// A reference to a product: populated document or bare id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum ProductRef {
    Populated(Box<Product>),
    Id(ProductId),
}

impl ProductRef {
    #[must_use]
    pub fn id(&self) -> &ProductId {
        match self {
            Self::Populated(product) => &product.id,
            Self::Id(id) => id,
        }
    }

    #[must_use]
    pub fn product(&self) -> Option<&Product> {
        match self {
            Self::Populated(product) => Some(product),
            Self::Id(_) => None,
        }
    }
}

/// Sort field for product lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
pub enum SortField {
    #[default]
    #[serde(rename = "createdAt")]
    CreatedAt,
    #[serde(rename = "price")]
    Price,
    #[serde(rename = "name")]
    Name,
}

impl SortField {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreatedAt => "createdAt",
            Self::Price => "price",
            Self::Name => "name",
        }
    }
}

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl SortOrder {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Default products per page.
pub const DEFAULT_PRODUCT_LIMIT: u32 = 12;
/// Largest page the API accepts.
pub const MAX_LIMIT: u32 = 100;

/// Query string for `GET /api/products`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductQuery {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category: Option<String>,
    pub sort_by: SortField,
    pub sort_order: SortOrder,
    pub page: u32,
    pub limit: u32,
}

impl Default for ProductQuery {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            sort_by: SortField::default(),
            sort_order: SortOrder::default(),
            page: 1,
            limit: DEFAULT_PRODUCT_LIMIT,
        }
    }
}

impl ProductQuery {
    /// Newest products first, `limit` of them.
    #[must_use]
    pub fn latest(limit: u32) -> Self {
        Self {
            limit: limit.clamp(1, MAX_LIMIT),
            ..Self::default()
        }
    }
}

/// Query string for paginated order and user lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PageQuery {
    pub page: u32,
    pub limit: u32,
}

impl PageQuery {
    #[must_use]
    pub fn new(page: u32, limit: u32) -> Self {
        Self {
            page: page.max(1),
            limit: limit.clamp(1, MAX_LIMIT),
        }
    }
}

// =============================================================================
// Cart
// =============================================================================

/// The signed-in user's cart, exactly as the server returned it.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct Cart {
    #[serde(default)]
    pub items: Vec<CartItem>,
    #[serde(default)]
    pub total: Decimal,
}

impl Cart {
    /// Sum of line quantities, for the header badge.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.items.iter().map(|item| item.quantity).sum()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Line holding `product_id`, if any.
    #[must_use]
    pub fn line(&self, product_id: &ProductId) -> Option<&CartItem> {
        self.items
            .iter()
            .find(|item| item.product.as_ref().is_some_and(|p| p.id() == product_id))
    }
}

/// One cart line. `price` is the unit price captured when the line was added.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct CartItem {
    #[serde(default)]
    pub product: Option<ProductRef>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: Decimal,
}

/// Body for `POST /api/cart/add` and `PUT /api/cart/update`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CartItemInput<'a> {
    pub product_id: &'a ProductId,
    pub quantity: u32,
}

// =============================================================================
// Orders
// =============================================================================

/// An order snapshot created at checkout.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Order {
    #[serde(rename = "_id")]
    pub id: OrderId,
    #[serde(default)]
    pub products: Vec<OrderLine>,
    #[serde(default)]
    pub total_amount: Decimal,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
    #[serde(default)]
    pub user: Option<UserRef>,
    #[serde(default)]
    pub status: Option<OrderStatus>,
}

impl Order {
    /// Status, defaulting to completed when the API sent none.
    #[must_use]
    pub fn status(&self) -> OrderStatus {
        self.status.unwrap_or_default()
    }

    /// Total number of units across all lines.
    #[must_use]
    pub fn item_count(&self) -> u32 {
        self.products.iter().map(|line| line.quantity).sum()
    }
}

/// One order line. The product may have been deleted since (`null`).
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct OrderLine {
    #[serde(default)]
    pub product_id: Option<ProductRef>,
    #[serde(default)]
    pub quantity: u32,
    #[serde(default)]
    pub price: Decimal,
}

/// The customer who placed an order: populated summary or bare id.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(untagged)]
pub enum UserRef {
    Populated(UserSummary),
    Id(UserId),
}

impl UserRef {
    /// Best available human label.
    #[must_use]
    pub fn label(&self) -> String {
        match self {
            Self::Populated(user) if !user.username.is_empty() => user.username.clone(),
            Self::Populated(user) if !user.email.is_empty() => user.email.clone(),
            Self::Populated(user) => user.id.short().to_owned(),
            Self::Id(id) => id.short().to_owned(),
        }
    }

    #[must_use]
    pub fn email(&self) -> Option<&str> {
        match self {
            Self::Populated(user) if !user.email.is_empty() => Some(&user.email),
            _ => None,
        }
    }
}

/// Minimal populated user on an order.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct UserSummary {
    #[serde(rename = "_id")]
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
}

/// Free-form statistics from `GET /api/orders/admin/stats`.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(transparent)]
pub struct OrderStats(pub serde_json::Map<String, serde_json::Value>);

// =============================================================================
// Users
// =============================================================================

/// A marketplace account.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct User {
    #[serde(rename = "_id", alias = "id")]
    pub id: UserId,
    #[serde(default)]
    pub username: String,
    #[serde(default)]
    pub email: String,
    #[serde(default)]
    pub role: UserRole,
    #[serde(default)]
    pub phone_number: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub address: Address,
    #[serde(default, rename = "createdAt")]
    pub created_at: Option<DateTime<Utc>>,
}

/// `data` of a successful `POST /api/users/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub user: User,
    pub token: keyzone_core::BearerToken,
}

fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: serde::Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_product_from_api() {
        let product: Product = serde_json::from_value(json!({
            "_id": "665f00000000000000000001",
            "name": "Elden Ring",
            "description": "Steam key",
            "price": 12500,
            "quantity": 4,
            "categories": ["Games", "Music"],
            "productImgs": ["", "https://img.example/er.jpg"],
            "createdAt": "2026-01-15T08:30:00.000Z"
        }))
        .unwrap();
        assert_eq!(product.price, Decimal::from(12500));
        assert_eq!(product.stock_status(), StockStatus::LowStock);
        assert_eq!(product.primary_image(), Some("https://img.example/er.jpg"));
        assert_eq!(product.known_categories(), vec![ProductCategory::Games]);
        assert!(product.created_at.is_some());
    }

    #[test]
    fn test_cart_with_populated_and_bare_products() {
        let cart: Cart = serde_json::from_value(json!({
            "items": [
                {"product": {"_id": "p1", "name": "Office", "price": 9000, "quantity": 20}, "quantity": 2, "price": 9000},
                {"product": "p2", "quantity": 1, "price": 150.5},
                {"product": null, "quantity": 1, "price": 10}
            ],
            "total": 18160.5
        }))
        .unwrap();
        assert_eq!(cart.item_count(), 4);
        assert_eq!(cart.line(&ProductId::new("p2")).unwrap().quantity, 1);
        assert!(cart.items[0].product.as_ref().unwrap().product().is_some());
        assert!(cart.items[2].product.is_none());
    }

    #[test]
    fn test_order_defaults() {
        let order: Order = serde_json::from_value(json!({
            "_id": "o1",
            "products": [{"product_id": null, "quantity": 1, "price": 100}],
            "total_amount": 100,
            "user": {"_id": "u1", "username": "nimal", "email": "nimal@example.lk"}
        }))
        .unwrap();
        assert_eq!(order.status(), OrderStatus::Completed);
        assert_eq!(order.user.unwrap().label(), "nimal");

        let order: Order = serde_json::from_value(json!({
            "_id": "o2", "total_amount": 5, "user": "665f0000000000000000abcd", "status": "pending"
        }))
        .unwrap();
        assert_eq!(order.status(), OrderStatus::Pending);
        assert_eq!(order.user.unwrap().label(), "0000abcd");
    }

    #[test]
    fn test_user_with_null_address() {
        let user: User = serde_json::from_value(json!({
            "_id": "u1", "username": "admin", "email": "a@b.lk", "role": "admin", "address": null
        }))
        .unwrap();
        assert!(user.role.is_admin());
        assert!(user.address.is_blank());
    }

    #[test]
    fn test_product_query_serializes_camel_case() {
        let query = ProductQuery {
            search: Some("elden".to_owned()),
            sort_by: SortField::Price,
            sort_order: SortOrder::Asc,
            ..ProductQuery::default()
        };
        let value = serde_json::to_value(&query).unwrap();
        assert_eq!(value["sortBy"], "price");
        assert_eq!(value["sortOrder"], "asc");
        assert_eq!(value["limit"], 12);
        assert!(value.get("category").is_none());
    }

    #[test]
    fn test_page_query_clamps() {
        let query = PageQuery::new(0, 500);
        assert_eq!(query.page, 1);
        assert_eq!(query.limit, MAX_LIMIT);
    }
}
