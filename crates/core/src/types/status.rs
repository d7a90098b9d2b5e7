//! Status enums for various entities.

use serde::{Deserialize, Serialize};

/// Products at or below this quantity are flagged as low stock.
pub const LOW_STOCK_THRESHOLD: u32 = 10;

/// Order lifecycle status as reported by the marketplace.
///
/// Digital keys are delivered at checkout, so an order without a status (or
/// with one this client does not know) is shown as completed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Processing,
    Cancelled,
    #[default]
    #[serde(other)]
    Completed,
}

impl OrderStatus {
    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Processing => "Processing",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }

    /// CSS class for the status badge.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::Pending => "badge badge-info",
            Self::Processing => "badge badge-warning",
            Self::Completed => "badge badge-success",
            Self::Cancelled => "badge badge-error",
        }
    }
}

impl std::fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// Marketplace user role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum UserRole {
    /// May manage products, orders, and users.
    Admin,
    /// Regular shopper.
    #[default]
    #[serde(other)]
    User,
}

impl UserRole {
    /// Whether this role grants access to the admin panel.
    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Wire name of the role.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::User => "user",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "admin" => Ok(Self::Admin),
            "user" => Ok(Self::User),
            _ => Err(format!("invalid user role: {s}")),
        }
    }
}

/// Stock level bucket derived from a product's available quantity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StockStatus {
    InStock,
    LowStock,
    OutOfStock,
}

impl StockStatus {
    /// Classify an available quantity.
    #[must_use]
    pub const fn from_quantity(quantity: u32) -> Self {
        match quantity {
            0 => Self::OutOfStock,
            q if q <= LOW_STOCK_THRESHOLD => Self::LowStock,
            _ => Self::InStock,
        }
    }

    /// Human-readable label.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::InStock => "In stock",
            Self::LowStock => "Low stock",
            Self::OutOfStock => "Out of stock",
        }
    }

    /// CSS class for the stock badge.
    #[must_use]
    pub const fn badge_class(&self) -> &'static str {
        match self {
            Self::InStock => "badge badge-success",
            Self::LowStock => "badge badge-warning",
            Self::OutOfStock => "badge badge-error",
        }
    }
}

/// Product categories offered by the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ProductCategory {
    Games,
    Softwares,
}

impl ProductCategory {
    /// All categories, in menu order.
    pub const ALL: [Self; 2] = [Self::Games, Self::Softwares];

    /// Name used by the marketplace API and in URLs.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Games => "Games",
            Self::Softwares => "Softwares",
        }
    }

    /// Name shown to shoppers.
    #[must_use]
    pub const fn label(&self) -> &'static str {
        match self {
            Self::Games => "Games",
            Self::Softwares => "Software",
        }
    }
}

impl std::fmt::Display for ProductCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for ProductCategory {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "Games" => Ok(Self::Games),
            "Softwares" => Ok(Self::Softwares),
            _ => Err(format!("invalid product category: {s}")),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_order_status_is_completed() {
        let status: OrderStatus = serde_json::from_str("\"shipped\"").unwrap();
        assert_eq!(status, OrderStatus::Completed);
        assert_eq!(OrderStatus::default(), OrderStatus::Completed);
    }

    #[test]
    fn test_missing_order_status_is_completed() {
        #[derive(Deserialize)]
        struct Wire {
            #[serde(default)]
            status: OrderStatus,
        }

        let wire: Wire = serde_json::from_str("{}").unwrap();
        assert_eq!(wire.status, OrderStatus::Completed);
        let wire: Wire = serde_json::from_str(r#"{"status":"refunded"}"#).unwrap();
        assert_eq!(wire.status, OrderStatus::Completed);
    }

    #[test]
    fn test_order_status_wire_names() {
        let status: OrderStatus = serde_json::from_str("\"cancelled\"").unwrap();
        assert_eq!(status, OrderStatus::Cancelled);
        assert_eq!(serde_json::to_string(&OrderStatus::Pending).unwrap(), "\"pending\"");
    }

    #[test]
    fn test_unknown_role_is_user() {
        let role: UserRole = serde_json::from_str("\"moderator\"").unwrap();
        assert_eq!(role, UserRole::User);
        assert!(!role.is_admin());
        assert!("admin".parse::<UserRole>().unwrap().is_admin());
    }

    #[test]
    fn test_stock_status_thresholds() {
        assert_eq!(StockStatus::from_quantity(0), StockStatus::OutOfStock);
        assert_eq!(StockStatus::from_quantity(1), StockStatus::LowStock);
        assert_eq!(StockStatus::from_quantity(10), StockStatus::LowStock);
        assert_eq!(StockStatus::from_quantity(11), StockStatus::InStock);
    }

    #[test]
    fn test_category_names() {
        assert_eq!(ProductCategory::Softwares.as_str(), "Softwares");
        assert_eq!(ProductCategory::Softwares.label(), "Software");
        assert!("Music".parse::<ProductCategory>().is_err());
    }
}
