//! Order endpoints.

use keyzone_core::{BearerToken, OrderId};
use reqwest::Method;
use tracing::instrument;

use super::types::{Order, OrderStats, Page, PageQuery};
use super::{MarketplaceClient, MarketplaceError};

impl MarketplaceClient {
    /// `POST /api/orders/checkout`: the server turns the cart into an order.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it (empty
    /// cart, insufficient stock).
    #[instrument(skip(self, token))]
    pub async fn checkout(&self, token: &BearerToken) -> Result<Order, MarketplaceError> {
        let builder = self.request(Method::POST, "/api/orders/checkout", Some(token))?;
        self.fetch(builder).await
    }

    /// `GET /api/orders/my-orders`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn my_orders(
        &self,
        token: &BearerToken,
        query: &PageQuery,
    ) -> Result<Page<Order>, MarketplaceError> {
        let builder = self
            .request(Method::GET, "/api/orders/my-orders", Some(token))?
            .query(query);
        self.fetch_page(builder).await
    }

    /// `GET /api/orders/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the order is not visible to
    /// this user.
    #[instrument(skip(self, token), fields(order_id = %id))]
    pub async fn get_order(
        &self,
        token: &BearerToken,
        id: &OrderId,
    ) -> Result<Order, MarketplaceError> {
        let path = format!("/api/orders/{}", urlencoding::encode(id.as_str()));
        let builder = self.request(Method::GET, &path, Some(token))?;
        self.fetch(builder).await
    }

    /// `GET /api/orders` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn all_orders(
        &self,
        token: &BearerToken,
        query: &PageQuery,
    ) -> Result<Page<Order>, MarketplaceError> {
        let builder = self
            .request(Method::GET, "/api/orders", Some(token))?
            .query(query);
        self.fetch_page(builder).await
    }

    /// `GET /api/orders/admin/stats` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn order_stats(&self, token: &BearerToken) -> Result<OrderStats, MarketplaceError> {
        let builder = self.request(Method::GET, "/api/orders/admin/stats", Some(token))?;
        Ok(self
            .execute::<OrderStats>(builder)
            .await?
            .data
            .unwrap_or_default())
    }
}
