//! Cart endpoints.
//!
//! Every mutation returns the server's full cart, which callers render as-is.

use keyzone_core::{BearerToken, ProductId};
use reqwest::Method;
use tracing::instrument;

use super::types::{Cart, CartItemInput};
use super::{MarketplaceClient, MarketplaceError};

impl MarketplaceClient {
    /// `GET /api/cart`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn get_cart(&self, token: &BearerToken) -> Result<Cart, MarketplaceError> {
        let builder = self.request(Method::GET, "/api/cart", Some(token))?;
        self.fetch(builder).await
    }

    /// `POST /api/cart/add`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it (for
    /// example when stock ran out in the meantime).
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn add_to_cart(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, MarketplaceError> {
        let builder = self
            .request(Method::POST, "/api/cart/add", Some(token))?
            .json(&CartItemInput {
                product_id,
                quantity,
            });
        self.fetch(builder).await
    }

    /// `PUT /api/cart/update`, setting the line to exactly `quantity`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn update_cart_item(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
        quantity: u32,
    ) -> Result<Cart, MarketplaceError> {
        let builder = self
            .request(Method::PUT, "/api/cart/update", Some(token))?
            .json(&CartItemInput {
                product_id,
                quantity,
            });
        self.fetch(builder).await
    }

    /// `DELETE /api/cart/remove/{productId}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token), fields(product_id = %product_id))]
    pub async fn remove_from_cart(
        &self,
        token: &BearerToken,
        product_id: &ProductId,
    ) -> Result<Cart, MarketplaceError> {
        let path = format!(
            "/api/cart/remove/{}",
            urlencoding::encode(product_id.as_str())
        );
        let builder = self.request(Method::DELETE, &path, Some(token))?;
        self.fetch(builder).await
    }

    /// `DELETE /api/cart/clear`.
    ///
    /// A response without `data` is read as an empty cart.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token))]
    pub async fn clear_cart(&self, token: &BearerToken) -> Result<Cart, MarketplaceError> {
        let builder = self.request(Method::DELETE, "/api/cart/clear", Some(token))?;
        Ok(self
            .execute::<Cart>(builder)
            .await?
            .data
            .unwrap_or_default())
    }
}
