//! Product catalog endpoints.

use keyzone_core::validation::ProductDraft;
use keyzone_core::{BearerToken, ProductCategory, ProductId};
use reqwest::Method;
use tracing::instrument;

use super::types::{Page, Product, ProductQuery};
use super::{MarketplaceClient, MarketplaceError};

impl MarketplaceClient {
    /// `GET /api/products` with search, category, sort and pagination.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn list_products(
        &self,
        query: &ProductQuery,
    ) -> Result<Page<Product>, MarketplaceError> {
        let builder = self.request(Method::GET, "/api/products", None)?.query(query);
        self.fetch_page(builder).await
    }

    /// `GET /api/products/category/{category}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self))]
    pub async fn products_by_category(
        &self,
        category: ProductCategory,
        query: &ProductQuery,
    ) -> Result<Page<Product>, MarketplaceError> {
        let path = format!("/api/products/category/{}", category.as_str());
        let builder = self.request(Method::GET, &path, None)?.query(query);
        self.fetch_page(builder).await
    }

    /// `GET /api/products/{id}`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails; a missing product surfaces as
    /// a 404 `MarketplaceError::Api`.
    #[instrument(skip(self), fields(product_id = %id))]
    pub async fn get_product(&self, id: &ProductId) -> Result<Product, MarketplaceError> {
        let path = format!("/api/products/{}", urlencoding::encode(id.as_str()));
        let builder = self.request(Method::GET, &path, None)?;
        self.fetch(builder).await
    }

    /// `POST /api/products` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token, draft), fields(name = %draft.name))]
    pub async fn create_product(
        &self,
        token: &BearerToken,
        draft: &ProductDraft,
    ) -> Result<Product, MarketplaceError> {
        let builder = self
            .request(Method::POST, "/api/products", Some(token))?
            .json(draft);
        self.fetch(builder).await
    }

    /// `PUT /api/products/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token, draft), fields(product_id = %id))]
    pub async fn update_product(
        &self,
        token: &BearerToken,
        id: &ProductId,
        draft: &ProductDraft,
    ) -> Result<Product, MarketplaceError> {
        let path = format!("/api/products/{}", urlencoding::encode(id.as_str()));
        let builder = self.request(Method::PUT, &path, Some(token))?.json(draft);
        self.fetch(builder).await
    }

    /// `DELETE /api/products/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token), fields(product_id = %id))]
    pub async fn delete_product(
        &self,
        token: &BearerToken,
        id: &ProductId,
    ) -> Result<(), MarketplaceError> {
        let path = format!("/api/products/{}", urlencoding::encode(id.as_str()));
        let builder = self.request(Method::DELETE, &path, Some(token))?;
        self.send(builder).await
    }
}
