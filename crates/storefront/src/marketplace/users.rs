//! Account endpoints.

use keyzone_core::validation::{Credentials, NewUser, PasswordChange, ProfileUpdate, UserUpdate};
use keyzone_core::{BearerToken, UserId};
use reqwest::Method;
use tracing::instrument;

use super::types::{LoginResponse, Page, PageQuery, User};
use super::{MarketplaceClient, MarketplaceError};

impl MarketplaceClient {
    /// `POST /api/users/register`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the
    /// registration (409 when the email is taken).
    #[instrument(skip(self, user), fields(email = %user.email))]
    pub async fn register(&self, user: &NewUser) -> Result<(), MarketplaceError> {
        let builder = self
            .request(Method::POST, "/api/users/register", None)?
            .json(user);
        self.send(builder).await
    }

    /// `POST /api/users/login`, returning the user and a fresh token.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Unauthorized` for bad credentials.
    #[instrument(skip(self, credentials), fields(email = %credentials.email))]
    pub async fn login(&self, credentials: &Credentials) -> Result<LoginResponse, MarketplaceError> {
        let builder = self
            .request(Method::POST, "/api/users/login", None)?
            .json(credentials);
        let login: LoginResponse = self.fetch(builder).await?;
        if login.token.is_empty() {
            return Err(MarketplaceError::Decode("login response has no token".to_owned()));
        }
        Ok(login)
    }

    /// `GET /api/users/profile`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn profile(&self, token: &BearerToken) -> Result<User, MarketplaceError> {
        let builder = self.request(Method::GET, "/api/users/profile", Some(token))?;
        self.fetch(builder).await
    }

    /// `PUT /api/users/profile`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the update.
    #[instrument(skip(self, token, update))]
    pub async fn update_profile(
        &self,
        token: &BearerToken,
        update: &ProfileUpdate,
    ) -> Result<User, MarketplaceError> {
        let builder = self
            .request(Method::PUT, "/api/users/profile", Some(token))?
            .json(update);
        self.fetch(builder).await
    }

    /// `PUT /api/users/change-password`.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the current password is wrong.
    #[instrument(skip(self, token, change))]
    pub async fn change_password(
        &self,
        token: &BearerToken,
        change: &PasswordChange,
    ) -> Result<(), MarketplaceError> {
        let builder = self
            .request(Method::PUT, "/api/users/change-password", Some(token))?
            .json(change);
        self.send(builder).await
    }

    /// `GET /api/users` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the token is rejected.
    #[instrument(skip(self, token))]
    pub async fn list_users(
        &self,
        token: &BearerToken,
        query: &PageQuery,
    ) -> Result<Page<User>, MarketplaceError> {
        let builder = self
            .request(Method::GET, "/api/users", Some(token))?
            .query(query);
        self.fetch_page(builder).await
    }

    /// `GET /api/users/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the user does not exist.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn get_user(&self, token: &BearerToken, id: &UserId) -> Result<User, MarketplaceError> {
        let path = format!("/api/users/{}", urlencoding::encode(id.as_str()));
        let builder = self.request(Method::GET, &path, Some(token))?;
        self.fetch(builder).await
    }

    /// `PUT /api/users/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects the update.
    #[instrument(skip(self, token, update), fields(user_id = %id))]
    pub async fn update_user(
        &self,
        token: &BearerToken,
        id: &UserId,
        update: &UserUpdate,
    ) -> Result<User, MarketplaceError> {
        let path = format!("/api/users/{}", urlencoding::encode(id.as_str()));
        let builder = self.request(Method::PUT, &path, Some(token))?.json(update);
        self.fetch(builder).await
    }

    /// `DELETE /api/users/{id}` (admin).
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the API rejects it.
    #[instrument(skip(self, token), fields(user_id = %id))]
    pub async fn delete_user(&self, token: &BearerToken, id: &UserId) -> Result<(), MarketplaceError> {
        let path = format!("/api/users/{}", urlencoding::encode(id.as_str()));
        let builder = self.request(Method::DELETE, &path, Some(token))?;
        self.send(builder).await
    }
}
