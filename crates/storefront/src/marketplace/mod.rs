//! Marketplace REST API client.
//!
//! # Architecture
//!
//! - One thin method per endpoint; no retries, batching, or caching
//! - The marketplace is the source of truth for products, carts, orders and
//!   accounts. Nothing is stored locally except the session token
//! - Authenticated calls take the caller's [`BearerToken`] explicitly, so one
//!   client instance serves every session
//!
//! # Example
//!
//! ```rust,ignore
//! use keyzone_storefront::marketplace::{MarketplaceClient, ProductQuery};
//!
//! let client = MarketplaceClient::new(&config.marketplace)?;
//! let page = client.list_products(&ProductQuery::latest(8)).await?;
//! let cart = client.add_to_cart(&token, &page.items[0].id, 1).await?;
//! ```
//!
//! [`BearerToken`]: keyzone_core::BearerToken

mod cart;
mod client;
mod orders;
mod products;
pub mod types;
mod users;

pub use client::MarketplaceClient;
pub use types::*;

use reqwest::StatusCode;
use thiserror::Error;

/// Banner text when the API could not be reached at all.
pub const NETWORK_ERROR_MESSAGE: &str =
    "Unable to connect to the server. Please check your internet connection and try again.";

/// Banner text for responses this client could not make sense of.
pub const UNEXPECTED_ERROR_MESSAGE: &str = "An unexpected error occurred. Please try again.";

/// Errors that can occur when calling the marketplace API.
#[derive(Debug, Error)]
pub enum MarketplaceError {
    /// HTTP 401: missing, invalid or expired token (or bad credentials at login).
    #[error("unauthorized: {}", .message.as_deref().unwrap_or("no message"))]
    Unauthorized { message: Option<String> },

    /// Any other non-2xx response.
    #[error("API returned {status}: {}", .message.as_deref().unwrap_or("no message"))]
    Api {
        status: StatusCode,
        message: Option<String>,
    },

    /// 2xx response whose envelope reported `success: false`.
    #[error("request rejected: {}", .message.as_deref().unwrap_or("no message"))]
    Rejected { message: Option<String> },

    /// Connection failure or timeout.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// Body could not be parsed, or `data` was missing.
    #[error("invalid response: {0}")]
    Decode(String),
}

impl MarketplaceError {
    /// HTTP status of the failed response, when there was one.
    #[must_use]
    pub const fn status(&self) -> Option<StatusCode> {
        match self {
            Self::Unauthorized { .. } => Some(StatusCode::UNAUTHORIZED),
            Self::Api { status, .. } => Some(*status),
            Self::Rejected { .. } | Self::Network(_) | Self::Decode(_) => None,
        }
    }

    #[must_use]
    pub const fn is_unauthorized(&self) -> bool {
        matches!(self, Self::Unauthorized { .. })
    }

    #[must_use]
    pub fn is_not_found(&self) -> bool {
        self.status() == Some(StatusCode::NOT_FOUND)
    }

    /// Whether the failure lies with the API or the network rather than with
    /// the user's input.
    #[must_use]
    pub fn is_server_side(&self) -> bool {
        match self {
            Self::Network(_) | Self::Decode(_) => true,
            Self::Api { status, .. } => status.is_server_error(),
            Self::Unauthorized { .. } | Self::Rejected { .. } => false,
        }
    }

    /// Text for the alert banner: the server's `message` when it sent one,
    /// otherwise a fallback chosen by status.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Unauthorized { message } => message
                .clone()
                .unwrap_or_else(|| fallback_message(StatusCode::UNAUTHORIZED)),
            Self::Api { status, message } => {
                message.clone().unwrap_or_else(|| fallback_message(*status))
            }
            Self::Rejected { message } => message
                .clone()
                .unwrap_or_else(|| UNEXPECTED_ERROR_MESSAGE.to_owned()),
            Self::Network(_) => NETWORK_ERROR_MESSAGE.to_owned(),
            Self::Decode(_) => UNEXPECTED_ERROR_MESSAGE.to_owned(),
        }
    }
}

/// Generic banner text for a status code without a server message.
#[must_use]
pub fn fallback_message(status: StatusCode) -> String {
    match status.as_u16() {
        400 => "Invalid request. Please check your input.".to_owned(),
        401 => "Invalid credentials. Please check your email and password.".to_owned(),
        403 => "Access denied. You do not have permission to perform this action.".to_owned(),
        404 => "The requested resource was not found.".to_owned(),
        409 => "A user with this email already exists.".to_owned(),
        422 => "Invalid data provided. Please check your input.".to_owned(),
        500 => "Server error. Please try again later.".to_owned(),
        other => format!("Request failed with status {other}"),
    }
}
