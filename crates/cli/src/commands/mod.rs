//! Command implementations.
//!
//! # Environment Variables
//!
//! - `KEYZONE_DATABASE_URL` (or `DATABASE_URL`) - session database, for `migrate`
//! - `MARKETPLACE_API_URL` - marketplace API origin
//! - `KEYZONE_API_TOKEN` - admin bearer token for product/order/user commands
//! - `KZ_PASSWORD` - password for `login`

pub mod migrate;
pub mod orders;
pub mod products;
pub mod session;
pub mod users;

use keyzone_core::BearerToken;
use keyzone_storefront::config::{ConfigError, MarketplaceConfig};
use keyzone_storefront::marketplace::{MarketplaceClient, MarketplaceError};
use thiserror::Error;

/// Errors that can occur while running a command.
#[derive(Debug, Error)]
pub enum CliError {
    /// Required environment variable is missing.
    #[error("Missing environment variable: {0}")]
    MissingEnvVar(&'static str),

    /// Configuration could not be loaded.
    #[error(transparent)]
    Config(#[from] ConfigError),

    /// Database connection or migration error.
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Marketplace API call failed.
    #[error("{}", .0.user_message())]
    Marketplace(#[from] MarketplaceError),

    /// Command-line input did not validate.
    #[error("Invalid input: {0}")]
    Invalid(String),
}

/// Client for the configured marketplace API.
fn client() -> Result<MarketplaceClient, CliError> {
    let config = MarketplaceConfig::from_env()?;
    tracing::debug!(api_url = %config.api_url, "Using marketplace API");
    Ok(MarketplaceClient::new(&config)?)
}

/// Admin bearer token from `KEYZONE_API_TOKEN`.
fn api_token() -> Result<BearerToken, CliError> {
    std::env::var("KEYZONE_API_TOKEN")
        .ok()
        .map(BearerToken::new)
        .filter(|token| !token.is_empty())
        .ok_or(CliError::MissingEnvVar("KEYZONE_API_TOKEN"))
}

/// Left-pad free text to a column, cutting it at `width` characters.
fn column(text: &str, width: usize) -> String {
    let cut: String = text.chars().take(width).collect();
    format!("{cut:<width$}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_pads_and_truncates() {
        assert_eq!(column("abc", 5), "abc  ");
        assert_eq!(column("abcdefgh", 4), "abcd");
    }
}
