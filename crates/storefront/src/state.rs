//! Application state shared across handlers.

use std::sync::Arc;

use crate::config::StorefrontConfig;
use crate::marketplace::{MarketplaceClient, MarketplaceError};

/// Application state shared across all handlers.
///
/// Cheaply cloneable via `Arc`. The storefront keeps no business data of its
/// own, so this is just configuration plus the marketplace client.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<AppStateInner>,
}

struct AppStateInner {
    config: StorefrontConfig,
    marketplace: MarketplaceClient,
}

impl AppState {
    /// Create a new application state.
    ///
    /// # Errors
    ///
    /// Returns an error if the marketplace HTTP client cannot be built.
    pub fn new(config: StorefrontConfig) -> Result<Self, MarketplaceError> {
        let marketplace = MarketplaceClient::new(&config.marketplace)?;

        Ok(Self {
            inner: Arc::new(AppStateInner {
                config,
                marketplace,
            }),
        })
    }

    /// Get a reference to the storefront configuration.
    #[must_use]
    pub fn config(&self) -> &StorefrontConfig {
        &self.inner.config
    }

    /// Get a reference to the marketplace API client.
    #[must_use]
    pub fn marketplace(&self) -> &MarketplaceClient {
        &self.inner.marketplace
    }
}
