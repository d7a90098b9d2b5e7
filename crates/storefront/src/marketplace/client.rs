//! HTTP plumbing shared by every marketplace endpoint.

use std::sync::Arc;

use keyzone_core::BearerToken;
use reqwest::{Method, RequestBuilder};
use serde::de::DeserializeOwned;
use tracing::debug;
use url::Url;

use super::MarketplaceError;
use super::types::{Envelope, Page};
use crate::config::MarketplaceConfig;

/// Client for the marketplace REST API.
///
/// Cheap to clone; all clones share one connection pool.
#[derive(Clone)]
pub struct MarketplaceClient {
    inner: Arc<MarketplaceClientInner>,
}

struct MarketplaceClientInner {
    client: reqwest::Client,
    base_url: Url,
}

impl std::fmt::Debug for MarketplaceClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MarketplaceClient")
            .field("base_url", &self.inner.base_url.as_str())
            .finish_non_exhaustive()
    }
}

impl MarketplaceClient {
    /// Create a client for the configured API origin.
    ///
    /// # Errors
    ///
    /// Returns an error if the underlying HTTP client cannot be built.
    pub fn new(config: &MarketplaceConfig) -> Result<Self, MarketplaceError> {
        let client = reqwest::Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("keyzone-storefront/", env!("CARGO_PKG_VERSION")))
            .build()?;

        Ok(Self {
            inner: Arc::new(MarketplaceClientInner {
                client,
                base_url: api_root(&config.api_url),
            }),
        })
    }

    /// Start a request to `path` (e.g. `/api/cart/add`), attaching the bearer
    /// token when given.
    ///
    /// `path` resolves below the configured API URL, so a deployment under a
    /// path prefix keeps it.
    pub(super) fn request(
        &self,
        method: Method,
        path: &str,
        token: Option<&BearerToken>,
    ) -> Result<RequestBuilder, MarketplaceError> {
        let url = self
            .inner
            .base_url
            .join(path.trim_start_matches('/'))
            .map_err(|e| MarketplaceError::Decode(format!("invalid path {path}: {e}")))?;

        let builder = self.inner.client.request(method, url);
        Ok(match token {
            Some(token) => builder.bearer_auth(token.expose()),
            None => builder,
        })
    }

    /// Send a request and unwrap the response envelope.
    pub(super) async fn execute<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Envelope<T>, MarketplaceError> {
        let response = builder.send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            let message = error_message(&body);
            debug!(%status, message = ?message, "Marketplace API returned an error");
            if status == reqwest::StatusCode::UNAUTHORIZED {
                return Err(MarketplaceError::Unauthorized { message });
            }
            return Err(MarketplaceError::Api { status, message });
        }

        let envelope: Envelope<T> = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                error = %e,
                body = %body.chars().take(500).collect::<String>(),
                "Failed to parse marketplace response"
            );
            MarketplaceError::Decode(e.to_string())
        })?;

        if !envelope.success {
            return Err(MarketplaceError::Rejected {
                message: envelope.message,
            });
        }

        Ok(envelope)
    }

    /// Send a request whose envelope must carry `data`.
    pub(super) async fn fetch<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<T, MarketplaceError> {
        self.execute::<T>(builder)
            .await?
            .data
            .ok_or_else(|| MarketplaceError::Decode("response has no data".to_owned()))
    }

    /// Send a request for a list endpoint.
    pub(super) async fn fetch_page<T: DeserializeOwned>(
        &self,
        builder: RequestBuilder,
    ) -> Result<Page<T>, MarketplaceError> {
        let envelope = self.execute::<Vec<T>>(builder).await?;
        Ok(Page {
            items: envelope.data.unwrap_or_default(),
            pagination: envelope.pagination.unwrap_or_default(),
        })
    }

    /// Send a request whose `data`, if any, is not needed.
    pub(super) async fn send(&self, builder: RequestBuilder) -> Result<(), MarketplaceError> {
        self.execute::<serde_json::Value>(builder).await.map(drop)
    }

    /// Probe the API for the readiness check.
    ///
    /// Any HTTP response counts as reachable; only transport failures fail.
    ///
    /// # Errors
    ///
    /// Returns `MarketplaceError::Network` when the API cannot be reached.
    pub async fn ping(&self) -> Result<(), MarketplaceError> {
        let query = [("limit", "1")];
        self.request(Method::GET, "/api/products", None)?
            .query(&query)
            .send()
            .await?;
        Ok(())
    }
}

/// The API URL with a trailing slash, so relative joins stay below it.
fn api_root(url: &Url) -> Url {
    let mut root = url.clone();
    if !root.path().ends_with('/') {
        let path = format!("{}/", root.path());
        root.set_path(&path);
    }
    root
}

/// Pull `message` out of an error body, if it is JSON and has one.
fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<Envelope<serde_json::Value>>(body)
        .ok()
        .and_then(|envelope| envelope.message)
        .filter(|message| !message.trim().is_empty())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_error_message_from_envelope() {
        assert_eq!(
            error_message(r#"{"success":false,"message":"Product not found"}"#),
            Some("Product not found".to_owned())
        );
    }

    fn client_for(api_url: &str) -> MarketplaceClient {
        let config = MarketplaceConfig::new(Url::parse(api_url).unwrap());
        MarketplaceClient::new(&config).unwrap()
    }

    fn resolved(client: &MarketplaceClient, path: &str) -> String {
        client
            .request(Method::GET, path, None)
            .unwrap()
            .build()
            .unwrap()
            .url()
            .to_string()
    }

    #[test]
    fn test_paths_resolve_against_origin() {
        let client = client_for("http://localhost:3000");
        assert_eq!(
            resolved(&client, "/api/products"),
            "http://localhost:3000/api/products"
        );
    }

    #[test]
    fn test_paths_keep_api_prefix() {
        for base in ["https://shop.example/backend", "https://shop.example/backend/"] {
            let client = client_for(base);
            assert_eq!(
                resolved(&client, "/api/cart/add"),
                "https://shop.example/backend/api/cart/add",
                "{base}"
            );
        }
    }

    #[test]
    fn test_error_message_absent_or_blank() {
        assert_eq!(error_message("<html>Bad Gateway</html>"), None);
        assert_eq!(error_message(r#"{"success":false,"message":"  "}"#), None);
        assert_eq!(error_message(r#"{"success":false}"#), None);
    }
}
