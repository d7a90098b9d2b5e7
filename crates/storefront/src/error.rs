//! Unified error handling with Sentry integration.
//!
//! Provides a unified `AppError` type that captures errors to Sentry before
//! responding to the client. All route handlers should return `Result<T, AppError>`.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use thiserror::Error;

use crate::filters;
use crate::marketplace::MarketplaceError;
use crate::routes::PageContext;

/// Where an expired session is sent.
pub const SESSION_EXPIRED_REDIRECT: &str = "/auth/login?expired=1";

/// Response extension marking that the marketplace rejected the session
/// token. The session-expiry middleware clears the stored user when it sees it.
#[derive(Debug, Clone, Copy)]
pub struct SessionExpiredMarker;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Marketplace API call failed.
    #[error("Marketplace error: {0}")]
    Marketplace(MarketplaceError),

    /// The marketplace rejected the stored token (HTTP 401).
    #[error("Session expired")]
    SessionExpired,

    /// Session store failure.
    #[error("Session error: {0}")]
    Session(#[from] tower_sessions::session::Error),

    /// Resource not found.
    #[error("Not found: {0}")]
    NotFound(String),

    /// Signed in, but not allowed.
    #[error("Forbidden: {0}")]
    Forbidden(String),

    /// Bad request from client.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal server error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl From<MarketplaceError> for AppError {
    fn from(err: MarketplaceError) -> Self {
        if err.is_unauthorized() {
            Self::SessionExpired
        } else {
            Self::Marketplace(err)
        }
    }
}

/// Full-page error template.
#[derive(Template, WebTemplate)]
#[template(path = "error.html")]
pub struct ErrorTemplate {
    pub page: PageContext,
    pub status: u16,
    pub title: String,
    pub message: String,
}

/// What an error page shows. Attached to error responses so the session
/// layer can re-render them with the visitor's navigation and flash.
#[derive(Debug, Clone)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub title: String,
    pub message: String,
}

impl ErrorPage {
    /// Render the page for `page`, keeping this extension on the response.
    #[must_use]
    pub fn render(self, page: PageContext) -> Response {
        let template = ErrorTemplate {
            page,
            status: self.status.as_u16(),
            title: self.title.clone(),
            message: self.message.clone(),
        };
        let mut response = (self.status, template).into_response();
        response.extensions_mut().insert(self);
        response
    }
}

impl AppError {
    /// Map a failed lookup: 404 becomes `NotFound(what)`, anything else
    /// converts as usual.
    #[must_use]
    pub fn lookup(err: MarketplaceError, what: &str) -> Self {
        if err.is_not_found() {
            Self::NotFound(what.to_string())
        } else {
            Self::from(err)
        }
    }

    /// HTTP status for this error.
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Marketplace(err) => match err.status() {
                Some(status) if status.is_client_error() => status,
                _ if err.is_server_side() => StatusCode::BAD_GATEWAY,
                _ => StatusCode::BAD_REQUEST,
            },
            Self::SessionExpired => StatusCode::SEE_OTHER,
            Self::Session(_) | Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Forbidden(_) => StatusCode::FORBIDDEN,
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
        }
    }

    /// Text safe to show the user. Internal details are never exposed.
    #[must_use]
    pub fn user_message(&self) -> String {
        match self {
            Self::Marketplace(err) => err.user_message(),
            Self::SessionExpired => "Session expired. Please login again.".to_string(),
            Self::Session(_) | Self::Internal(_) => {
                "Something went wrong. Please try again later.".to_string()
            }
            Self::NotFound(what) => format!("{what} not found."),
            Self::Forbidden(msg) | Self::BadRequest(msg) => msg.clone(),
        }
    }

    fn captured(&self) -> bool {
        match self {
            Self::Session(_) | Self::Internal(_) => true,
            Self::Marketplace(err) => err.is_server_side(),
            _ => false,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        if self.captured() {
            let event_id = sentry::capture_error(&self);
            tracing::error!(
                error = %self,
                sentry_event_id = %event_id,
                "Request error"
            );
        }

        if matches!(self, Self::SessionExpired) {
            let mut response = Redirect::to(SESSION_EXPIRED_REDIRECT).into_response();
            response.extensions_mut().insert(SessionExpiredMarker);
            return response;
        }

        let status = self.status();
        let title = match status {
            StatusCode::NOT_FOUND => "Not Found",
            StatusCode::FORBIDDEN => "Access Denied",
            s if s.is_server_error() => "Something went wrong",
            _ => "Request failed",
        };

        ErrorPage {
            status,
            title: title.to_string(),
            message: self.user_message(),
        }
        .render(PageContext::default())
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

/// Set the Sentry user context from a user ID.
///
/// Call this after successful authentication to associate errors with users.
pub fn set_sentry_user(user_id: &impl ToString, email: Option<&str>) {
    sentry::configure_scope(|scope| {
        scope.set_user(Some(sentry::User {
            id: Some(user_id.to_string()),
            email: email.map(String::from),
            ..Default::default()
        }));
    });
}

/// Clear the Sentry user context.
///
/// Call this on logout to stop associating errors with the user.
pub fn clear_sentry_user() {
    sentry::configure_scope(|scope| {
        scope.set_user(None);
    });
}

/// Add a breadcrumb for user actions.
///
/// ```rust,ignore
/// add_breadcrumb("cart", "Added to cart", Some(&[("product_id", id.as_str())]));
/// ```
pub fn add_breadcrumb(category: &str, message: &str, data: Option<&[(&str, &str)]>) {
    let mut breadcrumb = sentry::Breadcrumb {
        category: Some(category.to_string()),
        message: Some(message.to_string()),
        level: sentry::Level::Info,
        ..Default::default()
    };

    if let Some(pairs) = data {
        for (key, value) in pairs {
            breadcrumb.data.insert(
                (*key).to_string(),
                serde_json::Value::String((*value).to_string()),
            );
        }
    }

    sentry::add_breadcrumb(breadcrumb);
}
