//! Session middleware configuration.
//!
//! Sessions hold the signed-in [`CurrentUser`](crate::models::CurrentUser),
//! including the marketplace bearer token, and one-shot flash messages.
//! Production uses a `PostgreSQL` store; tests plug in `MemoryStore`.

use axum::{
    extract::Request,
    http::StatusCode,
    middleware::Next,
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::{Expiry, Session, SessionManagerLayer, SessionStore};

use super::auth::{clear_current_user, is_htmx, login_url, original_uri, return_path};
use crate::config::StorefrontConfig;
use crate::error::{ErrorPage, SessionExpiredMarker, clear_sentry_user};
use crate::routes::PageContext;

/// Session cookie name.
pub const SESSION_COOKIE_NAME: &str = "kz_session";

/// Session expiry time in seconds (7 days).
const SESSION_EXPIRY_SECONDS: i64 = 7 * 24 * 60 * 60;

/// Create the session layer around any session store.
///
/// The cookie is marked `Secure` when the storefront is served over HTTPS.
#[must_use]
pub fn create_session_layer<Store>(
    store: Store,
    config: &StorefrontConfig,
) -> SessionManagerLayer<Store>
where
    Store: SessionStore + Clone,
{
    SessionManagerLayer::new(store)
        .with_name(SESSION_COOKIE_NAME)
        .with_expiry(Expiry::OnInactivity(
            tower_sessions::cookie::time::Duration::seconds(SESSION_EXPIRY_SECONDS),
        ))
        .with_secure(config.is_https())
        .with_same_site(tower_sessions::cookie::SameSite::Lax)
        .with_http_only(true)
        .with_path("/")
}

/// Sign the user out when a handler reports that the marketplace rejected
/// their token.
///
/// Handlers signal this by returning [`AppError::SessionExpired`], whose
/// response carries a [`SessionExpiredMarker`]. This layer must sit inside the
/// session layer.
///
/// [`AppError::SessionExpired`]: crate::error::AppError::SessionExpired
pub async fn session_expiry_middleware(session: Session, request: Request, next: Next) -> Response {
    let htmx = is_htmx(request.headers());
    let return_to = return_path(
        request.method(),
        original_uri(request.extensions(), request.uri()),
        request.headers(),
    );

    let response = next.run(request).await;
    if response.extensions().get::<SessionExpiredMarker>().is_none() {
        return response;
    }

    if let Err(e) = clear_current_user(&session).await {
        tracing::error!(error = %e, "Failed to clear expired session");
    }
    clear_sentry_user();
    tracing::info!("Marketplace rejected session token, signed out");

    let location = login_url(true, return_to.as_deref());
    if htmx {
        (StatusCode::OK, AppendHeaders([("HX-Redirect", location)])).into_response()
    } else {
        Redirect::to(&location).into_response()
    }
}

/// Re-render error pages with the visitor's navigation and pending flash.
///
/// `AppError` responses are built without the session; they carry an
/// [`ErrorPage`] extension that this layer picks up. Must sit inside the
/// session layer.
pub async fn error_page_middleware(session: Session, request: Request, next: Next) -> Response {
    let response = next.run(request).await;
    let Some(error_page) = response.extensions().get::<ErrorPage>().cloned() else {
        return response;
    };

    let page = PageContext::load(&session).await;
    if page.user.is_none() && page.flash.is_none() {
        return response;
    }
    error_page.render(page)
}
