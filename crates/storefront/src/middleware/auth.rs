//! Authentication middleware and extractors.
//!
//! Provides extractors for requiring a signed-in marketplace user in route
//! handlers. The user (and their bearer token) lives in the server-side
//! session under [`session_keys::CURRENT_USER`].

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::{Extensions, HeaderMap, Method, StatusCode, Uri, header, request::Parts},
    response::{AppendHeaders, IntoResponse, Redirect, Response},
};
use tower_sessions::Session;
use url::Url;

use crate::error::ErrorTemplate;
use crate::models::{CurrentUser, session_keys};
use crate::routes::PageContext;

/// Extractor that requires a signed-in user.
///
/// If nobody is logged in, redirects to the login page (remembering the
/// current path for GET requests).
///
/// # Example
///
/// ```rust,ignore
/// async fn protected_handler(
///     RequireAuth(user): RequireAuth,
/// ) -> impl IntoResponse {
///     format!("Hello, {}!", user.username)
/// }
/// ```
pub struct RequireAuth(pub CurrentUser);

/// Extractor that requires a signed-in admin.
///
/// Anonymous visitors are sent to login like [`RequireAuth`]; signed-in
/// non-admins get a 403 "Access Denied" page.
pub struct RequireAdmin(pub CurrentUser);

/// Error returned when authentication is required but missing or insufficient.
pub enum AuthRejection {
    /// Redirect to login page (for HTML requests).
    RedirectToLogin { location: String, htmx: bool },
    /// Unauthorized response (for API requests).
    Unauthorized,
    /// Signed in without the admin role.
    Forbidden(Box<CurrentUser>),
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        match self {
            Self::RedirectToLogin { location, htmx } => {
                if htmx {
                    (StatusCode::OK, AppendHeaders([("HX-Redirect", location)])).into_response()
                } else {
                    Redirect::to(&location).into_response()
                }
            }
            Self::Unauthorized => StatusCode::UNAUTHORIZED.into_response(),
            Self::Forbidden(user) => (
                StatusCode::FORBIDDEN,
                ErrorTemplate {
                    page: PageContext::for_user(*user),
                    status: StatusCode::FORBIDDEN.as_u16(),
                    title: "Access Denied".to_string(),
                    message: "You need admin privileges to access this page.".to_string(),
                },
            )
                .into_response(),
        }
    }
}

/// Whether the request was issued by HTMX.
#[must_use]
pub fn is_htmx(headers: &HeaderMap) -> bool {
    headers
        .get("hx-request")
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v == "true")
}

/// Build the login URL, optionally flagging an expired session and the
/// local path to return to afterwards.
#[must_use]
pub fn login_url(expired: bool, return_to: Option<&str>) -> String {
    let mut params = Vec::new();
    if expired {
        params.push("expired=1".to_string());
    }
    if let Some(path) = return_to.filter(|p| is_local_path(p)) {
        params.push(format!("redirect={}", urlencoding::encode(path)));
    }
    if params.is_empty() {
        "/auth/login".to_string()
    } else {
        format!("/auth/login?{}", params.join("&"))
    }
}

/// Only same-site absolute paths are accepted as post-login redirects.
#[must_use]
pub fn is_local_path(path: &str) -> bool {
    path.starts_with('/') && !path.starts_with("//") && !path.starts_with("/\\")
}

/// The URI as the client sent it. Nested routers only see the part after
/// their prefix.
pub(crate) fn original_uri<'a>(extensions: &'a Extensions, uri: &'a Uri) -> &'a Uri {
    extensions
        .get::<OriginalUri>()
        .map_or(uri, |original| &original.0)
}

/// Path worth returning to after login.
///
/// HTMX requests target fragment endpoints, so the page the browser shows
/// (`HX-Current-URL`) is used when it is on this host. Otherwise only GET
/// requests are remembered.
pub(crate) fn return_path(method: &Method, uri: &Uri, headers: &HeaderMap) -> Option<String> {
    if is_htmx(headers) {
        return htmx_current_path(headers, uri);
    }
    (method == Method::GET).then(|| {
        uri.path_and_query()
            .map_or_else(|| uri.path().to_string(), ToString::to_string)
    })
}

/// Path and query of `HX-Current-URL`, if it points at the requested host.
///
/// HTTP/2 requests carry the host in the URI authority instead of `Host`.
fn htmx_current_path(headers: &HeaderMap, uri: &Uri) -> Option<String> {
    let current = Url::parse(headers.get("hx-current-url")?.to_str().ok()?).ok()?;
    let host = match headers.get(header::HOST) {
        Some(host) => host.to_str().ok()?,
        None => uri.authority()?.as_str(),
    };

    let current_host = current.host_str()?;
    let same_host = match current.port() {
        Some(port) => host.eq_ignore_ascii_case(&format!("{current_host}:{port}")),
        None => host.eq_ignore_ascii_case(current_host),
    };
    if !same_host {
        return None;
    }

    Some(match current.query() {
        Some(query) => format!("{}?{query}", current.path()),
        None => current.path().to_string(),
    })
}

async fn session_user(parts: &Parts) -> Option<CurrentUser> {
    let session = parts.extensions.get::<Session>()?;
    session
        .get::<CurrentUser>(session_keys::CURRENT_USER)
        .await
        .ok()
        .flatten()
}

fn missing_user(parts: &Parts) -> AuthRejection {
    let uri = original_uri(&parts.extensions, &parts.uri);
    if uri.path().starts_with("/api/") {
        return AuthRejection::Unauthorized;
    }
    let return_to = return_path(&parts.method, uri, &parts.headers);
    AuthRejection::RedirectToLogin {
        location: login_url(false, return_to.as_deref()),
        htmx: is_htmx(&parts.headers),
    }
}

impl<S> FromRequestParts<S> for RequireAuth
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        match session_user(parts).await {
            Some(user) => Ok(Self(user)),
            None => Err(missing_user(parts)),
        }
    }
}

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let user = session_user(parts).await.ok_or_else(|| missing_user(parts))?;
        if !user.is_admin() {
            tracing::warn!(user_id = %user.id, path = %parts.uri.path(), "Non-admin denied");
            return Err(AuthRejection::Forbidden(Box::new(user)));
        }
        Ok(Self(user))
    }
}

/// Extractor that optionally gets the current user.
///
/// Unlike `RequireAuth`, this does not reject the request if nobody is logged in.
pub struct OptionalAuth(pub Option<CurrentUser>);

impl<S> FromRequestParts<S> for OptionalAuth
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        Ok(Self(session_user(parts).await))
    }
}

/// Store the signed-in user in the session.
///
/// Cycles the session id first so a pre-login session id cannot be reused.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn set_current_user(
    session: &Session,
    user: &CurrentUser,
) -> Result<(), tower_sessions::session::Error> {
    session.cycle_id().await?;
    session.insert(session_keys::CURRENT_USER, user).await
}

/// Remove the signed-in user (and with it the bearer token) from the session.
///
/// # Errors
///
/// Returns an error if the session cannot be modified.
pub async fn clear_current_user(session: &Session) -> Result<(), tower_sessions::session::Error> {
    session
        .remove::<CurrentUser>(session_keys::CURRENT_USER)
        .await?;
    session.cycle_id().await
}
