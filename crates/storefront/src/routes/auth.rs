//! Authentication route handlers.
//!
//! Login exchanges credentials for a marketplace bearer token, which is kept
//! in the server-side session. Registration only creates the account; the
//! user signs in afterwards.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Query, State},
    response::{IntoResponse, Redirect, Response},
};
use keyzone_core::validation::{FieldErrors, LoginForm, RegistrationForm};
use serde::Deserialize;
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{Result, clear_sentry_user, set_sentry_user};
use crate::filters;
use crate::middleware::auth::is_local_path;
use crate::middleware::{clear_current_user, set_current_user};
use crate::models::{CurrentUser, Flash};
use crate::routes::{PageContext, set_flash};
use crate::state::AppState;

// =============================================================================
// Query Types
// =============================================================================

/// Query parameters for the login page.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginQuery {
    /// Local path to return to after login.
    pub redirect: Option<String>,
    /// Set when the previous session was rejected by the API.
    pub expired: Option<String>,
}

// =============================================================================
// Templates
// =============================================================================

/// Login page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/login.html")]
pub struct LoginTemplate {
    pub page: PageContext,
    pub email: String,
    pub redirect: String,
    pub errors: FieldErrors,
}

/// Register page template.
#[derive(Template, WebTemplate)]
#[template(path = "auth/register.html")]
pub struct RegisterTemplate {
    pub page: PageContext,
    pub form: RegistrationForm,
    pub errors: FieldErrors,
}

/// Where to go after login: the requested local path, or home.
fn post_login_target(redirect: Option<&str>) -> &str {
    match redirect.map(str::trim) {
        Some(path) if is_local_path(path) && !path.starts_with("/auth/") => path,
        _ => "/",
    }
}

// =============================================================================
// Login Routes
// =============================================================================

/// Display the login page.
pub async fn login_page(page: PageContext, Query(query): Query<LoginQuery>) -> Response {
    if page.user.is_some() {
        return Redirect::to(post_login_target(query.redirect.as_deref())).into_response();
    }

    let page = if query.expired.is_some() && page.flash.is_none() {
        page.with_flash(Flash::info("Session expired. Please login again."))
    } else {
        page
    };

    LoginTemplate {
        page,
        email: String::new(),
        redirect: query.redirect.unwrap_or_default(),
        errors: FieldErrors::new(),
    }
    .into_response()
}

/// Handle login form submission.
///
/// A 401 here means bad credentials and is shown on the form; it is not a
/// session expiry.
#[instrument(skip_all)]
pub async fn login(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<LoginForm>,
) -> Result<Response> {
    let render = |page: PageContext, errors: FieldErrors| LoginTemplate {
        page,
        email: form.email.trim().to_string(),
        redirect: form.redirect.clone().unwrap_or_default(),
        errors,
    };

    let credentials = match form.validate() {
        Ok(credentials) => credentials,
        Err(errors) => return Ok(render(page, errors).into_response()),
    };

    let login = match state.marketplace().login(&credentials).await {
        Ok(login) => login,
        Err(e) => {
            tracing::warn!(error = %e, "Login failed");
            let page = page.with_flash(Flash::error(e.user_message()));
            return Ok(render(page, FieldErrors::new()).into_response());
        }
    };

    let user = CurrentUser::from(login);
    set_current_user(&session, &user).await?;
    set_sentry_user(&user.id, Some(&user.email));
    tracing::info!(user_id = %user.id, admin = user.is_admin(), "User logged in");

    Ok(Redirect::to(post_login_target(form.redirect.as_deref())).into_response())
}

/// Handle logout.
#[instrument(skip_all)]
pub async fn logout(session: Session) -> Result<Response> {
    clear_current_user(&session).await?;
    clear_sentry_user();
    set_flash(&session, Flash::info("You have been logged out.")).await;
    Ok(Redirect::to("/").into_response())
}

// =============================================================================
// Registration Routes
// =============================================================================

/// Display the registration page.
pub async fn register_page(page: PageContext) -> impl IntoResponse {
    RegisterTemplate {
        page,
        form: RegistrationForm::default(),
        errors: FieldErrors::new(),
    }
}

/// Handle registration form submission.
///
/// Nothing is sent to the API unless every field validates.
#[instrument(skip_all)]
pub async fn register(
    State(state): State<AppState>,
    session: Session,
    page: PageContext,
    Form(form): Form<RegistrationForm>,
) -> Result<Response> {
    let new_user = match form.validate() {
        Ok(new_user) => new_user,
        Err(errors) => {
            return Ok(RegisterTemplate {
                page,
                form: without_passwords(form),
                errors,
            }
            .into_response());
        }
    };

    if let Err(e) = state.marketplace().register(&new_user).await {
        tracing::warn!(error = %e, "Registration failed");
        return Ok(RegisterTemplate {
            page: page.with_flash(Flash::error(e.user_message())),
            form: without_passwords(form),
            errors: FieldErrors::new(),
        }
        .into_response());
    }

    tracing::info!(username = %new_user.username, "User registered");
    set_flash(&session, Flash::success("Registration successful! Please sign in.")).await;
    Ok(Redirect::to("/auth/login").into_response())
}

/// The form as echoed back to the browser.
fn without_passwords(form: RegistrationForm) -> RegistrationForm {
    RegistrationForm {
        password: String::new(),
        confirm_password: String::new(),
        ..form
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_post_login_target() {
        assert_eq!(post_login_target(None), "/");
        assert_eq!(post_login_target(Some("/cart")), "/cart");
        assert_eq!(post_login_target(Some("//evil.example")), "/");
        assert_eq!(post_login_target(Some("https://evil.example")), "/");
        assert_eq!(post_login_target(Some("/auth/login")), "/");
    }

    #[test]
    fn test_without_passwords() {
        let form = RegistrationForm {
            username: "kasun".to_string(),
            password: "secret1".to_string(),
            confirm_password: "secret1".to_string(),
            ..RegistrationForm::default()
        };
        let echoed = without_passwords(form);
        assert_eq!(echoed.username, "kasun");
        assert!(echoed.password.is_empty());
        assert!(echoed.confirm_password.is_empty());
    }
}
