//! Account route handlers.
//!
//! These routes require authentication. Profile and password changes go
//! straight to the marketplace; the session copy of the user is refreshed
//! from the server's answer.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::State,
    response::{IntoResponse, Redirect, Response},
};
use keyzone_core::validation::{FieldErrors, PasswordChangeForm, ProfileForm};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::marketplace::User;
use crate::middleware::{RequireAuth, set_current_user};
use crate::models::{CurrentUser, Flash, session_keys};
use crate::routes::{PageContext, set_flash};
use crate::state::AppState;

/// Read-only account facts shown beside the profile form.
#[derive(Clone, Default)]
pub struct AccountView {
    pub email: String,
    pub role: &'static str,
    pub member_since: String,
}

impl From<&User> for AccountView {
    fn from(user: &User) -> Self {
        Self {
            email: user.email.clone(),
            role: if user.role.is_admin() { "Administrator" } else { "Customer" },
            member_since: user
                .created_at
                .map(|at| at.format("%B %Y").to_string())
                .unwrap_or_default(),
        }
    }
}

fn profile_form(user: &User) -> ProfileForm {
    ProfileForm {
        username: user.username.clone(),
        phone_number: user.phone_number.clone(),
        address: user.address.clone(),
    }
}

/// Account page template.
#[derive(Template, WebTemplate)]
#[template(path = "account.html")]
pub struct AccountTemplate {
    pub page: PageContext,
    pub account: AccountView,
    pub profile: ProfileForm,
    pub profile_errors: FieldErrors,
    pub password_errors: FieldErrors,
}

/// Display the profile page.
#[instrument(skip_all)]
pub async fn show(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    page: PageContext,
) -> Result<impl IntoResponse> {
    let profile = state.marketplace().profile(&user.token).await?;

    Ok(AccountTemplate {
        page,
        account: AccountView::from(&profile),
        profile: profile_form(&profile),
        profile_errors: FieldErrors::new(),
        password_errors: FieldErrors::new(),
    })
}

/// Fallback account facts when the profile could not be reloaded.
fn account_from_session(user: &CurrentUser) -> AccountView {
    AccountView {
        email: user.email.clone(),
        role: if user.is_admin() { "Administrator" } else { "Customer" },
        member_since: String::new(),
    }
}

/// Update username, phone number and address.
#[instrument(skip_all)]
pub async fn update_profile(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Form(form): Form<ProfileForm>,
) -> Result<Response> {
    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return Ok(AccountTemplate {
                page,
                account: account_from_session(&user),
                profile: form,
                profile_errors: errors,
                password_errors: FieldErrors::new(),
            }
            .into_response());
        }
    };

    let updated = match state.marketplace().update_profile(&user.token, &update).await {
        Ok(updated) => updated,
        Err(e) if e.is_unauthorized() => return Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Profile update failed");
            return Ok(AccountTemplate {
                page: page.with_flash(Flash::error(e.user_message())),
                account: account_from_session(&user),
                profile: form,
                profile_errors: FieldErrors::new(),
                password_errors: FieldErrors::new(),
            }
            .into_response());
        }
    };

    let refreshed = CurrentUser {
        username: updated.username,
        ..user
    };
    session
        .insert(session_keys::CURRENT_USER, &refreshed)
        .await?;

    set_flash(&session, Flash::success("Profile updated successfully")).await;
    Ok(Redirect::to("/account").into_response())
}

/// Change the password.
///
/// The current password is checked by the server.
#[instrument(skip_all)]
pub async fn change_password(
    State(state): State<AppState>,
    RequireAuth(user): RequireAuth,
    session: Session,
    page: PageContext,
    Form(form): Form<PasswordChangeForm>,
) -> Result<Response> {
    let render = |page: PageContext, profile: ProfileForm, errors: FieldErrors| AccountTemplate {
        page,
        account: account_from_session(&user),
        profile,
        profile_errors: FieldErrors::new(),
        password_errors: errors,
    };

    let change = match form.validate() {
        Ok(change) => change,
        Err(errors) => {
            let profile = reload_profile(&state, &user).await?;
            return Ok(render(page, profile, errors).into_response());
        }
    };

    match state.marketplace().change_password(&user.token, &change).await {
        Ok(()) => {
            tracing::info!(user_id = %user.id, "Password changed");
            // A new session id once the credentials change.
            set_current_user(&session, &user).await?;
            set_flash(&session, Flash::success("Password changed successfully")).await;
            Ok(Redirect::to("/account").into_response())
        }
        Err(e) if e.is_unauthorized() => Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Password change failed");
            let profile = reload_profile(&state, &user).await?;
            let page = page.with_flash(Flash::error(e.user_message()));
            Ok(render(page, profile, FieldErrors::new()).into_response())
        }
    }
}

/// Profile values for re-rendering the page; blank if the API is unavailable.
async fn reload_profile(state: &AppState, user: &CurrentUser) -> Result<ProfileForm> {
    match state.marketplace().profile(&user.token).await {
        Ok(profile) => Ok(profile_form(&profile)),
        Err(e) if e.is_unauthorized() => Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to reload profile");
            Ok(ProfileForm {
                username: user.username.clone(),
                ..ProfileForm::default()
            })
        }
    }
}
