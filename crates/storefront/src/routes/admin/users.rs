//! Admin user management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, Query, State},
    response::{IntoResponse, Redirect, Response},
};
use keyzone_core::UserId;
use keyzone_core::validation::{FieldErrors, UserEditForm};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::marketplace::{PageQuery, User};
use crate::middleware::RequireAdmin;
use crate::models::Flash;
use crate::routes::{PageContext, PageParam, Pager, set_flash};
use crate::state::AppState;

/// Users shown per page.
const USERS_PER_PAGE: u32 = 20;

/// User row for templates.
#[derive(Clone)]
pub struct UserView {
    pub id: String,
    pub username: String,
    pub email: String,
    pub phone: String,
    pub role: &'static str,
    pub is_admin: bool,
    pub joined: String,
}

impl From<&User> for UserView {
    fn from(user: &User) -> Self {
        Self {
            id: user.id.to_string(),
            username: user.username.clone(),
            email: user.email.clone(),
            phone: user.phone_number.clone(),
            role: user.role.as_str(),
            is_admin: user.role.is_admin(),
            joined: user
                .created_at
                .map(|at| at.format("%b %-d, %Y").to_string())
                .unwrap_or_default(),
        }
    }
}

/// User table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/users.html")]
pub struct AdminUsersTemplate {
    pub page: PageContext,
    pub users: Vec<UserView>,
    pub current_user_id: String,
    pub pager: Pager,
}

/// User edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/user_form.html")]
pub struct UserFormTemplate {
    pub page: PageContext,
    pub id: String,
    pub form: UserEditForm,
    pub errors: FieldErrors,
}

/// Display the user table.
#[instrument(skip(state, admin, page))]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
    Query(param): Query<PageParam>,
) -> Result<impl IntoResponse> {
    let users = state
        .marketplace()
        .list_users(&admin.token, &PageQuery::new(param.page(), USERS_PER_PAGE))
        .await?;

    Ok(AdminUsersTemplate {
        page,
        users: users.items.iter().map(UserView::from).collect(),
        current_user_id: admin.id.to_string(),
        pager: Pager::new(&users.pagination, "/admin/users"),
    })
}

/// Display the edit form for a user.
#[instrument(skip(state, admin, page))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let user = state
        .marketplace()
        .get_user(&admin.token, &UserId::new(id))
        .await
        .map_err(|e| AppError::lookup(e, "User"))?;

    Ok(UserFormTemplate {
        page,
        id: user.id.to_string(),
        form: UserEditForm {
            username: user.username,
            email: user.email,
            role: user.role.as_str().to_string(),
        },
        errors: FieldErrors::new(),
    })
}

/// Update username, email and role.
#[instrument(skip(state, admin, session, page, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    page: PageContext,
    Path(id): Path<String>,
    Form(form): Form<UserEditForm>,
) -> Result<Response> {
    let update = match form.validate() {
        Ok(update) => update,
        Err(errors) => {
            return Ok(UserFormTemplate {
                page,
                id,
                form,
                errors,
            }
            .into_response());
        }
    };

    let user_id = UserId::new(id.as_str());
    match state
        .marketplace()
        .update_user(&admin.token, &user_id, &update)
        .await
    {
        Ok(_) => {
            tracing::info!(user_id = %user_id, role = %update.role, "User updated");
            set_flash(&session, Flash::success("User updated successfully")).await;
            Ok(Redirect::to("/admin/users").into_response())
        }
        Err(e) if e.is_unauthorized() => Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "User update failed");
            Ok(UserFormTemplate {
                page: page.with_flash(Flash::error(e.user_message())),
                id,
                form,
                errors: FieldErrors::new(),
            }
            .into_response())
        }
    }
}

/// Delete a user. Admins cannot delete their own account from here.
#[instrument(skip(state, admin, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let user_id = UserId::new(id);
    if user_id == admin.id {
        set_flash(&session, Flash::error("You cannot delete your own account")).await;
        return Ok(Redirect::to("/admin/users").into_response());
    }

    let flash = match state.marketplace().delete_user(&admin.token, &user_id).await {
        Ok(()) => {
            tracing::info!(user_id = %user_id, "User deleted");
            Flash::success("User deleted successfully")
        }
        Err(e) if e.is_unauthorized() => return Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, user_id = %user_id, "User delete failed");
            Flash::error(e.user_message())
        }
    };

    set_flash(&session, flash).await;
    Ok(Redirect::to("/admin/users").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_user_view() {
        let user: User = serde_json::from_value(serde_json::json!({
            "_id": "u7",
            "username": "ruwan",
            "email": "ruwan@example.lk",
            "role": "superuser",
            "createdAt": "2023-12-24T00:00:00Z"
        }))
        .unwrap();

        let view = UserView::from(&user);
        assert_eq!(view.role, "user");
        assert!(!view.is_admin);
        assert_eq!(view.joined, "Dec 24, 2023");
    }
}
