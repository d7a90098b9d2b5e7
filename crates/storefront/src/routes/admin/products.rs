//! Admin product management.

use askama::Template;
use askama_web::WebTemplate;
use axum::{
    Form,
    extract::{Path, State},
    response::{IntoResponse, Redirect, Response},
};
use keyzone_core::validation::{FieldErrors, ProductForm};
use keyzone_core::{ProductCategory, ProductId};
use tower_sessions::Session;
use tracing::instrument;

use crate::error::{AppError, Result};
use crate::filters;
use crate::marketplace::{MAX_LIMIT, Product, ProductQuery};
use crate::middleware::RequireAdmin;
use crate::models::Flash;
use crate::routes::products::ProductView;
use crate::routes::{PageContext, set_flash};
use crate::state::AppState;

/// Product table template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/products.html")]
pub struct AdminProductsTemplate {
    pub page: PageContext,
    pub products: Vec<ProductView>,
    pub total: u64,
    pub error: Option<String>,
}

/// Create/edit form template.
#[derive(Template, WebTemplate)]
#[template(path = "admin/product_form.html")]
pub struct ProductFormTemplate {
    pub page: PageContext,
    pub heading: &'static str,
    pub action: String,
    pub submit_label: &'static str,
    pub form: ProductForm,
    pub errors: FieldErrors,
}

impl ProductFormTemplate {
    fn new_product(page: PageContext, form: ProductForm, errors: FieldErrors) -> Self {
        Self {
            page,
            heading: "Add New Product",
            action: "/admin/products/new".to_string(),
            submit_label: "Create Product",
            form,
            errors,
        }
    }

    fn edit_product(
        page: PageContext,
        id: &ProductId,
        form: ProductForm,
        errors: FieldErrors,
    ) -> Self {
        Self {
            page,
            heading: "Edit Product",
            action: format!("/admin/products/{}/edit", urlencoding::encode(id.as_str())),
            submit_label: "Update Product",
            form,
            errors,
        }
    }
}

/// Prefill the form from an existing product.
fn form_from_product(product: &Product) -> ProductForm {
    let categories = product.known_categories();
    let checked = |category: ProductCategory| categories.contains(&category).then(|| "on".to_string());
    ProductForm {
        name: product.name.clone(),
        description: product.description.clone(),
        price: product.price.normalize().to_string(),
        quantity: product.quantity.to_string(),
        category_games: checked(ProductCategory::Games),
        category_softwares: checked(ProductCategory::Softwares),
        images: product.images.join("\n"),
    }
}

/// Display the product table.
#[instrument(skip_all)]
pub async fn index(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    page: PageContext,
) -> impl IntoResponse {
    let query = ProductQuery::latest(MAX_LIMIT);
    let (products, total, error) = match state.marketplace().list_products(&query).await {
        Ok(list) => (
            list.items.iter().map(ProductView::from).collect(),
            list.total(),
            None,
        ),
        Err(e) => {
            tracing::warn!(error = %e, "Failed to load products");
            (Vec::new(), 0, Some("Failed to fetch products".to_string()))
        }
    };

    AdminProductsTemplate {
        page,
        products,
        total,
        error,
    }
}

/// Display the empty product form.
pub async fn new_form(RequireAdmin(_admin): RequireAdmin, page: PageContext) -> impl IntoResponse {
    ProductFormTemplate::new_product(page, ProductForm::default(), FieldErrors::new())
}

/// Create a product.
#[instrument(skip_all)]
pub async fn create(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    page: PageContext,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(ProductFormTemplate::new_product(page, form, errors).into_response());
        }
    };

    match state.marketplace().create_product(&admin.token, &draft).await {
        Ok(product) => {
            tracing::info!(product_id = %product.id, "Product created");
            set_flash(&session, Flash::success("Product created successfully")).await;
            Ok(Redirect::to("/admin/products").into_response())
        }
        Err(e) if e.is_unauthorized() => Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Product create failed");
            let page = page.with_flash(Flash::error(e.user_message()));
            Ok(ProductFormTemplate::new_product(page, form, FieldErrors::new()).into_response())
        }
    }
}

/// Display the edit form for a product.
#[instrument(skip(state, _admin, page))]
pub async fn edit_form(
    State(state): State<AppState>,
    RequireAdmin(_admin): RequireAdmin,
    page: PageContext,
    Path(id): Path<String>,
) -> Result<impl IntoResponse> {
    let id = ProductId::new(id);
    let product = state
        .marketplace()
        .get_product(&id)
        .await
        .map_err(|e| AppError::lookup(e, "Product"))?;

    Ok(ProductFormTemplate::edit_product(
        page,
        &id,
        form_from_product(&product),
        FieldErrors::new(),
    ))
}

/// Update a product.
#[instrument(skip(state, admin, session, page, form))]
pub async fn update(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    page: PageContext,
    Path(id): Path<String>,
    Form(form): Form<ProductForm>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let draft = match form.validate() {
        Ok(draft) => draft,
        Err(errors) => {
            return Ok(ProductFormTemplate::edit_product(page, &id, form, errors).into_response());
        }
    };

    match state
        .marketplace()
        .update_product(&admin.token, &id, &draft)
        .await
    {
        Ok(_) => {
            tracing::info!(product_id = %id, "Product updated");
            set_flash(&session, Flash::success("Product updated successfully")).await;
            Ok(Redirect::to("/admin/products").into_response())
        }
        Err(e) if e.is_unauthorized() => Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, "Product update failed");
            let page = page.with_flash(Flash::error(e.user_message()));
            Ok(ProductFormTemplate::edit_product(page, &id, form, FieldErrors::new()).into_response())
        }
    }
}

/// Delete a product. The browser asks for confirmation first.
#[instrument(skip(state, admin, session))]
pub async fn delete(
    State(state): State<AppState>,
    RequireAdmin(admin): RequireAdmin,
    session: Session,
    Path(id): Path<String>,
) -> Result<Response> {
    let id = ProductId::new(id);
    let flash = match state.marketplace().delete_product(&admin.token, &id).await {
        Ok(()) => {
            tracing::info!(product_id = %id, "Product deleted");
            Flash::success("Product deleted successfully")
        }
        Err(e) if e.is_unauthorized() => return Err(AppError::from(e)),
        Err(e) => {
            tracing::warn!(error = %e, product_id = %id, "Product delete failed");
            Flash::error("Failed to delete product")
        }
    };

    set_flash(&session, flash).await;
    Ok(Redirect::to("/admin/products").into_response())
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_form_from_product_round_trips_through_validation() {
        let product: Product = serde_json::from_value(serde_json::json!({
            "_id": "p9",
            "name": "Windows 11 Pro",
            "description": "Retail license",
            "price": 15999.5,
            "quantity": 40,
            "categories": ["Softwares"],
            "productImgs": ["https://img.example/win.png"]
        }))
        .unwrap();

        let form = form_from_product(&product);
        assert_eq!(form.price, "15999.5");
        assert_eq!(form.category_games, None);
        assert!(form.category_softwares.is_some());

        let draft = form.validate().unwrap();
        assert_eq!(draft.name, "Windows 11 Pro");
        assert_eq!(draft.quantity, 40);
        assert_eq!(draft.categories, vec![ProductCategory::Softwares]);
        assert_eq!(draft.images, vec!["https://img.example/win.png".to_string()]);
    }
}
