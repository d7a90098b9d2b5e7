//! Product administration.

use keyzone_core::{Price, ProductCategory, ProductId};
use keyzone_storefront::marketplace::{MAX_LIMIT, ProductQuery};

use super::{CliError, api_token, client, column};

/// List products, newest first, optionally filtered.
pub async fn list(category: Option<&str>, search: Option<String>) -> Result<(), CliError> {
    let client = client()?;
    let query = ProductQuery {
        search,
        ..ProductQuery::latest(MAX_LIMIT)
    };

    let page = match category {
        Some(raw) => {
            let category: ProductCategory = raw.parse().map_err(CliError::Invalid)?;
            client.products_by_category(category, &query).await?
        }
        None => client.list_products(&query).await?,
    };

    #[allow(clippy::print_stdout)]
    {
        println!(
            "{} {} {:>16} {:>6}  CATEGORIES",
            column("ID", 24),
            column("NAME", 32),
            "PRICE",
            "STOCK"
        );
        for product in &page.items {
            println!(
                "{} {} {:>16} {:>6}  {}",
                column(product.id.as_str(), 24),
                column(&product.name, 32),
                Price::lkr(product.price).to_string(),
                product.quantity,
                product.categories.join(", ")
            );
        }
        println!("{} of {} products", page.items.len(), page.total());
    }
    Ok(())
}

/// Delete one product.
pub async fn delete(id: &str) -> Result<(), CliError> {
    let token = api_token()?;
    let id = ProductId::new(id);

    client()?.delete_product(&token, &id).await?;
    tracing::info!(product_id = %id, "Product deleted");
    Ok(())
}
