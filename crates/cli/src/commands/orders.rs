//! Order reports.

use keyzone_core::Price;
use keyzone_storefront::marketplace::PageQuery;

use super::{CliError, api_token, client, column};

const PAGE_SIZE: u32 = 10;

/// List one page of every customer's orders.
pub async fn list(page: u32) -> Result<(), CliError> {
    let token = api_token()?;
    let orders = client()?
        .all_orders(&token, &PageQuery::new(page, PAGE_SIZE))
        .await?;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "{} {} {} {:>5} {:>16}",
            column("ORDER", 10),
            column("CUSTOMER", 24),
            column("STATUS", 11),
            "ITEMS",
            "TOTAL"
        );
        for order in &orders.items {
            let customer = order
                .user
                .as_ref()
                .map_or_else(|| "-".to_owned(), |user| user.label());
            println!(
                "{} {} {} {:>5} {:>16}",
                column(order.id.short(), 10),
                column(&customer, 24),
                column(order.status().label(), 11),
                order.item_count(),
                Price::lkr(order.total_amount).to_string()
            );
        }
        println!(
            "Page {} of {} ({} orders)",
            orders.pagination.current, orders.pagination.pages, orders.pagination.total
        );
    }
    Ok(())
}

/// Print the statistics object as the API returns it.
pub async fn stats() -> Result<(), CliError> {
    let token = api_token()?;
    let stats = client()?.order_stats(&token).await?;

    let rendered = serde_json::to_string_pretty(&stats)
        .map_err(|e| CliError::Invalid(format!("unprintable stats: {e}")))?;

    #[allow(clippy::print_stdout)]
    {
        println!("{rendered}");
    }
    Ok(())
}
