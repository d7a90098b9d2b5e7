//! User reports.

use keyzone_storefront::marketplace::PageQuery;

use super::{CliError, api_token, client, column};

const PAGE_SIZE: u32 = 20;

/// List one page of user accounts.
pub async fn list(page: u32) -> Result<(), CliError> {
    let token = api_token()?;
    let users = client()?
        .list_users(&token, &PageQuery::new(page, PAGE_SIZE))
        .await?;

    #[allow(clippy::print_stdout)]
    {
        println!(
            "{} {} {} {}",
            column("ID", 24),
            column("USERNAME", 20),
            column("EMAIL", 32),
            "ROLE"
        );
        for user in &users.items {
            println!(
                "{} {} {} {}",
                column(user.id.as_str(), 24),
                column(&user.username, 20),
                column(&user.email, 32),
                user.role.as_str()
            );
        }
        println!(
            "Page {} of {} ({} users)",
            users.pagination.current, users.pagination.pages, users.pagination.total
        );
    }
    Ok(())
}
