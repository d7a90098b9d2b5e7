//! Session database migration.
//!
//! The storefront stores nothing but sessions, so the only schema is the
//! tower-sessions table.

use keyzone_storefront::{config, db};

use super::CliError;

/// Create the session schema and table.
pub async fn run() -> Result<(), CliError> {
    let database_url = config::session_database_url()?;

    tracing::info!("Connecting to session database...");
    let pool = db::create_pool(&database_url).await?;

    tracing::info!("Creating session table...");
    db::migrate(pool).await?;

    tracing::info!("Session migrations complete!");
    Ok(())
}
