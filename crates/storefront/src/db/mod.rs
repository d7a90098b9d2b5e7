//! Session database for the storefront.
//!
//! The storefront keeps no business data; `PostgreSQL` only backs the
//! tower-sessions store (`tower_sessions.session` table). The table is
//! created by:
//!
//! ```bash
//! kz-cli migrate
//! ```

use std::time::Duration;

use secrecy::{ExposeSecret, SecretString};
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tower_sessions_sqlx_store::PostgresStore;

/// Create a `PostgreSQL` connection pool for the session store.
///
/// # Errors
///
/// Returns `sqlx::Error` if the connection cannot be established.
pub async fn create_pool(database_url: &SecretString) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(10)
        .min_connections(1)
        .acquire_timeout(Duration::from_secs(10))
        .connect(database_url.expose_secret())
        .await
}

/// Session store over `pool`.
#[must_use]
pub fn session_store(pool: PgPool) -> PostgresStore {
    PostgresStore::new(pool)
}

/// Create the session schema and table if missing.
///
/// # Errors
///
/// Returns `sqlx::Error` if the migration statements fail.
pub async fn migrate(pool: PgPool) -> Result<(), sqlx::Error> {
    session_store(pool).migrate().await
}
