//! Connection pool setup.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::warn;

const CONNECT_ATTEMPTS: u32 = 3;
const CONNECT_RETRY_DELAY: Duration = Duration::from_secs(3);

fn pool_options() -> PgPoolOptions {
    PgPoolOptions::new()
        .min_connections(5)
        .max_connections(20)
        .idle_timeout(Duration::from_secs(30))
        .acquire_timeout(Duration::from_secs(2))
}

/// Connects eagerly, retrying the initial attempt a fixed number of times
/// so a briefly unavailable database at startup does not kill the process.
pub async fn connect(database_url: &str) -> Result<PgPool, sqlx::Error> {
    let mut attempt = 1u32;
    loop {
        match pool_options().connect(database_url).await {
            Ok(pool) => return Ok(pool),
            Err(err) if attempt < CONNECT_ATTEMPTS => {
                warn!(%err, attempt, "database connect failed, retrying");
                attempt += 1;
                tokio::time::sleep(CONNECT_RETRY_DELAY).await;
            }
            Err(err) => return Err(err),
        }
    }
}

/// Builds a pool without touching the network. Used by tests that only
/// need a router to exist.
pub fn connect_lazy(database_url: &str) -> Result<PgPool, sqlx::Error> {
    pool_options().connect_lazy(database_url)
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
