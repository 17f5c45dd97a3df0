use std::sync::Arc;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::config::AppConfig;
use crate::models::store::{PgUsulanStore, UnavailableStore, UsulanStore};

pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

pub async fn init_pool(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(database_url)
        .await
}

pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    MIGRATOR.run(pool).await?;
    log::info!("Database migrations complete");
    Ok(())
}

/// Pick the record store for this process.
///
/// No usable `DATABASE_URL`, or a backend that cannot be reached/migrated at
/// start-up, yields `UnavailableStore`: requests then fail with 503 instead of
/// returning empty pages.
pub async fn connect_store(config: &AppConfig) -> Arc<dyn UsulanStore> {
    let Some(url) = config.database_url.as_deref() else {
        log::warn!("DATABASE_URL not set or placeholder; database operations are disabled");
        return Arc::new(UnavailableStore);
    };

    let pool = match init_pool(url, config.database_max_connections).await {
        Ok(pool) => pool,
        Err(e) => {
            log::error!("Failed to connect to database: {e}");
            return Arc::new(UnavailableStore);
        }
    };

    if let Err(e) = run_migrations(&pool).await {
        log::error!("Failed to run migrations: {e}");
        return Arc::new(UnavailableStore);
    }

    Arc::new(PgUsulanStore::new(pool))
}
