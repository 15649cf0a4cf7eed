use axum::Router;
use goldapi_core::config::{AppConfig, ConfigError};
use goldapi_db::{connect_with_settings, migrations, DbPool};
use thiserror::Error;
use tracing::info;

use crate::{api, health};

pub struct Application {
    pub config: AppConfig,
    pub db_pool: DbPool,
    pub state: api::AppState,
}

#[derive(Debug, Error)]
pub enum BootstrapError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("database connection failed: {0}")]
    DatabaseConnect(#[source] sqlx::Error),
    #[error("database migration failed: {0}")]
    Migration(#[source] sqlx::migrate::MigrateError),
}

impl Application {
    /// API routes plus `/health`, sharing one pool.
    pub fn router(&self) -> Router {
        api::router(self.state.clone()).merge(health::router(self.db_pool.clone()))
    }
}

/// Loads config itself; the binary loads config first so logging can start
/// before the pool opens.
#[cfg(test)]
pub async fn bootstrap(
    options: goldapi_core::config::LoadOptions,
) -> Result<Application, BootstrapError> {
    let config = AppConfig::load(options)?;
    bootstrap_with_config(config).await
}

pub async fn bootstrap_with_config(config: AppConfig) -> Result<Application, BootstrapError> {
    info!(event_name = "system.bootstrap.start", "starting application bootstrap");

    let db_pool = connect_with_settings(
        &config.database.url,
        config.database.max_connections,
        config.database.timeout_secs,
    )
    .await
    .map_err(BootstrapError::DatabaseConnect)?;
    info!(event_name = "system.bootstrap.database_connected", "database connection established");

    migrations::run_pending(&db_pool).await.map_err(BootstrapError::Migration)?;
    info!(event_name = "system.bootstrap.migrations_applied", "database migrations applied");

    let state = api::AppState::from_pool(db_pool.clone());

    Ok(Application { config, db_pool, state })
}
