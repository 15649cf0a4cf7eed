use sqlx::migrate::{MigrateError, Migrator};

use crate::DbPool;

pub static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Tables the HTTP layer reads and writes.
pub const REPORTING_TABLES: [&str; 2] = ["report_products", "report_customers"];

pub async fn run_pending(pool: &DbPool) -> Result<(), MigrateError> {
    MIGRATOR.run(pool).await
}

/// Reporting tables that do not exist in the connected database.
pub async fn missing_reporting_tables(pool: &DbPool) -> Result<Vec<&'static str>, sqlx::Error> {
    let mut missing = Vec::new();
    for table in REPORTING_TABLES {
        let count: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM sqlite_master WHERE type = 'table' AND name = ?",
        )
        .bind(table)
        .fetch_one(pool)
        .await?;
        if count == 0 {
            missing.push(table);
        }
    }
    Ok(missing)
}
