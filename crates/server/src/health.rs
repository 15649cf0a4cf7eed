use axum::{extract::State, http::StatusCode, routing::get, Json, Router};
use chrono::{DateTime, Utc};
use goldapi_db::{ping, DbPool};
use serde::Serialize;
use tracing::warn;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Readiness {
    Ready,
    Degraded,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct DatabaseCheck {
    pub status: Readiness,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct HealthReport {
    pub status: Readiness,
    pub database: DatabaseCheck,
    pub checked_at: DateTime<Utc>,
}

/// `/health` carries the pool as its own state, separate from the API
/// repositories.
pub fn router(db_pool: DbPool) -> Router {
    Router::new().route("/health", get(health)).with_state(db_pool)
}

pub async fn health(State(db_pool): State<DbPool>) -> (StatusCode, Json<HealthReport>) {
    let database = match ping(&db_pool).await {
        Ok(()) => DatabaseCheck { status: Readiness::Ready, error: None },
        Err(error) => {
            warn!(event_name = "system.health.degraded", error = %error, "database ping failed");
            DatabaseCheck { status: Readiness::Degraded, error: Some(error.to_string()) }
        }
    };

    let status_code = match database.status {
        Readiness::Ready => StatusCode::OK,
        Readiness::Degraded => StatusCode::SERVICE_UNAVAILABLE,
    };
    let report = HealthReport { status: database.status, database, checked_at: Utc::now() };

    (status_code, Json(report))
}
