use std::time::Instant;

use crate::commands::CommandResult;
use goldapi_core::config::{redact_database_url, AppConfig, LoadOptions};
use goldapi_db::{connect_existing, migrations, DbPool};
use serde::Serialize;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
enum SmokeStatus {
    Pass,
    Fail,
    Skipped,
}

#[derive(Debug, Serialize)]
struct SmokeCheck {
    name: &'static str,
    status: SmokeStatus,
    elapsed_ms: u64,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error_code: Option<String>,
}

#[derive(Debug, Serialize)]
struct SmokeReport {
    command: &'static str,
    status: SmokeStatus,
    summary: String,
    total_elapsed_ms: u64,
    checks: Vec<SmokeCheck>,
}

impl SmokeCheck {
    fn pass(name: &'static str, elapsed_ms: u64, message: impl Into<String>) -> Self {
        Self::with_status(name, SmokeStatus::Pass, elapsed_ms, message.into())
    }

    fn fail(name: &'static str, elapsed_ms: u64, message: impl Into<String>) -> Self {
        Self::with_status(name, SmokeStatus::Fail, elapsed_ms, message.into())
    }

    fn skipped(name: &'static str) -> Self {
        Self::with_status(name, SmokeStatus::Skipped, 0, "skipped due to previous failure".into())
    }

    fn with_status(
        name: &'static str,
        status: SmokeStatus,
        elapsed_ms: u64,
        message: String,
    ) -> Self {
        Self { name, status, elapsed_ms, message, error_code: None }
    }
}

/// Connectivity check: loads config, opens a pool within the configured
/// timeout, and checks both reporting tables exist. A missing database file is
/// a connectivity failure; the file is never created.
pub fn run() -> CommandResult {
    let started = Instant::now();
    let mut checks = Vec::new();

    let config = match timed_check(|| AppConfig::load(LoadOptions::default())) {
        Ok((elapsed_ms, config)) => {
            checks.push(SmokeCheck::pass(
                "config_validation",
                elapsed_ms,
                "configuration loaded and validated",
            ));
            config
        }
        Err((elapsed_ms, error)) => {
            checks.push(SmokeCheck::fail("config_validation", elapsed_ms, error.to_string()));
            checks.push(SmokeCheck::skipped("db_connectivity"));
            checks.push(SmokeCheck::skipped("gold_tables_visible"));
            return finalize_report(checks, elapsed_since(started));
        }
    };

    let runtime = match tokio::runtime::Builder::new_current_thread().enable_all().build() {
        Ok(runtime) => runtime,
        Err(error) => {
            checks.push(SmokeCheck::fail(
                "db_connectivity",
                0,
                format!("failed to initialize async runtime: {error}"),
            ));
            checks.push(SmokeCheck::skipped("gold_tables_visible"));
            return finalize_report(checks, elapsed_since(started));
        }
    };

    let db_started = Instant::now();
    let db_result = runtime.block_on(async {
        connect_existing(
            &config.database.url,
            config.database.max_connections,
            config.database.timeout_secs,
        )
        .await
    });

    let pool = match db_result {
        Ok(pool) => {
            checks.push(SmokeCheck::pass(
                "db_connectivity",
                elapsed_since(db_started),
                format!("connected using `{}`", redact_database_url(&config.database.url)),
            ));
            pool
        }
        Err(error) => {
            checks.push(connect_failure(&error, elapsed_since(db_started)));
            checks.push(SmokeCheck::skipped("gold_tables_visible"));
            return finalize_report(checks, elapsed_since(started));
        }
    };

    let tables_started = Instant::now();
    let tables_check = runtime.block_on(async {
        let visibility = tables_visible(&pool).await;
        pool.close().await;
        visibility
    });
    let tables_elapsed_ms = elapsed_since(tables_started);
    checks.push(match tables_check {
        Ok(message) => SmokeCheck::pass("gold_tables_visible", tables_elapsed_ms, message),
        Err(message) => SmokeCheck::fail("gold_tables_visible", tables_elapsed_ms, message),
    });

    finalize_report(checks, elapsed_since(started))
}

async fn tables_visible(pool: &DbPool) -> Result<String, String> {
    match migrations::missing_reporting_tables(pool).await {
        Ok(missing) if missing.is_empty() => {
            Ok(format!("tables visible: {}", migrations::REPORTING_TABLES.join(", ")))
        }
        Ok(missing) => Err(format!(
            "missing tables: {} (run `goldapi migrate`)",
            missing.join(", ")
        )),
        Err(error) => Err(format!("schema inspection failed: {error}")),
    }
}

fn connect_failure(error: &sqlx::Error, elapsed_ms: u64) -> SmokeCheck {
    let error_code = error
        .as_database_error()
        .and_then(|database_error| database_error.code())
        .map(|code| code.into_owned());

    let message = match &error_code {
        Some(code) => format!("failed to connect: {error} (code {code})"),
        None => format!("failed to connect: {error}"),
    };

    SmokeCheck { error_code, ..SmokeCheck::fail("db_connectivity", elapsed_ms, message) }
}

fn elapsed_since(started: Instant) -> u64 {
    started.elapsed().as_millis() as u64
}

fn timed_check<T, E>(check: impl FnOnce() -> Result<T, E>) -> Result<(u64, T), (u64, E)> {
    let started = Instant::now();
    match check() {
        Ok(value) => Ok((elapsed_since(started), value)),
        Err(error) => Err((elapsed_since(started), error)),
    }
}

fn finalize_report(checks: Vec<SmokeCheck>, total_elapsed_ms: u64) -> CommandResult {
    let passed = checks.iter().filter(|check| check.status == SmokeStatus::Pass).count();
    let total = checks.len();
    let failed = checks.iter().any(|check| check.status == SmokeStatus::Fail);

    let report = SmokeReport {
        command: "smoke",
        status: if failed { SmokeStatus::Fail } else { SmokeStatus::Pass },
        summary: format!("smoke: {passed}/{total} checks passed in {total_elapsed_ms}ms"),
        total_elapsed_ms,
        checks,
    };

    let human = report.summary.clone();
    let machine = serde_json::to_string(&report).unwrap_or_else(|error| {
        format!(
            "{{\"command\":\"smoke\",\"status\":\"fail\",\"summary\":\"serialization failed\",\"error\":\"{}\"}}",
            error.to_string().replace('\\', "\\\\").replace('"', "\\\"")
        )
    });

    CommandResult { exit_code: if failed { 6 } else { 0 }, output: format!("{human}\n{machine}") }
}
