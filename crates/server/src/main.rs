mod api;
mod bootstrap;
mod error;
mod health;

use std::time::Duration;

use anyhow::Result;
use goldapi_core::config::{redact_database_url, AppConfig, LoadOptions};
use tokio::{net::TcpListener, sync::oneshot};
use tower_http::trace::TraceLayer;
use tracing::{info, warn};

fn init_logging(config: &AppConfig) {
    use goldapi_core::config::LogFormat::*;
    use tracing::Level;

    let log_level = config.logging.level.parse::<Level>().unwrap_or(Level::INFO);

    match config.logging.format {
        Compact => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).compact().init();
        }
        Pretty => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).pretty().init();
        }
        Json => {
            tracing_subscriber::fmt().with_target(false).with_max_level(log_level).json().init();
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    run().await
}

pub async fn run() -> Result<()> {
    // Logging depends on config, so config must load first.
    let config = AppConfig::load(LoadOptions::default())?;
    init_logging(&config);

    let app = bootstrap::bootstrap_with_config(config).await?;
    let router = app.router().layer(TraceLayer::new_for_http());

    let address = format!("{}:{}", app.config.server.bind_address, app.config.server.port);
    let listener = TcpListener::bind(&address).await?;
    info!(
        event_name = "system.server.started",
        bind_address = %address,
        database_url = %redact_database_url(&app.config.database.url),
        "goldapi-server listening"
    );

    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let mut server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async {
                let _ = shutdown_rx.await;
            })
            .await
    });

    tokio::select! {
        joined = &mut server => {
            joined??;
            warn!(event_name = "system.server.exited", "server stopped without a shutdown signal");
        }
        signal = wait_for_shutdown() => {
            signal?;
            info!(
                event_name = "system.server.stopping",
                "shutdown signal received, draining requests"
            );
            let _ = shutdown_tx.send(());

            let grace = Duration::from_secs(app.config.server.graceful_shutdown_secs);
            match tokio::time::timeout(grace, server).await {
                Ok(joined) => joined??,
                Err(_) => warn!(
                    event_name = "system.server.drain_timeout",
                    grace_secs = grace.as_secs(),
                    "in-flight requests did not finish before the grace period"
                ),
            }
        }
    }

    app.db_pool.close().await;
    info!(event_name = "system.server.stopped", "goldapi-server stopped");

    Ok(())
}

async fn wait_for_shutdown() -> Result<()> {
    tokio::signal::ctrl_c().await?;
    Ok(())
}
