//! # fieldhubd — fieldhub daemon
//!
//! Composition root that wires all adapters together and starts the server.
//!
//! ## Responsibilities
//! - Load configuration (config file, env vars)
//! - Initialize logging
//! - Initialize the `SQLite` connection pool and run migrations
//! - Construct repository implementations (adapters)
//! - Construct application services, injecting repositories via port traits
//! - Build the axum router, injecting application services
//! - Bind to a TCP port and serve until SIGTERM/SIGINT
//!
//! ## Dependency rule
//! This is the **only** crate that depends on all other crates.
//! It is the wiring layer — no domain logic belongs here.

mod config;

use std::sync::Arc;

use anyhow::Context;
use tracing_subscriber::EnvFilter;

use fieldhub_adapter_http_axum::state::AppState;
use fieldhub_adapter_storage_sqlite_sqlx::{
    Config as DatabaseConfig, SqliteAppointmentRepository, SqliteDirectoryRepository,
    SqliteServiceRecordRepository,
};
use fieldhub_app::services::appointment_service::AppointmentService;
use fieldhub_app::services::service_record_service::ServiceRecordService;

use crate::config::Config;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = Config::load().context("failed to load configuration")?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(&config.logging.filter))
        .init();

    // Database
    let db = DatabaseConfig {
        database_url: config.database_url().to_string(),
    }
    .build()
    .await
    .context("failed to open database")?;
    let pool = db.pool().clone();

    // Repositories
    let record_repo = SqliteServiceRecordRepository::new(pool.clone());
    let appointment_repo = SqliteAppointmentRepository::new(pool.clone());
    let directory = Arc::new(SqliteDirectoryRepository::new(pool));

    // Services
    let rules = config.lifecycle.clone();
    let service_records = ServiceRecordService::new(record_repo, Arc::clone(&directory), rules.clone());
    let appointments = AppointmentService::new(appointment_repo, directory, rules);

    // HTTP
    let state = AppState::new(service_records, appointments);
    let app = fieldhub_adapter_http_axum::router::build(state);

    let bind_addr = config.bind_addr();
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .with_context(|| format!("failed to bind {bind_addr}"))?;
    tracing::info!(
        address = %bind_addr,
        labor_rate = %config.lifecycle.labor_rate,
        "fieldhubd listening"
    );

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    tracing::info!("fieldhubd stopped");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %err, "failed to listen for ctrl-c");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(err) => {
                tracing::error!(error = %err, "failed to listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }
    tracing::info!("shutdown signal received");
}
