use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context as _, Result};
use chatlog_core::Config;
use chatlog_http::{AppState, create_router, start_session_purge};
use chatlog_service::{AuthService, EnvCredentialStore, LogService};
use chatlog_storage::PgStorage;

pub(crate) async fn run(port: u16, host: String) -> Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    let storage = Arc::new(PgStorage::new(&config.db)?);

    let credentials = EnvCredentialStore::from_env()?;
    if credentials.is_empty() {
        tracing::warn!("no login credentials configured, every login will be rejected");
    }
    let users = credentials.len();
    let referenced: Vec<String> = credentials.scopes().map(str::to_owned).collect();

    let auth_service = Arc::new(AuthService::new(
        Arc::new(credentials),
        config.scopes,
        Duration::from_secs(config.viewer.session_ttl_secs),
    ));
    for scope in &referenced {
        if auth_service.scope(scope).is_none() {
            tracing::warn!(scope, "credential refers to a scope missing from CHATLOG_SCOPES");
        }
    }
    tracing::info!(
        users,
        scopes = auth_service.scopes().len(),
        public = config.viewer.public_table.is_some(),
        "access control configured"
    );
    start_session_purge(Arc::clone(&auth_service));

    let state = Arc::new(AppState {
        config: config.viewer,
        log_service: Arc::new(LogService::new(storage.clone())),
        auth_service,
    });

    let router = create_router(state);
    let addr = format!("{host}:{port}");
    tracing::info!("Starting HTTP server on {}", addr);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    axum::serve(listener, router).with_graceful_shutdown(shutdown_signal()).await?;

    storage.close().await;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutting down");
}
