//! HTTP server for chatlog-viewer.
//!
//! Serves date-paginated HTML pages of chat logs: a public view at `/` and
//! login-gated per-scope views at `/logs/{scope}`.

#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]
#![allow(clippy::min_ident_chars, reason = "Short closure params are idiomatic")]
#![allow(clippy::exhaustive_structs, reason = "HTTP types are stable")]

pub mod api_error;
mod cookies;
mod handlers;
mod query_types;
mod response_types;
pub mod viewer;

use std::sync::Arc;
use std::time::Duration;

use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};
use chatlog_core::{SESSION_PURGE_INTERVAL_SECS, ViewerConfig};
use chatlog_service::{AuthService, LogService};
use chrono::NaiveDate;
use tower_http::trace::TraceLayer;

use crate::api_error::ApiError;

pub use response_types::{ReadinessResponse, VersionResponse};

pub(crate) const LOGIN_PATH: &str = "/login";

/// Shared application state for all HTTP handlers.
pub struct AppState {
    /// What to serve and how to render it
    pub config: ViewerConfig,
    /// Date-paginated log queries
    pub log_service: Arc<LogService>,
    /// Login sessions and credential checks
    pub auth_service: Arc<AuthService>,
}

pub fn create_router(state: Arc<AppState>) -> Router {
    Router::new()
        .route("/", get(handlers::logs::public_logs))
        .route("/logs/{scope}", get(handlers::logs::scoped_logs))
        .route(LOGIN_PATH, get(handlers::auth::login_form).post(handlers::auth::login_submit))
        .route("/logout", get(handlers::auth::logout))
        .route("/health", get(health))
        .route("/api/readiness", get(readiness))
        .route("/api/version", get(version))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Spawns background task that drops expired login sessions.
pub fn start_session_purge(auth: Arc<AuthService>) {
    tokio::spawn(async move {
        let mut interval =
            tokio::time::interval(Duration::from_secs(SESSION_PURGE_INTERVAL_SECS));
        interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
        loop {
            interval.tick().await;
            let purged = auth.sessions().purge_expired().await;
            if purged > 0 {
                let active = auth.sessions().len().await;
                tracing::info!(active, "Session purge: removed {} expired login sessions", purged);
            }
        }
    });
}

/// Local calendar date, the default page date.
pub(crate) fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

async fn health() -> &'static str {
    "ok"
}

async fn readiness(
    State(state): State<Arc<AppState>>,
) -> Result<(StatusCode, Json<ReadinessResponse>), ApiError> {
    state.log_service.ping().await?;
    Ok((StatusCode::OK, Json(ReadinessResponse { status: "ready" })))
}

async fn version() -> Json<VersionResponse> {
    Json(VersionResponse { version: env!("CARGO_PKG_VERSION") })
}
