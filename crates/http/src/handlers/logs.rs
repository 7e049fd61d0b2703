use std::sync::Arc;

use axum::{
    extract::{Path, Query, State, rejection::QueryRejection},
    http::HeaderMap,
    response::{Html, IntoResponse, Redirect, Response},
};
use chatlog_core::{AuthState, TableName, parse_requested_date};

use crate::cookies::session_token;
use crate::query_types::DateQuery;
use crate::viewer::{PageContext, render_log_page};
use crate::{AppState, LOGIN_PATH, today};

/// `GET /`: logs of the public table, or the login page when none is configured.
pub async fn public_logs(
    State(state): State<Arc<AppState>>,
    query: Result<Query<DateQuery>, QueryRejection>,
) -> Response {
    let query = date_query(query);
    let Some(table) = state.config.public_table.clone() else {
        return Redirect::to(LOGIN_PATH).into_response();
    };
    render(&state, &table, query.date(), "/", None).await.into_response()
}

/// `GET /logs/{scope}`: logs of a scope's table for a user logged in to it.
pub async fn scoped_logs(
    State(state): State<Arc<AppState>>,
    Path(scope_name): Path<String>,
    query: Result<Query<DateQuery>, QueryRejection>,
    headers: HeaderMap,
) -> Response {
    let query = date_query(query);
    let token = session_token(&headers);
    let auth = state.auth_service.state(token.as_deref()).await;
    let scope = match state.auth_service.scope(&scope_name) {
        Some(scope) if auth.permits(&scope.name) => scope,
        _ => {
            tracing::debug!(scope = %scope_name, "unauthorized scope view, redirecting to login");
            return Redirect::to(LOGIN_PATH).into_response();
        },
    };
    let user = match &auth {
        AuthState::Authenticated { username, .. } => Some(username.as_str()),
        AuthState::Anonymous => None,
    };
    let path = scope.path();
    render(&state, &scope.table, query.date(), &path, user).await.into_response()
}

/// A query string that fails to decode is treated as having no `date`.
fn date_query(query: Result<Query<DateQuery>, QueryRejection>) -> DateQuery {
    match query {
        Ok(Query(query)) => query,
        Err(e) => {
            tracing::debug!(error = %e, "undecodable query string, showing today");
            DateQuery::default()
        },
    }
}

async fn render(
    state: &AppState,
    table: &TableName,
    date: Option<&str>,
    base_path: &str,
    user: Option<&str>,
) -> Html<String> {
    let today = today();
    let requested = parse_requested_date(date, today);
    let page = state.log_service.load_page(table, requested, today).await;
    Html(render_log_page(&PageContext {
        title: &state.config.title,
        refresh_secs: state.config.refresh_secs,
        page: &page,
        base_path,
        user,
    }))
}
