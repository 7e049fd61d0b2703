use std::sync::Arc;

use axum::{
    Form,
    extract::State,
    http::{HeaderMap, header},
    response::{Html, IntoResponse, Redirect, Response},
};
use chatlog_core::AuthState;
use chatlog_service::LoginOutcome;

use crate::cookies::{expired_session_cookie, session_cookie, session_token};
use crate::query_types::LoginForm;
use crate::viewer::render_login_page;
use crate::{AppState, LOGIN_PATH};

/// `GET /login`: the form, or straight to the user's own view when logged in.
pub async fn login_form(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let token = session_token(&headers);
    let auth = state.auth_service.state(token.as_deref()).await;
    if let AuthState::Authenticated { scope, .. } = auth {
        if let Some(scope) = state.auth_service.scope(&scope) {
            return Redirect::to(&scope.path()).into_response();
        }
    }
    Html(render_login_page(&state.config.title, false)).into_response()
}

/// `POST /login`: start a login session and go to the scope's view.
pub async fn login_submit(
    State(state): State<Arc<AppState>>,
    Form(form): Form<LoginForm>,
) -> Response {
    match state.auth_service.login(form.username.trim(), &form.password).await {
        Ok(LoginOutcome::Authenticated { token, scope }) => {
            let cookie = session_cookie(&token, state.config.cookie_secure);
            ([(header::SET_COOKIE, cookie)], Redirect::to(&scope.path())).into_response()
        },
        Ok(LoginOutcome::Rejected) => {
            Html(render_login_page(&state.config.title, true)).into_response()
        },
        Err(e) => {
            tracing::error!(error = %e, "credential check failed");
            Html(render_login_page(&state.config.title, true)).into_response()
        },
    }
}

/// `GET /logout`: end the caller's login session.
pub async fn logout(State(state): State<Arc<AppState>>, headers: HeaderMap) -> Response {
    let token = session_token(&headers);
    state.auth_service.logout(token.as_deref()).await;
    let cookie = expired_session_cookie(state.config.cookie_secure);
    ([(header::SET_COOKIE, cookie)], Redirect::to(LOGIN_PATH)).into_response()
}
