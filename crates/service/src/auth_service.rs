//! Login access-control shim.
//!
//! Each browser is either anonymous or authenticated for exactly one scope.
//! Login sessions live in process memory, expire after an idle TTL that is
//! refreshed on every use, and are independent of each other: one user may
//! hold several (one per browser) and logging out ends only the caller's.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use chatlog_core::{AuthState, Scope};
use tokio::sync::RwLock;
use tokio::time::Instant;
use uuid::Uuid;

use crate::credentials::CredentialStore;
use crate::error::ServiceError;

#[derive(Debug, Clone)]
struct LoginSession {
    username: String,
    scope: String,
    last_seen: Instant,
}

/// Server-held association between browser tokens and authenticated users.
#[derive(Debug)]
pub struct LoginSessions {
    ttl: Duration,
    sessions: RwLock<HashMap<String, LoginSession>>,
}

impl LoginSessions {
    #[must_use]
    pub fn new(ttl: Duration) -> Self {
        Self { ttl, sessions: RwLock::new(HashMap::new()) }
    }

    async fn create(&self, username: &str, scope: &str) -> String {
        let token = Uuid::new_v4().simple().to_string();
        let session = LoginSession {
            username: username.to_owned(),
            scope: scope.to_owned(),
            last_seen: Instant::now(),
        };
        self.sessions.write().await.insert(token.clone(), session);
        token
    }

    /// Current state of `token`, refreshing its idle timer when live.
    async fn touch(&self, token: &str) -> AuthState {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        match sessions.get_mut(token) {
            Some(session) if now.duration_since(session.last_seen) < self.ttl => {
                session.last_seen = now;
                AuthState::Authenticated {
                    username: session.username.clone(),
                    scope: session.scope.clone(),
                }
            },
            Some(_) => {
                sessions.remove(token);
                AuthState::Anonymous
            },
            None => AuthState::Anonymous,
        }
    }

    async fn remove(&self, token: &str) -> bool {
        self.sessions.write().await.remove(token).is_some()
    }

    /// Drop every expired session. Returns how many were removed.
    pub async fn purge_expired(&self) -> usize {
        let mut sessions = self.sessions.write().await;
        let now = Instant::now();
        let before = sessions.len();
        sessions.retain(|_, s| now.duration_since(s.last_seen) < self.ttl);
        before.saturating_sub(sessions.len())
    }

    /// Number of sessions held, expired ones included until purged.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }
}

/// Result of a login attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Authenticated { token: String, scope: Scope },
    /// Wrong username or password; deliberately says nothing more.
    Rejected,
}

pub struct AuthService {
    credentials: Arc<dyn CredentialStore>,
    sessions: LoginSessions,
    scopes: Vec<Scope>,
}

impl AuthService {
    #[must_use]
    pub fn new(credentials: Arc<dyn CredentialStore>, scopes: Vec<Scope>, ttl: Duration) -> Self {
        Self { credentials, sessions: LoginSessions::new(ttl), scopes }
    }

    #[must_use]
    pub fn scope(&self, name: &str) -> Option<&Scope> {
        self.scopes.iter().find(|s| s.name == name)
    }

    #[must_use]
    pub fn scopes(&self) -> &[Scope] {
        &self.scopes
    }

    #[must_use]
    pub const fn sessions(&self) -> &LoginSessions {
        &self.sessions
    }

    pub async fn login(&self, username: &str, password: &str) -> Result<LoginOutcome, ServiceError> {
        let Some(scope_name) = self.credentials.verify(username, password).await? else {
            tracing::info!(username, "login rejected");
            return Ok(LoginOutcome::Rejected);
        };
        let Some(scope) = self.scope(&scope_name).cloned() else {
            tracing::warn!(username, scope = %scope_name, "credential refers to an unknown scope");
            return Ok(LoginOutcome::Rejected);
        };
        let token = self.sessions.create(username, &scope.name).await;
        tracing::info!(username, scope = %scope.name, "login succeeded");
        Ok(LoginOutcome::Authenticated { token, scope })
    }

    /// State of the browser presenting `token` (if any).
    pub async fn state(&self, token: Option<&str>) -> AuthState {
        match token {
            Some(token) => self.sessions.touch(token).await,
            None => AuthState::Anonymous,
        }
    }

    pub async fn logout(&self, token: Option<&str>) {
        if let Some(token) = token {
            if self.sessions.remove(token).await {
                tracing::info!("logged out");
            }
        }
    }
}
