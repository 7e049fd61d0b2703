//! Credential providers for the login shim.
//!
//! Credentials are never compiled in. The default provider reads them from
//! the environment; a real identity provider plugs in through
//! [`CredentialStore`].

use std::fmt;

use async_trait::async_trait;

use crate::error::ServiceError;

/// Environment variable holding `user:password:scope` entries separated by `;`.
pub const ENV_CREDENTIALS: &str = "CHATLOG_CREDENTIALS";

/// Checks a username/password pair and yields the scope it may access.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// `Ok(Some(scope))` on a match, `Ok(None)` on any mismatch.
    async fn verify(&self, username: &str, password: &str) -> Result<Option<String>, ServiceError>;
}

struct Credential {
    username: String,
    password: String,
    scope: String,
}

/// Read-only credential table loaded from [`ENV_CREDENTIALS`].
#[derive(Default)]
pub struct EnvCredentialStore {
    entries: Vec<Credential>,
}

impl fmt::Debug for EnvCredentialStore {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let users: Vec<(&str, &str)> =
            self.entries.iter().map(|c| (c.username.as_str(), c.scope.as_str())).collect();
        f.debug_struct("EnvCredentialStore").field("users", &users).finish()
    }
}

impl EnvCredentialStore {
    /// Load from the environment; an unset variable yields an empty store.
    pub fn from_env() -> Result<Self, ServiceError> {
        match std::env::var(ENV_CREDENTIALS) {
            Ok(raw) => Self::parse(&raw),
            Err(std::env::VarError::NotPresent) => Ok(Self::default()),
            Err(std::env::VarError::NotUnicode(_)) => {
                Err(ServiceError::Credentials(format!("{ENV_CREDENTIALS} is not valid unicode")))
            },
        }
    }

    /// Parse `user:password:scope;user:password:scope`.
    ///
    /// The username ends at the first `:` and the scope starts after the last
    /// one, so passwords may contain `:`.
    pub fn parse(raw: &str) -> Result<Self, ServiceError> {
        let mut entries: Vec<Credential> = Vec::new();
        for entry in raw.split(';').map(str::trim).filter(|e| !e.is_empty()) {
            let invalid = || ServiceError::Credentials("entry is not user:password:scope".to_owned());
            let (username, rest) = entry.split_once(':').ok_or_else(invalid)?;
            let (password, scope) = rest.rsplit_once(':').ok_or_else(invalid)?;
            let (username, scope) = (username.trim(), scope.trim());
            if username.is_empty() || password.is_empty() || scope.is_empty() {
                return Err(invalid());
            }
            if entries.iter().any(|c| c.username == username) {
                return Err(ServiceError::Credentials(format!("duplicate user {username:?}")));
            }
            entries.push(Credential {
                username: username.to_owned(),
                password: password.to_owned(),
                scope: scope.to_owned(),
            });
        }
        Ok(Self { entries })
    }

    /// Scopes referenced by the loaded credentials.
    pub fn scopes(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|c| c.scope.as_str())
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl CredentialStore for EnvCredentialStore {
    async fn verify(&self, username: &str, password: &str) -> Result<Option<String>, ServiceError> {
        let matched = self.entries.iter().find(|c| c.username == username).and_then(|c| {
            constant_time_eq(c.password.as_bytes(), password.as_bytes()).then(|| c.scope.clone())
        });
        Ok(matched)
    }
}

/// Byte comparison whose running time does not depend on where inputs differ.
fn constant_time_eq(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }
    a.iter().zip(b.iter()).fold(0u8, |acc, (x, y)| acc | (x ^ y)) == 0
}
