//! Table identifiers, access scopes and the login state machine.

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;

use crate::error::CoreError;

static IDENT_RE: OnceLock<Regex> = OnceLock::new();
static SCOPE_RE: OnceLock<Regex> = OnceLock::new();

/// PostgreSQL truncates identifiers longer than this.
const MAX_IDENT_LEN: usize = 63;

fn ident_re() -> &'static Regex {
    IDENT_RE.get_or_init(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]*$").expect("valid regex"))
}

fn scope_re() -> &'static Regex {
    SCOPE_RE.get_or_init(|| Regex::new(r"^[A-Za-z0-9_-]+$").expect("valid regex"))
}

/// A validated, optionally schema-qualified table name.
///
/// Table names cannot be bound as query parameters, so only plain
/// identifiers are accepted and [`TableName::quoted`] is what goes into SQL.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TableName(String);

impl TableName {
    pub fn new(raw: &str) -> Result<Self, CoreError> {
        let raw = raw.trim();
        let parts: Vec<&str> = raw.split('.').collect();
        let valid = matches!(parts.len(), 1 | 2)
            && parts.iter().all(|p| p.len() <= MAX_IDENT_LEN && ident_re().is_match(p));
        if valid { Ok(Self(raw.to_owned())) } else { Err(CoreError::InvalidTableName(raw.to_owned())) }
    }

    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// `"schema"."table"` form for interpolation into SQL.
    #[must_use]
    pub fn quoted(&self) -> String {
        self.0.split('.').map(|p| format!("\"{p}\"")).collect::<Vec<_>>().join(".")
    }
}

impl fmt::Display for TableName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The view a login may access, backed by one table.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Scope {
    pub name: String,
    pub table: TableName,
}

impl Scope {
    pub fn new(name: &str, table: &str) -> Result<Self, CoreError> {
        let name = name.trim();
        if !scope_re().is_match(name) {
            return Err(CoreError::InvalidScopeName(name.to_owned()));
        }
        Ok(Self { name: name.to_owned(), table: TableName::new(table)? })
    }

    /// URL path of this scope's log view.
    #[must_use]
    pub fn path(&self) -> String {
        format!("/logs/{}", self.name)
    }

    /// Parse `name=table,name=table`.
    pub fn parse_list(raw: &str) -> Result<Vec<Self>, CoreError> {
        let mut scopes: Vec<Self> = Vec::new();
        for entry in raw.split(',').map(str::trim).filter(|e| !e.is_empty()) {
            let (name, table) = entry.split_once('=').ok_or_else(|| {
                CoreError::InvalidConfig(format!("scope entry {entry:?} is not name=table"))
            })?;
            let scope = Self::new(name, table)?;
            if scopes.iter().any(|s| s.name == scope.name) {
                return Err(CoreError::InvalidConfig(format!("duplicate scope {:?}", scope.name)));
            }
            scopes.push(scope);
        }
        Ok(scopes)
    }
}

/// Access-control state of one browser.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AuthState {
    #[default]
    Anonymous,
    Authenticated { username: String, scope: String },
}

impl AuthState {
    /// Whether this state may view the scope named `scope`.
    #[must_use]
    pub fn permits(&self, scope: &str) -> bool {
        matches!(self, Self::Authenticated { scope: own, .. } if own == scope)
    }

    #[must_use]
    pub fn scope(&self) -> Option<&str> {
        match self {
            Self::Anonymous => None,
            Self::Authenticated { scope, .. } => Some(scope),
        }
    }
}
