//! Service layer for chatlog-viewer
//!
//! Sits between the HTTP handlers and storage: the date-paginated log query
//! and the login access-control shim.

#![allow(clippy::missing_errors_doc, reason = "Errors are self-explanatory from Result types")]
#![allow(clippy::implicit_return, reason = "Implicit return is idiomatic Rust")]
#![allow(clippy::question_mark_used, reason = "? operator is idiomatic Rust")]

mod auth_service;
mod credentials;
mod error;
mod log_service;

pub use auth_service::{AuthService, LoginOutcome, LoginSessions};
pub use credentials::{CredentialStore, ENV_CREDENTIALS, EnvCredentialStore};
pub use error::ServiceError;
pub use log_service::{DB_ERROR_MESSAGE, LogPage, LogService, PageBody};
