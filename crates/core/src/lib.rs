//! Core types for chatlog-viewer
//!
//! Domain types shared across all other crates: stored chat rows, message
//! classification, session grouping, the date pagination policy, scopes and
//! environment-driven configuration.

mod chat;
mod config;
mod constants;
mod date;
mod env_config;
mod error;
mod scope;

pub use chat::*;
pub use config::*;
pub use constants::*;
pub use date::*;
pub use env_config::*;
pub use error::*;
pub use scope::*;
