//! Storage backend trait abstraction
//!
//! The query layer is a trait so handlers and services can run against
//! PostgreSQL in production and an in-memory store in tests.

pub mod chat_log;

pub use chat_log::ChatLogStore;
