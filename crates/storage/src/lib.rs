//! Storage layer for chatlog-viewer
//!
//! Read-only queries over chat history tables written by an upstream chat
//! service. PostgreSQL via a sqlx pool, plus an in-memory store.

pub mod error;
mod memory;
mod pg_storage;
pub mod traits;

pub use error::StorageError;
pub use memory::MemoryStore;
pub use pg_storage::PgStorage;
pub use traits::ChatLogStore;
