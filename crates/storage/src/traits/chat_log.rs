use async_trait::async_trait;
use chatlog_core::{ChatRow, TableName};
use chrono::NaiveDate;

use crate::error::StorageError;

/// Read access to chat history tables.
#[async_trait]
pub trait ChatLogStore: Send + Sync {
    /// Up to `limit` most recent distinct calendar dates with rows, newest first.
    async fn available_dates(
        &self,
        table: &TableName,
        limit: usize,
    ) -> Result<Vec<NaiveDate>, StorageError>;

    /// All rows created on `date`, ordered by `(session_id, created_at)`.
    async fn messages_for_date(
        &self,
        table: &TableName,
        date: NaiveDate,
    ) -> Result<Vec<ChatRow>, StorageError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StorageError>;
}
