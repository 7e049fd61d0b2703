//! In-memory chat history tables, for tests and local demos.

use std::collections::{BTreeSet, HashMap};

use async_trait::async_trait;
use chatlog_core::{ChatRow, TableName};
use chrono::NaiveDate;
use tokio::sync::RwLock;

use crate::error::StorageError;
use crate::traits::ChatLogStore;

/// `ChatLogStore` over rows held in process memory.
///
/// Unknown tables behave like empty ones.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: RwLock<HashMap<String, Vec<ChatRow>>>,
}

impl MemoryStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert(&self, table: &TableName, row: ChatRow) {
        self.tables.write().await.entry(table.as_str().to_owned()).or_default().push(row);
    }

    pub async fn extend(&self, table: &TableName, rows: impl IntoIterator<Item = ChatRow>) {
        self.tables.write().await.entry(table.as_str().to_owned()).or_default().extend(rows);
    }
}

#[async_trait]
impl ChatLogStore for MemoryStore {
    async fn available_dates(
        &self,
        table: &TableName,
        limit: usize,
    ) -> Result<Vec<NaiveDate>, StorageError> {
        let tables = self.tables.read().await;
        let dates: BTreeSet<NaiveDate> = tables
            .get(table.as_str())
            .map(|rows| rows.iter().map(|r| r.created_at.date()).collect())
            .unwrap_or_default();
        Ok(dates.into_iter().rev().take(limit).collect())
    }

    async fn messages_for_date(
        &self,
        table: &TableName,
        date: NaiveDate,
    ) -> Result<Vec<ChatRow>, StorageError> {
        let tables = self.tables.read().await;
        let mut rows: Vec<ChatRow> = tables
            .get(table.as_str())
            .map(|rows| rows.iter().filter(|r| r.created_at.date() == date).cloned().collect())
            .unwrap_or_default();
        rows.sort_by(|a, b| {
            a.session_id.cmp(&b.session_id).then_with(|| a.created_at.cmp(&b.created_at))
        });
        Ok(rows)
    }

    async fn ping(&self) -> Result<(), StorageError> {
        Ok(())
    }
}
