//! ChatLogStore implementation for PgStorage.

use async_trait::async_trait;
use chatlog_core::{ChatRow, TableName};
use chrono::{NaiveDate, NaiveDateTime};
use sqlx::Row;

use super::{PgStorage, usize_to_i64};
use crate::error::StorageError;
use crate::traits::ChatLogStore;

// `to_jsonb` turns a text column into a JSON string and leaves json/jsonb
// untouched; `::timestamp` accepts both timestamp and timestamptz columns and
// agrees with `DATE(created_at)` on the session time zone.
fn messages_query(table: &TableName) -> String {
    format!(
        "SELECT session_id::text AS session_id,
                to_jsonb(message) AS message,
                created_at::timestamp AS created_at
         FROM {}
         WHERE DATE(created_at) = $1
         ORDER BY session_id, created_at",
        table.quoted()
    )
}

fn dates_query(table: &TableName) -> String {
    format!(
        "SELECT DISTINCT DATE(created_at) AS log_date FROM {} ORDER BY log_date DESC LIMIT $1",
        table.quoted()
    )
}

#[async_trait]
impl ChatLogStore for PgStorage {
    async fn available_dates(
        &self,
        table: &TableName,
        limit: usize,
    ) -> Result<Vec<NaiveDate>, StorageError> {
        let dates: Vec<NaiveDate> = sqlx::query_scalar(&dates_query(table))
            .bind(usize_to_i64(limit))
            .fetch_all(&self.pool)
            .await?;
        Ok(dates)
    }

    async fn messages_for_date(
        &self,
        table: &TableName,
        date: NaiveDate,
    ) -> Result<Vec<ChatRow>, StorageError> {
        let rows = sqlx::query(&messages_query(table)).bind(date).fetch_all(&self.pool).await?;
        tracing::debug!(table = %table, %date, rows = rows.len(), "fetched chat rows");
        rows.iter().map(row_to_chat_row).collect()
    }

    async fn ping(&self) -> Result<(), StorageError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}

fn row_to_chat_row(row: &sqlx::postgres::PgRow) -> Result<ChatRow, StorageError> {
    let session_id: Option<String> = row.try_get("session_id")?;
    let message: Option<serde_json::Value> = row.try_get("message")?;
    let created_at: NaiveDateTime = row.try_get("created_at")?;
    Ok(ChatRow::new(session_id.unwrap_or_default(), message.unwrap_or_default(), created_at))
}
