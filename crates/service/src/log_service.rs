use std::sync::Arc;

use chatlog_core::{MAX_AVAILABLE_DATES, SessionGroup, TableName, group_by_session, resolve_date};
use chatlog_storage::ChatLogStore;
use chrono::NaiveDate;

use crate::error::ServiceError;

/// Shown in place of the logs when the database cannot be queried.
pub const DB_ERROR_MESSAGE: &str = "Error connecting to database";

/// Everything a log page needs, already resolved.
#[derive(Debug, Clone, PartialEq)]
pub struct LogPage {
    /// Date whose logs are shown.
    pub date: NaiveDate,
    /// Dates offered in the pagination strip, newest first.
    pub pagination: Vec<NaiveDate>,
    pub body: PageBody,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageBody {
    Sessions(Vec<SessionGroup>),
    /// Low-privilege message; the underlying error is only logged.
    Error(String),
}

pub struct LogService {
    store: Arc<dyn ChatLogStore>,
}

impl LogService {
    #[must_use]
    pub fn new(store: Arc<dyn ChatLogStore>) -> Self {
        Self { store }
    }

    /// Load the page for `requested`, snapping to the newest date with data.
    ///
    /// Never fails: a storage error degrades the page to an inline message and
    /// a pagination strip holding only the requested date.
    pub async fn load_page(
        &self,
        table: &TableName,
        requested: NaiveDate,
        today: NaiveDate,
    ) -> LogPage {
        match self.query(table, requested, today).await {
            Ok(page) => page,
            Err(e) => {
                tracing::error!(
                    table = %table,
                    date = %requested,
                    error = %e,
                    "failed to load chat logs"
                );
                LogPage {
                    date: requested,
                    pagination: vec![requested],
                    body: PageBody::Error(DB_ERROR_MESSAGE.to_owned()),
                }
            },
        }
    }

    async fn query(
        &self,
        table: &TableName,
        requested: NaiveDate,
        today: NaiveDate,
    ) -> Result<LogPage, ServiceError> {
        let available = self.store.available_dates(table, MAX_AVAILABLE_DATES).await?;
        let date = resolve_date(requested, &available, today);
        let rows = self.store.messages_for_date(table, date).await?;
        tracing::debug!(table = %table, %date, rows = rows.len(), "loaded chat logs");
        Ok(LogPage { date, pagination: available, body: PageBody::Sessions(group_by_session(rows)) })
    }

    pub async fn ping(&self) -> Result<(), ServiceError> {
        Ok(self.store.ping().await?)
    }
}
