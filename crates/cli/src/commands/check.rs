use anyhow::{Context as _, Result};
use chatlog_core::{Config, MAX_AVAILABLE_DATES, format_date};
use chatlog_storage::{ChatLogStore, PgStorage};

/// Probe the database and every configured table.
pub(crate) async fn run() -> Result<()> {
    let config = Config::from_env().context("invalid configuration")?;
    let storage = PgStorage::new(&config.db)?;
    storage.ping().await.context("database unreachable")?;
    println!("database: ok");

    let tables = config
        .viewer
        .public_table
        .iter()
        .map(|t| ("public".to_owned(), t.clone()))
        .chain(config.scopes.iter().map(|s| (format!("scope {}", s.name), s.table.clone())));
    for (label, table) in tables {
        let dates = storage
            .available_dates(&table, MAX_AVAILABLE_DATES)
            .await
            .with_context(|| format!("cannot query {label} table {table}"))?;
        let summary = if dates.is_empty() {
            "no data".to_owned()
        } else {
            dates.into_iter().map(format_date).collect::<Vec<_>>().join(", ")
        };
        println!("{label} ({table}): {summary}");
    }

    storage.close().await;
    Ok(())
}
